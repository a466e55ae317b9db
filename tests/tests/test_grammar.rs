// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use archivist::{Archive, Archivist, Error};

#[derive(Archive, Default, Debug, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Archive, Default, Debug, PartialEq)]
struct Path {
    name: String,
    points: Vec<Point>,
    anchor: Point,
}

#[test]
fn test_comments_blank_lines_and_indentation() {
    let text = "\
# saved path

Path {
        name=\"p\"
   # inline comment
    points=Vec<Point> 1 {

      Point {
x=1
          y=2
      }
    }
}
# trailing comment
";
    let path: Path = Archivist::default().deserialize(text).unwrap();
    assert_eq!(path.name, "p");
    assert_eq!(path.points, vec![Point { x: 1, y: 2 }]);
    assert_eq!(path.anchor, Point::default());
}

#[test]
fn test_comment_lines_in_element_blocks() {
    let text = "Vec<i32> 2 {\n    # first\n    1\n    # second\n    2\n}\n";
    let values: Vec<i32> = Archivist::default().deserialize(text).unwrap();
    assert_eq!(values, vec![1, 2]);
}

#[test]
fn test_missing_equals_sign() {
    let err = Archivist::default()
        .deserialize::<Point>("Point {\n    x 1\n}\n")
        .unwrap_err();
    assert!(matches!(err, Error::MalformedLine { line: 2, .. }));
    assert!(err.to_string().starts_with("line 2:"));
}

#[test]
fn test_truncated_input() {
    let err = Archivist::default()
        .deserialize::<Path>("Path {\n    anchor=Point {\n        x=1\n")
        .unwrap_err();
    assert!(matches!(
        err,
        Error::UnexpectedEndOfInput { line: 3, depth: 2 }
    ));

    let err = Archivist::default().deserialize::<Point>("").unwrap_err();
    assert!(matches!(err, Error::UnexpectedEndOfInput { depth: 0, .. }));
}

#[test]
fn test_too_many_elements() {
    let err = Archivist::default()
        .deserialize::<Vec<i32>>("Vec<i32> 1 {\n    1\n    2\n}\n")
        .unwrap_err();
    match err {
        Error::UnclosedBlock { line, found } => {
            assert_eq!(line, 3);
            assert_eq!(found, "2");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_too_few_elements() {
    let err = Archivist::default()
        .deserialize::<Box<[i32]>>("i32 3 {\n    1\n}\n")
        .unwrap_err();
    assert!(matches!(
        err,
        Error::CountMismatch {
            line: 3,
            expected: 3,
            found: 1
        }
    ));
}

#[test]
fn test_content_after_top_level_value() {
    let err = Archivist::default()
        .deserialize::<Point>("Point {\n}\nPoint {\n}\n")
        .unwrap_err();
    assert!(matches!(err, Error::MalformedLine { line: 3, .. }));
}

#[test]
fn test_unknown_type_name() {
    let err = Archivist::default()
        .deserialize::<Path>("Path {\n    anchor=NoSuchType {\n    }\n}\n")
        .unwrap_err();
    match err {
        Error::TypeNotFound { line, type_name } => {
            assert_eq!(line, 2);
            assert_eq!(type_name, "NoSuchType");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_type_mismatch() {
    let archivist = Archivist::default();
    archivist.register::<Path>().unwrap();
    let err = archivist
        .deserialize::<Path>("Path {\n    anchor=Path {\n    }\n}\n")
        .unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { line: 2, .. }));

    let err = archivist
        .deserialize::<Vec<i32>>("Vec<i64> 0 {\n}\n")
        .unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { line: 1, .. }));
}

#[test]
fn test_invalid_values() {
    let archivist = Archivist::default();
    let err = archivist
        .deserialize::<Point>("Point {\n    x=1\n    y=abc\n}\n")
        .unwrap_err();
    assert!(matches!(err, Error::InvalidValue { line: 3, .. }));

    let err = archivist
        .deserialize::<Path>("Path {\n    name=\"a%zz\"\n}\n")
        .unwrap_err();
    assert!(matches!(err, Error::InvalidValue { line: 2, .. }));

    let err = archivist
        .deserialize::<Path>("Path {\n    name=unquoted\n}\n")
        .unwrap_err();
    assert!(matches!(err, Error::InvalidValue { line: 2, .. }));

    // Only nullable slots take `null`.
    let err = archivist
        .deserialize::<Point>("Point {\n    x=null\n}\n")
        .unwrap_err();
    assert!(matches!(err, Error::InvalidValue { line: 2, .. }));
}

#[test]
fn test_block_headers() {
    let archivist = Archivist::default();
    let err = archivist
        .deserialize::<Vec<i32>>("Vec<i32> {\n}\n")
        .unwrap_err();
    assert!(matches!(err, Error::MalformedLine { line: 1, .. }));

    let err = archivist
        .deserialize::<Point>("Point 2 {\n}\n")
        .unwrap_err();
    assert!(matches!(err, Error::MalformedLine { line: 1, .. }));

    let err = archivist
        .deserialize::<Vec<i32>>("Vec<i32> two {\n}\n")
        .unwrap_err();
    assert!(matches!(err, Error::MalformedLine { line: 1, .. }));
}

#[test]
fn test_depth_limit() {
    let text = "Vec<Vec<Vec<i32>>> 1 {\n  Vec<Vec<i32>> 1 {\n    Vec<i32> 1 {\n      1\n    }\n  }\n}\n";
    let err = Archivist::default()
        .max_depth(2)
        .deserialize::<Vec<Vec<Vec<i32>>>>(text)
        .unwrap_err();
    assert!(matches!(err, Error::DepthExceeded { line: 3, limit: 2 }));

    let nested: Vec<Vec<Vec<i32>>> = Archivist::default().deserialize(text).unwrap();
    assert_eq!(nested, vec![vec![vec![1]]]);
}

#[test]
fn test_error_lines() {
    let err = Archivist::default()
        .deserialize::<Point>("\n\n# header\nPoint {\n    x=\n}\n")
        .unwrap_err();
    assert_eq!(err.line(), Some(5));
}
