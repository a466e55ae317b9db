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

use archivist::{Archive, Archivist, Error, RecordType};

#[derive(Archive, Default, Debug, PartialEq)]
#[archive(name = "Save", version = 1)]
struct SaveV1 {
    level: i32,
}

#[derive(Archive, Default, Debug, PartialEq)]
#[archive(name = "Save", version = 2, min_version = 2)]
struct SaveV2 {
    level: i32,
    checkpoint: String,
}

#[test]
fn test_version_is_written() {
    assert_eq!(SaveV2::VERSION, 2);
    assert_eq!(SaveV2::MIN_VERSION, 2);
    let text = Archivist::default()
        .serialize(&SaveV1 { level: 3 })
        .unwrap();
    assert_eq!(text, "Save {\n    @version=1\n    level=3\n}\n");
}

#[test]
fn test_older_data_is_rejected() {
    let archivist = Archivist::default();
    let old = archivist.serialize(&SaveV1 { level: 3 }).unwrap();
    let err = archivist.deserialize::<SaveV2>(&old).unwrap_err();
    match err {
        Error::VersionTooOld {
            line,
            type_name,
            found,
            minimum,
        } => {
            assert_eq!(line, 2);
            assert_eq!(type_name, "Save");
            assert_eq!(found, 1);
            assert_eq!(minimum, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_current_and_newer_data_load() {
    let archivist = Archivist::default();
    let current = SaveV2 {
        level: 8,
        checkpoint: "gate".to_string(),
    };
    let text = archivist.serialize(&current).unwrap();
    assert_eq!(archivist.deserialize::<SaveV2>(&text).unwrap(), current);

    // The older reader skips the field it does not know.
    let older: SaveV1 = archivist.deserialize(&text).unwrap();
    assert_eq!(older.level, 8);
}

#[test]
fn test_gate_runs_after_all_fields() {
    let archivist = Archivist::default();
    let text = "Save {\n    @version=1\n    checkpoint=\"x\"\n    level=2\n}\n";
    let err = archivist.deserialize::<SaveV2>(text).unwrap_err();
    assert!(matches!(err, Error::VersionTooOld { line: 2, .. }));

    // A broken field still fails as such.
    let text = "Save {\n    @version=1\n    level=oops\n}\n";
    let err = archivist.deserialize::<SaveV2>(text).unwrap_err();
    assert!(matches!(err, Error::InvalidValue { line: 3, .. }));
}

#[test]
fn test_missing_version_counts_as_zero() {
    let archivist = Archivist::default();
    let err = archivist
        .deserialize::<SaveV2>("Save {\n    level=1\n}\n")
        .unwrap_err();
    assert!(matches!(
        err,
        Error::VersionTooOld {
            line: 3,
            found: 0,
            minimum: 2,
            ..
        }
    ));

    let v1: SaveV1 = archivist.deserialize("Save {\n    level=1\n}\n").unwrap();
    assert_eq!(v1.level, 1);
}

#[test]
fn test_patches_skip_the_gate() {
    let archivist = Archivist::default();
    let mut save = SaveV2 {
        level: 1,
        checkpoint: "start".to_string(),
    };
    archivist
        .apply_patch(&mut save, "Save {\n    level=4\n}\n")
        .unwrap();
    assert_eq!(save.level, 4);

    let err = archivist
        .apply_patch(&mut save, "Save {\n    @version=1\n    level=5\n}\n")
        .unwrap_err();
    assert!(matches!(err, Error::VersionTooOld { .. }));
}

#[test]
fn test_merging_load_checks_missing_version() {
    let merging = Archivist::default().keep_instances(true);
    let mut save = SaveV2 {
        level: 9,
        checkpoint: "live".to_string(),
    };
    let err = merging
        .deserialize_into("Save {\n    level=3\n}\n", &mut save)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::VersionTooOld {
            line: 3,
            found: 0,
            minimum: 2,
            ..
        }
    ));

    let old = merging.serialize(&SaveV1 { level: 3 }).unwrap();
    let err = merging.deserialize_into(&old, &mut save).unwrap_err();
    assert!(matches!(err, Error::VersionTooOld { line: 2, found: 1, .. }));

    let mut current = SaveV1 { level: 0 };
    merging
        .deserialize_into("Save {\n    level=3\n}\n", &mut current)
        .unwrap();
    assert_eq!(current.level, 3);
}

#[test]
fn test_invalid_version_counter() {
    let err = Archivist::default()
        .deserialize::<SaveV2>("Save {\n    @version=two\n}\n")
        .unwrap_err();
    assert!(matches!(err, Error::InvalidValue { line: 2, .. }));
}

#[derive(Archive, Default, Debug, PartialEq)]
#[archive(version = 3, min_version = 3)]
struct Chapter {
    title: String,
}

#[derive(Archive, Default, Debug, PartialEq)]
struct Book {
    chapters: Vec<Chapter>,
}

#[test]
fn test_nested_records_are_gated() {
    let archivist = Archivist::default();
    let book = Book {
        chapters: vec![Chapter {
            title: "one".to_string(),
        }],
    };
    let text = archivist.serialize(&book).unwrap();
    assert!(text.contains("        @version=3\n"));
    assert_eq!(archivist.deserialize::<Book>(&text).unwrap(), book);

    let stale = text.replace("@version=3", "@version=2");
    let err = archivist.deserialize::<Book>(&stale).unwrap_err();
    assert!(matches!(
        err,
        Error::VersionTooOld {
            line: 4,
            found: 2,
            minimum: 3,
            ..
        }
    ));
}
