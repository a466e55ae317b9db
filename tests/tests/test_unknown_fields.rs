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
struct Profile {
    alias: String,
    level: i32,
}

#[derive(Archive, Default, Debug, PartialEq)]
struct Account {
    id: u32,
    profile: Profile,
    zone: String,
}

const WITH_UNKNOWN_FIELDS: &str = "\
Account {
    id=4
    legacy=\"dropped\"
    history=Vec<Profile> 2 {
        Profile {
            alias=\"a\"
            extra=Gadget {
                nested=i32 1 {
                    1
                }
            }
        }
        null
    }
    profile=Profile {
        alias=\"kay\"
        color=\"red\"
        level=3
    }
    unknown_record=Gadget {
    }
    zone=\"eu\"
}
";

#[test]
fn test_lenient_mode_skips_unknown_fields() {
    let account: Account = Archivist::default()
        .deserialize(WITH_UNKNOWN_FIELDS)
        .unwrap();
    assert_eq!(
        account,
        Account {
            id: 4,
            profile: Profile {
                alias: "kay".to_string(),
                level: 3,
            },
            zone: "eu".to_string(),
        }
    );
}

#[test]
fn test_strict_mode_rejects_unknown_fields() {
    let err = Archivist::default()
        .strict(true)
        .deserialize::<Account>(WITH_UNKNOWN_FIELDS)
        .unwrap_err();
    match err {
        Error::UnknownField {
            line,
            type_name,
            field,
        } => {
            assert_eq!(line, 3);
            assert_eq!(type_name, "Account");
            assert_eq!(field, "legacy");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_strict_mode_in_nested_record() {
    let text = "Account {\n    profile=Profile {\n        color=\"red\"\n    }\n}\n";
    let err = Archivist::default()
        .strict(true)
        .deserialize::<Account>(text)
        .unwrap_err();
    assert!(matches!(err, Error::UnknownField { line: 3, .. }));
    assert!(err.to_string().contains("`color`"));
}

#[test]
fn test_skipped_block_must_be_closed() {
    let text = "Account {\n    stale=Gadget {\n        a=1\n";
    let err = Archivist::default()
        .deserialize::<Account>(text)
        .unwrap_err();
    assert!(matches!(err, Error::UnexpectedEndOfInput { line: 3, .. }));
}

#[test]
fn test_unknown_fields_while_merging() {
    let mut account = Account {
        id: 1,
        zone: "us".to_string(),
        ..Account::default()
    };
    Archivist::default()
        .keep_instances(true)
        .deserialize_into("Account {\n    gone=Gadget {\n    }\n    id=2\n}\n", &mut account)
        .unwrap();
    assert_eq!(account.id, 2);
    assert_eq!(account.zone, "us");
}
