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

use std::collections::BTreeMap;
use std::io::Cursor;

use archivist::{Archive, Archivist, Error};

#[derive(Archive, Default, Debug, PartialEq)]
#[archive(version = 1)]
struct Settings {
    volume: u8,
    player: String,
    bindings: BTreeMap<String, String>,
}

fn settings() -> Settings {
    let mut bindings = BTreeMap::new();
    bindings.insert("jump".to_string(), "space".to_string());
    bindings.insert("fire".to_string(), "ctrl".to_string());
    Settings {
        volume: 7,
        player: "Ana \"the quick\"".to_string(),
        bindings,
    }
}

#[test]
fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.txt");
    let archivist = Archivist::default();

    archivist.save(&settings(), &path).unwrap();
    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert!(on_disk.starts_with("Settings {\n    @version=1\n"));

    let loaded: Settings = archivist.load(&path).unwrap();
    assert_eq!(loaded, settings());
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Archivist::default()
        .load::<Settings, _>(dir.path().join("absent.txt"))
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert_eq!(err.line(), None);
}

#[test]
fn test_load_reports_lines_of_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut file, b"Settings {\n    volume=300\n}\n").unwrap();
    let err = Archivist::default()
        .load::<Settings, _>(file.path())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidValue { line: 2, .. }));
}

#[test]
fn test_streams() {
    let archivist = Archivist::default();
    let mut buffer = Vec::new();
    archivist.serialize_to(&settings(), &mut buffer).unwrap();
    assert_eq!(
        String::from_utf8(buffer.clone()).unwrap(),
        archivist.serialize(&settings()).unwrap()
    );

    let back: Settings = archivist.deserialize_from(Cursor::new(buffer)).unwrap();
    assert_eq!(back, settings());
}
