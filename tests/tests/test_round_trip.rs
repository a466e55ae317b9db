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

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use archivist::{deep_equal, Archive, Archivist};
use chrono::{NaiveDate, NaiveDateTime};

#[derive(Archive, Default, Debug, PartialEq)]
struct Entry {
    id: i64,
    name: String,
    tags: Box<[String]>,
}

#[test]
fn test_escaped_string_and_array() {
    let archivist = Archivist::default();
    let entry = Entry {
        id: 7,
        name: "a\nb".to_string(),
        tags: vec!["x".to_string(), "y".to_string()].into_boxed_slice(),
    };
    let text = archivist.serialize(&entry).unwrap();
    assert_eq!(
        text,
        "Entry {\n    id=7\n    name=\"a\\nb\"\n    tags=String 2 {\n        \"x\"\n        \"y\"\n    }\n}\n"
    );
    let back: Entry = archivist.deserialize(&text).unwrap();
    assert_eq!(back.name, "a\nb");
    assert_eq!(back.tags.to_vec(), vec!["x", "y"]);
    assert_eq!(back, entry);
}

#[derive(Archive, Default, Debug, PartialEq)]
struct Scalars {
    a: i8,
    b: i16,
    c: i32,
    d: i64,
    e: u8,
    f: u16,
    g: u32,
    h: u64,
    x: f32,
    y: f64,
    flag: bool,
    letter: char,
}

#[test]
fn test_scalars() {
    let archivist = Archivist::default();
    let value = Scalars {
        a: i8::MIN,
        b: -300,
        c: i32::MAX,
        d: i64::MIN,
        e: u8::MAX,
        f: 65_000,
        g: 4_000_000_000,
        h: u64::MAX,
        x: 1.5,
        y: 0.1,
        flag: true,
        letter: '"',
    };
    let text = archivist.serialize(&value).unwrap();
    assert!(text.contains("    h=18446744073709551615\n"));
    assert!(text.contains("    letter=\"%22\"\n"));
    assert!(text.contains("    y=0.1\n"));
    let back: Scalars = archivist.deserialize(&text).unwrap();
    assert_eq!(back, value);
}

#[test]
fn test_special_strings() {
    #[derive(Archive, Default, Debug, PartialEq)]
    struct Texts {
        empty: String,
        literal_null: String,
        symbols: String,
        unicode: String,
    }

    let archivist = Archivist::default();
    let value = Texts {
        empty: String::new(),
        literal_null: "null".to_string(),
        symbols: "50% {x=\"y\"} \\ \t }".to_string(),
        unicode: "grüße, 世界".to_string(),
    };
    let text = archivist.serialize(&value).unwrap();
    assert!(text.contains("    empty=\"\"\n"));
    assert!(text.contains("    literal_null=\"null\"\n"));
    let back: Texts = archivist.deserialize(&text).unwrap();
    assert_eq!(back, value);
}

#[derive(Archive, Debug, PartialEq, Clone, Copy, Default)]
enum Tide {
    #[default]
    High,
    #[archive(rename = "low-tide")]
    Low,
    Slack,
}

#[derive(Archive, Default, Debug, PartialEq)]
struct Harbor {
    tide: Tide,
    history: Vec<Tide>,
}

#[test]
fn test_enums() {
    let archivist = Archivist::default();
    let harbor = Harbor {
        tide: Tide::Low,
        history: vec![Tide::High, Tide::Slack],
    };
    let text = archivist.serialize(&harbor).unwrap();
    assert_eq!(
        text,
        "Harbor {\n    history=Vec<Tide> 2 {\n        High\n        Slack\n    }\n    tide=low-tide\n}\n"
    );
    let back: Harbor = archivist.deserialize(&text).unwrap();
    assert_eq!(back, harbor);

    let err = archivist
        .deserialize::<Harbor>("Harbor {\n    tide=Ebb\n}\n")
        .unwrap_err();
    assert_eq!(err.line(), Some(2));
}

#[derive(Archive, Default, Debug, PartialEq)]
struct Grids {
    line: Box<[i32]>,
    plane: Box<[Box<[i32]>]>,
    cube: Box<[Box<[Box<[u8]>]>]>,
}

#[test]
fn test_arrays_up_to_three_dimensions() {
    let archivist = Archivist::default();
    let grids = Grids {
        line: vec![1, 2, 3].into_boxed_slice(),
        plane: vec![vec![1, 2].into_boxed_slice(), vec![3].into_boxed_slice()].into_boxed_slice(),
        cube: vec![
            vec![vec![1, 2].into_boxed_slice()].into_boxed_slice(),
            vec![
                vec![].into_boxed_slice(),
                vec![3, 4, 5].into_boxed_slice(),
            ]
            .into_boxed_slice(),
        ]
        .into_boxed_slice(),
    };
    let text = archivist.serialize(&grids).unwrap();
    assert!(text.contains(
        "    plane=i32[] 2 {\n        i32 2 {\n            1\n            2\n        }\n        i32 1 {\n            3\n        }\n    }\n"
    ));
    assert!(text.contains("    cube=u8[][] 2 {\n"));
    let back: Grids = archivist.deserialize(&text).unwrap();
    assert_eq!(back, grids);
}

#[derive(Archive, Default, Debug, PartialEq)]
struct Item {
    name: String,
    weight: f64,
}

#[derive(Archive, Default, Debug, PartialEq)]
struct Inventory {
    items: Vec<Item>,
    queue: VecDeque<String>,
    matrix: Vec<Vec<i32>>,
    counts: HashMap<String, i32>,
    slots: BTreeMap<i32, Item>,
}

#[test]
fn test_collections_and_maps() {
    let archivist = Archivist::default();
    let mut counts = HashMap::new();
    counts.insert("b".to_string(), 2);
    counts.insert("a".to_string(), 1);
    let mut slots = BTreeMap::new();
    slots.insert(
        3,
        Item {
            name: "rope".to_string(),
            weight: 1.25,
        },
    );
    let inventory = Inventory {
        items: vec![
            Item {
                name: "lamp".to_string(),
                weight: 2.0,
            },
            Item::default(),
        ],
        queue: VecDeque::from(vec!["first".to_string(), "second".to_string()]),
        matrix: vec![vec![1], vec![], vec![2, 3]],
        counts,
        slots,
    };
    let text = archivist.serialize(&inventory).unwrap();
    assert!(text.contains(
        "    counts=HashMap<String,i32> 2 {\n        \"a\"\n        1\n        \"b\"\n        2\n    }\n"
    ));
    assert!(text.contains("    items=Vec<Item> 2 {\n        Item {\n"));
    assert!(text.contains("    matrix=Vec<Vec<i32>> 3 {\n        Vec<i32> 1 {\n"));
    let back: Inventory = archivist.deserialize(&text).unwrap();
    assert_eq!(back, inventory);
    // HashMap iteration order must not leak into the text.
    assert_eq!(archivist.serialize(&back).unwrap(), text);
}

#[derive(Archive, Default, Debug, PartialEq)]
struct Leaf {
    value: i32,
}

#[derive(Archive, Default, Debug, PartialEq)]
struct Branch {
    label: Option<String>,
    left: Option<Box<Leaf>>,
    right: Option<Box<Leaf>>,
    fallback: Leaf,
}

#[test]
fn test_nested_records_with_null_children() {
    let archivist = Archivist::default();
    let branch = Branch {
        label: None,
        left: Some(Box::new(Leaf { value: 1 })),
        right: None,
        fallback: Leaf { value: -4 },
    };
    let text = archivist.serialize(&branch).unwrap();
    assert_eq!(
        text,
        "Branch {\n    fallback=Leaf {\n        value=-4\n    }\n    label=null\n    left=Leaf {\n        value=1\n    }\n    right=null\n}\n"
    );
    let back: Branch = archivist.deserialize(&text).unwrap();
    assert_eq!(back, branch);

    // `null` for a plain record field yields its default.
    let back: Branch = archivist
        .deserialize("Branch {\n    fallback=null\n    label=\"x\"\n}\n")
        .unwrap();
    assert_eq!(back.fallback, Leaf::default());
    assert_eq!(back.label.as_deref(), Some("x"));
}

#[derive(Archive, Default, Debug, PartialEq)]
struct Journal {
    day: NaiveDate,
    stamp: NaiveDateTime,
    history: Vec<NaiveDate>,
}

#[test]
fn test_chrono_values() {
    let archivist = Archivist::default();
    let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let journal = Journal {
        day,
        stamp: day.and_hms_milli_opt(13, 45, 30, 250).unwrap(),
        history: vec![NaiveDate::from_ymd_opt(1999, 12, 31).unwrap()],
    };
    let text = archivist.serialize(&journal).unwrap();
    assert!(text.contains("    day=2024-02-29\n"));
    assert!(text.contains("    stamp=2024-02-29T13:45:30.250\n"));
    let back: Journal = archivist.deserialize(&text).unwrap();
    assert_eq!(back, journal);
}

#[derive(Archive, Default, Debug)]
struct Shared {
    local: Rc<Item>,
    global: Arc<Vec<i32>>,
}

#[test]
fn test_pointers() {
    let archivist = Archivist::default();
    let shared = Shared {
        local: Rc::new(Item {
            name: "coin".to_string(),
            weight: 0.01,
        }),
        global: Arc::new(vec![4, 5]),
    };
    let text = archivist.serialize(&shared).unwrap();
    let back: Shared = archivist.deserialize(&text).unwrap();
    assert!(deep_equal(&back, &shared));
    assert_eq!(back.local.name, "coin");
    assert_eq!(*back.global, vec![4, 5]);
}

#[test]
fn test_top_level_values() {
    let archivist = Archivist::default();
    assert_eq!(archivist.serialize(&5i32).unwrap(), "5\n");
    assert_eq!(archivist.deserialize::<i32>("5\n").unwrap(), 5);

    let text = archivist.serialize(&vec![1u16, 2]).unwrap();
    assert_eq!(text, "Vec<u16> 2 {\n    1\n    2\n}\n");
    assert_eq!(archivist.deserialize::<Vec<u16>>(&text).unwrap(), vec![1, 2]);

    let array: Box<[bool]> = vec![true, false].into_boxed_slice();
    let text = archivist.serialize(&array).unwrap();
    assert_eq!(text, "bool 2 {\n    true\n    false\n}\n");
    assert_eq!(archivist.deserialize::<Box<[bool]>>(&text).unwrap(), array);
}

#[test]
fn test_custom_indent() {
    let archivist = Archivist::default().indent(2);
    let text = archivist.serialize(&Leaf { value: 3 }).unwrap();
    assert_eq!(text, "Leaf {\n  value=3\n}\n");
    // Indentation is not significant on read.
    let back: Leaf = Archivist::default().deserialize(&text).unwrap();
    assert_eq!(back.value, 3);
}
