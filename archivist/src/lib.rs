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

//! # Archivist
//!
//! Archivist turns graphs of Rust values into an indented, line-oriented
//! text format and back. On top of plain archiving it can merge text into
//! live instances, compute the difference between two graphs as a patch,
//! apply such patches, and copy or compare whole graphs.
//!
//! ## Key Features
//!
//! - **Readable text**: one `name=value` line per field, sorted by name,
//!   with nested blocks for records, arrays, collections and maps
//! - **Instance reuse**: with `keep_instances`, loading merges into the
//!   existing graph, keeping boxes, records and containers alive
//! - **Diff and patch**: `diff(a, b)` emits only the fields that differ and
//!   `apply_patch` replays them onto `a`
//! - **Versioning**: records carry a version and refuse data older than
//!   their minimum version
//! - **Inheritance**: a record can embed a base record whose fields it
//!   inherits and may override
//!
//! ## Quick Start
//!
//! ```rust
//! use archivist::{Archive, Archivist, Error};
//!
//! #[derive(Archive, Default, Debug, PartialEq)]
//! struct Stats {
//!     hp: i32,
//!     mana: i32,
//! }
//!
//! #[derive(Archive, Default, Debug, PartialEq)]
//! struct Hero {
//!     name: String,
//!     stats: Stats,
//!     tags: Vec<String>,
//! }
//!
//! # fn main() -> Result<(), Error> {
//! let archivist = Archivist::default();
//! let hero = Hero {
//!     name: "Ana".to_string(),
//!     stats: Stats { hp: 30, mana: 5 },
//!     tags: vec!["scout".to_string()],
//! };
//! let text = archivist.serialize(&hero)?;
//! assert_eq!(
//!     text,
//!     "Hero {\n    name=\"Ana\"\n    stats=Stats {\n        hp=30\n        mana=5\n    }\n    \
//!      tags=Vec<String> 1 {\n        \"scout\"\n    }\n}\n"
//! );
//! let back: Hero = archivist.deserialize(&text)?;
//! assert_eq!(back, hero);
//! # Ok(())
//! # }
//! ```
//!
//! ## Diff and Patch
//!
//! ```rust
//! use archivist::{Archive, Archivist, Error};
//!
//! #[derive(Archive, Default, Debug, PartialEq)]
//! struct Settings {
//!     volume: u8,
//!     muted: bool,
//!     profile: String,
//! }
//!
//! # fn main() -> Result<(), Error> {
//! let archivist = Archivist::default();
//! let mut current = Settings { volume: 3, muted: false, profile: "default".into() };
//! let wanted = Settings { volume: 7, muted: false, profile: "default".into() };
//!
//! let patch = archivist.diff(&current, &wanted)?;
//! assert_eq!(patch, "Settings {\n    volume=7\n}\n");
//!
//! archivist.apply_patch(&mut current, &patch)?;
//! assert_eq!(current, wanted);
//! # Ok(())
//! # }
//! ```
//!
//! ## Merging into live instances
//!
//! ```rust
//! use archivist::{Archive, Archivist, Error};
//!
//! #[derive(Archive, Default, Debug)]
//! struct Node {
//!     label: String,
//!     next: Option<Box<Node>>,
//! }
//!
//! # fn main() -> Result<(), Error> {
//! let archivist = Archivist::default().keep_instances(true);
//! let mut head = Node {
//!     label: "a".into(),
//!     next: Some(Box::new(Node { label: "b".into(), next: None })),
//! };
//! let before: *const Node = &**head.next.as_ref().unwrap();
//!
//! archivist.deserialize_into(
//!     "Node {\n  label=\"a\"\n  next=Node {\n    label=\"c\"\n    next=null\n  }\n}\n",
//!     &mut head,
//! )?;
//!
//! let after: *const Node = &**head.next.as_ref().unwrap();
//! assert_eq!(before, after);
//! assert_eq!(head.next.as_ref().unwrap().label, "c");
//! # Ok(())
//! # }
//! ```
//!
//! ## Supported Types
//!
//! - Integers `i8`..`i64` and `u8`..`u64`, `f32`, `f64`, `bool`, `char`
//! - `String`
//! - `chrono::NaiveDate` and `chrono::NaiveDateTime`
//! - Derived records and unit-only enums
//! - `Box<[T]>` arrays, nested up to any depth
//! - `Vec<T>`, `VecDeque<T>`, `HashMap<K, V>` and `BTreeMap<K, V>`
//! - `Option<T>`, `Box<T>`, `Rc<T>`, `Arc<T>`
//! - `Box<dyn Record>` for fields whose record type is only known at runtime
//! - Any other type through a text handler, see [`Handler::custom`]
//!
//! ## Text Format
//!
//! ```text
//! Squad {
//!     @version=2
//!     leader=Unit {
//!         name="Ana"
//!     }
//!     grid=i32[] 2 {
//!         i32 2 {
//!             1
//!             2
//!         }
//!         null
//!     }
//!     roster=HashMap<String,i32> 1 {
//!         "Ana"
//!         30
//!     }
//!     motto=null
//! }
//! ```
//!
//! Arrays open with their component type and element count, collections
//! and maps with their full type name and count. Blank lines, leading
//! whitespace and lines starting with `#` are ignored on read.
//!
//! ## Errors
//!
//! Every data error reports the 1-based line of the input it was raised on,
//! see [`Error::line`].

pub use archivist_core::{
    deep_copy, deep_equal, registry, shallow_copy, Archive, Archivist, Config, Error, FieldBinding,
    FieldType, FieldsBuilder, Handler, ReadContext, Record, RecordInfo, RecordType, ScalarKind,
    TypeDescriptor, TypeResolver, WriteContext,
};
pub use archivist_derive::Archive;

pub use archivist_core;
