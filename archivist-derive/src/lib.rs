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

//! # Archivist Derive Macros
//!
//! This crate provides `#[derive(Archive)]` for the archivist archiving
//! engine. It generates the trait implementations that let a type take part
//! in serialization, merging, diffing, copying and comparison.
//!
//! **Supported Types:**
//! - Structs with named fields, and unit structs (records)
//! - Enums whose variants are all unit variants
//!
//! Generic types, tuple structs and enums with data are rejected at compile
//! time.
//!
//! ## Records
//!
//! A record must also implement `Default`; deserialization starts from the
//! default value and overwrites the fields it finds.
//!
//! ```ignore
//! use archivist::Archive;
//!
//! #[derive(Archive, Default, Debug, PartialEq)]
//! struct Entity {
//!     id: i64,
//!     label: String,
//! }
//!
//! #[derive(Archive, Default, Debug, PartialEq)]
//! #[archive(name = "game.Unit", version = 2, min_version = 1)]
//! struct Unit {
//!     #[archive(parent)]
//!     base: Entity,
//!     hp: i32,
//!     #[archive(rename = "tag_list")]
//!     tags: Vec<String>,
//!     #[archive(skip)]
//!     cached_score: u64,
//! }
//! ```
//!
//! The macro generates:
//! - `RecordType`, holding the type name, version constants and the field
//!   declarations
//! - `Record`, the object-safe field accessors used by type-erased code
//! - `Archive`, delegating to the record walkers in `archivist_core`
//!
//! ### Container attributes
//!
//! - `name = "..."`: the type name written to the text, the struct name by default
//! - `version = N`: the version stored in `@version` (0 writes none)
//! - `min_version = N`: the oldest stored version accepted on load
//!
//! ### Field attributes
//!
//! - `skip`: the field is neither written, read, diffed, copied nor compared
//! - `parent`: the field holds the base record. Its fields are inherited, and
//!   a field of the deriving record with the same name takes precedence.
//! - `rename = "..."`: the field name used in the text
//!
//! ## Enums
//!
//! Variants are written by name. `#[archive(rename = "...")]` on a variant
//! changes the written name.
//!
//! ```ignore
//! use archivist::Archive;
//!
//! #[derive(Archive, Debug, PartialEq)]
//! enum Tide {
//!     High,
//!     #[archive(rename = "low-tide")]
//!     Low,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod object;
mod util;

#[proc_macro_derive(Archive, attributes(archive))]
pub fn proc_macro_derive_archive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    object::derive_archive(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
