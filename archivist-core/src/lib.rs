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

//! # Archivist Core
//!
//! Core implementation of the archivist object-graph archiving engine. It
//! turns graphs of records, enums, scalars, arrays, collections and maps into
//! an indented, line-oriented text format and back, and on top of that can
//! merge text into live instances, diff two graphs into a patch, apply
//! patches, and deep-copy, shallow-copy or deep-compare graphs.
//!
//! ## Architecture
//!
//! - **`archivist`**: the [`Archivist`] entry point and its configuration builder
//! - **`buffer`**: line-oriented text `Writer` and `Reader`
//! - **`serializer`**: the [`Archive`] trait, its implementations and the record walkers
//! - **`resolver`**: the process-wide type registry and the read/write contexts
//! - **`types`**: [`FieldType`], the value categories of fields
//! - **`error`**: [`Error`], carrying input line numbers for data errors
//! - **`util`**: string escaping and whole-graph helpers
//!
//! ## Text format
//!
//! ```text
//! Squad {
//!     @version=2
//!     leader=Unit {
//!         name="Ana"
//!         hp=30
//!     }
//!     members=Vec<Unit> 0 {
//!     }
//!     motto=null
//! }
//! ```
//!
//! Records open with `<TypeName> {`, arrays and collections carry an element
//! count in their header, fields are `name=value` lines sorted by name, and
//! `null` marks an absent value. Strings are double-quoted and escaped so
//! that every value fits on one line.
//!
//! ## Usage
//!
//! This crate is typically used through the `archivist` crate, which also
//! exports `#[derive(Archive)]`. Types can be described by hand as well:
//!
//! ```rust
//! use std::any::Any;
//! use std::sync::Arc;
//! use archivist_core::{
//!     registry, Archive, Archivist, Error, FieldType, FieldsBuilder, ReadContext, Record,
//!     RecordInfo, RecordType, WriteContext,
//! };
//! use archivist_core::serializer::record;
//!
//! #[derive(Default, Debug, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl RecordType for Point {
//!     const TYPE_NAME: &'static str = "Point";
//!
//!     fn declare_fields(fields: &mut FieldsBuilder) -> Result<(), Error> {
//!         fields.field::<i32>("x")?.field::<i32>("y")?;
//!         Ok(())
//!     }
//! }
//!
//! impl Record for Point {
//!     fn record_info(&self) -> Result<Arc<RecordInfo>, Error> {
//!         registry().record_info::<Self>()
//!     }
//!     fn record_type_name(&self) -> &'static str {
//!         Self::TYPE_NAME
//!     }
//!     fn field_ref(&self, name: &str) -> Option<&dyn Any> {
//!         match name {
//!             "x" => Some(&self.x as &dyn Any),
//!             "y" => Some(&self.y as &dyn Any),
//!             _ => None,
//!         }
//!     }
//!     fn field_mut(&mut self, name: &str) -> Option<&mut dyn Any> {
//!         match name {
//!             "x" => Some(&mut self.x as &mut dyn Any),
//!             "y" => Some(&mut self.y as &mut dyn Any),
//!             _ => None,
//!         }
//!     }
//!     fn boxed_default(&self) -> Box<dyn Record> {
//!         Box::new(Point::default())
//!     }
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//!     fn as_any_mut(&mut self) -> &mut dyn Any {
//!         self
//!     }
//! }
//!
//! impl Archive for Point {
//!     fn field_type() -> FieldType {
//!         FieldType::Record(Self::TYPE_NAME)
//!     }
//!     fn write_value(&self, context: &mut WriteContext) -> Result<(), Error> {
//!         record::write(self, context)
//!     }
//!     fn read_value(context: &mut ReadContext<'_>, text: &str) -> Result<Self, Error> {
//!         record::read(context, text)
//!     }
//!     fn merge_value(&mut self, context: &mut ReadContext<'_>, text: &str) -> Result<(), Error> {
//!         record::merge(self, context, text)
//!     }
//!     fn diff_value(&self, target: &Self, context: &mut WriteContext) -> Result<(), Error> {
//!         record::diff(self, target, context)
//!     }
//!     fn archive_eq(&self, other: &Self) -> bool {
//!         record::equals(self, other)
//!     }
//!     fn deep_copy(&self) -> Self {
//!         record::deep_copy(self)
//!     }
//! }
//!
//! let archivist = Archivist::default();
//! let text = archivist.serialize(&Point { x: 1, y: -2 }).unwrap();
//! assert_eq!(text, "Point {\n    x=1\n    y=-2\n}\n");
//! assert_eq!(archivist.deserialize::<Point>(&text).unwrap(), Point { x: 1, y: -2 });
//! ```

pub mod archivist;
pub mod buffer;
pub mod config;
pub mod error;
pub mod resolver;
pub mod serializer;
pub mod types;
pub mod util;

pub use archivist::Archivist;
pub use config::Config;
pub use error::Error;
pub use resolver::context::{ReadContext, WriteContext};
pub use resolver::type_resolver::{
    registry, FieldBinding, FieldsBuilder, Handler, RecordInfo, TypeDescriptor, TypeResolver,
};
pub use serializer::{Archive, Record, RecordType};
pub use types::{FieldType, ScalarKind};
pub use util::{deep_copy, deep_equal, shallow_copy};
