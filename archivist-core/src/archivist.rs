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

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;

use log::debug;

use crate::config::Config;
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::type_resolver::{registry, RecordInfo};
use crate::serializer::record;
use crate::serializer::{Archive, Record, RecordType};

/// Entry point for archiving, merging and diffing object graphs.
///
/// An `Archivist` only carries configuration; the type registry is process
/// wide, so any number of instances may be created and shared freely.
///
/// # Examples
///
/// ```rust, ignore
/// use archivist::{Archive, Archivist};
///
/// #[derive(Archive, Default)]
/// struct Unit {
///     name: String,
///     hit_points: i32,
/// }
///
/// let archivist = Archivist::default();
/// let unit = Unit { name: "scout".into(), hit_points: 40 };
/// let text = archivist.serialize(&unit)?;
/// let back: Unit = archivist.deserialize(&text)?;
/// ```
///
/// Custom configuration:
///
/// ```rust
/// use archivist_core::Archivist;
///
/// let archivist = Archivist::default()
///     .keep_instances(true)
///     .strict(true)
///     .indent(2)
///     .max_depth(64);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Archivist {
    config: Config,
}

impl Archivist {
    /// Makes [`Archivist::deserialize_into`] merge into the target instead of
    /// replacing it. Nested records, boxes, lists and maps are then reused
    /// wherever the incoming text allows it.
    pub fn keep_instances(mut self, keep_instances: bool) -> Self {
        self.config.keep_instances = keep_instances;
        self
    }

    /// Makes unknown field names fail the load instead of being skipped.
    pub fn strict(mut self, strict: bool) -> Self {
        self.config.strict = strict;
        self
    }

    /// Spaces written per nesting level. Indentation is ignored on read.
    pub fn indent(mut self, indent: usize) -> Self {
        self.config.indent = indent;
        self
    }

    /// Maximum block nesting accepted on read.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registers `T` so that it resolves by name before its first use,
    /// which `Box<dyn Record>` slots need.
    pub fn register<T: RecordType>(&self) -> Result<Arc<RecordInfo>, Error> {
        registry().register::<T>()
    }

    pub fn serialize<T: Archive>(&self, value: &T) -> Result<String, Error> {
        let mut context = WriteContext::new(&self.config);
        value.write_value(&mut context)?;
        Ok(context.into_string())
    }

    pub fn serialize_to<T: Archive, W: Write>(
        &self,
        value: &T,
        mut writer: W,
    ) -> Result<(), Error> {
        let text = self.serialize(value)?;
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Parses a fresh value.
    pub fn deserialize<T: Archive>(&self, text: &str) -> Result<T, Error> {
        let mut context = ReadContext::new(text, &self.config);
        let root = context.reader.read_root()?;
        let value = T::read_value(&mut context, root)?;
        context.reader.finish()?;
        Ok(value)
    }

    pub fn deserialize_from<T: Archive, R: Read>(&self, mut reader: R) -> Result<T, Error> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        self.deserialize(&text)
    }

    /// Parses into `target`, merging when `keep_instances` is on.
    pub fn deserialize_into<T: Archive>(&self, text: &str, target: &mut T) -> Result<(), Error> {
        let context = ReadContext::new(text, &self.config);
        self.read_into(context, target, self.config.keep_instances)
    }

    fn read_into<T: Archive>(
        &self,
        mut context: ReadContext<'_>,
        target: &mut T,
        merge: bool,
    ) -> Result<(), Error> {
        let root = context.reader.read_root()?;
        if merge {
            target.merge_value(&mut context, root)?;
        } else {
            *target = T::read_value(&mut context, root)?;
        }
        context.reader.finish()
    }

    /// Computes a patch turning `source` into `target` on the fields both
    /// share. The types must be equal or one must descend from the other.
    pub fn diff(&self, source: &dyn Record, target: &dyn Record) -> Result<String, Error> {
        let source_info = source.record_info()?;
        let target_info = target.record_info()?;
        if !source_info.is_related_to(&target_info) {
            return Err(Error::incompatible_types(
                source_info.type_name(),
                target_info.type_name(),
            ));
        }
        let mut context = WriteContext::new(&self.config);
        context.writer.open_block(source_info.type_name(), None);
        record::diff_fields(source, &source_info, target, &target_info, &mut context)?;
        context.writer.close_block();
        Ok(context.into_string())
    }

    /// Applies a patch produced by [`Archivist::diff`], always merging.
    /// Records in the patch that carry no version counter skip the version
    /// check, since diffs only hold changed fields.
    pub fn apply_patch<T: Archive>(&self, target: &mut T, patch: &str) -> Result<(), Error> {
        let context = ReadContext::for_patch(patch, &self.config);
        self.read_into(context, target, true)
    }

    pub fn save<T: Archive, P: AsRef<Path>>(&self, value: &T, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.serialize_to(value, BufWriter::new(file))?;
        debug!("saved `{}` to {}", T::type_name(), path.display());
        Ok(())
    }

    pub fn load<T: Archive, P: AsRef<Path>>(&self, path: P) -> Result<T, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        debug!("loading `{}` from {}", T::type_name(), path.display());
        self.deserialize(&text)
    }
}
