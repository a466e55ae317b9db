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

//! Walkers over the field bindings of records.
//!
//! Derived `Archive` impls for records delegate here; `Box<dyn Record>` and
//! [`crate::Archivist::diff`] use the type-erased halves directly.

use std::any::Any;
use std::sync::Arc;

use crate::buffer::is_null;
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::type_resolver::{registry, RecordInfo};
use crate::serializer::skip::skip_unknown_field;
use crate::serializer::{Record, RecordType};
use crate::types::VERSION_KEY;

#[cold]
fn unbound(info: &RecordInfo, field: &str) -> Error {
    Error::invalid_type(format!(
        "`{}` binds field `{field}` but exposes no accessor for it",
        info.type_name()
    ))
}

fn field_ref<'r>(
    record: &'r dyn Record,
    info: &RecordInfo,
    name: &str,
) -> Result<&'r dyn Any, Error> {
    record.field_ref(name).ok_or_else(|| unbound(info, name))
}

pub fn write<T: RecordType>(this: &T, context: &mut WriteContext) -> Result<(), Error> {
    let info = registry().record_info::<T>()?;
    write_record(this, &info, context)
}

pub fn write_record(
    record: &dyn Record,
    info: &RecordInfo,
    context: &mut WriteContext,
) -> Result<(), Error> {
    context.writer.open_block(info.type_name(), None);
    write_fields(record, info, context)?;
    context.writer.close_block();
    Ok(())
}

/// Writes the version pseudo-field (when non-zero) and every binding in name order.
pub fn write_fields(
    record: &dyn Record,
    info: &RecordInfo,
    context: &mut WriteContext,
) -> Result<(), Error> {
    if info.version() > 0 {
        context.writer.write_field_name(VERSION_KEY);
        context.writer.write_scalar(&info.version().to_string());
    }
    for binding in info.bindings() {
        let value = field_ref(record, info, binding.name())?;
        context.writer.write_field_name(binding.name());
        binding.handler().write(value, context)?;
    }
    Ok(())
}

/// Opens the block of a statically typed record, checking its type name.
fn open(context: &mut ReadContext<'_>, text: &str, info: &RecordInfo) -> Result<(), Error> {
    let header = context.open_record_block(text)?;
    context.check_type(info.type_name(), header.type_name)
}

/// Reads a fresh record. `null` yields the default value.
pub fn read<T: RecordType>(context: &mut ReadContext<'_>, text: &str) -> Result<T, Error> {
    if is_null(text) {
        return Ok(T::default());
    }
    let info = registry().record_info::<T>()?;
    open(context, text, &info)?;
    let mut value = T::default();
    read_fields(&mut value, &info, context, false)?;
    Ok(value)
}

/// Reads a record into `this`, field by field.
pub fn merge<T: RecordType>(
    this: &mut T,
    context: &mut ReadContext<'_>,
    text: &str,
) -> Result<(), Error> {
    if is_null(text) {
        *this = T::default();
        return Ok(());
    }
    let info = registry().record_info::<T>()?;
    open(context, text, &info)?;
    read_fields(this, &info, context, true)
}

/// Reads field lines up to and including the closing brace of the block.
///
/// With `merge` the existing field values are merged into, otherwise they
/// are replaced. The version gate runs once the block is consumed: a missing
/// counter means version 0, except inside a patch, where it skips the gate.
pub fn read_fields(
    record: &mut dyn Record,
    info: &RecordInfo,
    context: &mut ReadContext<'_>,
    merge: bool,
) -> Result<(), Error> {
    let mut stored_version = None;
    while let Some((name, text)) = context.reader.read_field()? {
        if name == VERSION_KEY {
            let version = text
                .parse::<u32>()
                .map_err(|e| context.invalid_value(text, e.to_string()))?;
            stored_version = Some((version, context.line()));
            continue;
        }
        let Some(binding) = info.binding(name) else {
            skip_unknown_field(context, info.type_name(), name, text)?;
            continue;
        };
        let slot = record.field_mut(name).ok_or_else(|| unbound(info, name))?;
        if merge {
            binding.handler().merge(slot, context, text)?;
        } else {
            binding.handler().read(slot, context, text)?;
        }
    }
    let (version, line) = match stored_version {
        Some(stored) => stored,
        None if context.is_patching() => return Ok(()),
        None => (0, context.line()),
    };
    if version < info.min_version() {
        return Err(Error::version_too_old(
            line,
            info.type_name(),
            version,
            info.min_version(),
        ));
    }
    Ok(())
}

pub fn diff<T: RecordType>(
    this: &T,
    target: &T,
    context: &mut WriteContext,
) -> Result<(), Error> {
    let info = registry().record_info::<T>()?;
    context.writer.open_block(info.type_name(), None);
    diff_fields(this, &info, target, &info, context)?;
    context.writer.close_block();
    Ok(())
}

/// Writes the fields `source` and `target` share whose values differ, taking
/// the values from `target`.
pub fn diff_fields(
    source: &dyn Record,
    source_info: &RecordInfo,
    target: &dyn Record,
    target_info: &RecordInfo,
    context: &mut WriteContext,
) -> Result<(), Error> {
    for binding in source_info.bindings() {
        let Some(target_binding) = target_info.binding(binding.name()) else {
            continue;
        };
        if !binding.is_compatible(target_binding) {
            continue;
        }
        let old = field_ref(source, source_info, binding.name())?;
        let new = field_ref(target, target_info, binding.name())?;
        if binding.handler().eq(old, new) {
            continue;
        }
        context.writer.write_field_name(binding.name());
        binding.handler().diff(old, new, context)?;
    }
    Ok(())
}

/// Bindings for the infallible walkers (equality and copies).
///
/// # Panics
///
/// Panics with the registration error when the record's field declaration
/// is invalid, e.g. a field name declared twice.
pub fn expect_info(record: &dyn Record) -> Arc<RecordInfo> {
    match record.record_info() {
        Ok(info) => info,
        Err(e) => panic!("`{}` cannot be registered: {e}", record.record_type_name()),
    }
}

pub fn equals<T: RecordType>(this: &T, other: &T) -> bool {
    fields_equal(this, other, &expect_info(this))
}

/// Field-wise equality over the bound fields of `info`.
pub fn fields_equal(a: &dyn Record, b: &dyn Record, info: &RecordInfo) -> bool {
    info.bindings().iter().all(|binding| {
        match (a.field_ref(binding.name()), b.field_ref(binding.name())) {
            (Some(a), Some(b)) => binding.handler().eq(a, b),
            _ => false,
        }
    })
}

pub fn deep_copy<T: RecordType>(this: &T) -> T {
    copy(this, true)
}

pub fn shallow_copy<T: RecordType>(this: &T) -> T {
    copy(this, false)
}

fn copy<T: RecordType>(this: &T, deep: bool) -> T {
    let info = expect_info(this);
    let mut copy = T::default();
    copy_fields(this, &mut copy, &info, deep);
    copy
}

/// Copies every bound field from `source` into `target`. Unbound fields of
/// `target` keep their current value.
pub fn copy_fields(source: &dyn Record, target: &mut dyn Record, info: &RecordInfo, deep: bool) {
    for binding in info.bindings() {
        let name = binding.name();
        let (Some(from), Some(to)) = (source.field_ref(name), target.field_mut(name)) else {
            continue;
        };
        if deep {
            binding.handler().deep_copy(from, to);
        } else {
            binding.handler().shallow_copy(from, to);
        }
    }
}

/// Copies a record known only at runtime into a new instance of its type.
pub fn copy_record(record: &dyn Record, deep: bool) -> Box<dyn Record> {
    let info = expect_info(record);
    let mut copy = record.boxed_default();
    copy_fields(record, &mut *copy, &info, deep);
    copy
}
