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

//! Process-wide registry of record types and their field bindings.
//!
//! Bindings are computed on first use of a record type and cached for the
//! lifetime of the process. Computation happens outside the table lock because
//! declaring a type's fields may need the bindings of its parent, and the
//! result is published with insert-if-absent so that concurrent first uses
//! all observe the same `Arc<RecordInfo>`.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, warn};

use super::context::{ReadContext, WriteContext};
use crate::buffer::is_null;
use crate::ensure;
use crate::error::Error;
use crate::serializer::{Archive, Record, RecordType};
use crate::types::{
    is_valid_field_name, is_valid_type_name, FieldType, ScalarKind, ARRAY_SUFFIX, STRING_NAME,
};
use crate::util::escape::{quote, unquote};

type WriteFn = fn(&dyn Any, &mut WriteContext) -> Result<(), Error>;
type ReadFn = fn(&mut dyn Any, &mut ReadContext<'_>, &str) -> Result<(), Error>;
type DiffFn = fn(&dyn Any, &dyn Any, &mut WriteContext) -> Result<(), Error>;
type EqFn = fn(&dyn Any, &dyn Any) -> bool;
type CopyFn = fn(&dyn Any, &mut dyn Any);
type FactoryFn = fn() -> Box<dyn Record>;

/// Type-erased entry points into one `Archive` implementation.
#[derive(Clone, Copy, Debug)]
pub struct Harness {
    write_fn: WriteFn,
    read_fn: ReadFn,
    merge_fn: ReadFn,
    diff_fn: DiffFn,
    eq_fn: EqFn,
    deep_copy_fn: CopyFn,
    shallow_copy_fn: CopyFn,
}

impl Harness {
    pub fn of<T: Archive>() -> Harness {
        Harness {
            write_fn: write_erased::<T>,
            read_fn: read_erased::<T>,
            merge_fn: merge_erased::<T>,
            diff_fn: diff_erased::<T>,
            eq_fn: eq_erased::<T>,
            deep_copy_fn: deep_copy_erased::<T>,
            shallow_copy_fn: shallow_copy_erased::<T>,
        }
    }
}

#[cold]
fn not_a<T>() -> Error {
    Error::invalid_type(format!("field value is not a `{}`", type_name::<T>()))
}

fn downcast<T: 'static>(value: &dyn Any) -> Result<&T, Error> {
    value.downcast_ref::<T>().ok_or_else(not_a::<T>)
}

fn downcast_mut<T: 'static>(value: &mut dyn Any) -> Result<&mut T, Error> {
    value.downcast_mut::<T>().ok_or_else(not_a::<T>)
}

fn write_erased<T: Archive>(value: &dyn Any, context: &mut WriteContext) -> Result<(), Error> {
    downcast::<T>(value)?.write_value(context)
}

fn read_erased<T: Archive>(
    slot: &mut dyn Any,
    context: &mut ReadContext<'_>,
    text: &str,
) -> Result<(), Error> {
    let slot = downcast_mut::<T>(slot)?;
    *slot = T::read_value(context, text)?;
    Ok(())
}

fn merge_erased<T: Archive>(
    slot: &mut dyn Any,
    context: &mut ReadContext<'_>,
    text: &str,
) -> Result<(), Error> {
    downcast_mut::<T>(slot)?.merge_value(context, text)
}

fn diff_erased<T: Archive>(
    source: &dyn Any,
    target: &dyn Any,
    context: &mut WriteContext,
) -> Result<(), Error> {
    downcast::<T>(source)?.diff_value(downcast::<T>(target)?, context)
}

fn eq_erased<T: Archive>(a: &dyn Any, b: &dyn Any) -> bool {
    match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
        (Some(a), Some(b)) => a.archive_eq(b),
        _ => false,
    }
}

fn deep_copy_erased<T: Archive>(source: &dyn Any, target: &mut dyn Any) {
    if let (Some(source), Some(target)) = (source.downcast_ref::<T>(), target.downcast_mut::<T>())
    {
        *target = source.deep_copy();
    }
}

fn shallow_copy_erased<T: Archive>(source: &dyn Any, target: &mut dyn Any) {
    if let (Some(source), Some(target)) = (source.downcast_ref::<T>(), target.downcast_mut::<T>())
    {
        *target = source.shallow_copy();
    }
}

fn eq_native<T: PartialEq + 'static>(a: &dyn Any, b: &dyn Any) -> bool {
    match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn clone_native<T: Clone + 'static>(source: &dyn Any, target: &mut dyn Any) {
    if let (Some(source), Some(target)) = (source.downcast_ref::<T>(), target.downcast_mut::<T>())
    {
        target.clone_from(source);
    }
}

type ToTextFn = Box<dyn Fn(&dyn Any) -> Option<String> + Send + Sync>;
type FromTextFn = Box<dyn Fn(&str, &mut dyn Any) -> Option<Result<(), String>> + Send + Sync>;

/// Text callbacks for a foreign type that does not implement `Archive`.
///
/// The value is archived as a quoted string and is always a value type.
pub struct CustomHandler {
    field_type: FieldType,
    rust_type: TypeId,
    rust_name: &'static str,
    to_text: ToTextFn,
    from_text: FromTextFn,
    eq_fn: EqFn,
    copy_fn: CopyFn,
}

#[derive(Clone, Debug)]
pub struct TypedHandler {
    field_type: FieldType,
    rust_type: TypeId,
    harness: Harness,
}

/// How one field is rendered, parsed, compared and copied.
#[derive(Clone)]
pub enum Handler {
    Typed(TypedHandler),
    Custom(Arc<CustomHandler>),
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Typed(typed) => f.debug_tuple("Typed").field(&typed.field_type).finish(),
            Handler::Custom(custom) => f
                .debug_tuple("Custom")
                .field(&custom.field_type)
                .field(&custom.rust_name)
                .finish(),
        }
    }
}

impl Handler {
    /// The handler of a type implementing `Archive`.
    pub fn of<T: Archive>() -> Handler {
        Handler::Typed(TypedHandler {
            field_type: T::field_type(),
            rust_type: TypeId::of::<T>(),
            harness: Harness::of::<T>(),
        })
    }

    /// A handler archiving `T` through user supplied text conversions.
    ///
    /// ```
    /// use std::net::Ipv4Addr;
    /// use archivist_core::Handler;
    ///
    /// let handler = Handler::custom::<Ipv4Addr>(
    ///     "Ipv4Addr",
    ///     |addr| addr.to_string(),
    ///     |text| text.parse().map_err(|e| format!("{e}")),
    /// );
    /// ```
    pub fn custom<T: Clone + PartialEq + 'static>(
        name: &'static str,
        to_text: fn(&T) -> String,
        from_text: fn(&str) -> Result<T, String>,
    ) -> Handler {
        Handler::Custom(Arc::new(CustomHandler {
            field_type: FieldType::Custom(name),
            rust_type: TypeId::of::<T>(),
            rust_name: type_name::<T>(),
            to_text: Box::new(move |value: &dyn Any| value.downcast_ref::<T>().map(to_text)),
            from_text: Box::new(
                move |text: &str, slot: &mut dyn Any| -> Option<Result<(), String>> {
                    let slot = slot.downcast_mut::<T>()?;
                    Some(from_text(text).map(|value| *slot = value))
                },
            ),
            eq_fn: eq_native::<T>,
            copy_fn: clone_native::<T>,
        }))
    }

    pub fn field_type(&self) -> &FieldType {
        match self {
            Handler::Typed(typed) => &typed.field_type,
            Handler::Custom(custom) => &custom.field_type,
        }
    }

    pub fn rust_type(&self) -> TypeId {
        match self {
            Handler::Typed(typed) => typed.rust_type,
            Handler::Custom(custom) => custom.rust_type,
        }
    }

    pub fn write(&self, value: &dyn Any, context: &mut WriteContext) -> Result<(), Error> {
        match self {
            Handler::Typed(typed) => (typed.harness.write_fn)(value, context),
            Handler::Custom(custom) => {
                let text = (custom.to_text)(value).ok_or_else(|| custom.mismatch())?;
                context.writer.write_scalar(&quote(&text));
                Ok(())
            }
        }
    }

    /// Replaces the slot with a freshly parsed value.
    pub fn read(
        &self,
        slot: &mut dyn Any,
        context: &mut ReadContext<'_>,
        text: &str,
    ) -> Result<(), Error> {
        match self {
            Handler::Typed(typed) => (typed.harness.read_fn)(slot, context, text),
            Handler::Custom(custom) => custom.read(slot, context, text),
        }
    }

    /// Merges the parsed value into the slot.
    pub fn merge(
        &self,
        slot: &mut dyn Any,
        context: &mut ReadContext<'_>,
        text: &str,
    ) -> Result<(), Error> {
        match self {
            Handler::Typed(typed) => (typed.harness.merge_fn)(slot, context, text),
            Handler::Custom(custom) => custom.read(slot, context, text),
        }
    }

    pub fn diff(
        &self,
        source: &dyn Any,
        target: &dyn Any,
        context: &mut WriteContext,
    ) -> Result<(), Error> {
        match self {
            Handler::Typed(typed) => (typed.harness.diff_fn)(source, target, context),
            Handler::Custom(_) => self.write(target, context),
        }
    }

    pub fn eq(&self, a: &dyn Any, b: &dyn Any) -> bool {
        match self {
            Handler::Typed(typed) => (typed.harness.eq_fn)(a, b),
            Handler::Custom(custom) => (custom.eq_fn)(a, b),
        }
    }

    pub fn deep_copy(&self, source: &dyn Any, target: &mut dyn Any) {
        match self {
            Handler::Typed(typed) => (typed.harness.deep_copy_fn)(source, target),
            Handler::Custom(custom) => (custom.copy_fn)(source, target),
        }
    }

    pub fn shallow_copy(&self, source: &dyn Any, target: &mut dyn Any) {
        match self {
            Handler::Typed(typed) => (typed.harness.shallow_copy_fn)(source, target),
            Handler::Custom(custom) => (custom.copy_fn)(source, target),
        }
    }
}

impl CustomHandler {
    #[cold]
    fn mismatch(&self) -> Error {
        Error::invalid_type(format!("field value is not a `{}`", self.rust_name))
    }

    fn read(
        &self,
        slot: &mut dyn Any,
        context: &mut ReadContext<'_>,
        text: &str,
    ) -> Result<(), Error> {
        if is_null(text) {
            return Err(context.unexpected_null(self.field_type.to_string().as_str()));
        }
        let raw = unquote(text).map_err(|reason| context.invalid_value(text, reason))?;
        match (self.from_text)(&raw, slot) {
            Some(Ok(())) => Ok(()),
            Some(Err(reason)) => Err(context.invalid_value(text, reason)),
            None => Err(self.mismatch()),
        }
    }
}

/// One archived field of a record type.
#[derive(Clone, Debug)]
pub struct FieldBinding {
    name: &'static str,
    declared_in: &'static str,
    handler: Handler,
}

impl FieldBinding {
    #[inline(always)]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The record type whose declaration contributed this binding.
    #[inline(always)]
    pub fn declared_in(&self) -> &'static str {
        self.declared_in
    }

    #[inline(always)]
    pub fn field_type(&self) -> &FieldType {
        self.handler.field_type()
    }

    #[inline(always)]
    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// Whether `other` holds a value of the same Rust type under the same name.
    pub fn is_compatible(&self, other: &FieldBinding) -> bool {
        self.name == other.name
            && self.handler.rust_type() == other.handler.rust_type()
            && self.field_type() == other.field_type()
    }
}

/// Collects the bindings of one record type.
pub struct FieldsBuilder {
    owner: &'static str,
    owner_type: TypeId,
    own: Vec<FieldBinding>,
    inherited: Vec<FieldBinding>,
    ancestors: Vec<&'static str>,
}

impl FieldsBuilder {
    fn new(owner: &'static str, owner_type: TypeId) -> FieldsBuilder {
        FieldsBuilder {
            owner,
            owner_type,
            own: Vec::new(),
            inherited: Vec::new(),
            ancestors: Vec::new(),
        }
    }

    /// The type whose fields are being declared.
    pub fn type_name(&self) -> &'static str {
        self.owner
    }

    /// Binds field `name` of type `T`.
    pub fn field<T: Archive>(&mut self, name: &'static str) -> Result<&mut Self, Error> {
        self.field_with(name, Handler::of::<T>())
    }

    /// Binds field `name` with an explicit handler.
    pub fn field_with(&mut self, name: &'static str, handler: Handler) -> Result<&mut Self, Error> {
        ensure!(
            is_valid_field_name(name),
            Error::invalid_type(format!(
                "`{name}` is not a valid field name for `{}`",
                self.owner
            ))
        );
        ensure!(
            !self.own.iter().any(|binding| binding.name == name),
            Error::duplicate_field_registration(self.owner, name)
        );
        self.own.push(FieldBinding {
            name,
            declared_in: self.owner,
            handler,
        });
        Ok(self)
    }

    /// Pulls in the bindings of parent type `P`. Fields declared on the
    /// owner take precedence over inherited fields with the same name.
    pub fn inherit<P: RecordType>(&mut self) -> Result<&mut Self, Error> {
        ensure!(
            TypeId::of::<P>() != self.owner_type,
            Error::invalid_type(format!("`{}` cannot inherit from itself", self.owner))
        );
        let parent = registry().record_info::<P>()?;
        self.ancestors.push(parent.type_name);
        self.ancestors.extend(parent.ancestors.iter().copied());
        self.inherited.extend(parent.bindings.iter().cloned());
        Ok(self)
    }

    fn finish(self) -> (Vec<FieldBinding>, Vec<&'static str>) {
        let mut bindings = self.own;
        for binding in self.inherited {
            if !bindings.iter().any(|own| own.name == binding.name) {
                bindings.push(binding);
            }
        }
        bindings.sort_by(|a, b| a.name.cmp(b.name));
        (bindings, self.ancestors)
    }
}

/// Cached description of a record type.
pub struct RecordInfo {
    type_name: &'static str,
    rust_type: TypeId,
    version: u32,
    min_version: u32,
    ancestors: Vec<&'static str>,
    bindings: Vec<FieldBinding>,
    factory: FactoryFn,
}

impl fmt::Debug for RecordInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordInfo")
            .field("type_name", &self.type_name)
            .field("version", &self.version)
            .field("min_version", &self.min_version)
            .field("ancestors", &self.ancestors)
            .field("bindings", &self.bindings)
            .finish()
    }
}

fn instantiate<T: RecordType>() -> Box<dyn Record> {
    Box::new(T::default())
}

impl RecordInfo {
    fn build<T: RecordType>() -> Result<RecordInfo, Error> {
        ensure!(
            is_valid_type_name(T::TYPE_NAME),
            Error::invalid_type(format!(
                "`{}` is not a valid archive type name for `{}`",
                T::TYPE_NAME,
                type_name::<T>()
            ))
        );
        ensure!(
            T::MIN_VERSION <= T::VERSION,
            Error::invalid_type(format!(
                "`{}` declares minimum version {} above its version {}",
                T::TYPE_NAME,
                T::MIN_VERSION,
                T::VERSION
            ))
        );
        let mut fields = FieldsBuilder::new(T::TYPE_NAME, TypeId::of::<T>());
        T::declare_fields(&mut fields)?;
        let (bindings, ancestors) = fields.finish();
        Ok(RecordInfo {
            type_name: T::TYPE_NAME,
            rust_type: TypeId::of::<T>(),
            version: T::VERSION,
            min_version: T::MIN_VERSION,
            ancestors,
            bindings,
            factory: instantiate::<T>,
        })
    }

    #[inline(always)]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline(always)]
    pub fn rust_type(&self) -> TypeId {
        self.rust_type
    }

    /// The version counter written on save.
    #[inline(always)]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// The oldest stored version this type still loads.
    #[inline(always)]
    pub fn min_version(&self) -> u32 {
        self.min_version
    }

    /// Parent type names, nearest first.
    pub fn ancestors(&self) -> &[&'static str] {
        &self.ancestors
    }

    /// Bindings in field name order.
    pub fn bindings(&self) -> &[FieldBinding] {
        &self.bindings
    }

    pub fn binding(&self, name: &str) -> Option<&FieldBinding> {
        self.bindings
            .binary_search_by(|binding| binding.name.cmp(name))
            .ok()
            .map(|index| &self.bindings[index])
    }

    /// A default-constructed instance of the type.
    pub fn instantiate(&self) -> Box<dyn Record> {
        (self.factory)()
    }

    /// Whether the two types are equal or one descends from the other.
    pub fn is_related_to(&self, other: &RecordInfo) -> bool {
        self.type_name == other.type_name
            || self.ancestors.contains(&other.type_name)
            || other.ancestors.contains(&self.type_name)
    }
}

/// What a type name found in the text refers to.
#[derive(Clone, Debug)]
pub enum TypeDescriptor {
    Builtin(FieldType),
    Record(Arc<RecordInfo>),
    Array(Box<TypeDescriptor>),
    Generic {
        name: &'static str,
        arguments: Vec<TypeDescriptor>,
    },
}

const GENERIC_TYPES: [(&str, usize); 4] =
    [("Vec", 1), ("VecDeque", 1), ("HashMap", 2), ("BTreeMap", 2)];

/// Splits `a,Vec<b>,HashMap<c,d>` at its top-level commas.
fn split_arguments(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, c) in list.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&list[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&list[start..]);
    parts
}

#[derive(Default)]
struct Tables {
    by_type: HashMap<TypeId, Arc<RecordInfo>>,
    by_name: HashMap<&'static str, Arc<RecordInfo>>,
}

#[derive(Default)]
pub struct TypeResolver {
    tables: RwLock<Tables>,
}

/// The process-wide registry.
pub fn registry() -> &'static TypeResolver {
    static REGISTRY: OnceLock<TypeResolver> = OnceLock::new();
    REGISTRY.get_or_init(TypeResolver::default)
}

impl TypeResolver {
    fn read_tables(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_tables(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The cached description of `T`, computed on first use.
    pub fn record_info<T: RecordType>(&self) -> Result<Arc<RecordInfo>, Error> {
        let key = TypeId::of::<T>();
        if let Some(info) = self.read_tables().by_type.get(&key) {
            return Ok(Arc::clone(info));
        }
        let built = Arc::new(RecordInfo::build::<T>()?);
        let mut tables = self.write_tables();
        if let Some(existing) = tables.by_type.get(&key) {
            return Ok(Arc::clone(existing));
        }
        match tables.by_name.get(built.type_name) {
            Some(_) => warn!(
                "archive type name `{}` of `{}` is already taken by another type; \
                 it will not be resolvable by name",
                built.type_name,
                type_name::<T>(),
            ),
            None => {
                tables.by_name.insert(built.type_name, Arc::clone(&built));
            }
        }
        tables.by_type.insert(key, Arc::clone(&built));
        debug!(
            "registered `{}` (version {}) with {} field binding(s)",
            built.type_name,
            built.version,
            built.bindings.len()
        );
        Ok(built)
    }

    /// Registers `T` eagerly, so that it resolves by name before first use.
    pub fn register<T: RecordType>(&self) -> Result<Arc<RecordInfo>, Error> {
        self.record_info::<T>()
    }

    pub fn record_by_name(&self, name: &str) -> Option<Arc<RecordInfo>> {
        self.read_tables().by_name.get(name).cloned()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.read_tables().by_name.contains_key(name)
    }

    /// Resolves a type name as written in a block header.
    pub fn lookup(&self, name: &str) -> Option<TypeDescriptor> {
        if let Some(component) = name.strip_suffix(ARRAY_SUFFIX) {
            return self
                .lookup(component)
                .map(|component| TypeDescriptor::Array(Box::new(component)));
        }
        if let Some(kind) = ScalarKind::from_name(name) {
            return Some(TypeDescriptor::Builtin(FieldType::Scalar(kind)));
        }
        if name == STRING_NAME {
            return Some(TypeDescriptor::Builtin(FieldType::Str));
        }
        if let Some(info) = self.record_by_name(name) {
            return Some(TypeDescriptor::Record(info));
        }
        let (outer, rest) = name.split_once('<')?;
        let inner = rest.strip_suffix('>')?;
        let (generic, arity) = GENERIC_TYPES.iter().find(|(generic, _)| *generic == outer)?;
        let arguments = split_arguments(inner)
            .into_iter()
            .map(|argument| self.lookup(argument))
            .collect::<Option<Vec<_>>>()?;
        if arguments.len() != *arity {
            return None;
        }
        Some(TypeDescriptor::Generic {
            name: *generic,
            arguments,
        })
    }

    /// Like [`TypeResolver::lookup`], failing with `TypeNotFound` at `line`,
    /// the line of the text the name was read from.
    pub fn resolve(&self, name: &str, line: usize) -> Result<TypeDescriptor, Error> {
        self.lookup(name)
            .ok_or_else(|| Error::type_not_found(line, name))
    }
}
