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

use std::fmt;

/// Literal written for an absent value. Strings are quoted, so `"null"` never collides.
pub const NULL: &str = "null";

/// Pseudo-field carrying a record's version counter.
pub const VERSION_KEY: &str = "@version";

/// Suffix that turns a component type name into an array type name.
pub const ARRAY_SUFFIX: &str = "[]";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Bool,
    Char,
    Date,
    DateTime,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 14] = [
        ScalarKind::I8,
        ScalarKind::I16,
        ScalarKind::I32,
        ScalarKind::I64,
        ScalarKind::U8,
        ScalarKind::U16,
        ScalarKind::U32,
        ScalarKind::U64,
        ScalarKind::F32,
        ScalarKind::F64,
        ScalarKind::Bool,
        ScalarKind::Char,
        ScalarKind::Date,
        ScalarKind::DateTime,
    ];

    /// The name used in block headers and by the registry.
    pub const fn name(self) -> &'static str {
        match self {
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::Bool => "bool",
            ScalarKind::Char => "char",
            ScalarKind::Date => "NaiveDate",
            ScalarKind::DateTime => "NaiveDateTime",
        }
    }

    pub fn from_name(name: &str) -> Option<ScalarKind> {
        ScalarKind::ALL.iter().copied().find(|kind| kind.name() == name)
    }
}

/// Name of the built-in string type.
pub const STRING_NAME: &str = "String";

/// Name written for `Box<dyn Record>` slots that have no concrete type yet.
pub const DYN_RECORD_NAME: &str = "Record";

/// Value category of a field, resolved once from its static Rust type.
///
/// Pointer wrappers (`Box`, `Rc`, `Arc`) are transparent and report the
/// category of what they point to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    Scalar(ScalarKind),
    Str,
    Enum(&'static str),
    Record(&'static str),
    /// A record whose concrete type is only known at runtime.
    DynRecord,
    Array(Box<FieldType>),
    Collection(&'static str, Box<FieldType>),
    Map(&'static str, Box<FieldType>, Box<FieldType>),
    Optional(Box<FieldType>),
    /// A foreign type archived through user callbacks as a quoted string.
    Custom(&'static str),
}

impl FieldType {
    /// The name written in block headers for values of this type.
    pub fn type_name(&self) -> String {
        self.to_string()
    }

    /// Value types are replaced on merge instead of being merged into.
    pub fn is_value_type(&self) -> bool {
        match self {
            FieldType::Scalar(_) | FieldType::Str | FieldType::Enum(_) | FieldType::Custom(_) => {
                true
            }
            FieldType::Optional(inner) => inner.is_value_type(),
            FieldType::Record(_)
            | FieldType::DynRecord
            | FieldType::Array(_)
            | FieldType::Collection(..)
            | FieldType::Map(..) => false,
        }
    }

    /// The innermost type once arrays and options are peeled off.
    pub fn component(&self) -> &FieldType {
        match self {
            FieldType::Array(inner) | FieldType::Optional(inner) => inner.component(),
            other => other,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Scalar(kind) => f.write_str(kind.name()),
            FieldType::Str => f.write_str(STRING_NAME),
            FieldType::Enum(name) | FieldType::Record(name) | FieldType::Custom(name) => {
                f.write_str(name)
            }
            FieldType::DynRecord => f.write_str(DYN_RECORD_NAME),
            FieldType::Array(component) => write!(f, "{component}{ARRAY_SUFFIX}"),
            FieldType::Collection(name, element) => write!(f, "{name}<{element}>"),
            FieldType::Map(name, key, value) => write!(f, "{name}<{key},{value}>"),
            FieldType::Optional(inner) => write!(f, "{inner}"),
        }
    }
}

/// Whether `name` may be used as a record type name.
///
/// Names end up in block headers, so they must not contain characters the
/// grammar gives meaning to, and must not shadow a built-in name.
pub fn is_valid_type_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | ':' | '$' | '-'))
        && name != NULL
        && name != STRING_NAME
        && name != DYN_RECORD_NAME
        && ScalarKind::from_name(name).is_none()
}

/// Whether `name` may be used as a field name.
pub fn is_valid_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '-' | '$'))
}
