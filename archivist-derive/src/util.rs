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

//! Parsing of `#[archive(...)]` attributes.

use syn::spanned::Spanned;
use syn::{Attribute, Field, LitInt, LitStr, Variant};

const ATTR: &str = "archive";

const SCALAR_NAMES: [&str; 14] = [
    "i8",
    "i16",
    "i32",
    "i64",
    "u8",
    "u16",
    "u32",
    "u64",
    "f32",
    "f64",
    "bool",
    "char",
    "NaiveDate",
    "NaiveDateTime",
];

/// Attributes placed on the deriving type.
#[derive(Debug, Default)]
pub struct ContainerAttrs {
    pub name: Option<String>,
    pub version: Option<u32>,
    pub min_version: Option<u32>,
}

impl ContainerAttrs {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = ContainerAttrs::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident(ATTR)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let lit: LitStr = meta.value()?.parse()?;
                    let name = lit.value();
                    if !is_valid_type_name(&name) {
                        return Err(syn::Error::new(
                            lit.span(),
                            format!("`{name}` is not a valid type name"),
                        ));
                    }
                    parsed.name = Some(name);
                } else if meta.path.is_ident("version") {
                    let lit: LitInt = meta.value()?.parse()?;
                    parsed.version = Some(lit.base10_parse()?);
                } else if meta.path.is_ident("min_version") {
                    let lit: LitInt = meta.value()?.parse()?;
                    parsed.min_version = Some(lit.base10_parse()?);
                } else {
                    return Err(meta.error("expected `name`, `version` or `min_version`"));
                }
                Ok(())
            })?;
        }
        if let (Some(version), Some(min)) = (parsed.version, parsed.min_version) {
            if min > version {
                return Err(syn::Error::new(
                    attrs
                        .iter()
                        .find(|a| a.path().is_ident(ATTR))
                        .map_or_else(proc_macro2::Span::call_site, |a| a.span()),
                    format!("min_version {min} is newer than version {version}"),
                ));
            }
        }
        Ok(parsed)
    }
}

/// Attributes placed on a record field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    pub skip: bool,
    pub parent: bool,
    pub rename: Option<String>,
}

impl FieldAttrs {
    pub fn parse(field: &Field) -> syn::Result<Self> {
        let mut parsed = FieldAttrs::default();
        for attr in field.attrs.iter().filter(|a| a.path().is_ident(ATTR)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    parsed.skip = true;
                } else if meta.path.is_ident("parent") {
                    parsed.parent = true;
                } else if meta.path.is_ident("rename") {
                    let lit: LitStr = meta.value()?.parse()?;
                    let name = lit.value();
                    if !is_valid_field_name(&name) {
                        return Err(syn::Error::new(
                            lit.span(),
                            format!("`{name}` is not a valid field name"),
                        ));
                    }
                    parsed.rename = Some(name);
                } else {
                    return Err(meta.error("expected `skip`, `parent` or `rename`"));
                }
                Ok(())
            })?;
        }
        if parsed.parent && (parsed.skip || parsed.rename.is_some()) {
            return Err(syn::Error::new(
                field.span(),
                "a `parent` field cannot be skipped or renamed",
            ));
        }
        Ok(parsed)
    }
}

/// Returns the text name of a unit variant.
pub fn variant_name(variant: &Variant) -> syn::Result<String> {
    let mut name = variant.ident.to_string();
    for attr in variant.attrs.iter().filter(|a| a.path().is_ident(ATTR)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                let renamed = lit.value();
                if !is_valid_variant_name(&renamed) {
                    return Err(syn::Error::new(
                        lit.span(),
                        format!("`{renamed}` cannot be written as a variant name"),
                    ));
                }
                name = renamed;
                Ok(())
            } else {
                Err(meta.error("expected `rename`"))
            }
        })?;
    }
    Ok(name)
}

// The same rules the registry checks at runtime; rejecting early gives a
// spanned compile error instead of a failed registration.
fn is_valid_type_name(name: &str) -> bool {
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    head_ok
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | ':' | '$' | '-'))
        && !matches!(name, "null" | "String" | "Record")
        && !SCALAR_NAMES.contains(&name)
}

fn is_valid_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    head_ok && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '-' | '$'))
}

fn is_valid_variant_name(name: &str) -> bool {
    !name.is_empty()
        && name != "null"
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '{' | '}' | '=' | '"' | '#'))
}
