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

//! Code generation for records: structs with named fields (or none).

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{DeriveInput, Field, Ident, Type};

use crate::util::{ContainerAttrs, FieldAttrs};

struct Bound<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    key: String,
}

pub fn derive(
    ast: &DeriveInput,
    attrs: &ContainerAttrs,
    fields: Vec<&Field>,
) -> syn::Result<TokenStream> {
    let name = &ast.ident;
    let type_name = attrs
        .name
        .clone()
        .unwrap_or_else(|| name.unraw().to_string());
    let version = attrs.version.unwrap_or(0);
    let min_version = attrs.min_version.unwrap_or(0);

    let mut parent: Option<(&Ident, &Type)> = None;
    let mut bound: Vec<Bound> = Vec::new();
    for field in fields {
        let field_attrs = FieldAttrs::parse(field)?;
        // Named fields only reach here.
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        if field_attrs.parent {
            if parent.is_some() {
                return Err(syn::Error::new_spanned(
                    ident,
                    "a record has at most one `parent` field",
                ));
            }
            parent = Some((ident, &field.ty));
            continue;
        }
        if field_attrs.skip {
            continue;
        }
        let key = field_attrs
            .rename
            .unwrap_or_else(|| ident.unraw().to_string());
        if let Some(other) = bound.iter().find(|b| b.key == key) {
            return Err(syn::Error::new_spanned(
                ident,
                format!("field name `{key}` is already used by `{}`", other.ident),
            ));
        }
        bound.push(Bound {
            ident,
            ty: &field.ty,
            key,
        });
    }

    let inherit = parent.map(|(_, ty)| {
        quote! { fields.inherit::<#ty>()?; }
    });
    let declare = bound.iter().map(|b| {
        let ty = b.ty;
        let key = &b.key;
        quote! { fields.field::<#ty>(#key)?; }
    });

    let keys: Vec<_> = bound.iter().map(|b| &b.key).collect();
    let idents: Vec<_> = bound.iter().map(|b| b.ident).collect();
    let (ref_fallback, mut_fallback) = match parent {
        Some((ident, _)) => (
            quote! { ::archivist_core::Record::field_ref(&self.#ident, name) },
            quote! { ::archivist_core::Record::field_mut(&mut self.#ident, name) },
        ),
        None => (quote! { None }, quote! { None }),
    };

    Ok(quote! {
        impl ::archivist_core::RecordType for #name {
            const TYPE_NAME: &'static str = #type_name;
            const VERSION: u32 = #version;
            const MIN_VERSION: u32 = #min_version;

            #[allow(unused_variables)]
            fn declare_fields(
                fields: &mut ::archivist_core::FieldsBuilder,
            ) -> ::std::result::Result<(), ::archivist_core::Error> {
                #inherit
                #(#declare)*
                Ok(())
            }
        }

        impl ::archivist_core::Record for #name {
            fn record_info(
                &self,
            ) -> ::std::result::Result<
                ::std::sync::Arc<::archivist_core::RecordInfo>,
                ::archivist_core::Error,
            > {
                ::archivist_core::registry().record_info::<Self>()
            }

            fn record_type_name(&self) -> &'static str {
                <Self as ::archivist_core::RecordType>::TYPE_NAME
            }

            fn field_ref(&self, name: &str) -> Option<&dyn ::std::any::Any> {
                match name {
                    #(#keys => Some(&self.#idents as &dyn ::std::any::Any),)*
                    _ => #ref_fallback,
                }
            }

            fn field_mut(&mut self, name: &str) -> Option<&mut dyn ::std::any::Any> {
                match name {
                    #(#keys => Some(&mut self.#idents as &mut dyn ::std::any::Any),)*
                    _ => #mut_fallback,
                }
            }

            fn boxed_default(&self) -> Box<dyn ::archivist_core::Record> {
                Box::new(<Self as ::std::default::Default>::default())
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }

        impl ::archivist_core::Archive for #name {
            fn field_type() -> ::archivist_core::FieldType {
                ::archivist_core::FieldType::Record(<Self as ::archivist_core::RecordType>::TYPE_NAME)
            }

            fn write_value(
                &self,
                context: &mut ::archivist_core::WriteContext,
            ) -> ::std::result::Result<(), ::archivist_core::Error> {
                ::archivist_core::serializer::record::write(self, context)
            }

            fn read_value(
                context: &mut ::archivist_core::ReadContext<'_>,
                text: &str,
            ) -> ::std::result::Result<Self, ::archivist_core::Error> {
                ::archivist_core::serializer::record::read(context, text)
            }

            fn merge_value(
                &mut self,
                context: &mut ::archivist_core::ReadContext<'_>,
                text: &str,
            ) -> ::std::result::Result<(), ::archivist_core::Error> {
                ::archivist_core::serializer::record::merge(self, context, text)
            }

            fn diff_value(
                &self,
                target: &Self,
                context: &mut ::archivist_core::WriteContext,
            ) -> ::std::result::Result<(), ::archivist_core::Error> {
                ::archivist_core::serializer::record::diff(self, target, context)
            }

            fn archive_eq(&self, other: &Self) -> bool {
                ::archivist_core::serializer::record::equals(self, other)
            }

            fn deep_copy(&self) -> Self {
                ::archivist_core::serializer::record::deep_copy(self)
            }

            fn shallow_copy(&self) -> Self {
                ::archivist_core::serializer::record::shallow_copy(self)
            }
        }
    })
}
