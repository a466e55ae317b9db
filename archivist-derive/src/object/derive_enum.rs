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

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{DataEnum, DeriveInput, Fields};

use crate::util::{variant_name, ContainerAttrs};

pub fn derive(
    ast: &DeriveInput,
    attrs: &ContainerAttrs,
    data_enum: &DataEnum,
) -> syn::Result<TokenStream> {
    let name = &ast.ident;
    let enum_name = attrs
        .name
        .clone()
        .unwrap_or_else(|| name.unraw().to_string());

    let mut idents = Vec::with_capacity(data_enum.variants.len());
    let mut names: Vec<String> = Vec::with_capacity(data_enum.variants.len());
    for variant in &data_enum.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "`Archive` enums may only have unit variants",
            ));
        }
        let text = variant_name(variant)?;
        if names.contains(&text) {
            return Err(syn::Error::new_spanned(
                variant,
                format!("variant name `{text}` is used twice"),
            ));
        }
        idents.push(&variant.ident);
        names.push(text);
    }

    let write_arms = gen_write_arms(&idents, &names);
    let read_arms = gen_read_arms(&idents, &names);
    let copy_arms = quote! { #(Self::#idents => Self::#idents,)* };

    Ok(quote! {
        impl ::archivist_core::Archive for #name {
            fn field_type() -> ::archivist_core::FieldType {
                ::archivist_core::FieldType::Enum(#enum_name)
            }

            fn write_value(
                &self,
                context: &mut ::archivist_core::WriteContext,
            ) -> ::std::result::Result<(), ::archivist_core::Error> {
                let variant = match self {
                    #write_arms
                };
                ::archivist_core::serializer::enum_::write_variant(variant, context)
            }

            fn read_value(
                context: &mut ::archivist_core::ReadContext<'_>,
                text: &str,
            ) -> ::std::result::Result<Self, ::archivist_core::Error> {
                if ::archivist_core::buffer::is_null(text) {
                    return Err(context.unexpected_null(#enum_name));
                }
                match text {
                    #read_arms
                    _ => Err(::archivist_core::serializer::enum_::unknown_variant(
                        context, #enum_name, text,
                    )),
                }
            }

            fn archive_eq(&self, other: &Self) -> bool {
                ::std::mem::discriminant(self) == ::std::mem::discriminant(other)
            }

            fn deep_copy(&self) -> Self {
                match self {
                    #copy_arms
                }
            }
        }
    })
}

fn gen_write_arms(idents: &[&syn::Ident], names: &[String]) -> TokenStream {
    quote! {
        #(Self::#idents => #names,)*
    }
}

fn gen_read_arms(idents: &[&syn::Ident], names: &[String]) -> TokenStream {
    quote! {
        #(#names => Ok(Self::#idents),)*
    }
}
