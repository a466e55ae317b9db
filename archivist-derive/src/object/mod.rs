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

pub mod derive_enum;
pub mod record;

use proc_macro2::TokenStream;
use syn::{Data, DeriveInput, Fields};

use crate::util::ContainerAttrs;

/// Dispatches on the shape of the deriving type.
pub fn derive_archive(ast: &DeriveInput) -> syn::Result<TokenStream> {
    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &ast.generics,
            "`Archive` cannot be derived for generic types",
        ));
    }
    let attrs = ContainerAttrs::parse(&ast.attrs)?;
    match &ast.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => record::derive(ast, &attrs, named.named.iter().collect()),
            Fields::Unit => record::derive(ast, &attrs, Vec::new()),
            Fields::Unnamed(_) => Err(syn::Error::new_spanned(
                &ast.ident,
                "`Archive` records need named fields",
            )),
        },
        Data::Enum(data) => {
            if attrs.version.is_some() || attrs.min_version.is_some() {
                return Err(syn::Error::new_spanned(
                    &ast.ident,
                    "enums carry no version",
                ));
            }
            derive_enum::derive(ast, &attrs, data)
        }
        Data::Union(_) => Err(syn::Error::new_spanned(
            &ast.ident,
            "`Archive` cannot be derived for unions",
        )),
    }
}
