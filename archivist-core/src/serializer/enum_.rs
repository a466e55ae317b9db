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

//! Helpers called by derived `Archive` impls of unit-only enums. A variant is
//! written as its bare name.

use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};

#[inline(always)]
pub fn write_variant(variant: &str, context: &mut WriteContext) -> Result<(), Error> {
    context.writer.write_scalar(variant);
    Ok(())
}

#[cold]
pub fn unknown_variant(context: &ReadContext<'_>, enum_name: &str, text: &str) -> Error {
    context.invalid_value(text, format!("not a variant of `{enum_name}`"))
}
