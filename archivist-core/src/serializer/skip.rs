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

use log::warn;

use crate::error::Error;
use crate::resolver::context::ReadContext;
use crate::util::escape::preview;

/// Handles a field line whose name has no binding in `type_name`.
///
/// Strict reads fail. Lenient reads log and consume the value, including a
/// nested block of any depth, so later fields are read normally.
pub fn skip_unknown_field(
    context: &mut ReadContext<'_>,
    type_name: &str,
    field: &str,
    text: &str,
) -> Result<(), Error> {
    if context.is_strict() {
        return Err(Error::unknown_field(context.line(), type_name, field));
    }
    warn!(
        "line {}: skipping unknown field `{}` of `{}` (value `{}`)",
        context.line(),
        field,
        type_name,
        preview(text, 32)
    );
    context.reader.skip_value(text)
}
