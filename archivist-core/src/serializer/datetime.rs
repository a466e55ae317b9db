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

use chrono::{NaiveDate, NaiveDateTime};

use crate::buffer::is_null;
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::Archive;
use crate::types::{FieldType, ScalarKind};

/// `%.f` prints only as many fractional digits as needed and none for whole seconds.
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

impl Archive for NaiveDate {
    #[inline(always)]
    fn field_type() -> FieldType {
        FieldType::Scalar(ScalarKind::Date)
    }

    fn write_value(&self, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_scalar(&self.to_string());
        Ok(())
    }

    fn read_value(context: &mut ReadContext<'_>, text: &str) -> Result<Self, Error> {
        if is_null(text) {
            return Err(context.unexpected_null(ScalarKind::Date.name()));
        }
        text.parse::<NaiveDate>()
            .map_err(|e| context.invalid_value(text, e.to_string()))
    }

    #[inline(always)]
    fn archive_eq(&self, other: &Self) -> bool {
        self == other
    }

    #[inline(always)]
    fn deep_copy(&self) -> Self {
        *self
    }
}

impl Archive for NaiveDateTime {
    #[inline(always)]
    fn field_type() -> FieldType {
        FieldType::Scalar(ScalarKind::DateTime)
    }

    fn write_value(&self, context: &mut WriteContext) -> Result<(), Error> {
        context
            .writer
            .write_scalar(&self.format(DATE_TIME_FORMAT).to_string());
        Ok(())
    }

    fn read_value(context: &mut ReadContext<'_>, text: &str) -> Result<Self, Error> {
        if is_null(text) {
            return Err(context.unexpected_null(ScalarKind::DateTime.name()));
        }
        text.parse::<NaiveDateTime>()
            .map_err(|e| context.invalid_value(text, e.to_string()))
    }

    #[inline(always)]
    fn archive_eq(&self, other: &Self) -> bool {
        self == other
    }

    #[inline(always)]
    fn deep_copy(&self) -> Self {
        *self
    }
}
