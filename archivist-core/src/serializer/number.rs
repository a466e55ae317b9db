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

use crate::buffer::is_null;
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::Archive;
use crate::types::{FieldType, ScalarKind};

macro_rules! impl_scalar_archive {
    ($ty:ty, $kind:expr) => {
        impl Archive for $ty {
            #[inline(always)]
            fn field_type() -> FieldType {
                FieldType::Scalar($kind)
            }

            #[inline(always)]
            fn write_value(&self, context: &mut WriteContext) -> Result<(), Error> {
                context.writer.write_scalar(&self.to_string());
                Ok(())
            }

            fn read_value(context: &mut ReadContext<'_>, text: &str) -> Result<Self, Error> {
                if is_null(text) {
                    return Err(context.unexpected_null($kind.name()));
                }
                text.parse::<$ty>()
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
    };
}

impl_scalar_archive!(i8, ScalarKind::I8);
impl_scalar_archive!(i16, ScalarKind::I16);
impl_scalar_archive!(i32, ScalarKind::I32);
impl_scalar_archive!(i64, ScalarKind::I64);
impl_scalar_archive!(u8, ScalarKind::U8);
impl_scalar_archive!(u16, ScalarKind::U16);
impl_scalar_archive!(u32, ScalarKind::U32);
impl_scalar_archive!(u64, ScalarKind::U64);
impl_scalar_archive!(f32, ScalarKind::F32);
impl_scalar_archive!(f64, ScalarKind::F64);
impl_scalar_archive!(bool, ScalarKind::Bool);
