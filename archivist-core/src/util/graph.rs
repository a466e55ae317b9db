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

//! Structural copies and comparison of whole graphs.
//!
//! These walkers cannot fail on data, so a record type whose field
//! declaration does not register (a field declared twice, an invalid name)
//! makes them panic with the registration error.

use crate::serializer::Archive;

/// A copy sharing nothing with `value`.
pub fn deep_copy<T: Archive>(value: &T) -> T {
    value.deep_copy()
}

/// A copy with new records and containers whose `Rc`/`Arc` elements point to
/// the same allocations as those of `value`.
pub fn shallow_copy<T: Archive>(value: &T) -> T {
    value.shallow_copy()
}

/// Equality over archived state only: unbound fields are ignored.
pub fn deep_equal<T: Archive>(a: &T, b: &T) -> bool {
    a.archive_eq(b)
}

