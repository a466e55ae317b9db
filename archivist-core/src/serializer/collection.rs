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

//! Shared plumbing for arrays, lists and maps.
//!
//! A sequence block is `<type> <count> {` followed by one element per line
//! (two per entry for maps) and `}`. Diffs of these containers write the
//! whole target.

use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::Archive;

/// Upper bound for capacity reserved from an untrusted element count.
const MAX_PREALLOCATION: usize = 4096;

#[inline(always)]
pub fn initial_capacity(count: usize) -> usize {
    count.min(MAX_PREALLOCATION)
}

/// Whether elements of `T` are replaced rather than merged into.
#[inline(always)]
pub fn is_value_element<T: Archive>() -> bool {
    T::field_type().is_value_type()
}

pub fn write_sequence<'v, T, I>(
    type_name: &str,
    items: I,
    context: &mut WriteContext,
) -> Result<(), Error>
where
    T: Archive + 'v,
    I: ExactSizeIterator<Item = &'v T>,
{
    context.writer.open_block(type_name, Some(items.len()));
    for item in items {
        context.writer.begin_element();
        item.write_value(context)?;
    }
    context.writer.close_block();
    Ok(())
}

/// Reads `count` fresh elements and the closing brace.
pub fn read_elements<T: Archive>(
    context: &mut ReadContext<'_>,
    count: usize,
) -> Result<Vec<T>, Error> {
    let mut items = Vec::with_capacity(initial_capacity(count));
    for index in 0..count {
        let line = context.reader.read_element(count, index)?;
        items.push(T::read_value(context, line)?);
    }
    context.reader.end_block()?;
    Ok(items)
}

/// Merges `count` elements positionally into `items` and reads the closing
/// brace. `items` must already hold no more than `count` elements; the caller
/// appends element `index` through `push` once the existing ones run out.
pub fn merge_elements<'i, T, I>(
    items: I,
    count: usize,
    context: &mut ReadContext<'_>,
    mut push: impl FnMut(T),
) -> Result<(), Error>
where
    T: Archive + 'i,
    I: Iterator<Item = &'i mut T>,
{
    let replace = is_value_element::<T>();
    let mut existing = items;
    for index in 0..count {
        let line = context.reader.read_element(count, index)?;
        match existing.next() {
            Some(slot) if replace => *slot = T::read_value(context, line)?,
            Some(slot) => slot.merge_value(context, line)?,
            None => push(T::read_value(context, line)?),
        }
    }
    context.reader.end_block()
}

pub fn sequence_eq<'v, T, I>(a: I, b: I) -> bool
where
    T: Archive + 'v,
    I: ExactSizeIterator<Item = &'v T>,
{
    a.len() == b.len() && a.zip(b).all(|(a, b)| a.archive_eq(b))
}
