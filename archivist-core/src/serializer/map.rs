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

//! Maps are written as `<type> <count> {` followed by `count` key/value line
//! pairs in ascending key order, so equal maps always produce equal text.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::buffer::is_null;
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::collection::is_value_element;
use crate::serializer::Archive;
use crate::types::FieldType;

pub fn write_entries<'v, K, V, I>(
    type_name: &str,
    entries: I,
    context: &mut WriteContext,
) -> Result<(), Error>
where
    K: Archive + 'v,
    V: Archive + 'v,
    I: ExactSizeIterator<Item = (&'v K, &'v V)>,
{
    context.writer.open_block(type_name, Some(entries.len()));
    for (key, value) in entries {
        context.writer.begin_element();
        key.write_value(context)?;
        context.writer.begin_element();
        value.write_value(context)?;
    }
    context.writer.close_block();
    Ok(())
}

/// Reads `count` entries and the closing brace, handing each to `entry`.
///
/// `entry` receives the parsed key and the still unparsed value text, so
/// that the caller decides between a fresh read and a merge.
pub fn read_entries<K, F>(
    context: &mut ReadContext<'_>,
    count: usize,
    mut entry: F,
) -> Result<(), Error>
where
    K: Archive,
    F: FnMut(&mut ReadContext<'_>, K, &str) -> Result<(), Error>,
{
    for index in 0..count {
        let key_line = context.reader.read_element(count, index)?;
        let key = K::read_value(context, key_line)?;
        let value_line = context.reader.read_element(count, index)?;
        entry(context, key, value_line)?;
    }
    context.reader.end_block()
}

macro_rules! impl_map_archive {
    ($map:ident, $name:literal $(, $bound:path)*) => {
        impl<K, V> Archive for $map<K, V>
        where
            K: Archive + Ord $(+ $bound)*,
            V: Archive,
        {
            fn field_type() -> FieldType {
                FieldType::Map(
                    $name,
                    Box::new(K::field_type()),
                    Box::new(V::field_type()),
                )
            }

            fn write_value(&self, context: &mut WriteContext) -> Result<(), Error> {
                let mut entries: Vec<(&K, &V)> = self.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                write_entries(&Self::type_name(), entries.into_iter(), context)
            }

            fn read_value(context: &mut ReadContext<'_>, text: &str) -> Result<Self, Error> {
                let mut map = $map::new();
                if is_null(text) {
                    return Ok(map);
                }
                let count = context.open_counted_block(text, &Self::type_name())?;
                read_entries(context, count, |context, key: K, value_text| {
                    map.insert(key, V::read_value(context, value_text)?);
                    Ok(())
                })?;
                Ok(map)
            }

            /// Entries are matched by key: missing keys are removed, present
            /// values are merged (or replaced for value types), new keys added.
            fn merge_value(
                &mut self,
                context: &mut ReadContext<'_>,
                text: &str,
            ) -> Result<(), Error> {
                if is_null(text) {
                    self.clear();
                    return Ok(());
                }
                let count = context.open_counted_block(text, &Self::type_name())?;
                let replace = is_value_element::<V>();
                let mut previous = std::mem::take(self);
                let result = read_entries(context, count, |context, key: K, value_text| {
                    if !replace {
                        if let Some(mut existing) = previous.remove(&key) {
                            let merged = existing.merge_value(context, value_text);
                            self.insert(key, existing);
                            return merged;
                        }
                    }
                    let value = V::read_value(context, value_text)?;
                    previous.remove(&key);
                    self.insert(key, value);
                    Ok(())
                });
                if result.is_err() {
                    // Entries the block never reached stay in place.
                    for (key, value) in previous {
                        self.entry(key).or_insert(value);
                    }
                }
                result
            }

            fn archive_eq(&self, other: &Self) -> bool {
                self.len() == other.len()
                    && self.iter().all(|(key, value)| {
                        other
                            .get(key)
                            .is_some_and(|other_value| value.archive_eq(other_value))
                    })
            }

            fn deep_copy(&self) -> Self {
                self.iter()
                    .map(|(key, value)| (key.deep_copy(), value.deep_copy()))
                    .collect()
            }

            fn shallow_copy(&self) -> Self {
                self.iter()
                    .map(|(key, value)| (key.share(), value.share()))
                    .collect()
            }
        }
    };
}

impl_map_archive!(HashMap, "HashMap", Eq, Hash);
impl_map_archive!(BTreeMap, "BTreeMap");
