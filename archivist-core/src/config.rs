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

/// Configuration for archiving operations.
///
/// Held by [`crate::Archivist`] and handed to the `WriteContext` and
/// `ReadContext` of every call so that one call sees one consistent setting.
#[derive(Clone, Debug)]
pub struct Config {
    /// Whether deserialization merges into the target instead of replacing it.
    pub keep_instances: bool,
    /// Whether unknown field names fail the load instead of being skipped.
    pub strict: bool,
    /// Spaces written per nesting level.
    pub indent: usize,
    /// Maximum block nesting accepted on read.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            keep_instances: false,
            strict: false,
            indent: 4,
            max_depth: 256,
        }
    }
}

impl Config {
    /// Creates a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if merge mode is enabled.
    #[inline(always)]
    pub fn is_keep_instances(&self) -> bool {
        self.keep_instances
    }

    /// Check if unknown fields are rejected.
    #[inline(always)]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    #[inline(always)]
    pub fn indent(&self) -> usize {
        self.indent
    }

    #[inline(always)]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}
