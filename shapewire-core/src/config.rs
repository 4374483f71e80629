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

/// Configuration for a shapewire [`Codec`](crate::codec::Codec).
///
/// It is shared by every serialize and deserialize call made through one codec
/// so that both ends of a stream agree on the framing.
#[derive(Clone, Debug)]
pub struct Config {
    /// Whether the 8-byte shape fingerprint is written before each value and
    /// verified before each decode.
    pub fingerprint: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config { fingerprint: true }
    }
}

impl Config {
    /// Creates a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the fingerprint header is enabled.
    #[inline(always)]
    pub fn is_fingerprint(&self) -> bool {
        self.fingerprint
    }
}
