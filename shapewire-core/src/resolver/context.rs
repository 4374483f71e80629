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

use crate::alloc::Allocator;
use crate::buffer::{Reader, Writer};

/// State threaded through one encode walk.
pub struct WriteContext<'w> {
    pub writer: Writer<'w>,
}

impl<'w> WriteContext<'w> {
    pub fn new(writer: Writer<'w>) -> WriteContext<'w> {
        WriteContext { writer }
    }
}

/// State threaded through one decode walk: the source and the allocator that
/// grants every owned allocation the walk makes.
pub struct ReadContext<'r> {
    pub reader: Reader<'r>,
    allocator: &'r dyn Allocator,
}

impl<'r> ReadContext<'r> {
    pub fn new(reader: Reader<'r>, allocator: &'r dyn Allocator) -> ReadContext<'r> {
        ReadContext { reader, allocator }
    }

    /// The allocator for this walk. The returned reference outlives the
    /// borrow of the context, so it can be held across further reads.
    #[inline(always)]
    pub fn allocator(&self) -> &'r dyn Allocator {
        self.allocator
    }
}
