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

use std::ffi::CString;

use crate::alloc::{array_layout, Allocator, Lease};
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::list::{read_seq_len, write_seq};
use crate::serializer::number::read_byte_block;
use crate::serializer::Serializer;
use crate::shape::Shape;

/// UTF-8 bytes as a byte sequence.
impl Serializer for String {
    const WIRE_ALLOCATES: bool = true;

    fn wire_shape() -> Shape {
        Shape::seq(Shape::int(8, false))
    }

    fn wire_write(&self, context: &mut WriteContext<'_>) -> Result<(), Error> {
        write_seq(self.as_bytes(), context)
    }

    fn wire_read(context: &mut ReadContext<'_>) -> Result<Self, Error> {
        let len = read_seq_len(context)?;
        let lease = Lease::acquire(context.allocator(), array_layout::<u8>(len)?)?;
        let bytes = read_byte_block(len, context)?;
        let s = String::from_utf8(bytes).map_err(|e| Error::unexpected_data(e.to_string()))?;
        lease.commit();
        Ok(s)
    }

    fn wire_release(self, allocator: &dyn Allocator) {
        if let Ok(layout) = array_layout::<u8>(self.len()) {
            allocator.release(layout);
        }
    }
}

/// Byte sequence terminated by NUL. The terminator occupies a slot in the
/// decoded buffer but is never written.
impl Serializer for CString {
    const WIRE_ALLOCATES: bool = true;

    fn wire_shape() -> Shape {
        Shape::terminated_seq(Shape::int(8, false), 0)
    }

    fn wire_write(&self, context: &mut WriteContext<'_>) -> Result<(), Error> {
        write_seq(self.as_bytes(), context)
    }

    fn wire_read(context: &mut ReadContext<'_>) -> Result<Self, Error> {
        let len = read_seq_len(context)?;
        let slots = len
            .checked_add(1)
            .ok_or_else(|| Error::out_of_memory("terminated sequence length overflows"))?;
        let lease = Lease::acquire(context.allocator(), array_layout::<u8>(slots)?)?;
        let bytes = read_byte_block(len, context)?;
        let s = CString::new(bytes).map_err(|e| Error::unexpected_data(e.to_string()))?;
        lease.commit();
        Ok(s)
    }

    fn wire_release(self, allocator: &dyn Allocator) {
        if let Ok(layout) = array_layout::<u8>(self.as_bytes_with_nul().len()) {
            allocator.release(layout);
        }
    }
}
