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

use crate::buffer::{Reader, Writer};
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::{Serializer, PREALLOC_BYTES};
use crate::shape::Shape;

macro_rules! impl_num_serializer {
    ($ty:ty, $writer:expr, $reader:expr, $shape:expr) => {
        impl Serializer for $ty {
            const WIRE_ALLOCATES: bool = false;

            #[inline(always)]
            fn wire_shape() -> Shape {
                $shape
            }

            #[inline(always)]
            fn wire_write(&self, context: &mut WriteContext<'_>) -> Result<(), Error> {
                $writer(&mut context.writer, *self)
            }

            #[inline(always)]
            fn wire_read(context: &mut ReadContext<'_>) -> Result<Self, Error> {
                $reader(&mut context.reader)
            }
        }
    };
}

impl_num_serializer!(i8, Writer::write_i8, Reader::read_i8, Shape::int(8, true));
impl_num_serializer!(i16, Writer::write_i16, Reader::read_i16, Shape::int(16, true));
impl_num_serializer!(i32, Writer::write_i32, Reader::read_i32, Shape::int(32, true));
impl_num_serializer!(i64, Writer::write_i64, Reader::read_i64, Shape::int(64, true));
impl_num_serializer!(i128, Writer::write_i128, Reader::read_i128, Shape::int(128, true));
impl_num_serializer!(u16, Writer::write_u16, Reader::read_u16, Shape::int(16, false));
impl_num_serializer!(u32, Writer::write_u32, Reader::read_u32, Shape::int(32, false));
impl_num_serializer!(u64, Writer::write_u64, Reader::read_u64, Shape::int(64, false));
impl_num_serializer!(u128, Writer::write_u128, Reader::read_u128, Shape::int(128, false));
impl_num_serializer!(f32, Writer::write_f32, Reader::read_f32, Shape::Float { bits: 32 });
impl_num_serializer!(f64, Writer::write_f64, Reader::read_f64, Shape::Float { bits: 64 });

/// Bytes get a single-block fast path inside sequences and arrays.
impl Serializer for u8 {
    const WIRE_ALLOCATES: bool = false;

    #[inline(always)]
    fn wire_shape() -> Shape {
        Shape::int(8, false)
    }

    #[inline(always)]
    fn wire_write(&self, context: &mut WriteContext<'_>) -> Result<(), Error> {
        context.writer.write_u8(*self)
    }

    #[inline(always)]
    fn wire_read(context: &mut ReadContext<'_>) -> Result<Self, Error> {
        context.reader.read_u8()
    }

    fn wire_write_seq(items: &[Self], context: &mut WriteContext<'_>) -> Result<(), Error> {
        context.writer.write_bytes(items)
    }

    fn wire_read_seq(len: usize, context: &mut ReadContext<'_>) -> Result<Vec<Self>, Error> {
        read_byte_block(len, context)
    }
}

/// Reads `len` raw bytes, growing the buffer in bounded chunks so a corrupt
/// length header cannot force a huge zero-filled buffer ahead of the data.
pub(crate) fn read_byte_block(len: usize, context: &mut ReadContext<'_>) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    crate::alloc::try_reserve(&mut bytes, len.min(PREALLOC_BYTES))?;
    while bytes.len() < len {
        let start = bytes.len();
        let chunk = (len - start).min(PREALLOC_BYTES);
        if bytes.capacity() < start + chunk {
            crate::alloc::try_reserve(&mut bytes, chunk)?;
        }
        bytes.resize(start + chunk, 0);
        context.reader.read_exact(&mut bytes[start..])?;
    }
    Ok(bytes)
}

/// Platform-native integers travel as 64-bit values.
impl Serializer for usize {
    const WIRE_ALLOCATES: bool = false;

    fn wire_shape() -> Shape {
        Shape::int(64, false)
    }

    #[inline(always)]
    fn wire_write(&self, context: &mut WriteContext<'_>) -> Result<(), Error> {
        context.writer.write_u64(*self as u64)
    }

    #[inline(always)]
    fn wire_read(context: &mut ReadContext<'_>) -> Result<Self, Error> {
        let v = context.reader.read_u64()?;
        usize::try_from(v).map_err(|_| Error::unexpected_data(format!("{} overflows usize", v)))
    }
}

impl Serializer for isize {
    const WIRE_ALLOCATES: bool = false;

    fn wire_shape() -> Shape {
        Shape::int(64, true)
    }

    #[inline(always)]
    fn wire_write(&self, context: &mut WriteContext<'_>) -> Result<(), Error> {
        context.writer.write_i64(*self as i64)
    }

    #[inline(always)]
    fn wire_read(context: &mut ReadContext<'_>) -> Result<Self, Error> {
        let v = context.reader.read_i64()?;
        isize::try_from(v).map_err(|_| Error::unexpected_data(format!("{} overflows isize", v)))
    }
}

/// A Unicode scalar value as a 21-bit integer, three bytes on the wire.
impl Serializer for char {
    const WIRE_ALLOCATES: bool = false;

    fn wire_shape() -> Shape {
        Shape::int(21, false)
    }

    fn wire_write(&self, context: &mut WriteContext<'_>) -> Result<(), Error> {
        context.writer.write_tag(i128::from(u32::from(*self)), 21)
    }

    fn wire_read(context: &mut ReadContext<'_>) -> Result<Self, Error> {
        let v = context.reader.read_tag(21, false)? as u32;
        char::from_u32(v)
            .ok_or_else(|| Error::unexpected_data(format!("{:#x} is not a scalar value", v)))
    }
}

impl Serializer for () {
    const WIRE_ALLOCATES: bool = false;

    fn wire_shape() -> Shape {
        Shape::Unit
    }

    #[inline(always)]
    fn wire_write(&self, _context: &mut WriteContext<'_>) -> Result<(), Error> {
        Ok(())
    }

    #[inline(always)]
    fn wire_read(_context: &mut ReadContext<'_>) -> Result<Self, Error> {
        Ok(())
    }
}
