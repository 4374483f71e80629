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

use std::io;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::Error;

/// Little-endian writer over a byte sink, counting the bytes written.
pub struct Writer<'w> {
    sink: &'w mut dyn io::Write,
    written: usize,
}

impl<'w> Writer<'w> {
    pub fn new(sink: &'w mut dyn io::Write) -> Self {
        Writer { sink, written: 0 }
    }

    /// Bytes written through this writer so far.
    pub fn len(&self) -> usize {
        self.written
    }

    pub fn is_empty(&self) -> bool {
        self.written == 0
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.sink.flush().map_err(Error::sink)
    }

    #[inline(always)]
    pub fn write_bytes(&mut self, v: &[u8]) -> Result<(), Error> {
        self.sink.write_all(v).map_err(Error::sink)?;
        self.written += v.len();
        Ok(())
    }

    #[inline(always)]
    pub fn write_u8(&mut self, value: u8) -> Result<(), Error> {
        self.sink.write_u8(value).map_err(Error::sink)?;
        self.written += 1;
        Ok(())
    }

    #[inline(always)]
    pub fn write_i8(&mut self, value: i8) -> Result<(), Error> {
        self.sink.write_i8(value).map_err(Error::sink)?;
        self.written += 1;
        Ok(())
    }

    #[inline(always)]
    pub fn write_u16(&mut self, value: u16) -> Result<(), Error> {
        self.sink.write_u16::<LittleEndian>(value).map_err(Error::sink)?;
        self.written += 2;
        Ok(())
    }

    #[inline(always)]
    pub fn write_i16(&mut self, value: i16) -> Result<(), Error> {
        self.sink.write_i16::<LittleEndian>(value).map_err(Error::sink)?;
        self.written += 2;
        Ok(())
    }

    #[inline(always)]
    pub fn write_u32(&mut self, value: u32) -> Result<(), Error> {
        self.sink.write_u32::<LittleEndian>(value).map_err(Error::sink)?;
        self.written += 4;
        Ok(())
    }

    #[inline(always)]
    pub fn write_i32(&mut self, value: i32) -> Result<(), Error> {
        self.sink.write_i32::<LittleEndian>(value).map_err(Error::sink)?;
        self.written += 4;
        Ok(())
    }

    #[inline(always)]
    pub fn write_u64(&mut self, value: u64) -> Result<(), Error> {
        self.sink.write_u64::<LittleEndian>(value).map_err(Error::sink)?;
        self.written += 8;
        Ok(())
    }

    #[inline(always)]
    pub fn write_i64(&mut self, value: i64) -> Result<(), Error> {
        self.sink.write_i64::<LittleEndian>(value).map_err(Error::sink)?;
        self.written += 8;
        Ok(())
    }

    #[inline(always)]
    pub fn write_u128(&mut self, value: u128) -> Result<(), Error> {
        self.sink.write_u128::<LittleEndian>(value).map_err(Error::sink)?;
        self.written += 16;
        Ok(())
    }

    #[inline(always)]
    pub fn write_i128(&mut self, value: i128) -> Result<(), Error> {
        self.sink.write_i128::<LittleEndian>(value).map_err(Error::sink)?;
        self.written += 16;
        Ok(())
    }

    #[inline(always)]
    pub fn write_f32(&mut self, value: f32) -> Result<(), Error> {
        self.sink.write_f32::<LittleEndian>(value).map_err(Error::sink)?;
        self.written += 4;
        Ok(())
    }

    #[inline(always)]
    pub fn write_f64(&mut self, value: f64) -> Result<(), Error> {
        self.sink.write_f64::<LittleEndian>(value).map_err(Error::sink)?;
        self.written += 8;
        Ok(())
    }

    /// Writes the low `bits` of `value`, rounded up to whole bytes.
    ///
    /// Used for enumeration and union tags and for integers whose width is not
    /// a power of two (`char` is 21 bits and takes 3 bytes).
    pub fn write_tag(&mut self, value: i128, bits: u16) -> Result<(), Error> {
        let nbytes = byte_width(bits);
        if nbytes == 0 {
            return Ok(());
        }
        self.sink
            .write_uint128::<LittleEndian>(value as u128 & mask(nbytes), nbytes)
            .map_err(Error::sink)?;
        self.written += nbytes;
        Ok(())
    }
}

/// Little-endian reader over a byte source, counting the bytes consumed.
///
/// An exhausted source surfaces as [`Error::EndOfStream`].
pub struct Reader<'r> {
    source: &'r mut dyn io::Read,
    consumed: usize,
}

impl<'r> Reader<'r> {
    pub fn new(source: &'r mut dyn io::Read) -> Self {
        Reader {
            source,
            consumed: 0,
        }
    }

    /// Bytes consumed through this reader so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    #[inline(always)]
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        self.source.read_exact(buf).map_err(Error::source)?;
        self.consumed += buf.len();
        Ok(())
    }

    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8, Error> {
        let v = self.source.read_u8().map_err(Error::source)?;
        self.consumed += 1;
        Ok(v)
    }

    #[inline(always)]
    pub fn read_i8(&mut self) -> Result<i8, Error> {
        let v = self.source.read_i8().map_err(Error::source)?;
        self.consumed += 1;
        Ok(v)
    }

    #[inline(always)]
    pub fn read_u16(&mut self) -> Result<u16, Error> {
        let v = self.source.read_u16::<LittleEndian>().map_err(Error::source)?;
        self.consumed += 2;
        Ok(v)
    }

    #[inline(always)]
    pub fn read_i16(&mut self) -> Result<i16, Error> {
        let v = self.source.read_i16::<LittleEndian>().map_err(Error::source)?;
        self.consumed += 2;
        Ok(v)
    }

    #[inline(always)]
    pub fn read_u32(&mut self) -> Result<u32, Error> {
        let v = self.source.read_u32::<LittleEndian>().map_err(Error::source)?;
        self.consumed += 4;
        Ok(v)
    }

    #[inline(always)]
    pub fn read_i32(&mut self) -> Result<i32, Error> {
        let v = self.source.read_i32::<LittleEndian>().map_err(Error::source)?;
        self.consumed += 4;
        Ok(v)
    }

    #[inline(always)]
    pub fn read_u64(&mut self) -> Result<u64, Error> {
        let v = self.source.read_u64::<LittleEndian>().map_err(Error::source)?;
        self.consumed += 8;
        Ok(v)
    }

    #[inline(always)]
    pub fn read_i64(&mut self) -> Result<i64, Error> {
        let v = self.source.read_i64::<LittleEndian>().map_err(Error::source)?;
        self.consumed += 8;
        Ok(v)
    }

    #[inline(always)]
    pub fn read_u128(&mut self) -> Result<u128, Error> {
        let v = self.source.read_u128::<LittleEndian>().map_err(Error::source)?;
        self.consumed += 16;
        Ok(v)
    }

    #[inline(always)]
    pub fn read_i128(&mut self) -> Result<i128, Error> {
        let v = self.source.read_i128::<LittleEndian>().map_err(Error::source)?;
        self.consumed += 16;
        Ok(v)
    }

    #[inline(always)]
    pub fn read_f32(&mut self) -> Result<f32, Error> {
        let v = self.source.read_f32::<LittleEndian>().map_err(Error::source)?;
        self.consumed += 4;
        Ok(v)
    }

    #[inline(always)]
    pub fn read_f64(&mut self) -> Result<f64, Error> {
        let v = self.source.read_f64::<LittleEndian>().map_err(Error::source)?;
        self.consumed += 8;
        Ok(v)
    }

    /// Reads a `bits`-wide integer written by [`Writer::write_tag`],
    /// sign-extending when `signed` is set.
    pub fn read_tag(&mut self, bits: u16, signed: bool) -> Result<i128, Error> {
        let nbytes = byte_width(bits);
        if nbytes == 0 {
            return Ok(0);
        }
        let raw = if signed {
            self.source
                .read_int128::<LittleEndian>(nbytes)
                .map_err(Error::source)?
        } else {
            self.source
                .read_uint128::<LittleEndian>(nbytes)
                .map_err(Error::source)? as i128
        };
        self.consumed += nbytes;
        Ok(raw)
    }
}

/// Wire width in bytes of a `bits`-wide integer.
#[inline(always)]
pub const fn byte_width(bits: u16) -> usize {
    (bits as usize).div_ceil(8)
}

#[inline(always)]
fn mask(nbytes: usize) -> u128 {
    if nbytes >= 16 {
        u128::MAX
    } else {
        (1u128 << (nbytes * 8)) - 1
    }
}
