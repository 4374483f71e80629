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
use std::sync::OnceLock;

use tracing::{debug, trace};

use crate::alloc::{Allocator, NoAllocator};
use crate::buffer::{Reader, Writer};
use crate::config::Config;
use crate::error::Error;
use crate::fingerprint::Fingerprint;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::shape_resolver::{ResolvedShape, ShapeResolver};
use crate::serializer::Serializer;
use crate::shape::Shape;

/// Entry point for encoding, decoding and releasing values.
///
/// A `Codec` owns the framing configuration and a cache of resolved shapes.
/// It is `Sync`; share one between threads and give each call its own sink,
/// source and allocator.
///
/// # Wire format
///
/// Unless fingerprinting is disabled, every value is preceded by the 8-byte
/// fingerprint of its shape, little-endian. The value follows with no further
/// framing.
///
/// # Examples
///
/// ```rust
/// use shapewire_core::codec::Codec;
///
/// let codec = Codec::default().fingerprint(false);
/// let bytes = codec.serialize_to_vec(&(0xDEAD_BEEFu32, None::<u8>)).unwrap();
/// assert_eq!(bytes, [0xEF, 0xBE, 0xAD, 0xDE, 0x00]);
///
/// let mut source = bytes.as_slice();
/// let value: (u32, Option<u8>) = codec.deserialize(&mut source).unwrap();
/// assert_eq!(value, (0xDEAD_BEEF, None));
/// ```
#[derive(Default)]
pub struct Codec {
    config: Config,
    resolver: ShapeResolver,
}

impl Codec {
    pub fn new(config: Config) -> Self {
        Codec {
            config,
            resolver: ShapeResolver::default(),
        }
    }

    /// Enables or disables the fingerprint header.
    ///
    /// Both ends of a stream must agree. Disabling it saves 8 bytes per value
    /// and removes the only guard against decoding data produced for another
    /// shape.
    ///
    /// # Default
    ///
    /// The default value is `true`.
    pub fn fingerprint(mut self, enabled: bool) -> Self {
        self.config.fingerprint = enabled;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_fingerprint(&self) -> bool {
        self.config.is_fingerprint()
    }

    /// Resolves, validates and fingerprints `T` ahead of any call.
    ///
    /// Registration is optional; shapes are otherwise resolved on first use.
    pub fn register<T: Serializer>(&self) -> Result<Fingerprint, Error> {
        Ok(self.resolve::<T>()?.fingerprint)
    }

    pub fn shape_of<T: Serializer>(&self) -> Result<Shape, Error> {
        Ok(self.resolve::<T>()?.shape.clone())
    }

    pub fn fingerprint_of<T: Serializer>(&self) -> Result<Fingerprint, Error> {
        Ok(self.resolve::<T>()?.fingerprint)
    }

    fn resolve<T: Serializer>(&self) -> Result<std::sync::Arc<ResolvedShape>, Error> {
        const {
            assert!(
                T::WIRE_TOP_LEVEL,
                "results and error sets can only be encoded inside a record"
            )
        };
        self.resolver.resolve::<T>()
    }

    /// Encodes `value` into `sink`.
    ///
    /// The value is encoded in full before anything reaches `sink`, so a
    /// failed encode (a map over the 32-bit count, a failing override hook)
    /// leaves the sink untouched.
    pub fn serialize<T: Serializer>(&self, sink: &mut dyn io::Write, value: &T) -> Result<(), Error> {
        let bytes = self.serialize_to_vec(value)?;
        sink.write_all(&bytes).map_err(Error::sink)
    }

    pub fn serialize_to_vec<T: Serializer>(&self, value: &T) -> Result<Vec<u8>, Error> {
        let resolved = self.resolve::<T>()?;
        let mut out = Vec::new();
        {
            let mut context = WriteContext::new(Writer::new(&mut out));
            if self.config.fingerprint {
                context
                    .writer
                    .write_bytes(&resolved.fingerprint.to_bytes())?;
            }
            value.wire_write(&mut context)?;
        }
        trace!(
            type_name = resolved.type_name,
            bytes = out.len(),
            "serialized"
        );
        Ok(out)
    }

    /// Decodes a value of a shape that never allocates.
    ///
    /// Asking for an allocating shape here is a compile-time error, so the
    /// source is never touched for a call that could not succeed; use
    /// [`Codec::deserialize_alloc`] instead.
    pub fn deserialize<T: Serializer>(&self, source: &mut dyn io::Read) -> Result<T, Error> {
        const {
            assert!(
                !T::WIRE_ALLOCATES,
                "allocating shapes must be decoded with deserialize_alloc"
            )
        };
        self.read_value(source, &NoAllocator)
    }

    /// Decodes a value of any shape, acquiring owned allocations from
    /// `allocator`. Hand the result back through [`Codec::release`].
    pub fn deserialize_alloc<T: Serializer>(
        &self,
        source: &mut dyn io::Read,
        allocator: &dyn Allocator,
    ) -> Result<T, Error> {
        self.read_value(source, allocator)
    }

    /// Decodes a value that must occupy the whole of `bytes`.
    pub fn deserialize_from_slice<T: Serializer>(
        &self,
        bytes: &[u8],
        allocator: &dyn Allocator,
    ) -> Result<T, Error> {
        let mut source = bytes;
        let value: T = self.read_value(&mut source, allocator)?;
        if !source.is_empty() {
            let trailing = source.len();
            value.wire_release(allocator);
            return Err(Error::unexpected_data(format!(
                "{} trailing bytes after value",
                trailing
            )));
        }
        Ok(value)
    }

    /// Returns every allocation a decoded value holds to `allocator`.
    pub fn release<T: Serializer>(&self, allocator: &dyn Allocator, value: T) {
        value.wire_release(allocator);
    }

    fn read_value<T: Serializer>(
        &self,
        source: &mut dyn io::Read,
        allocator: &dyn Allocator,
    ) -> Result<T, Error> {
        let resolved = self.resolve::<T>()?;
        let mut context = ReadContext::new(Reader::new(source), allocator);
        if self.config.fingerprint {
            let mut header = [0u8; 8];
            context.reader.read_exact(&mut header)?;
            let found = Fingerprint::from_bytes(header);
            if found != resolved.fingerprint {
                debug!(
                    type_name = resolved.type_name,
                    expected = %resolved.fingerprint,
                    found = %found,
                    "fingerprint mismatch"
                );
                return Err(Error::unexpected_data(format!(
                    "fingerprint {} does not match {} of {}",
                    found, resolved.fingerprint, resolved.shape
                )));
            }
        }
        let value = T::wire_read(&mut context).map_err(Error::enhance_with_type::<T>)?;
        trace!(
            type_name = resolved.type_name,
            bytes = context.reader.consumed(),
            "deserialized"
        );
        Ok(value)
    }
}

fn default_codec() -> &'static Codec {
    static CODEC: OnceLock<Codec> = OnceLock::new();
    CODEC.get_or_init(Codec::default)
}

/// Encodes `value` with the default configuration.
pub fn serialize<T: Serializer>(sink: &mut dyn io::Write, value: &T) -> Result<(), Error> {
    default_codec().serialize(sink, value)
}

/// Decodes a non-allocating value with the default configuration.
pub fn deserialize<T: Serializer>(source: &mut dyn io::Read) -> Result<T, Error> {
    default_codec().deserialize(source)
}

/// Decodes any value with the default configuration.
pub fn deserialize_alloc<T: Serializer>(
    source: &mut dyn io::Read,
    allocator: &dyn Allocator,
) -> Result<T, Error> {
    default_codec().deserialize_alloc(source, allocator)
}

/// Releases a value produced by [`deserialize_alloc`].
pub fn release<T: Serializer>(allocator: &dyn Allocator, value: T) {
    value.wire_release(allocator);
}
