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

//! # Shapewire Core
//!
//! Core implementation of the shapewire binary codec: a type-directed encoder,
//! decoder and release walk that agree byte for byte and allocation for
//! allocation, plus a structural fingerprint that lets a decoder reject data
//! produced for a different shape.
//!
//! ## Architecture
//!
//! - **`shape`**: the closed [`Shape`] model every walk is driven by
//! - **`fingerprint`**: FNV-1a 64 digest of a shape
//! - **`serializer`**: the [`Serializer`] trait and its std implementations
//! - **`alloc`**: allocation accounting for decode and release
//! - **`buffer`**: little-endian [`Writer`](buffer::Writer) and
//!   [`Reader`](buffer::Reader) over `std::io` sinks and sources
//! - **`resolver`**: walk contexts and the per-codec shape cache
//! - **`codec`**: the [`Codec`] entry points
//! - **`error`**: the [`Error`] taxonomy
//!
//! ## Wire format
//!
//! Little-endian throughout. An optional 8-byte fingerprint header, then the
//! value:
//!
//! | shape            | encoding |
//! |------------------|----------|
//! | unit             | nothing |
//! | bool             | one byte, 0 or 1 |
//! | integer, float   | little-endian, width rounded up to whole bytes |
//! | box              | the pointee |
//! | sequence         | 8-byte length, then elements (bytes as one block) |
//! | array, lanes     | elements, no length |
//! | record, tuple    | fields in declaration order |
//! | option           | presence byte, then the child |
//! | result           | 1 = ok then payload, 0 = error then its index |
//! | error set        | 2-byte index into the sorted name list |
//! | enumeration      | backing integer |
//! | tagged union     | tag, then the active arm |
//! | map              | 4-byte count, then key/value pairs |
//!
//! ## Usage
//!
//! This crate is typically used through the `shapewire` crate, which adds the
//! `WireObject` derive macro.
//!
//! ```rust
//! use shapewire_core::alloc::Budget;
//! use shapewire_core::codec::Codec;
//!
//! let codec = Codec::default();
//! let bytes = codec.serialize_to_vec(&vec![String::from("a"), String::from("b")]).unwrap();
//!
//! let budget = Budget::unlimited();
//! let mut source = bytes.as_slice();
//! let names: Vec<String> = codec.deserialize_alloc(&mut source, &budget).unwrap();
//! assert_eq!(names, ["a", "b"]);
//! codec.release(&budget, names);
//! assert_eq!(budget.live_allocations(), 0);
//! ```

pub mod alloc;
pub mod buffer;
pub mod codec;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod resolver;
pub mod serializer;
pub mod shape;

pub use alloc::{Allocator, Budget, Global, Lease};
pub use codec::{deserialize, deserialize_alloc, release, serialize, Codec};
pub use config::Config;
pub use error::Error;
pub use fingerprint::Fingerprint;
pub use resolver::context::{ReadContext, WriteContext};
pub use serializer::{ErrorSet, Lanes, Partial, Serializer};
pub use shape::{EnumShape, RecordShape, Shape};
