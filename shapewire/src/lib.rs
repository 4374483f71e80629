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

//! # Shapewire
//!
//! Shapewire is a compact binary codec driven entirely by the static shape of
//! a Rust type. There is no schema language and no per-field tagging: the
//! type alone decides the bytes, and an 8-byte structural fingerprint written
//! ahead of each value lets the reader refuse data that was produced for a
//! different shape.
//!
//! ## Key Features
//!
//! - **Four walks, one shape**: encode, decode, release and fingerprint are
//!   all derived from the same description and never disagree
//! - **Accounted decoding**: every owned allocation a decode makes is
//!   acquired from an [`Allocator`] and handed back by [`release`]
//! - **Safe on hostile input**: truncated or corrupt data produces an
//!   [`Error`] and releases whatever was already built
//! - **Derive support**: records, enumerations, tagged unions and error sets
//!   via `#[derive(WireObject)]`
//!
//! ## Quick Start
//!
//! Add `shapewire` and `shapewire-core` to your dependencies; the derive
//! expands to paths inside `shapewire_core`.
//!
//! ```rust
//! use shapewire::{Budget, Codec, Error, WireObject};
//!
//! #[derive(WireObject, Debug, PartialEq)]
//! struct Reading {
//!     sensor: String,
//!     samples: Vec<u16>,
//!     status: Status,
//! }
//!
//! #[derive(WireObject, Debug, PartialEq)]
//! enum Status {
//!     Ok,
//!     Degraded,
//!     Offline,
//! }
//!
//! # fn main() -> Result<(), Error> {
//! let codec = Codec::default();
//! let reading = Reading {
//!     sensor: "north".to_string(),
//!     samples: vec![12, 14, 11],
//!     status: Status::Degraded,
//! };
//!
//! let bytes = codec.serialize_to_vec(&reading)?;
//!
//! let budget = Budget::unlimited();
//! let mut source = bytes.as_slice();
//! let decoded: Reading = codec.deserialize_alloc(&mut source, &budget)?;
//! assert_eq!(decoded, reading);
//!
//! codec.release(&budget, decoded);
//! assert_eq!(budget.live_allocations(), 0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Supported Types
//!
//! - `()`, `bool`, `char`, all integer widths up to 128 bits, `f32`, `f64`
//! - `Box<T>`, `Vec<T>`, `Box<[T]>`, `String`, `CString`
//! - `[T; N]` and [`Lanes<T, N>`](Lanes) fixed vectors
//! - `Option<T>`, tuples up to eight elements
//! - `Result<T, E>` with `E: ErrorSet`, inside a record
//! - `HashMap<K, V>`, `BTreeMap<K, V>`
//! - derived structs and enums
//!
//! Shapes are checked when first used: a map keyed by something that cannot
//! be compared, or a result at the top level, is rejected before any byte is
//! read or written.
//!
//! ## Fingerprints
//!
//! Two types with the same structure have the same fingerprint regardless of
//! their names. Field order, integer widths and enumeration values all
//! count; the declaration order of enumeration members and error names does
//! not.
//!
//! ```rust
//! use shapewire::Codec;
//!
//! let codec = Codec::default();
//! let a = codec.fingerprint_of::<(u32, Option<u8>)>().unwrap();
//! let b = codec.fingerprint_of::<(Option<u8>, u32)>().unwrap();
//! assert_ne!(a, b);
//! ```
//!
//! ## Allocation
//!
//! [`Codec::deserialize`] only accepts shapes that never allocate; anything
//! holding a box, sequence or map goes through [`Codec::deserialize_alloc`]
//! with an [`Allocator`]. [`Budget`] counts live allocations and refuses
//! requests past a byte limit, surfacing [`Error::OutOfMemory`].
//!
//! ## Thread Safety
//!
//! A [`Codec`] is `Send + Sync`. Share one behind an `Arc` and give each call
//! its own sink, source and allocator.
//!
//! ## Logging
//!
//! Shape resolution and fingerprint mismatches are reported through
//! `tracing` at debug level; every completed encode and decode at trace
//! level.

pub use shapewire_core::{
    alloc::{Allocator, Budget, Global, Lease},
    buffer::{Reader, Writer},
    codec::{deserialize, deserialize_alloc, release, serialize, Codec},
    config::Config,
    error::Error,
    fingerprint::Fingerprint,
    resolver::context::{ReadContext, WriteContext},
    serializer::{ErrorSet, Lane, Lanes, Partial, Serializer},
    shape::{EnumShape, RecordShape, Shape},
};
pub use shapewire_derive::WireObject;
