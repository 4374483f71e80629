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

//! # Shapewire Derive Macros
//!
//! `#[derive(WireObject)]` implements `shapewire_core::serializer::Serializer`
//! for a type, generating its shape and its encode, decode and release walks.
//! Generated code refers to `shapewire_core`, so the deriving crate depends on
//! it directly.
//!
//! ## What each kind of type becomes
//!
//! | declaration                                   | shape |
//! |-----------------------------------------------|-------|
//! | struct (named, tuple or unit)                 | record of the fields in declaration order |
//! | `#[wire(with = "path")]` struct               | record handed to `path::write` / `path::read` |
//! | `#[wire(open)] struct Code(u16);`             | non-exhaustive enumeration backed by the integer |
//! | enum without data                             | exhaustive enumeration of its discriminants |
//! | `#[wire(error_set)]` enum without data        | error set of the variant names |
//! | enum with data                                | tagged union keyed by the variant |
//!
//! An enumeration's backing integer is its `#[repr]` when one is given, and
//! otherwise the narrowest of `u8`..`u64` (`i8`..`i64` when a discriminant is
//! negative) holding every discriminant. Explicit discriminants must be
//! integer literals.
//!
//! ```rust,ignore
//! use shapewire_derive::WireObject;
//!
//! #[derive(WireObject, Debug, PartialEq)]
//! struct Header {
//!     magic: u32,
//!     flags: Option<u8>,
//! }
//!
//! #[derive(WireObject, Debug, PartialEq)]
//! enum Level {
//!     Low,
//!     High = 10,
//! }
//!
//! #[derive(WireObject, Debug, PartialEq)]
//! enum Packet {
//!     Ping,
//!     Data(Vec<u8>),
//!     Move { x: i32, y: i32 },
//! }
//! ```
//!
//! ## Override hooks
//!
//! `#[wire(with = "path")]` delegates to two functions:
//!
//! ```rust,ignore
//! pub fn write(value: &T, context: &mut WriteContext<'_>) -> Result<(), Error>;
//! pub fn read(context: &mut ReadContext<'_>) -> Result<T, Error>;
//! ```
//!
//! The shape keeps the field list and records the hook name, so the
//! fingerprint differs from the generic record. Hooked records may not use the
//! allocator.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod object;
mod util;

/// Derive macro for wire serialization.
///
/// # Example
///
/// ```rust,ignore
/// use shapewire_derive::WireObject;
///
/// #[derive(WireObject, Debug, Clone, Copy, PartialEq)]
/// #[wire(error_set)]
/// enum LookupError {
///     NotFound,
///     Denied,
/// }
///
/// #[derive(WireObject, Debug, PartialEq)]
/// struct Lookup {
///     key: String,
///     outcome: Result<u64, LookupError>,
/// }
/// ```
#[proc_macro_derive(WireObject, attributes(wire))]
pub fn proc_macro_derive_wire_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    object::derive_serializer(&input).into()
}
