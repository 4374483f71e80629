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

//! Support for derived enumerations and tagged unions.
//!
//! Derived code writes the backing integer (or union tag) with [`write_tag`]
//! and dispatches on the value returned by [`read_tag`]; anything the match
//! does not cover becomes [`unknown_value`].

use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};

/// Writes an enumeration value or union tag, width rounded up to whole bytes.
#[inline(always)]
pub fn write_tag(value: i128, bits: u16, context: &mut WriteContext<'_>) -> Result<(), Error> {
    context.writer.write_tag(value, bits)
}

#[inline(always)]
pub fn read_tag(bits: u16, signed: bool, context: &mut ReadContext<'_>) -> Result<i128, Error> {
    context.reader.read_tag(bits, signed)
}

/// A value with no declared member in an exhaustive enumeration, or a union
/// tag with no arm.
#[cold]
pub fn unknown_value<T: ?Sized>(value: i128) -> Error {
    Error::unexpected_data(format!(
        "{} has no member with value {}",
        std::any::type_name::<T>(),
        value
    ))
}
