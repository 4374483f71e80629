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
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::{release_seq, Serializer};
use crate::shape::Shape;

fn read_array<T: Serializer, const N: usize>(
    context: &mut ReadContext<'_>,
) -> Result<[T; N], Error> {
    let allocator = context.allocator();
    let items = T::wire_read_seq(N, context)?;
    match <[T; N]>::try_from(items) {
        Ok(array) => Ok(array),
        Err(items) => {
            let len = items.len();
            release_seq(items, allocator);
            Err(Error::unexpected_data(format!("decoded {} of {} array elements", len, N)))
        }
    }
}

/// Fixed-length array: elements back to back, no length prefix.
impl<T: Serializer, const N: usize> Serializer for [T; N] {
    const WIRE_ALLOCATES: bool = T::WIRE_ALLOCATES;

    fn wire_shape() -> Shape {
        Shape::array(T::wire_shape(), N)
    }

    #[inline(always)]
    fn wire_write(&self, context: &mut WriteContext<'_>) -> Result<(), Error> {
        T::wire_write_seq(self, context)
    }

    fn wire_read(context: &mut ReadContext<'_>) -> Result<Self, Error> {
        read_array(context)
    }

    fn wire_release(self, allocator: &dyn Allocator) {
        if T::WIRE_ALLOCATES {
            for item in self {
                item.wire_release(allocator);
            }
        }
    }
}

/// Scalar types that may fill the lanes of a [`Lanes`] vector.
pub trait Lane: Serializer + Copy {}

impl Lane for bool {}
impl Lane for u8 {}
impl Lane for u16 {}
impl Lane for u32 {}
impl Lane for u64 {}
impl Lane for i8 {}
impl Lane for i16 {}
impl Lane for i32 {}
impl Lane for i64 {}
impl Lane for f32 {}
impl Lane for f64 {}

/// Fixed-width vector of scalar lanes.
///
/// Encodes exactly like `[T; N]` but carries a distinct shape, so it
/// fingerprints differently from an array of the same length.
///
/// ```rust
/// use shapewire_core::serializer::Lanes;
///
/// let v = Lanes([1.0f32, 2.0, 3.0, 4.0]);
/// assert_eq!(v[2], 3.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Lanes<T: Lane, const N: usize>(pub [T; N]);

impl<T: Lane, const N: usize> std::ops::Deref for Lanes<T, N> {
    type Target = [T; N];

    fn deref(&self) -> &[T; N] {
        &self.0
    }
}

impl<T: Lane, const N: usize> std::ops::DerefMut for Lanes<T, N> {
    fn deref_mut(&mut self) -> &mut [T; N] {
        &mut self.0
    }
}

impl<T: Lane, const N: usize> From<[T; N]> for Lanes<T, N> {
    fn from(lanes: [T; N]) -> Self {
        Lanes(lanes)
    }
}

impl<T: Lane, const N: usize> Serializer for Lanes<T, N> {
    const WIRE_ALLOCATES: bool = false;

    fn wire_shape() -> Shape {
        Shape::vector(T::wire_shape(), N)
    }

    #[inline(always)]
    fn wire_write(&self, context: &mut WriteContext<'_>) -> Result<(), Error> {
        T::wire_write_seq(&self.0, context)
    }

    fn wire_read(context: &mut ReadContext<'_>) -> Result<Self, Error> {
        read_array(context).map(Lanes)
    }
}
