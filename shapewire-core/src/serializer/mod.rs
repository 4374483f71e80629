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

//! The [`Serializer`] trait and its implementations for std types.
//!
//! Every implementation carries all four walks of its shape: `wire_shape`
//! describes it, `wire_write` encodes, `wire_read` decodes and `wire_release`
//! returns what the decode acquired. They are written side by side per type so
//! that the walks cannot drift apart.

use std::mem::{self, ManuallyDrop};
use std::ops::Deref;

use crate::alloc::Allocator;
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::shape::Shape;

mod array;
mod bool;
mod box_;
pub mod enum_;
pub mod error_set;
mod list;
pub mod map;
mod number;
mod option;
mod result;
mod string;
mod tuple;

pub use array::{Lane, Lanes};
pub use error_set::ErrorSet;

/// Upper bound, in bytes, on what a sequence decode reserves before the
/// elements have actually been read.
pub(crate) const PREALLOC_BYTES: usize = 64 * 1024;

/// A type with a fixed wire shape.
///
/// Implemented for std scalars, strings, boxes, sequences, arrays, options,
/// results, tuples and maps. User records, enumerations, error sets and
/// tagged unions get it from `#[derive(WireObject)]`.
pub trait Serializer: Sized + 'static {
    /// Whether decoding acquires memory from the allocator. Must agree with
    /// [`Shape::allocates`] on [`Serializer::wire_shape`].
    const WIRE_ALLOCATES: bool;

    /// Whether the type may be handed to the entry points directly. Results
    /// and error sets have no slot to report through at the top level.
    const WIRE_TOP_LEVEL: bool = true;

    fn wire_shape() -> Shape;

    /// Encode walk.
    fn wire_write(&self, context: &mut WriteContext<'_>) -> Result<(), Error>;

    /// Decode walk. On failure every allocation made so far has been released.
    fn wire_read(context: &mut ReadContext<'_>) -> Result<Self, Error>;

    /// Release walk: returns every allocation [`Serializer::wire_read`]
    /// acquired, exactly once. Non-allocating types keep the no-op default.
    #[inline(always)]
    fn wire_release(self, allocator: &dyn Allocator) {
        let _ = allocator;
    }

    #[doc(hidden)]
    fn wire_write_seq(items: &[Self], context: &mut WriteContext<'_>) -> Result<(), Error> {
        for item in items {
            item.wire_write(context)?;
        }
        Ok(())
    }

    /// Decodes `len` consecutive elements into a new buffer. The buffer's
    /// allocator accounting belongs to the caller.
    #[doc(hidden)]
    fn wire_read_seq(len: usize, context: &mut ReadContext<'_>) -> Result<Vec<Self>, Error> {
        let allocator = context.allocator();
        let mut items = Vec::new();
        if let Err(err) = fill_seq(&mut items, len, context) {
            release_seq(items, allocator);
            return Err(err);
        }
        Ok(items)
    }
}

fn fill_seq<T: Serializer>(
    items: &mut Vec<T>,
    len: usize,
    context: &mut ReadContext<'_>,
) -> Result<(), Error> {
    let upfront = len.min(PREALLOC_BYTES / mem::size_of::<T>().max(1));
    crate::alloc::try_reserve(items, upfront)?;
    for _ in 0..len {
        if items.len() == items.capacity() {
            items
                .try_reserve(1)
                .map_err(|e| Error::out_of_memory(e.to_string()))?;
        }
        items.push(T::wire_read(context)?);
    }
    Ok(())
}

/// Releases every element of a decoded sequence; the buffer itself is the
/// caller's.
#[inline]
pub fn release_seq<T: Serializer>(items: Vec<T>, allocator: &dyn Allocator) {
    if T::WIRE_ALLOCATES {
        for item in items {
            item.wire_release(allocator);
        }
    }
}

/// A decoded component of a value still under construction.
///
/// Dropping it runs the component's release walk, so an early return out of a
/// composite decode gives back everything decoded before the failure. Derived
/// record and union decoders read each field into one of these.
pub struct Partial<'a, T: Serializer> {
    value: ManuallyDrop<T>,
    allocator: &'a dyn Allocator,
}

impl<'a, T: Serializer> Partial<'a, T> {
    #[inline(always)]
    pub fn read(context: &mut ReadContext<'a>) -> Result<Self, Error> {
        let allocator = context.allocator();
        let value = T::wire_read(context)?;
        Ok(Partial {
            value: ManuallyDrop::new(value),
            allocator,
        })
    }

    /// Takes the component out; it is no longer released on drop.
    #[inline(always)]
    pub fn into_inner(self) -> T {
        let mut this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped, so the value is taken exactly once.
        unsafe { ManuallyDrop::take(&mut this.value) }
    }
}

impl<T: Serializer> Deref for Partial<'_, T> {
    type Target = T;

    #[inline(always)]
    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Serializer> Drop for Partial<'_, T> {
    fn drop(&mut self) {
        // SAFETY: drop runs at most once and `into_inner` suppresses it.
        let value = unsafe { ManuallyDrop::take(&mut self.value) };
        value.wire_release(self.allocator);
    }
}
