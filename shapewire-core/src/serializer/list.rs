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

use crate::alloc::{seq_layout, Allocator, Lease};
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::{release_seq, Serializer};
use crate::shape::Shape;

/// Reads a sequence length header.
#[inline(always)]
pub(crate) fn read_seq_len(context: &mut ReadContext<'_>) -> Result<usize, Error> {
    let len = context.reader.read_u64()?;
    usize::try_from(len)
        .map_err(|_| Error::out_of_memory(format!("sequence of {} elements", len)))
}

#[inline(always)]
pub(crate) fn write_seq<T: Serializer>(
    items: &[T],
    context: &mut WriteContext<'_>,
) -> Result<(), Error> {
    context.writer.write_u64(items.len() as u64)?;
    T::wire_write_seq(items, context)
}

pub(crate) fn read_seq<T: Serializer>(context: &mut ReadContext<'_>) -> Result<Vec<T>, Error> {
    let len = read_seq_len(context)?;
    let lease = Lease::acquire(context.allocator(), seq_layout::<T>(len)?)?;
    let items = T::wire_read_seq(len, context)?;
    lease.commit();
    Ok(items)
}

pub(crate) fn release_seq_buffer<T: Serializer>(items: Vec<T>, allocator: &dyn Allocator) {
    let len = items.len();
    release_seq(items, allocator);
    if let Ok(layout) = seq_layout::<T>(len) {
        allocator.release(layout);
    }
}

impl<T: Serializer> Serializer for Vec<T> {
    const WIRE_ALLOCATES: bool = T::WIRE_ALLOCATES | true;

    fn wire_shape() -> Shape {
        Shape::seq(T::wire_shape())
    }

    fn wire_write(&self, context: &mut WriteContext<'_>) -> Result<(), Error> {
        write_seq(self, context)
    }

    fn wire_read(context: &mut ReadContext<'_>) -> Result<Self, Error> {
        read_seq(context)
    }

    fn wire_release(self, allocator: &dyn Allocator) {
        release_seq_buffer(self, allocator);
    }
}

impl<T: Serializer> Serializer for Box<[T]> {
    const WIRE_ALLOCATES: bool = T::WIRE_ALLOCATES | true;

    fn wire_shape() -> Shape {
        Shape::seq(T::wire_shape())
    }

    fn wire_write(&self, context: &mut WriteContext<'_>) -> Result<(), Error> {
        write_seq(self, context)
    }

    fn wire_read(context: &mut ReadContext<'_>) -> Result<Self, Error> {
        read_seq(context).map(Vec::into_boxed_slice)
    }

    fn wire_release(self, allocator: &dyn Allocator) {
        release_seq_buffer(self.into_vec(), allocator);
    }
}
