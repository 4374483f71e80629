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

use std::alloc::Layout;

use crate::alloc::{Allocator, Lease};
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::Serializer;
use crate::shape::Shape;

/// Owned reference: only the pointee reaches the wire.
impl<T: Serializer> Serializer for Box<T> {
    // Mentions T so that a self-recursive type fails const evaluation.
    const WIRE_ALLOCATES: bool = T::WIRE_ALLOCATES | true;

    fn wire_shape() -> Shape {
        Shape::boxed(T::wire_shape())
    }

    #[inline(always)]
    fn wire_write(&self, context: &mut WriteContext<'_>) -> Result<(), Error> {
        T::wire_write(self, context)
    }

    fn wire_read(context: &mut ReadContext<'_>) -> Result<Self, Error> {
        let lease = Lease::acquire(context.allocator(), Layout::new::<T>())?;
        let value = T::wire_read(context)?;
        lease.commit();
        Ok(Box::new(value))
    }

    fn wire_release(self, allocator: &dyn Allocator) {
        (*self).wire_release(allocator);
        allocator.release(Layout::new::<T>());
    }
}
