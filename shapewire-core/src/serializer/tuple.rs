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
use crate::serializer::{Partial, Serializer};
use crate::shape::Shape;

/// Tuples are anonymous records: elements in order, no framing.
macro_rules! impl_tuple_serializer {
    ($($name:ident: $idx:tt),+) => {
        impl<$($name: Serializer),+> Serializer for ($($name,)+) {
            const WIRE_ALLOCATES: bool = false $(| $name::WIRE_ALLOCATES)+;

            fn wire_shape() -> Shape {
                Shape::record(vec![$($name::wire_shape()),+])
            }

            #[inline(always)]
            fn wire_write(&self, context: &mut WriteContext<'_>) -> Result<(), Error> {
                $(self.$idx.wire_write(context)?;)+
                Ok(())
            }

            #[allow(non_snake_case)]
            fn wire_read(context: &mut ReadContext<'_>) -> Result<Self, Error> {
                $(let $name = Partial::<$name>::read(context)?;)+
                Ok(($($name.into_inner(),)+))
            }

            fn wire_release(self, allocator: &dyn Allocator) {
                $(self.$idx.wire_release(allocator);)+
            }
        }
    };
}

impl_tuple_serializer!(A: 0);
impl_tuple_serializer!(A: 0, B: 1);
impl_tuple_serializer!(A: 0, B: 1, C: 2);
impl_tuple_serializer!(A: 0, B: 1, C: 2, D: 3);
impl_tuple_serializer!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_tuple_serializer!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_tuple_serializer!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_tuple_serializer!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);
