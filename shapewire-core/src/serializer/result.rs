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
use crate::serializer::error_set::{error_set_shape, read_error, write_error, ErrorSet};
use crate::serializer::Serializer;
use crate::shape::Shape;

/// A flag byte (1 = ok) followed by the ok payload or the error-set member.
///
/// Only legal as a field of a record or union arm.
impl<T: Serializer, E: ErrorSet> Serializer for Result<T, E> {
    const WIRE_ALLOCATES: bool = T::WIRE_ALLOCATES;
    const WIRE_TOP_LEVEL: bool = false;

    fn wire_shape() -> Shape {
        Shape::result(T::wire_shape(), error_set_shape::<E>())
    }

    fn wire_write(&self, context: &mut WriteContext<'_>) -> Result<(), Error> {
        match self {
            Ok(v) => {
                context.writer.write_u8(1)?;
                v.wire_write(context)
            }
            Err(e) => {
                context.writer.write_u8(0)?;
                write_error(e, context)
            }
        }
    }

    fn wire_read(context: &mut ReadContext<'_>) -> Result<Self, Error> {
        if context.reader.read_u8()? != 0 {
            T::wire_read(context).map(Ok)
        } else {
            read_error(context).map(Err)
        }
    }

    fn wire_release(self, allocator: &dyn Allocator) {
        if let Ok(v) = self {
            v.wire_release(allocator);
        }
    }
}
