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

use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::Serializer;
use crate::shape::Shape;

impl Serializer for bool {
    const WIRE_ALLOCATES: bool = false;

    fn wire_shape() -> Shape {
        Shape::Bool
    }

    #[inline(always)]
    fn wire_write(&self, context: &mut WriteContext<'_>) -> Result<(), Error> {
        context.writer.write_u8(u8::from(*self))
    }

    /// Any nonzero byte reads as `true`.
    #[inline(always)]
    fn wire_read(context: &mut ReadContext<'_>) -> Result<Self, Error> {
        Ok(context.reader.read_u8()? != 0)
    }
}
