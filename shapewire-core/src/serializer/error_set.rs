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

//! Error sets: closed sets of symbolic error names.
//!
//! On the wire a member is the 2-byte index of its name in the lexicographically
//! sorted name list, the same ordering the fingerprint feeds. Reordering the
//! declaration therefore changes neither the wire form nor the fingerprint.

use crate::error::Error;
use crate::fingerprint::sorted_names;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::Serializer;
use crate::shape::Shape;

/// A closed set of named errors, usually derived with
/// `#[derive(WireObject)] #[wire(error_set)]`.
pub trait ErrorSet: Serializer {
    /// Member names in declaration order.
    const NAMES: &'static [&'static str];

    fn name(&self) -> &'static str;

    fn from_name(name: &str) -> Option<Self>;
}

pub fn error_set_shape<E: ErrorSet>() -> Shape {
    Shape::ErrorSet(E::NAMES.to_vec())
}

/// Wire index of a member: the rank of its name among all names.
pub fn wire_index<E: ErrorSet>(value: &E) -> u16 {
    let name = value.name();
    E::NAMES.iter().filter(|n| **n < name).count() as u16
}

pub fn write_error<E: ErrorSet>(value: &E, context: &mut WriteContext<'_>) -> Result<(), Error> {
    context.writer.write_u16(wire_index(value))
}

pub fn read_error<E: ErrorSet>(context: &mut ReadContext<'_>) -> Result<E, Error> {
    let index = context.reader.read_u16()?;
    let sorted = sorted_names(E::NAMES);
    let name = sorted.get(index as usize).ok_or_else(|| {
        Error::unexpected_data(format!(
            "error index {} out of range for {} names",
            index,
            sorted.len()
        ))
    })?;
    E::from_name(name)
        .ok_or_else(|| Error::unexpected_data(format!("error `{}` has no member", name)))
}
