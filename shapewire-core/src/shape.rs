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

//! The closed set of value shapes understood by the encode, decode, release
//! and fingerprint walks.
//!
//! A [`Shape`] is built once per concrete type by
//! [`Serializer::wire_shape`](crate::serializer::Serializer::wire_shape) and is
//! immutable afterwards. Field names never appear in a shape: records are
//! identified structurally.

use std::collections::HashSet;
use std::fmt;

use crate::ensure;
use crate::error::Error;

/// Structural description of a value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Zero-sized value; nothing on the wire.
    Unit,
    Bool,
    /// Integer of `bits` width. Platform-native widths are described as 64.
    Int { bits: u16, signed: bool },
    Float { bits: u16 },
    /// Single-owner indirection. Only the pointee reaches the wire.
    Boxed(Box<Shape>),
    /// Variable-length sequence with an 8-byte length prefix. A terminator is
    /// appended to the decoded buffer but never written.
    Seq {
        element: Box<Shape>,
        terminator: Option<u8>,
    },
    /// Fixed-length array; the length is static and never written.
    Array {
        element: Box<Shape>,
        len: usize,
        terminator: Option<u8>,
    },
    /// Fixed-width lane vector. Encodes exactly like [`Shape::Array`].
    Vector { element: Box<Shape>, len: usize },
    Record(RecordShape),
    Optional(Box<Shape>),
    /// Ok payload or an error-set member; `err` is always a [`Shape::ErrorSet`].
    Result { ok: Box<Shape>, err: Box<Shape> },
    /// Symbolic error names in declaration order.
    ErrorSet(Vec<&'static str>),
    Enum(EnumShape),
    Union {
        tag: EnumShape,
        arms: Vec<(&'static str, Shape)>,
    },
    /// Associative map with unique keys.
    Map { key: Box<Shape>, value: Box<Shape> },
}

/// Fields of a record in declaration order, plus the optional override hook.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordShape {
    pub fields: Vec<Shape>,
    /// Name of the custom encode/decode pair replacing the field walk.
    pub hook: Option<&'static str>,
}

/// Backing integer and declared members of an enumeration or union tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumShape {
    pub bits: u16,
    pub signed: bool,
    /// An exhaustive enumeration only accepts its declared values.
    pub exhaustive: bool,
    pub variants: Vec<(&'static str, i128)>,
}

impl EnumShape {
    pub fn exhaustive(bits: u16, signed: bool, variants: Vec<(&'static str, i128)>) -> Self {
        EnumShape {
            bits,
            signed,
            exhaustive: true,
            variants,
        }
    }

    pub fn open(bits: u16, signed: bool) -> Self {
        EnumShape {
            bits,
            signed,
            exhaustive: false,
            variants: Vec::new(),
        }
    }

    /// Whether `value` is a legal member of this enumeration.
    pub fn accepts(&self, value: i128) -> bool {
        if self.exhaustive {
            self.variants.iter().any(|(_, v)| *v == value)
        } else {
            fits(value, self.bits, self.signed)
        }
    }

    pub fn name_of(&self, value: i128) -> Option<&'static str> {
        self.variants
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(name, _)| *name)
    }

    pub(crate) fn backing(&self) -> Shape {
        Shape::Int {
            bits: self.bits,
            signed: self.signed,
        }
    }

    fn validate(&self) -> Result<(), Error> {
        ensure!(
            (1..=128).contains(&self.bits),
            Error::invalid_shape(format!("enum backing width {} out of range", self.bits))
        );
        let mut names = HashSet::new();
        let mut values = HashSet::new();
        for (name, value) in &self.variants {
            ensure!(
                names.insert(*name),
                Error::invalid_shape(format!("enum member `{}` declared twice", name))
            );
            ensure!(
                values.insert(*value),
                Error::invalid_shape(format!("enum value {} declared twice", value))
            );
            ensure!(
                fits(*value, self.bits, self.signed),
                Error::invalid_shape(format!(
                    "enum value {} does not fit {}",
                    value,
                    int_name(self.bits, self.signed)
                ))
            );
        }
        Ok(())
    }
}

/// Where a shape sits relative to its parent; results and error sets are only
/// legal in a record slot.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Slot {
    Root,
    Field,
    Nested,
}

impl Shape {
    pub fn int(bits: u16, signed: bool) -> Shape {
        Shape::Int { bits, signed }
    }

    pub fn boxed(pointee: Shape) -> Shape {
        Shape::Boxed(Box::new(pointee))
    }

    pub fn seq(element: Shape) -> Shape {
        Shape::Seq {
            element: Box::new(element),
            terminator: None,
        }
    }

    pub fn terminated_seq(element: Shape, terminator: u8) -> Shape {
        Shape::Seq {
            element: Box::new(element),
            terminator: Some(terminator),
        }
    }

    pub fn array(element: Shape, len: usize) -> Shape {
        Shape::Array {
            element: Box::new(element),
            len,
            terminator: None,
        }
    }

    pub fn vector(element: Shape, len: usize) -> Shape {
        Shape::Vector {
            element: Box::new(element),
            len,
        }
    }

    pub fn record(fields: Vec<Shape>) -> Shape {
        Shape::Record(RecordShape { fields, hook: None })
    }

    /// A record whose encode/decode is delegated to the named hook.
    pub fn hooked_record(fields: Vec<Shape>, hook: &'static str) -> Shape {
        Shape::Record(RecordShape {
            fields,
            hook: Some(hook),
        })
    }

    pub fn optional(child: Shape) -> Shape {
        Shape::Optional(Box::new(child))
    }

    pub fn result(ok: Shape, err: Shape) -> Shape {
        Shape::Result {
            ok: Box::new(ok),
            err: Box::new(err),
        }
    }

    pub fn map(key: Shape, value: Shape) -> Shape {
        Shape::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Whether decoding this shape acquires memory from an allocator.
    ///
    /// Overridden records never allocate: the hook owns its wire form and has
    /// no access to allocation bookkeeping.
    pub fn allocates(&self) -> bool {
        match self {
            Shape::Boxed(_) | Shape::Seq { .. } | Shape::Map { .. } => true,
            Shape::Unit
            | Shape::Bool
            | Shape::Int { .. }
            | Shape::Float { .. }
            | Shape::ErrorSet(_)
            | Shape::Enum(_) => false,
            Shape::Array { element, .. } | Shape::Vector { element, .. } => element.allocates(),
            Shape::Record(record) => {
                record.hook.is_none() && record.fields.iter().any(Shape::allocates)
            }
            Shape::Optional(child) => child.allocates(),
            Shape::Result { ok, err } => ok.allocates() || err.allocates(),
            Shape::Union { arms, .. } => arms.iter().any(|(_, arm)| arm.allocates()),
        }
    }

    /// Checks the construction-time rules for a shape handed to the entry
    /// points.
    pub fn validate_root(&self) -> Result<(), Error> {
        self.validate(Slot::Root)
    }

    fn validate(&self, slot: Slot) -> Result<(), Error> {
        match self {
            Shape::Unit | Shape::Bool => Ok(()),
            Shape::Int { bits, .. } => {
                ensure!(
                    (1..=128).contains(bits),
                    Error::invalid_shape(format!("integer width {} out of range", bits))
                );
                Ok(())
            }
            Shape::Float { bits } => {
                ensure!(
                    matches!(bits, 16 | 32 | 64 | 80 | 128),
                    Error::invalid_shape(format!("float width {} unsupported", bits))
                );
                Ok(())
            }
            Shape::Boxed(pointee) => pointee.validate(Slot::Nested),
            Shape::Seq {
                element,
                terminator,
            }
            | Shape::Array {
                element,
                terminator,
                ..
            } => {
                if terminator.is_some() {
                    ensure!(
                        element.is_byte(),
                        Error::invalid_shape(format!("terminator on non-byte element {}", element))
                    );
                }
                element.validate(Slot::Nested)
            }
            Shape::Vector { element, .. } => {
                ensure!(
                    matches!(
                        **element,
                        Shape::Bool | Shape::Int { .. } | Shape::Float { .. }
                    ),
                    Error::invalid_shape(format!("vector lane {} is not a scalar", element))
                );
                element.validate(Slot::Nested)
            }
            Shape::Record(record) => {
                for field in &record.fields {
                    field.validate(Slot::Field)?;
                }
                Ok(())
            }
            Shape::Optional(child) => child.validate(Slot::Nested),
            Shape::Result { ok, err } => {
                ensure!(
                    slot == Slot::Field,
                    Error::invalid_shape("result is only legal as a record field")
                );
                ensure!(
                    matches!(**err, Shape::ErrorSet(_)),
                    Error::invalid_shape(format!("result error {} is not an error set", err))
                );
                ok.validate(Slot::Nested)?;
                err.validate(Slot::Field)
            }
            Shape::ErrorSet(names) => {
                ensure!(
                    slot == Slot::Field,
                    Error::invalid_shape("error set is only legal as a record field")
                );
                ensure!(
                    names.len() <= u16::MAX as usize + 1,
                    Error::invalid_shape(format!("error set of {} names overflows u16", names.len()))
                );
                let mut seen = HashSet::new();
                for name in names {
                    ensure!(
                        seen.insert(*name),
                        Error::invalid_shape(format!("error `{}` declared twice", name))
                    );
                }
                Ok(())
            }
            Shape::Enum(shape) => shape.validate(),
            Shape::Union { tag, arms } => {
                ensure!(
                    tag.exhaustive,
                    Error::invalid_shape("union tag must be an exhaustive enum")
                );
                tag.validate()?;
                ensure!(
                    tag.variants.len() == arms.len(),
                    Error::invalid_shape(format!(
                        "union declares {} arms for {} tag values",
                        arms.len(),
                        tag.variants.len()
                    ))
                );
                for ((tag_name, _), (arm_name, arm)) in tag.variants.iter().zip(arms) {
                    ensure!(
                        tag_name == arm_name,
                        Error::invalid_shape(format!(
                            "union arm `{}` does not match tag `{}`",
                            arm_name, tag_name
                        ))
                    );
                    arm.validate(Slot::Field)?;
                }
                Ok(())
            }
            Shape::Map { key, value } => {
                key.validate(Slot::Nested)?;
                value.validate(Slot::Nested)
            }
        }
    }

    /// Whether this is the raw-byte element that gets block reads and writes.
    pub fn is_byte(&self) -> bool {
        matches!(
            self,
            Shape::Int {
                bits: 8,
                signed: false
            }
        )
    }
}

/// Whether `value` is representable in a `bits`-wide integer.
pub(crate) fn fits(value: i128, bits: u16, signed: bool) -> bool {
    if bits >= 128 {
        return signed || value >= 0;
    }
    if !signed && bits >= 127 {
        return value >= 0;
    }
    if signed {
        let half = 1i128 << (bits - 1);
        (-half..half).contains(&value)
    } else {
        value >= 0 && value < (1i128 << bits)
    }
}

pub(crate) fn int_name(bits: u16, signed: bool) -> String {
    format!("{}{}", if signed { 'i' } else { 'u' }, bits)
}

fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: impl Iterator<Item = T>) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for EnumShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.exhaustive {
            return write!(f, "enum({}, ..)", int_name(self.bits, self.signed));
        }
        write!(f, "enum({}){{", int_name(self.bits, self.signed))?;
        join(
            f,
            self.variants
                .iter()
                .map(|(name, value)| format!("{}={}", name, value)),
        )?;
        f.write_str("}")
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Unit => f.write_str("()"),
            Shape::Bool => f.write_str("bool"),
            Shape::Int { bits, signed } => f.write_str(&int_name(*bits, *signed)),
            Shape::Float { bits } => write!(f, "f{}", bits),
            Shape::Boxed(pointee) => write!(f, "box {}", pointee),
            Shape::Seq {
                element,
                terminator: None,
            } => write!(f, "[{}]", element),
            Shape::Seq {
                element,
                terminator: Some(t),
            } => write!(f, "[{}:{}]", element, t),
            Shape::Array {
                element,
                len,
                terminator: None,
            } => write!(f, "[{}; {}]", element, len),
            Shape::Array {
                element,
                len,
                terminator: Some(t),
            } => write!(f, "[{}; {}:{}]", element, len, t),
            Shape::Vector { element, len } => write!(f, "lanes<{}; {}>", element, len),
            Shape::Record(record) => {
                f.write_str("record")?;
                if let Some(hook) = record.hook {
                    write!(f, "@{}", hook)?;
                }
                f.write_str("{")?;
                join(f, record.fields.iter())?;
                f.write_str("}")
            }
            Shape::Optional(child) => write!(f, "?{}", child),
            Shape::Result { ok, err } => write!(f, "{}!{}", err, ok),
            Shape::ErrorSet(names) => {
                f.write_str("error{")?;
                join(f, names.iter())?;
                f.write_str("}")
            }
            Shape::Enum(shape) => write!(f, "{}", shape),
            Shape::Union { tag, arms } => {
                write!(f, "union({}){{", int_name(tag.bits, tag.signed))?;
                join(f, arms.iter().map(|(name, arm)| format!("{}: {}", name, arm)))?;
                f.write_str("}")
            }
            Shape::Map { key, value } => write!(f, "map<{}, {}>", key, value),
        }
    }
}
