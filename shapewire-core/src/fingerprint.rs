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

//! Structural fingerprint of a [`Shape`].
//!
//! The fingerprint is FNV-1a 64 over a token stream produced top-down from the
//! shape. It is what a decoder compares against the 8-byte stream header to
//! reject data produced for a different shape.

use std::fmt;

use crate::buffer::byte_width;
use crate::shape::{int_name, EnumShape, Shape};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// 8-byte structural digest of a shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

impl Fingerprint {
    pub const fn from_u64(value: u64) -> Self {
        Fingerprint(value)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Wire form: the digest as a little-endian u64.
    pub const fn to_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    pub const fn from_bytes(bytes: [u8; 8]) -> Self {
        Fingerprint(u64::from_le_bytes(bytes))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Incremental FNV-1a 64 accumulator.
#[derive(Clone, Copy)]
struct Fnv1a(u64);

impl Fnv1a {
    fn new() -> Self {
        Fnv1a(FNV_OFFSET)
    }

    fn bytes(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 ^= u64::from(*byte);
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }

    /// Text tokens are NUL-terminated so adjacent tokens cannot run together.
    fn token(&mut self, token: &str) {
        self.bytes(token.as_bytes());
        self.bytes(&[0]);
    }

    fn len(&mut self, len: usize) {
        self.bytes(&(len as u64).to_le_bytes());
    }

    fn finish(self) -> Fingerprint {
        Fingerprint(self.0)
    }
}

impl Shape {
    /// Computes the structural fingerprint of this shape.
    ///
    /// Field names never contribute. Error-set names and exhaustive enum
    /// members are fed in sorted order, so only their content matters; record
    /// fields and union arms are fed in declaration order.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut hasher = Fnv1a::new();
        feed(&mut hasher, self);
        hasher.finish()
    }
}

impl EnumShape {
    pub fn fingerprint(&self) -> Fingerprint {
        let mut hasher = Fnv1a::new();
        feed_enum(&mut hasher, self);
        hasher.finish()
    }
}

fn feed(h: &mut Fnv1a, shape: &Shape) {
    match shape {
        Shape::Unit => h.token("void"),
        Shape::Bool => h.token("bool"),
        Shape::Int { bits, signed } => h.token(&int_name(*bits, *signed)),
        Shape::Float { bits } => h.token(&format!("f{}", bits)),
        Shape::Boxed(pointee) => {
            h.token("pointer");
            feed(h, pointee);
        }
        Shape::Seq {
            element,
            terminator,
        } => {
            h.token("slice");
            feed_terminator(h, *terminator);
            feed(h, element);
        }
        Shape::Array {
            element,
            len,
            terminator,
        } => {
            h.token("array");
            h.len(*len);
            feed_terminator(h, *terminator);
            feed(h, element);
        }
        Shape::Vector { element, len } => {
            h.token("vector");
            h.len(*len);
            feed(h, element);
        }
        Shape::Record(record) => {
            h.token("struct");
            if let Some(hook) = record.hook {
                h.token("override");
                h.token(hook);
            }
            h.len(record.fields.len());
            for field in &record.fields {
                feed(h, field);
            }
        }
        Shape::Optional(child) => {
            h.token("optional");
            feed(h, child);
        }
        Shape::Result { ok, err } => {
            h.token("error union");
            feed(h, err);
            feed(h, ok);
        }
        Shape::ErrorSet(names) => {
            h.token("error set");
            h.len(names.len());
            for name in sorted_names(names) {
                h.token(name);
            }
        }
        Shape::Enum(shape) => feed_enum(h, shape),
        Shape::Union { tag, arms } => {
            h.token("union");
            h.bytes(&tag.fingerprint().to_bytes());
            for (_, arm) in arms {
                feed(h, arm);
            }
        }
        Shape::Map { key, value } => {
            h.token("hashmap");
            feed(h, key);
            feed(h, value);
        }
    }
}

fn feed_terminator(h: &mut Fnv1a, terminator: Option<u8>) {
    if let Some(t) = terminator {
        h.token("sentinel");
        h.bytes(&[t]);
    }
}

fn feed_enum(h: &mut Fnv1a, shape: &EnumShape) {
    let backing = int_name(shape.bits, shape.signed);
    if !shape.exhaustive {
        h.token("enum.non-exhaustive");
        h.token(&backing);
        return;
    }
    h.token("enum.exhaustive");
    h.token(&backing);
    let width = byte_width(shape.bits);
    let mut members: Vec<_> = shape.variants.iter().collect();
    members.sort_by(|a, b| a.0.cmp(b.0));
    h.len(members.len());
    for (name, value) in members {
        h.token(name);
        h.bytes(&value.to_le_bytes()[..width]);
    }
}

/// Error-set names in their canonical order. The wire index of an error is its
/// position in this list.
pub fn sorted_names(names: &[&'static str]) -> Vec<&'static str> {
    let mut sorted = names.to_vec();
    sorted.sort_unstable();
    sorted
}
