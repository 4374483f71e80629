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

//! Associative maps.
//!
//! Wire form: a 4-byte little-endian entry count, then each key and value in
//! the map's iteration order. Maps above `u32::MAX` entries fail with
//! [`Error::MapTooLarge`] before a single byte is written.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use crate::alloc::{array_layout, Allocator, Lease};
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::{Partial, Serializer, PREALLOC_BYTES};
use crate::shape::Shape;

/// Entry count as it travels on the wire.
#[inline(always)]
pub fn map_len_to_wire(len: usize) -> Result<u32, Error> {
    u32::try_from(len).map_err(|_| Error::map_too_large(len))
}

/// Writes a map of `len` entries. The count is checked before anything is
/// written.
pub fn write_map_data<'a, K, V, I>(
    len: usize,
    entries: I,
    context: &mut WriteContext<'_>,
) -> Result<(), Error>
where
    K: Serializer,
    V: Serializer,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    let count = map_len_to_wire(len)?;
    context.writer.write_u32(count)?;
    for (key, value) in entries {
        key.wire_write(context)?;
        value.wire_write(context)?;
    }
    Ok(())
}

/// The map types that can be rebuilt from a stream of entries.
trait EntryTable<K, V>: Sized {
    fn with_room(count: usize) -> Result<Self, Error>;
    fn has_key(&self, key: &K) -> bool;
    fn put(&mut self, key: K, value: V);
    fn into_entries(self) -> impl Iterator<Item = (K, V)>;
}

impl<K: Eq + Hash, V, S: BuildHasher + Default> EntryTable<K, V> for HashMap<K, V, S> {
    fn with_room(count: usize) -> Result<Self, Error> {
        let mut map = HashMap::with_hasher(S::default());
        let upfront = count.min(PREALLOC_BYTES / std::mem::size_of::<(K, V)>().max(1));
        map.try_reserve(upfront)
            .map_err(|e| Error::out_of_memory(e.to_string()))?;
        Ok(map)
    }

    fn has_key(&self, key: &K) -> bool {
        self.contains_key(key)
    }

    fn put(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn into_entries(self) -> impl Iterator<Item = (K, V)> {
        self.into_iter()
    }
}

impl<K: Ord, V> EntryTable<K, V> for BTreeMap<K, V> {
    fn with_room(_count: usize) -> Result<Self, Error> {
        Ok(BTreeMap::new())
    }

    fn has_key(&self, key: &K) -> bool {
        self.contains_key(key)
    }

    fn put(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn into_entries(self) -> impl Iterator<Item = (K, V)> {
        self.into_iter()
    }
}

fn read_map<K, V, M>(context: &mut ReadContext<'_>) -> Result<M, Error>
where
    K: Serializer,
    V: Serializer,
    M: EntryTable<K, V>,
{
    let count = context.reader.read_u32()? as usize;
    let allocator = context.allocator();
    let lease = Lease::acquire(allocator, array_layout::<(K, V)>(count)?)?;
    let mut map = M::with_room(count)?;
    for _ in 0..count {
        match read_entry::<K, V, M>(&map, context) {
            Ok((key, value)) => map.put(key, value),
            Err(err) => {
                release_entries::<K, V, M>(map, allocator);
                return Err(err);
            }
        }
    }
    lease.commit();
    Ok(map)
}

fn read_entry<K, V, M>(map: &M, context: &mut ReadContext<'_>) -> Result<(K, V), Error>
where
    K: Serializer,
    V: Serializer,
    M: EntryTable<K, V>,
{
    let key = Partial::<K>::read(context)?;
    let value = Partial::<V>::read(context)?;
    if map.has_key(&key) {
        return Err(Error::unexpected_data("duplicate map key"));
    }
    Ok((key.into_inner(), value.into_inner()))
}

fn release_entries<K, V, M>(map: M, allocator: &dyn Allocator)
where
    K: Serializer,
    V: Serializer,
    M: EntryTable<K, V>,
{
    if K::WIRE_ALLOCATES || V::WIRE_ALLOCATES {
        for (key, value) in map.into_entries() {
            key.wire_release(allocator);
            value.wire_release(allocator);
        }
    }
}

fn release_map<K, V, M>(map: M, len: usize, allocator: &dyn Allocator)
where
    K: Serializer,
    V: Serializer,
    M: EntryTable<K, V>,
{
    release_entries::<K, V, M>(map, allocator);
    if let Ok(layout) = array_layout::<(K, V)>(len) {
        allocator.release(layout);
    }
}

impl<K, V, S> Serializer for HashMap<K, V, S>
where
    K: Serializer + Eq + Hash,
    V: Serializer,
    S: BuildHasher + Default + 'static,
{
    const WIRE_ALLOCATES: bool = K::WIRE_ALLOCATES | V::WIRE_ALLOCATES | true;

    fn wire_shape() -> Shape {
        Shape::map(K::wire_shape(), V::wire_shape())
    }

    fn wire_write(&self, context: &mut WriteContext<'_>) -> Result<(), Error> {
        write_map_data(self.len(), self.iter(), context)
    }

    fn wire_read(context: &mut ReadContext<'_>) -> Result<Self, Error> {
        read_map::<K, V, Self>(context)
    }

    fn wire_release(self, allocator: &dyn Allocator) {
        let len = self.len();
        release_map::<K, V, Self>(self, len, allocator);
    }
}

impl<K, V> Serializer for BTreeMap<K, V>
where
    K: Serializer + Ord,
    V: Serializer,
{
    const WIRE_ALLOCATES: bool = K::WIRE_ALLOCATES | V::WIRE_ALLOCATES | true;

    fn wire_shape() -> Shape {
        Shape::map(K::wire_shape(), V::wire_shape())
    }

    fn wire_write(&self, context: &mut WriteContext<'_>) -> Result<(), Error> {
        write_map_data(self.len(), self.iter(), context)
    }

    fn wire_read(context: &mut ReadContext<'_>) -> Result<Self, Error> {
        read_map::<K, V, Self>(context)
    }

    fn wire_release(self, allocator: &dyn Allocator) {
        let len = self.len();
        release_map::<K, V, Self>(self, len, allocator);
    }
}
