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

mod common;

use std::alloc::Layout;
use std::collections::BTreeMap;
use std::ffi::CString;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::{test_roundtrip, test_truncations};
use shapewire::{Allocator, Budget, Codec, Error, Global, WireObject};

#[derive(WireObject, Debug, PartialEq)]
struct Node {
    label: CString,
    weight: Box<u32>,
    children: Vec<Leaf>,
}

#[derive(WireObject, Debug, PartialEq)]
struct Leaf {
    name: String,
    data: Option<Box<[u8]>>,
}

#[derive(WireObject, Debug, PartialEq)]
struct Index {
    entries: BTreeMap<u16, Vec<String>>,
    root: Node,
}

fn sample_index() -> Index {
    Index {
        entries: BTreeMap::from([
            (1, vec!["one".to_string()]),
            (2, vec![]),
            (3, vec!["three".to_string(), "drei".to_string()]),
        ]),
        root: Node {
            label: CString::new("root").unwrap(),
            weight: Box::new(17),
            children: vec![
                Leaf {
                    name: "a".to_string(),
                    data: Some(vec![1, 2, 3].into_boxed_slice()),
                },
                Leaf {
                    name: String::new(),
                    data: None,
                },
            ],
        },
    }
}

/// Counts grants and releases per layout size.
#[derive(Default)]
struct Ledger {
    acquired: AtomicUsize,
    released: AtomicUsize,
    acquired_bytes: AtomicUsize,
    released_bytes: AtomicUsize,
}

impl Allocator for Ledger {
    fn acquire(&self, layout: Layout) -> Result<(), Error> {
        self.acquired.fetch_add(1, Ordering::Relaxed);
        self.acquired_bytes.fetch_add(layout.size(), Ordering::Relaxed);
        Ok(())
    }

    fn release(&self, layout: Layout) {
        self.released.fetch_add(1, Ordering::Relaxed);
        self.released_bytes.fetch_add(layout.size(), Ordering::Relaxed);
    }
}

#[test]
fn test_release_returns_every_allocation() {
    let codec = Codec::default();
    let bytes = codec.serialize_to_vec(&sample_index()).unwrap();

    let ledger = Ledger::default();
    let mut source = bytes.as_slice();
    let index: Index = codec.deserialize_alloc(&mut source, &ledger).unwrap();
    assert_eq!(index, sample_index());

    // map table, three vecs, three strings, CString, box, children vec,
    // two names and one boxed slice
    assert_eq!(ledger.acquired.load(Ordering::Relaxed), 13);
    assert_eq!(ledger.released.load(Ordering::Relaxed), 0);

    codec.release(&ledger, index);
    assert_eq!(ledger.released.load(Ordering::Relaxed), 13);
    assert_eq!(
        ledger.released_bytes.load(Ordering::Relaxed),
        ledger.acquired_bytes.load(Ordering::Relaxed)
    );
}

#[test]
fn test_empty_values_still_allocate() {
    let codec = Codec::default().fingerprint(false);
    let budget = Budget::unlimited();

    let label: CString = codec
        .deserialize_from_slice(&[0; 8], &budget)
        .unwrap();
    assert_eq!(label.as_bytes(), b"");
    assert_eq!(budget.live_allocations(), 1);
    assert_eq!(budget.bytes_in_use(), 1);
    codec.release(&budget, label);

    let name: String = codec.deserialize_from_slice(&[0; 8], &budget).unwrap();
    assert_eq!(budget.live_allocations(), 1);
    assert_eq!(budget.bytes_in_use(), 0);
    codec.release(&budget, name);

    assert_eq!(budget.live_allocations(), 0);
    assert_eq!(budget.total_allocations(), 2);
}

#[test]
fn test_truncated_stream_releases_partial_value() {
    let codec = Codec::default();
    let bytes = test_roundtrip(&codec, &sample_index());
    test_truncations::<Index>(&codec, &bytes);
}

#[test]
fn test_budget_refusal_surfaces_out_of_memory() {
    let codec = Codec::default();
    let bytes = codec.serialize_to_vec(&sample_index()).unwrap();

    let unlimited = Budget::unlimited();
    let index: Index = codec
        .deserialize_from_slice(&bytes, &unlimited)
        .unwrap();
    let peak = unlimited.peak();
    assert!(peak > 0);
    codec.release(&unlimited, index);

    let tight = Budget::new(peak - 1);
    let err = codec
        .deserialize_from_slice::<Index>(&bytes, &tight)
        .unwrap_err();
    assert!(matches!(err, Error::OutOfMemory(_)));
    assert_eq!(tight.live_allocations(), 0);
    assert_eq!(tight.bytes_in_use(), 0);

    let exact = Budget::new(peak);
    let index: Index = codec.deserialize_from_slice(&bytes, &exact).unwrap();
    codec.release(&exact, index);
    assert_eq!(exact.live_allocations(), 0);
}

#[test]
fn test_hostile_length_does_not_allocate() {
    let codec = Codec::default().fingerprint(false);
    let budget = Budget::new(1 << 20);
    let mut bytes = (u64::MAX / 2).to_le_bytes().to_vec();
    bytes.extend_from_slice(&[1, 2, 3]);
    let err = codec
        .deserialize_from_slice::<Vec<u64>>(&bytes, &budget)
        .unwrap_err();
    assert!(err.is_out_of_memory());
    assert_eq!(budget.live_allocations(), 0);

    // within budget but longer than the source
    let mut bytes = 4096u64.to_le_bytes().to_vec();
    bytes.extend_from_slice(&[1, 2, 3]);
    let err = codec
        .deserialize_from_slice::<Vec<u8>>(&bytes, &budget)
        .unwrap_err();
    assert!(err.is_end_of_stream());
    assert_eq!(budget.live_allocations(), 0);
}

#[test]
fn test_global_allocator_keeps_no_books() {
    let codec = Codec::default();
    let bytes = codec.serialize_to_vec(&sample_index()).unwrap();
    let index: Index = codec.deserialize_from_slice(&bytes, &Global).unwrap();
    assert_eq!(index, sample_index());
    codec.release(&Global, index);
}

#[test]
fn test_non_allocating_decode_needs_no_allocator() {
    let codec = Codec::default();
    let value = ([1u8, 2], Some((true, 'x')), -5i64);
    let bytes = codec.serialize_to_vec(&value).unwrap();
    let mut source = bytes.as_slice();
    let decoded: ([u8; 2], Option<(bool, char)>, i64) = codec.deserialize(&mut source).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn test_element_failure_releases_earlier_elements() {
    let codec = Codec::default().fingerprint(false);
    let mut bytes = codec
        .serialize_to_vec(&vec!["ab".to_string(), "cd".to_string(), "ef".to_string()])
        .unwrap();
    // corrupt the last string
    let last = bytes.len() - 1;
    bytes[last] = 0xFF;
    let budget = Budget::unlimited();
    let err = codec
        .deserialize_from_slice::<Vec<String>>(&bytes, &budget)
        .unwrap_err();
    assert!(err.is_unexpected_data());
    assert_eq!(budget.live_allocations(), 0);
    assert_eq!(budget.total_allocations(), 4);
}

#[derive(WireObject, Debug, Clone, Copy, PartialEq)]
struct Tick;

#[test]
fn test_zero_sized_elements_are_budgeted() {
    let codec = Codec::default().fingerprint(false);
    let budget = Budget::new(1 << 20);
    for len in [u64::MAX, 1 << 40, (1 << 20) + 1] {
        let bytes = len.to_le_bytes();
        let err = codec
            .deserialize_from_slice::<Vec<()>>(&bytes, &budget)
            .unwrap_err();
        assert!(err.is_out_of_memory(), "length {}: {}", len, err);
        let err = codec
            .deserialize_from_slice::<Box<[Tick]>>(&bytes, &budget)
            .unwrap_err();
        assert!(err.is_out_of_memory(), "length {}: {}", len, err);
    }
    assert_eq!(budget.live_allocations(), 0);

    let ticks = test_roundtrip(&codec, &vec![Tick; 4]);
    assert_eq!(ticks, 4u64.to_le_bytes());
    let units: Vec<()> = codec
        .deserialize_from_slice(&16u64.to_le_bytes(), &budget)
        .unwrap();
    assert_eq!(budget.bytes_in_use(), 16);
    codec.release(&budget, units);
    assert_eq!(budget.bytes_in_use(), 0);
}
