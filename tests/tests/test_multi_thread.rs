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

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use shapewire::{Budget, Codec, WireObject};

#[test]
fn test_simple_multi_thread() {
    let codec = Arc::new(Codec::default());
    let src: HashSet<_> = [41, 42, 43, 45, 46, 47].into_iter().collect();
    // serialize
    let mut handles = vec![];
    for item in &src {
        let codec_clone = Arc::clone(&codec);
        let item: i32 = *item;
        let handle = thread::spawn(move || codec_clone.serialize_to_vec(&item).unwrap());
        handles.push(handle);
    }
    let mut serialized_data = vec![];
    for handle in handles {
        let bytes = handle.join().unwrap();
        serialized_data.push(bytes);
    }
    // deserialize
    let mut dest = HashSet::new();
    let mut handles = vec![];
    for bytes in serialized_data {
        let codec_clone = Arc::clone(&codec);
        let handle = thread::spawn(move || {
            let mut source = bytes.as_slice();
            codec_clone.deserialize::<i32>(&mut source).unwrap()
        });
        handles.push(handle);
    }
    for handle in handles {
        let value = handle.join().unwrap();
        dest.insert(value);
    }
    // verify
    assert_eq!(dest, src);
}

#[test]
fn test_struct_multi_thread_shared_budget() {
    #[derive(WireObject, Debug, PartialEq, Eq, Hash, Clone)]
    struct Item {
        id: i32,
        name: String,
    }

    let codec = Arc::new(Codec::default());
    let budget = Arc::new(Budget::unlimited());
    let src: HashSet<_> = (0..8)
        .map(|id| Item {
            id,
            name: format!("item-{}", id),
        })
        .collect();

    let handles: Vec<_> = src
        .iter()
        .cloned()
        .map(|item| {
            let codec = Arc::clone(&codec);
            let budget = Arc::clone(&budget);
            thread::spawn(move || {
                let bytes = codec.serialize_to_vec(&item).unwrap();
                let mut source = bytes.as_slice();
                codec
                    .deserialize_alloc::<Item>(&mut source, budget.as_ref())
                    .unwrap()
            })
        })
        .collect();
    let dest: Vec<Item> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(budget.live_allocations(), src.len());

    let mut seen = HashSet::new();
    for item in dest {
        seen.insert(item.clone());
        codec.release(budget.as_ref(), item);
    }
    assert_eq!(seen, src);
    assert_eq!(budget.live_allocations(), 0);
    assert_eq!(budget.total_allocations(), src.len());
}
