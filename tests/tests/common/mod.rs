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

use std::fmt::Debug;
use std::sync::Once;

use shapewire::{Budget, Codec, Serializer};

pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Encodes and decodes `value`, checking that the decoded copy is equal and
/// that releasing it gives back every allocation. Returns the encoded bytes.
#[allow(dead_code)]
pub fn test_roundtrip<T>(codec: &Codec, value: &T) -> Vec<u8>
where
    T: Serializer + PartialEq + Debug,
{
    init_tracing();
    let bytes = codec.serialize_to_vec(value).unwrap();
    let budget = Budget::unlimited();
    let decoded: T = codec.deserialize_from_slice(&bytes, &budget).unwrap();
    assert_eq!(&decoded, value);
    assert_eq!(T::WIRE_ALLOCATES, T::wire_shape().allocates());
    codec.release(&budget, decoded);
    assert_eq!(budget.live_allocations(), 0);
    assert_eq!(budget.bytes_in_use(), 0);
    bytes
}

/// Decodes every strict prefix of `bytes` and checks that each attempt fails
/// at the end of the stream with nothing left allocated.
#[allow(dead_code)]
pub fn test_truncations<T: Serializer + Debug>(codec: &Codec, bytes: &[u8]) {
    for cut in 0..bytes.len() {
        let budget = Budget::unlimited();
        let mut source = &bytes[..cut];
        let err = codec
            .deserialize_alloc::<T>(&mut source, &budget)
            .unwrap_err();
        assert!(err.is_end_of_stream(), "cut at {}: {}", cut, err);
        assert_eq!(budget.live_allocations(), 0, "cut at {}", cut);
    }
}
