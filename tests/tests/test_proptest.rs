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

use std::collections::{BTreeMap, HashMap};

use common::test_roundtrip;
use proptest::prelude::*;
use shapewire::{Budget, Codec, Lanes, WireObject};

#[derive(WireObject, Debug, Clone, PartialEq)]
struct Sample {
    id: u64,
    delta: i16,
    ratio: f64,
    flag: bool,
    tag: char,
    name: String,
    values: Vec<Option<u32>>,
    lanes: Lanes<i8, 4>,
    nested: Option<Box<(u8, String)>>,
}

#[derive(WireObject, Debug, Clone, PartialEq)]
enum Shape2d {
    Empty,
    Circle(u32),
    Rect { w: u16, h: u16 },
    Path(Vec<(i32, i32)>),
}

fn sample() -> impl Strategy<Value = Sample> {
    (
        any::<u64>(),
        any::<i16>(),
        any::<f64>().prop_filter("comparable", |r| !r.is_nan()),
        any::<bool>(),
        any::<char>(),
        ".{0,16}",
        prop::collection::vec(any::<Option<u32>>(), 0..8),
        any::<[i8; 4]>(),
        any::<Option<(u8, String)>>(),
    )
        .prop_map(
            |(id, delta, ratio, flag, tag, name, values, lanes, nested)| Sample {
                id,
                delta,
                ratio,
                flag,
                tag,
                name,
                values,
                lanes: Lanes(lanes),
                nested: nested.map(Box::new),
            },
        )
}

fn shape2d() -> impl Strategy<Value = Shape2d> {
    prop_oneof![
        Just(Shape2d::Empty),
        any::<u32>().prop_map(Shape2d::Circle),
        (any::<u16>(), any::<u16>()).prop_map(|(w, h)| Shape2d::Rect { w, h }),
        prop::collection::vec(any::<(i32, i32)>(), 0..6).prop_map(Shape2d::Path),
    ]
}

proptest! {
    #[test]
    fn prop_record_round_trip(value in sample()) {
        test_roundtrip(&Codec::default(), &value);
    }

    #[test]
    fn prop_union_round_trip(values in prop::collection::vec(shape2d(), 0..6)) {
        test_roundtrip(&Codec::default(), &values);
    }

    #[test]
    fn prop_map_round_trip(
        hashed in prop::collection::hash_map(".{0,8}", any::<i64>(), 0..8),
        ordered in prop::collection::btree_map(any::<u16>(), any::<bool>(), 0..8),
    ) {
        let value: (HashMap<String, i64>, BTreeMap<u16, bool>) = (hashed, ordered);
        test_roundtrip(&Codec::default().fingerprint(false), &value);
    }

    #[test]
    fn prop_garbage_never_leaks(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let codec = Codec::default().fingerprint(false);
        let budget = Budget::new(1 << 16);
        let mut source = bytes.as_slice();
        if let Ok(value) = codec.deserialize_alloc::<Vec<Shape2d>>(&mut source, &budget) {
            codec.release(&budget, value);
        }
        prop_assert_eq!(budget.live_allocations(), 0);
    }
}
