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

use std::collections::HashMap;

use common::{test_roundtrip, test_truncations};
use shapewire::{Budget, Codec, EnumShape, ErrorSet, Shape, WireObject};

fn raw() -> Codec {
    Codec::default().fingerprint(false)
}

#[derive(WireObject, Debug, PartialEq)]
struct Point(i32, i32);

#[derive(WireObject, Debug, PartialEq)]
struct Marker;

#[derive(WireObject, Debug, PartialEq)]
struct Polygon {
    name: String,
    points: Vec<Point>,
    tags: HashMap<String, Option<Box<u64>>>,
    marker: Marker,
}

#[derive(WireObject, Debug, PartialEq)]
struct Wrapper<T> {
    inner: T,
    count: u8,
}

#[derive(WireObject, Debug, Clone, Copy, PartialEq)]
enum Level {
    Low,
    Mid,
    High = 10,
    Max,
}

#[derive(WireObject, Debug, Clone, Copy, PartialEq)]
#[repr(i16)]
enum Offset {
    Back = -2,
    Far = 300,
}

#[derive(WireObject, Debug, PartialEq)]
enum Packet {
    Ping,
    Data(Vec<u8>),
    Move { x: i32, y: i32 },
    Pair(Level, Option<String>),
}

#[derive(WireObject, Debug, Clone, Copy, PartialEq)]
#[wire(error_set)]
enum LookupError {
    NotFound,
    Denied,
    Expired,
}

#[derive(WireObject, Debug, PartialEq)]
struct Lookup {
    key: String,
    outcome: Result<u32, LookupError>,
}

#[derive(WireObject, Debug, Clone, Copy, PartialEq)]
#[wire(open)]
struct StatusCode(u16);

#[test]
fn test_nested_record() {
    let codec = Codec::default();
    let polygon = Polygon {
        name: "triangle".to_string(),
        points: vec![Point(0, 0), Point(4, 0), Point(0, -3)],
        tags: HashMap::from([
            ("weight".to_string(), Some(Box::new(12))),
            ("unset".to_string(), None),
        ]),
        marker: Marker,
    };
    let bytes = test_roundtrip(&codec, &polygon);
    test_truncations::<Polygon>(&codec, &bytes);
}

#[test]
fn test_record_shape() {
    let codec = Codec::default();
    assert_eq!(
        codec.shape_of::<Point>().unwrap(),
        Shape::record(vec![Shape::int(32, true), Shape::int(32, true)])
    );
    assert_eq!(codec.shape_of::<Marker>().unwrap(), Shape::record(vec![]));
    assert_eq!(test_roundtrip(&raw(), &Marker), Vec::<u8>::new());
}

#[test]
fn test_generic_record() {
    let codec = raw();
    let bytes = test_roundtrip(
        &codec,
        &Wrapper {
            inner: 0x0102u16,
            count: 3,
        },
    );
    assert_eq!(bytes, [2, 1, 3]);
    test_roundtrip(
        &codec,
        &Wrapper {
            inner: vec![Point(1, 2)],
            count: 1,
        },
    );
}

#[test]
fn test_enumeration_values() {
    let codec = raw();
    assert_eq!(test_roundtrip(&codec, &Level::Low), [0]);
    assert_eq!(test_roundtrip(&codec, &Level::Mid), [1]);
    assert_eq!(test_roundtrip(&codec, &Level::High), [10]);
    assert_eq!(test_roundtrip(&codec, &Level::Max), [11]);
    assert_eq!(test_roundtrip(&codec, &Offset::Back), [0xFE, 0xFF]);
    assert_eq!(test_roundtrip(&codec, &Offset::Far), [0x2C, 0x01]);

    assert_eq!(
        codec.shape_of::<Level>().unwrap(),
        Shape::Enum(EnumShape::exhaustive(
            8,
            false,
            vec![("Low", 0), ("Mid", 1), ("High", 10), ("Max", 11)]
        ))
    );
}

#[test]
fn test_undeclared_enumeration_value() {
    let codec = raw();
    let mut source: &[u8] = &[2];
    let err = codec.deserialize::<Level>(&mut source).unwrap_err();
    assert!(err.is_unexpected_data());
}

#[test]
fn test_open_enumeration_accepts_any_value() {
    let codec = raw();
    assert_eq!(test_roundtrip(&codec, &StatusCode(404)), [0x94, 0x01]);
    let mut source: &[u8] = &[0xFF, 0xFF];
    let code: StatusCode = codec.deserialize(&mut source).unwrap();
    assert_eq!(code, StatusCode(u16::MAX));
    assert_eq!(
        codec.shape_of::<StatusCode>().unwrap(),
        Shape::Enum(EnumShape::open(16, false))
    );
}

#[test]
fn test_tagged_union() {
    let codec = raw();
    assert_eq!(test_roundtrip(&codec, &Packet::Ping), [0]);
    assert_eq!(
        test_roundtrip(&codec, &Packet::Data(vec![5])),
        [1, 1, 0, 0, 0, 0, 0, 0, 0, 5]
    );
    assert_eq!(
        test_roundtrip(&codec, &Packet::Move { x: -1, y: 2 }),
        [2, 0xFF, 0xFF, 0xFF, 0xFF, 2, 0, 0, 0]
    );
    test_roundtrip(&codec, &Packet::Pair(Level::Max, Some("p".to_string())));
    test_roundtrip(&codec, &Packet::Pair(Level::Low, None));

    let bytes = codec
        .serialize_to_vec(&Packet::Pair(Level::High, Some("payload".to_string())))
        .unwrap();
    test_truncations::<Packet>(&codec, &bytes);
}

#[test]
fn test_union_unknown_tag() {
    let codec = raw();
    let budget = Budget::unlimited();
    let mut source: &[u8] = &[4];
    let err = codec
        .deserialize_alloc::<Packet>(&mut source, &budget)
        .unwrap_err();
    assert!(err.is_unexpected_data());
}

#[test]
fn test_union_shape() {
    let codec = Codec::default();
    let Shape::Union { tag, arms } = codec.shape_of::<Packet>().unwrap() else {
        panic!("not a union");
    };
    assert_eq!((tag.bits, tag.signed), (8, false));
    assert_eq!(tag.name_of(2), Some("Move"));
    let names: Vec<_> = arms.iter().map(|(name, _)| *name).collect();
    assert_eq!(names, ["Ping", "Data", "Move", "Pair"]);
    assert_eq!(arms[0].1, Shape::Unit);
    assert_eq!(arms[1].1, Shape::seq(Shape::int(8, false)));
    assert_eq!(
        arms[2].1,
        Shape::record(vec![Shape::int(32, true), Shape::int(32, true)])
    );
}

#[test]
fn test_error_set_names() {
    assert_eq!(LookupError::NAMES, ["NotFound", "Denied", "Expired"]);
    assert_eq!(LookupError::Denied.name(), "Denied");
    assert_eq!(LookupError::from_name("Expired"), Some(LookupError::Expired));
    assert_eq!(LookupError::from_name("Missing"), None);
}

#[test]
fn test_result_field() {
    let codec = raw();
    let ok = Lookup {
        key: String::new(),
        outcome: Ok(5),
    };
    assert_eq!(
        test_roundtrip(&codec, &ok),
        [0, 0, 0, 0, 0, 0, 0, 0, 1, 5, 0, 0, 0]
    );

    // sorted names: Denied, Expired, NotFound
    let failed = Lookup {
        key: String::new(),
        outcome: Err(LookupError::NotFound),
    };
    assert_eq!(
        test_roundtrip(&codec, &failed),
        [0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0]
    );
    let denied = Lookup {
        key: "k".to_string(),
        outcome: Err(LookupError::Denied),
    };
    let bytes = test_roundtrip(&codec, &denied);
    assert_eq!(bytes[9..], [0, 0, 0]);
}

#[test]
fn test_error_index_out_of_range() {
    let codec = raw();
    let budget = Budget::unlimited();
    let bytes = [1, 0, 0, 0, 0, 0, 0, 0, b'k', 0, 3, 0];
    let err = codec
        .deserialize_from_slice::<Lookup>(&bytes, &budget)
        .unwrap_err();
    assert!(err.is_unexpected_data());
    assert_eq!(budget.live_allocations(), 0);
}
