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

use shapewire::{Budget, Codec, Fingerprint, Lanes, Shape, WireObject};

#[derive(WireObject, Debug, PartialEq)]
struct Header {
    magic: u32,
    flags: Option<u8>,
}

#[derive(WireObject, Debug, PartialEq)]
struct Renamed {
    id: u32,
    mode: Option<u8>,
}

#[derive(WireObject, Debug, PartialEq)]
struct Swapped {
    mode: Option<u8>,
    id: u32,
}

#[derive(WireObject, Debug, Clone, Copy, PartialEq)]
enum Color {
    Red,
    Green,
    Blue,
}

mod reordered {
    use shapewire::WireObject;

    #[derive(WireObject, Debug, Clone, Copy, PartialEq)]
    pub enum Color {
        Blue = 2,
        Red = 0,
        Green = 1,
    }

    #[derive(WireObject, Debug, Clone, Copy, PartialEq)]
    #[wire(error_set)]
    pub enum Failure {
        Timeout,
        Closed,
    }
}

mod renumbered {
    use shapewire::WireObject;

    #[derive(WireObject, Debug, Clone, Copy, PartialEq)]
    pub enum Color {
        Red,
        Green,
        Blue = 3,
    }
}

#[derive(WireObject, Debug, Clone, Copy, PartialEq)]
#[wire(error_set)]
enum Failure {
    Closed,
    Timeout,
}

#[derive(WireObject, Debug, PartialEq)]
struct Call {
    result: Result<u8, Failure>,
}

#[derive(WireObject, Debug, PartialEq)]
struct ReorderedCall {
    result: Result<u8, reordered::Failure>,
}

#[test]
fn test_names_do_not_contribute() {
    let codec = Codec::default();
    let header = codec.fingerprint_of::<Header>().unwrap();
    assert_eq!(header, codec.fingerprint_of::<Renamed>().unwrap());
    assert_eq!(header, codec.fingerprint_of::<(u32, Option<u8>)>().unwrap());
}

#[test]
fn test_field_order_contributes() {
    let codec = Codec::default();
    assert_ne!(
        codec.fingerprint_of::<Header>().unwrap(),
        codec.fingerprint_of::<Swapped>().unwrap()
    );
}

#[test]
fn test_structurally_equal_types_interoperate() {
    let codec = Codec::default();
    let bytes = codec
        .serialize_to_vec(&Header {
            magic: 9,
            flags: Some(1),
        })
        .unwrap();
    let mut source = bytes.as_slice();
    let renamed: Renamed = codec.deserialize(&mut source).unwrap();
    assert_eq!(renamed, Renamed { id: 9, mode: Some(1) });
}

#[test]
fn test_mismatch_is_rejected_before_payload() {
    common::init_tracing();
    let codec = Codec::default();
    let bytes = codec
        .serialize_to_vec(&Header {
            magic: 9,
            flags: None,
        })
        .unwrap();
    let mut source = bytes.as_slice();
    let err = codec.deserialize::<Swapped>(&mut source).unwrap_err();
    assert!(err.is_unexpected_data());
    assert_eq!(source.len(), bytes.len() - 8);
}

#[test]
fn test_enum_member_order_does_not_contribute() {
    let codec = Codec::default();
    assert_eq!(
        codec.fingerprint_of::<Color>().unwrap(),
        codec.fingerprint_of::<reordered::Color>().unwrap()
    );
    let bytes = codec.serialize_to_vec(&Color::Blue).unwrap();
    let mut source = bytes.as_slice();
    let blue: reordered::Color = codec.deserialize(&mut source).unwrap();
    assert_eq!(blue, reordered::Color::Blue);
}

#[test]
fn test_enum_values_contribute() {
    let codec = Codec::default();
    assert_ne!(
        codec.fingerprint_of::<Color>().unwrap(),
        codec.fingerprint_of::<renumbered::Color>().unwrap()
    );
}

#[test]
fn test_error_set_order_does_not_contribute() {
    let codec = Codec::default();
    assert_eq!(
        codec.fingerprint_of::<Call>().unwrap(),
        codec.fingerprint_of::<ReorderedCall>().unwrap()
    );
    let bytes = codec
        .serialize_to_vec(&Call {
            result: Err(Failure::Timeout),
        })
        .unwrap();
    let mut source = bytes.as_slice();
    let call: ReorderedCall = codec.deserialize(&mut source).unwrap();
    assert_eq!(call.result, Err(reordered::Failure::Timeout));
}

#[test]
fn test_width_and_signedness_contribute() {
    let codec = Codec::default();
    let prints = [
        codec.fingerprint_of::<u8>().unwrap(),
        codec.fingerprint_of::<i8>().unwrap(),
        codec.fingerprint_of::<u16>().unwrap(),
        codec.fingerprint_of::<char>().unwrap(),
        codec.fingerprint_of::<bool>().unwrap(),
        codec.fingerprint_of::<f32>().unwrap(),
        codec.fingerprint_of::<()>().unwrap(),
    ];
    for (i, a) in prints.iter().enumerate() {
        for b in &prints[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_container_kinds_are_distinct() {
    let codec = Codec::default();
    let prints = [
        codec.fingerprint_of::<[u16; 4]>().unwrap(),
        codec.fingerprint_of::<Lanes<u16, 4>>().unwrap(),
        codec.fingerprint_of::<Vec<u16>>().unwrap(),
        codec.fingerprint_of::<Box<u16>>().unwrap(),
        codec.fingerprint_of::<Option<u16>>().unwrap(),
        codec.fingerprint_of::<[u16; 5]>().unwrap(),
    ];
    for (i, a) in prints.iter().enumerate() {
        for b in &prints[i + 1..] {
            assert_ne!(a, b);
        }
    }
    // a string is a byte slice; a C string adds its terminator
    assert_eq!(
        codec.fingerprint_of::<String>().unwrap(),
        codec.fingerprint_of::<Vec<u8>>().unwrap()
    );
    assert_ne!(
        codec.fingerprint_of::<String>().unwrap(),
        codec.fingerprint_of::<std::ffi::CString>().unwrap()
    );
}

#[test]
fn test_fingerprint_matches_shape() {
    let codec = Codec::default();
    let shape = Shape::record(vec![Shape::int(32, false), Shape::optional(Shape::int(8, false))]);
    assert_eq!(codec.fingerprint_of::<Header>().unwrap(), shape.fingerprint());
    assert_eq!(codec.register::<Header>().unwrap(), shape.fingerprint());
    let fingerprint = shape.fingerprint();
    assert_eq!(Fingerprint::from_bytes(fingerprint.to_bytes()), fingerprint);
    assert_eq!(format!("{}", Fingerprint::from_u64(0xab)), "00000000000000ab");
}

#[test]
fn test_header_can_be_disabled() {
    let codec = Codec::default().fingerprint(false);
    assert!(!codec.is_fingerprint());
    let bytes = codec.serialize_to_vec(&vec![Swapped { mode: None, id: 1 }]).unwrap();
    let budget = Budget::unlimited();
    let mut source = bytes.as_slice();
    // without the header nothing stops a structurally different reading
    let wrong: Vec<(u8, u8, u8, u8, u8)> = codec.deserialize_alloc(&mut source, &budget).unwrap();
    assert_eq!(wrong, [(0, 1, 0, 0, 0)]);
    codec.release(&budget, wrong);
    assert_eq!(budget.live_allocations(), 0);
}
