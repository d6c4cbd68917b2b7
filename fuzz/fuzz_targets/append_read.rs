// Copyright 2026 bitstream developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![no_main]

use arbitrary::Arbitrary;
use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;

use bitstream::error::Verify;
use bitstream::BitBuffer;
use bitstream::BitSink;

#[derive(Debug)]
enum Op {
    Bit(bool),
    Bits(Vec<bool>),
    Run(bool, usize),
    Int(u32, usize),
    Concat(Vec<bool>),
}

impl<'a> Arbitrary<'a> for Op {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self, arbitrary::Error> {
        match u.int_in_range(0..=4usize)? {
            0 => Ok(Op::Bit(bool::arbitrary(u)?)),
            1 => Ok(Op::Bits(Vec::<bool>::arbitrary(u)?)),
            2 => Ok(Op::Run(bool::arbitrary(u)?, u.int_in_range(0..=100usize)?)),
            // widths above 32 must be rejected.
            3 => Ok(Op::Int(u32::arbitrary(u)?, u.int_in_range(0..=40usize)?)),
            4 => Ok(Op::Concat(Vec::<bool>::arbitrary(u)?)),
            _ => unreachable!(),
        }
    }
}

fn apply(op: &Op, buf: &mut BitBuffer, reference: &mut Vec<bool>) {
    match op {
        Op::Bit(b) => {
            buf.append_bit(*b);
            reference.push(*b);
        }
        Op::Bits(bits) => {
            buf.append_bits(bits.iter().copied());
            reference.extend_from_slice(bits);
        }
        Op::Run(b, n) => {
            buf.append_run(*b, *n);
            reference.extend(std::iter::repeat(*b).take(*n));
        }
        Op::Int(value, width) => {
            let before = buf.clone();
            if buf.append_int(*value, *width).is_ok() {
                assert!(*width <= 32);
                for i in 0..*width {
                    reference.push((value >> (width - i - 1)) & 1 == 1);
                }
            } else {
                assert!(*width > 32);
                assert_eq!(*buf, before);
            }
        }
        Op::Concat(bits) => {
            let other: BitBuffer = bits.iter().copied().collect();
            buf.concat(&other).unwrap();
            reference.extend_from_slice(bits);
        }
    }
}

fuzz_target!(|ops: Vec<Op>| {
    let mut buf = BitBuffer::new();
    let mut reference = vec![];
    for op in &ops {
        apply(op, &mut buf, &mut reference);
    }

    buf.verify().unwrap();
    assert_eq!(buf.len(), reference.len());
    assert_eq!(buf.as_bytes().len(), (reference.len() + 7) / 8);
    for (p, &bit) in reference.iter().enumerate() {
        assert_eq!(buf.read_bit_at(p), Ok(bit));
    }
    assert!(buf.read_bit_at(reference.len()).is_err());

    let expected: String = reference.iter().map(|&b| if b { '1' } else { '0' }).collect();
    assert_eq!(buf.bits_as_string(), expected);

    let mut cursor = buf.reader();
    for &bit in &reference {
        assert_eq!(cursor.read_bit(), Ok(bit));
    }
    assert!(cursor.is_at_end());
});
