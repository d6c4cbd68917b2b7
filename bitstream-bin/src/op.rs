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

//! Append operations given on the command line.

use std::fmt;
use std::str::FromStr;

use bitstream::error::RangeError;
use bitstream::BitBuffer;
use bitstream::BitSink;

/// One append operation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Op {
    /// `bit:<0|1>`
    Bit(bool),
    /// `bits:<sequence of 0 and 1>`
    Bits(Vec<bool>),
    /// `run:<0|1>:<count>`
    Run(bool, usize),
    /// `int:<value>:<width>`; value may have `0x` or `0b` prefix.
    Int(u64, usize),
}

impl Op {
    /// Applies the operation to `buf`.
    pub fn apply(&self, buf: &mut BitBuffer) -> Result<(), RangeError> {
        match self {
            Self::Bit(b) => buf.append_bit(*b),
            Self::Bits(bits) => buf.append_bits(bits.iter().copied()),
            Self::Run(b, n) => buf.append_run(*b, *n),
            Self::Int(value, width) => {
                let mask = if *width >= 64 {
                    u64::MAX
                } else {
                    (1u64 << *width) - 1
                };
                if value & !mask != 0 {
                    log::warn!("`{value}` is truncated to the {width} LSBs");
                }
                buf.append_int(*value, *width)?;
            }
        }
        Ok(())
    }
}

/// Error for a malformed operation string.
#[derive(Clone, Debug)]
pub struct ParseOpError {
    src: String,
    reason: &'static str,
}

impl ParseOpError {
    fn new(src: &str, reason: &'static str) -> Self {
        Self {
            src: src.to_owned(),
            reason,
        }
    }
}

impl fmt::Display for ParseOpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid operation `{}`: {}", self.src, self.reason)
    }
}

impl std::error::Error for ParseOpError {}

fn parse_bit(src: &str, s: &str) -> Result<bool, ParseOpError> {
    match s {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(ParseOpError::new(src, "bit must be 0 or 1")),
    }
}

fn parse_count(src: &str, s: &str) -> Result<usize, ParseOpError> {
    s.parse()
        .map_err(|_e| ParseOpError::new(src, "count must be a non-negative integer"))
}

fn parse_value(src: &str, s: &str) -> Result<u64, ParseOpError> {
    let parsed = if let Some(hex) = s.strip_prefix("0x") {
        u64::from_str_radix(hex, 16)
    } else if let Some(bin) = s.strip_prefix("0b") {
        u64::from_str_radix(bin, 2)
    } else {
        s.parse()
    };
    parsed.map_err(|_e| ParseOpError::new(src, "value must be an unsigned 64-bit integer"))
}

impl FromStr for Op {
    type Err = ParseOpError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = src.split(':').collect();
        match fields.as_slice() {
            ["bit", b] => Ok(Self::Bit(parse_bit(src, b)?)),
            ["bits", bits] => {
                let bits = bits
                    .chars()
                    .map(|c| match c {
                        '0' => Ok(false),
                        '1' => Ok(true),
                        _ => Err(ParseOpError::new(src, "bits must be 0 or 1")),
                    })
                    .collect::<Result<Vec<bool>, _>>()?;
                Ok(Self::Bits(bits))
            }
            ["run", b, n] => Ok(Self::Run(parse_bit(src, b)?, parse_count(src, n)?)),
            ["int", v, w] => Ok(Self::Int(parse_value(src, v)?, parse_count(src, w)?)),
            _ => Err(ParseOpError::new(
                src,
                "expected one of `bit:B`, `bits:BBB`, `run:B:N`, `int:V:W`",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("bit:1", Op::Bit(true))]
    #[case("bits:0110", Op::Bits(vec![false, true, true, false]))]
    #[case("bits:", Op::Bits(vec![]))]
    #[case("run:0:5", Op::Run(false, 5))]
    #[case("int:11:4", Op::Int(11, 4))]
    #[case("int:0xFF:8", Op::Int(255, 8))]
    #[case("int:0b101:3", Op::Int(5, 3))]
    fn parse_valid(#[case] src: &str, #[case] expected: Op) {
        assert_eq!(src.parse::<Op>().unwrap(), expected);
    }

    #[rstest]
    fn parse_invalid(
        #[values("bit:2", "bits:012", "run:1", "run:1:-3", "int:x:4", "nop", "int:1:2:3")]
        src: &str,
    ) {
        assert!(src.parse::<Op>().is_err());
    }

    #[test]
    fn apply_builds_expected_bits() {
        let mut buf = BitBuffer::new();
        for src in ["bits:110", "bit:0", "run:1:2", "int:11:4"] {
            src.parse::<Op>().unwrap().apply(&mut buf).unwrap();
        }
        assert_eq!(buf.bits_as_string(), "1100111011");
    }

    #[test]
    fn apply_rejects_wide_int() {
        let mut buf = BitBuffer::new();
        assert!(Op::Int(1, 65).apply(&mut buf).is_err());
        assert!(buf.is_empty());
    }
}
