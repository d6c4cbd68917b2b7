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

//! Sequential reader bound to a [`BitBuffer`].

use std::error::Error;
use std::fmt;

use super::bitbuf::check_width;
use super::bitbuf::BitBuffer;
use super::bitbuf::Bits;
use super::constant::BITS_PER_BYTE;
use super::error::OutOfRangeError;
use super::error::RangeError;

/// Error returned from [`BitCursor::read_int`].
#[derive(Clone, Debug, Eq, PartialEq)]
#[allow(clippy::module_name_repetitions)]
#[non_exhaustive]
pub enum ReadError {
    /// The read went past the last bit of the buffer.
    OutOfRange(OutOfRangeError),
    /// The requested width doesn't fit in the output type.
    Range(RangeError),
}

impl ReadError {
    /// Returns true if the error is due to the end of the buffer.
    pub const fn is_end_of_buffer(&self) -> bool {
        match self {
            Self::OutOfRange(_) => true,
            Self::Range(_) => false,
        }
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange(e) => e.fmt(f),
            Self::Range(e) => e.fmt(f),
        }
    }
}

impl Error for ReadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::OutOfRange(e) => Some(e),
            Self::Range(e) => Some(e),
        }
    }
}

impl From<OutOfRangeError> for ReadError {
    fn from(e: OutOfRangeError) -> Self {
        Self::OutOfRange(e)
    }
}

impl From<RangeError> for ReadError {
    fn from(e: RangeError) -> Self {
        Self::Range(e)
    }
}

/// Cursor that reads bits of a [`BitBuffer`] from the head.
///
/// A cursor is obtained via [`BitBuffer::reader`]. It only uses
/// [`BitBuffer::read_bit_at`] and [`BitBuffer::len`], and keeps its own
/// position. Every read either succeeds as a whole or leaves the position
/// unchanged.
#[derive(Clone, Debug)]
pub struct BitCursor<'a> {
    buf: &'a BitBuffer,
    position: usize,
}

impl<'a> BitCursor<'a> {
    pub(crate) const fn new(buf: &'a BitBuffer) -> Self {
        Self { buf, position: 0 }
    }

    /// Returns the offset of the next bit to read.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns the number of bits left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.position)
    }

    /// Checks if all bits are consumed.
    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the next bit without advancing.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRangeError` at the end of the buffer.
    pub fn peek_bit(&self) -> Result<bool, OutOfRangeError> {
        self.buf.read_bit_at(self.position)
    }

    /// Reads the next bit.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRangeError` at the end of the buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bitstream::bitbuf::*;
    /// let mut buf = BitBuffer::new();
    /// buf.append_bits([true, false]);
    /// let mut cursor = buf.reader();
    /// assert_eq!(cursor.read_bit(), Ok(true));
    /// assert_eq!(cursor.read_bit(), Ok(false));
    /// assert!(cursor.read_bit().is_err());
    /// assert_eq!(cursor.position(), 2);
    /// ```
    pub fn read_bit(&mut self) -> Result<bool, OutOfRangeError> {
        let bit = self.peek_bit()?;
        self.position += 1;
        Ok(bit)
    }

    /// Reads a `width`-bit unsigned integer stored MSB-first.
    ///
    /// # Errors
    ///
    /// Returns `ReadError::Range` if `width` exceeds the number of bits in
    /// `T`, and `ReadError::OutOfRange` if fewer than `width` bits remain.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bitstream::bitbuf::*;
    /// let mut buf = BitBuffer::new();
    /// buf.append_int(300u32, 12).unwrap();
    /// let mut cursor = buf.reader();
    /// assert!(cursor.read_int::<u8>(12).is_err());
    /// assert_eq!(cursor.read_int::<u16>(12).unwrap(), 300);
    /// ```
    pub fn read_int<T: Bits>(&mut self, width: usize) -> Result<T, ReadError> {
        check_width::<T>(width)?;
        let mut acc = 0u64;
        for i in 0..width {
            acc = (acc << 1) | u64::from(self.buf.read_bit_at(self.position + i)?);
        }
        let value = num_traits::cast::<u64, T>(acc).ok_or_else(|| {
            RangeError::from_display("value", "must fit in the output type", &acc)
        })?;
        self.position += width;
        Ok(value)
    }

    /// Advances the position by `n` bits.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRangeError` if fewer than `n` bits remain.
    pub fn skip(&mut self, n: usize) -> Result<(), OutOfRangeError> {
        if n > self.remaining() {
            return Err(OutOfRangeError::new(
                self.position.saturating_add(n - 1),
                self.buf.len(),
            ));
        }
        self.position += n;
        Ok(())
    }

    /// Skips to the next byte boundary, and returns the number of bits skipped.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRangeError` if the boundary is past the last bit.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bitstream::bitbuf::*;
    /// let mut buf = BitBuffer::new();
    /// buf.append_run(false, 12);
    /// let mut cursor = buf.reader();
    /// cursor.read_bit().unwrap();
    /// assert_eq!(cursor.skip_to_next_byte(), Ok(7));
    /// assert_eq!(cursor.skip_to_next_byte(), Ok(0));
    /// assert_eq!(cursor.remaining(), 4);
    /// cursor.read_bit().unwrap();
    /// assert!(cursor.skip_to_next_byte().is_err());
    /// assert_eq!(cursor.position(), 9);
    /// ```
    pub fn skip_to_next_byte(&mut self) -> Result<usize, OutOfRangeError> {
        let pad = (BITS_PER_BYTE - self.position % BITS_PER_BYTE) % BITS_PER_BYTE;
        self.skip(pad)?;
        Ok(pad)
    }
}
