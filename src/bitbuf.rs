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

//! Growable bit buffer and the append interface.

use std::fmt;
use std::iter::FusedIterator;

#[cfg(feature = "serde")]
use serde::Deserialize;
#[cfg(feature = "serde")]
use serde::Serialize;

use super::config;
use super::constant::render::EMPTY_DESCRIPTION;
use super::constant::BITS_PER_BYTE;
use super::cursor::BitCursor;
use super::error::verify_true;
use super::error::OutOfRangeError;
use super::error::RangeError;
use super::error::Verify;
use super::error::VerifyError;

/// Trait for the unsigned integers that can be appended as fixed-width fields.
///
/// This trait is sealed so a user cannot implement it. Currently, this trait
/// covers: [`u8`], [`u16`], [`u32`], and [`u64`].
pub trait Bits: seal_bits::Sealed {}

impl<T: seal_bits::Sealed> Bits for T {}

/// Returns the index of the byte that holds the bit at `position`.
///
/// # Examples
///
/// ```
/// # use bitstream::bitbuf::byte_index;
/// assert_eq!(byte_index(0), 0);
/// assert_eq!(byte_index(7), 0);
/// assert_eq!(byte_index(11), 1);
/// ```
#[inline]
pub const fn byte_index(position: usize) -> usize {
    position / BITS_PER_BYTE
}

/// Returns the in-byte shift of the bit at `position`.
///
/// Bits are stored MSB-first, so the first bit of a byte has the offset 7.
///
/// # Examples
///
/// ```
/// # use bitstream::bitbuf::bit_offset;
/// assert_eq!(bit_offset(0), 7);
/// assert_eq!(bit_offset(7), 0);
/// assert_eq!(bit_offset(11), 4);
/// ```
#[inline]
pub const fn bit_offset(position: usize) -> u32 {
    (BITS_PER_BYTE - 1 - position % BITS_PER_BYTE) as u32
}

/// Returns the minimum number of bytes that can hold `bits` bits.
///
/// # Examples
///
/// ```
/// # use bitstream::bitbuf::bytes_for_bits;
/// assert_eq!(bytes_for_bits(0), 0);
/// assert_eq!(bytes_for_bits(1), 1);
/// assert_eq!(bytes_for_bits(8), 1);
/// assert_eq!(bytes_for_bits(18), 3);
/// ```
#[inline]
pub const fn bytes_for_bits(bits: usize) -> usize {
    bits / BITS_PER_BYTE + (bits % BITS_PER_BYTE != 0) as usize
}

/// Checks that `width` bits fit in the integer type `T`.
pub(crate) fn check_width<T: Bits>(width: usize) -> Result<(), RangeError> {
    if width > T::BITS {
        return Err(RangeError::from_display(
            "width",
            &format!("must be less than or equal to {}", T::BITS),
            &width,
        ));
    }
    Ok(())
}

/// Interface trait for appending bits.
///
/// `append_bit` is the only primitive. All the other append operations are
/// provided in terms of it, so a type implementing `BitSink` gets the whole
/// append family with the same semantics as [`BitBuffer`].
pub trait BitSink {
    /// Appends a single bit.
    fn append_bit(&mut self, bit: bool);

    /// Returns the number of bits appended so far.
    fn len(&self) -> usize;

    /// Checks if no bit has been appended.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends bits in the iteration order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bitstream::bitbuf::{BitBuffer, BitSink};
    ///
    /// let mut buf = BitBuffer::new();
    /// buf.append_bits([true, true, true, false, false, true, true, true]);
    /// assert_eq!(buf.bits_as_string(), "11100111");
    /// assert_eq!(buf.as_bytes(), &[0xE7]);
    /// ```
    fn append_bits<I>(&mut self, bits: I)
    where
        I: IntoIterator<Item = bool>,
    {
        for bit in bits {
            self.append_bit(bit);
        }
    }

    /// Appends `n` copies of `bit`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bitstream::bitbuf::{BitBuffer, BitSink};
    ///
    /// let mut buf = BitBuffer::new();
    /// buf.append_bit(false);
    /// buf.append_run(true, 4);
    /// assert_eq!(buf.bits_as_string(), "01111");
    /// ```
    fn append_run(&mut self, bit: bool, n: usize) {
        for _t in 0..n {
            self.append_bit(bit);
        }
    }

    /// Appends the `width` LSBs of `value`, most significant bit first.
    ///
    /// # Errors
    ///
    /// Returns `RangeError` if `width` exceeds the number of bits in `T`.
    /// Nothing is appended in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> Result<(), bitstream::error::RangeError> {
    /// use bitstream::bitbuf::{BitBuffer, BitSink};
    ///
    /// let mut buf = BitBuffer::new();
    /// buf.append_int(0b1011u32, 4)?;
    /// assert_eq!(buf.bits_as_string(), "1011");
    /// assert_eq!(buf.as_bytes(), &[0xB0]);
    ///
    /// assert!(buf.append_int(0u8, 9).is_err());
    /// assert_eq!(buf.len(), 4);
    /// # Ok(())}
    /// ```
    fn append_int<T: Bits>(&mut self, value: T, width: usize) -> Result<(), RangeError> {
        check_width::<T>(width)?;
        let value: u64 = value.into();
        for i in 0..width {
            self.append_bit((value >> (width - i - 1)) & 1 == 1);
        }
        Ok(())
    }
}

/// Growable bit buffer backed by a [`Vec`] of [`u8`]s.
///
/// Bits are packed MSB-first: the bit at position `p` is stored in the byte
/// [`byte_index(p)`](byte_index) at the shift [`bit_offset(p)`](bit_offset).
/// The storage always has the minimum number of bytes for the appended bits
/// (one zero byte is kept while the buffer is empty), and every bit after the
/// last appended one is zero.
#[derive(Clone, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawBitBuffer"))]
pub struct BitBuffer {
    storage: Vec<u8>,
    bitlength: usize,
}

impl Default for BitBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl BitBuffer {
    /// Creates an empty `BitBuffer`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bitstream::bitbuf::*;
    /// let buf = BitBuffer::new();
    /// assert!(buf.is_empty());
    /// assert_eq!(buf.describe(), "<empty>");
    /// ```
    pub fn new() -> Self {
        Self {
            storage: vec![0u8],
            bitlength: 0usize,
        }
    }

    /// Creates an empty `BitBuffer` with the specified capacity (in bits).
    ///
    /// # Examples
    ///
    /// ```
    /// # use bitstream::bitbuf::*;
    /// let buf = BitBuffer::with_capacity(128);
    /// assert!(buf.is_empty());
    /// assert!(buf.into_bytes().capacity() >= 128 / 8);
    /// ```
    pub fn with_capacity(capacity_in_bits: usize) -> Self {
        let mut storage = Vec::with_capacity(bytes_for_bits(capacity_in_bits).max(1));
        storage.push(0u8);
        Self {
            storage,
            bitlength: 0usize,
        }
    }

    /// Reserves capacity for at least `additional_in_bits` more bits.
    pub fn reserve(&mut self, additional_in_bits: usize) {
        let required = bytes_for_bits(self.bitlength + additional_in_bits);
        self.storage
            .reserve(required.saturating_sub(self.storage.len()));
    }

    /// Returns the number of bits stored in the buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bitstream::bitbuf::*;
    /// let mut buf = BitBuffer::new();
    /// buf.append_run(false, 70);
    /// assert_eq!(buf.len(), 70);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.bitlength
    }

    /// Checks if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bitlength == 0
    }

    #[inline]
    fn bit_unchecked(&self, position: usize) -> bool {
        self.storage[byte_index(position)] & (1u8 << bit_offset(position)) != 0
    }

    /// Returns the bit at `position`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRangeError` if `position` is not smaller than
    /// [`len`](Self::len).
    ///
    /// # Examples
    ///
    /// ```
    /// # use bitstream::bitbuf::*;
    /// let mut buf = BitBuffer::new();
    /// buf.append_bits([true, false, true, true, false]);
    /// assert_eq!(buf.read_bit_at(4), Ok(false));
    /// assert!(buf.read_bit_at(5).is_err());
    /// ```
    pub fn read_bit_at(&self, position: usize) -> Result<bool, OutOfRangeError> {
        let err = || OutOfRangeError::new(position, self.bitlength);
        if position >= self.bitlength {
            return Err(err());
        }
        self.storage
            .get(byte_index(position))
            .map(|b| b & (1u8 << bit_offset(position)) != 0)
            .ok_or_else(err)
    }

    /// Returns an iterator over the bits in the logical order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            buf: self,
            head: 0,
            tail: self.bitlength,
        }
    }

    /// Returns the packed bytes.
    ///
    /// The returned slice has exactly `ceil(len / 8)` bytes, and the unused
    /// LSBs of the last byte are zero. The slice borrows the buffer, so it
    /// cannot outlive a subsequent mutation.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bitstream::bitbuf::*;
    /// let mut buf = BitBuffer::new();
    /// assert!(buf.as_bytes().is_empty());
    /// buf.append_run(true, 10);
    /// assert_eq!(buf.as_bytes(), &[0xFF, 0xC0]);
    /// ```
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage[..bytes_for_bits(self.bitlength)]
    }

    /// Consumes `BitBuffer` and returns the packed bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bitstream::bitbuf::*;
    /// let mut buf = BitBuffer::new();
    /// buf.append_int(0x3456u16 >> 3, 13).unwrap();
    /// assert_eq!(buf.into_bytes(), vec![0x34, 0x50]);
    /// ```
    pub fn into_bytes(self) -> Vec<u8> {
        let mut storage = self.storage;
        storage.truncate(bytes_for_bits(self.bitlength));
        storage
    }

    /// Returns bits in a string of `'0'`s and `'1'`s.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bitstream::bitbuf::*;
    /// let mut buf = BitBuffer::new();
    /// assert_eq!(buf.bits_as_string(), "");
    /// buf.append_bits([true, true, false]);
    /// assert_eq!(buf.bits_as_string(), "110");
    /// ```
    pub fn bits_as_string(&self) -> String {
        self.iter().map(|b| if b { '1' } else { '0' }).collect()
    }

    /// Returns a human-readable description of the buffer.
    ///
    /// This is for diagnostics only. The bit string is followed by the number
    /// of bits in parentheses, and an empty buffer is shown as `"<empty>"`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bitstream::bitbuf::*;
    /// let mut buf = BitBuffer::new();
    /// assert_eq!(buf.describe(), "<empty>");
    /// buf.append_bits([true, false, true]);
    /// assert_eq!(buf.describe(), "101 (3)");
    /// ```
    pub fn describe(&self) -> String {
        if self.is_empty() {
            return EMPTY_DESCRIPTION.to_owned();
        }
        format!("{} ({})", self.bits_as_string(), self.bitlength)
    }

    /// Returns bits in a grouped string.
    ///
    /// Bits are split into groups of `format.group_size` joined by
    /// `format.separator`. If `format.show_padding` is set, the unused bits of
    /// the last byte are shown as `format.padding`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bitstream::bitbuf::*;
    /// # use bitstream::config;
    /// let mut buf = BitBuffer::new();
    /// buf.append_int(0x3456u16 >> 3, 13).unwrap();
    /// assert_eq!(buf.render(&config::Render::default()), "00110100_01010***");
    ///
    /// let format = config::Render {
    ///     group_size: 4,
    ///     separator: ' ',
    ///     show_padding: false,
    ///     ..config::Render::default()
    /// };
    /// assert_eq!(buf.render(&format), "0011 0100 0101 0");
    /// ```
    pub fn render(&self, format: &config::Render) -> String {
        let group_size = format.group_size.max(1);
        let end = if format.show_padding {
            bytes_for_bits(self.bitlength) * BITS_PER_BYTE
        } else {
            self.bitlength
        };
        let mut ret = String::with_capacity(end + end / group_size);
        for p in 0..end {
            if p != 0 && p % group_size == 0 {
                ret.push(format.separator);
            }
            let c = if p >= self.bitlength {
                format.padding
            } else if self.bit_unchecked(p) {
                '1'
            } else {
                '0'
            };
            ret.push(c);
        }
        ret
    }

    /// Appends all the bits in `other`.
    ///
    /// The bits of `other` are read before any of them is appended, so `self`
    /// is unchanged when an error is returned.
    ///
    /// # Errors
    ///
    /// Propagates `OutOfRangeError` from reading `other`. This does not happen
    /// for a `BitBuffer` that passes [`Verify::verify`].
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> Result<(), bitstream::error::OutOfRangeError> {
    /// # use bitstream::bitbuf::*;
    /// let mut a = BitBuffer::new();
    /// a.append_bits([true, true, false]);
    /// let mut b = BitBuffer::new();
    /// b.append_bits([false, true]);
    ///
    /// a.concat(&b)?;
    /// assert_eq!(a.bits_as_string(), "11001");
    /// # Ok(())}
    /// ```
    pub fn concat(&mut self, other: &Self) -> Result<(), OutOfRangeError> {
        let bits = (0..other.len())
            .map(|p| other.read_bit_at(p))
            .collect::<Result<Vec<bool>, _>>()?;
        #[cfg(feature = "log")]
        log::trace!(
            target: "bitstream::bitbuf",
            "concat {} bits onto {} bits",
            bits.len(),
            self.bitlength
        );
        self.reserve(bits.len());
        self.append_bits(bits);
        Ok(())
    }

    /// Creates a sequential reader positioned at the first bit.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bitstream::bitbuf::*;
    /// let mut buf = BitBuffer::new();
    /// buf.append_int(0xA5u8, 8).unwrap();
    /// let mut cursor = buf.reader();
    /// assert_eq!(cursor.read_int::<u8>(4).unwrap(), 0xA);
    /// assert_eq!(cursor.read_int::<u8>(4).unwrap(), 0x5);
    /// assert!(cursor.is_at_end());
    /// ```
    pub fn reader(&self) -> BitCursor<'_> {
        BitCursor::new(self)
    }
}

impl BitSink for BitBuffer {
    #[inline]
    fn append_bit(&mut self, bit: bool) {
        let index = byte_index(self.bitlength);
        while index >= self.storage.len() {
            self.storage.push(0u8);
        }

        let mask = 1u8 << bit_offset(self.bitlength);
        if bit {
            self.storage[index] |= mask;
        } else {
            self.storage[index] &= !mask;
        }
        self.bitlength += 1;
    }

    #[inline]
    fn len(&self) -> usize {
        self.bitlength
    }
}

impl Verify for BitBuffer {
    fn verify(&self) -> Result<(), VerifyError> {
        let expected = bytes_for_bits(self.bitlength).max(1);
        verify_true!(
            "storage.len()",
            self.storage.len() == expected,
            "must be the minimum number of bytes holding `bitlength` bits"
        )?;
        let index = byte_index(self.bitlength);
        if let Some(last) = self.storage.get(index) {
            let tail_mask = 0xFFu8 >> (self.bitlength % BITS_PER_BYTE);
            verify_true!(
                "storage[{}]",
                last & tail_mask == 0,
                "bits after `bitlength` in byte {} must be zero",
                index
            )?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawBitBuffer {
    storage: Vec<u8>,
    bitlength: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<RawBitBuffer> for BitBuffer {
    type Error = VerifyError;

    fn try_from(raw: RawBitBuffer) -> Result<Self, Self::Error> {
        let ret = Self {
            storage: raw.storage,
            bitlength: raw.bitlength,
        };
        ret.verify().map_err(|e| {
            #[cfg(feature = "log")]
            log::debug!(target: "bitstream::bitbuf", "rejected deserialized buffer: {e}");
            e.within("bitbuffer")
        })?;
        Ok(ret)
    }
}

impl fmt::Display for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl fmt::Debug for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BitBuffer")
            .field(&self.render(&config::Render::default()))
            .finish()
    }
}

impl Extend<bool> for BitBuffer {
    fn extend<I: IntoIterator<Item = bool>>(&mut self, iter: I) {
        self.append_bits(iter);
    }
}

impl FromIterator<bool> for BitBuffer {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut ret = Self::new();
        ret.append_bits(iter);
        ret
    }
}

impl<'a> IntoIterator for &'a BitBuffer {
    type Item = bool;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the bits of a [`BitBuffer`].
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    buf: &'a BitBuffer,
    head: usize,
    tail: usize,
}

impl Iterator for Iter<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.head >= self.tail {
            return None;
        }
        let bit = self.buf.bit_unchecked(self.head);
        self.head += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.tail - self.head;
        (n, Some(n))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<bool> {
        if self.head >= self.tail {
            return None;
        }
        self.tail -= 1;
        Some(self.buf.bit_unchecked(self.tail))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

mod seal_bits {
    use num_traits::PrimInt;
    use num_traits::Unsigned;
    pub trait Sealed: PrimInt + Unsigned + Into<u64> {
        /// The number of bits in the type.
        const BITS: usize = 1usize << Self::BITS_LOG2;
        /// `ilog2` of `Self::BITS`.
        #[rustversion::since(1.67)]
        const BITS_LOG2: usize = (std::mem::size_of::<Self>() * 8).ilog2() as usize;
        #[rustversion::before(1.67)]
        const BITS_LOG2: usize = 3 + std::mem::size_of::<Self>().trailing_zeros() as usize;
    }

    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helper;

    use bitvec::prelude::BitVec;
    use bitvec::prelude::Msb0;
    use rstest::rstest;

    impl BitSink for BitVec<u8, Msb0> {
        fn append_bit(&mut self, bit: bool) {
            self.push(bit);
        }

        fn len(&self) -> usize {
            self.as_bitslice().len()
        }
    }

    fn from_str_bits(s: &str) -> BitBuffer {
        s.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn scenario_full_byte() {
        let mut buf = BitBuffer::new();
        buf.append_bits([true, true, true, false, false, true, true, true]);
        assert_eq!(buf.bits_as_string(), "11100111");
        assert_eq!(buf.as_bytes(), &[0xE7]);
    }

    #[test]
    fn scenario_int_is_zero_padded() {
        let mut buf = BitBuffer::new();
        buf.append_int(0b1011u32, 4).unwrap();
        assert_eq!(buf.bits_as_string(), "1011");
        assert_eq!(buf.as_bytes(), &[0xB0]);
    }

    #[test]
    fn scenario_empty_description() {
        let buf = BitBuffer::new();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.describe(), "<empty>");
        assert_eq!(format!("{buf}"), "<empty>");
    }

    #[test]
    fn scenario_concat() {
        let mut a = from_str_bits("110");
        let b = from_str_bits("01");
        a.concat(&b).unwrap();
        assert_eq!(a.bits_as_string(), "11001");
        assert_eq!(b.bits_as_string(), "01");
    }

    #[test]
    fn scenario_read_boundary() {
        let buf = from_str_bits("10101");
        let err = buf.read_bit_at(5).unwrap_err();
        assert_eq!(err, OutOfRangeError::new(5, 5));
        assert_eq!(buf.read_bit_at(4), Ok(true));
    }

    #[test]
    fn scenario_ten_bits() {
        let mut buf = BitBuffer::new();
        buf.append_run(true, 10);
        let bytes = buf.as_bytes();
        assert_eq!(bytes.len(), 2);
        assert_eq!(bytes[1] & 0x3F, 0);
    }

    #[test]
    fn storage_grows_one_byte_at_a_time() {
        let mut buf = BitBuffer::new();
        assert_eq!(buf.storage.len(), 1);
        for n in 1..=40 {
            buf.append_bit(n % 3 == 0);
            assert_eq!(buf.storage.len(), bytes_for_bits(n));
            assert!(buf.verify().is_ok());
        }
    }

    #[test]
    fn read_after_write() {
        let bits = test_helper::random_bits(1000, 7);
        let mut buf = BitBuffer::new();
        buf.append_bits(bits.iter().copied());
        assert_eq!(buf.len(), bits.len());
        for (p, &expected) in bits.iter().enumerate() {
            assert_eq!(buf.read_bit_at(p), Ok(expected));
        }
        assert!(buf.read_bit_at(bits.len()).is_err());
        assert!(buf.read_bit_at(usize::MAX).is_err());
    }

    #[rstest]
    fn length_laws(#[values(0, 1, 7, 8, 9, 15, 16, 17, 100)] n: usize) {
        let buf: BitBuffer = test_helper::random_bits(n, n as u64).into_iter().collect();
        assert_eq!(buf.bits_as_string().len(), n);
        assert_eq!(buf.as_bytes().len(), (n + 7) / 8);
        assert_eq!(buf.iter().len(), n);
        assert_eq!(buf.clone().into_bytes(), buf.as_bytes());
    }

    #[test]
    fn clone_is_independent() {
        let mut b1 = from_str_bits("1011");
        let mut b2 = b1.clone();
        b2.append_run(true, 12);
        assert_eq!(b1.bits_as_string(), "1011");
        b1.append_bit(false);
        assert_eq!(b2.bits_as_string(), "1011111111111111");
        assert_eq!(b1.bits_as_string(), "10110");
    }

    #[rstest]
    fn int_roundtrip(#[values(1, 2, 7, 8, 13, 24, 31, 32)] width: usize) {
        let values = [0u32, 1, 0x5555_5555, 0xAAAA_AAAA, 0xDEAD_BEEF, u32::MAX];
        for value in values {
            let mut buf = BitBuffer::new();
            buf.append_int(value, width).unwrap();
            assert_eq!(buf.len(), width);
            let mut acc = 0u64;
            for p in 0..width {
                acc = (acc << 1) | u64::from(buf.read_bit_at(p).unwrap());
            }
            let mask = (1u64 << width) - 1;
            assert_eq!(acc, u64::from(value) & mask);
        }
    }

    #[test]
    fn int_width_is_checked_per_type() {
        let mut buf = BitBuffer::new();
        buf.append_bit(true);
        assert!(buf.append_int(0u32, 33).is_err());
        assert!(buf.append_int(0u8, 9).is_err());
        let err = buf.append_int(0u16, 17).unwrap_err();
        assert_eq!(err.var(), "width");
        assert_eq!(buf.bits_as_string(), "1");

        buf.append_int(u64::MAX, 64).unwrap();
        assert_eq!(buf.len(), 65);
        buf.append_int(0xFFu8, 0).unwrap();
        assert_eq!(buf.len(), 65);
    }

    #[test]
    fn append_family_matches_bitvec() {
        let mut buf = BitBuffer::new();
        let mut reference: BitVec<u8, Msb0> = BitVec::new();

        let ops = |sink: &mut dyn FnMut(usize)| {
            for step in 0..64 {
                sink(step);
            }
        };
        ops(&mut |step| match step % 4 {
            0 => buf.append_bit(step % 3 == 0),
            1 => buf.append_run(step % 5 == 0, step % 11),
            2 => buf
                .append_int((step as u32).wrapping_mul(2_654_435_761), step % 33)
                .unwrap(),
            _ => buf.append_bits([true, false, step % 2 == 0]),
        });
        ops(&mut |step| match step % 4 {
            0 => reference.append_bit(step % 3 == 0),
            1 => reference.append_run(step % 5 == 0, step % 11),
            2 => reference
                .append_int((step as u32).wrapping_mul(2_654_435_761), step % 33)
                .unwrap(),
            _ => reference.append_bits([true, false, step % 2 == 0]),
        });

        let n = BitSink::len(&reference);
        assert_eq!(BitSink::len(&buf), n);
        assert!(buf.iter().eq(reference.iter().by_vals()));

        reference.resize(bytes_for_bits(n) * BITS_PER_BYTE, false);
        assert_eq!(buf.as_bytes(), reference.as_raw_slice());
    }

    #[test]
    fn concat_equals_bitwise_append() {
        let a_bits = test_helper::random_bits(37, 1);
        let b_bits = test_helper::random_bits(29, 2);
        let mut a: BitBuffer = a_bits.iter().copied().collect();
        let b: BitBuffer = b_bits.iter().copied().collect();

        let mut expected = a.clone();
        for &bit in &b_bits {
            expected.append_bit(bit);
        }
        a.concat(&b).unwrap();
        assert_eq!(a, expected);
        assert_eq!(a.bits_as_string(), expected.bits_as_string());
    }

    #[test]
    fn concat_with_empty() {
        let mut a = from_str_bits("101");
        a.concat(&BitBuffer::new()).unwrap();
        assert_eq!(a.bits_as_string(), "101");

        let mut e = BitBuffer::new();
        e.concat(&a).unwrap();
        assert_eq!(e, a);
    }

    #[test]
    fn concat_with_own_clone() {
        let mut a = from_str_bits("10");
        let copy = a.clone();
        a.concat(&copy).unwrap();
        assert_eq!(a.bits_as_string(), "1010");
    }

    #[test]
    fn concat_is_atomic_on_read_failure() {
        // A logical length beyond the storage can only come from outside the
        // constructors. Reading such a buffer fails at position 8.
        let broken = BitBuffer {
            storage: vec![0xFF],
            bitlength: 12,
        };
        assert!(broken.verify().is_err());
        assert_eq!(broken.read_bit_at(7), Ok(true));
        assert_eq!(broken.read_bit_at(8), Err(OutOfRangeError::new(8, 12)));

        let mut a = from_str_bits("0");
        let before = a.clone();
        let err = a.concat(&broken).unwrap_err();
        assert_eq!(err.position(), 8);
        assert_eq!(a, before);
        assert_eq!(a.bits_as_string(), "0");
    }

    #[test]
    fn render_formats() {
        let mut buf = BitBuffer::new();
        assert_eq!(buf.render(&config::Render::default()), "");
        buf.append_run(true, 3);
        assert_eq!(buf.render(&config::Render::default()), "111*****");
        buf.append_run(false, 6);
        assert_eq!(
            buf.render(&config::Render::default()),
            "11100000_0*******"
        );
        assert_eq!(format!("{buf:?}"), "BitBuffer(\"11100000_0*******\")");

        let format = config::Render {
            group_size: 3,
            separator: '|',
            padding: '.',
            show_padding: true,
        };
        assert_eq!(buf.render(&format), "111|000|000|...|...|.");

        let format = config::Render {
            group_size: 4,
            ..config::Render::default()
        };
        assert_eq!(buf.render(&format), "1110_0000_0***_****");
    }

    #[test]
    fn describe_has_count() {
        let buf = from_str_bits("0110");
        assert_eq!(buf.describe(), "0110 (4)");
        assert_eq!(buf.to_string(), "0110 (4)");
    }

    #[test]
    fn iterator_both_ends() {
        let buf = from_str_bits("1100");
        let rev: String = buf
            .iter()
            .rev()
            .map(|b| if b { '1' } else { '0' })
            .collect();
        assert_eq!(rev, "0011");

        let mut it = buf.iter();
        assert_eq!(it.next(), Some(true));
        assert_eq!(it.next_back(), Some(false));
        assert_eq!(it.len(), 2);
        assert_eq!(it.next(), Some(true));
        assert_eq!(it.next(), Some(false));
        assert_eq!(it.next(), None);
        assert_eq!(it.next_back(), None);
    }

    #[test]
    fn verify_detects_dirty_tail() {
        let mut buf = from_str_bits("101");
        assert!(buf.verify().is_ok());
        buf.storage[0] |= 0x01;
        let err = buf.verify().unwrap_err();
        assert_eq!(err.path(), "storage[0]");

        let placeholder = BitBuffer {
            storage: vec![0x80],
            bitlength: 0,
        };
        assert!(placeholder.verify().is_err());
    }

    #[test]
    fn append_overwrites_stale_bits() {
        // Bits past `bitlength` are zero by construction, but `append_bit`
        // still clears the target bit explicitly.
        let mut buf = BitBuffer {
            storage: vec![0xFF],
            bitlength: 0,
        };
        buf.append_bit(false);
        assert_eq!(buf.read_bit_at(0), Ok(false));
    }

    #[test]
    #[cfg(feature = "serde")]
    fn serde_roundtrip_and_rejection() {
        let buf = from_str_bits("1110011110");
        let src = toml::to_string(&buf).unwrap();
        let restored: BitBuffer = toml::from_str(&src).unwrap();
        assert_eq!(restored, buf);

        let bad = "storage = [255]\nbitlength = 3\n";
        assert!(toml::from_str::<BitBuffer>(bad).is_err());

        let short = "storage = [0]\nbitlength = 9\n";
        assert!(toml::from_str::<BitBuffer>(short).is_err());
    }
}
