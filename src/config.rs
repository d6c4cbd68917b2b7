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

//! Buffer and rendering configuration structs.

#[cfg(feature = "serde")]
use serde::Deserialize;
#[cfg(feature = "serde")]
use serde::Serialize;

use super::bitbuf::BitBuffer;
use super::constant::render::DEFAULT_GROUP_SIZE;
use super::constant::render::DEFAULT_PADDING;
use super::constant::render::DEFAULT_SEPARATOR;
use super::constant::render::MAX_GROUP_SIZE;
use super::constant::MAX_CAPACITY_HINT_BITS;
use super::error::verify_range;
use super::error::verify_true;
use super::error::Verify;
use super::error::VerifyError;

/// Configuration for creating and presenting a [`BitBuffer`].
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Buffer {
    /// Number of bits to pre-allocate when a buffer is created.
    ///
    /// This only affects the allocation. The created buffer is empty
    /// regardless of this value.
    pub capacity_bits: usize,
    /// Configuration for grouped rendering.
    pub render: Render,
}

#[allow(clippy::derivable_impls)]
impl Default for Buffer {
    fn default() -> Self {
        Self {
            capacity_bits: 0,
            render: Render::default(),
        }
    }
}

impl Buffer {
    /// Creates an empty [`BitBuffer`] with the configured capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bitstream::config;
    /// let mut config = config::Buffer::default();
    /// config.capacity_bits = 1024;
    /// let buf = config.make_buffer();
    /// assert!(buf.is_empty());
    /// ```
    pub fn make_buffer(&self) -> BitBuffer {
        BitBuffer::with_capacity(self.capacity_bits)
    }
}

impl Verify for Buffer {
    fn verify(&self) -> Result<(), VerifyError> {
        verify_range!("capacity_bits", self.capacity_bits, ..= MAX_CAPACITY_HINT_BITS)?;
        self.render.verify().map_err(|e| e.within("render"))?;
        Ok(())
    }
}

/// Configuration for the grouped rendering of bits.
///
/// See [`BitBuffer::render`] for the output format.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Render {
    /// The number of bits shown in one group.
    pub group_size: usize,
    /// Character placed between groups.
    pub separator: char,
    /// Character shown for the unused tail bits of the last byte.
    pub padding: char,
    /// If set to false, the unused tail bits are not shown.
    pub show_padding: bool,
}

impl Default for Render {
    fn default() -> Self {
        Self {
            group_size: DEFAULT_GROUP_SIZE,
            separator: DEFAULT_SEPARATOR,
            padding: DEFAULT_PADDING,
            show_padding: true,
        }
    }
}

impl Verify for Render {
    fn verify(&self) -> Result<(), VerifyError> {
        verify_range!("group_size", self.group_size, 1..=MAX_GROUP_SIZE)?;
        Ok(())
    }
}
