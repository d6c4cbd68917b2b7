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

//! Configuration constants

// Top-level constants first, and then sub-modules. Constants that are used
// only in a specific sub-module or its caller should be placed in the
// corresponding submodule.

/// The number of bits in a storage unit of [`BitBuffer`].
///
/// [`BitBuffer`]: crate::bitbuf::BitBuffer
pub const BITS_PER_BYTE: usize = 8;

/// Upper limit of the capacity hint accepted by [`config::Buffer`] (128 MiB).
///
/// [`config::Buffer`]: crate::config::Buffer
pub const MAX_CAPACITY_HINT_BITS: usize = 1 << 30;

/// Sub-module containing constants related to build-time information.
pub mod build_info {
    /// Version string of this crate.
    pub const CRATE_VERSION: &str = match option_env!("CARGO_PKG_VERSION") {
        Some(v) => v,
        None => "unknown",
    };
}

/// Constants related to textual rendering.
pub mod render {
    /// Text returned by `describe` for a buffer without any bit.
    pub const EMPTY_DESCRIPTION: &str = "<empty>";

    /// Default number of bits per group in a grouped rendering.
    pub const DEFAULT_GROUP_SIZE: usize = 8;

    /// Maximum number of bits per group in a grouped rendering.
    pub const MAX_GROUP_SIZE: usize = 64;

    /// Default separator placed between groups.
    pub const DEFAULT_SEPARATOR: char = '_';

    /// Default character for the unused tail of the last byte.
    pub const DEFAULT_PADDING: char = '*';
}
