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

#![allow(clippy::missing_panics_doc)]

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

/// Generates `n` pseudo-random bits from `seed`.
pub fn random_bits(n: usize, seed: u64) -> Vec<bool> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_t| rng.gen::<bool>()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_bits_are_reproducible() {
        assert_eq!(random_bits(100, 3), random_bits(100, 3));
        assert_eq!(random_bits(0, 3).len(), 0);
        // A long sequence contains both values.
        let bits = random_bits(256, 11);
        assert!(bits.iter().any(|&b| b));
        assert!(bits.iter().any(|&b| !b));
    }
}
