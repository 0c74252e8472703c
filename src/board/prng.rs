/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Four random u64 values.
const SEEDS: [u64; 4] = [
    0b1001000111000101101010110011110011101011111111010101101001110001,
    0b0000011010111010001001010011101110011101110110001001011111001101,
    0b1000000000010101101101011110010110011100110000100111010111101001,
    0b1111100011110100001001111111110001010100000100011101111001010011,
];

/// A pseudo-random number generator using the "xoshiro" algorithm.
///
/// Source code copied from <https://prng.di.unimi.it/xoshiro256starstar.c>
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XoShiRo([u64; 4]);

impl XoShiRo {
    /// Construct a new pseudo-random number generator from the library's seeds.
    #[inline(always)]
    pub const fn new() -> Self {
        Self::from_seeds(SEEDS)
    }

    /// Construct a new pseudo-random number generator from your own seeds.
    ///
    /// The seeds must not all be zero.
    #[inline(always)]
    pub const fn from_seeds(seeds: [u64; 4]) -> Self {
        Self(seeds)
    }

    /// Construct a new pseudo-random number generator from a single `seed`.
    ///
    /// The four words of state are filled with [splitmix64](https://prng.di.unimi.it/splitmix64.c), as recommended by the authors of xoshiro.
    ///
    /// # Example
    /// ```
    /// # use tadpole::XoShiRo;
    /// let mut a = XoShiRo::from_seed(42);
    /// let mut b = XoShiRo::from_seed(42);
    /// assert_eq!(a.next_u64(), b.next_u64());
    /// ```
    pub const fn from_seed(mut seed: u64) -> Self {
        let mut state = [0; 4];
        let mut i = 0;
        while i < state.len() {
            seed = seed.wrapping_add(0x9e3779b97f4a7c15);
            let mut z = seed;
            z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
            state[i] = z ^ (z >> 31);
            i += 1;
        }
        Self(state)
    }

    /// Advances the generator, returning the next pseudo-random number in the sequence.
    #[inline(always)]
    pub fn next_u64(&mut self) -> u64 {
        let (result, s) = Self::xoshiro(self.0);
        self.0 = s;
        result
    }

    /// A pseudo-random number with roughly one eighth of its bits set.
    ///
    /// Sparse numbers make far better magic multiplier candidates than uniform ones.
    #[inline(always)]
    pub fn next_sparse_u64(&mut self) -> u64 {
        self.next_u64() & self.next_u64() & self.next_u64()
    }

    /// Inner function for computing the next pseudo-random number in the sequence.
    const fn xoshiro(mut s: [u64; 4]) -> (u64, [u64; 4]) {
        let result = s[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);

        let t = s[1] << 17;

        s[2] ^= s[0];
        s[3] ^= s[1];
        s[1] ^= s[2];
        s[0] ^= s[3];

        s[2] ^= t;

        s[3] = s[3].rotate_left(45);
        (result, s)
    }
}

impl Default for XoShiRo {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}
