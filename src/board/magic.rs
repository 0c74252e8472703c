/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::{bail, Result};

use super::{Bitboard, Direction, Square, Table, XoShiRo};

/// Number of candidate multipliers tried for a single square before giving up.
///
/// Real searches finish within a few thousand attempts. Hitting this limit means the generator is broken.
pub const MAX_MAGIC_ATTEMPTS: u64 = 100_000_000;

/// A piece whose attacks are found by sliding along rays until blocked.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Slider {
    Rook,
    Bishop,
}

impl Slider {
    pub const ALL: [Self; 2] = [Self::Rook, Self::Bishop];

    /// The four directions this slider travels in.
    #[inline(always)]
    pub const fn directions(&self) -> [Direction; 4] {
        match self {
            Self::Rook => Direction::ORTHOGONAL,
            Self::Bishop => Direction::DIAGONAL,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Rook => "rook",
            Self::Bishop => "bishop",
        }
    }

    /// Squares whose occupancy can change this slider's attacks from `square`.
    ///
    /// The last square of each ray is dropped: a piece standing on the edge blocks nothing further.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{Slider, Square};
    /// assert_eq!(Slider::Rook.relevant_mask(Square::A1).population(), 12);
    /// assert_eq!(Slider::Bishop.relevant_mask(Square::D4).population(), 9);
    /// ```
    pub fn relevant_mask(&self, square: Square) -> Bitboard {
        let mut mask = Bitboard::EMPTY_BOARD;
        for direction in self.directions() {
            let mut current = direction.step(square.bitboard());
            while direction.step(current).is_nonempty() {
                mask |= current;
                current = direction.step(current);
            }
        }
        mask
    }

    /// Computes attacks by marching along each ray until the edge of the board or the first blocker.
    ///
    /// Blockers are included in the result, since they may be captured.
    /// This is the slow reference that magic lookups are built from and checked against.
    pub fn reference_attacks(&self, square: Square, blockers: Bitboard) -> Bitboard {
        let mut attacks = Bitboard::EMPTY_BOARD;
        for direction in self.directions() {
            let mut current = direction.step(square.bitboard());
            while current.is_nonempty() {
                attacks |= current;
                if current.intersects(blockers) {
                    break;
                }
                current = direction.step(current);
            }
        }
        attacks
    }
}

impl fmt::Display for Slider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A perfect hash from the relevant blockers around one square to that square's slider attacks.
///
/// Lookups compute `((blockers & mask) * magic) >> shift` and index the dense attack table with it.
#[derive(Clone, PartialEq, Eq)]
pub struct Magic {
    magic: u64,
    mask: Bitboard,
    shift: u8,
    attacks: Box<[Bitboard]>,
}

impl Magic {
    /// Searches for a magic multiplier for `slider` on `square`, drawing candidates from `rng`.
    ///
    /// Two blocker configurations may share a slot only if they produce identical attacks.
    /// Fails if no multiplier is found within [`MAX_MAGIC_ATTEMPTS`] candidates.
    pub fn find(slider: Slider, square: Square, rng: &mut XoShiRo) -> Result<Self> {
        let mask = slider.relevant_mask(square);
        let shift = 64 - mask.population();

        let occupancies = mask.subsets().collect::<Vec<_>>();
        let references = occupancies
            .iter()
            .map(|&blockers| slider.reference_attacks(square, blockers))
            .collect::<Vec<_>>();

        let size = occupancies.len();
        let mut table = vec![Bitboard::EMPTY_BOARD; size];
        // Slots written during the current attempt carry its number, so the table is never cleared.
        let mut epochs = vec![0u64; size];

        for attempt in 1..=MAX_MAGIC_ATTEMPTS {
            let magic = rng.next_sparse_u64();

            let found = occupancies
                .iter()
                .zip(&references)
                .all(|(&blockers, &attacks)| {
                    let index = Self::hash(blockers, magic, shift);
                    if epochs[index] != attempt {
                        epochs[index] = attempt;
                        table[index] = attacks;
                        true
                    } else {
                        table[index] == attacks
                    }
                });

            if found {
                tracing::debug!(
                    slider = slider.name(),
                    %square,
                    attempts = attempt,
                    magic,
                    "found magic"
                );

                return Ok(Self {
                    magic,
                    mask,
                    shift,
                    attacks: table.into_boxed_slice(),
                });
            }
        }

        bail!(
            "Failed to find a {slider} magic for {square} within {MAX_MAGIC_ATTEMPTS} attempts"
        )
    }

    /// Builds magics for every square, in ascending order.
    pub fn find_all(slider: Slider, rng: &mut XoShiRo) -> Result<Table<Self>> {
        Table::try_from_fn(|square| Self::find(slider, square, rng))
    }

    #[inline(always)]
    const fn hash(blockers: Bitboard, magic: u64, shift: u8) -> usize {
        (blockers.inner().wrapping_mul(magic) >> shift) as usize
    }

    /// Index into the attack table for an arbitrary board occupancy.
    #[inline(always)]
    pub const fn index(&self, occupancy: Bitboard) -> usize {
        Self::hash(occupancy.and(self.mask), self.magic, self.shift)
    }

    /// Looks up the attacks of this slider given every occupied square on the board.
    ///
    /// Occupancy outside the relevant mask is ignored.
    #[inline(always)]
    pub fn get_attacks(&self, occupancy: Bitboard) -> Bitboard {
        self.attacks[self.index(occupancy)]
    }

    #[inline(always)]
    pub const fn magic(&self) -> u64 {
        self.magic
    }

    #[inline(always)]
    pub const fn mask(&self) -> Bitboard {
        self.mask
    }

    #[inline(always)]
    pub const fn shift(&self) -> u8 {
        self.shift
    }

    /// Number of slots in the attack table, always `2^popcount(mask)`.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.attacks.len()
    }

    /// Always `false`: every square has at least one relevant blocker configuration.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty()
    }
}

impl fmt::Debug for Magic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Magic")
            .field("magic", &format_args!("{:#018x}", self.magic))
            .field("mask", &format_args!("{}", self.mask.to_hex_string()))
            .field("shift", &self.shift)
            .field("len", &self.attacks.len())
            .finish()
    }
}
