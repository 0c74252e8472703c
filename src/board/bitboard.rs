/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Not};

use super::{Color, File, Rank, Square};

/// A set of squares, stored as one bit per square.
///
/// Uses [Little-Endian Rank-File Mapping (LERF)](https://www.chessprogramming.org/Square_Mapping_Considerations#Little-Endian_Rank-File_Mapping):
/// bit 0 is A1, bit 7 is H1 and bit 63 is H8. The first rank therefore looks like this:
/// ```text
/// 00000000
/// 00000000
/// 00000000
/// 00000000
/// 00000000
/// 00000000
/// 00000000
/// 11111111
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Bitboard(pub(crate) u64);

impl Bitboard {
    pub const FILE_A: Self = Self(0x0101010101010101);
    pub const FILE_H: Self = Self(0x8080808080808080);
    pub const NOT_FILE_A: Self = Self(0xfefefefefefefefe);
    pub const NOT_FILE_H: Self = Self(0x7f7f7f7f7f7f7f7f);
    pub const NOT_FILE_AB: Self = Self(0xfcfcfcfcfcfcfcfc);
    pub const NOT_FILE_GH: Self = Self(0x3f3f3f3f3f3f3f3f);
    pub const RANK_1: Self = Self(0x00000000000000FF);
    pub const RANK_2: Self = Self(0x000000000000FF00);
    pub const RANK_3: Self = Self(0x0000000000FF0000);
    pub const RANK_4: Self = Self(0x00000000FF000000);
    pub const RANK_5: Self = Self(0x000000FF00000000);
    pub const RANK_6: Self = Self(0x0000FF0000000000);
    pub const RANK_7: Self = Self(0x00FF000000000000);
    pub const RANK_8: Self = Self(0xFF00000000000000);
    pub const EMPTY_BOARD: Self = Self(0x0000000000000000);
    pub const FULL_BOARD: Self = Self(0xFFFFFFFFFFFFFFFF);
    pub const EDGES: Self = Self(0xFF818181818181FF);
    pub const BACK_RANKS: Self = Self(0xFF000000000000FF);

    /// Constructs a new [`Bitboard`] from the provided bit pattern.
    ///
    /// # Example
    /// ```
    /// # use tadpole::Bitboard;
    /// let board = Bitboard::new(255);
    /// assert_eq!(board, Bitboard::RANK_1);
    /// ```
    #[inline(always)]
    pub const fn new(bits: u64) -> Self {
        Self(bits)
    }

    /// Constructs a new [`Bitboard`] with only the bit of `square` set.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{Bitboard, Square};
    /// let board = Bitboard::from_square(Square::H8);
    /// assert_eq!(board.inner(), 0x8000000000000000);
    /// ```
    #[inline(always)]
    pub const fn from_square(square: Square) -> Self {
        Self(1 << square.index())
    }

    /// Constructs a new [`Bitboard`] with an entire row of bits set.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{Bitboard, Rank};
    /// assert_eq!(Bitboard::from_rank(Rank::SEVEN), Bitboard::RANK_7);
    /// ```
    #[inline(always)]
    pub const fn from_rank(rank: Rank) -> Self {
        Self(Self::RANK_1.0 << (rank.0 * 8))
    }

    /// Both ranks on which any pawn promotes.
    #[inline(always)]
    pub const fn promotion_ranks() -> Self {
        Self::BACK_RANKS
    }

    #[inline(always)]
    pub const fn inner(&self) -> u64 {
        self.0
    }

    /// The [`Square`] of the lowest set bit. The board must not be empty.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{Bitboard, Square};
    /// let board = Bitboard::from_square(Square::G2);
    /// assert_eq!(board.to_square_unchecked(), Square::G2);
    /// ```
    #[inline(always)]
    pub const fn to_square_unchecked(&self) -> Square {
        debug_assert!(self.0 != 0, "Cannot convert an empty Bitboard to a Square");
        Square::from_index_unchecked(self.0.trailing_zeros() as usize)
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub const fn is_nonempty(&self) -> bool {
        self.0 != 0
    }

    /// Checks if `self` and `other` share at least one set bit.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{Bitboard, Square};
    /// assert!(Bitboard::RANK_1.intersects(Square::C1));
    /// assert!(!Bitboard::RANK_1.intersects(Square::C2));
    /// ```
    #[inline(always)]
    pub fn intersects(&self, other: impl Into<Self>) -> bool {
        self.0 & other.into().0 != 0
    }

    /// Sets every bit of `other` in `self`.
    #[inline(always)]
    pub fn set(&mut self, other: impl Into<Self>) {
        self.0 |= other.into().0;
    }

    /// Clears every bit of `other` from `self`.
    #[inline(always)]
    pub fn clear(&mut self, other: impl Into<Self>) {
        self.0 &= !other.into().0;
    }

    #[inline(always)]
    pub fn lsb(&self) -> Option<Square> {
        (self.0 != 0).then(|| self.to_square_unchecked())
    }

    /// Removes and returns the lowest set bit.
    #[inline(always)]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        let lsb = self.lsb();
        self.0 &= self.0.wrapping_sub(1);
        lsb
    }

    /// An iterator over the set bits, as [`Square`]s, in ascending order.
    #[inline(always)]
    pub const fn iter(&self) -> BitboardIter {
        BitboardIter { bitboard: *self }
    }

    /// An iterator over every subset of this [`Bitboard`], starting with the empty set and ending with `self`.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{Bitboard, Square};
    /// let board = Square::A1.bitboard() | Square::C3.bitboard();
    /// let subsets = board.subsets().collect::<Vec<_>>();
    /// assert_eq!(subsets.len(), 4);
    /// assert_eq!(subsets[0], Bitboard::EMPTY_BOARD);
    /// assert_eq!(subsets[3], board);
    /// ```
    #[inline(always)]
    pub const fn subsets(&self) -> BitboardSubsetIter {
        BitboardSubsetIter {
            bitboard: *self,
            subset: Self::EMPTY_BOARD,
            remaining: 1 << self.population(),
        }
    }

    /// Number of set bits.
    #[inline(always)]
    pub const fn population(&self) -> u8 {
        self.0.count_ones() as u8
    }

    /// Shifts this [`Bitboard`] one rank up. Bits on the eighth rank fall off the board.
    ///
    /// # Example
    /// ```
    /// # use tadpole::Bitboard;
    /// assert_eq!(Bitboard::RANK_4.north(), Bitboard::RANK_5);
    /// assert_eq!(Bitboard::RANK_8.north(), Bitboard::EMPTY_BOARD);
    /// ```
    #[inline(always)]
    pub const fn north(self) -> Self {
        Self(self.0 << 8)
    }

    /// Shifts this [`Bitboard`] one rank down. Bits on the first rank fall off the board.
    #[inline(always)]
    pub const fn south(self) -> Self {
        Self(self.0 >> 8)
    }

    /// Shifts this [`Bitboard`] one file towards `h`, without wrapping onto the `a` file.
    ///
    /// # Example
    /// ```
    /// # use tadpole::Bitboard;
    /// assert_eq!(Bitboard::FILE_H.east(), Bitboard::EMPTY_BOARD);
    /// ```
    #[inline(always)]
    pub const fn east(self) -> Self {
        Self((self.0 << 1) & Self::NOT_FILE_A.0)
    }

    /// Shifts this [`Bitboard`] one file towards `a`, without wrapping onto the `h` file.
    #[inline(always)]
    pub const fn west(self) -> Self {
        Self((self.0 >> 1) & Self::NOT_FILE_H.0)
    }

    #[inline(always)]
    pub const fn northeast(self) -> Self {
        Self((self.0 << 9) & Self::NOT_FILE_A.0)
    }

    #[inline(always)]
    pub const fn northwest(self) -> Self {
        Self((self.0 << 7) & Self::NOT_FILE_H.0)
    }

    #[inline(always)]
    pub const fn southeast(self) -> Self {
        Self((self.0 >> 7) & Self::NOT_FILE_A.0)
    }

    #[inline(always)]
    pub const fn southwest(self) -> Self {
        Self((self.0 >> 9) & Self::NOT_FILE_H.0)
    }

    // Knight steps are named by the two-then-one order of their legs.

    /// Two ranks up, one file towards `h`.
    #[inline(always)]
    pub const fn north_north_east(self) -> Self {
        Self((self.0 << 17) & Self::NOT_FILE_A.0)
    }

    #[inline(always)]
    pub const fn north_north_west(self) -> Self {
        Self((self.0 << 15) & Self::NOT_FILE_H.0)
    }

    #[inline(always)]
    pub const fn south_south_east(self) -> Self {
        Self((self.0 >> 15) & Self::NOT_FILE_A.0)
    }

    #[inline(always)]
    pub const fn south_south_west(self) -> Self {
        Self((self.0 >> 17) & Self::NOT_FILE_H.0)
    }

    /// One rank up, two files towards `h`.
    #[inline(always)]
    pub const fn north_east_east(self) -> Self {
        Self((self.0 << 10) & Self::NOT_FILE_AB.0)
    }

    #[inline(always)]
    pub const fn north_west_west(self) -> Self {
        Self((self.0 << 6) & Self::NOT_FILE_GH.0)
    }

    #[inline(always)]
    pub const fn south_east_east(self) -> Self {
        Self((self.0 >> 6) & Self::NOT_FILE_AB.0)
    }

    #[inline(always)]
    pub const fn south_west_west(self) -> Self {
        Self((self.0 >> 10) & Self::NOT_FILE_GH.0)
    }

    /// One rank towards the opponent of `color`.
    #[inline(always)]
    pub const fn forward(self, color: Color) -> Self {
        match color {
            Color::White => self.north(),
            Color::Black => self.south(),
        }
    }

    /// `const` analog of [`std::ops::BitAnd::bitand`].
    #[inline(always)]
    pub const fn and(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// `const` analog of [`std::ops::BitOr::bitor`].
    #[inline(always)]
    pub const fn or(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// `const` analog of [`std::ops::Not::not`].
    #[inline(always)]
    pub const fn not(self) -> Self {
        Self(!self.0)
    }

    /// Formats the inner bits as a 16-digit hexadecimal string.
    pub fn to_hex_string(&self) -> String {
        format!("0x{:0>16X}", self.0)
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<T: IntoIterator<Item = Square>>(iter: T) -> Self {
        iter.into_iter().fold(Self::default(), |bb, sq| bb | sq)
    }
}

macro_rules! impl_bitwise_op {
    ($op:tt, $op_assign:tt, $func:ident, $func_assign:ident) => {
        impl<T> std::ops::$op<T> for Bitboard
        where
            Self: From<T>,
        {
            type Output = Self;
            #[inline(always)]
            fn $func(self, rhs: T) -> Self::Output {
                Self(self.0.$func(Self::from(rhs).0))
            }
        }

        impl<T> std::ops::$op_assign<T> for Bitboard
        where
            Self: From<T>,
        {
            #[inline(always)]
            fn $func_assign(&mut self, rhs: T) {
                self.0.$func_assign(Self::from(rhs).0);
            }
        }
    };
}

impl_bitwise_op!(BitAnd, BitAndAssign, bitand, bitand_assign);
impl_bitwise_op!(BitOr, BitOrAssign, bitor, bitor_assign);
impl_bitwise_op!(BitXor, BitXorAssign, bitxor, bitxor_assign);

impl Not for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

impl<T> From<Option<T>> for Bitboard
where
    Self: From<T>,
{
    /// `None` becomes the empty board.
    #[inline(always)]
    fn from(value: Option<T>) -> Self {
        value.map(Self::from).unwrap_or_default()
    }
}

impl From<Square> for Bitboard {
    #[inline(always)]
    fn from(value: Square) -> Self {
        Self::from_square(value)
    }
}

impl From<Rank> for Bitboard {
    #[inline(always)]
    fn from(value: Rank) -> Self {
        Self::from_rank(value)
    }
}

impl From<u64> for Bitboard {
    #[inline(always)]
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl Default for Bitboard {
    #[inline(always)]
    fn default() -> Self {
        Self::EMPTY_BOARD
    }
}

impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            for file in File::iter() {
                let occupant = if self.intersects(Square::new(file, rank)) {
                    'X'
                } else {
                    '.'
                };
                write!(f, "{occupant} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            write!(f, "{rank}| ")?;
            for file in File::iter() {
                let occupant = if self.intersects(Square::new(file, rank)) {
                    'X'
                } else {
                    '.'
                };
                write!(f, "{occupant} ")?;
            }
            writeln!(f)?;
        }
        write!(f, " +{}\n   ", "--".repeat(File::COUNT))?;
        for file in File::iter() {
            write!(f, "{file} ")?;
        }
        write!(f, "\n{}", self.to_hex_string())
    }
}

/// An iterator over all set bits in a [`Bitboard`], lowest first.
///
/// See [`Bitboard::iter`].
pub struct BitboardIter {
    bitboard: Bitboard,
}

impl Iterator for BitboardIter {
    type Item = Square;
    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.bitboard.pop_lsb()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.bitboard.population() as usize;
        (size, Some(size))
    }
}

impl ExactSizeIterator for BitboardIter {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;
    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        BitboardIter { bitboard: self }
    }
}

impl IntoIterator for &Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;
    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        BitboardIter { bitboard: *self }
    }
}

/// An iterator over all possible subsets of a [`Bitboard`].
///
/// See [`Bitboard::subsets`]. Used to enumerate blocker configurations when searching for magics.
pub struct BitboardSubsetIter {
    bitboard: Bitboard,
    subset: Bitboard,
    remaining: usize,
}

impl Iterator for BitboardSubsetIter {
    type Item = Bitboard;
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let subset = self.subset;

        // Carry-Rippler: https://www.chessprogramming.org/Traversing_Subsets_of_a_Set#All_Subsets_of_any_Set
        self.subset.0 = self.subset.0.wrapping_sub(self.bitboard.0) & self.bitboard.0;
        self.remaining -= 1;

        Some(subset)
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for BitboardSubsetIter {}
