/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::{bail, Result};

use super::{Color, DecodedMove, PieceKind, Square};

/// Which side of the board a King castles towards.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    pub const ALL: [Self; 2] = [Self::King, Self::Queen];
}

/// The four castling rights, packed into the low bits of a byte.
///
/// Bit `2 * color` is the Queen side right and bit `2 * color + 1` the King side right.
/// Rights are only ever removed while playing. Undoing a move restores them wholesale.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b1111);

    #[inline(always)]
    pub const fn new(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    #[inline(always)]
    pub const fn inner(&self) -> u8 {
        self.0
    }

    #[inline(always)]
    const fn mask(color: Color, side: CastleSide) -> u8 {
        let offset = match side {
            CastleSide::Queen => 0,
            CastleSide::King => 1,
        };
        1 << (color.index() * 2 + offset)
    }

    /// Does `color` still hold the right to castle towards `side`?
    #[inline(always)]
    pub const fn has(&self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::mask(color, side) != 0
    }

    #[inline(always)]
    pub fn grant(&mut self, color: Color, side: CastleSide) {
        self.0 |= Self::mask(color, side);
    }

    /// Removes one right. Removing a right that is already gone does nothing.
    #[inline(always)]
    pub fn invalidate(&mut self, color: Color, side: CastleSide) {
        self.0 &= !Self::mask(color, side);
    }

    /// Removes both of `color`'s rights.
    #[inline(always)]
    pub fn invalidate_color(&mut self, color: Color) {
        self.invalidate(color, CastleSide::King);
        self.invalidate(color, CastleSide::Queen);
    }

    /// The right lost when the piece on `square` moves or is captured, if `square` is a Rook's starting square.
    #[inline(always)]
    const fn rook_home(square: Square) -> Option<(Color, CastleSide)> {
        match square {
            Square::A1 => Some((Color::White, CastleSide::Queen)),
            Square::H1 => Some((Color::White, CastleSide::King)),
            Square::A8 => Some((Color::Black, CastleSide::Queen)),
            Square::H8 => Some((Color::Black, CastleSide::King)),
            _ => None,
        }
    }

    /// Removes every right that `mv` forfeits.
    ///
    /// Moving the King or castling forfeits both rights for that color.
    /// Any move touching a Rook's starting square forfeits the matching right,
    /// which covers both the Rook leaving and the Rook being captured there.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{CastlingRights, CastleSide, Color, DecodedMove, MoveCommon, PieceKind, Square};
    /// let mut rights = CastlingRights::ALL;
    /// let rook_move = DecodedMove::Quiet(MoveCommon::new(Square::H1, Square::H4, PieceKind::Rook, Color::White));
    /// rights.update(&rook_move);
    /// assert!(!rights.has(Color::White, CastleSide::King));
    /// assert!(rights.has(Color::White, CastleSide::Queen));
    /// ```
    pub fn update(&mut self, mv: &DecodedMove) {
        let common = mv.common();

        match mv {
            DecodedMove::CastleKingSide(_) | DecodedMove::CastleQueenSide(_) => {
                self.invalidate_color(common.color)
            }
            DecodedMove::Quiet(_) | DecodedMove::Capture { .. }
                if common.piece == PieceKind::King =>
            {
                self.invalidate_color(common.color)
            }
            _ => {}
        }

        for square in [common.source, common.dest] {
            if let Some((color, side)) = Self::rook_home(square) {
                self.invalidate(color, side);
            }
        }
    }

    /// Parses the castling field of a FEN string, such as `KQkq`, `Kq`, or `-`.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{CastlingRights, CastleSide, Color};
    /// let rights = CastlingRights::from_fen("Kq").unwrap();
    /// assert!(rights.has(Color::White, CastleSide::King));
    /// assert!(!rights.has(Color::White, CastleSide::Queen));
    /// assert!(rights.has(Color::Black, CastleSide::Queen));
    /// assert!(CastlingRights::from_fen("KQkqK").is_err());
    /// ```
    pub fn from_fen(field: &str) -> Result<Self> {
        let mut rights = Self::NONE;
        if field == "-" {
            return Ok(rights);
        }

        if field.is_empty() || field.len() > 4 {
            bail!("Castling rights must be `-` or at most 4 chars. Got {field:?}");
        }

        for c in field.chars() {
            let (color, side) = match c {
                'K' => (Color::White, CastleSide::King),
                'Q' => (Color::White, CastleSide::Queen),
                'k' => (Color::Black, CastleSide::King),
                'q' => (Color::Black, CastleSide::Queen),
                _ => bail!("Invalid castling rights char {c:?} in {field:?}"),
            };
            rights.grant(color, side);
        }

        Ok(rights)
    }

    /// Formats these rights as the castling field of a FEN string.
    pub fn to_fen(&self) -> String {
        let rights = [
            (Color::White, CastleSide::King, 'K'),
            (Color::White, CastleSide::Queen, 'Q'),
            (Color::Black, CastleSide::King, 'k'),
            (Color::Black, CastleSide::Queen, 'q'),
        ]
        .into_iter()
        .filter(|&(color, side, _)| self.has(color, side))
        .map(|(_, _, c)| c)
        .collect::<String>();

        if rights.is_empty() {
            String::from("-")
        } else {
            rights
        }
    }
}

impl Default for CastlingRights {
    /// Every right is held, as at the start of a game.
    #[inline(always)]
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

impl fmt::Debug for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#06b})", self.to_fen(), self.0)
    }
}
