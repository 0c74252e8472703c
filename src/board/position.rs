/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
};

use anyhow::{bail, Result};

use super::{Bitboard, Color, DecodedMove, File, Piece, PieceKind, Rank, Square};

/// The placement of every piece on the board, stored as one [`Bitboard`] per [`Color`] and one per [`PieceKind`].
///
/// A square belongs to at most one color mask and at most one piece mask.
/// The mutation methods here do not check this: callers must only ever place pieces on squares that are empty,
/// and only remove pieces that are actually there.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    colors: [Bitboard; Color::COUNT],
    pieces: [Bitboard; PieceKind::COUNT],
}

impl Position {
    /// An empty board.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            colors: [Bitboard::EMPTY_BOARD; Color::COUNT],
            pieces: [Bitboard::EMPTY_BOARD; PieceKind::COUNT],
        }
    }

    /// The standard starting arrangement of pieces.
    pub fn starting() -> Self {
        let mut position = Self::new();
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        for color in Color::all() {
            for (file, kind) in File::iter().zip(back_rank) {
                position.place_unchecked(Square::new(file, Rank::first(color)), color, kind);
                position.place_unchecked(Square::new(file, Rank::second(color)), color, PieceKind::Pawn);
            }
        }

        position
    }

    /// Constructs a [`Position`] from the piece placement field of a FEN string.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{Position, Square, Color, PieceKind};
    /// let pos = Position::from_fen_placements("4k3/8/8/8/8/8/8/4K2R").unwrap();
    /// assert_eq!(pos.square_occupant(Square::H1), Some((Color::White, PieceKind::Rook)));
    /// assert_eq!(pos.entire_mask().population(), 3);
    /// ```
    pub fn from_fen_placements(placements: &str) -> Result<Self> {
        let mut position = Self::new();

        let ranks = placements.split('/').collect::<Vec<_>>();
        if ranks.len() != Rank::COUNT {
            bail!("FEN must have piece placements for all 8 ranks. Got {placements:?}");
        }

        // FEN lists the eighth rank first.
        for (rank, row) in Rank::iter().rev().zip(ranks) {
            let mut file = 0;

            for piece_char in row.chars() {
                if let Some(empty) = piece_char.to_digit(10) {
                    if empty == 0 || empty > 8 {
                        bail!("Invalid number of empty squares {piece_char:?} in {row:?}");
                    }
                    file += empty as u8;
                    continue;
                }

                let Ok(piece) = Piece::from_uci(piece_char) else {
                    bail!("FEN placements must contain piece chars or digits. Got {piece_char:?}");
                };
                if file >= File::COUNT as u8 {
                    bail!("Rank {rank} in {row:?} describes more than 8 squares");
                }

                let square = Square::new(File(file), rank);
                position.place_unchecked(square, piece.color, piece.kind);
                file += 1;
            }

            if file != File::COUNT as u8 {
                bail!("Rank {rank} in {row:?} must describe exactly 8 squares. Got {file}");
            }
        }

        Ok(position)
    }

    /// Generates the piece placement field of a FEN string for this [`Position`].
    pub fn to_fen_placements(&self) -> String {
        let mut ranks = Vec::with_capacity(Rank::COUNT);

        for rank in Rank::iter().rev() {
            let mut row = String::new();
            let mut empty_spaces = 0;
            for file in File::iter() {
                if let Some((color, kind)) = self.square_occupant(Square::new(file, rank)) {
                    if empty_spaces != 0 {
                        row += &empty_spaces.to_string();
                        empty_spaces = 0;
                    }
                    row.push(Piece::new(color, kind).to_uci());
                } else {
                    empty_spaces += 1;
                }
            }

            if empty_spaces != 0 {
                row += &empty_spaces.to_string();
            }
            ranks.push(row);
        }

        ranks.join("/")
    }

    /// Every square occupied by `color`.
    #[inline(always)]
    pub const fn color_mask(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    /// Every square occupied by a `kind`, of either color.
    #[inline(always)]
    pub const fn piece_mask(&self, kind: PieceKind) -> Bitboard {
        self.pieces[kind.index()]
    }

    /// Every square occupied by a `kind` of `color`.
    #[inline(always)]
    pub const fn color_piece_mask(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.color_mask(color).and(self.piece_mask(kind))
    }

    /// Every occupied square.
    #[inline(always)]
    pub const fn entire_mask(&self) -> Bitboard {
        self.colors[0].or(self.colors[1])
    }

    /// The square of `color`'s King.
    ///
    /// The King must be on the board.
    #[inline(always)]
    pub const fn king_square(&self, color: Color) -> Square {
        self.color_piece_mask(color, PieceKind::King)
            .to_square_unchecked()
    }

    /// The color and kind of the piece on `square`, if any.
    pub fn square_occupant(&self, square: Square) -> Option<(Color, PieceKind)> {
        let color = Color::all()
            .into_iter()
            .find(|&color| self.colors[color].intersects(square))?;
        let kind = PieceKind::all()
            .into_iter()
            .find(|&kind| self.pieces[kind].intersects(square))?;
        Some((color, kind))
    }

    /// Sets the bits of `square` in the masks of `color` and `kind`.
    ///
    /// `square` must not already hold a piece.
    #[inline(always)]
    pub fn place_unchecked(&mut self, square: Square, color: Color, kind: PieceKind) {
        self.colors[color] |= square;
        self.pieces[kind] |= square;
    }

    /// Flips the bits of `square` in the masks of `color` and `kind`.
    ///
    /// `square` must hold a `kind` of `color`.
    #[inline(always)]
    pub fn remove_unchecked(&mut self, square: Square, color: Color, kind: PieceKind) {
        self.colors[color] ^= square;
        self.pieces[kind] ^= square;
    }

    /// Removes whatever piece sits on `square`.
    ///
    /// Only masks that contain `square` are touched, so `square` must be consistently occupied or empty.
    pub fn clear_unchecked(&mut self, square: Square) {
        for mask in self.colors.iter_mut().chain(self.pieces.iter_mut()) {
            if mask.intersects(square) {
                *mask ^= square;
            }
        }
    }

    #[inline(always)]
    fn move_piece(&mut self, from: Square, to: Square, color: Color, kind: PieceKind) {
        self.remove_unchecked(from, color, kind);
        self.place_unchecked(to, color, kind);
    }

    /// The Rook's source and destination when `color` castles on the King's side.
    #[inline(always)]
    const fn king_side_rook(color: Color) -> (Square, Square) {
        let rank = Rank::first(color);
        (Square::new(File::H, rank), Square::new(File::F, rank))
    }

    /// The Rook's source and destination when `color` castles on the Queen's side.
    #[inline(always)]
    const fn queen_side_rook(color: Color) -> (Square, Square) {
        let rank = Rank::first(color);
        (Square::new(File::A, rank), Square::new(File::D, rank))
    }

    /// Moves the pieces involved in `mv`.
    ///
    /// `mv` must be legal in this position. Only the placement of pieces changes.
    pub fn apply_move(&mut self, mv: &DecodedMove) {
        let common = mv.common();
        let (source, dest, piece, color) = (common.source, common.dest, common.piece, common.color);

        match *mv {
            DecodedMove::Quiet(_) | DecodedMove::DoublePawnPush { .. } => {
                self.move_piece(source, dest, color, piece);
            }
            DecodedMove::Capture { captured, .. } => {
                self.remove_unchecked(dest, color.opponent(), captured);
                self.move_piece(source, dest, color, piece);
            }
            DecodedMove::CastleKingSide(_) => {
                let (rook_from, rook_to) = Self::king_side_rook(color);
                self.move_piece(source, dest, color, PieceKind::King);
                self.move_piece(rook_from, rook_to, color, PieceKind::Rook);
            }
            DecodedMove::CastleQueenSide(_) => {
                let (rook_from, rook_to) = Self::queen_side_rook(color);
                self.move_piece(source, dest, color, PieceKind::King);
                self.move_piece(rook_from, rook_to, color, PieceKind::Rook);
            }
            DecodedMove::EnPassant { pawn_square, .. } => {
                self.remove_unchecked(pawn_square, color.opponent(), PieceKind::Pawn);
                self.move_piece(source, dest, color, PieceKind::Pawn);
            }
            DecodedMove::MovePromotion { promotion, .. } => {
                self.remove_unchecked(source, color, PieceKind::Pawn);
                self.place_unchecked(dest, color, promotion);
            }
            DecodedMove::CapturePromotion {
                captured,
                promotion,
                ..
            } => {
                self.remove_unchecked(dest, color.opponent(), captured);
                self.remove_unchecked(source, color, PieceKind::Pawn);
                self.place_unchecked(dest, color, promotion);
            }
        }
    }

    /// Undoes [`Position::apply_move`] for the same `mv`.
    pub fn reverse_move(&mut self, mv: &DecodedMove) {
        let common = mv.common();
        let (source, dest, piece, color) = (common.source, common.dest, common.piece, common.color);

        match *mv {
            DecodedMove::Quiet(_) | DecodedMove::DoublePawnPush { .. } => {
                self.move_piece(dest, source, color, piece);
            }
            DecodedMove::Capture { captured, .. } => {
                self.move_piece(dest, source, color, piece);
                self.place_unchecked(dest, color.opponent(), captured);
            }
            DecodedMove::CastleKingSide(_) => {
                let (rook_from, rook_to) = Self::king_side_rook(color);
                self.move_piece(rook_to, rook_from, color, PieceKind::Rook);
                self.move_piece(dest, source, color, PieceKind::King);
            }
            DecodedMove::CastleQueenSide(_) => {
                let (rook_from, rook_to) = Self::queen_side_rook(color);
                self.move_piece(rook_to, rook_from, color, PieceKind::Rook);
                self.move_piece(dest, source, color, PieceKind::King);
            }
            DecodedMove::EnPassant { pawn_square, .. } => {
                self.move_piece(dest, source, color, PieceKind::Pawn);
                self.place_unchecked(pawn_square, color.opponent(), PieceKind::Pawn);
            }
            DecodedMove::MovePromotion { promotion, .. } => {
                self.remove_unchecked(dest, color, promotion);
                self.place_unchecked(source, color, PieceKind::Pawn);
            }
            DecodedMove::CapturePromotion {
                captured,
                promotion,
                ..
            } => {
                self.remove_unchecked(dest, color, promotion);
                self.place_unchecked(source, color, PieceKind::Pawn);
                self.place_unchecked(dest, color.opponent(), captured);
            }
        }
    }
}

impl Index<PieceKind> for Position {
    type Output = Bitboard;
    #[inline(always)]
    fn index(&self, index: PieceKind) -> &Self::Output {
        &self.pieces[index]
    }
}

impl IndexMut<PieceKind> for Position {
    #[inline(always)]
    fn index_mut(&mut self, index: PieceKind) -> &mut Self::Output {
        &mut self.pieces[index]
    }
}

impl Index<Color> for Position {
    type Output = Bitboard;
    #[inline(always)]
    fn index(&self, index: Color) -> &Self::Output {
        &self.colors[index]
    }
}

impl IndexMut<Color> for Position {
    #[inline(always)]
    fn index_mut(&mut self, index: Color) -> &mut Self::Output {
        &mut self.colors[index]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            write!(f, "{rank}| ")?;
            for file in File::iter() {
                let occupant = self
                    .square_occupant(Square::new(file, rank))
                    .map(|(color, kind)| Piece::new(color, kind).to_uci())
                    .unwrap_or('.');
                write!(f, "{occupant} ")?;
            }
            writeln!(f)?;
        }
        write!(f, " +{}\n   ", "--".repeat(File::COUNT))?;
        for file in File::iter() {
            write!(f, "{file} ")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{self}")?;
        for color in Color::all() {
            writeln!(f, "{}: {}", color.name(), self.colors[color].to_hex_string())?;
        }
        for kind in PieceKind::all() {
            writeln!(f, "{}: {}", kind.name(), self.pieces[kind].to_hex_string())?;
        }
        Ok(())
    }
}
