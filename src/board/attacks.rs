/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Instant;

use anyhow::Result;

use super::{
    Bitboard, Color, Magic, PieceKind, Slider, Square, Table, XoShiRo, KING_ATTACKS,
    KNIGHT_ATTACKS, PAWN_ATTACKS, PAWN_MOVES,
};

/// Answers "where can this piece go?" for every piece kind.
///
/// Leaper lookups are served from the static tables; sliders are served by [`Magic`]s,
/// which are searched for once when the table is built and never change afterwards.
///
/// Building the table is comparatively slow, so build one and share it by reference.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AttackTable {
    rooks: Table<Magic>,
    bishops: Table<Magic>,
}

impl AttackTable {
    /// Builds a new [`AttackTable`] using the library's default random seeds.
    ///
    /// # Panics
    /// If the magic search exceeds [`crate::MAX_MAGIC_ATTEMPTS`] for any square.
    /// See [`AttackTable::try_new`] for a fallible version.
    pub fn new() -> Self {
        match Self::try_new() {
            Ok(table) => table,
            Err(e) => panic!("Failed to build attack table: {e}"),
        }
    }

    /// Builds a new [`AttackTable`] whose magics are searched for with a generator seeded by `seed`.
    ///
    /// # Panics
    /// If the magic search exceeds [`crate::MAX_MAGIC_ATTEMPTS`] for any square.
    pub fn with_seed(seed: u64) -> Self {
        match Self::try_with_seed(seed) {
            Ok(table) => table,
            Err(e) => panic!("Failed to build attack table with seed {seed}: {e}"),
        }
    }

    /// Fallible version of [`AttackTable::new`].
    pub fn try_new() -> Result<Self> {
        Self::build(XoShiRo::new())
    }

    /// Fallible version of [`AttackTable::with_seed`].
    pub fn try_with_seed(seed: u64) -> Result<Self> {
        Self::build(XoShiRo::from_seed(seed))
    }

    fn build(mut rng: XoShiRo) -> Result<Self> {
        let start = Instant::now();

        let rooks = Magic::find_all(Slider::Rook, &mut rng)?;
        let bishops = Magic::find_all(Slider::Bishop, &mut rng)?;

        let slots = rooks.iter().chain(bishops.iter()).map(Magic::len).sum::<usize>();
        tracing::info!(
            slots,
            elapsed = ?start.elapsed(),
            "built magic attack tables"
        );

        Ok(Self { rooks, bishops })
    }

    /// The magic used for `slider` on `square`.
    #[inline(always)]
    pub fn magic(&self, slider: Slider, square: Square) -> &Magic {
        match slider {
            Slider::Rook => &self.rooks[square],
            Slider::Bishop => &self.bishops[square],
        }
    }

    /// Every square a `kind` of `color` on `square` threatens, given the occupied squares `blockers`.
    ///
    /// Blockers only matter to sliders, and are included in their attacks.
    /// Pawns threaten their diagonals, never their push squares.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{AttackTable, Bitboard, Color, PieceKind, Square};
    /// let table = AttackTable::new();
    /// let blockers = Square::D6.bitboard();
    /// let attacks = table.attacks(Square::D4, PieceKind::Rook, Color::White, blockers);
    /// assert!(attacks.intersects(Square::D6));
    /// assert!(!attacks.intersects(Square::D7));
    /// assert_eq!(attacks.population(), 12);
    /// ```
    #[inline(always)]
    pub fn attacks(
        &self,
        square: Square,
        kind: PieceKind,
        color: Color,
        blockers: Bitboard,
    ) -> Bitboard {
        match kind {
            PieceKind::Pawn => PAWN_ATTACKS[color][square],
            PieceKind::Knight => KNIGHT_ATTACKS[square],
            PieceKind::Bishop => self.bishops[square].get_attacks(blockers),
            PieceKind::Rook => self.rooks[square].get_attacks(blockers),
            PieceKind::Queen => {
                self.rooks[square].get_attacks(blockers)
                    | self.bishops[square].get_attacks(blockers)
            }
            PieceKind::King => KING_ATTACKS[square],
        }
    }

    /// Every square a `kind` of `color` on `square` can step onto without capturing.
    ///
    /// For Pawns, these are the forward pushes. A double push is only available when the square in front of the Pawn is empty.
    /// For everything else, these are the attacks that do not land on an occupied square.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{AttackTable, Bitboard, Color, PieceKind, Square};
    /// let table = AttackTable::new();
    /// let pushes = table.moves(Square::E2, PieceKind::Pawn, Color::White, Bitboard::EMPTY_BOARD);
    /// assert_eq!(pushes, Square::E3.bitboard() | Square::E4);
    ///
    /// let blocked = table.moves(Square::E2, PieceKind::Pawn, Color::White, Square::E3.bitboard());
    /// assert!(blocked.is_empty());
    /// ```
    #[inline(always)]
    pub fn moves(
        &self,
        square: Square,
        kind: PieceKind,
        color: Color,
        blockers: Bitboard,
    ) -> Bitboard {
        match kind {
            PieceKind::Pawn => {
                if blockers.intersects(square.bitboard().forward(color)) {
                    Bitboard::EMPTY_BOARD
                } else {
                    PAWN_MOVES[color][square] & !blockers
                }
            }
            _ => self.attacks(square, kind, color, blockers) & !blockers,
        }
    }

    /// The subset of [`AttackTable::attacks`] that lands on `enemies`.
    #[inline(always)]
    pub fn captures(
        &self,
        square: Square,
        kind: PieceKind,
        color: Color,
        blockers: Bitboard,
        enemies: Bitboard,
    ) -> Bitboard {
        self.attacks(square, kind, color, blockers) & enemies
    }
}

impl Default for AttackTable {
    fn default() -> Self {
        Self::new()
    }
}

/// A lazily built table shared by every unit test in the crate.
#[cfg(test)]
pub(crate) fn test_attack_table() -> &'static AttackTable {
    static TABLE: std::sync::OnceLock<AttackTable> = std::sync::OnceLock::new();
    TABLE.get_or_init(AttackTable::new)
}

#[cfg(test)]
mod test {
    use super::*;

    fn squares(list: &[Square]) -> Bitboard {
        list.iter().copied().collect()
    }

    #[test]
    fn test_leaper_lookups() {
        let table = test_attack_table();
        let everything = Bitboard::FULL_BOARD;

        assert_eq!(
            table.attacks(Square::G1, PieceKind::Knight, Color::White, everything),
            squares(&[Square::E2, Square::F3, Square::H3])
        );
        assert_eq!(
            table.attacks(Square::E1, PieceKind::King, Color::White, everything),
            squares(&[Square::D1, Square::D2, Square::E2, Square::F2, Square::F1])
        );
        assert_eq!(
            table.attacks(Square::E5, PieceKind::Pawn, Color::Black, everything),
            squares(&[Square::D4, Square::F4])
        );
    }

    #[test]
    fn test_queen_is_rook_and_bishop() {
        let table = test_attack_table();
        let blockers = squares(&[Square::B2, Square::D7, Square::F4, Square::G1]);
        for square in Square::iter() {
            let queen = table.attacks(square, PieceKind::Queen, Color::Black, blockers);
            let rook = table.attacks(square, PieceKind::Rook, Color::Black, blockers);
            let bishop = table.attacks(square, PieceKind::Bishop, Color::Black, blockers);
            assert_eq!(queen, rook | bishop);
        }
    }

    #[test]
    fn test_slider_lookups_match_reference() {
        let table = test_attack_table();
        let blockers = squares(&[Square::C3, Square::E6, Square::H4, Square::B7, Square::D1]);
        for square in Square::iter() {
            for slider in Slider::ALL {
                assert_eq!(
                    table.magic(slider, square).get_attacks(blockers),
                    slider.reference_attacks(square, blockers)
                );
            }
        }
    }

    #[test]
    fn test_pawn_pushes() {
        let table = test_attack_table();
        let white = Color::White;
        let black = Color::Black;

        // Double push blocked on its landing square only.
        assert_eq!(
            table.moves(Square::D2, PieceKind::Pawn, white, Square::D4.bitboard()),
            Square::D3.bitboard()
        );
        // Blocked directly in front: no jumping.
        assert!(table
            .moves(Square::D7, PieceKind::Pawn, black, Square::D6.bitboard())
            .is_empty());
        assert_eq!(
            table.moves(Square::D7, PieceKind::Pawn, black, Bitboard::EMPTY_BOARD),
            squares(&[Square::D6, Square::D5])
        );
        assert_eq!(
            table.moves(Square::A7, PieceKind::Pawn, white, Bitboard::EMPTY_BOARD),
            Square::A8.bitboard()
        );
    }

    #[test]
    fn test_moves_and_captures_split_attacks() {
        let table = test_attack_table();
        let friends = squares(&[Square::D4, Square::D2]);
        let enemies = squares(&[Square::D7, Square::A4]);
        let blockers = friends | enemies;

        let moves = table.moves(Square::D4, PieceKind::Rook, Color::White, blockers);
        let captures = table.captures(Square::D4, PieceKind::Rook, Color::White, blockers, enemies);

        assert_eq!(captures, enemies);
        assert!(!moves.intersects(blockers));
        assert_eq!(
            moves,
            squares(&[
                Square::D3,
                Square::D5,
                Square::D6,
                Square::C4,
                Square::B4,
                Square::E4,
                Square::F4,
                Square::G4,
                Square::H4
            ])
        );
    }

    #[test]
    fn test_seeded_tables_agree() {
        let seeded = AttackTable::with_seed(0x5eed);
        let table = test_attack_table();
        let blockers = squares(&[Square::C6, Square::F3, Square::B1]);
        for square in Square::iter() {
            assert_eq!(
                seeded.attacks(square, PieceKind::Queen, Color::White, blockers),
                table.attacks(square, PieceKind::Queen, Color::White, blockers)
            );
        }
    }
}
