/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{
    ray_between, ray_from, AttackTable, Bitboard, Board, CastleSide, Color, EncodedMove, File,
    MoveKind, MoveList, PieceKind, Position, Rank, Square,
};

/// What the enemy pieces do to one side's King.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct KingInfo {
    /// Squares the King may not step onto.
    ///
    /// Sliding attacks pass through the King's own square, so it cannot retreat along a checking ray.
    pub danger: Bitboard,

    /// Enemy pieces giving check.
    pub checkers: Bitboard,

    /// Squares where a non-King move resolves a single check: the checker itself, plus the squares
    /// between it and the King if it is a slider.
    pub intervention: Bitboard,
}

/// Friendly pieces of `color` that are the sole blocker between their King and an enemy slider.
///
/// # Example
/// ```
/// # use tadpole::{pinned_pieces, AttackTable, Color, Position, Square};
/// let attacks = AttackTable::new();
/// let pos = Position::from_fen_placements("4k3/3r2r1/8/8/3Q4/8/3K2Nb/8").unwrap();
/// assert_eq!(pinned_pieces(&pos, &attacks, Color::White), Square::D4.bitboard());
/// ```
pub fn pinned_pieces(position: &Position, attacks: &AttackTable, color: Color) -> Bitboard {
    let king = position.king_square(color);
    let friendly = position.color_mask(color);
    let enemies = position.color_mask(color.opponent());
    let occupied = position.entire_mask();
    let queens = position.piece_mask(PieceKind::Queen);

    let mut pinned = Bitboard::EMPTY_BOARD;
    for kind in [PieceKind::Rook, PieceKind::Bishop] {
        let sliders = enemies & (position.piece_mask(kind) | queens);

        // The nearest friendly piece along each ray from the King.
        let candidates = attacks.captures(king, kind, color, occupied, friendly);
        for candidate in candidates {
            let behind = ray_from(king, candidate) & sliders;
            let is_pinned = behind.into_iter().any(|pinner| {
                attacks
                    .attacks(pinner, kind, color.opponent(), occupied)
                    .intersects(candidate)
            });

            if is_pinned {
                pinned |= candidate;
            }
        }
    }

    pinned
}

/// Computes the danger squares, checkers, and intervention squares for `color`'s King.
///
/// # Example
/// ```
/// # use tadpole::{king_danger_squares, AttackTable, Color, Position, Square};
/// let attacks = AttackTable::new();
/// let pos = Position::from_fen_placements("8/2kr4/8/8/8/3K4/8/8").unwrap();
/// let info = king_danger_squares(&pos, &attacks, Color::White);
/// assert_eq!(info.checkers, Square::D7.bitboard());
/// assert!(info.danger.intersects(Square::D2));
/// ```
pub fn king_danger_squares(position: &Position, attacks: &AttackTable, color: Color) -> KingInfo {
    let king = position.king_square(color);
    let enemy = color.opponent();
    let blockers = position.entire_mask() ^ king;

    let mut info = KingInfo::default();
    for kind in PieceKind::all() {
        for square in position.color_piece_mask(enemy, kind) {
            let threats = attacks.attacks(square, kind, enemy, blockers);
            info.danger |= threats;

            if threats.intersects(king) {
                info.checkers |= square;
                info.intervention |= square.bitboard() | ray_between(king, square);
            }
        }
    }

    info
}

/// Is `color`'s King currently attacked?
///
/// Looks outward from the King as each capturable kind and checks whether an enemy of that kind is there.
pub fn king_in_check(position: &Position, attacks: &AttackTable, color: Color) -> bool {
    let king = position.king_square(color);
    let occupied = position.entire_mask();
    let enemies = position.color_mask(color.opponent());

    PieceKind::CAPTURABLE.into_iter().any(|kind| {
        attacks
            .captures(king, kind, color, occupied, enemies)
            .intersects(position.piece_mask(kind))
    })
}

/// Generates every legal move for the side to move on a [`Board`].
///
/// A [`MoveGen`] is built for a single position and consumed by [`MoveGen::gen`].
/// All King safety data is computed up front, in [`MoveGen::new`].
///
/// The board is borrowed mutably because en passant captures are checked by playing them and taking them back.
/// It is left exactly as it was found.
///
/// # Example
/// ```
/// # use tadpole::{AttackTable, Board, MoveGen, MoveList};
/// let attacks = AttackTable::new();
/// let mut board = Board::default();
/// let mut moves = MoveList::new();
/// MoveGen::new(&mut moves, &mut board, &attacks).gen();
/// assert_eq!(moves.len(), 20);
/// ```
pub struct MoveGen<'a> {
    moves: &'a mut MoveList,
    board: &'a mut Board,
    attacks: &'a AttackTable,

    color: Color,
    king: Square,
    friendly: Bitboard,
    enemies: Bitboard,
    occupied: Bitboard,
    ep_mask: Bitboard,

    pinned: Bitboard,
    king_info: KingInfo,
}

impl<'a> MoveGen<'a> {
    pub fn new(moves: &'a mut MoveList, board: &'a mut Board, attacks: &'a AttackTable) -> Self {
        let color = board.turn();
        let position = board.position();

        let king = position.king_square(color);
        let friendly = position.color_mask(color);
        let enemies = position.color_mask(color.opponent());
        let occupied = position.entire_mask();
        let ep_mask = Bitboard::from(board.ep_square());

        let pinned = pinned_pieces(position, attacks, color);
        let king_info = king_danger_squares(position, attacks, color);

        Self {
            moves,
            board,
            attacks,
            color,
            king,
            friendly,
            enemies,
            occupied,
            ep_mask,
            pinned,
            king_info,
        }
    }

    /// Pieces of the side to move that may not leave their pin ray.
    #[inline(always)]
    pub const fn pinned(&self) -> Bitboard {
        self.pinned
    }

    #[inline(always)]
    pub const fn king_info(&self) -> KingInfo {
        self.king_info
    }

    /// Clears the move list and fills it with every legal move.
    pub fn gen(mut self) {
        self.moves.clear();

        match self.king_info.checkers.population() {
            0 => {
                self.castling(CastleSide::King);
                self.castling(CastleSide::Queen);
                self.pawn_moves();
                for kind in PieceKind::NORMAL {
                    self.piece_captures(kind);
                }
                for kind in PieceKind::NORMAL {
                    self.piece_quiets(kind);
                }
                self.king_moves();
            }
            1 => self.escape_single_check(),
            // Only the King can escape a double check.
            _ => self.king_moves(),
        }
    }

    #[inline(always)]
    fn encode(
        &self,
        kind: MoveKind,
        source: Square,
        dest: Square,
        piece: PieceKind,
        captured: Option<PieceKind>,
        promotion: Option<PieceKind>,
    ) -> EncodedMove {
        EncodedMove::new(kind, source, dest, piece, self.color, captured, promotion)
    }

    /// The kind of the enemy piece on `square`, which must hold one.
    #[inline(always)]
    fn victim(&self, square: Square) -> PieceKind {
        match self.board.position().square_occupant(square) {
            Some((_, kind)) => kind,
            None => panic!("Expected an enemy piece on {square}"),
        }
    }

    /// Keeps `mv` only if it does not leave the King in check.
    ///
    /// En passant is tested by playing it. Everything else only needs to respect pins.
    fn push_if_legal(&mut self, mv: EncodedMove) {
        let legal = if mv.kind() == MoveKind::EnPassant {
            self.board.make_move(mv);
            let in_check = king_in_check(self.board.position(), self.attacks, self.color);
            self.board.undo_last_move();
            !in_check
        } else {
            !self.pinned.intersects(mv.source()) || ray_from(self.king, mv.source()).intersects(mv.dest())
        };

        if legal {
            self.moves.push(mv);
        }
    }

    /// Pawn captures onto `dest`, expanded into every promotion when `dest` is on a back rank.
    fn single_pawn_captures(&mut self, source: Square, dest: Square, captured: PieceKind) {
        if Bitboard::promotion_ranks().intersects(dest) {
            for promotion in PieceKind::PROMOTIONS {
                let mv = self.encode(
                    MoveKind::CapturePromotion,
                    source,
                    dest,
                    PieceKind::Pawn,
                    Some(captured),
                    Some(promotion),
                );
                self.push_if_legal(mv);
            }
        } else {
            let mv = self.encode(
                MoveKind::Capture,
                source,
                dest,
                PieceKind::Pawn,
                Some(captured),
                None,
            );
            self.push_if_legal(mv);
        }
    }

    /// Pawn pushes onto `dest`, expanded into every promotion when `dest` is on a back rank.
    fn single_pawn_quiet_moves(&mut self, source: Square, dest: Square) {
        if Bitboard::promotion_ranks().intersects(dest) {
            for promotion in PieceKind::PROMOTIONS {
                let mv = self.encode(
                    MoveKind::MovePromotion,
                    source,
                    dest,
                    PieceKind::Pawn,
                    None,
                    Some(promotion),
                );
                self.push_if_legal(mv);
            }
        } else {
            let kind = if source.index_distance(dest) == 16 {
                MoveKind::DoublePawnPush
            } else {
                MoveKind::Quiet
            };
            let mv = self.encode(kind, source, dest, PieceKind::Pawn, None, None);
            self.push_if_legal(mv);
        }
    }

    fn en_passant(&mut self, source: Square, captures: Bitboard) {
        for dest in captures & self.ep_mask {
            let mv = self.encode(MoveKind::EnPassant, source, dest, PieceKind::Pawn, None, None);
            self.push_if_legal(mv);
        }
    }

    fn pawn_moves(&mut self) {
        let pawns = self
            .board
            .position()
            .color_piece_mask(self.color, PieceKind::Pawn);

        for source in pawns {
            let captures = self.attacks.captures(
                source,
                PieceKind::Pawn,
                self.color,
                self.occupied,
                self.enemies | self.ep_mask,
            );
            for dest in captures & self.enemies {
                let captured = self.victim(dest);
                self.single_pawn_captures(source, dest, captured);
            }
            self.en_passant(source, captures);

            let pushes = self
                .attacks
                .moves(source, PieceKind::Pawn, self.color, self.occupied);
            for dest in pushes {
                self.single_pawn_quiet_moves(source, dest);
            }
        }
    }

    fn piece_captures(&mut self, kind: PieceKind) {
        let pieces = self.board.position().color_piece_mask(self.color, kind);
        for source in pieces {
            let captures =
                self.attacks
                    .captures(source, kind, self.color, self.occupied, self.enemies);
            for dest in captures {
                let captured = self.victim(dest);
                let mv = self.encode(MoveKind::Capture, source, dest, kind, Some(captured), None);
                self.push_if_legal(mv);
            }
        }
    }

    fn piece_quiets(&mut self, kind: PieceKind) {
        let pieces = self.board.position().color_piece_mask(self.color, kind);
        for source in pieces {
            let quiets = self.attacks.moves(source, kind, self.color, self.occupied);
            for dest in quiets {
                let mv = self.encode(MoveKind::Quiet, source, dest, kind, None, None);
                self.push_if_legal(mv);
            }
        }
    }

    /// With exactly one checker, non-King pieces must capture it or block it.
    fn escape_single_check(&mut self) {
        let intervention = self.king_info.intervention;

        for kind in PieceKind::NON_KING {
            let pieces = self.board.position().color_piece_mask(self.color, kind);
            let enemies = if kind == PieceKind::Pawn {
                self.enemies | self.ep_mask
            } else {
                self.enemies
            };

            for source in pieces {
                let captures = self
                    .attacks
                    .captures(source, kind, self.color, self.occupied, enemies);

                for dest in captures & self.enemies & intervention {
                    let captured = self.victim(dest);
                    if kind == PieceKind::Pawn {
                        self.single_pawn_captures(source, dest, captured);
                    } else {
                        let mv =
                            self.encode(MoveKind::Capture, source, dest, kind, Some(captured), None);
                        self.push_if_legal(mv);
                    }
                }

                // The en passant victim may be the checker, which is not the capture square.
                if kind == PieceKind::Pawn {
                    self.en_passant(source, captures);
                }
            }
        }

        for kind in PieceKind::NON_KING {
            let pieces = self.board.position().color_piece_mask(self.color, kind);
            for source in pieces {
                let blocks = self.attacks.moves(source, kind, self.color, self.occupied) & intervention;
                for dest in blocks {
                    if kind == PieceKind::Pawn {
                        self.single_pawn_quiet_moves(source, dest);
                    } else {
                        let mv = self.encode(MoveKind::Quiet, source, dest, kind, None, None);
                        self.push_if_legal(mv);
                    }
                }
            }
        }

        self.king_moves();
    }

    /// King steps onto safe squares. Pins do not apply to the King.
    fn king_moves(&mut self) {
        let targets = self
            .attacks
            .attacks(self.king, PieceKind::King, self.color, self.occupied)
            & !self.friendly
            & !self.king_info.danger;

        for dest in targets {
            let mv = if self.enemies.intersects(dest) {
                let captured = self.victim(dest);
                self.encode(MoveKind::Capture, self.king, dest, PieceKind::King, Some(captured), None)
            } else {
                self.encode(MoveKind::Quiet, self.king, dest, PieceKind::King, None, None)
            };
            self.moves.push(mv);
        }
    }

    fn castling(&mut self, side: CastleSide) {
        if !self.board.castling_rights().has(self.color, side) {
            return;
        }

        let rank = Rank::first(self.color);
        let square = |file| Square::new(file, rank);

        let (kind, rook, dest, path, transit) = match side {
            CastleSide::King => (
                MoveKind::CastleKingSide,
                square(File::H),
                square(File::G),
                square(File::F).bitboard() | square(File::G),
                square(File::F).bitboard() | square(File::G),
            ),
            CastleSide::Queen => (
                MoveKind::CastleQueenSide,
                square(File::A),
                square(File::C),
                square(File::B).bitboard() | square(File::C) | square(File::D),
                square(File::C).bitboard() | square(File::D),
            ),
        };

        // Rights imply the King and Rook are home, but a hand-written FEN may say otherwise.
        let rooks = self
            .board
            .position()
            .color_piece_mask(self.color, PieceKind::Rook);
        if self.king != square(File::E) || !rooks.intersects(rook) {
            return;
        }

        let unsafe_squares = transit | self.king;
        if self.occupied.intersects(path) || self.king_info.danger.intersects(unsafe_squares) {
            return;
        }

        let mv = self.encode(kind, self.king, dest, PieceKind::King, None, None);
        self.moves.push(mv);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_attack_table;

    fn squares(list: &[Square]) -> Bitboard {
        list.iter().copied().collect()
    }

    fn board(fen: &str) -> Board {
        let fen = if fen.split_whitespace().count() == 4 {
            format!("{fen} 0 1")
        } else {
            fen.to_string()
        };
        Board::from_fen(&fen).unwrap()
    }

    fn legal_moves(fen: &str) -> MoveList {
        board(fen).legal_moves(test_attack_table())
    }

    fn pins(placements: &str, color: Color) -> Bitboard {
        let pos = Position::from_fen_placements(placements).unwrap();
        pinned_pieces(&pos, test_attack_table(), color)
    }

    fn king_info(placements: &str, color: Color) -> KingInfo {
        let pos = Position::from_fen_placements(placements).unwrap();
        king_danger_squares(&pos, test_attack_table(), color)
    }

    #[test]
    fn test_startpos_moves() {
        let moves = legal_moves("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -");
        assert_eq!(moves.len(), 20);
        let double_pushes = moves
            .iter()
            .filter(|mv| mv.kind() == MoveKind::DoublePawnPush)
            .count();
        assert_eq!(double_pushes, 8);
    }

    #[test]
    fn test_blocked_pawns() {
        assert_eq!(legal_moves("8/8/8/3k4/8/3p4/3P4/3K4 w - -").len(), 2);
    }

    #[test]
    fn test_en_passant_discovered_check() {
        let moves = legal_moves("8/8/8/6K1/k2pP2R/8/8/8 b - e3");
        assert_eq!(moves.len(), 6);
        assert!(moves.iter().all(|mv| mv.kind() != MoveKind::EnPassant));
        assert!(moves.iter().all(|mv| mv.piece() == PieceKind::King || mv.source() == Square::D4));
    }

    #[test]
    fn test_en_passant_allowed() {
        let moves = legal_moves("8/8/8/6K1/k2pP3/8/8/8 b - e3");
        assert!(moves.iter().any(|mv| mv.kind() == MoveKind::EnPassant));
    }

    #[test]
    fn test_en_passant_captures_checker() {
        // The pawn that just double pushed gives check, and en passant removes it.
        let moves = legal_moves("8/8/8/2k5/3Pp3/8/8/7K b - d3");
        assert!(moves
            .iter()
            .any(|mv| mv.kind() == MoveKind::EnPassant && mv.dest() == Square::D3));
    }

    #[test]
    fn test_en_passant_rejected_when_check_remains() {
        // Checked by a pawn on the King's back rank, then by a bishop. Neither is the pawn that can be taken.
        for (fen, expected) in [
            ("4k3/8/8/3pP3/8/8/3p4/4K3 w - d6", 5),
            ("4k3/8/8/3pP3/1b6/8/8/4K3 w - d6", 4),
        ] {
            let moves = legal_moves(fen);
            assert_eq!(moves.len(), expected, "{fen}");
            assert!(moves.iter().all(|mv| mv.kind() != MoveKind::EnPassant), "{fen}");
            assert!(moves.iter().all(|mv| mv.piece() == PieceKind::King), "{fen}");
        }
    }

    #[test]
    fn test_castling() {
        let moves = legal_moves("4k1r1/8/8/8/8/8/8/R3K2R w KQ -");
        assert_eq!(moves.len(), 25);
        // The rook on g8 attacks g1, so only the Queen side castle is available.
        assert!(moves.iter().any(|mv| mv.kind() == MoveKind::CastleQueenSide));
        assert!(moves.iter().all(|mv| mv.kind() != MoveKind::CastleKingSide));
    }

    #[test]
    fn test_castling_blocked_or_in_check() {
        let moves = legal_moves("r3k2r/8/8/8/8/8/8/RN2K1NR w KQkq -");
        assert!(moves.iter().all(|mv| !mv.kind().is_castle()));

        let moves = legal_moves("r3k2r/8/8/8/8/8/8/R3K2R b KQkq -");
        assert_eq!(moves.iter().filter(|mv| mv.kind().is_castle()).count(), 2);

        let moves = legal_moves("4k3/8/8/8/8/8/8/R3K2R b KQ -");
        assert!(moves.iter().all(|mv| !mv.kind().is_castle()));

        let moves = legal_moves("4k3/8/8/8/8/8/4r3/R3K2R w KQ -");
        assert!(moves.iter().all(|mv| !mv.kind().is_castle()));
    }

    #[test]
    fn test_queen_side_castle_ignores_b_file_attacks() {
        // b1 is attacked but the King never crosses it.
        let moves = legal_moves("1r2k3/8/8/8/8/8/8/R3K3 w Q -");
        assert!(moves.iter().any(|mv| mv.kind() == MoveKind::CastleQueenSide));
    }

    #[test]
    fn test_promotions_expand_in_order() {
        let moves = legal_moves("1n5k/P7/8/8/8/8/8/7K w - -");
        let promotions = moves
            .iter()
            .filter(|mv| mv.kind().is_promotion())
            .collect::<Vec<_>>();
        assert_eq!(promotions.len(), 8);

        let captures = promotions
            .iter()
            .filter(|mv| mv.kind() == MoveKind::CapturePromotion)
            .map(|mv| mv.promotion().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(captures, PieceKind::PROMOTIONS);

        let pushes = promotions
            .iter()
            .filter(|mv| mv.kind() == MoveKind::MovePromotion)
            .map(|mv| mv.promotion().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(pushes, PieceKind::PROMOTIONS);
    }

    #[test]
    fn test_double_check_only_king_moves() {
        let moves = legal_moves("4k3/8/4r3/8/8/8/3p4/4K3 w - -");
        assert_eq!(moves.len(), 4);
        assert!(moves.iter().all(|mv| mv.piece() == PieceKind::King));
    }

    #[test]
    fn test_single_check_blocks_and_captures() {
        // The Queen's only way to help is blocking on e5.
        let moves = legal_moves("4r2k/8/8/8/8/8/8/Q3K3 w - -");
        let non_king = moves
            .iter()
            .filter(|mv| mv.piece() != PieceKind::King)
            .map(|mv| mv.dest())
            .collect::<Bitboard>();
        assert_eq!(non_king, Square::E5.bitboard());
    }

    #[test]
    fn test_pinned_pieces() {
        assert_eq!(
            pins("r1bqkbnr/ppp2ppp/2np4/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R", Color::Black),
            Square::C6.bitboard()
        );
        assert_eq!(
            pins("4k3/3r2r1/8/8/3Q4/8/3K2Nb/8", Color::White),
            Square::D4.bitboard()
        );
        assert_eq!(
            pins("4k3/3q2r1/8/8/3Q4/8/3K2Nb/8", Color::White),
            Square::D4.bitboard()
        );
        assert_eq!(
            pins("2k5/8/4q3/8/8/3R3B/3K4/8", Color::Black),
            Square::E6.bitboard()
        );
        assert_eq!(
            pins("2k5/8/4q3/2n5/8/2R4B/3K4/8", Color::Black),
            squares(&[Square::C5, Square::E6])
        );
        // Two friendly pieces on the ray: neither is pinned.
        assert_eq!(pins("4k3/4r3/8/4N3/4B3/8/8/4K3", Color::White), Bitboard::EMPTY_BOARD);
    }

    #[test]
    fn test_pinned_piece_moves_along_ray() {
        // The rook on e4 is pinned along the e-file and can only slide on it.
        let moves = legal_moves("4r1k1/8/8/8/4R3/8/8/4K3 w - -");
        let rook_dests = moves
            .iter()
            .filter(|mv| mv.piece() == PieceKind::Rook)
            .map(|mv| mv.dest())
            .collect::<Bitboard>();
        assert_eq!(
            rook_dests,
            squares(&[Square::E2, Square::E3, Square::E5, Square::E6, Square::E7, Square::E8])
        );
    }

    #[test]
    fn test_king_info() {
        let info = king_info("8/2kr4/8/8/8/3K4/8/8", Color::White);
        assert_eq!(
            info.danger,
            squares(&[
                Square::B8,
                Square::C8,
                Square::D8,
                Square::B7,
                Square::C7,
                Square::D7,
                Square::E7,
                Square::F7,
                Square::G7,
                Square::H7,
                Square::B6,
                Square::C6,
                Square::D6,
                Square::D5,
                Square::D4,
                Square::D3,
                Square::D2,
                Square::D1,
            ])
        );
        assert_eq!(info.checkers, Square::D7.bitboard());
        assert_eq!(
            info.intervention,
            squares(&[Square::D7, Square::D6, Square::D5, Square::D4])
        );

        let info = king_info("8/8/5k2/8/8/4K3/1Q6/8", Color::Black);
        assert_eq!(info.checkers, Square::B2.bitboard());
        assert_eq!(
            info.intervention,
            squares(&[Square::B2, Square::C3, Square::D4, Square::E5])
        );

        let info = king_info("8/8/3p4/1kn5/8/1KP5/8/8", Color::White);
        assert_eq!(info.checkers, Square::C5.bitboard());
        assert_eq!(info.intervention, Square::C5.bitboard());

        let info = king_info("3k4/1KP5/8/8/8/8/8/8", Color::Black);
        assert_eq!(info.checkers, Square::C7.bitboard());
        assert_eq!(info.intervention, Square::C7.bitboard());

        let info = king_info("8/4r3/8/6k1/2b5/8/4K3/8", Color::White);
        assert_eq!(info.checkers, squares(&[Square::C4, Square::E7]));
        assert_eq!(
            info.intervention,
            squares(&[
                Square::C4,
                Square::E7,
                Square::D3,
                Square::E3,
                Square::E4,
                Square::E5,
                Square::E6
            ])
        );
    }

    #[test]
    fn test_king_in_check() {
        let attacks = test_attack_table();
        for (placements, color, expected) in [
            ("4k3/8/8/8/8/8/8/4K2r", Color::White, true),
            ("4k3/8/8/8/8/8/3p4/4K3", Color::White, true),
            ("4k3/8/8/8/8/8/4p3/4K3", Color::White, false),
            ("4k3/3P4/8/8/8/8/8/4K3", Color::Black, true),
            ("2k5/8/8/8/8/8/8/K1R5", Color::Black, true),
            ("4k3/8/8/8/8/5n2/8/4K3", Color::White, true),
            ("4k3/8/8/1B6/8/8/8/4K3", Color::Black, true),
            ("4k3/3p4/8/1B6/8/8/8/4K3", Color::Black, false),
        ] {
            let pos = Position::from_fen_placements(placements).unwrap();
            assert_eq!(
                king_in_check(&pos, attacks, color),
                expected,
                "{placements} for {}",
                color.name()
            );
        }
    }

    #[test]
    fn test_gen_leaves_board_untouched() {
        let mut board = board("r3k2r/p2pqpb1/bn2pnp1/2pPN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq c6");
        let before = board.clone();
        let moves = board.legal_moves(test_attack_table());
        assert_eq!(board, before);
        assert!(moves.iter().any(|mv| mv.kind() == MoveKind::EnPassant));
    }

    #[test]
    fn test_gen_clears_previous_moves() {
        let mut board = Board::default();
        let mut moves = MoveList::new();
        MoveGen::new(&mut moves, &mut board, test_attack_table()).gen();
        MoveGen::new(&mut moves, &mut board, test_attack_table()).gen();
        assert_eq!(moves.len(), 20);
    }

    #[test]
    fn test_make_undo_round_trip() {
        let attacks = test_attack_table();
        for fen in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 3 17",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
            "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
        ] {
            let mut board = board(fen);
            let original = board.clone();
            for mv in board.legal_moves(attacks) {
                board.make_move(mv);
                board.undo_last_move();
                assert_eq!(board, original, "{mv:?} did not round trip on {fen}");
            }
        }
    }
}
