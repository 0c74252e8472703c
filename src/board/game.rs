/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Result};

use super::{
    parse_uci_move, AttackTable, CastlingRights, Color, DecodedMove, EncodedMove, MoveGen,
    MoveList, PieceKind, Position, Square,
};

/// Number of plies the history stack can hold before it first reallocates.
const HISTORY_CAPACITY: usize = 512;

/// Everything needed to take back one ply, besides the move itself.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct SavedMove {
    pub mv: EncodedMove,
    pub castling: CastlingRights,
    pub quiet_half_moves: u8,
    pub en_passant: Option<Square>,
    pub fullmove_count: u16,
}

/// A game of chess: the [`Position`] of the pieces plus whose turn it is, castling rights, the en passant square, and move counters.
///
/// Every move made is recorded, so it can be taken back with [`Board::undo_last_move`].
///
/// The basic methods you're probably looking for are [`Board::from_fen`], [`Board::make_move`], and [`Board::legal_moves`].
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    position: Position,
    turn: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,

    /// Plies since the last capture or pawn move.
    quiet_half_moves: u8,

    /// Starts at 1 and increments after Black moves.
    fullmove_count: u16,

    history: Vec<SavedMove>,
}

impl Board {
    /// Creates a new [`Board`] from already-validated parts.
    pub fn new(
        position: Position,
        turn: Color,
        castling: CastlingRights,
        en_passant: Option<Square>,
        quiet_half_moves: u8,
        fullmove_count: u16,
    ) -> Self {
        Self {
            position,
            turn,
            castling,
            en_passant,
            quiet_half_moves,
            fullmove_count,
            history: Vec::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Creates a new [`Board`] from the provided FEN string.
    ///
    /// All six fields are required.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{Board, Color, Square};
    /// let board = Board::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
    /// assert_eq!(board.turn(), Color::Black);
    /// assert_eq!(board.ep_square(), Some(Square::E3));
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let fields = fen.split_whitespace().collect::<Vec<_>>();
        let [placements, turn, castling, en_passant, halfmove, fullmove] = fields[..] else {
            bail!(
                "FEN string must have exactly 6 fields. Got {} in {fen:?}",
                fields.len()
            );
        };

        let position = Position::from_fen_placements(placements)?;
        for color in Color::all() {
            let kings = position.color_piece_mask(color, PieceKind::King).population();
            if kings != 1 {
                bail!("{} must have exactly one King. Got {kings}", color.name());
            }
        }

        let mut turn_chars = turn.chars();
        let turn = match (turn_chars.next(), turn_chars.next()) {
            (Some(c), None) => Color::from_uci(c)?,
            _ => bail!("FEN side to move must be `w` or `b`. Got {turn:?}"),
        };

        let castling = CastlingRights::from_fen(castling)?;

        let en_passant = match en_passant {
            "-" => None,
            square => Some(Square::from_uci(square)?),
        };

        let quiet_half_moves = halfmove.parse().or(Err(anyhow!(
            "FEN string must have valid halfmove counter. Got {halfmove:?}"
        )))?;

        let fullmove_count = fullmove.parse().or(Err(anyhow!(
            "FEN string must have valid fullmove counter. Got {fullmove:?}"
        )))?;

        Ok(Self::new(
            position,
            turn,
            castling,
            en_passant,
            quiet_half_moves,
            fullmove_count,
        ))
    }

    /// Generates a [FEN](https://www.chess.com/terms/fen-chess) string of this [`Board`].
    pub fn to_fen(&self) -> String {
        let en_passant = self
            .en_passant
            .map(|square| square.to_uci())
            .unwrap_or_else(|| String::from("-"));

        format!(
            "{} {} {} {en_passant} {} {}",
            self.position.to_fen_placements(),
            self.turn,
            self.castling,
            self.quiet_half_moves,
            self.fullmove_count
        )
    }

    #[inline(always)]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    /// The side to move.
    #[inline(always)]
    pub const fn turn(&self) -> Color {
        self.turn
    }

    #[inline(always)]
    pub const fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    /// The square a Pawn just passed over with a double push, if the last move was one.
    #[inline(always)]
    pub const fn ep_square(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline(always)]
    pub const fn quiet_half_moves(&self) -> u8 {
        self.quiet_half_moves
    }

    #[inline(always)]
    pub const fn fullmove_count(&self) -> u16 {
        self.fullmove_count
    }

    /// Every move made so far, oldest first.
    #[inline(always)]
    pub fn history(&self) -> &[SavedMove] {
        &self.history
    }

    /// Plays `mv`, which must be legal for the side to move.
    pub fn make_move(&mut self, mv: EncodedMove) {
        self.history.push(SavedMove {
            mv,
            castling: self.castling,
            quiet_half_moves: self.quiet_half_moves,
            en_passant: self.en_passant,
            fullmove_count: self.fullmove_count,
        });

        let decoded = mv.decode();
        self.position.apply_move(&decoded);
        self.en_passant = None;

        match decoded {
            DecodedMove::Quiet(common) if common.piece != PieceKind::Pawn => {
                self.quiet_half_moves = self.quiet_half_moves.saturating_add(1)
            }
            DecodedMove::CastleKingSide(_) | DecodedMove::CastleQueenSide(_) => {
                self.quiet_half_moves = self.quiet_half_moves.saturating_add(1)
            }
            DecodedMove::DoublePawnPush { ep_square, .. } => {
                self.quiet_half_moves = 0;
                self.en_passant = Some(ep_square);
            }
            _ => self.quiet_half_moves = 0,
        }

        self.castling.update(&decoded);

        self.fullmove_count = self.fullmove_count.saturating_add(self.turn.bits() as u16);
        self.turn = self.turn.opponent();
    }

    /// Takes back the most recent move.
    ///
    /// # Panics
    /// If no moves have been made.
    pub fn undo_last_move(&mut self) {
        let Some(saved) = self.history.pop() else {
            panic!("Cannot undo a move on a board with no history");
        };

        self.castling = saved.castling;
        self.quiet_half_moves = saved.quiet_half_moves;
        self.en_passant = saved.en_passant;

        self.fullmove_count = saved.fullmove_count;
        self.turn = self.turn.opponent();

        self.position.reverse_move(&saved.mv.decode());
    }

    /// Generates every legal move for the side to move.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{AttackTable, Board};
    /// let attacks = AttackTable::new();
    /// let mut board = Board::default();
    /// assert_eq!(board.legal_moves(&attacks).len(), 20);
    /// ```
    pub fn legal_moves(&mut self, attacks: &AttackTable) -> MoveList {
        let mut moves = MoveList::new();
        MoveGen::new(&mut moves, self, attacks).gen();
        moves
    }

    /// Parses `text` as a UCI move and plays it, if it is legal.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{AttackTable, Board};
    /// let attacks = AttackTable::new();
    /// let mut board = Board::default();
    /// board.make_uci_move("e2e4", &attacks).unwrap();
    /// assert!(board.make_uci_move("e2e4", &attacks).is_err());
    /// assert_eq!(board.to_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
    /// ```
    pub fn make_uci_move(&mut self, text: &str, attacks: &AttackTable) -> Result<EncodedMove> {
        let mv = parse_uci_move(self, text)?;
        if !self.legal_moves(attacks).contains(&mv) {
            bail!("{text:?} is not a legal move in {}", self.to_fen());
        }
        self.make_move(mv);
        Ok(mv)
    }
}

impl Default for Board {
    /// The standard starting position.
    fn default() -> Self {
        Self::new(
            Position::starting(),
            Color::White,
            CastlingRights::ALL,
            None,
            0,
            1,
        )
    }
}

impl FromStr for Board {
    type Err = anyhow::Error;
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl fmt::Display for Board {
    /// A [`Board`] is displayed as its FEN string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.position)?;
        writeln!(f, "FEN: {}", self.to_fen())?;
        write!(f, "Plies recorded: {}", self.history.len())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{test_attack_table, FEN_KIWIPETE, FEN_STARTPOS};

    #[test]
    fn test_valid_fens() {
        let board = Board::from_fen(FEN_STARTPOS).unwrap();
        assert_eq!(board, Board::default());
        assert_eq!(board.fullmove_count(), 1);
        assert_eq!(board.quiet_half_moves(), 0);
        assert_eq!(board.to_fen(), FEN_STARTPOS);

        let board = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
            .parse::<Board>()
            .unwrap();
        assert_eq!(board.ep_square(), Some(Square::E3));

        let board = Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 5 4").unwrap();
        assert_eq!(board.fullmove_count(), 4);
        assert_eq!(board.quiet_half_moves(), 5);

        let board = Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b kq - 7 5").unwrap();
        assert_eq!(board.castling_rights().to_fen(), "kq");

        assert_eq!(Board::from_fen(FEN_KIWIPETE).unwrap().to_fen(), FEN_KIWIPETE);
    }

    #[test]
    fn test_invalid_fens() {
        for fen in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - 8 6",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPyPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR - KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR white KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkqK - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq K3 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 256 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 -1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 65536",
            "rnbq1bnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQ - 0 1",
        ] {
            assert!(Board::from_fen(fen).is_err(), "{fen} should be invalid");
        }
    }

    #[test]
    fn test_make_move_updates_state() {
        let mut board = Board::default();
        let e4 = parse_uci_move(&board, "e2e4").unwrap();
        board.make_move(e4);
        assert_eq!(board.turn(), Color::Black);
        assert_eq!(board.ep_square(), Some(Square::E3));
        assert_eq!(board.fullmove_count(), 1);

        let nf6 = parse_uci_move(&board, "g8f6").unwrap();
        board.make_move(nf6);
        assert_eq!(board.ep_square(), None);
        assert_eq!(board.quiet_half_moves(), 1);
        assert_eq!(board.fullmove_count(), 2);
        assert_eq!(board.turn(), Color::White);

        let ke2 = parse_uci_move(&board, "e1e2").unwrap();
        board.make_move(ke2);
        assert_eq!(board.quiet_half_moves(), 2);
        assert_eq!(board.castling_rights().to_fen(), "kq");
        assert_eq!(
            board.to_fen(),
            "rnbqkb1r/pppppppp/5n2/8/4P3/8/PPPPKPPP/RNBQ1BNR b kq - 2 2"
        );

        let nxe4 = parse_uci_move(&board, "f6e4").unwrap();
        board.make_move(nxe4);
        assert_eq!(board.quiet_half_moves(), 0);
        assert_eq!(board.fullmove_count(), 3);
        assert_eq!(board.history().len(), 4);
    }

    #[test]
    fn test_undo_restores_everything() {
        let mut board = Board::from_fen(FEN_KIWIPETE).unwrap();
        let original = board.clone();

        for uci in ["e1g1", "h3g2", "a2a4", "b4a3", "e5f7", "g2f1q"] {
            board.make_move(parse_uci_move(&board, uci).unwrap());
        }
        assert_eq!(board.history().len(), 6);

        for _ in 0..6 {
            board.undo_last_move();
        }
        assert_eq!(board, original);
    }

    #[test]
    fn test_fullmove_count_saturates() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 65535").unwrap();
        let original = board.clone();

        board.make_move(parse_uci_move(&board, "e8d8").unwrap());
        assert_eq!(board.fullmove_count(), u16::MAX);

        board.undo_last_move();
        assert_eq!(board, original);
    }

    #[test]
    #[should_panic]
    fn test_undo_with_empty_history_panics() {
        Board::default().undo_last_move();
    }

    #[test]
    fn test_make_uci_move_checks_legality() {
        let attacks = test_attack_table();
        let mut board = Board::from_fen("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1").unwrap();
        for uci in ["e1f1", "e1d1", "e1e2"] {
            assert!(board.make_uci_move(uci, attacks).is_ok(), "{uci} should be legal");
            board.undo_last_move();
        }
        for uci in ["e1d2", "e1f2", "e1e3"] {
            assert!(board.make_uci_move(uci, attacks).is_err(), "{uci} should be illegal");
        }
        assert!(board.history().is_empty());
    }
}
