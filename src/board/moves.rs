/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::{anyhow, bail, Result};

use super::{Board, Color, File, PieceKind, Rank, Square};

/// Maximum possible number of moves in a given chess position.
///
/// Found [here](<https://www.chessprogramming.org/Chess_Position#cite_note-4>)
pub const MAX_NUM_MOVES: usize = 218;

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_NUM_MOVES`] moves.
pub type MoveList = arrayvec::ArrayVec<EncodedMove, MAX_NUM_MOVES>;

/// The different kinds of moves that can be made during a chess game.
///
/// Each kind carries its own data once decoded. See [`DecodedMove`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum MoveKind {
    /// A single piece moves to an empty square.
    Quiet,

    /// A piece moves onto a square occupied by an opponent's piece, removing it from the board.
    Capture,

    /// A Pawn advances two squares from its starting rank.
    DoublePawnPush,

    /// The King and the Rook on the King's side slide past each other.
    CastleKingSide,

    /// The King and the Rook on the Queen's side slide past each other.
    CastleQueenSide,

    /// A Pawn captures a Pawn that just double-pushed past it.
    EnPassant,

    /// A Pawn advances onto its eighth rank and becomes another piece.
    MovePromotion,

    /// A Pawn captures onto its eighth rank and becomes another piece.
    CapturePromotion,
}

impl MoveKind {
    pub const COUNT: usize = 8;

    /// Creates a [`MoveKind`] from its bit representation.
    ///
    /// # Panics
    /// If `bits` is not in `0..8`. Encoded moves are only ever produced by this crate, so this indicates a bug.
    #[inline(always)]
    pub const fn from_bits_unchecked(bits: u8) -> Self {
        match bits {
            0 => Self::Quiet,
            1 => Self::Capture,
            2 => Self::DoublePawnPush,
            3 => Self::CastleKingSide,
            4 => Self::CastleQueenSide,
            5 => Self::EnPassant,
            6 => Self::MovePromotion,
            7 => Self::CapturePromotion,
            _ => panic!("Invalid bits for MoveKind"),
        }
    }

    #[inline(always)]
    pub const fn bits(&self) -> u8 {
        *self as u8
    }

    /// Does this kind of move remove an opponent's piece?
    #[inline(always)]
    pub const fn is_capture(&self) -> bool {
        matches!(
            self,
            Self::Capture | Self::EnPassant | Self::CapturePromotion
        )
    }

    #[inline(always)]
    pub const fn is_promotion(&self) -> bool {
        matches!(self, Self::MovePromotion | Self::CapturePromotion)
    }

    #[inline(always)]
    pub const fn is_castle(&self) -> bool {
        matches!(self, Self::CastleKingSide | Self::CastleQueenSide)
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Quiet => "Quiet",
            Self::Capture => "Capture",
            Self::DoublePawnPush => "Double Pawn Push",
            Self::CastleKingSide => "Castle (King Side)",
            Self::CastleQueenSide => "Castle (Queen Side)",
            Self::EnPassant => "En Passant",
            Self::MovePromotion => "Promotion",
            Self::CapturePromotion => "Capture and Promotion",
        }
    }
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A move packed into 32 bits, as stored in a [`MoveList`].
///
/// The bits are laid out as follows, from least significant:
/// ```text
///     000 000 000 00 000 000000 000000 000
///      |   |   |   |  |    |      |     |
///      |   |   |   |  |    |      |     +- MoveKind
///      |   |   |   |  |    |      +- Source square
///      |   |   |   |  |    +- Destination square
///      |   |   |   |  +- Moving PieceKind
///      |   |   |   +- Moving Color
///      |   |   +- Captured PieceKind, or none
///      |   +- Promoted PieceKind, or none
///      +- Unused
/// ```
///
/// Missing pieces are stored as [`PieceKind::COUNT`].
/// En passant squares are not stored at all; they are recovered from the destination square on decoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct EncodedMove(u32);

impl EncodedMove {
    const KIND_BITS: u32 = 0;
    const SRC_BITS: u32 = 3;
    const DST_BITS: u32 = 9;
    const PIECE_BITS: u32 = 15;
    const COLOR_BITS: u32 = 18;
    const CAPTURED_BITS: u32 = 20;
    const PROMOTED_BITS: u32 = 23;

    const KIND_MASK: u32 = 0b111;
    const SQUARE_MASK: u32 = 0b111111;
    const PIECE_MASK: u32 = 0b111;
    const COLOR_MASK: u32 = 0b11;

    /// Value of a piece field that holds no piece.
    const NO_PIECE: u32 = PieceKind::COUNT as u32;

    /// Packs every field of a move.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{EncodedMove, MoveKind, Square, PieceKind, Color};
    /// let mv = EncodedMove::new(MoveKind::Quiet, Square::G1, Square::F3, PieceKind::Knight, Color::White, None, None);
    /// assert_eq!(mv.source(), Square::G1);
    /// assert_eq!(mv.dest(), Square::F3);
    /// assert_eq!(mv.to_string(), "g1f3");
    /// ```
    #[inline(always)]
    pub const fn new(
        kind: MoveKind,
        source: Square,
        dest: Square,
        piece: PieceKind,
        color: Color,
        captured: Option<PieceKind>,
        promotion: Option<PieceKind>,
    ) -> Self {
        let captured = match captured {
            Some(kind) => kind.bits() as u32,
            None => Self::NO_PIECE,
        };
        let promotion = match promotion {
            Some(kind) => kind.bits() as u32,
            None => Self::NO_PIECE,
        };

        Self(
            (kind.bits() as u32) << Self::KIND_BITS
                | (source.inner() as u32) << Self::SRC_BITS
                | (dest.inner() as u32) << Self::DST_BITS
                | (piece.bits() as u32) << Self::PIECE_BITS
                | (color.bits() as u32) << Self::COLOR_BITS
                | captured << Self::CAPTURED_BITS
                | promotion << Self::PROMOTED_BITS,
        )
    }

    /// The raw packed bits.
    #[inline(always)]
    pub const fn inner(&self) -> u32 {
        self.0
    }

    #[inline(always)]
    pub const fn kind(&self) -> MoveKind {
        MoveKind::from_bits_unchecked(((self.0 >> Self::KIND_BITS) & Self::KIND_MASK) as u8)
    }

    #[inline(always)]
    pub const fn source(&self) -> Square {
        Square::from_index_unchecked(((self.0 >> Self::SRC_BITS) & Self::SQUARE_MASK) as usize)
    }

    #[inline(always)]
    pub const fn dest(&self) -> Square {
        Square::from_index_unchecked(((self.0 >> Self::DST_BITS) & Self::SQUARE_MASK) as usize)
    }

    #[inline(always)]
    pub const fn piece(&self) -> PieceKind {
        PieceKind::from_bits_unchecked(((self.0 >> Self::PIECE_BITS) & Self::PIECE_MASK) as u8)
    }

    #[inline(always)]
    pub const fn color(&self) -> Color {
        Color::from_bits_unchecked(((self.0 >> Self::COLOR_BITS) & Self::COLOR_MASK) as u8)
    }

    #[inline(always)]
    pub const fn captured(&self) -> Option<PieceKind> {
        Self::optional_piece((self.0 >> Self::CAPTURED_BITS) & Self::PIECE_MASK)
    }

    #[inline(always)]
    pub const fn promotion(&self) -> Option<PieceKind> {
        Self::optional_piece((self.0 >> Self::PROMOTED_BITS) & Self::PIECE_MASK)
    }

    #[inline(always)]
    const fn optional_piece(bits: u32) -> Option<PieceKind> {
        if bits == Self::NO_PIECE {
            None
        } else {
            Some(PieceKind::from_bits_unchecked(bits as u8))
        }
    }

    /// Unpacks this move into the form used to apply and reverse it.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{EncodedMove, DecodedMove, MoveKind, Square, PieceKind, Color};
    /// let mv = EncodedMove::new(MoveKind::DoublePawnPush, Square::C7, Square::C5, PieceKind::Pawn, Color::Black, None, None);
    /// let DecodedMove::DoublePawnPush { ep_square, .. } = mv.decode() else { panic!() };
    /// assert_eq!(ep_square, Square::C6);
    /// ```
    pub const fn decode(self) -> DecodedMove {
        let common = MoveCommon {
            source: self.source(),
            dest: self.dest(),
            piece: self.piece(),
            color: self.color(),
        };

        match self.kind() {
            MoveKind::Quiet => DecodedMove::Quiet(common),
            MoveKind::Capture => DecodedMove::Capture {
                common,
                captured: self.captured_unchecked(),
            },
            MoveKind::DoublePawnPush => {
                // The pushed-over square sits between source and destination.
                let ep_square = if common.dest.rank().is(&Rank::FOUR) {
                    common.dest.south_unchecked()
                } else {
                    common.dest.north_unchecked()
                };
                DecodedMove::DoublePawnPush { common, ep_square }
            }
            MoveKind::CastleKingSide => DecodedMove::CastleKingSide(common),
            MoveKind::CastleQueenSide => DecodedMove::CastleQueenSide(common),
            MoveKind::EnPassant => {
                // The victim is one rank behind the destination, from the capturer's point of view.
                let pawn_square = if common.dest.rank().is(&Rank::THREE) {
                    common.dest.north_unchecked()
                } else {
                    common.dest.south_unchecked()
                };
                DecodedMove::EnPassant {
                    common,
                    pawn_square,
                }
            }
            MoveKind::MovePromotion => DecodedMove::MovePromotion {
                common,
                promotion: self.promotion_unchecked(),
            },
            MoveKind::CapturePromotion => DecodedMove::CapturePromotion {
                common,
                captured: self.captured_unchecked(),
                promotion: self.promotion_unchecked(),
            },
        }
    }

    #[inline(always)]
    const fn captured_unchecked(&self) -> PieceKind {
        match self.captured() {
            Some(kind) => kind,
            None => panic!("Capturing move was encoded without a captured piece"),
        }
    }

    #[inline(always)]
    const fn promotion_unchecked(&self) -> PieceKind {
        match self.promotion() {
            Some(kind) => kind,
            None => panic!("Promoting move was encoded without a promotion piece"),
        }
    }

    /// Formats this move in UCI notation, such as `e2e4` or `b7a8q`.
    ///
    /// Castling is written as the King's two-square step.
    pub fn to_uci(&self) -> String {
        if let Some(promotion) = self.promotion() {
            format!("{}{}{}", self.source(), self.dest(), promotion.to_uci())
        } else {
            format!("{}{}", self.source(), self.dest())
        }
    }
}

impl fmt::Display for EncodedMove {
    /// An [`EncodedMove`] is displayed in its UCI format.
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl fmt::Debug for EncodedMove {
    /// Debug formatting displays the UCI notation, followed by the moving piece and [`MoveKind`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {}, {})",
            self.to_uci(),
            self.color(),
            self.piece(),
            self.kind()
        )
    }
}

impl From<DecodedMove> for EncodedMove {
    #[inline(always)]
    fn from(value: DecodedMove) -> Self {
        value.encode()
    }
}

impl<T: AsRef<str>> PartialEq<T> for EncodedMove {
    #[inline(always)]
    fn eq(&self, other: &T) -> bool {
        self.to_uci().eq(other.as_ref())
    }
}

/// Data shared by every kind of move.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct MoveCommon {
    pub source: Square,
    pub dest: Square,
    pub piece: PieceKind,
    pub color: Color,
}

impl MoveCommon {
    #[inline(always)]
    pub const fn new(source: Square, dest: Square, piece: PieceKind, color: Color) -> Self {
        Self {
            source,
            dest,
            piece,
            color,
        }
    }
}

/// A move, unpacked into exactly the data needed to apply and reverse it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum DecodedMove {
    Quiet(MoveCommon),
    Capture {
        common: MoveCommon,
        captured: PieceKind,
    },
    DoublePawnPush {
        common: MoveCommon,
        /// The square the Pawn passed over.
        ep_square: Square,
    },
    CastleKingSide(MoveCommon),
    CastleQueenSide(MoveCommon),
    EnPassant {
        common: MoveCommon,
        /// The square of the Pawn being captured.
        pawn_square: Square,
    },
    MovePromotion {
        common: MoveCommon,
        promotion: PieceKind,
    },
    CapturePromotion {
        common: MoveCommon,
        captured: PieceKind,
        promotion: PieceKind,
    },
}

impl DecodedMove {
    #[inline(always)]
    pub const fn common(&self) -> &MoveCommon {
        match self {
            Self::Quiet(common)
            | Self::CastleKingSide(common)
            | Self::CastleQueenSide(common)
            | Self::Capture { common, .. }
            | Self::DoublePawnPush { common, .. }
            | Self::EnPassant { common, .. }
            | Self::MovePromotion { common, .. }
            | Self::CapturePromotion { common, .. } => common,
        }
    }

    #[inline(always)]
    pub const fn kind(&self) -> MoveKind {
        match self {
            Self::Quiet(_) => MoveKind::Quiet,
            Self::Capture { .. } => MoveKind::Capture,
            Self::DoublePawnPush { .. } => MoveKind::DoublePawnPush,
            Self::CastleKingSide(_) => MoveKind::CastleKingSide,
            Self::CastleQueenSide(_) => MoveKind::CastleQueenSide,
            Self::EnPassant { .. } => MoveKind::EnPassant,
            Self::MovePromotion { .. } => MoveKind::MovePromotion,
            Self::CapturePromotion { .. } => MoveKind::CapturePromotion,
        }
    }

    /// Packs this move. En passant squares are dropped, since decoding recovers them.
    pub const fn encode(&self) -> EncodedMove {
        let (captured, promotion) = match *self {
            Self::Capture { captured, .. } => (Some(captured), None),
            Self::MovePromotion { promotion, .. } => (None, Some(promotion)),
            Self::CapturePromotion {
                captured,
                promotion,
                ..
            } => (Some(captured), Some(promotion)),
            _ => (None, None),
        };

        let common = self.common();
        EncodedMove::new(
            self.kind(),
            common.source,
            common.dest,
            common.piece,
            common.color,
            captured,
            promotion,
        )
    }
}

/// Parses a move in UCI notation (`e2e4`, `e7e8q`, `e1g1`) in the context of `board`.
///
/// The text is matched case-insensitively. This only checks that the move is well-formed for the pieces involved,
/// not that it is legal. See [`Board::make_uci_move`] for a version that checks legality.
///
/// # Example
/// ```
/// # use tadpole::{parse_uci_move, Board, MoveKind, Square};
/// let board = Board::default();
/// let mv = parse_uci_move(&board, "e2e4").unwrap();
/// assert_eq!(mv.kind(), MoveKind::DoublePawnPush);
/// assert_eq!(mv.dest(), Square::E4);
/// ```
pub fn parse_uci_move(board: &Board, text: &str) -> Result<EncodedMove> {
    let text = text.trim().to_ascii_lowercase();
    if !text.is_ascii() || !(text.len() == 4 || text.len() == 5) {
        bail!("UCI moves must be 4 or 5 characters long. Got {text:?}");
    }

    let source = Square::from_uci(&text[0..2])?;
    let dest = Square::from_uci(&text[2..4])?;
    let promotion = text[4..].chars().next().map(PieceKind::from_uci).transpose()?;

    let position = board.position();
    let (color, piece) = position
        .square_occupant(source)
        .ok_or(anyhow!("No piece found at {source} when parsing {text:?}"))?;

    let victim = position.square_occupant(dest);
    if let Some((victim_color, victim_kind)) = victim {
        if victim_color == color {
            bail!(
                "Cannot move {} {} from {source} onto its own {} at {dest}",
                color.name(),
                piece.name(),
                victim_kind.name()
            );
        }
    }
    let captured = victim.map(|(_, kind)| kind);

    let common = MoveCommon::new(source, dest, piece, color);

    if let Some(promotion) = promotion {
        if piece != PieceKind::Pawn {
            bail!("Only pawns can promote, but {text:?} moves a {}", piece.name());
        }
        if !PieceKind::PROMOTIONS.contains(&promotion) {
            bail!("Cannot promote to a {} in {text:?}", promotion.name());
        }
        if !dest.rank().is(&Rank::eighth(color)) {
            bail!("{} pawns cannot promote on rank {}", color.name(), dest.rank());
        }

        let decoded = match captured {
            Some(captured) => DecodedMove::CapturePromotion {
                common,
                captured,
                promotion,
            },
            None => DecodedMove::MovePromotion { common, promotion },
        };
        return Ok(decoded.encode());
    }

    if piece == PieceKind::Pawn && dest.rank().is(&Rank::eighth(color)) {
        bail!("{text:?} moves a pawn onto its last rank without naming a promotion");
    }

    let decoded = if piece == PieceKind::Pawn && Some(dest) == board.ep_square() {
        let pawn_square = if dest.rank().is(&Rank::THREE) {
            dest.north_unchecked()
        } else {
            dest.south_unchecked()
        };
        DecodedMove::EnPassant {
            common,
            pawn_square,
        }
    } else if let Some(captured) = captured {
        DecodedMove::Capture { common, captured }
    } else {
        match piece {
            PieceKind::Pawn => match source.index_distance(dest) {
                8 => DecodedMove::Quiet(common),
                16 => DecodedMove::DoublePawnPush {
                    common,
                    ep_square: Square::from_index_unchecked((source.index() + dest.index()) / 2),
                },
                _ => bail!("{text:?} is not a valid pawn push"),
            },
            PieceKind::King
                if source == Square::new(File::E, Rank::first(color))
                    && dest.rank() == source.rank() =>
            {
                match dest.file() {
                    File::G => DecodedMove::CastleKingSide(common),
                    File::C => DecodedMove::CastleQueenSide(common),
                    _ => DecodedMove::Quiet(common),
                }
            }
            _ => DecodedMove::Quiet(common),
        }
    };

    Ok(decoded.encode())
}
