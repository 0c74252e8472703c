/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Attack lookups for every kind of piece.
mod attacks;

/// Bitboard representation of a chess board.
mod bitboard;

/// Castling rights and their bookkeeping.
mod castling;

/// A full game state, with move history.
mod game;

/// Magic bitboards for sliding pieces.
mod magic;

/// Legal move generation.
mod movegen;

/// Move encoding, decoding, and UCI parsing.
mod moves;

/// Performance testing of move generation.
mod perft;

/// Pieces, piece kinds, and colors.
mod piece;

/// Piece placements on the board.
mod position;

/// Pseudo-random number generation.
mod prng;

/// Squares, ranks, and files.
mod square;

/// Square-indexed lookup tables.
mod table;

/// Compile-time attack and ray tables.
mod tables;

pub use attacks::*;
pub use bitboard::*;
pub use castling::*;
pub use game::*;
pub use magic::*;
pub use movegen::*;
pub use moves::*;
pub use perft::*;
pub use piece::*;
pub use position::*;
pub use prng::*;
pub use square::*;
pub use table::*;
pub use tables::*;
