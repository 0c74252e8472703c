/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Bitboard, Color, Rank, Square, Table};

/// One of the eight directions a sliding piece can travel in.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Self; 8] = [
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
    ];

    /// Directions a Rook travels in.
    pub const ORTHOGONAL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Directions a Bishop travels in.
    pub const DIAGONAL: [Self; 4] = [
        Self::NorthEast,
        Self::SouthEast,
        Self::SouthWest,
        Self::NorthWest,
    ];

    /// Shifts every bit of `bitboard` one step in this direction, discarding bits that would leave the board.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{Direction, Square};
    /// let e4 = Square::E4.bitboard();
    /// assert_eq!(Direction::NorthWest.step(e4), Square::D5.bitboard());
    /// assert!(Direction::East.step(Square::H4.bitboard()).is_empty());
    /// ```
    #[inline(always)]
    pub const fn step(self, bitboard: Bitboard) -> Bitboard {
        match self {
            Self::North => bitboard.north(),
            Self::NorthEast => bitboard.northeast(),
            Self::East => bitboard.east(),
            Self::SouthEast => bitboard.southeast(),
            Self::South => bitboard.south(),
            Self::SouthWest => bitboard.southwest(),
            Self::West => bitboard.west(),
            Self::NorthWest => bitboard.northwest(),
        }
    }

    /// Every square reachable from `square` by repeatedly stepping in this direction, up to the edge of the board.
    ///
    /// `square` itself is not included.
    pub const fn ray(self, square: Square) -> Bitboard {
        let mut ray = Bitboard::EMPTY_BOARD;
        let mut current = self.step(square.bitboard());
        while current.is_nonempty() {
            ray = ray.or(current);
            current = self.step(current);
        }
        ray
    }
}

/// Attack masks for a Knight on each square.
pub const KNIGHT_ATTACKS: Table<Bitboard> = generate_knight_attacks();

/// Attack masks for a King on each square.
pub const KING_ATTACKS: Table<Bitboard> = generate_king_attacks();

/// Diagonal capture masks for a Pawn of each color on each square.
pub const PAWN_ATTACKS: [Table<Bitboard>; Color::COUNT] = [
    generate_pawn_attacks(Color::White),
    generate_pawn_attacks(Color::Black),
];

/// Push masks for a Pawn of each color on each square, including the double push from the starting rank.
///
/// These ignore occupancy entirely. See [`crate::AttackTable::moves`] for the blocker-aware lookup.
pub const PAWN_MOVES: [Table<Bitboard>; Color::COUNT] = [
    generate_pawn_moves(Color::White),
    generate_pawn_moves(Color::Black),
];

/// Indexed by `[from][to]`: the full ray leaving `from` in the direction of `to`, out to the edge of the board.
///
/// Neither `from` nor squares behind it are included. Empty if the squares do not share a rank, file, or diagonal.
const RAY_FROM: [[Bitboard; Square::COUNT]; Square::COUNT] = generate_rays_from();

const fn generate_knight_attacks() -> Table<Bitboard> {
    let mut attacks = [Bitboard::EMPTY_BOARD; Square::COUNT];
    let mut i = 0;
    while i < Square::COUNT {
        let bb = Square::from_index_unchecked(i).bitboard();
        attacks[i] = bb
            .north_north_east()
            .or(bb.north_north_west())
            .or(bb.south_south_east())
            .or(bb.south_south_west())
            .or(bb.north_east_east())
            .or(bb.north_west_west())
            .or(bb.south_east_east())
            .or(bb.south_west_west());
        i += 1;
    }
    Table::new(attacks)
}

const fn generate_king_attacks() -> Table<Bitboard> {
    let mut attacks = [Bitboard::EMPTY_BOARD; Square::COUNT];
    let mut i = 0;
    while i < Square::COUNT {
        let bb = Square::from_index_unchecked(i).bitboard();
        let mut j = 0;
        while j < Direction::ALL.len() {
            attacks[i] = attacks[i].or(Direction::ALL[j].step(bb));
            j += 1;
        }
        i += 1;
    }
    Table::new(attacks)
}

// Filled for every square, since the King looks up its pawn attackers from its own square.
const fn generate_pawn_attacks(color: Color) -> Table<Bitboard> {
    let mut attacks = [Bitboard::EMPTY_BOARD; Square::COUNT];
    let mut i = 0;
    while i < Square::COUNT {
        let bb = Square::from_index_unchecked(i).bitboard();
        attacks[i] = match color {
            Color::White => bb.northeast().or(bb.northwest()),
            Color::Black => bb.southeast().or(bb.southwest()),
        };
        i += 1;
    }
    Table::new(attacks)
}

const fn generate_pawn_moves(color: Color) -> Table<Bitboard> {
    let mut moves = [Bitboard::EMPTY_BOARD; Square::COUNT];
    let start = Rank::second(color);
    let mut i = Square::A2.index();
    while i <= Square::H7.index() {
        let square = Square::from_index_unchecked(i);
        let single = square.bitboard().forward(color);
        moves[i] = if square.rank().is(&start) {
            single.or(single.forward(color))
        } else {
            single
        };
        i += 1;
    }
    Table::new(moves)
}

const fn generate_rays_from() -> [[Bitboard; Square::COUNT]; Square::COUNT] {
    let mut rays = [[Bitboard::EMPTY_BOARD; Square::COUNT]; Square::COUNT];
    let mut i = 0;
    while i < Square::COUNT {
        let from = Square::from_index_unchecked(i);
        let mut j = 0;
        while j < Direction::ALL.len() {
            let ray = Direction::ALL[j].ray(from);
            let mut bits = ray.inner();
            while bits != 0 {
                rays[i][bits.trailing_zeros() as usize] = ray;
                bits &= bits - 1;
            }
            j += 1;
        }
        i += 1;
    }
    rays
}

/// The ray leaving `from` through `to`, continuing to the edge of the board.
///
/// # Example
/// ```
/// # use tadpole::{ray_from, Square, Bitboard};
/// let ray = ray_from(Square::B2, Square::D4);
/// assert!(ray.intersects(Square::H8));
/// assert!(!ray.intersects(Square::A1));
/// assert_eq!(ray_from(Square::B2, Square::C4), Bitboard::EMPTY_BOARD);
/// ```
#[inline(always)]
pub const fn ray_from(from: Square, to: Square) -> Bitboard {
    RAY_FROM[from.index()][to.index()]
}

/// The squares strictly between `a` and `b`, if they are aligned.
///
/// # Example
/// ```
/// # use tadpole::{ray_between, Square};
/// let between = ray_between(Square::D1, Square::D5);
/// assert_eq!(between, Square::D2.bitboard() | Square::D3 | Square::D4);
/// assert!(ray_between(Square::D1, Square::D2).is_empty());
/// ```
#[inline(always)]
pub const fn ray_between(a: Square, b: Square) -> Bitboard {
    ray_from(a, b).and(ray_from(b, a))
}
