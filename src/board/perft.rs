/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{AttackTable, Board};

/// Count the positions (nodes) reachable from `board` in exactly `depth` plies.
///
/// This performs bulk counting, meaning that, at depth 1, it returns the number of available moves
/// rather than making each of them.
/// If you do *not* want to use bulk counting, use [`perft_generic`].
///
/// The board is walked with make/undo and is returned in the state it was given.
#[inline(always)]
pub fn perft(board: &mut Board, attacks: &AttackTable, depth: usize) -> u64 {
    perft_generic::<true, false>(board, attacks, depth)
}

/// Same as [`perft`], but also prints the number of nodes reachable after each root move.
#[inline(always)]
pub fn splitperft(board: &mut Board, attacks: &AttackTable, depth: usize) -> u64 {
    perft_generic::<true, true>(board, attacks, depth)
}

/// Generic version of [`perft`] that allows you to specify whether to perform bulk counting and splitperft.
///
/// If `BULK` is set to `true`, this will perform bulk counting.
/// If `SPLIT` is set to `true`, each root move is printed with its node count.
pub fn perft_generic<const BULK: bool, const SPLIT: bool>(
    board: &mut Board,
    attacks: &AttackTable,
    depth: usize,
) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = board.legal_moves(attacks);

    // No need to make each move just to count it.
    if BULK && !SPLIT && depth == 1 {
        return moves.len() as u64;
    }

    moves.into_iter().fold(0, |nodes, mv| {
        board.make_move(mv);
        let new_nodes = perft_generic::<BULK, false>(board, attacks, depth - 1);
        board.undo_last_move();

        if SPLIT {
            tracing::trace!(%mv, nodes = new_nodes, "root move");
            println!("{mv}: {new_nodes}");
        }

        nodes + new_nodes
    })
}
