/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::{perft_generic, AttackTable, Board, FEN_STARTPOS};

/// Legal move generation and perft for chess positions.
#[derive(Debug, Clone, Parser)]
#[command(version, about, rename_all = "lower")]
pub struct Cli {
    /// Seed for the magic number search.
    ///
    /// Every seed produces correct tables; only construction time changes.
    #[arg(short, long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// A single action performed on a position.
#[derive(Debug, Clone, Subcommand)]
#[command(rename_all = "lower")]
pub enum Command {
    /// Count the positions reachable at the supplied depth, printing the total node count.
    Perft {
        depth: usize,

        /// FEN of the position to start from.
        #[arg(default_value = FEN_STARTPOS)]
        fen: String,

        /// Moves, in UCI notation, to play before counting.
        moves: Vec<String>,
    },

    /// Same as `perft`, but also prints the node count after each root move.
    #[command(alias = "sperft")]
    Splitperft {
        depth: usize,

        /// FEN of the position to start from.
        #[arg(default_value = FEN_STARTPOS)]
        fen: String,

        /// Moves, in UCI notation, to play before counting.
        moves: Vec<String>,
    },

    /// List every legal move in the position.
    Moves {
        /// FEN of the position.
        #[arg(default_value = FEN_STARTPOS)]
        fen: String,

        /// Moves, in UCI notation, to play before listing.
        moves: Vec<String>,

        /// If set, moves will be printed using their debug formatter, which displays what kind of move it is.
        #[arg(short, long, default_value = "false")]
        debug: bool,

        /// If set, moves will be sorted in alphabetical order.
        #[arg(long, default_value = "false")]
        sort: bool,
    },
}

impl Cli {
    /// Build the attack tables and run the requested command.
    pub fn run(self) -> Result<()> {
        let attacks = match self.seed {
            Some(seed) => AttackTable::try_with_seed(seed)?,
            None => AttackTable::try_new()?,
        };

        match self.command {
            Command::Perft { depth, fen, moves } => {
                let mut board = setup_board(&fen, &moves, &attacks)?;
                print_perft::<false>(&mut board, &attacks, depth);
            }

            Command::Splitperft { depth, fen, moves } => {
                let mut board = setup_board(&fen, &moves, &attacks)?;
                print_perft::<true>(&mut board, &attacks, depth);
            }

            Command::Moves {
                fen,
                moves,
                debug,
                sort,
            } => {
                let mut board = setup_board(&fen, &moves, &attacks)?;
                let mut legal = board.legal_moves(&attacks).into_iter().collect::<Vec<_>>();
                if sort {
                    legal.sort_by_key(|mv| mv.to_uci());
                }

                // If there are none, print "(none)"
                let moves_string = if legal.is_empty() {
                    String::from("(none)")
                } else if debug {
                    legal
                        .iter()
                        .map(|mv| format!("{mv:?}"))
                        .collect::<Vec<_>>()
                        .join("\n")
                } else {
                    legal
                        .iter()
                        .map(|mv| mv.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                println!("{moves_string}");
            }
        }

        Ok(())
    }
}

/// Parse `fen` and play each of `moves` on it, rejecting any move that is not legal.
fn setup_board(fen: &str, moves: &[String], attacks: &AttackTable) -> Result<Board> {
    let mut board = Board::from_fen(fen).with_context(|| format!("Invalid FEN {fen:?}"))?;

    for mv in moves {
        board
            .make_uci_move(mv, attacks)
            .with_context(|| format!("Cannot play {mv:?} on {board}"))?;
    }

    Ok(board)
}

fn print_perft<const SPLIT: bool>(board: &mut Board, attacks: &AttackTable, depth: usize) {
    let now = std::time::Instant::now();
    let nodes = perft_generic::<true, SPLIT>(board, attacks, depth);
    let elapsed = now.elapsed();

    let nps = nodes as f32 / elapsed.as_secs_f32();
    let m_nps = nps / 1_000_000.0;

    if SPLIT {
        println!();
    }
    println!("{nodes}");
    tracing::info!(depth, nodes, ?elapsed, m_nps, "perft finished");
}
