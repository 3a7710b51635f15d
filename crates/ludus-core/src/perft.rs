//! Perft: exhaustive move-tree counting for move generation and terminal
//! detection checks.

use std::ops::{Add, AddAssign};

use tracing::trace;

use crate::outcome::Outcome;
use crate::player::Player;
use crate::position::Position;

/// Leaf tally of a perft run, bucketed by terminal status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftStats {
    /// Leaves where the depth ran out before the game was decided.
    pub ongoing: u64,
    /// Leaves won by player 1.
    pub player1: u64,
    /// Leaves won by player 2.
    pub player2: u64,
    /// Leaves that ended drawn.
    pub draw: u64,
    /// Visited non-terminal nodes, the root included.
    pub nodes: u64,
}

impl PerftStats {
    /// Total number of leaves across all four buckets.
    pub fn leaves(&self) -> u64 {
        self.ongoing + self.player1 + self.player2 + self.draw
    }

    fn tally(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Ongoing => self.ongoing += 1,
            Outcome::Won(Player::One) => self.player1 += 1,
            Outcome::Won(Player::Two) => self.player2 += 1,
            Outcome::Draw => self.draw += 1,
        }
    }
}

impl Add for PerftStats {
    type Output = PerftStats;

    fn add(mut self, rhs: PerftStats) -> PerftStats {
        self += rhs;
        self
    }
}

impl AddAssign for PerftStats {
    fn add_assign(&mut self, rhs: PerftStats) {
        self.ongoing += rhs.ongoing;
        self.player1 += rhs.player1;
        self.player2 += rhs.player2;
        self.draw += rhs.draw;
        self.nodes += rhs.nodes;
    }
}

/// Count the leaves of the move tree `depth` plies deep.
///
/// A move that ends the game is tallied under its result immediately; the
/// tree does not continue past a decided game.
pub fn perft<P: Position>(position: &mut P, depth: u8) -> PerftStats {
    perft_at(position, depth, 0)
}

fn perft_at<P: Position>(position: &mut P, depth: u8, ply: usize) -> PerftStats {
    let mut stats = PerftStats {
        nodes: 1,
        ..PerftStats::default()
    };

    if depth == 0 {
        stats.tally(position.winner());
        return stats;
    }

    for entry in position.generate(ply, depth) {
        let Some(mut child) = position.play(entry.mv) else {
            continue;
        };
        let outcome = child.winner();
        if outcome.is_over() {
            stats.tally(outcome);
        } else {
            stats += perft_at(&mut *child, depth - 1, ply + 1);
        }
    }
    stats
}

/// Run perft with per-move breakdown (useful for debugging).
///
/// Returns `(move, stats)` pairs in generation order. Illegal candidates
/// are skipped.
pub fn divide<P: Position>(position: &mut P, depth: u8) -> Vec<(String, PerftStats)> {
    let mut results = Vec::new();
    for entry in position.generate(0, depth.max(1)) {
        let Some(mut child) = position.play(entry.mv) else {
            continue;
        };
        let mut stats = PerftStats::default();
        let outcome = child.winner();
        if depth <= 1 || outcome.is_over() {
            stats.tally(outcome);
        } else {
            stats = perft_at(&mut *child, depth - 1, 1);
        }
        trace!(mv = %entry.mv, leaves = stats.leaves(), "divide");
        results.push((entry.mv.to_string(), stats));
    }
    results
}
