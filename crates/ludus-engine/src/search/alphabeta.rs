//! Fail-soft alpha-beta with quiescence.
//!
//! `alpha` is the floor this side is already guaranteed, `beta` the ceiling
//! the opponent will allow. A score at or above `beta` refutes the previous
//! move, so the remaining siblings are skipped.

use ludus_core::Position;

use super::{SearchContext, descend, no_move_score};

/// Alpha-beta search of `pos` to `depth`, returning the best score found,
/// or `alpha` if nothing beat the window.
pub(super) fn alpha_beta<P: Position>(
    pos: &mut P,
    depth: u8,
    ply: usize,
    mut alpha: i32,
    beta: i32,
    ctx: &mut SearchContext<'_, P::Move>,
) -> i32 {
    ctx.pv.clear_ply(ply);

    if depth == 0 {
        ctx.stats.leaves += 1;
        return quiescence(pos, ply, alpha, beta, ctx);
    }
    ctx.stats.nodes += 1;

    let mover = pos.side_to_move();
    let mut found = false;
    let mut moves = pos.generate(ply, depth);
    moves.sort_by_score();

    for entry in &moves {
        let mv = entry.mv;
        let score = {
            let Some(mut child) = pos.play(mv) else {
                continue;
            };
            found = true;
            descend(&mut *child, mover, depth, alpha, beta, |p, d, a, b| {
                alpha_beta(p, d, ply + 1, a, b, ctx)
            })
        };

        if score > alpha {
            if score >= beta {
                pos.on_fail_high(mv, ply, depth);
                return score;
            }
            alpha = score;
            ctx.pv.update(ply, mv);
        }
    }

    if !found {
        ctx.stats.leaves += 1;
        return no_move_score(pos, ply);
    }
    alpha
}

/// Resolve the position past the horizon using only quiescence moves.
///
/// The static evaluation is the stand-pat score: the side to move may always
/// decline to continue.
pub(super) fn quiescence<P: Position>(
    pos: &mut P,
    ply: usize,
    mut alpha: i32,
    beta: i32,
    ctx: &mut SearchContext<'_, P::Move>,
) -> i32 {
    ctx.pv.clear_ply(ply);
    ctx.stats.nodes += 1;

    let stand_pat = pos.evaluate(ply);
    if stand_pat >= beta {
        return stand_pat;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let mover = pos.side_to_move();
    let mut moves = pos.generate_quiescence(ply);
    moves.sort_by_score();

    for entry in &moves {
        let mv = entry.mv;
        let score = {
            let Some(mut child) = pos.play(mv) else {
                continue;
            };
            descend(&mut *child, mover, 0, alpha, beta, |p, _, a, b| {
                quiescence(p, ply + 1, a, b, ctx)
            })
        };

        if score > alpha {
            if score >= beta {
                pos.on_fail_high(mv, ply, 0);
                return score;
            }
            alpha = score;
            ctx.pv.update(ply, mv);
        }
    }
    alpha
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::pv::PvTable;
    use crate::search::{INF, SearchStats};
    use ludus_core::{MoveList, Outcome, Player};

    /// Single-pile subtraction game: take one or two, taking the last wins.
    /// Captures are "take two", searched past the horizon.
    #[derive(Clone)]
    struct Pile {
        left: u8,
        side: Player,
        history: Vec<u8>,
        quiet: bool,
    }

    impl Pile {
        fn new(left: u8) -> Self {
            Self {
                left,
                side: Player::One,
                history: Vec::new(),
                quiet: false,
            }
        }
    }

    impl Position for Pile {
        type Move = u8;

        fn apply(&mut self, mv: u8) -> bool {
            if !(1..=2).contains(&mv) || mv > self.left {
                return false;
            }
            self.left -= mv;
            self.history.push(mv);
            self.side = !self.side;
            true
        }

        fn undo(&mut self) {
            if let Some(mv) = self.history.pop() {
                self.left += mv;
                self.side = !self.side;
            }
        }

        fn generate(&self, _ply: usize, _depth: u8) -> MoveList<u8> {
            let mut list = MoveList::new();
            list.push(1, 0);
            list.push(2, 1);
            list
        }

        fn generate_quiescence(&self, _ply: usize) -> MoveList<u8> {
            let mut list = MoveList::new();
            if !self.quiet {
                list.push(2, 0);
            }
            list
        }

        fn winner(&self) -> Outcome {
            if self.left == 0 {
                Outcome::Won(!self.side)
            } else {
                Outcome::Ongoing
            }
        }

        fn side_to_move(&self) -> Player {
            self.side
        }

        fn evaluate(&self, ply: usize) -> i32 {
            match self.winner() {
                Outcome::Won(p) if p == self.side => INF - ply as i32,
                Outcome::Won(_) => -INF + ply as i32,
                _ => i32::from(self.left % 3 != 0) * 10,
            }
        }

        fn hash_key(&self) -> u64 {
            (u64::from(self.left) << 1) | self.side.index() as u64
        }
    }

    fn run<F>(f: F) -> (i32, SearchStats, Vec<u8>)
    where
        F: FnOnce(&mut SearchContext<'_, u8>) -> i32,
    {
        let mut pv = PvTable::new();
        let mut ctx = SearchContext {
            stats: SearchStats::default(),
            pv: &mut pv,
        };
        let score = f(&mut ctx);
        let stats = ctx.stats;
        (score, stats, pv.root_pv().to_vec())
    }

    #[test]
    fn stand_pat_equals_evaluate_without_quiescence_moves() {
        let mut pos = Pile::new(4);
        pos.quiet = true;
        let expected = pos.evaluate(0);
        let (score, _, pv) = run(|ctx| quiescence(&mut pos, 0, -INF, INF, ctx));
        assert_eq!(score, expected);
        assert!(pv.is_empty());
    }

    #[test]
    fn quiescence_follows_captures_to_the_end() {
        // Two left: taking both wins outright.
        let mut pos = Pile::new(2);
        let (score, _, pv) = run(|ctx| quiescence(&mut pos, 0, -INF, INF, ctx));
        assert_eq!(score, INF - 1);
        assert_eq!(pv, vec![2]);
    }

    #[test]
    fn finds_forced_win_and_leaves_position_intact() {
        // Four left: take one, leaving a multiple of three.
        let mut pos = Pile::new(4);
        pos.quiet = true;
        let (score, stats, pv) = run(|ctx| alpha_beta(&mut pos, 4, 0, -INF, INF, ctx));
        assert_eq!(pv.first(), Some(&1));
        // 4 -> 3 -> 2 or 1 -> 0: the opponent is out of moves at ply 3.
        assert_eq!(score, INF - 3);
        assert!(stats.nodes > 0 && stats.leaves > 0);
        assert_eq!(pos.left, 4);
        assert!(pos.history.is_empty());
    }

    #[test]
    fn fail_low_returns_alpha() {
        let mut pos = Pile::new(3);
        pos.quiet = true;
        // Three left is lost for the side to move; nothing beats a high floor.
        let (score, _, pv) = run(|ctx| alpha_beta(&mut pos, 3, 0, 500, 600, ctx));
        assert_eq!(score, 500);
        assert!(pv.is_empty());
    }

    #[test]
    fn fail_high_may_exceed_beta() {
        let mut pos = Pile::new(2);
        pos.quiet = true;
        let (score, _, _) = run(|ctx| alpha_beta(&mut pos, 2, 0, -10, 5, ctx));
        assert_eq!(score, INF - 1, "fail-soft returns the real score");
    }

    #[test]
    fn decided_position_scores_by_ply() {
        let mut pos = Pile::new(1);
        assert!(pos.apply(1));
        // Player 2 to move, player 1 already took the last stone.
        let (score, _, _) = run(|ctx| alpha_beta(&mut pos, 3, 2, -INF, INF, ctx));
        assert_eq!(score, -INF + 2);
    }
}
