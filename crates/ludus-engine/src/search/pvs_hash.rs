//! Principal variation search backed by a transposition table.

use ludus_core::Position;

use super::alphabeta::quiescence;
use super::tt::{Bound, TranspositionTable};
use super::{FULL_WINDOW_DEPTH, SearchContext, TT_MOVE_BONUS, descend, no_move_score};

/// PVS that memoizes every resolved node.
///
/// A stored entry at least as deep as `depth` answers the node outright when
/// it is exact, or when its bound already falls outside the window. A
/// shallower entry still contributes its best move, which is tried first.
pub(super) fn pvs_hash<P: Position>(
    pos: &mut P,
    depth: u8,
    ply: usize,
    mut alpha: i32,
    beta: i32,
    ctx: &mut SearchContext<'_, P::Move>,
    tt: &mut TranspositionTable<P::Move>,
) -> i32 {
    ctx.pv.clear_ply(ply);

    if depth == 0 {
        ctx.stats.leaves += 1;
        return quiescence(pos, ply, alpha, beta, ctx);
    }
    ctx.stats.nodes += 1;

    let hash = pos.hash_key();
    let mut tt_move = None;
    if let Some(tt_entry) = tt.probe(hash, ply) {
        if tt_entry.depth >= depth {
            match tt_entry.bound {
                Bound::Exact => {
                    ctx.pv.set_single(ply, tt_entry.best_move);
                    return tt_entry.score;
                }
                Bound::Lower if tt_entry.score >= beta => return tt_entry.score,
                Bound::Upper if tt_entry.score <= alpha => return tt_entry.score,
                _ => {}
            }
        }
        tt_move = Some(tt_entry.best_move);
    }

    let mover = pos.side_to_move();
    let initial_alpha = alpha;
    let mut found = false;
    let mut moves = pos.generate(ply, depth);
    if let Some(mv) = tt_move {
        moves.boost(mv, TT_MOVE_BONUS);
    }
    moves.sort_by_score();

    for entry in &moves {
        let mv = entry.mv;
        let full_window = !found || depth <= FULL_WINDOW_DEPTH;
        let score = {
            let Some(mut child) = pos.play(mv) else {
                continue;
            };
            found = true;
            let child = &mut *child;
            let mut search =
                |p: &mut P, d: u8, a: i32, b: i32| pvs_hash(p, d, ply + 1, a, b, ctx, tt);
            if full_window {
                descend(child, mover, depth, alpha, beta, &mut search)
            } else {
                let probe = descend(child, mover, depth, alpha, alpha + 1, &mut search);
                if probe > alpha && probe < beta {
                    descend(child, mover, depth, alpha, beta, &mut search)
                } else {
                    probe
                }
            }
        };

        if score > alpha {
            if score >= beta {
                pos.on_fail_high(mv, ply, depth);
                tt.store(hash, depth, score, Bound::Lower, mv, ply);
                return score;
            }
            alpha = score;
            ctx.pv.update(ply, mv);
            tt.store(hash, depth, score, Bound::Exact, mv, ply);
        }
    }

    if !found {
        ctx.stats.leaves += 1;
        return no_move_score(pos, ply);
    }

    if alpha == initial_alpha
        && let Some(first) = moves.first()
    {
        tt.store(hash, depth, alpha, Bound::Upper, first, ply);
    }
    alpha
}
