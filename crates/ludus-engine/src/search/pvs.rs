//! Principal variation search.
//!
//! The first move at each node is assumed best and gets the full window.
//! Every later sibling is first probed with a zero window `[alpha, alpha + 1]`
//! that only answers "better than alpha or not"; a probe that lands inside
//! the real window is searched again with the full window for its exact
//! value.

use ludus_core::Position;

use super::alphabeta::quiescence;
use super::{FULL_WINDOW_DEPTH, SearchContext, descend, no_move_score};

pub(super) fn pvs<P: Position>(
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
        let full_window = !found || depth <= FULL_WINDOW_DEPTH;
        let score = {
            let Some(mut child) = pos.play(mv) else {
                continue;
            };
            found = true;
            let child = &mut *child;
            if full_window {
                descend(child, mover, depth, alpha, beta, |p, d, a, b| {
                    pvs(p, d, ply + 1, a, b, ctx)
                })
            } else {
                let probe = descend(child, mover, depth, alpha, alpha + 1, |p, d, a, b| {
                    pvs(p, d, ply + 1, a, b, ctx)
                });
                if probe > alpha && probe < beta {
                    descend(child, mover, depth, alpha, beta, |p, d, a, b| {
                        pvs(p, d, ply + 1, a, b, ctx)
                    })
                } else {
                    probe
                }
            }
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
