//! Full-width negamax: no window, no ordering, no pruning.
//!
//! Slow but simple, which makes it the reference the pruned searches are
//! checked against.

use ludus_core::Position;

use super::{SearchContext, descend, no_move_score};

/// Exact minimax value of `pos` searched `depth` plies deep.
pub(super) fn negamax<P: Position>(
    pos: &mut P,
    depth: u8,
    ply: usize,
    ctx: &mut SearchContext<'_, P::Move>,
) -> i32 {
    ctx.pv.clear_ply(ply);

    if depth == 0 {
        ctx.stats.leaves += 1;
        return quiescence(pos, ply, ctx);
    }
    ctx.stats.nodes += 1;

    let mover = pos.side_to_move();
    let mut best: Option<i32> = None;

    for entry in pos.generate(ply, depth) {
        let Some(mut child) = pos.play(entry.mv) else {
            continue;
        };
        let score = descend(&mut *child, mover, depth, 0, 0, |p, d, _, _| {
            negamax(p, d, ply + 1, ctx)
        });
        if best.is_none_or(|b| score > b) {
            best = Some(score);
            ctx.pv.update(ply, entry.mv);
        }
    }

    best.unwrap_or_else(|| {
        ctx.stats.leaves += 1;
        no_move_score(pos, ply)
    })
}

/// Static value extended through every quiescence move, full width.
fn quiescence<P: Position>(
    pos: &mut P,
    ply: usize,
    ctx: &mut SearchContext<'_, P::Move>,
) -> i32 {
    ctx.pv.clear_ply(ply);
    ctx.stats.nodes += 1;
    let mover = pos.side_to_move();
    let mut value = pos.evaluate(ply);

    for entry in pos.generate_quiescence(ply) {
        let Some(mut child) = pos.play(entry.mv) else {
            continue;
        };
        let score = descend(&mut *child, mover, 0, 0, 0, |p, _, _, _| {
            quiescence(p, ply + 1, ctx)
        });
        if score > value {
            value = score;
            ctx.pv.update(ply, entry.mv);
        }
    }
    value
}
