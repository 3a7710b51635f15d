//! The capability set every game must expose to the search engines.
//!
//! Legality is checked lazily inside [`Position::apply`], not during
//! generation: a cutoff usually prunes most candidates before they are ever
//! applied, so the expensive part of the check is only paid for moves the
//! search actually visits.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::move_list::MoveList;
use crate::outcome::Outcome;
use crate::player::Player;

/// Magnitude of a decided game, before the ply adjustment.
///
/// A win found `ply` half-moves from the root scores `WIN_SCORE - ply` for
/// the winner and `-(WIN_SCORE - ply)` for the loser.
pub const WIN_SCORE: i32 = 1_000_000;

/// A mutable game position that the search engines walk.
///
/// Invariant: any sequence of successful [`apply`](Position::apply) calls
/// followed by the same number of [`undo`](Position::undo) calls leaves the
/// layout, side to move, [`hash_key`](Position::hash_key) and
/// [`winner`](Position::winner) bit-identical to where they started.
pub trait Position {
    /// Game-specific move. Equality must ignore any ordering score.
    type Move: Copy + Eq + fmt::Debug + fmt::Display;

    /// Check legality and, only if legal, play `mv`.
    ///
    /// Returns `false` and leaves every observable attribute unchanged when
    /// the move is illegal.
    fn apply(&mut self, mv: Self::Move) -> bool;

    /// Take back the most recent successful `apply`. No-op at game start.
    fn undo(&mut self);

    /// Pseudo-legal candidates, each pre-scored for ordering.
    fn generate(&self, ply: usize, depth: u8) -> MoveList<Self::Move>;

    /// "Significant" moves searched past the horizon. Empty by default.
    fn generate_quiescence(&self, _ply: usize) -> MoveList<Self::Move> {
        MoveList::new()
    }

    /// Terminal state of the game.
    fn winner(&self) -> Outcome;

    /// The side that plays next. Equal before and after an `apply` when the
    /// move earned a bonus turn.
    fn side_to_move(&self) -> Player;

    /// Static score relative to the side to move (positive = ahead).
    fn evaluate(&self, ply: usize) -> i32;

    /// Incremental Zobrist fingerprint of (layout, side to move).
    fn hash_key(&self) -> u64;

    /// A move refuted the previous move at `ply`.
    fn on_fail_high(&mut self, _mv: Self::Move, _ply: usize, _depth: u8) {}

    /// The principal variation of the last completed iteration.
    fn on_principal_variation(&mut self, _pv: &[Self::Move]) {}

    /// A new real move is about to be searched.
    fn on_search_reset(&mut self) {}

    /// Apply `mv` and return a guard that undoes it when dropped.
    ///
    /// Returns `None` if the move is illegal.
    fn play(&mut self, mv: Self::Move) -> Option<Applied<'_, Self>>
    where
        Self: Sized,
    {
        Applied::try_new(self, mv)
    }
}

/// Scoped move application: the move is undone when the guard drops,
/// including on early return from a cutoff.
pub struct Applied<'a, P: Position> {
    position: &'a mut P,
}

impl<'a, P: Position> Applied<'a, P> {
    /// Apply `mv` to `position`, returning a guard only if it was legal.
    pub fn try_new(position: &'a mut P, mv: P::Move) -> Option<Self> {
        if position.apply(mv) {
            Some(Self { position })
        } else {
            None
        }
    }
}

impl<P: Position> Deref for Applied<'_, P> {
    type Target = P;

    #[inline]
    fn deref(&self) -> &P {
        self.position
    }
}

impl<P: Position> DerefMut for Applied<'_, P> {
    #[inline]
    fn deref_mut(&mut self) -> &mut P {
        self.position
    }
}

impl<P: Position> Drop for Applied<'_, P> {
    fn drop(&mut self) {
        self.position.undo();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counter game: add 1 or 2, first to reach 5 wins.
    struct Race {
        total: u8,
        side: Player,
        history: Vec<u8>,
    }

    impl Position for Race {
        type Move = u8;

        fn apply(&mut self, mv: u8) -> bool {
            if !(1..=2).contains(&mv) || self.winner().is_over() {
                return false;
            }
            self.total += mv;
            self.history.push(mv);
            self.side = !self.side;
            true
        }

        fn undo(&mut self) {
            if let Some(mv) = self.history.pop() {
                self.total -= mv;
                self.side = !self.side;
            }
        }

        fn generate(&self, _ply: usize, _depth: u8) -> MoveList<u8> {
            let mut list = MoveList::new();
            list.push(1, 0);
            list.push(2, 0);
            list
        }

        fn winner(&self) -> Outcome {
            if self.total >= 5 {
                Outcome::Won(!self.side)
            } else {
                Outcome::Ongoing
            }
        }

        fn side_to_move(&self) -> Player {
            self.side
        }

        fn evaluate(&self, _ply: usize) -> i32 {
            0
        }

        fn hash_key(&self) -> u64 {
            u64::from(self.total) | (self.side.index() as u64) << 8
        }
    }

    fn race() -> Race {
        Race {
            total: 0,
            side: Player::One,
            history: Vec::new(),
        }
    }

    #[test]
    fn guard_undoes_on_drop() {
        let mut pos = race();
        {
            let child = pos.play(2).expect("2 is legal");
            assert_eq!(child.total, 2);
            assert_eq!(child.side_to_move(), Player::Two);
        }
        assert_eq!(pos.total, 0);
        assert_eq!(pos.side_to_move(), Player::One);
    }

    #[test]
    fn illegal_move_yields_no_guard() {
        let mut pos = race();
        assert!(pos.play(3).is_none());
        assert_eq!(pos.total, 0);
        assert!(pos.history.is_empty());
    }

    #[test]
    fn nested_guards_unwind_in_order() {
        let mut pos = race();
        let before = pos.hash_key();
        {
            let mut first = pos.play(1).expect("legal");
            let second = first.play(2).expect("legal");
            assert_eq!(second.total, 3);
        }
        assert_eq!(pos.hash_key(), before);
    }
}
