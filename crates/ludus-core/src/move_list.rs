//! Candidate move buffers carrying an ordering score per move.

use std::ops::Index;

/// A candidate move plus its ordering score (larger = more promising).
///
/// Equality of the underlying move ignores the score; compare `.mv` when
/// looking a move up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove<M> {
    /// The game-specific move.
    pub mv: M,
    /// Ordering score assigned at generation time.
    pub score: i32,
}

/// Growable buffer of scored moves produced by move generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveList<M> {
    moves: Vec<ScoredMove<M>>,
}

impl<M: Copy + Eq> MoveList<M> {
    /// Create an empty move list.
    pub fn new() -> Self {
        Self { moves: Vec::new() }
    }

    /// Create an empty list with room for `capacity` moves.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            moves: Vec::with_capacity(capacity),
        }
    }

    /// Push a move with its ordering score.
    #[inline]
    pub fn push(&mut self, mv: M, score: i32) {
        self.moves.push(ScoredMove { mv, score });
    }

    /// Return the number of moves in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Return `true` if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Iterate over the scored moves in their current order.
    pub fn iter(&self) -> std::slice::Iter<'_, ScoredMove<M>> {
        self.moves.iter()
    }

    /// Iterate over the bare moves in their current order.
    pub fn moves(&self) -> impl Iterator<Item = M> + '_ {
        self.moves.iter().map(|entry| entry.mv)
    }

    /// First move in the current order.
    pub fn first(&self) -> Option<M> {
        self.moves.first().map(|entry| entry.mv)
    }

    /// Add `bonus` to the score of `mv`. Returns `false` if `mv` is absent.
    ///
    /// Only the first occurrence is boosted.
    pub fn boost(&mut self, mv: M, bonus: i32) -> bool {
        match self.moves.iter_mut().find(|entry| entry.mv == mv) {
            Some(entry) => {
                entry.score = entry.score.saturating_add(bonus);
                true
            }
            None => false,
        }
    }

    /// Sort by score, highest first. Ties keep their generation order.
    pub fn sort_by_score(&mut self) {
        self.moves.sort_by(|a, b| b.score.cmp(&a.score));
    }
}

impl<M: Copy + Eq> Default for MoveList<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Index<usize> for MoveList<M> {
    type Output = ScoredMove<M>;

    #[inline]
    fn index(&self, index: usize) -> &ScoredMove<M> {
        &self.moves[index]
    }
}

impl<M> IntoIterator for MoveList<M> {
    type Item = ScoredMove<M>;
    type IntoIter = std::vec::IntoIter<ScoredMove<M>>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

impl<'a, M> IntoIterator for &'a MoveList<M> {
    type Item = &'a ScoredMove<M>;
    type IntoIter = std::slice::Iter<'a, ScoredMove<M>>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}
