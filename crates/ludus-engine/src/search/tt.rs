//! Fixed-capacity transposition table keyed by Zobrist hash.
//!
//! One entry per slot, indexed by `hash % capacity`. The full 64-bit key is
//! kept in the entry so a probe can tell its own position apart from another
//! one that happens to share the slot.

use super::MATE_THRESHOLD;

/// Bound type stored in a TT entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The stored score is exact (the window was improved without a cutoff).
    Exact,
    /// The stored score is a lower bound (failed high / beta cutoff).
    Lower,
    /// The stored score is an upper bound (failed low / all-node).
    Upper,
}

/// What happens when a store lands on an occupied slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Replacement {
    /// Overwrite whatever is there.
    #[default]
    Always,
    /// Keep an entry for a different position if it was searched deeper
    /// than the incoming one.
    PreferDeeper,
}

/// Result of a successful TT probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtProbeResult<M> {
    /// Best move from a previous search of this position.
    pub best_move: M,
    /// Remaining depth of the stored search.
    pub depth: u8,
    /// Bound type (exact, lower, or upper).
    pub bound: Bound,
    /// Score, already converted back to root-relative form.
    pub score: i32,
}

#[derive(Debug, Clone, Copy)]
struct Entry<M> {
    key: u64,
    score: i32,
    bound: Bound,
    depth: u8,
    best_move: M,
}

/// Convert a search score to TT-storable form.
///
/// Decided-game scores depend on the ply they were found at. They are stored
/// as distance from this node instead of from the root so that a transposition
/// reached along a different path reads back the right distance.
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score > MATE_THRESHOLD {
        score + ply as i32
    } else if score < -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

/// Convert a TT-stored score back to search-usable form.
///
/// Reverses the adjustment applied by [`score_to_tt`].
pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score > MATE_THRESHOLD {
        score - ply as i32
    } else if score < -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

/// Transposition table owned by one searcher.
pub struct TranspositionTable<M> {
    entries: Box<[Option<Entry<M>>]>,
    replacement: Replacement,
    occupied: usize,
}

impl<M: Copy + Eq> TranspositionTable<M> {
    /// Allocate a table with `capacity` slots (at least one).
    pub fn new(capacity: usize, replacement: Replacement) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: vec![None; capacity].into_boxed_slice(),
            replacement,
            occupied: 0,
        }
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        (hash % self.entries.len() as u64) as usize
    }

    /// Probe the table for a position searched at `ply`.
    ///
    /// Returns `None` on an empty slot or when the slot holds another key.
    pub fn probe(&self, hash: u64, ply: usize) -> Option<TtProbeResult<M>> {
        let entry = self.entries[self.index(hash)].as_ref()?;
        if entry.key != hash {
            return None;
        }
        Some(TtProbeResult {
            best_move: entry.best_move,
            depth: entry.depth,
            bound: entry.bound,
            score: score_from_tt(entry.score, ply),
        })
    }

    /// Store a search result for a position searched at `ply`.
    pub fn store(
        &mut self,
        hash: u64,
        depth: u8,
        score: i32,
        bound: Bound,
        best_move: M,
        ply: usize,
    ) {
        let index = self.index(hash);
        let slot = &mut self.entries[index];
        match slot {
            None => self.occupied += 1,
            Some(existing) => {
                if self.replacement == Replacement::PreferDeeper
                    && existing.key != hash
                    && existing.depth > depth
                {
                    return;
                }
            }
        }
        *slot = Some(Entry {
            key: hash,
            score: score_to_tt(score, ply),
            bound,
            depth,
            best_move,
        });
    }

    /// Empty every slot, keeping the allocation.
    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.occupied = 0;
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.occupied
    }

    /// Check if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }
}

impl<M> std::fmt::Debug for TranspositionTable<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("capacity", &self.entries.len())
            .field("occupied", &self.occupied)
            .field("replacement", &self.replacement)
            .finish()
    }
}
