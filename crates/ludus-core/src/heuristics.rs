//! Killer-move table for positions that keep their own ordering heuristics.

/// One killer per ply: the last move that caused a cutoff there.
///
/// Owned by each position instance; nothing is shared between positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillerTable<M> {
    slots: Vec<Option<M>>,
}

impl<M: Copy + Eq> KillerTable<M> {
    /// Create an empty killer table.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Store `mv` as the killer at `ply`, replacing the previous one.
    pub fn store(&mut self, ply: usize, mv: M) {
        if ply >= self.slots.len() {
            self.slots.resize(ply + 1, None);
        }
        self.slots[ply] = Some(mv);
    }

    /// The killer at `ply`, if any.
    #[inline]
    pub fn get(&self, ply: usize) -> Option<M> {
        self.slots.get(ply).copied().flatten()
    }

    /// Seed the table from a principal variation: `pv[i]` becomes the killer at ply `i`.
    pub fn seed_from_pv(&mut self, pv: &[M]) {
        self.slots.clear();
        self.slots.extend(pv.iter().copied().map(Some));
    }

    /// Forget every killer.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl<M: Copy + Eq> Default for KillerTable<M> {
    fn default() -> Self {
        Self::new()
    }
}
