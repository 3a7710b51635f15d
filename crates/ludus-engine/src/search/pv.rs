//! Triangular principal-variation table.

/// Per-ply best lines. Row `ply` holds the PV from that ply onward.
///
/// Rows grow on demand, so any recursion depth is supported.
#[derive(Debug, Clone)]
pub struct PvTable<M> {
    lines: Vec<Vec<M>>,
}

impl<M: Copy> PvTable<M> {
    /// Create an empty PV table.
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Clear the PV line at `ply` (called at the top of each node).
    pub fn clear_ply(&mut self, ply: usize) {
        if ply >= self.lines.len() {
            self.lines.resize_with(ply + 1, Vec::new);
        }
        self.lines[ply].clear();
    }

    /// Update the PV at `ply`: `mv` followed by the line at `ply + 1`.
    pub fn update(&mut self, ply: usize, mv: M) {
        if ply + 1 >= self.lines.len() {
            self.lines.resize_with(ply + 2, Vec::new);
        }
        let (top, bottom) = self.lines.split_at_mut(ply + 1);
        let line = &mut top[ply];
        line.clear();
        line.push(mv);
        line.extend_from_slice(&bottom[0]);
    }

    /// Set a single move as the PV at `ply` (no continuation).
    ///
    /// Used for exact transposition-table hits.
    pub fn set_single(&mut self, ply: usize, mv: M) {
        self.clear_ply(ply);
        self.lines[ply].push(mv);
    }

    /// The line stored at `ply`.
    pub fn line(&self, ply: usize) -> &[M] {
        self.lines.get(ply).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The principal variation from the root.
    pub fn root_pv(&self) -> &[M] {
        self.line(0)
    }

    /// Forget every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl<M: Copy> Default for PvTable<M> {
    fn default() -> Self {
        Self::new()
    }
}
