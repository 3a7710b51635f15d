//! Errors surfaced by the search driver.

/// The driver could not commit a move.
///
/// Illegal candidates inside the tree are never errors; only the final
/// commit on the real position can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The game is not over, yet no candidate was accepted by `apply`.
    #[error("no legal move in an unfinished position")]
    NoLegalMove,
    /// The position refused the first move of the principal variation.
    #[error("position rejected the chosen move {mv}")]
    MoveRejected {
        /// Rendered form of the rejected move.
        mv: String,
    },
}

/// An algorithm name that does not match any engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown algorithm: {name} (expected negamax, alphabeta, pvs or pvs-hash)")]
pub struct ParseAlgorithmError {
    /// The name that failed to parse.
    pub name: String,
}
