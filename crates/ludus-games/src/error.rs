//! Errors raised while turning user text into game values.

/// A move string did not match any candidate in the current position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseMoveError {
    /// Nothing but whitespace was given.
    #[error("empty move")]
    Empty,
    /// The text does not name a move available in this position.
    #[error("not a valid move: {text}")]
    Unrecognized {
        /// The text that failed to parse.
        text: String,
    },
}

/// A game name that does not match any supported game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown game: {name} (expected tictactoe, mancala or gobbletgobblers)")]
pub struct UnknownGame {
    /// The name that failed to parse.
    pub name: String,
}
