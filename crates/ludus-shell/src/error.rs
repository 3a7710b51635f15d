//! Shell errors.

use ludus_engine::SearchError;
use ludus_games::{ParseMoveError, UnknownGame};

/// Errors that can occur while reading and executing shell commands.
///
/// Everything except [`ShellError::Io`] is reported to the user and the
/// loop carries on.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// `game` named something we cannot play.
    #[error(transparent)]
    UnknownGame(#[from] UnknownGame),

    /// The text does not name a move in the current position.
    #[error(transparent)]
    InvalidMove(#[from] ParseMoveError),

    /// The move parsed but the position refused it.
    #[error("illegal move: {mv}")]
    IllegalMove {
        /// The move as typed.
        mv: String,
    },

    /// A command that needs an argument was given none.
    #[error("missing value for {command}")]
    MissingValue {
        /// The command name.
        command: String,
    },

    /// A command argument could not be parsed.
    #[error("invalid value for {command}: {value}")]
    InvalidValue {
        /// The command name.
        command: String,
        /// The offending argument.
        value: String,
    },

    /// The engine could not produce a move.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Reading input or writing output failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

impl ShellError {
    /// Whether the loop has to stop. Only broken input or output qualifies.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ShellError::Io { .. })
    }
}
