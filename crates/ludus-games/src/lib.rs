//! Concrete games implementing the ludus position contract.

mod error;
mod gobblet;
mod mancala;
mod playable;
mod tictactoe;

pub use error::{ParseMoveError, UnknownGame};
pub use gobblet::{Gobble, Gobblet};
pub use mancala::{Mancala, Pit};
pub use playable::{GameKind, Playable, format_history};
pub use tictactoe::{Cell, TicTacToe};
