//! Terminal-state reporting.

use std::fmt;

use crate::player::Player;

/// The result of a game as seen by the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Outcome {
    /// The game is still being played.
    #[default]
    Ongoing,
    /// The given player has won.
    Won(Player),
    /// The game ended without a winner.
    Draw,
}

impl Outcome {
    /// Return `true` once the game has been decided.
    #[inline]
    pub const fn is_over(self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }

    /// Return the winner, if there is one.
    #[inline]
    pub const fn winner(self) -> Option<Player> {
        match self {
            Outcome::Won(player) => Some(player),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ongoing => write!(f, "ongoing"),
            Outcome::Won(player) => write!(f, "{player} wins"),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}
