//! The two sides of a game.

use std::fmt;
use std::ops::Not;

/// One of the two players. Player 1 always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Player {
    One = 0,
    Two = 1,
}

impl Player {
    /// Total number of players.
    pub const COUNT: usize = 2;

    /// All players in index order.
    pub const ALL: [Player; 2] = [Player::One, Player::Two];

    /// Return the index (0 for player 1, 1 for player 2).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Return the opponent.
    #[inline]
    pub const fn flip(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Return the one-based player number used in user-facing text.
    #[inline]
    pub const fn number(self) -> u8 {
        self as u8 + 1
    }
}

impl Not for Player {
    type Output = Player;

    #[inline]
    fn not(self) -> Player {
        self.flip()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.number())
    }
}
