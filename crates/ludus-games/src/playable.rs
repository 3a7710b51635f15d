//! What a front end needs from a game beyond the search contract.

use std::fmt;
use std::str::FromStr;

use ludus_core::{Player, Position};

use crate::error::{ParseMoveError, UnknownGame};

/// A position that can be started, shown, typed into, and reviewed.
pub trait Playable: Position + fmt::Display + Clone {
    /// Which of the supported games this is.
    const KIND: GameKind;

    /// Name used on the command line.
    const NAME: &'static str = Self::KIND.name();

    /// Deepest search worth running. Games that always end within a fixed
    /// number of plies cap the engine there.
    const DEPTH_LIMIT: u8 = u8::MAX;

    /// The starting position.
    fn new_game() -> Self;

    /// Moves played so far, each with the player who made it.
    fn history(&self) -> Vec<(Player, Self::Move)>;

    /// Turn user text into a move by matching it against the rendered form of
    /// every generated candidate.
    ///
    /// A parsed move may still be illegal; [`Position::apply`] decides.
    fn parse_move(&self, text: &str) -> Result<Self::Move, ParseMoveError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ParseMoveError::Empty);
        }
        self.generate(0, 0)
            .moves()
            .find(|mv| mv.to_string() == text)
            .ok_or_else(|| ParseMoveError::Unrecognized {
                text: text.to_string(),
            })
    }
}

/// Render a move history with numbered turns.
///
/// A bonus turn (same player twice in a row) continues on its own line in
/// that player's column.
pub fn format_history<M: fmt::Display>(history: &[(Player, M)]) -> String {
    let mut out = String::new();
    let mut number = 0;
    let mut last = Player::Two;
    for (player, mv) in history {
        match (player, last) {
            (Player::One, Player::Two) => {
                number += 1;
                out.push_str(&format!("\n{number:2}."));
            }
            (Player::One, Player::One) => out.push_str("\n   "),
            (Player::Two, Player::Two) => out.push_str("\n   \t"),
            (Player::Two, Player::One) => {}
        }
        out.push_str(&format!("\t{mv}"));
        last = *player;
    }
    out.push('\n');
    out
}

/// The closed set of supported games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameKind {
    #[default]
    TicTacToe,
    Mancala,
    Gobblet,
}

impl GameKind {
    /// All games in menu order.
    pub const ALL: [GameKind; 3] = [GameKind::TicTacToe, GameKind::Mancala, GameKind::Gobblet];

    /// Command-line name of the game.
    pub const fn name(self) -> &'static str {
        match self {
            GameKind::TicTacToe => "tictactoe",
            GameKind::Mancala => "mancala",
            GameKind::Gobblet => "gobbletgobblers",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameKind {
    type Err = UnknownGame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "tictactoe" => Ok(GameKind::TicTacToe),
            "mancala" => Ok(GameKind::Mancala),
            "gobbletgobblers" | "gobblet" => Ok(GameKind::Gobblet),
            other => Err(UnknownGame {
                name: other.to_string(),
            }),
        }
    }
}
