//! One game in progress, with its own engine.
//!
//! The shell switches games at runtime, so it talks to a `Box<dyn
//! GameSession>` and never sees the concrete position type.

use std::io::Write;
use std::time::Duration;

use tracing::debug;

use ludus_core::{Outcome, PerftStats, Player, Position, perft};
use ludus_engine::{SearchConfig, Searcher};
use ludus_games::{GameKind, Gobblet, Mancala, Playable, TicTacToe, format_history};

use crate::error::ShellError;

/// Object-safe view of a game and the engine playing it.
pub trait GameSession {
    /// Which game this is.
    fn kind(&self) -> GameKind;

    /// Board, status line and hash as shown before each prompt.
    fn render(&self) -> String;

    /// The side that plays next.
    fn side_to_move(&self) -> Player;

    /// Terminal state of the game.
    fn outcome(&self) -> Outcome;

    /// Parse `text` and play it.
    fn play(&mut self, text: &str) -> Result<(), ShellError>;

    /// Take back the last move. No-op at game start.
    fn undo(&mut self);

    /// Static score for the side to move.
    fn evaluate(&self) -> i32;

    /// Numbered move list.
    fn history(&self) -> String;

    /// Exhaustive tree count from the current position.
    fn perft(&mut self, depth: u8) -> PerftStats;

    /// Let the engine pick and play a move, writing one line per completed
    /// iteration to `out`. Returns the move played, or `None` if the game
    /// was already over.
    fn think(&mut self, out: &mut dyn Write) -> Result<Option<String>, ShellError>;

    /// Deepest iteration the engine may run, capped by the game.
    fn set_max_depth(&mut self, depth: u8);

    /// Engine budget per move. `None` is unlimited.
    fn set_max_time(&mut self, max_time: Option<Duration>);

    /// The engine settings currently in force.
    fn config(&self) -> &SearchConfig;
}

/// A position of game `P` and the searcher that plays it.
pub struct Session<P: Playable> {
    position: P,
    searcher: Searcher<P::Move>,
}

impl<P: Playable> Session<P> {
    /// Start a new game. The depth is capped at [`Playable::DEPTH_LIMIT`].
    pub fn new(config: SearchConfig) -> Self {
        let mut searcher = Searcher::new(config);
        let depth = searcher.config().max_depth;
        searcher.set_max_depth(depth.min(P::DEPTH_LIMIT));
        Self {
            position: P::new_game(),
            searcher,
        }
    }
}

impl<P: Playable + 'static> GameSession for Session<P> {
    fn kind(&self) -> GameKind {
        P::KIND
    }

    fn render(&self) -> String {
        self.position.to_string()
    }

    fn side_to_move(&self) -> Player {
        self.position.side_to_move()
    }

    fn outcome(&self) -> Outcome {
        self.position.winner()
    }

    fn play(&mut self, text: &str) -> Result<(), ShellError> {
        let mv = self.position.parse_move(text)?;
        if !self.position.apply(mv) {
            return Err(ShellError::IllegalMove {
                mv: text.trim().to_string(),
            });
        }
        debug!(mv = %mv, hash = self.position.hash_key(), "move played");
        Ok(())
    }

    fn undo(&mut self) {
        self.position.undo();
    }

    fn evaluate(&self) -> i32 {
        self.position.evaluate(0)
    }

    fn history(&self) -> String {
        format_history(&self.position.history())
    }

    fn perft(&mut self, depth: u8) -> PerftStats {
        perft(&mut self.position, depth)
    }

    fn think(&mut self, out: &mut dyn Write) -> Result<Option<String>, ShellError> {
        let mut written = Ok(());
        let result = self.searcher.search_with(&mut self.position, |iteration| {
            if written.is_ok() {
                written = writeln!(out, "{iteration}");
            }
        })?;
        written?;
        Ok(result.map(|r| r.best_move.to_string()))
    }

    fn set_max_depth(&mut self, depth: u8) {
        self.searcher.set_max_depth(depth.min(P::DEPTH_LIMIT));
    }

    fn set_max_time(&mut self, max_time: Option<Duration>) {
        self.searcher.set_max_time(max_time);
    }

    fn config(&self) -> &SearchConfig {
        self.searcher.config()
    }
}

/// A fresh game of `kind` behind the object-safe interface.
pub fn open_session(kind: GameKind, config: SearchConfig) -> Box<dyn GameSession> {
    debug!(game = %kind, algorithm = %config.algorithm, "opening session");
    match kind {
        GameKind::TicTacToe => Box::new(Session::<TicTacToe>::new(config)),
        GameKind::Mancala => Box::new(Session::<Mancala>::new(config)),
        GameKind::Gobblet => Box::new(Session::<Gobblet>::new(config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> SearchConfig {
        SearchConfig {
            max_depth: 3,
            max_time: None,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn kind_matches_game() {
        for kind in GameKind::ALL {
            assert_eq!(open_session(kind, quick()).kind(), kind);
        }
    }

    #[test]
    fn tictactoe_depth_is_capped() {
        let mut session = open_session(GameKind::TicTacToe, SearchConfig::default());
        assert_eq!(session.config().max_depth, 9);
        session.set_max_depth(20);
        assert_eq!(session.config().max_depth, 9);
        session.set_max_depth(4);
        assert_eq!(session.config().max_depth, 4);

        let session = open_session(GameKind::Mancala, SearchConfig::default());
        assert_eq!(session.config().max_depth, 64);
    }

    #[test]
    fn play_and_undo() {
        let mut session = open_session(GameKind::TicTacToe, quick());
        session.play("4").unwrap();
        assert_eq!(session.side_to_move(), Player::Two);
        assert_eq!(session.history(), "\n 1.\t4\n");
        session.undo();
        assert_eq!(session.side_to_move(), Player::One);
        assert_eq!(session.history(), "\n");
    }

    #[test]
    fn play_rejects_unknown_text() {
        let mut session = open_session(GameKind::Mancala, quick());
        let err = session.play("z").unwrap_err();
        assert!(matches!(err, ShellError::InvalidMove(_)));
        assert_eq!(session.side_to_move(), Player::One);
    }

    #[test]
    fn think_reports_each_depth_and_plays() {
        let mut session = open_session(GameKind::TicTacToe, quick());
        let mut out = Vec::new();
        let mv = session.think(&mut out).unwrap();
        assert!(mv.is_some());
        assert_eq!(session.side_to_move(), Player::Two);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Depth ").count(), 3);
        assert!(text.contains("PV:"));
    }

    #[test]
    fn think_on_finished_game_is_none() {
        let mut session = open_session(GameKind::TicTacToe, quick());
        for cell in ["0", "3", "1", "4", "2"] {
            session.play(cell).unwrap();
        }
        assert_eq!(session.outcome(), Outcome::Won(Player::One));
        let mut out = Vec::new();
        assert_eq!(session.think(&mut out).unwrap(), None);
        assert!(out.is_empty());
    }

    #[test]
    fn perft_leaves_position_alone() {
        let mut session = open_session(GameKind::Gobblet, quick());
        let before = session.render();
        assert_eq!(session.perft(1).leaves(), 27);
        assert_eq!(session.render(), before);
    }
}
