//! Line-oriented front end: read a command, update the game, let the engine
//! answer when it is its turn.

pub mod command;
pub mod error;
pub mod session;
pub mod shell;

pub use command::{Command, parse_command};
pub use error::ShellError;
pub use session::{GameSession, Session, open_session};
pub use shell::Shell;
