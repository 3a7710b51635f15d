//! Shell command parsing.

use std::time::Duration;

use ludus_games::GameKind;

use crate::error::ShellError;

/// Perft depth used when `perft` is given no argument.
pub const DEFAULT_PERFT_DEPTH: u8 = 4;

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `help` -- list the commands.
    Help,
    /// `game <name>` -- switch to a fresh game of another kind.
    Game(GameKind),
    /// `go` -- the engine takes over the side to move.
    Go,
    /// `new` -- restart the current game.
    New,
    /// `undo` -- take back one move and hand control back to the user.
    Undo,
    /// `quit` or `exit`.
    Quit,
    /// `perft [depth]` -- count the move tree for every depth up to this one.
    Perft(u8),
    /// `eval` -- static score for the side to move.
    Eval,
    /// `history` -- the moves played so far.
    History,
    /// `depth <n>` -- deepest iteration the engine may run.
    Depth(u8),
    /// `time <seconds>` -- engine budget per move, `0` for unlimited.
    Time(Option<Duration>),
    /// Anything else is taken to be a move.
    Move(String),
    /// Blank line.
    Empty,
}

/// Parse a single line of input into a [`Command`].
pub fn parse_command(line: &str) -> Result<Command, ShellError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(&name) = tokens.first() else {
        return Ok(Command::Empty);
    };
    let arg = tokens.get(1).copied();

    match name {
        "help" => Ok(Command::Help),
        "go" => Ok(Command::Go),
        "new" => Ok(Command::New),
        "undo" => Ok(Command::Undo),
        "quit" | "exit" => Ok(Command::Quit),
        "eval" => Ok(Command::Eval),
        "history" => Ok(Command::History),
        "game" => {
            let kind = require(arg, name)?.parse::<GameKind>()?;
            Ok(Command::Game(kind))
        }
        "perft" => match arg {
            Some(value) => Ok(Command::Perft(parse_value(value, name)?)),
            None => Ok(Command::Perft(DEFAULT_PERFT_DEPTH)),
        },
        "depth" => Ok(Command::Depth(parse_value(require(arg, name)?, name)?)),
        "time" => parse_time(require(arg, name)?),
        _ => Ok(Command::Move(line.trim().to_string())),
    }
}

fn require<'a>(arg: Option<&'a str>, command: &str) -> Result<&'a str, ShellError> {
    arg.ok_or_else(|| ShellError::MissingValue {
        command: command.to_string(),
    })
}

fn parse_value<T: std::str::FromStr>(value: &str, command: &str) -> Result<T, ShellError> {
    value.parse().map_err(|_| ShellError::InvalidValue {
        command: command.to_string(),
        value: value.to_string(),
    })
}

/// Seconds, fractional allowed. Zero lifts the limit.
fn parse_time(value: &str) -> Result<Command, ShellError> {
    let secs: f64 = parse_value(value, "time")?;
    if secs == 0.0 {
        return Ok(Command::Time(None));
    }
    let budget = Duration::try_from_secs_f64(secs).map_err(|_| ShellError::InvalidValue {
        command: "time".to_string(),
        value: value.to_string(),
    })?;
    Ok(Command::Time(Some(budget)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bare_commands() {
        assert_eq!(parse_command("help").unwrap(), Command::Help);
        assert_eq!(parse_command("go").unwrap(), Command::Go);
        assert_eq!(parse_command("new").unwrap(), Command::New);
        assert_eq!(parse_command("undo").unwrap(), Command::Undo);
        assert_eq!(parse_command("eval").unwrap(), Command::Eval);
        assert_eq!(parse_command("history").unwrap(), Command::History);
    }

    #[test]
    fn parse_quit_and_exit() {
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
        assert_eq!(parse_command("  exit\n").unwrap(), Command::Quit);
    }

    #[test]
    fn parse_game() {
        assert_eq!(
            parse_command("game mancala").unwrap(),
            Command::Game(GameKind::Mancala)
        );
        assert_eq!(
            parse_command("game gobbletgobblers").unwrap(),
            Command::Game(GameKind::Gobblet)
        );
    }

    #[test]
    fn parse_game_unknown() {
        let err = parse_command("game chess").unwrap_err();
        assert!(matches!(err, ShellError::UnknownGame(_)));
    }

    #[test]
    fn parse_game_missing_name() {
        let err = parse_command("game").unwrap_err();
        assert!(matches!(err, ShellError::MissingValue { command } if command == "game"));
    }

    #[test]
    fn parse_perft_default_depth() {
        assert_eq!(
            parse_command("perft").unwrap(),
            Command::Perft(DEFAULT_PERFT_DEPTH)
        );
        assert_eq!(parse_command("perft 6").unwrap(), Command::Perft(6));
    }

    #[test]
    fn parse_perft_invalid_depth() {
        let err = parse_command("perft deep").unwrap_err();
        assert!(matches!(err, ShellError::InvalidValue { value, .. } if value == "deep"));
    }

    #[test]
    fn parse_depth() {
        assert_eq!(parse_command("depth 7").unwrap(), Command::Depth(7));
        assert!(parse_command("depth").is_err());
        assert!(parse_command("depth 300").is_err());
    }

    #[test]
    fn parse_time_seconds() {
        assert_eq!(
            parse_command("time 2.5").unwrap(),
            Command::Time(Some(Duration::from_millis(2500)))
        );
        assert_eq!(parse_command("time 0").unwrap(), Command::Time(None));
    }

    #[test]
    fn parse_time_rejects_negative() {
        let err = parse_command("time -1").unwrap_err();
        assert!(matches!(err, ShellError::InvalidValue { command, .. } if command == "time"));
        assert!(parse_command("time soon").is_err());
    }

    #[test]
    fn anything_else_is_a_move() {
        assert_eq!(parse_command("4").unwrap(), Command::Move("4".into()));
        assert_eq!(parse_command(" SX4 \n").unwrap(), Command::Move("SX4".into()));
    }

    #[test]
    fn parse_empty_line() {
        assert_eq!(parse_command("").unwrap(), Command::Empty);
        assert_eq!(parse_command("   \n").unwrap(), Command::Empty);
    }
}
