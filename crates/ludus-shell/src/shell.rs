//! The interactive command loop.

use std::io::{BufRead, Write};
use std::ops::ControlFlow;
use std::time::Instant;

use tracing::{debug, info, warn};

use ludus_core::Player;
use ludus_engine::SearchConfig;
use ludus_games::GameKind;

use crate::command::{Command, parse_command};
use crate::error::ShellError;
use crate::session::{GameSession, open_session};

const HELP: &str = "\
Commands:
  help              show this list
  game <name>       start tictactoe, mancala or gobbletgobblers
  go                the computer plays the side to move from now on
  new               restart the current game
  undo              take back one move (the computer stops playing)
  perft [depth]     count the move tree up to depth (default 4)
  eval              static score for the side to move
  history           list the moves played
  depth <n>         deepest search iteration
  time <seconds>    search budget per move, 0 for unlimited
  quit | exit       leave
Anything else is read as a move.";

/// Reads commands from `input`, writes boards and reports to `output`.
pub struct Shell<R, W> {
    input: R,
    output: W,
    config: SearchConfig,
    session: Box<dyn GameSession>,
    computer: Option<Player>,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Open a fresh game of `kind`. The user plays both sides until `go`.
    pub fn new(input: R, output: W, kind: GameKind, config: SearchConfig) -> Self {
        let session = open_session(kind, config.clone());
        Self {
            input,
            output,
            config,
            session,
            computer: None,
        }
    }

    /// Let the computer play `side` from the first move.
    pub fn with_computer(mut self, side: Option<Player>) -> Self {
        self.computer = side;
        self
    }

    /// Run until `quit` or end of input.
    pub fn run(&mut self) -> Result<(), ShellError> {
        self.computer_turns()?;

        let mut line = String::new();
        loop {
            writeln!(self.output, "{}", self.session.render())?;
            write!(self.output, "{}> ", self.session.kind())?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                debug!("input closed");
                break;
            }

            let outcome = parse_command(&line).and_then(|command| {
                debug!(?command, "shell command");
                self.execute(command)
            });
            match outcome {
                Ok(ControlFlow::Break(())) => break,
                Ok(ControlFlow::Continue(())) => {}
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    warn!(error = %err, "command failed");
                    writeln!(self.output, "{err}")?;
                    continue;
                }
            }

            self.computer_turns()?;
        }

        info!("ludus shutting down");
        Ok(())
    }

    fn execute(&mut self, command: Command) -> Result<ControlFlow<()>, ShellError> {
        match command {
            Command::Empty => {}
            Command::Help => writeln!(self.output, "{HELP}")?,
            Command::Quit => return Ok(ControlFlow::Break(())),
            Command::Game(kind) => self.open(kind),
            Command::New => self.open(self.session.kind()),
            Command::Go => self.computer = Some(self.session.side_to_move()),
            Command::Undo => {
                self.computer = None;
                self.session.undo();
            }
            Command::Eval => writeln!(self.output, "Score: {}", self.session.evaluate())?,
            Command::History => write!(self.output, "{}", self.session.history())?,
            Command::Perft(depth) => self.perft(depth)?,
            Command::Depth(depth) => {
                self.config.max_depth = depth;
                self.session.set_max_depth(depth);
            }
            Command::Time(budget) => {
                self.config.max_time = budget;
                self.session.set_max_time(budget);
            }
            Command::Move(text) => self.session.play(&text)?,
        }
        Ok(ControlFlow::Continue(()))
    }

    fn open(&mut self, kind: GameKind) {
        info!(game = %kind, "new game");
        self.session = open_session(kind, self.config.clone());
        self.computer = None;
    }

    /// Counts for every depth from 0 up to `max_depth`.
    fn perft(&mut self, max_depth: u8) -> Result<(), ShellError> {
        for depth in 0..=max_depth {
            let start = Instant::now();
            let stats = self.session.perft(depth);
            let secs = start.elapsed().as_secs_f64();
            let nps = if secs > 0.0 {
                (stats.nodes as f64 / secs) as u64
            } else {
                stats.nodes
            };
            writeln!(
                self.output,
                "perft({depth}): {} leaves ({} ongoing, {} player 1 wins, \
                 {} player 2 wins, {} draws)",
                stats.leaves(),
                stats.ongoing,
                stats.player1,
                stats.player2,
                stats.draw,
            )?;
            writeln!(
                self.output,
                "\t{} nodes in {secs:.3}s ({nps} nodes/sec)",
                stats.nodes
            )?;
        }
        Ok(())
    }

    /// The computer moves for as long as it is its turn, bonus turns included.
    fn computer_turns(&mut self) -> Result<(), ShellError> {
        while self.computer == Some(self.session.side_to_move())
            && !self.session.outcome().is_over()
        {
            writeln!(self.output, "{}", self.session.render())?;
            match self.session.think(&mut self.output) {
                Ok(Some(mv)) => writeln!(self.output, "Move: {mv}")?,
                Ok(None) => break,
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    warn!(error = %err, "engine could not move");
                    writeln!(self.output, "{err}")?;
                    self.computer = None;
                }
            }
        }
        Ok(())
    }
}
