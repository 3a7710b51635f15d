//! Core game-tree types: the position contract, players and outcomes,
//! scored move lists, ordering heuristics, Zobrist keys, and perft.

mod heuristics;
mod move_list;
mod outcome;
mod perft;
mod player;
mod position;
pub mod zobrist;

pub use heuristics::KillerTable;
pub use move_list::{MoveList, ScoredMove};
pub use outcome::Outcome;
pub use perft::{PerftStats, divide, perft};
pub use player::Player;
pub use position::{Applied, Position, WIN_SCORE};
