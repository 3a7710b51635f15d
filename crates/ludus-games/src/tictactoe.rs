//! Tic-tac-toe on a 3x3 grid.

use std::fmt;

use ludus_core::{KillerTable, MoveList, Outcome, Player, Position, WIN_SCORE, zobrist};

use crate::playable::{GameKind, Playable};

/// Every three-in-a-row.
const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Per-cell weight used both for move ordering and static evaluation:
/// center 4, corners 3, edges 2.
const CELL_WEIGHT: [i32; 9] = [3, 2, 3, 2, 4, 2, 3, 2, 3];

/// Evaluation bonus for having the move.
const TEMPO: i32 = 3;

/// Ordering bonus for the killer move at the current ply.
const KILLER_BONUS: i32 = 1_000_000;

const SEED: u64 = 0x7469_6374_6163_746f; // "tictacto"

/// Keys indexed by `cell * 2 + player`, side-to-move key last.
static KEYS: [u64; 19] = zobrist::keys(SEED);

#[inline]
fn side_key() -> u64 {
    KEYS[18]
}

#[inline]
fn cell_key(cell: usize, player: Player) -> u64 {
    KEYS[cell * 2 + player.index()]
}

/// A tic-tac-toe move: the index (0-8, row-major) of the cell to mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell(pub u8);

impl Cell {
    /// Index of the cell, row-major from the top-left.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tic-tac-toe position. Player 1 plays X, player 2 plays O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicTacToe {
    cells: [Option<Player>; 9],
    side: Player,
    history: Vec<Cell>,
    outcome: Outcome,
    hash: u64,
    killers: KillerTable<Cell>,
}

impl TicTacToe {
    /// Empty board, X to move.
    pub fn new() -> Self {
        Self {
            cells: [None; 9],
            side: Player::One,
            history: Vec::new(),
            outcome: Outcome::Ongoing,
            hash: 0,
            killers: KillerTable::new(),
        }
    }

    /// Owner of each cell, row-major.
    pub fn cells(&self) -> &[Option<Player>; 9] {
        &self.cells
    }

    /// Number of marks on the board.
    pub fn moves_played(&self) -> usize {
        self.history.len()
    }

    fn completes_line(&self, cell: usize, player: Player) -> bool {
        WIN_LINES
            .iter()
            .filter(|line| line.contains(&cell))
            .any(|line| line.iter().all(|&c| self.cells[c] == Some(player)))
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl Position for TicTacToe {
    type Move = Cell;

    fn apply(&mut self, mv: Cell) -> bool {
        let cell = mv.index();
        if cell > 8 || self.cells[cell].is_some() || self.outcome.is_over() {
            return false;
        }

        self.cells[cell] = Some(self.side);
        self.hash ^= cell_key(cell, self.side);
        if self.completes_line(cell, self.side) {
            self.outcome = Outcome::Won(self.side);
        }

        self.side = !self.side;
        self.hash ^= side_key();
        self.history.push(mv);

        if self.history.len() == 9 && !self.outcome.is_over() {
            self.outcome = Outcome::Draw;
        }
        true
    }

    fn undo(&mut self) {
        let Some(mv) = self.history.pop() else {
            return;
        };
        self.side = !self.side;
        self.hash ^= side_key();
        self.cells[mv.index()] = None;
        self.hash ^= cell_key(mv.index(), self.side);
        self.outcome = Outcome::Ongoing;
    }

    fn generate(&self, ply: usize, _depth: u8) -> MoveList<Cell> {
        let mut list = MoveList::with_capacity(9);
        for (i, cell) in self.cells.iter().enumerate() {
            if cell.is_none() {
                list.push(Cell(i as u8), CELL_WEIGHT[i]);
            }
        }
        if let Some(killer) = self.killers.get(ply) {
            list.boost(killer, KILLER_BONUS);
        }
        list
    }

    fn winner(&self) -> Outcome {
        self.outcome
    }

    fn side_to_move(&self) -> Player {
        self.side
    }

    fn evaluate(&self, ply: usize) -> i32 {
        match self.outcome {
            Outcome::Won(player) if player == self.side => return WIN_SCORE - ply as i32,
            Outcome::Won(_) => return -WIN_SCORE + ply as i32,
            Outcome::Draw => return 0,
            Outcome::Ongoing => {}
        }

        let mut score = [0i32; Player::COUNT];
        for (i, cell) in self.cells.iter().enumerate() {
            if let Some(owner) = cell {
                score[owner.index()] += CELL_WEIGHT[i];
            }
        }
        score[self.side.index()] += TEMPO;
        score[self.side.index()] - score[(!self.side).index()]
    }

    fn hash_key(&self) -> u64 {
        self.hash
    }

    fn on_fail_high(&mut self, mv: Cell, ply: usize, _depth: u8) {
        self.killers.store(ply, mv);
    }

    fn on_principal_variation(&mut self, pv: &[Cell]) {
        self.killers.seed_from_pv(pv);
    }

    fn on_search_reset(&mut self) {
        self.killers.clear();
    }
}

impl Playable for TicTacToe {
    const KIND: GameKind = GameKind::TicTacToe;
    const DEPTH_LIMIT: u8 = 9;

    fn new_game() -> Self {
        Self::new()
    }

    fn history(&self) -> Vec<(Player, Cell)> {
        let mut player = Player::One;
        self.history
            .iter()
            .map(|&mv| {
                let entry = (player, mv);
                player = !player;
                entry
            })
            .collect()
    }
}

fn mark(cell: Option<Player>) -> char {
    match cell {
        Some(Player::One) => 'X',
        Some(Player::Two) => 'O',
        None => ' ',
    }
}

fn side_name(player: Player) -> char {
    mark(Some(player))
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            if row > 0 {
                writeln!(f, "-+-+-")?;
            }
            let c = &self.cells[row * 3..row * 3 + 3];
            writeln!(f, "{}|{}|{}", mark(c[0]), mark(c[1]), mark(c[2]))?;
        }
        match self.outcome {
            Outcome::Won(player) => writeln!(f, "Winner: {}", side_name(player))?,
            Outcome::Draw => writeln!(f, "Winner: Draw")?,
            Outcome::Ongoing => writeln!(f, "{} to move", side_name(self.side))?,
        }
        writeln!(f, "Hash: {:016x}", self.hash)
    }
}
