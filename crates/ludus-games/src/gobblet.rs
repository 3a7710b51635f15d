//! Gobblet Gobblers: tic-tac-toe with nesting pieces that can cover smaller ones.
//!
//! Each player holds two pieces in each of three sizes. A move either places
//! a piece from hand or moves a piece already on the board; a piece may land
//! on an empty cell or on top of any strictly smaller piece. Lifting a piece
//! can reveal what it covered, so a move may complete a line for the
//! opponent, which is checked before the mover's own line.

use std::array;
use std::fmt;

use ludus_core::{MoveList, Outcome, Player, Position, WIN_SCORE, zobrist};

use crate::playable::{GameKind, Playable};

const CELLS: usize = 9;
/// Board cells plus six hand stacks: SX MX LX at 9-11, SO MO LO at 12-14.
const STACKS: usize = 15;

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

const CELL_WEIGHT: [i32; CELLS] = [3, 2, 3, 2, 4, 2, 3, 2, 3];
/// Ordering value of a small, medium and large piece.
const SIZE_VALUE: [i32; 3] = [1, 3, 5];
const HAND_BONUS: i32 = 10;
const COVER_BONUS: i32 = 100;
const REVEAL_PENALTY: i32 = 100;
const TEMPO: i32 = 3;

const LABELS: [&str; 7] = ["  ", "SX", "MX", "LX", "SO", "MO", "LO"];

const SEED: u64 = 0x676f_6262_6c65_7421; // "gobblet!"

/// Keys indexed by `cell * 6 + (piece - 1)`, side key last.
static KEYS: [u64; CELLS * 6 + 1] = zobrist::keys(SEED);

#[inline]
fn piece_key(cell: usize, piece: u8) -> u64 {
    KEYS[cell * 6 + usize::from(piece - 1)]
}

#[inline]
fn side_key() -> u64 {
    KEYS[CELLS * 6]
}

/// Size of a piece: 0 small, 1 medium, 2 large.
#[inline]
const fn size(piece: u8) -> u8 {
    (piece - 1) % 3
}

/// Pieces 1-3 belong to player 1, 4-6 to player 2.
#[inline]
const fn owner(piece: u8) -> Player {
    if piece <= 3 { Player::One } else { Player::Two }
}

/// Hand stacks of a player, smallest first.
fn hands(player: Player) -> std::ops::Range<usize> {
    match player {
        Player::One => 9..12,
        Player::Two => 12..15,
    }
}

/// A Gobblet move: take the top piece of stack `from` and put it on cell `to`.
///
/// `from` is a board cell (0-8) or a hand stack (9-14).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gobble {
    pub from: u8,
    pub to: u8,
}

impl Gobble {
    pub const fn new(from: u8, to: u8) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Gobble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.from {
            0..=8 => write!(f, "{}", self.from)?,
            9..=14 => f.write_str(LABELS[usize::from(self.from) - 8])?,
            _ => write!(f, "?{}", self.from)?,
        }
        write!(f, "{}", self.to)
    }
}

/// Gobblet Gobblers position. Player 1 plays X, player 2 plays O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gobblet {
    stacks: [Vec<u8>; STACKS],
    side: Player,
    history: Vec<Gobble>,
    outcome: Outcome,
    hash: u64,
}

impl Gobblet {
    /// Empty board, both hands full, X to move.
    pub fn new() -> Self {
        let stacks = array::from_fn(|i| {
            if i < CELLS {
                Vec::with_capacity(3)
            } else {
                let piece = (i - CELLS + 1) as u8;
                vec![piece, piece]
            }
        });
        Self {
            stacks,
            side: Player::One,
            history: Vec::new(),
            outcome: Outcome::Ongoing,
            hash: 0,
        }
    }

    /// Visible piece on a stack, if any.
    #[inline]
    fn top(&self, stack: usize) -> Option<u8> {
        self.stacks[stack].last().copied()
    }

    /// Owner of the visible piece on a cell.
    #[inline]
    fn top_owner(&self, cell: usize) -> Option<Player> {
        self.top(cell).map(owner)
    }

    /// Whether `piece` may be put on `cell`.
    #[inline]
    fn fits(&self, piece: u8, cell: usize) -> bool {
        self.top(cell).is_none_or(|top| size(top) < size(piece))
    }

    fn line_owned_by(&self, line: &[usize; 3], player: Player) -> bool {
        line.iter().all(|&c| self.top_owner(c) == Some(player))
    }

    fn any_line_through(&self, cell: usize, player: Player) -> bool {
        WIN_LINES
            .iter()
            .filter(|line| line.contains(&cell))
            .any(|line| self.line_owned_by(line, player))
    }

    /// Pieces a player still holds of one size.
    fn in_hand(&self, player: Player, size: usize) -> usize {
        self.stacks[hands(player).start + size].len()
    }
}

impl Default for Gobblet {
    fn default() -> Self {
        Self::new()
    }
}

impl Position for Gobblet {
    type Move = Gobble;

    fn apply(&mut self, mv: Gobble) -> bool {
        let (from, to) = (usize::from(mv.from), usize::from(mv.to));
        if self.outcome.is_over() || to >= CELLS || from >= STACKS || from == to {
            return false;
        }
        let Some(piece) = self.top(from) else {
            return false;
        };
        if owner(piece) != self.side || !self.fits(piece, to) {
            return false;
        }

        self.stacks[from].pop();
        if from < CELLS {
            self.hash ^= piece_key(from, piece);
        }
        self.stacks[to].push(piece);
        self.hash ^= piece_key(to, piece);

        let mover = self.side;
        if from < CELLS && self.any_line_through(from, !mover) {
            self.outcome = Outcome::Won(!mover);
        } else if self.any_line_through(to, mover) {
            self.outcome = Outcome::Won(mover);
        }

        self.side = !self.side;
        self.hash ^= side_key();
        self.history.push(mv);
        true
    }

    fn undo(&mut self) {
        let Some(mv) = self.history.pop() else {
            return;
        };
        let (from, to) = (usize::from(mv.from), usize::from(mv.to));
        self.side = !self.side;
        self.hash ^= side_key();
        if let Some(piece) = self.stacks[to].pop() {
            self.hash ^= piece_key(to, piece);
            if from < CELLS {
                self.hash ^= piece_key(from, piece);
            }
            self.stacks[from].push(piece);
        }
        self.outcome = Outcome::Ongoing;
    }

    fn generate(&self, _ply: usize, _depth: u8) -> MoveList<Gobble> {
        let mut list = MoveList::with_capacity(64);
        let enemy = Some(!self.side);

        for from in hands(self.side) {
            let Some(piece) = self.top(from) else {
                continue;
            };
            for to in 0..CELLS {
                if !self.fits(piece, to) {
                    continue;
                }
                let mut score = CELL_WEIGHT[to] + SIZE_VALUE[usize::from(size(piece))] + HAND_BONUS;
                if self.top_owner(to) == enemy {
                    score += COVER_BONUS;
                }
                list.push(Gobble::new(from as u8, to as u8), score);
            }
        }

        for from in 0..CELLS {
            let Some(piece) = self.top(from) else {
                continue;
            };
            if owner(piece) != self.side {
                continue;
            }
            let stack = &self.stacks[from];
            let reveals_enemy = stack.len() >= 2 && Some(owner(stack[stack.len() - 2])) == enemy;
            for to in 0..CELLS {
                if to == from || !self.fits(piece, to) {
                    continue;
                }
                let mut score = SIZE_VALUE[usize::from(size(piece))];
                if self.top_owner(to) == enemy {
                    score += COVER_BONUS;
                }
                if reveals_enemy {
                    score -= REVEAL_PENALTY;
                }
                list.push(Gobble::new(from as u8, to as u8), score);
            }
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
        for cell in 0..CELLS {
            if let Some(player) = self.top_owner(cell) {
                score[player.index()] += CELL_WEIGHT[cell];
            }
        }
        score[self.side.index()] += TEMPO;
        for player in Player::ALL {
            score[player.index()] += 3 * self.in_hand(player, 0) as i32;
            score[player.index()] -= 10 * self.in_hand(player, 2) as i32;
        }
        score[self.side.index()] - score[(!self.side).index()]
    }

    fn hash_key(&self) -> u64 {
        self.hash
    }
}

impl Playable for Gobblet {
    const KIND: GameKind = GameKind::Gobblet;

    fn new_game() -> Self {
        Self::new()
    }

    fn history(&self) -> Vec<(Player, Gobble)> {
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

fn side_letter(player: Player) -> char {
    match player {
        Player::One => 'X',
        Player::Two => 'O',
    }
}

impl Gobblet {
    fn write_hand(&self, f: &mut fmt::Formatter<'_>, player: Player) -> fmt::Result {
        for stack in hands(player) {
            for &piece in &self.stacks[stack] {
                write!(f, "{} ", LABELS[usize::from(piece)])?;
            }
        }
        writeln!(f)
    }

    fn label(&self, cell: usize) -> &'static str {
        LABELS[usize::from(self.top(cell).unwrap_or(0))]
    }
}

impl fmt::Display for Gobblet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_hand(f, Player::Two)?;
        writeln!(f)?;
        for row in 0..3 {
            if row > 0 {
                writeln!(f, "--+--+--")?;
            }
            let c = row * 3;
            writeln!(f, "{}|{}|{}", self.label(c), self.label(c + 1), self.label(c + 2))?;
        }
        writeln!(f)?;
        self.write_hand(f, Player::One)?;
        writeln!(f)?;
        match self.outcome {
            Outcome::Won(player) => writeln!(f, "Winner: {}", side_letter(player))?,
            Outcome::Draw => writeln!(f, "Winner: Draw")?,
            Outcome::Ongoing => writeln!(f, "{} to move", side_letter(self.side))?,
        }
        writeln!(f, "Hash: {:016x}", self.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Hand stacks by name.
    const SX: u8 = 9;
    const MX: u8 = 10;
    const LX: u8 = 11;
    const SO: u8 = 12;
    const MO: u8 = 13;
    const LO: u8 = 14;

    fn play_all(pos: &mut Gobblet, moves: &[(u8, u8)]) {
        for &(from, to) in moves {
            let mv = Gobble::new(from, to);
            assert!(pos.apply(mv), "{mv} should be legal");
        }
    }

    #[test]
    fn move_names() {
        assert_eq!(Gobble::new(SX, 4).to_string(), "SX4");
        assert_eq!(Gobble::new(LO, 0).to_string(), "LO0");
        assert_eq!(Gobble::new(3, 8).to_string(), "38");
    }

    #[test]
    fn opening_has_twenty_seven_placements() {
        let pos = Gobblet::new();
        let list = pos.generate(0, 1);
        assert_eq!(list.len(), 27);
        assert!(list.moves().all(|m| (SX..=LX).contains(&m.from)));
    }

    #[test]
    fn opening_ordering_prefers_large_in_center() {
        let mut list = Gobblet::new().generate(0, 1);
        list.sort_by_score();
        assert_eq!(list.first(), Some(Gobble::new(LX, 4)));
        assert_eq!(list[0].score, 4 + 5 + 10);
    }

    #[test]
    fn larger_piece_covers_smaller() {
        let mut pos = Gobblet::new();
        play_all(&mut pos, &[(SX, 4)]);
        assert!(!pos.apply(Gobble::new(SO, 4)), "same size cannot cover");
        assert!(pos.apply(Gobble::new(MO, 4)));
        assert_eq!(pos.top_owner(4), Some(Player::Two));
    }

    #[test]
    fn covering_an_enemy_is_ordered_first() {
        let mut pos = Gobblet::new();
        play_all(&mut pos, &[(SX, 4)]);
        let mut list = pos.generate(0, 1);
        list.sort_by_score();
        assert_eq!(list.first(), Some(Gobble::new(LO, 4)));
        assert_eq!(list[0].score, 4 + 5 + 10 + 100);
    }

    #[test]
    fn cannot_move_opponent_piece_or_empty_stack() {
        let mut pos = Gobblet::new();
        play_all(&mut pos, &[(SX, 0)]);
        let before = pos.clone();
        assert!(!pos.apply(Gobble::new(0, 1)), "piece on 0 belongs to X");
        assert!(!pos.apply(Gobble::new(SX, 1)), "X's hand while O is to move");
        assert!(!pos.apply(Gobble::new(5, 1)), "empty cell");
        assert!(!pos.apply(Gobble::new(SO, 9)), "off the board");
        assert_eq!(pos, before);
    }

    #[test]
    fn three_in_a_row_wins() {
        let mut pos = Gobblet::new();
        play_all(&mut pos, &[(SX, 0), (SO, 3), (SX, 1), (MO, 4), (MX, 2)]);
        assert_eq!(pos.winner(), Outcome::Won(Player::One));
        assert!(!pos.apply(Gobble::new(LO, 8)), "game is over");
    }

    #[test]
    fn revealing_enemy_line_loses_even_when_completing_own() {
        let mut pos = Gobblet::new();
        // X's large piece on 2 hides O's small one; O holds 0 and 1.
        play_all(
            &mut pos,
            &[(SX, 6), (SO, 2), (LX, 2), (SO, 0), (SX, 8), (MO, 1)],
        );
        assert_eq!(pos.winner(), Outcome::Ongoing);
        // Lifting LX off 2 completes 6-7-8 for X but reveals O's 0-1-2 first.
        play_all(&mut pos, &[(2, 7)]);
        assert_eq!(pos.winner(), Outcome::Won(Player::Two));
    }

    #[test]
    fn board_moves_penalize_revealing_enemy() {
        let mut pos = Gobblet::new();
        play_all(&mut pos, &[(SX, 0), (LO, 0), (SX, 8)]);
        let list = pos.generate(0, 1);
        let lift = list
            .iter()
            .find(|e| e.mv == Gobble::new(0, 4))
            .map(|e| e.score);
        assert_eq!(lift, Some(5 - 100));
    }

    #[test]
    fn undo_restores_hash_and_stacks() {
        let mut pos = Gobblet::new();
        let start = pos.clone();
        play_all(&mut pos, &[(SX, 0), (LO, 0), (MX, 4), (0, 8)]);
        for _ in 0..4 {
            pos.undo();
        }
        assert_eq!(pos, start);
        assert_eq!(pos.hash_key(), 0);
    }

    #[test]
    fn evaluate_counts_hands() {
        let pos = Gobblet::new();
        assert_eq!(pos.evaluate(0), TEMPO);
        let mut pos = pos;
        play_all(&mut pos, &[(LX, 4)]);
        // O to move: O has tempo and two large in hand (-20), X one large (-10).
        // X: center 4, small hand +6. O: tempo 3, small hand +6.
        assert_eq!(pos.evaluate(1), (3 + 6 - 20) - (4 + 6 - 10));
    }

    #[test]
    fn display_lists_hands_and_board() {
        let mut pos = Gobblet::new();
        play_all(&mut pos, &[(LX, 4)]);
        let text = pos.to_string();
        assert!(text.starts_with("SO SO MO MO LO LO \n\n"));
        assert!(text.contains("  |LX|  \n"));
        assert!(text.contains("SX SX MX MX LX \n"));
        assert!(text.contains("O to move"));
    }
}
