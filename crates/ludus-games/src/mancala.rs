//! Kalah-style mancala: six pits a side, four seeds each, stores at 6 and 13.

use std::fmt;

use ludus_core::{KillerTable, MoveList, Outcome, Player, Position, WIN_SCORE, zobrist};

use crate::playable::{GameKind, Playable};

const PITS: usize = 14;
const SEEDS_PER_PIT: u8 = 4;
const TOTAL_SEEDS: usize = 12 * SEEDS_PER_PIT as usize;

/// Store of player 1.
const STORE_ONE: usize = 6;
/// Store of player 2.
const STORE_TWO: usize = 13;

const KILLER_BONUS: i32 = 1_000_000;

const SEED: u64 = 0x6d61_6e63_616c_6121; // "mancala!"

/// Keys indexed by `pit * 49 + seed_count`, side key last.
static KEYS: [u64; PITS * (TOTAL_SEEDS + 1) + 1] = zobrist::keys(SEED);

#[inline]
fn side_key() -> u64 {
    KEYS[PITS * (TOTAL_SEEDS + 1)]
}

/// A mancala move: the pit to sow from.
///
/// Player 1 owns pits 0-5 (`a`-`f`), player 2 owns pits 7-12 (`A`-`F`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pit(pub u8);

impl Pit {
    /// Board index of the pit.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Pit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0..=5 => write!(f, "{}", (b'a' + self.0) as char),
            7..=12 => write!(f, "{}", (b'A' + self.0 - 7) as char),
            // Stores and out-of-range indices are never playable.
            other => write!(f, "?{other}"),
        }
    }
}

/// Everything `apply` changes, saved so `undo` can put it back.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    pits: [u8; PITS],
    side: Player,
    hash: u64,
    mv: Pit,
}

/// Mancala position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mancala {
    pits: [u8; PITS],
    side: Player,
    history: Vec<Snapshot>,
    outcome: Outcome,
    hash: u64,
    killers: KillerTable<Pit>,
}

/// Pits a player may sow from.
fn own_pits(player: Player) -> std::ops::Range<usize> {
    match player {
        Player::One => 0..6,
        Player::Two => 7..13,
    }
}

fn store_of(player: Player) -> usize {
    match player {
        Player::One => STORE_ONE,
        Player::Two => STORE_TWO,
    }
}

/// Pit across the board from `pit`.
#[inline]
const fn opposite(pit: usize) -> usize {
    12 - pit
}

impl Mancala {
    /// Starting position, player 1 to move.
    pub fn new() -> Self {
        let mut pits = [SEEDS_PER_PIT; PITS];
        pits[STORE_ONE] = 0;
        pits[STORE_TWO] = 0;
        let mut pos = Self {
            pits,
            side: Player::One,
            history: Vec::new(),
            outcome: Outcome::Ongoing,
            hash: 0,
            killers: KillerTable::new(),
        };
        pos.hash = pos.compute_hash();
        pos
    }

    /// Seed counts, indexed by pit. Stores sit at 6 and 13.
    pub fn pits(&self) -> &[u8; PITS] {
        &self.pits
    }

    /// Seeds on player 1's half including its store, and likewise for player 2.
    pub fn totals(&self) -> (u32, u32) {
        let sum = |range: std::ops::RangeInclusive<usize>| {
            self.pits[range].iter().map(|&s| u32::from(s)).sum::<u32>()
        };
        (sum(0..=STORE_ONE), sum(7..=STORE_TWO))
    }

    fn compute_hash(&self) -> u64 {
        let mut hash = self
            .pits
            .iter()
            .enumerate()
            .fold(0, |h, (pit, &count)| h ^ KEYS[pit * (TOTAL_SEEDS + 1) + count as usize]);
        if self.side == Player::Two {
            hash ^= side_key();
        }
        hash
    }

    /// Sow the seeds of `from` counter-clockwise, skipping the opponent's
    /// store, and return the pit that received the last seed.
    fn sow(&mut self, from: usize) -> usize {
        let skip = store_of(!self.side);
        let mut in_hand = self.pits[from];
        self.pits[from] = 0;
        let mut spot = from;
        while in_hand > 0 {
            spot = (spot + 1) % PITS;
            if spot == skip {
                spot = (spot + 1) % PITS;
            }
            self.pits[spot] += 1;
            in_hand -= 1;
        }
        spot
    }

    fn side_is_empty(&self, player: Player) -> bool {
        own_pits(player).all(|i| self.pits[i] == 0)
    }
}

impl Default for Mancala {
    fn default() -> Self {
        Self::new()
    }
}

impl Position for Mancala {
    type Move = Pit;

    fn apply(&mut self, mv: Pit) -> bool {
        let from = mv.index();
        if self.outcome.is_over() || !own_pits(self.side).contains(&from) || self.pits[from] == 0 {
            return false;
        }

        self.history.push(Snapshot {
            pits: self.pits,
            side: self.side,
            hash: self.hash,
            mv,
        });

        let mover = self.side;
        let last = self.sow(from);

        if self.pits[last] == 1
            && own_pits(mover).contains(&last)
            && self.pits[opposite(last)] > 0
        {
            let captured = self.pits[opposite(last)] + self.pits[last];
            self.pits[store_of(mover)] += captured;
            self.pits[opposite(last)] = 0;
            self.pits[last] = 0;
        }

        if last != store_of(mover) {
            self.side = !self.side;
        }

        if self.side_is_empty(self.side) {
            let (one, two) = self.totals();
            self.outcome = match one.cmp(&two) {
                std::cmp::Ordering::Greater => Outcome::Won(Player::One),
                std::cmp::Ordering::Less => Outcome::Won(Player::Two),
                std::cmp::Ordering::Equal => Outcome::Draw,
            };
        }

        self.hash = self.compute_hash();
        true
    }

    fn undo(&mut self) {
        let Some(snapshot) = self.history.pop() else {
            return;
        };
        self.pits = snapshot.pits;
        self.side = snapshot.side;
        self.hash = snapshot.hash;
        self.outcome = Outcome::Ongoing;
    }

    fn generate(&self, ply: usize, _depth: u8) -> MoveList<Pit> {
        let mut list = MoveList::with_capacity(6);
        for i in own_pits(self.side) {
            if self.pits[i] > 0 {
                list.push(Pit(i as u8), 0);
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
        for player in Player::ALL {
            let store = store_of(player);
            let mut s = 5 * i32::from(self.pits[store]);
            for i in own_pits(player) {
                let seeds = self.pits[i];
                s += 2 * i32::from(seeds);
                if seeds == 0 {
                    // An empty pit threatens whatever sits across from it.
                    s += i32::from(self.pits[opposite(i)]);
                } else if usize::from(seeds) == store - i {
                    // Sowing from here ends in the store for a bonus turn.
                    s += 5;
                }
            }
            score[player.index()] = s;
        }
        score[self.side.index()] - score[(!self.side).index()]
    }

    fn hash_key(&self) -> u64 {
        self.hash
    }

    fn on_fail_high(&mut self, mv: Pit, ply: usize, _depth: u8) {
        self.killers.store(ply, mv);
    }

    fn on_principal_variation(&mut self, pv: &[Pit]) {
        self.killers.seed_from_pv(pv);
    }

    fn on_search_reset(&mut self) {
        self.killers.clear();
    }
}

impl Playable for Mancala {
    const KIND: GameKind = GameKind::Mancala;

    fn new_game() -> Self {
        Self::new()
    }

    fn history(&self) -> Vec<(Player, Pit)> {
        self.history.iter().map(|s| (s.side, s.mv)).collect()
    }
}

impl fmt::Display for Mancala {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "    ")?;
        for i in (7..=12).rev() {
            write!(f, "{:2} ", self.pits[i])?;
        }
        writeln!(f)?;
        writeln!(
            f,
            " {:2} ------------------ {:2}",
            self.pits[STORE_TWO], self.pits[STORE_ONE]
        )?;
        write!(f, "    ")?;
        for i in 0..6 {
            write!(f, "{:2} ", self.pits[i])?;
        }
        writeln!(f)?;
        let (one, two) = self.totals();
        match self.outcome {
            Outcome::Won(player) => writeln!(f, "Player {} won ({one} - {two})", player.number())?,
            Outcome::Draw => writeln!(f, "Draw ({one} - {two})")?,
            Outcome::Ongoing => writeln!(f, "Player {} to move", self.side.number())?,
        }
        writeln!(f, "Hash: {:016x}", self.hash)
    }
}
