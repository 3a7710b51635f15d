//! Search algorithms and the iterative-deepening driver.

mod alphabeta;
pub mod control;
mod negamax;
pub mod pv;
mod pvs;
mod pvs_hash;
pub mod tt;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use ludus_core::{Outcome, Player, Position, WIN_SCORE};
use tracing::{debug, info, warn};

use crate::error::{ParseAlgorithmError, SearchError};
use control::SearchControl;
use pv::PvTable;
use tt::{Replacement, TranspositionTable};

/// Score representing an unreachable upper/lower bound. A decided game
/// scores `INF - ply` for the winner.
pub const INF: i32 = WIN_SCORE;

/// Scores beyond this magnitude indicate a decided game.
pub const MATE_THRESHOLD: i32 = INF - 1000;

/// Remaining depth at or below which PVS searches every move with the full
/// window.
const FULL_WINDOW_DEPTH: u8 = 2;

/// Ordering bonus for the move stored in the transposition table.
const TT_MOVE_BONUS: i32 = 2_000_000;

/// Which recursive search the driver runs at each depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// Full-width minimax, no pruning.
    Negamax,
    /// Fail-soft alpha-beta with quiescence.
    AlphaBeta,
    /// Principal variation search.
    Pvs,
    /// Principal variation search with a transposition table.
    #[default]
    PvsHash,
}

impl Algorithm {
    /// All algorithms, weakest first.
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Negamax,
        Algorithm::AlphaBeta,
        Algorithm::Pvs,
        Algorithm::PvsHash,
    ];

    /// Command-line name of the algorithm.
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::Negamax => "negamax",
            Algorithm::AlphaBeta => "alphabeta",
            Algorithm::Pvs => "pvs",
            Algorithm::PvsHash => "pvs-hash",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "negamax" => Ok(Algorithm::Negamax),
            "alphabeta" | "alpha-beta" => Ok(Algorithm::AlphaBeta),
            "pvs" => Ok(Algorithm::Pvs),
            "pvs-hash" | "pvshash" => Ok(Algorithm::PvsHash),
            _ => Err(ParseAlgorithmError { name: s.to_string() }),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Deepest iteration to run.
    pub max_depth: u8,
    /// Wall-clock budget checked between iterations. `None` is unlimited.
    pub max_time: Option<Duration>,
    /// Transposition table slots (only allocated for [`Algorithm::PvsHash`]).
    pub tt_capacity: usize,
    /// Search variant.
    pub algorithm: Algorithm,
    /// Transposition table replacement policy.
    pub replacement: Replacement,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_time: Some(Duration::from_secs(5)),
            tt_capacity: 1_000_000,
            algorithm: Algorithm::PvsHash,
            replacement: Replacement::Always,
        }
    }
}

/// Node counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Interior and quiescence nodes visited.
    pub nodes: u64,
    /// Horizon and terminal nodes reached.
    pub leaves: u64,
}

/// One completed iterative-deepening depth.
#[derive(Debug, Clone)]
pub struct Iteration<M> {
    /// Depth just completed.
    pub depth: u8,
    /// Root score relative to the side to move.
    pub score: i32,
    /// Time since the search started.
    pub elapsed: Duration,
    /// Nodes visited since the search started.
    pub nodes: u64,
    /// Leaves reached during this depth.
    pub leaves: u64,
    /// Principal variation at this depth.
    pub pv: Vec<M>,
}

impl<M> Iteration<M> {
    /// Effective branching factor: the `depth`-th root of the leaf count.
    pub fn branching_factor(&self) -> f64 {
        if self.depth == 0 {
            return 0.0;
        }
        (self.leaves as f64).powf(1.0 / f64::from(self.depth))
    }

    /// Nodes per second over the whole search so far.
    pub fn nps(&self) -> u64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            (self.nodes as f64 / secs) as u64
        } else {
            0
        }
    }
}

impl<M: fmt::Display> fmt::Display for Iteration<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Depth {}, Score {}, time {:.2}, nodes {} ({} nps), BF {:.1}\n\tPV:",
            self.depth,
            self.score,
            self.elapsed.as_secs_f64(),
            self.nodes,
            self.nps(),
            self.branching_factor(),
        )?;
        for mv in &self.pv {
            write!(f, " {mv}")?;
        }
        Ok(())
    }
}

/// Result of a completed search.
#[derive(Debug, Clone)]
pub struct SearchResult<M> {
    /// Move that was committed on the position.
    pub best_move: M,
    /// Full principal variation of the last completed depth.
    pub pv: Vec<M>,
    /// Root score of the last completed depth.
    pub score: i32,
    /// Deepest completed depth.
    pub depth: u8,
    /// Total nodes visited.
    pub nodes: u64,
    /// Wall-clock time spent.
    pub elapsed: Duration,
}

/// Search state threaded through the recursive engines.
pub(super) struct SearchContext<'a, M> {
    pub stats: SearchStats,
    pub pv: &'a mut PvTable<M>,
}

/// Score a child that has just been applied.
///
/// When the mover is still to play (a bonus turn) the child is searched at
/// the same depth with the same window. Otherwise the window is negated and
/// flipped, the depth drops by one, and the child's score is negated.
#[inline]
pub(super) fn descend<P, F>(
    child: &mut P,
    mover: Player,
    depth: u8,
    alpha: i32,
    beta: i32,
    search: F,
) -> i32
where
    P: Position,
    F: FnOnce(&mut P, u8, i32, i32) -> i32,
{
    if child.side_to_move() == mover {
        search(child, depth, alpha, beta)
    } else {
        -search(child, depth.saturating_sub(1), -beta, -alpha)
    }
}

/// Value of a node where no candidate was accepted by `apply`.
#[inline]
pub(super) fn no_move_score<P: Position>(pos: &P, ply: usize) -> i32 {
    match pos.winner() {
        Outcome::Draw => 0,
        Outcome::Won(player) if player == pos.side_to_move() => INF - ply as i32,
        Outcome::Won(_) => -INF + ply as i32,
        Outcome::Ongoing => pos.evaluate(ply),
    }
}

/// Iterative-deepening searcher.
///
/// Owns the transposition table and PV buffer, both created once and reused
/// for every search.
pub struct Searcher<M> {
    config: SearchConfig,
    tt: Option<TranspositionTable<M>>,
    pv: PvTable<M>,
}

impl<M: Copy + Eq + fmt::Display> Searcher<M> {
    /// Create a searcher, allocating the transposition table if the
    /// algorithm uses one.
    pub fn new(config: SearchConfig) -> Self {
        let tt = (config.algorithm == Algorithm::PvsHash).then(|| {
            debug!(
                capacity = config.tt_capacity,
                replacement = ?config.replacement,
                "allocating transposition table"
            );
            TranspositionTable::new(config.tt_capacity, config.replacement)
        });
        Self {
            config,
            tt,
            pv: PvTable::new(),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Change the depth limit.
    pub fn set_max_depth(&mut self, depth: u8) {
        self.config.max_depth = depth.max(1);
    }

    /// Change the time budget. `None` is unlimited.
    pub fn set_max_time(&mut self, max_time: Option<Duration>) {
        self.config.max_time = max_time;
    }

    /// The transposition table, if the algorithm uses one.
    pub fn tt(&self) -> Option<&TranspositionTable<M>> {
        self.tt.as_ref()
    }

    /// Clear the transposition table (preserving the allocation).
    pub fn clear_tt(&mut self) {
        if let Some(tt) = self.tt.as_mut() {
            tt.clear();
        }
    }

    /// Principal variation of the last root search.
    pub fn principal_variation(&self) -> &[M] {
        self.pv.root_pv()
    }

    /// Run one full-window root search at `depth` without committing a move.
    pub fn search_depth<P>(&mut self, pos: &mut P, depth: u8) -> i32
    where
        P: Position<Move = M>,
    {
        let mut stats = SearchStats::default();
        self.root(pos, depth, &mut stats)
    }

    fn root<P>(&mut self, pos: &mut P, depth: u8, stats: &mut SearchStats) -> i32
    where
        P: Position<Move = M>,
    {
        let mut ctx = SearchContext {
            stats: *stats,
            pv: &mut self.pv,
        };
        let score = match (self.config.algorithm, self.tt.as_mut()) {
            (Algorithm::Negamax, _) => negamax::negamax(pos, depth, 0, &mut ctx),
            (Algorithm::AlphaBeta, _) => {
                alphabeta::alpha_beta(pos, depth, 0, -INF, INF, &mut ctx)
            }
            (Algorithm::Pvs, _) | (Algorithm::PvsHash, None) => {
                pvs::pvs(pos, depth, 0, -INF, INF, &mut ctx)
            }
            (Algorithm::PvsHash, Some(tt)) => {
                pvs_hash::pvs_hash(pos, depth, 0, -INF, INF, &mut ctx, tt)
            }
        };
        *stats = ctx.stats;
        score
    }

    /// Run iterative deepening and commit the best move on `pos`.
    ///
    /// Returns `Ok(None)` without touching `pos` if the game is already over.
    pub fn search<P>(&mut self, pos: &mut P) -> Result<Option<SearchResult<M>>, SearchError>
    where
        P: Position<Move = M>,
    {
        self.search_with(pos, |_| {})
    }

    /// Run iterative deepening, calling `on_iter` after each completed depth,
    /// then commit the first move of the final principal variation.
    pub fn search_with<P, F>(
        &mut self,
        pos: &mut P,
        mut on_iter: F,
    ) -> Result<Option<SearchResult<M>>, SearchError>
    where
        P: Position<Move = M>,
        F: FnMut(&Iteration<M>),
    {
        if pos.winner().is_over() {
            debug!("search requested on a finished game");
            return Ok(None);
        }

        let control = SearchControl::new(self.config.max_time);
        let mut stats = SearchStats::default();
        let mut completed: Option<Iteration<M>> = None;
        self.pv.clear();
        pos.on_search_reset();

        for depth in 1..=self.config.max_depth.max(1) {
            stats.leaves = 0;
            let score = self.root(pos, depth, &mut stats);
            let pv = self.pv.root_pv().to_vec();
            pos.on_principal_variation(&pv);

            let iteration = Iteration {
                depth,
                score,
                elapsed: control.elapsed(),
                nodes: stats.nodes,
                leaves: stats.leaves,
                pv,
            };
            info!(
                depth,
                score,
                nodes = iteration.nodes,
                elapsed_ms = iteration.elapsed.as_millis() as u64,
                bf = iteration.branching_factor(),
                "iteration complete"
            );
            on_iter(&iteration);
            completed = Some(iteration);

            if control.should_stop_iterating() {
                debug!(depth, "time budget exhausted");
                break;
            }
            if score.abs() > MATE_THRESHOLD {
                debug!(depth, score, "decided score found");
                break;
            }
        }

        let Some(last) = completed else {
            return Err(SearchError::NoLegalMove);
        };
        let Some(&best_move) = last.pv.first() else {
            warn!(score = last.score, "search finished without a principal variation");
            return Err(SearchError::NoLegalMove);
        };
        if !pos.apply(best_move) {
            warn!(mv = %best_move, "position rejected the principal move");
            return Err(SearchError::MoveRejected {
                mv: best_move.to_string(),
            });
        }

        Ok(Some(SearchResult {
            best_move,
            pv: last.pv,
            score: last.score,
            depth: last.depth,
            nodes: stats.nodes,
            elapsed: control.elapsed(),
        }))
    }
}

impl<M> fmt::Debug for Searcher<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Searcher")
            .field("config", &self.config)
            .field("tt", &self.tt)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_names_roundtrip() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.name().parse::<Algorithm>(), Ok(algorithm));
        }
        assert_eq!("AlphaBeta".parse::<Algorithm>(), Ok(Algorithm::AlphaBeta));
        assert!("mtdf".parse::<Algorithm>().is_err());
    }

    #[test]
    fn default_config_values() {
        let config = SearchConfig::default();
        assert_eq!(config.max_depth, 64);
        assert_eq!(config.max_time, Some(Duration::from_secs(5)));
        assert_eq!(config.tt_capacity, 1_000_000);
        assert_eq!(config.algorithm, Algorithm::PvsHash);
        assert_eq!(config.replacement, Replacement::Always);
    }

    #[test]
    fn table_only_allocated_for_pvs_hash() {
        let config = SearchConfig {
            tt_capacity: 16,
            ..SearchConfig::default()
        };
        let hashed: Searcher<u8> = Searcher::new(config.clone());
        assert_eq!(hashed.tt().map(TranspositionTable::capacity), Some(16));

        let plain: Searcher<u8> = Searcher::new(SearchConfig {
            algorithm: Algorithm::Pvs,
            ..config
        });
        assert!(plain.tt().is_none());
    }

    #[test]
    fn branching_factor_and_nps() {
        let iteration: Iteration<u8> = Iteration {
            depth: 2,
            score: 0,
            elapsed: Duration::from_secs(2),
            nodes: 1000,
            leaves: 49,
            pv: vec![],
        };
        assert!((iteration.branching_factor() - 7.0).abs() < 1e-9);
        assert_eq!(iteration.nps(), 500);
    }

    #[test]
    fn iteration_display_lists_pv() {
        let iteration = Iteration {
            depth: 1,
            score: 7,
            elapsed: Duration::ZERO,
            nodes: 10,
            leaves: 9,
            pv: vec![4u8, 0],
        };
        let text = iteration.to_string();
        assert!(text.starts_with("Depth 1, Score 7, time 0.00, nodes 10 (0 nps), BF 9.0"));
        assert!(text.ends_with("\tPV: 4 0"));
    }
}
