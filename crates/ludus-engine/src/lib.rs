//! Game-tree search over any [`ludus_core::Position`].

mod error;
pub mod search;

pub use error::{ParseAlgorithmError, SearchError};
pub use search::control::SearchControl;
pub use search::pv::PvTable;
pub use search::tt::{Bound, Replacement, TranspositionTable, TtProbeResult};
pub use search::{
    Algorithm, INF, Iteration, MATE_THRESHOLD, SearchConfig, SearchResult, SearchStats, Searcher,
};
