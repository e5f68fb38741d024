// File: src/error.rs
use thiserror::Error;

use crate::core::types::PairKey;

/// Errors raised while building or querying a collocation finder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollocationError {
    /// Window bounds or window size that cannot describe any scan.
    #[error("invalid window configuration: {0}")]
    Configuration(String),

    /// A token type tag outside `{"word", "ne"}`.
    #[error("type not recognized: {0:?} (expected \"word\" or \"ne\")")]
    InvalidCategory(String),

    /// An association measure name with no matching measure.
    #[error("unknown association measure: {0:?}")]
    UnknownMeasure(String),

    /// The parallel tables disagree for a pair.
    #[error("inconsistent tables for {pair:?}: count={count}, distances={distances}, positions={positions}")]
    Inconsistent {
        pair: PairKey,
        count: u64,
        distances: usize,
        positions: usize,
    },
}

pub type Result<T> = std::result::Result<T, CollocationError>;
