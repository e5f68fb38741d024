// src/lib.rs

pub mod association;
pub mod config;
pub mod core;
pub mod error;
pub mod rte;

pub use crate::association::Measure;
pub use crate::config::{ConfigError, CountingMode, FinderConfig};
pub use crate::core::finder::BigramCollocationFinder;
pub use crate::core::types::{FreqDist, PairKey, PositionLists};
pub use crate::core::window::Window;
pub use crate::error::{CollocationError, Result};
