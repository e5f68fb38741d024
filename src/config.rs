// File: src/config.rs
use crate::association::Measure;
use crate::core::finder::BigramCollocationFinder;
use crate::core::types::PairKey;
use crate::core::window::Window;
use crate::error::CollocationError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error
    #[error("failed to read finder config: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error
    #[error("failed to parse finder config: {0}")]
    Parse(#[from] serde_json::Error),
    /// Parsed, but describes an impossible finder
    #[error("finder config rejected: {0}")]
    Invalid(#[from] CollocationError),
}

fn default_window_size() -> usize {
    2
}

/// How the corpus is scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountingMode {
    /// Every token is both pivot and target; windows of `window_size`
    /// positions.
    Symmetric {
        #[serde(default = "default_window_size")]
        window_size: usize,
    },
    /// Explicit pivot and target vocabularies.
    Roles {
        pivots: Vec<String>,
        targets: Vec<String>,
        window: Window,
        #[serde(default)]
        allow_self_reference: bool,
    },
}

impl Default for CountingMode {
    fn default() -> Self {
        CountingMode::Symmetric { window_size: default_window_size() }
    }
}

/// Everything needed to turn a corpus into a ranked list of collocations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinderConfig {
    #[serde(default)]
    pub mode: CountingMode,
    /// Pairs seen fewer times are dropped before scoring.
    #[serde(default)]
    pub min_freq: u64,
    #[serde(default)]
    pub measure: Measure,
}

impl FinderConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: FinderConfig = serde_json::from_reader(reader)?;
        info!(path = %path.display(), measure = %config.measure, "loaded finder config");
        Ok(config)
    }

    /// Builds the finder for `corpus` and applies the frequency filter.
    pub fn build<S: AsRef<str>>(&self, corpus: &[S]) -> Result<BigramCollocationFinder, ConfigError> {
        let finder = match &self.mode {
            CountingMode::Symmetric { window_size } => {
                BigramCollocationFinder::from_words(corpus, *window_size)?
            }
            CountingMode::Roles { pivots, targets, window, allow_self_reference } => {
                BigramCollocationFinder::from_roles(
                    pivots.iter().cloned(),
                    targets.iter().cloned(),
                    corpus,
                    *window,
                    *allow_self_reference,
                )?
            }
        };
        Ok(finder.apply_freq_filter(self.min_freq))
    }

    /// The `n` best pairs of `corpus` under the configured measure.
    pub fn rank<S: AsRef<str>>(&self, corpus: &[S], n: usize) -> Result<Vec<(PairKey, f64)>, ConfigError> {
        let finder = self.build(corpus)?;
        let mut scored = finder.score_ngrams(self.measure.as_fn());
        scored.truncate(n);
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default_config() {
        let config = FinderConfig::from_json_str("{}").unwrap();
        assert_eq!(config, FinderConfig::default());
        assert_eq!(config.measure, Measure::Pmi);
    }

    #[test]
    fn parses_roles_mode() {
        let json = r#"{
            "mode": {"roles": {
                "pivots": ["numbers"],
                "targets": ["calls", "personal"],
                "window": {"kind": "offsets", "min": 3, "max": 4}
            }},
            "measure": "dice"
        }"#;
        let config = FinderConfig::from_json_str(json).unwrap();
        assert_eq!(config.measure, Measure::Dice);
        match config.mode {
            CountingMode::Roles { ref pivots, window, allow_self_reference, .. } => {
                assert_eq!(pivots, &vec!["numbers".to_string()]);
                assert_eq!(window, Window::Offsets { min: 3, max: 4 });
                assert!(!allow_self_reference);
            }
            other => panic!("unexpected mode {other:?}"),
        }
    }

    #[test]
    fn unknown_measure_is_a_parse_error() {
        let err = FinderConfig::from_json_str(r#"{"measure": "mutual_info"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn invalid_window_surfaces_on_build() {
        let config = FinderConfig::from_json_str(
            r#"{"mode": {"roles": {"pivots": ["a"], "targets": ["b"],
                "window": {"kind": "offsets", "min": 5, "max": 2}}}}"#,
        )
        .unwrap();
        let err = config.build(&["a", "b"]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(CollocationError::Configuration(_))));
    }
}
