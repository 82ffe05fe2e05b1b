use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CompareError, CompareResult};
use crate::options::ComparisonOption;
use crate::result::DiffSettings;

/// Configuration for a [`GrainComparator`](crate::GrainComparator).
///
/// Every field has a default, so configuration text only needs to name what
/// it changes.
///
/// ```rust
/// use mg_compare::CompareConfig;
///
/// let config = CompareConfig::from_toml_str(r#"
///     keep_only_last = true
///
///     [[options]]
///     path = "origin_timestamp"
///     kind = "exclude"
/// "#).unwrap();
/// assert!(config.keep_only_last);
/// assert_eq!(config.options.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Options applied to every comparison.
    pub options: Vec<ComparisonOption>,
    /// Retain only the most recent element comparison when comparing
    /// sequences.
    pub keep_only_last: bool,
    /// Wall-clock budget for a single payload diff, in milliseconds. Past
    /// it the diff falls back to an approximate edit script.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_timeout_ms: Option<u64>,
    /// Edit operations rendered for a failing payload diff.
    pub max_rendered_ops: usize,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            keep_only_last: false,
            diff_timeout_ms: None,
            max_rendered_ops: 5,
        }
    }
}

impl CompareConfig {
    /// Parse a configuration from TOML.
    pub fn from_toml_str(text: &str) -> CompareResult<Self> {
        toml::from_str(text).map_err(|e| CompareError::ConfigParse(e.to_string()))
    }

    /// Parse a configuration from JSON.
    pub fn from_json_str(text: &str) -> CompareResult<Self> {
        serde_json::from_str(text).map_err(|e| CompareError::ConfigParse(e.to_string()))
    }

    /// A configuration with the given options and defaults elsewhere.
    pub fn with_options(options: impl IntoIterator<Item = ComparisonOption>) -> Self {
        Self {
            options: options.into_iter().collect(),
            ..Default::default()
        }
    }

    pub(crate) fn diff_settings(&self) -> DiffSettings {
        DiffSettings {
            deadline: self.diff_timeout_ms.map(Duration::from_millis),
            max_rendered_ops: self.max_rendered_ops,
        }
    }
}
