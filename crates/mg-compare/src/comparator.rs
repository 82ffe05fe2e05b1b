use std::borrow::Borrow;

use mg_types::Grain;
use tracing::debug;

use crate::config::CompareConfig;
use crate::grain::grain_node;
use crate::options::{ComparisonOption, OptionSet};
use crate::result::{ComparisonNode, DiffSettings, Site};
use crate::sequence::sequence_node;

// ---------------------------------------------------------------------------
// GrainComparator
// ---------------------------------------------------------------------------

/// Compares grains and grain sequences under a fixed configuration.
///
/// A comparator holds no per-comparison state and can be shared between
/// threads; every call builds a fresh result tree.
#[derive(Clone, Debug)]
pub struct GrainComparator {
    options: OptionSet,
    keep_only_last: bool,
    settings: DiffSettings,
}

impl GrainComparator {
    pub fn new(config: CompareConfig) -> Self {
        debug!(
            options = config.options.len(),
            keep_only_last = config.keep_only_last,
            "created grain comparator"
        );
        Self {
            settings: config.diff_settings(),
            keep_only_last: config.keep_only_last,
            options: OptionSet::new(config.options),
        }
    }

    /// The options applied to every comparison.
    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    /// Compare two grains.
    pub fn compare(&self, a: &Grain, b: &Grain) -> ComparisonNode {
        grain_node(Site::root(&self.options, &self.settings), a, b)
    }

    /// Compare two grain sequences pairwise, stopping at the first
    /// mismatching pair or when either sequence ends.
    pub fn compare_sequences<A, B>(&self, a: A, b: B) -> ComparisonNode
    where
        A: IntoIterator,
        A::Item: Borrow<Grain>,
        B: IntoIterator,
        B::Item: Borrow<Grain>,
    {
        sequence_node(
            Site::root(&self.options, &self.settings),
            a,
            b,
            self.keep_only_last,
        )
    }
}

impl Default for GrainComparator {
    fn default() -> Self {
        Self::new(CompareConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Compare two grains under `options`.
pub fn compare_grain(a: &Grain, b: &Grain, options: &[ComparisonOption]) -> ComparisonNode {
    GrainComparator::new(CompareConfig::with_options(options.iter().cloned())).compare(a, b)
}

/// Compare two grain sequences pairwise under `options`.
pub fn compare_grains_pairwise<A, B>(
    a: A,
    b: B,
    options: &[ComparisonOption],
    keep_only_last: bool,
) -> ComparisonNode
where
    A: IntoIterator,
    A::Item: Borrow<Grain>,
    B: IntoIterator,
    B::Item: Borrow<Grain>,
{
    let config = CompareConfig {
        keep_only_last,
        ..CompareConfig::with_options(options.iter().cloned())
    };
    GrainComparator::new(config).compare_sequences(a, b)
}
