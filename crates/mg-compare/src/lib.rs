//! Policy-driven comparison engine for media grains.
//!
//! Compares two grains, or two grain sequences, field by field and payload
//! by payload, and returns a tree of results that explains every verdict.
//! Options attached to attribute paths exclude fields, require expected
//! timestamp differences, or switch payload comparison to PSNR thresholds.
//!
//! # Key Types
//!
//! - [`GrainComparator`] / [`CompareConfig`] -- Comparison entry point and its configuration
//! - [`ComparisonNode`] / [`ResultKind`] / [`ContainerKey`] -- The result tree
//! - [`ComparisonOption`] / [`OptionSet`] -- Per-path comparison policy
//! - [`BinaryDiff`] / [`WordSpec`] -- Sample-level payload diff
//!
//! ```rust
//! use mg_compare::{compare_grain, exclude};
//! use mg_types::{Grain, GrainBody};
//! use uuid::Uuid;
//!
//! let a = Grain::new(Uuid::nil(), Uuid::nil(), GrainBody::Empty).with_data(vec![1u8, 2, 3]);
//! let mut b = a.clone();
//! b.flow_id = Uuid::from_u128(7);
//!
//! assert!(!compare_grain(&a, &b, &[]).is_equal());
//!
//! let result = compare_grain(&a, &b, &[exclude("flow_id").unwrap()]);
//! assert!(result.is_equal());
//! assert_eq!(result.failing_fields(), vec!["flow_id"]);
//! ```

pub mod binary;
pub mod comparator;
pub mod config;
pub mod error;
pub mod options;
pub mod psnr;
pub mod result;

mod grain;
mod node;
mod sequence;

pub use binary::{BinaryDiff, ByteOrder, EditOp, FirstDifference, Sample, WordCode, WordSpec};
pub use comparator::{compare_grain, compare_grains_pairwise, GrainComparator};
pub use config::CompareConfig;
pub use error::{CompareError, CompareResult};
pub use options::{
    exclude, expect_difference, include, normalize_path, psnr, CompareOp, ComparisonOption,
    DiffValue, DifferenceBuilder, DifferencePredicate, OptionKind, OptionSet, PsnrBuilder,
    PsnrPredicate,
};
pub use psnr::compute_psnr;
pub use result::{ComparisonNode, ContainerKey, ResultKind};
