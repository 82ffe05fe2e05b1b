//! Path-addressed comparison directives.
//!
//! Every option names a path template such as `{}.origin_timestamp` or
//! `{}.timelabels[0]` and a directive that applies to the node comparing
//! exactly that path. The `{}` stands for the compared object and is
//! rendered as `a` or `b` in messages.
//!
//! ```rust
//! use mg_compare::options::{exclude, expect_difference, psnr};
//! use mg_types::TimeOffset;
//!
//! let skip = exclude("origin_timestamp").unwrap();
//! let drift = expect_difference("sync_timestamp")
//!     .unwrap()
//!     .lt(TimeOffset::from_millis(5))
//!     .and(expect_difference("sync_timestamp").unwrap().gt(TimeOffset::from_millis(-5)))
//!     .unwrap();
//! let lossy = psnr("data").unwrap().ge(vec![40.0, 40.0]);
//! assert_eq!(skip.path(), "{}.origin_timestamp");
//! # let _ = (drift, lossy);
//! ```

use std::cmp::Ordering;
use std::fmt;

use mg_types::{GrainType, TimeOffset};
use serde::{Deserialize, Serialize};

use crate::error::{CompareError, CompareResult};

// ---------------------------------------------------------------------------
// Field schema
// ---------------------------------------------------------------------------

/// Fields compared for every grain type.
pub const COMMON_FIELDS: &[&str] = &[
    "grain_type",
    "source_id",
    "flow_id",
    "origin_timestamp",
    "sync_timestamp",
    "creation_timestamp",
    "rate",
    "duration",
    "length",
    "timelabels",
    "data",
];

const EVENT_FIELDS: &[&str] = &["event_type", "topic", "event_data"];
const AUDIO_FIELDS: &[&str] = &["format", "samples", "channels", "sample_rate"];
const CODED_AUDIO_FIELDS: &[&str] = &[
    "format",
    "samples",
    "channels",
    "sample_rate",
    "priming",
    "remainder",
];
const VIDEO_FIELDS: &[&str] = &["format", "width", "height", "layout"];
const CODED_VIDEO_FIELDS: &[&str] = &[
    "format",
    "coded_width",
    "coded_height",
    "origin_width",
    "origin_height",
    "is_key_frame",
    "temporal_offset",
    "layout",
    "unit_offsets",
];

/// Type-specific fields compared for grains of `grain_type`.
pub fn type_fields(grain_type: &GrainType) -> &'static [&'static str] {
    match grain_type {
        GrainType::Event => EVENT_FIELDS,
        GrainType::Audio => AUDIO_FIELDS,
        GrainType::CodedAudio => CODED_AUDIO_FIELDS,
        GrainType::Video => VIDEO_FIELDS,
        GrainType::CodedVideo => CODED_VIDEO_FIELDS,
        GrainType::Empty | GrainType::Other(_) => &[],
    }
}

fn is_known_field(name: &str) -> bool {
    COMMON_FIELDS
        .iter()
        .chain(EVENT_FIELDS)
        .chain(CODED_AUDIO_FIELDS)
        .chain(VIDEO_FIELDS)
        .chain(CODED_VIDEO_FIELDS)
        .any(|f| *f == name)
}

/// Normalise a user-supplied field path to template form and check that it
/// starts with a grain field.
///
/// Accepts `field`, `field.sub`, `field[3]` and `field['key']`, with or
/// without a leading `{}.`. `len(path)` addresses the length check of the
/// ordered container at `path`, so a length mismatch can be excluded
/// separately from the surplus elements.
pub fn normalize_path(path: &str) -> CompareResult<String> {
    let trimmed = path.trim();
    if let Some(inner) = trimmed.strip_prefix("len(").and_then(|p| p.strip_suffix(')')) {
        return normalize_path(inner)
            .map(|inner| format!("len({inner})"))
            .map_err(|_| CompareError::UnknownField(path.to_string()));
    }
    let relative = trimmed
        .strip_prefix("{}.")
        .unwrap_or(trimmed)
        .trim_start_matches('.');
    let head_end = relative
        .find(|c| c == '.' || c == '[')
        .unwrap_or(relative.len());
    let head = &relative[..head_end];
    if head.is_empty() || !is_known_field(head) {
        return Err(CompareError::UnknownField(path.to_string()));
    }
    Ok(format!("{{}}.{relative}"))
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Relational operator used by difference and PSNR predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    /// Evaluate `lhs <op> rhs`. Incomparable operands never satisfy.
    pub fn holds<T: PartialOrd + ?Sized>(&self, lhs: &T, rhs: &T) -> bool {
        let Some(ord) = lhs.partial_cmp(rhs) else {
            return false;
        };
        match self {
            Self::Eq => ord == Ordering::Equal,
            Self::Ne => ord != Ordering::Equal,
            Self::Lt => ord == Ordering::Less,
            Self::Le => ord != Ordering::Greater,
            Self::Gt => ord == Ordering::Greater,
            Self::Ge => ord != Ordering::Less,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// The result of subtracting one compared value from another.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffValue {
    Integer(i64),
    Time(TimeOffset),
}

impl DiffValue {
    /// The zero of the same kind as `self`.
    pub fn zero_like(&self) -> Self {
        match self {
            Self::Integer(_) => Self::Integer(0),
            Self::Time(_) => Self::Time(TimeOffset::zero()),
        }
    }
}

impl PartialOrd for DiffValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a.partial_cmp(b),
            (Self::Time(a), Self::Time(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl From<i64> for DiffValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for DiffValue {
    fn from(v: i32) -> Self {
        Self::Integer(v.into())
    }
}

impl From<TimeOffset> for DiffValue {
    fn from(v: TimeOffset) -> Self {
        Self::Time(v)
    }
}

impl fmt::Display for DiffValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Time(v) => write!(f, "{v}"),
        }
    }
}

/// A condition on the difference `a - b` at one path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferencePredicate {
    Compare { op: CompareOp, value: DiffValue },
    All(Vec<DifferencePredicate>),
    Any(Vec<DifferencePredicate>),
}

impl DifferencePredicate {
    pub fn holds(&self, difference: &DiffValue) -> bool {
        match self {
            Self::Compare { op, value } => op.holds(difference, value),
            Self::All(preds) => preds.iter().all(|p| p.holds(difference)),
            Self::Any(preds) => preds.iter().any(|p| p.holds(difference)),
        }
    }
}

impl fmt::Display for DifferencePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare { op, value } => write!(f, "{} {value}", op.symbol()),
            Self::All(preds) => write_joined(f, preds, " and "),
            Self::Any(preds) => write_joined(f, preds, " or "),
        }
    }
}

/// A condition on the per-channel PSNR values at one path.
///
/// A comparison holds when every channel value compares as required against
/// the threshold at the same position; a channel count mismatch never holds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PsnrPredicate {
    Compare { op: CompareOp, thresholds: Vec<f64> },
    All(Vec<PsnrPredicate>),
    Any(Vec<PsnrPredicate>),
}

impl PsnrPredicate {
    pub fn holds(&self, values: &[f64]) -> bool {
        match self {
            Self::Compare { op, thresholds } => {
                values.len() == thresholds.len()
                    && values.iter().zip(thresholds).all(|(v, t)| op.holds(v, t))
            }
            Self::All(preds) => preds.iter().all(|p| p.holds(values)),
            Self::Any(preds) => preds.iter().any(|p| p.holds(values)),
        }
    }
}

impl fmt::Display for PsnrPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare { op, thresholds } => write!(f, "{} {thresholds:?}", op.symbol()),
            Self::All(preds) => write_joined(f, preds, " and "),
            Self::Any(preds) => write_joined(f, preds, " or "),
        }
    }
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, "{sep}")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, ")")
}

// ---------------------------------------------------------------------------
// ComparisonOption
// ---------------------------------------------------------------------------

/// The directive an option applies at its path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    /// A mismatch at this path does not affect the parent verdict.
    Exclude,
    /// Overrides a default exclusion at this path.
    Include,
    /// The difference `a - b` must satisfy the predicate.
    ExpectDifference(DifferencePredicate),
    /// The per-channel PSNR of the payloads must satisfy the predicate.
    PsnrThreshold(PsnrPredicate),
}

/// A comparison directive bound to a path template.
///
/// Options are immutable; two options are equal when both kind and path
/// match. Build them with [`exclude`], [`include`], [`expect_difference`]
/// and [`psnr`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOption", into = "RawOption")]
pub struct ComparisonOption {
    path: String,
    kind: OptionKind,
}

impl ComparisonOption {
    /// Create an option at an already-normalised template path.
    pub(crate) fn at(path: impl Into<String>, kind: OptionKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Create an option, validating and normalising `path`.
    pub fn new(path: &str, kind: OptionKind) -> CompareResult<Self> {
        Ok(Self::at(normalize_path(path)?, kind))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> &OptionKind {
        &self.kind
    }

    pub fn is_exclude(&self) -> bool {
        matches!(self.kind, OptionKind::Exclude)
    }

    pub fn is_include(&self) -> bool {
        matches!(self.kind, OptionKind::Include)
    }

    /// Combine two predicate options at the same path; both must hold.
    pub fn and(self, other: Self) -> CompareResult<Self> {
        self.combine(other, "and")
    }

    /// Combine two predicate options at the same path; either may hold.
    pub fn or(self, other: Self) -> CompareResult<Self> {
        self.combine(other, "or")
    }

    fn combine(self, other: Self, how: &str) -> CompareResult<Self> {
        if self.path != other.path {
            return Err(CompareError::Configuration(format!(
                "cannot combine options on different paths: {} {how} {}",
                self.path, other.path
            )));
        }
        let all = how == "and";
        let kind = match (self.kind, other.kind) {
            (OptionKind::ExpectDifference(a), OptionKind::ExpectDifference(b)) => {
                OptionKind::ExpectDifference(if all {
                    DifferencePredicate::All(vec![a, b])
                } else {
                    DifferencePredicate::Any(vec![a, b])
                })
            }
            (OptionKind::PsnrThreshold(a), OptionKind::PsnrThreshold(b)) => {
                OptionKind::PsnrThreshold(if all {
                    PsnrPredicate::All(vec![a, b])
                } else {
                    PsnrPredicate::Any(vec![a, b])
                })
            }
            (a, b) => {
                return Err(CompareError::Configuration(format!(
                    "only matching predicate options can be combined, got {a:?} {how} {b:?}"
                )));
            }
        };
        Ok(Self {
            path: self.path,
            kind,
        })
    }
}

impl fmt::Display for ComparisonOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            OptionKind::Exclude => write!(f, "exclude {}", self.path),
            OptionKind::Include => write!(f, "include {}", self.path),
            OptionKind::ExpectDifference(p) => write!(f, "expect {} difference {p}", self.path),
            OptionKind::PsnrThreshold(p) => write!(f, "expect PSNR({}) {p}", self.path),
        }
    }
}

/// Serialised form of an option; paths are validated on the way in.
#[derive(Serialize, Deserialize)]
struct RawOption {
    path: String,
    kind: OptionKind,
}

impl TryFrom<RawOption> for ComparisonOption {
    type Error = CompareError;

    fn try_from(raw: RawOption) -> Result<Self, Self::Error> {
        Self::new(&raw.path, raw.kind)
    }
}

impl From<ComparisonOption> for RawOption {
    fn from(option: ComparisonOption) -> Self {
        Self {
            path: option.path,
            kind: option.kind,
        }
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Ignore mismatches at `path`.
pub fn exclude(path: &str) -> CompareResult<ComparisonOption> {
    ComparisonOption::new(path, OptionKind::Exclude)
}

/// Compare `path` even where it is excluded by default.
pub fn include(path: &str) -> CompareResult<ComparisonOption> {
    ComparisonOption::new(path, OptionKind::Include)
}

/// Start an expected-difference option for `path`.
pub fn expect_difference(path: &str) -> CompareResult<DifferenceBuilder> {
    Ok(DifferenceBuilder {
        path: normalize_path(path)?,
    })
}

/// Start a PSNR threshold option for `path`.
pub fn psnr(path: &str) -> CompareResult<PsnrBuilder> {
    Ok(PsnrBuilder {
        path: normalize_path(path)?,
    })
}

/// Builds an [`OptionKind::ExpectDifference`] option.
#[derive(Clone, Debug)]
pub struct DifferenceBuilder {
    path: String,
}

impl DifferenceBuilder {
    fn finish(self, op: CompareOp, value: impl Into<DiffValue>) -> ComparisonOption {
        ComparisonOption::at(
            self.path,
            OptionKind::ExpectDifference(DifferencePredicate::Compare {
                op,
                value: value.into(),
            }),
        )
    }

    pub fn eq(self, value: impl Into<DiffValue>) -> ComparisonOption {
        self.finish(CompareOp::Eq, value)
    }

    pub fn ne(self, value: impl Into<DiffValue>) -> ComparisonOption {
        self.finish(CompareOp::Ne, value)
    }

    pub fn lt(self, value: impl Into<DiffValue>) -> ComparisonOption {
        self.finish(CompareOp::Lt, value)
    }

    pub fn le(self, value: impl Into<DiffValue>) -> ComparisonOption {
        self.finish(CompareOp::Le, value)
    }

    pub fn gt(self, value: impl Into<DiffValue>) -> ComparisonOption {
        self.finish(CompareOp::Gt, value)
    }

    pub fn ge(self, value: impl Into<DiffValue>) -> ComparisonOption {
        self.finish(CompareOp::Ge, value)
    }
}

/// Builds an [`OptionKind::PsnrThreshold`] option.
#[derive(Clone, Debug)]
pub struct PsnrBuilder {
    path: String,
}

impl PsnrBuilder {
    fn finish(self, op: CompareOp, thresholds: impl Into<Vec<f64>>) -> ComparisonOption {
        ComparisonOption::at(
            self.path,
            OptionKind::PsnrThreshold(PsnrPredicate::Compare {
                op,
                thresholds: thresholds.into(),
            }),
        )
    }

    pub fn lt(self, thresholds: impl Into<Vec<f64>>) -> ComparisonOption {
        self.finish(CompareOp::Lt, thresholds)
    }

    pub fn le(self, thresholds: impl Into<Vec<f64>>) -> ComparisonOption {
        self.finish(CompareOp::Le, thresholds)
    }

    pub fn gt(self, thresholds: impl Into<Vec<f64>>) -> ComparisonOption {
        self.finish(CompareOp::Gt, thresholds)
    }

    pub fn ge(self, thresholds: impl Into<Vec<f64>>) -> ComparisonOption {
        self.finish(CompareOp::Ge, thresholds)
    }
}

// ---------------------------------------------------------------------------
// OptionSet
// ---------------------------------------------------------------------------

/// The options in force for one subtree of a comparison.
///
/// Sets are never mutated once comparison starts; a node that needs an
/// extra directive for its children derives a new set with [`OptionSet::with`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OptionSet {
    options: Vec<ComparisonOption>,
}

impl OptionSet {
    pub fn new(options: impl IntoIterator<Item = ComparisonOption>) -> Self {
        Self {
            options: options.into_iter().collect(),
        }
    }

    /// A copy of this set with `option` added.
    pub fn with(&self, option: ComparisonOption) -> Self {
        let mut options = self.options.clone();
        options.push(option);
        Self { options }
    }

    /// Options whose path is exactly `identifier`.
    pub fn own<'s>(&'s self, identifier: &'s str) -> impl Iterator<Item = &'s ComparisonOption> {
        self.options.iter().filter(move |o| o.path == identifier)
    }

    pub fn excludes(&self, identifier: &str) -> bool {
        self.own(identifier).any(ComparisonOption::is_exclude)
    }

    pub fn includes(&self, identifier: &str) -> bool {
        self.own(identifier).any(ComparisonOption::is_include)
    }

    pub fn difference_predicates<'s>(
        &'s self,
        identifier: &'s str,
    ) -> impl Iterator<Item = &'s DifferencePredicate> {
        self.own(identifier).filter_map(|o| match &o.kind {
            OptionKind::ExpectDifference(p) => Some(p),
            _ => None,
        })
    }

    pub fn psnr_predicates<'s>(
        &'s self,
        identifier: &'s str,
    ) -> impl Iterator<Item = &'s PsnrPredicate> {
        self.own(identifier).filter_map(|o| match &o.kind {
            OptionKind::PsnrThreshold(p) => Some(p),
            _ => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComparisonOption> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl FromIterator<ComparisonOption> for OptionSet {
    fn from_iter<I: IntoIterator<Item = ComparisonOption>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_normalise_to_template_form() {
        assert_eq!(normalize_path("origin_timestamp").unwrap(), "{}.origin_timestamp");
        assert_eq!(normalize_path("{}.data").unwrap(), "{}.data");
        assert_eq!(normalize_path("timelabels[3]").unwrap(), "{}.timelabels[3]");
        assert_eq!(
            normalize_path("event_data['path']").unwrap(),
            "{}.event_data['path']"
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert_eq!(
            normalize_path("origin_timestmap"),
            Err(CompareError::UnknownField("origin_timestmap".into()))
        );
        assert!(normalize_path("").is_err());
        assert!(normalize_path("{}").is_err());
        assert_eq!(
            normalize_path("len(timelabel)"),
            Err(CompareError::UnknownField("len(timelabel)".into()))
        );
    }

    #[test]
    fn length_paths_wrap_the_container_path() {
        assert_eq!(normalize_path("len(timelabels)").unwrap(), "len({}.timelabels)");
        assert_eq!(normalize_path("len({}.unit_offsets)").unwrap(), "len({}.unit_offsets)");
        assert_eq!(
            normalize_path("len(event_data['list'])").unwrap(),
            "len({}.event_data['list'])"
        );
    }

    #[test]
    fn type_specific_fields_are_known() {
        assert!(exclude("unit_offsets").is_ok());
        assert!(exclude("priming").is_ok());
        assert!(exclude("event_type").is_ok());
        assert_eq!(type_fields(&GrainType::Video), VIDEO_FIELDS);
        assert!(type_fields(&GrainType::Empty).is_empty());
    }

    #[test]
    fn equality_is_by_kind_and_path() {
        assert_eq!(exclude("data").unwrap(), exclude("{}.data").unwrap());
        assert_ne!(exclude("data").unwrap(), include("data").unwrap());
        assert_ne!(exclude("data").unwrap(), exclude("length").unwrap());
    }

    #[test]
    fn compare_op_semantics() {
        assert!(CompareOp::Le.holds(&1, &1));
        assert!(!CompareOp::Lt.holds(&1, &1));
        assert!(CompareOp::Ne.holds(&1, &2));
        assert!(CompareOp::Gt.holds(&f64::INFINITY, &40.0));
        assert!(!CompareOp::Eq.holds(&f64::NAN, &f64::NAN));
    }

    #[test]
    fn mixed_difference_kinds_never_hold() {
        let pred = DifferencePredicate::Compare {
            op: CompareOp::Ne,
            value: DiffValue::Integer(0),
        };
        assert!(!pred.holds(&DiffValue::Time(TimeOffset::from_millis(1))));
    }

    #[test]
    fn and_combines_on_matching_paths() {
        let lo = expect_difference("origin_timestamp")
            .unwrap()
            .gt(TimeOffset::from_millis(-2));
        let hi = expect_difference("origin_timestamp")
            .unwrap()
            .lt(TimeOffset::from_millis(2));
        let both = lo.and(hi).unwrap();
        let OptionKind::ExpectDifference(pred) = both.kind() else {
            panic!("expected a difference predicate, got {both:?}");
        };
        assert!(pred.holds(&DiffValue::Time(TimeOffset::from_millis(1))));
        assert!(!pred.holds(&DiffValue::Time(TimeOffset::from_millis(3))));
    }

    #[test]
    fn or_combines_on_matching_paths() {
        let zero = expect_difference("temporal_offset").unwrap().eq(0);
        let one = expect_difference("temporal_offset").unwrap().eq(1);
        let either = zero.or(one).unwrap();
        let OptionKind::ExpectDifference(pred) = either.kind() else {
            panic!("expected a difference predicate");
        };
        assert!(pred.holds(&DiffValue::Integer(1)));
        assert!(!pred.holds(&DiffValue::Integer(2)));
        assert_eq!(pred.to_string(), "(== 0 or == 1)");
    }

    #[test]
    fn combining_different_paths_is_a_configuration_error() {
        let a = expect_difference("origin_timestamp").unwrap().eq(TimeOffset::zero());
        let b = expect_difference("sync_timestamp").unwrap().eq(TimeOffset::zero());
        assert!(matches!(a.and(b), Err(CompareError::Configuration(_))));
    }

    #[test]
    fn combining_non_predicates_is_a_configuration_error() {
        let a = exclude("data").unwrap();
        let b = psnr("data").unwrap().gt(vec![30.0]);
        assert!(matches!(a.or(b), Err(CompareError::Configuration(_))));
    }

    #[test]
    fn psnr_predicate_is_per_channel() {
        let pred = PsnrPredicate::Compare {
            op: CompareOp::Ge,
            thresholds: vec![30.0, 40.0],
        };
        assert!(pred.holds(&[35.0, f64::INFINITY]));
        assert!(!pred.holds(&[35.0, 39.0]));
        assert!(!pred.holds(&[50.0]));
    }

    #[test]
    fn option_set_queries() {
        let set = OptionSet::new([
            exclude("data").unwrap(),
            include("creation_timestamp").unwrap(),
            psnr("data").unwrap().gt(vec![40.0]),
        ]);
        assert!(set.excludes("{}.data"));
        assert!(!set.excludes("{}.data[0]"));
        assert!(set.includes("{}.creation_timestamp"));
        assert_eq!(set.psnr_predicates("{}.data").count(), 1);
        assert_eq!(set.own("{}.data").count(), 2);

        let overlay = set.with(exclude("length").unwrap());
        assert!(overlay.excludes("{}.length"));
        assert!(!set.excludes("{}.length"));
    }

    #[test]
    fn options_deserialize_with_validation() {
        let json = r#"[
            {"path": "origin_timestamp", "kind": "exclude"},
            {"path": "sync_timestamp", "kind": {"expect_difference": {"compare": {"op": "lt", "value": {"time": {"nanos": 5000}}}}}}
        ]"#;
        let options: Vec<ComparisonOption> = serde_json::from_str(json).unwrap();
        assert_eq!(options[0], exclude("origin_timestamp").unwrap());
        assert_eq!(
            options[1],
            expect_difference("sync_timestamp")
                .unwrap()
                .lt(TimeOffset::from_nanos(5000))
        );

        let bad = r#"[{"path": "no_such_field", "kind": "exclude"}]"#;
        assert!(serde_json::from_str::<Vec<ComparisonOption>>(bad).is_err());
    }
}
