//! The comparison result tree.
//!
//! Every comparison produces a [`ComparisonNode`]: a verdict, a message and
//! the child nodes it was derived from. Nodes are built bottom-up and never
//! change after construction. A failing node whose path is excluded by an
//! option does not fail its parent.

use std::fmt;
use std::sync::OnceLock;

use mg_types::{Grain, GrainType, Rational, TimeOffset, Timestamp};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::binary::BinaryDiff;
use crate::error::{CompareError, CompareResult};
use crate::options::{DiffValue, OptionSet};

// ---------------------------------------------------------------------------
// ContainerKey
// ---------------------------------------------------------------------------

/// Key of a child within an ordered or mapping container.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKey {
    Index(usize),
    Name(String),
}

impl fmt::Display for ContainerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(n) => write!(f, "{n}"),
            Self::Name(name) => write!(f, "'{name}'"),
        }
    }
}

impl From<usize> for ContainerKey {
    fn from(n: usize) -> Self {
        Self::Index(n)
    }
}

impl From<&str> for ContainerKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ContainerKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

// ---------------------------------------------------------------------------
// ResultKind
// ---------------------------------------------------------------------------

/// Which comparison rule produced a node, with any rule-specific detail.
#[derive(Clone, Debug, PartialEq)]
pub enum ResultKind {
    /// `a == b`.
    Equality,
    /// `a - b` checked against a default or expected difference.
    Difference { difference: DiffValue },
    /// Per-channel PSNR checked against thresholds. `values` is `None` when
    /// PSNR was not computed.
    Psnr { values: Option<Vec<f64>> },
    /// Decoded payload samples. `diff` is `None` when no decode took place.
    BinaryData { diff: Option<BinaryDiff> },
    OrderedContainer,
    MappingContainer,
    /// Only `a` has a value here.
    AOnly,
    /// Only `b` has a value here.
    BOnly,
    /// The two values cannot be compared at all.
    Failing,
    Grain,
    GrainSequence { compared: usize },
}

// ---------------------------------------------------------------------------
// ComparisonNode
// ---------------------------------------------------------------------------

/// One node of a comparison result tree.
#[derive(Debug)]
pub struct ComparisonNode {
    identifier: String,
    attr: Option<String>,
    key: Option<ContainerKey>,
    kind: ResultKind,
    equal: bool,
    excluded: bool,
    own_msg: String,
    values: Option<(String, String)>,
    children: Vec<ComparisonNode>,
    msg: OnceLock<String>,
}

impl ComparisonNode {
    /// The overall verdict.
    pub fn is_equal(&self) -> bool {
        self.equal
    }

    /// Returns `true` if an exclude option names this node's path.
    pub fn excluded(&self) -> bool {
        self.excluded
    }

    /// Returns `true` if this node is equal or its mismatch is ignored.
    pub fn passes(&self) -> bool {
        self.equal || self.excluded
    }

    /// Path template this node compares, e.g. `{}.timelabels[0]`.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The path rendered for one side, e.g. `a.timelabels[0]`.
    pub fn path(&self, side: &str) -> String {
        self.identifier.replace("{}", side)
    }

    /// Field name this node was created for, if any.
    pub fn attr(&self) -> Option<&str> {
        self.attr.as_deref()
    }

    /// Container key this node was created for, if any.
    pub fn key(&self) -> Option<&ContainerKey> {
        self.key.as_ref()
    }

    pub fn kind(&self) -> &ResultKind {
        &self.kind
    }

    pub fn children(&self) -> &[ComparisonNode] {
        &self.children
    }

    /// Rendered value of `a`, for scalar comparisons.
    pub fn a(&self) -> Option<&str> {
        self.values.as_ref().map(|(a, _)| a.as_str())
    }

    /// Rendered value of `b`, for scalar comparisons.
    pub fn b(&self) -> Option<&str> {
        self.values.as_ref().map(|(_, b)| b.as_str())
    }

    /// Number of grain pairs compared, for sequence comparisons.
    pub fn compared_count(&self) -> Option<usize> {
        match self.kind {
            ResultKind::GrainSequence { compared } => Some(compared),
            _ => None,
        }
    }

    /// This node's message followed by the messages of its failing children.
    ///
    /// Failing children that are excluded are marked `<IGNORING: ...>`.
    pub fn message(&self) -> &str {
        self.msg.get_or_init(|| {
            let parts: Vec<String> = self
                .children
                .iter()
                .filter(|c| !c.equal)
                .map(|c| {
                    if c.excluded {
                        format!("<IGNORING: {}>", c.message())
                    } else {
                        c.message().to_string()
                    }
                })
                .collect();
            if parts.is_empty() {
                self.own_msg.clone()
            } else {
                format!("{}: ({})", self.own_msg, parts.join("; "))
            }
        })
    }

    /// This node's own message, without any child messages.
    pub fn own_message(&self) -> &str {
        &self.own_msg
    }

    /// Field names of failing children, excluded or not.
    pub fn failing_fields(&self) -> Vec<&str> {
        self.children
            .iter()
            .filter(|c| !c.equal)
            .filter_map(|c| c.attr.as_deref())
            .collect()
    }

    /// Container keys of failing children, excluded or not.
    pub fn failing_keys(&self) -> Vec<&ContainerKey> {
        self.children
            .iter()
            .filter(|c| !c.equal)
            .filter_map(|c| c.key.as_ref())
            .collect()
    }

    /// Look up the child comparing field `name`.
    pub fn field(&self, name: &str) -> CompareResult<&ComparisonNode> {
        self.children
            .iter()
            .find(|c| c.attr.as_deref() == Some(name))
            .ok_or_else(|| CompareError::NoSuchField(format!("{} has no field '{name}'", self.identifier)))
    }

    /// Look up the child comparing container slot `key`.
    pub fn get(&self, key: impl Into<ContainerKey>) -> CompareResult<&ComparisonNode> {
        let key = key.into();
        self.children
            .iter()
            .find(|c| c.key.as_ref() == Some(&key))
            .ok_or_else(|| CompareError::NoSuchKey(format!("{} has no key {key}", self.identifier)))
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        let glyph = if self.equal {
            '✓'
        } else if self.excluded {
            '○'
        } else {
            '✗'
        };
        writeln!(f, "{indent}{glyph} {}", self.own_msg)?;
        if let ResultKind::BinaryData { diff: Some(diff) } = &self.kind {
            if !self.equal {
                for line in diff.op_lines() {
                    writeln!(f, "{indent}    {line}")?;
                }
            }
        }
        for child in &self.children {
            child.render(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for ComparisonNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}

impl From<&ComparisonNode> for bool {
    fn from(node: &ComparisonNode) -> bool {
        node.equal
    }
}

// ---------------------------------------------------------------------------
// Site: where a node sits in the tree
// ---------------------------------------------------------------------------

/// Settings that shape payload comparison.
#[derive(Clone, Debug)]
pub(crate) struct DiffSettings {
    pub deadline: Option<std::time::Duration>,
    pub max_rendered_ops: usize,
}

impl Default for DiffSettings {
    fn default() -> Self {
        Self {
            deadline: None,
            max_rendered_ops: 5,
        }
    }
}

/// The position a node is being built at: its path, lookup handles, and
/// the options in force.
#[derive(Clone)]
pub(crate) struct Site<'o> {
    pub identifier: String,
    pub attr: Option<String>,
    pub key: Option<ContainerKey>,
    pub options: &'o OptionSet,
    pub settings: &'o DiffSettings,
}

impl<'o> Site<'o> {
    pub fn root(options: &'o OptionSet, settings: &'o DiffSettings) -> Self {
        Self {
            identifier: "{}".into(),
            attr: None,
            key: None,
            options,
            settings,
        }
    }

    /// Child site for field `name`.
    pub fn field(&self, name: &str) -> Site<'o> {
        Site {
            identifier: format!("{}.{name}", self.identifier),
            attr: Some(name.to_string()),
            key: None,
            options: self.options,
            settings: self.settings,
        }
    }

    /// Child site for container slot `key`.
    pub fn item(&self, key: ContainerKey) -> Site<'o> {
        Site {
            identifier: format!("{}[{key}]", self.identifier),
            attr: None,
            key: Some(key),
            options: self.options,
            settings: self.settings,
        }
    }

    /// Child site keyed by `key` that keeps this site's path, so options
    /// written against a single grain apply to every element of a sequence.
    pub fn element(&self, key: ContainerKey) -> Site<'o> {
        Site {
            identifier: self.identifier.clone(),
            attr: None,
            key: Some(key),
            options: self.options,
            settings: self.settings,
        }
    }

    /// This site with a different option set.
    pub fn with_options<'p>(&self, options: &'p OptionSet) -> Site<'p>
    where
        'o: 'p,
    {
        Site {
            identifier: self.identifier.clone(),
            attr: self.attr.clone(),
            key: self.key.clone(),
            options,
            settings: self.settings,
        }
    }

    pub fn path(&self, side: &str) -> String {
        self.identifier.replace("{}", side)
    }

    pub fn excluded(&self) -> bool {
        self.options.excludes(&self.identifier)
    }

    /// Finish a node at this site.
    pub fn node(
        self,
        kind: ResultKind,
        equal: bool,
        msg: impl Into<String>,
        children: Vec<ComparisonNode>,
    ) -> ComparisonNode {
        let excluded = self.excluded();
        ComparisonNode {
            identifier: self.identifier,
            attr: self.attr,
            key: self.key,
            kind,
            equal,
            excluded,
            own_msg: msg.into(),
            values: None,
            children,
            msg: OnceLock::new(),
        }
    }

    /// Finish a leaf node that records the rendered compared values.
    pub fn leaf(
        self,
        kind: ResultKind,
        equal: bool,
        msg: impl Into<String>,
        a: Option<String>,
        b: Option<String>,
    ) -> ComparisonNode {
        let mut node = self.node(kind, equal, msg, Vec::new());
        if a.is_some() || b.is_some() {
            node.values = Some((a.unwrap_or_default(), b.unwrap_or_default()));
        }
        node
    }
}

/// `true` when every child is equal or excluded.
pub(crate) fn all_pass(children: &[ComparisonNode]) -> bool {
    children.iter().all(ComparisonNode::passes)
}

// ---------------------------------------------------------------------------
// Render: how compared values appear in messages
// ---------------------------------------------------------------------------

/// Renders a compared value for messages.
pub(crate) trait Render {
    fn render(&self) -> String;
}

macro_rules! render_display {
    ($($t:ty),* $(,)?) => {
        $(impl Render for $t {
            fn render(&self) -> String {
                self.to_string()
            }
        })*
    };
}

macro_rules! render_debug {
    ($($t:ty),* $(,)?) => {
        $(impl Render for $t {
            fn render(&self) -> String {
                format!("{self:?}")
            }
        })*
    };
}

render_display!(u32, u64, i64, usize, bool, Uuid, Timestamp, TimeOffset, Rational, GrainType, Value);
render_debug!(
    String,
    mg_types::AudioFormat,
    mg_types::VideoFormat,
    mg_types::VideoLayout,
);

impl Render for Map<String, Value> {
    fn render(&self) -> String {
        Value::Object(self.clone()).to_string()
    }
}

impl Render for Grain {
    fn render(&self) -> String {
        format!("{} grain at {}", self.grain_type(), self.origin_timestamp)
    }
}

impl<T: Render> Render for &T {
    fn render(&self) -> String {
        (**self).render()
    }
}
