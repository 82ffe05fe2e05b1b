//! Node builders for scalar values and containers.

use mg_types::Timestamp;
use serde_json::{Map, Value};

use crate::options::DiffValue;
use crate::result::{all_pass, ComparisonNode, ContainerKey, Render, ResultKind, Site};

/// Compare two values with `==`.
pub(crate) fn equality<T: PartialEq + Render>(site: Site<'_>, a: &T, b: &T) -> ComparisonNode {
    let (pa, pb) = (site.path("a"), site.path("b"));
    let (ra, rb) = (a.render(), b.render());
    let equal = a == b;
    let msg = if equal {
        format!("{pa} == {pb}: {ra} == {rb}")
    } else {
        format!("{pa} != {pb}: {ra} != {rb}")
    };
    site.leaf(ResultKind::Equality, equal, msg, Some(ra), Some(rb))
}

/// Values whose difference `a - b` can be checked against an expectation.
pub(crate) trait Subtract {
    fn difference(&self, other: &Self) -> DiffValue;
}

impl Subtract for Timestamp {
    fn difference(&self, other: &Self) -> DiffValue {
        DiffValue::Time(*self - *other)
    }
}

impl Subtract for i64 {
    fn difference(&self, other: &Self) -> DiffValue {
        DiffValue::Integer(self.saturating_sub(*other))
    }
}

impl Subtract for u32 {
    fn difference(&self, other: &Self) -> DiffValue {
        DiffValue::Integer(i64::from(*self) - i64::from(*other))
    }
}

/// Compare `a - b` against the expected-difference options at this site,
/// or against zero when none apply.
pub(crate) fn difference<T: Subtract + Render>(site: Site<'_>, a: &T, b: &T) -> ComparisonNode {
    let (pa, pb) = (site.path("a"), site.path("b"));
    let diff = a.difference(b);
    let predicates: Vec<_> = site.options.difference_predicates(&site.identifier).collect();
    let (equal, expectation) = if predicates.is_empty() {
        let expected = diff.zero_like();
        (diff == expected, format!("== {expected}"))
    } else {
        let holds = predicates.iter().all(|p| p.holds(&diff));
        let text: Vec<String> = predicates.iter().map(ToString::to_string).collect();
        (holds, text.join(" and "))
    };
    let msg = if equal {
        format!("{pa} - {pb} = {diff}, as expected ({expectation})")
    } else {
        format!("{pa} - {pb} = {diff}, expected {expectation}")
    };
    site.leaf(
        ResultKind::Difference { difference: diff },
        equal,
        msg,
        Some(a.render()),
        Some(b.render()),
    )
}

/// Only `a` has a value at this site.
pub(crate) fn a_only<T: Render + ?Sized>(site: Site<'_>, a: &T) -> ComparisonNode {
    let ra = a.render();
    let msg = format!("{} = {ra}, {} is missing", site.path("a"), site.path("b"));
    site.leaf(ResultKind::AOnly, false, msg, Some(ra), None)
}

/// Only `b` has a value at this site.
pub(crate) fn b_only<T: Render + ?Sized>(site: Site<'_>, b: &T) -> ComparisonNode {
    let rb = b.render();
    let msg = format!("{} is missing, {} = {rb}", site.path("a"), site.path("b"));
    site.leaf(ResultKind::BOnly, false, msg, None, Some(rb))
}

/// The values at this site cannot be compared.
pub(crate) fn failing(site: Site<'_>, reason: &str) -> ComparisonNode {
    let msg = format!("{} and {} cannot be compared: {reason}", site.path("a"), site.path("b"));
    site.node(ResultKind::Failing, false, msg, Vec::new())
}

/// Compare two sequences element by element.
///
/// The first child compares the lengths at `len(<path>)`; elements present
/// on both sides are compared with `element`, surplus elements become
/// a-only or b-only. Tolerating a length mismatch takes an exclusion of the
/// length path as well as of each surplus element.
pub(crate) fn ordered<T, F>(site: Site<'_>, a: &[T], b: &[T], element: F) -> ComparisonNode
where
    T: Render,
    F: Fn(Site<'_>, &T, &T) -> ComparisonNode,
{
    let len_site = Site {
        identifier: format!("len({})", site.identifier),
        attr: None,
        key: None,
        options: site.options,
        settings: site.settings,
    };
    let mut children = Vec::with_capacity(1 + a.len().max(b.len()));
    children.push(equality(len_site, &a.len(), &b.len()));
    for n in 0..a.len().max(b.len()) {
        let item = site.item(ContainerKey::Index(n));
        children.push(match (a.get(n), b.get(n)) {
            (Some(x), Some(y)) => element(item, x, y),
            (Some(x), None) => a_only(item, x),
            (None, Some(y)) => b_only(item, y),
            (None, None) => break,
        });
    }
    finish_container(site, ResultKind::OrderedContainer, children)
}

/// Compare two JSON objects key by key.
pub(crate) fn mapping(site: Site<'_>, a: &Map<String, Value>, b: &Map<String, Value>) -> ComparisonNode {
    let mut children = Vec::new();
    for (key, x) in a {
        if let Some(y) = b.get(key) {
            children.push(json_value(site.item(key.as_str().into()), x, y));
        }
    }
    for (key, x) in a {
        if !b.contains_key(key) {
            children.push(a_only(site.item(key.as_str().into()), x));
        }
    }
    for (key, y) in b {
        if !a.contains_key(key) {
            children.push(b_only(site.item(key.as_str().into()), y));
        }
    }
    finish_container(site, ResultKind::MappingContainer, children)
}

/// Compare two JSON values, recursing into objects and arrays.
pub(crate) fn json_value(site: Site<'_>, a: &Value, b: &Value) -> ComparisonNode {
    match (a, b) {
        (Value::Object(x), Value::Object(y)) => mapping(site, x, y),
        (Value::Array(x), Value::Array(y)) => ordered(site, x, y, json_value),
        _ => equality(site, a, b),
    }
}

fn finish_container(site: Site<'_>, kind: ResultKind, children: Vec<ComparisonNode>) -> ComparisonNode {
    let equal = all_pass(&children);
    let (pa, pb) = (site.path("a"), site.path("b"));
    let msg = if equal {
        format!("{pa} matches {pb}")
    } else {
        format!("{pa} does not match {pb}")
    };
    site.node(kind, equal, msg, children)
}
