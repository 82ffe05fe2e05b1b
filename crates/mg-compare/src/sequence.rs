//! Pairwise comparison of two grain sequences.

use std::borrow::Borrow;

use mg_types::Grain;
use tracing::debug;

use crate::grain::grain_node;
use crate::node::{a_only, b_only};
use crate::result::{ComparisonNode, ContainerKey, ResultKind, Site};

/// Compare two grain sequences position by position.
///
/// One grain is pulled from each side per step and nothing is read past the
/// first failing pair. Options apply to every element as if it were
/// compared alone. With `keep_only_last`, only the most recent element
/// comparison is retained as a child.
pub(crate) fn sequence_node<A, B>(
    site: Site<'_>,
    a: A,
    b: B,
    keep_only_last: bool,
) -> ComparisonNode
where
    A: IntoIterator,
    A::Item: Borrow<Grain>,
    B: IntoIterator,
    B::Item: Borrow<Grain>,
{
    let mut a = a.into_iter();
    let mut b = b.into_iter();
    let mut children = Vec::new();
    let mut compared = 0usize;
    let mut equal = true;

    loop {
        let element = site.element(ContainerKey::Index(compared));
        let child = match (a.next(), b.next()) {
            (None, None) => break,
            (Some(x), None) => a_only(element, x.borrow()),
            (None, Some(y)) => b_only(element, y.borrow()),
            (Some(x), Some(y)) => {
                compared += 1;
                grain_node(element, x.borrow(), y.borrow())
            }
        };
        let stop = !child.passes();
        if keep_only_last {
            children.clear();
        }
        children.push(child);
        if stop {
            equal = false;
            debug!(compared, "grain sequences diverged, stopping");
            break;
        }
    }

    let msg = if equal {
        format!("Grain sequences match: {compared} grains compared")
    } else {
        format!("Grain sequences do not match: stopped after {compared} grains")
    };
    site.node(ResultKind::GrainSequence { compared }, equal, msg, children)
}
