#![forbid(unsafe_code)]

//! Capability flags and focus-scope resolution.
//!
//! # Invariants
//!
//! - A node's focus scope is its nearest ancestor-or-self carrying
//!   `tabindex`, searched up to but excluding the container, or else the
//!   container itself.
//! - Scopes are recomputed on every call; nothing here caches tree state.
//! - Resolution either yields exactly one scope or fails with a fatal
//!   [`InteractError`].

use interact_dom::{Document, NodeId};

use crate::error::{InteractError, InteractResult};

/// Attribute that makes a node a drag source.
pub const DRAGGABLE_ATTRIBUTE: &str = "draggable";
/// Attribute that makes a node a drop target.
pub const DROPZONE_ATTRIBUTE: &str = "data-dropzone";
/// Attribute that makes a node a focus boundary.
pub const FOCUS_BOUNDARY_ATTRIBUTE: &str = "tabindex";

/// Whether `node` carries the draggable capability.
///
/// Presence enables it; the literal value `false` disables it.
#[must_use]
pub fn is_draggable(doc: &Document, node: NodeId) -> bool {
    doc.attribute(node, DRAGGABLE_ATTRIBUTE)
        .is_some_and(|value| !value.trim().eq_ignore_ascii_case("false"))
}

/// Whether `node` is a drop target.
#[must_use]
pub fn is_dropzone(doc: &Document, node: NodeId) -> bool {
    doc.has_attribute(node, DROPZONE_ATTRIBUTE)
}

/// Whether `node` bounds a focus scope.
#[must_use]
pub fn is_focus_boundary(doc: &Document, node: NodeId) -> bool {
    doc.has_attribute(node, FOCUS_BOUNDARY_ATTRIBUTE)
}

/// Nearest ancestor-or-self of `node` satisfying `predicate`, never leaving
/// `container` (which is itself a candidate).
pub fn closest_within(
    doc: &Document,
    container: NodeId,
    node: NodeId,
    mut predicate: impl FnMut(NodeId) -> bool,
) -> Option<NodeId> {
    if !doc.contains(container, node) {
        return None;
    }
    doc.closest_by(node, Some(container), &mut predicate)
        .or_else(|| predicate(container).then_some(container))
}

/// Check that `nodes` is non-empty and lies entirely inside `container`.
pub fn resolve_container(
    doc: &Document,
    container: NodeId,
    nodes: &[NodeId],
) -> InteractResult<NodeId> {
    if nodes.is_empty() || !nodes.iter().all(|node| doc.contains(container, *node)) {
        let err = InteractError::AmbiguousContainer { found: 0 };
        tracing::error!(container = %container, nodes = nodes.len(), "{err}");
        return Err(err);
    }
    Ok(container)
}

/// Focus scope of a single node, without the container check.
fn scope_of(doc: &Document, container: NodeId, node: NodeId) -> NodeId {
    doc.closest_by(node, Some(container), |candidate| {
        is_focus_boundary(doc, candidate)
    })
    .unwrap_or(container)
}

/// The one focus scope shared by every node in `nodes`.
pub fn resolve_focus_scope(
    doc: &Document,
    container: NodeId,
    nodes: &[NodeId],
) -> InteractResult<NodeId> {
    resolve_container(doc, container, nodes)?;

    let mut scopes: Vec<NodeId> = Vec::with_capacity(1);
    for node in nodes {
        let scope = scope_of(doc, container, *node);
        if !scopes.contains(&scope) {
            scopes.push(scope);
        }
    }

    match scopes.as_slice() {
        [scope] => Ok(*scope),
        _ => {
            let err = InteractError::AmbiguousFocusScope {
                found: scopes.len(),
            };
            tracing::error!(container = %container, "{err}");
            Err(err)
        }
    }
}

/// Marked nodes in `scope`, including `scope` itself, in document order.
#[must_use]
pub fn marked_in(doc: &Document, scope: NodeId) -> Vec<NodeId> {
    std::iter::once(scope)
        .chain(doc.descendants(scope))
        .filter(|node| doc.is_marked(*node))
        .collect()
}
