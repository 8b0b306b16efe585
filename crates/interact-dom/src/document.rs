#![forbid(unsafe_code)]

//! Arena-backed document tree.
//!
//! # Invariants
//!
//! - A node has at most one parent and appears exactly once in that parent's
//!   child list.
//! - The parent relation is acyclic: [`Document::append_child`] refuses to
//!   move a node underneath itself.
//! - Node ids are never reused. [`Document::remove`] only detaches; a detached
//!   subtree can be re-attached later.
//! - Nodes created by [`Document::parse_fragment`] belong to this document.
//!   There is no ambient global document.

use crate::data::{DataValue, data_key_from_attribute};
use crate::error::MarkupResult;
use crate::markup;
use crate::node::{Element, NodeId, NodeKind, NodeRecord};
use crate::selector::Selector;

/// Owning container for a tree (or forest) of nodes.
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<NodeRecord>,
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever created in this document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(NodeRecord::new(kind));
        id
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(Element::new(tag)))
    }

    /// Create a detached element from an already-built [`Element`].
    pub fn adopt_element(&mut self, element: Element) -> NodeId {
        self.push(NodeKind::Element(element))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_owned()))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, body: &str) -> NodeId {
        self.push(NodeKind::Comment(body.to_owned()))
    }

    fn record(&self, id: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(id.0 as usize)
    }

    fn record_mut(&mut self, id: NodeId) -> Option<&mut NodeRecord> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Whether `id` was created by this document.
    #[must_use]
    pub fn exists(&self, id: NodeId) -> bool {
        self.record(id).is_some()
    }

    /// Node payload.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.record(id).map(|record| &record.kind)
    }

    /// Element payload, `None` for text/comment nodes or unknown ids.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.kind(id).and_then(NodeKind::as_element)
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.record_mut(id)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Parent of `id`, if attached.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.record(id).and_then(|record| record.parent)
    }

    /// Children of `id` in order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.record(id)
            .map_or(&[][..], |record| record.children.as_slice())
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.parent(id),
        }
    }

    /// Descendants of `id` in document (pre-)order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// Whether `node` is `ancestor` or lies underneath it.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    ///
    /// Returns `false` (and changes nothing) when either id is unknown, when
    /// `parent` is not an element, or when `child` is `parent` or one of its
    /// ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.exists(child) || self.element(parent).is_none() {
            return false;
        }
        if self.contains(child, parent) {
            return false;
        }
        self.detach(child);
        if let Some(record) = self.record_mut(child) {
            record.parent = Some(parent);
        }
        if let Some(record) = self.record_mut(parent) {
            record.children.push(child);
        }
        true
    }

    /// Detach `id` (and its subtree) from its parent.
    ///
    /// Idempotent: returns `false` when `id` was already detached or unknown.
    pub fn remove(&mut self, id: NodeId) -> bool {
        self.detach(id)
    }

    fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        if let Some(record) = self.record_mut(parent) {
            record.children.retain(|child| *child != id);
        }
        if let Some(record) = self.record_mut(id) {
            record.parent = None;
        }
        true
    }

    // ── Attributes ──────────────────────────────────────────────────────

    /// Attribute value of an element.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attribute(name)
    }

    /// Whether an element carries the attribute.
    #[must_use]
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_attribute(name))
    }

    /// Set an attribute. Ignored for non-elements.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element_mut(id) {
            element.set_attribute(name, value);
        }
    }

    /// Remove an attribute, returning the old value.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.element_mut(id)?.remove_attribute(name)
    }

    // ── Associated data ─────────────────────────────────────────────────

    /// Store an associated value under `key`, replacing any previous value.
    pub fn set_data(&mut self, id: NodeId, key: &str, value: impl Into<DataValue>) {
        let value = value.into();
        let Some(record) = self.record_mut(id) else {
            return;
        };
        if let Some(slot) = record.data.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value;
        } else {
            record.data.push((key.to_owned(), value));
        }
    }

    /// Remove a programmatically stored value.
    pub fn remove_data(&mut self, id: NodeId, key: &str) -> Option<DataValue> {
        let record = self.record_mut(id)?;
        let index = record.data.iter().position(|(k, _)| k == key)?;
        Some(record.data.remove(index).1)
    }

    /// All associated data of a node.
    ///
    /// `data-*` attributes come first in attribute order (keys camelCased),
    /// followed by programmatic entries. A programmatic entry with the same
    /// key replaces the attribute value in place.
    #[must_use]
    pub fn data(&self, id: NodeId) -> Vec<(String, DataValue)> {
        let Some(record) = self.record(id) else {
            return Vec::new();
        };

        let mut merged: Vec<(String, DataValue)> = Vec::new();
        if let NodeKind::Element(element) = &record.kind {
            for (name, value) in element.attributes() {
                if let Some(key) = data_key_from_attribute(name) {
                    merged.push((key, DataValue::String(value.to_owned())));
                }
            }
        }
        for (key, value) in &record.data {
            if let Some(slot) = merged.iter_mut().find(|(k, _)| k == key) {
                slot.1 = value.clone();
            } else {
                merged.push((key.clone(), value.clone()));
            }
        }
        merged
    }

    /// One associated value after merging, see [`Document::data`].
    #[must_use]
    pub fn data_value(&self, id: NodeId, key: &str) -> Option<DataValue> {
        self.data(id)
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    // ── Mark bit ────────────────────────────────────────────────────────

    /// Whether the node carries the selection mark.
    #[must_use]
    pub fn is_marked(&self, id: NodeId) -> bool {
        self.record(id).is_some_and(|record| record.marked)
    }

    /// Set or clear the selection mark. Returns `true` if the bit changed.
    pub fn set_marked(&mut self, id: NodeId, marked: bool) -> bool {
        match self.record_mut(id) {
            Some(record) if record.marked != marked => {
                record.marked = marked;
                true
            }
            _ => false,
        }
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Nearest ancestor-or-self of `id` matching `selector`.
    ///
    /// The walk stops before `boundary` (which is never returned) when given.
    #[must_use]
    pub fn closest(
        &self,
        id: NodeId,
        selector: &Selector,
        boundary: Option<NodeId>,
    ) -> Option<NodeId> {
        self.closest_by(id, boundary, |node| selector.matches(self, node))
    }

    /// Nearest ancestor-or-self of `id` satisfying `predicate`, stopping
    /// before `boundary`.
    pub fn closest_by(
        &self,
        id: NodeId,
        boundary: Option<NodeId>,
        mut predicate: impl FnMut(NodeId) -> bool,
    ) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .take_while(|node| Some(*node) != boundary)
            .find(|node| predicate(*node))
    }

    /// Descendants of `scope` matching `selector`, in document order.
    #[must_use]
    pub fn find(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .filter(|node| selector.matches(self, *node))
            .collect()
    }

    /// Concatenated text of all descendant text nodes.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(NodeKind::Text(text)) = self.kind(id) {
            out.push_str(text);
        }
        for node in self.descendants(id) {
            if let Some(NodeKind::Text(text)) = self.kind(node) {
                out.push_str(text);
            }
        }
        out
    }

    // ── Markup ──────────────────────────────────────────────────────────

    /// Serialize `id` including its own tag and all descendants.
    #[must_use]
    pub fn outer_markup(&self, id: NodeId) -> String {
        markup::serialize(self, id)
    }

    /// Parse `input` into detached top-level nodes owned by this document.
    ///
    /// Several concatenated fragments are allowed; the result lists every
    /// top-level node in order. `<script>` elements are dropped.
    pub fn parse_fragment(&mut self, input: &str) -> MarkupResult<Vec<NodeId>> {
        markup::parse_into(self, input)
    }
}

/// Iterator over ancestors, nearest first.
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}

/// Pre-order iterator over descendants.
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(current).iter().rev().copied());
        Some(current)
    }
}
