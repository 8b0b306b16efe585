#![forbid(unsafe_code)]

//! Drag transfer protocol.
//!
//! Four host callbacks map onto four methods:
//!
//! | platform event | method                         | routed to                 |
//! |----------------|--------------------------------|---------------------------|
//! | `dragstart`    | [`TransferProtocol::drag_start`] | nearest `[draggable]`     |
//! | `dragover`     | [`TransferProtocol::drag_over`]  | nearest `[data-dropzone]` |
//! | `drop`         | [`TransferProtocol::drop`]       | nearest `[data-dropzone]` |
//! | `dragend`      | [`TransferProtocol::drag_end`]   | nearest `[draggable]`     |
//!
//! A missing transfer object is replaced by [`NullTransfer`].
//!
//! # Invariants
//!
//! - `drag_over` never mutates the tree.
//! - `drop` either appends every parsed node or changes nothing.
//! - `drag_end` removes a node only when the negotiated effect is `move`
//!   and no cleanup listener vetoed it; removal is idempotent.

use interact_dom::{Document, MarkupError, NodeId};

use crate::error::InteractResult;
use crate::event::{DropEffect, EffectAllowed};
use crate::payload::{MARKUP_MIME_TYPE, TransferPayload, build_payload};
use crate::scope::{
    closest_within, is_draggable, is_dropzone, marked_in, resolve_focus_scope,
};
use crate::transfer::{DataTransfer, NullTransfer};

/// Effects offered by every drag this protocol starts.
pub const DRAG_EFFECT_ALLOWED: EffectAllowed = EffectAllowed::CopyMove;

// ── Events and outcomes ─────────────────────────────────────────────────

/// Cancelable per-node notification dispatched during drag end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragCleanup {
    /// Marked node about to be cleaned up.
    pub node: NodeId,
    /// Effect negotiated for the drag.
    pub drop_effect: DropEffect,
    default_prevented: bool,
}

impl DragCleanup {
    fn new(node: NodeId, drop_effect: DropEffect) -> Self {
        Self {
            node,
            drop_effect,
            default_prevented: false,
        }
    }

    /// Veto cleanup of this node.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    #[must_use]
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Receives [`DragCleanup`] notifications.
pub trait CleanupListener {
    fn on_cleanup(&mut self, doc: &Document, event: &mut DragCleanup);
}

impl<F> CleanupListener for F
where
    F: FnMut(&Document, &mut DragCleanup),
{
    fn on_cleanup(&mut self, doc: &Document, event: &mut DragCleanup) {
        self(doc, event);
    }
}

/// Listener that never vetoes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowCleanup;

impl CleanupListener for AllowCleanup {
    fn on_cleanup(&mut self, _doc: &Document, _event: &mut DragCleanup) {}
}

/// Result of a drag start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragStart {
    /// Draggable the gesture started on.
    pub source: NodeId,
    /// Marked nodes that went into the payload.
    pub nodes: Vec<NodeId>,
    /// Payload written to the transfer object.
    pub payload: TransferPayload,
}

/// Result of a drag-over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropDecision {
    /// The target is not inside a drop zone.
    Ignored,
    /// The drag carries no structured markup.
    NoPayload,
    /// The zone accepts the drop; the host must suppress the default.
    Accept { zone: NodeId },
}

impl DropDecision {
    /// Whether the host must call `preventDefault`.
    #[must_use]
    pub const fn default_prevented(self) -> bool {
        matches!(self, Self::Accept { .. })
    }
}

/// Result of a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// The target is not inside a drop zone.
    Ignored,
    /// The drag carries no structured markup.
    NoPayload,
    /// The markup did not parse; nothing was inserted.
    Malformed(MarkupError),
    /// Parsed nodes were appended to the zone.
    Inserted { zone: NodeId, nodes: Vec<NodeId> },
}

impl DropOutcome {
    /// Whether the host must call `preventDefault`.
    #[must_use]
    pub const fn default_prevented(&self) -> bool {
        matches!(self, Self::Inserted { .. })
    }
}

/// Result of a drag end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Draggable the gesture ended on, if the target had one.
    pub source: Option<NodeId>,
    pub drop_effect: DropEffect,
    /// Nodes detached from the tree.
    pub removed: Vec<NodeId>,
    /// Nodes a listener vetoed.
    pub vetoed: Vec<NodeId>,
    /// Nodes left in place because the effect was not `move`.
    pub kept: Vec<NodeId>,
}

// ── Protocol ────────────────────────────────────────────────────────────

/// Transfer protocol bound to one container.
#[derive(Debug, Clone)]
pub struct TransferProtocol {
    container: NodeId,
    debug: bool,
}

impl TransferProtocol {
    #[must_use]
    pub fn new(container: NodeId, debug: bool) -> Self {
        Self { container, debug }
    }

    /// Toggle debug events.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    fn drag_source(&self, doc: &Document, target: NodeId) -> Option<NodeId> {
        closest_within(doc, self.container, target, |node| is_draggable(doc, node))
    }

    fn drop_zone(&self, doc: &Document, target: NodeId) -> Option<NodeId> {
        closest_within(doc, self.container, target, |node| is_dropzone(doc, node))
    }

    /// Serialize the marked set around the dragged node into `transfer`.
    ///
    /// Returns `Ok(None)` when the target is not inside a draggable.
    pub fn drag_start(
        &self,
        doc: &Document,
        target: NodeId,
        transfer: Option<&mut dyn DataTransfer>,
    ) -> InteractResult<Option<DragStart>> {
        let Some(source) = self.drag_source(doc, target) else {
            return Ok(None);
        };
        let scope = resolve_focus_scope(doc, self.container, &[source])?;
        let nodes = marked_in(doc, scope);
        let payload = build_payload(doc, &nodes);

        let mut null = NullTransfer;
        let transfer: &mut dyn DataTransfer = match transfer {
            Some(transfer) => transfer,
            None => &mut null,
        };
        payload.write_to(transfer);
        transfer.set_effect_allowed(DRAG_EFFECT_ALLOWED);

        if self.debug {
            tracing::debug!(
                source = %source,
                nodes = nodes.len(),
                types = ?payload.iter().map(|(mime, _)| mime).collect::<Vec<_>>(),
                "set_data"
            );
        }

        Ok(Some(DragStart {
            source,
            nodes,
            payload,
        }))
    }

    /// Decide whether the zone under `target` accepts the drag.
    #[must_use]
    pub fn drag_over(
        &self,
        doc: &Document,
        target: NodeId,
        transfer: Option<&dyn DataTransfer>,
    ) -> DropDecision {
        let Some(zone) = self.drop_zone(doc, target) else {
            return DropDecision::Ignored;
        };
        if markup_payload(transfer).is_none() {
            return DropDecision::NoPayload;
        }
        DropDecision::Accept { zone }
    }

    /// Parse the dropped markup and append it to the zone under `target`.
    pub fn drop(
        &self,
        doc: &mut Document,
        target: NodeId,
        transfer: Option<&dyn DataTransfer>,
    ) -> DropOutcome {
        let Some(zone) = self.drop_zone(doc, target) else {
            return DropOutcome::Ignored;
        };
        let Some(markup) = markup_payload(transfer) else {
            return DropOutcome::NoPayload;
        };

        let nodes = match doc.parse_fragment(&markup) {
            Ok(nodes) => nodes,
            Err(err) => {
                tracing::warn!(zone = %zone, error = %err, "dropped markup did not parse");
                return DropOutcome::Malformed(err);
            }
        };
        for node in &nodes {
            doc.append_child(zone, *node);
        }

        if self.debug {
            tracing::debug!(zone = %zone, nodes = nodes.len(), "drop");
        }
        DropOutcome::Inserted { zone, nodes }
    }

    /// Clean up the marked set around the dragged node.
    pub fn drag_end(
        &self,
        doc: &mut Document,
        target: NodeId,
        transfer: Option<&dyn DataTransfer>,
        listener: &mut dyn CleanupListener,
    ) -> InteractResult<CleanupReport> {
        let drop_effect = transfer.map_or(DropEffect::None, |transfer| transfer.drop_effect());
        let Some(source) = self.drag_source(doc, target) else {
            return Ok(CleanupReport {
                drop_effect,
                ..CleanupReport::default()
            });
        };
        let scope = resolve_focus_scope(doc, self.container, &[source])?;

        let mut report = CleanupReport {
            source: Some(source),
            drop_effect,
            ..CleanupReport::default()
        };
        for node in marked_in(doc, scope) {
            let mut event = DragCleanup::new(node, drop_effect);
            listener.on_cleanup(doc, &mut event);
            if event.is_default_prevented() {
                report.vetoed.push(node);
            } else if drop_effect == DropEffect::Move {
                if doc.remove(node) {
                    report.removed.push(node);
                }
            } else {
                report.kept.push(node);
            }
        }

        if self.debug {
            tracing::debug!(
                source = %source,
                effect = %drop_effect,
                removed = report.removed.len(),
                vetoed = report.vetoed.len(),
                "drag_end"
            );
        }
        Ok(report)
    }
}

/// Non-empty structured markup carried by `transfer`.
fn markup_payload(transfer: Option<&dyn DataTransfer>) -> Option<String> {
    let markup = match transfer {
        Some(transfer) => transfer.get_data(MARKUP_MIME_TYPE),
        None => NullTransfer.get_data(MARKUP_MIME_TYPE),
    };
    markup.filter(|markup| !markup.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::MemoryTransfer;
    use pretty_assertions::assert_eq;

    struct Fixture {
        doc: Document,
        protocol: TransferProtocol,
        source_list: NodeId,
        a: NodeId,
        b: NodeId,
        zone: NodeId,
        zone_label: NodeId,
    }

    fn fixture() -> Fixture {
        let mut doc = Document::new();
        let container = doc.create_element("div");
        let source_list = doc.create_element("ul");
        doc.set_attribute(source_list, "tabindex", "0");
        doc.append_child(container, source_list);
        let a = doc.create_element("li");
        doc.set_attribute(a, "draggable", "");
        doc.set_attribute(a, "data-text-plain", "A");
        let b = doc.create_element("li");
        doc.set_attribute(b, "draggable", "");
        doc.set_attribute(b, "data-text-plain", "B");
        doc.append_child(source_list, a);
        doc.append_child(source_list, b);
        let zone = doc.create_element("ol");
        doc.set_attribute(zone, "data-dropzone", "");
        doc.append_child(container, zone);
        let zone_label = doc.create_element("span");
        doc.append_child(zone, zone_label);
        Fixture {
            protocol: TransferProtocol::new(container, false),
            doc,
            source_list,
            a,
            b,
            zone,
            zone_label,
        }
    }

    #[test]
    fn drag_start_writes_merged_payload() {
        let mut f = fixture();
        f.doc.set_marked(f.a, true);
        f.doc.set_marked(f.b, true);
        let mut transfer = MemoryTransfer::new();

        let start = f
            .protocol
            .drag_start(&f.doc, f.b, Some(&mut transfer))
            .expect("drag start")
            .expect("draggable target");
        assert_eq!(start.source, f.b);
        assert_eq!(start.nodes, vec![f.a, f.b]);
        assert_eq!(transfer.get_data("text/plain").as_deref(), Some("A\nB"));
        assert_eq!(transfer.effect_allowed(), EffectAllowed::CopyMove);
        assert_eq!(transfer.types(), vec!["text/plain", "text/x-html"]);
    }

    #[test]
    fn drag_start_without_transfer_still_reports_payload() {
        let mut f = fixture();
        f.doc.set_marked(f.a, true);
        let start = f
            .protocol
            .drag_start(&f.doc, f.a, None)
            .expect("drag start")
            .expect("draggable target");
        assert_eq!(start.payload.get("text/plain"), Some("A"));
    }

    #[test]
    fn drag_start_outside_draggable_is_ignored() {
        let f = fixture();
        assert_eq!(f.protocol.drag_start(&f.doc, f.source_list, None), Ok(None));
    }

    #[test]
    fn drag_over_requires_zone_and_markup() {
        let f = fixture();
        let mut transfer = MemoryTransfer::new();
        assert_eq!(
            f.protocol.drag_over(&f.doc, f.zone, Some(&transfer)),
            DropDecision::NoPayload
        );
        transfer.set_data("text/x-html", "");
        assert_eq!(
            f.protocol.drag_over(&f.doc, f.zone, Some(&transfer)),
            DropDecision::NoPayload
        );
        transfer.set_data("text/x-html", "<li></li>");
        let decision = f.protocol.drag_over(&f.doc, f.zone_label, Some(&transfer));
        assert_eq!(decision, DropDecision::Accept { zone: f.zone });
        assert!(decision.default_prevented());
        assert_eq!(
            f.protocol.drag_over(&f.doc, f.a, Some(&transfer)),
            DropDecision::Ignored
        );
        assert_eq!(f.protocol.drag_over(&f.doc, f.zone, None), DropDecision::NoPayload);
    }

    #[test]
    fn drop_appends_parsed_nodes() {
        let mut f = fixture();
        let mut transfer = MemoryTransfer::new();
        transfer.set_data("text/x-html", "<li id=\"x\">X</li>\n<li id=\"y\">Y</li>");
        let outcome = f.protocol.drop(&mut f.doc, f.zone, Some(&transfer));
        let DropOutcome::Inserted { zone, nodes } = outcome else {
            panic!("expected insertion, got {outcome:?}");
        };
        assert_eq!(zone, f.zone);
        assert_eq!(nodes.len(), 2);
        assert_eq!(f.doc.children(f.zone), &[f.zone_label, nodes[0], nodes[1]]);
        assert_eq!(f.doc.attribute(nodes[1], "id"), Some("y"));
    }

    #[test]
    fn malformed_drop_changes_nothing() {
        let mut f = fixture();
        let mut transfer = MemoryTransfer::new();
        transfer.set_data("text/x-html", "<li class=\"x>");
        let outcome = f.protocol.drop(&mut f.doc, f.zone, Some(&transfer));
        assert!(matches!(outcome, DropOutcome::Malformed(_)));
        assert!(!outcome.default_prevented());
        assert_eq!(f.doc.children(f.zone), &[f.zone_label]);
    }

    #[test]
    fn drag_end_move_removes_and_respects_veto() {
        let mut f = fixture();
        f.doc.set_marked(f.a, true);
        f.doc.set_marked(f.b, true);
        let transfer = MemoryTransfer::new().with_drop_effect(DropEffect::Move);
        let veto = f.a;
        let mut listener = |_: &Document, event: &mut DragCleanup| {
            if event.node == veto {
                event.prevent_default();
            }
        };

        let report = f
            .protocol
            .drag_end(&mut f.doc, f.b, Some(&transfer), &mut listener)
            .expect("drag end");
        assert_eq!(report.removed, vec![f.b]);
        assert_eq!(report.vetoed, vec![f.a]);
        assert_eq!(f.doc.parent(f.b), None);
        assert_eq!(f.doc.parent(f.a), Some(f.source_list));
    }

    #[test]
    fn drag_end_copy_keeps_everything() {
        let mut f = fixture();
        f.doc.set_marked(f.a, true);
        let transfer = MemoryTransfer::new().with_drop_effect(DropEffect::Copy);
        let report = f
            .protocol
            .drag_end(&mut f.doc, f.a, Some(&transfer), &mut AllowCleanup)
            .expect("drag end");
        assert_eq!(report.kept, vec![f.a]);
        assert!(report.removed.is_empty());
        assert_eq!(f.doc.parent(f.a), Some(f.source_list));
    }

    #[test]
    fn drag_end_without_transfer_is_none_effect() {
        let mut f = fixture();
        f.doc.set_marked(f.a, true);
        let report = f
            .protocol
            .drag_end(&mut f.doc, f.a, None, &mut AllowCleanup)
            .expect("drag end");
        assert_eq!(report.drop_effect, DropEffect::None);
        assert_eq!(report.kept, vec![f.a]);
    }
}
