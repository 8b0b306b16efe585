#![forbid(unsafe_code)]

//! The [`Interact`] facade: one container, one document, every host hook.
//!
//! # Example
//!
//! ```
//! use interact_core::{DropEffect, Interact, MemoryTransfer, PointerDown, AllowCleanup};
//! use interact_dom::Document;
//! use web_time::Instant;
//!
//! let mut doc = Document::new();
//! let root = doc.create_element("div");
//! let list = doc.create_element("ul");
//! doc.set_attribute(list, "tabindex", "0");
//! let item = doc.create_element("li");
//! doc.set_attribute(item, "draggable", "");
//! let zone = doc.create_element("ol");
//! doc.set_attribute(zone, "data-dropzone", "");
//! doc.append_child(root, list);
//! doc.append_child(list, item);
//! doc.append_child(root, zone);
//!
//! let mut interact = Interact::new(doc, root, false).expect("root is an element");
//! let now = Instant::now();
//! interact.pointer_down(PointerDown::new(item), now).expect("pointer down");
//!
//! let mut transfer = MemoryTransfer::new();
//! interact.drag_start(item, Some(&mut transfer), now).expect("drag start");
//! assert!(interact.drag_over(zone, Some(&transfer)).default_prevented());
//! interact.drop(zone, Some(&transfer));
//!
//! let transfer = transfer.with_drop_effect(DropEffect::Move);
//! let report = interact
//!     .drag_end(item, Some(&transfer), &mut AllowCleanup)
//!     .expect("drag end");
//! assert_eq!(report.removed, vec![item]);
//! assert_eq!(interact.document().children(zone).len(), 1);
//! ```

use interact_dom::{Document, NodeId};
use web_time::Instant;

use crate::config::InteractConfig;
use crate::error::{InteractError, InteractResult};
use crate::event::PointerDown;
use crate::marking::{CollapseOutcome, MarkingEngine, PointerDispatch};
use crate::protocol::{
    CleanupListener, CleanupReport, DragStart, DropDecision, DropOutcome, TransferProtocol,
};
use crate::transfer::DataTransfer;

/// Marking and drag-transfer behaviour attached to one container.
#[derive(Debug, Clone)]
pub struct Interact {
    doc: Document,
    container: NodeId,
    config: InteractConfig,
    engine: MarkingEngine,
    protocol: TransferProtocol,
}

impl Interact {
    /// Attach to `container` with default timing and the build platform.
    pub fn new(doc: Document, container: NodeId, debug: bool) -> InteractResult<Self> {
        Self::with_config(doc, container, InteractConfig::default().with_debug(debug))
    }

    /// Attach to `container` with an explicit configuration.
    pub fn with_config(
        doc: Document,
        container: NodeId,
        config: InteractConfig,
    ) -> InteractResult<Self> {
        if doc.element(container).is_none() {
            let err = InteractError::InvalidContainer(container);
            tracing::error!("{err}");
            return Err(err);
        }
        let config = config.validated();
        if config.debug {
            tracing::debug!(
                container = %container,
                collapse_delay_ms = config.collapse_delay.as_millis() as u64,
                platform = ?config.platform,
                "attached"
            );
        }
        Ok(Self {
            engine: MarkingEngine::new(container, &config),
            protocol: TransferProtocol::new(container, config.debug),
            doc,
            container,
            config,
        })
    }

    #[must_use]
    pub fn container(&self) -> NodeId {
        self.container
    }

    #[must_use]
    pub fn config(&self) -> &InteractConfig {
        &self.config
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Mutable access for host-side tree edits between events.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Detach and return the document.
    #[must_use]
    pub fn into_document(self) -> Document {
        self.doc
    }

    /// Toggle debug logging at runtime.
    pub fn set_debug(&mut self, debug: bool) {
        self.config.debug = debug;
        self.engine.set_debug(debug);
        self.protocol.set_debug(debug);
    }

    /// Whether a deferred collapse is waiting for its deadline.
    #[must_use]
    pub fn collapse_pending(&self) -> bool {
        self.engine.timer().is_armed()
    }

    /// Deadline of the pending collapse, for hosts that schedule wakeups.
    #[must_use]
    pub fn collapse_deadline(&self) -> Option<Instant> {
        self.engine.timer().deadline()
    }

    // ── Marking ─────────────────────────────────────────────────────────

    /// Focus scope shared by `nodes`.
    pub fn resolve_focus_scope(&self, nodes: &[NodeId]) -> InteractResult<NodeId> {
        self.engine.resolve_focus_scope(&self.doc, nodes)
    }

    /// Marked nodes within `scope`.
    #[must_use]
    pub fn marked(&self, scope: NodeId) -> Vec<NodeId> {
        self.engine.marked(&self.doc, scope)
    }

    /// Marked nodes in the focus scope of `node`.
    pub fn marked_around(&self, node: NodeId) -> InteractResult<Vec<NodeId>> {
        self.engine.marked_around(&self.doc, node)
    }

    pub fn mark(&mut self, node: NodeId) -> InteractResult<bool> {
        self.engine.mark(&mut self.doc, node)
    }

    pub fn unmark(&mut self, node: NodeId) -> InteractResult<bool> {
        self.engine.unmark(&mut self.doc, node)
    }

    pub fn clear_marking(&mut self, scope: NodeId) -> InteractResult<Vec<NodeId>> {
        self.engine.clear_marking(&mut self.doc, scope)
    }

    /// Primary pointer-down inside the container.
    pub fn pointer_down(
        &mut self,
        event: PointerDown,
        now: Instant,
    ) -> InteractResult<PointerDispatch> {
        self.engine.pointer_down(&mut self.doc, event, now)
    }

    /// Event-loop tick: fire a due collapse.
    pub fn poll(&mut self, now: Instant) -> InteractResult<Option<CollapseOutcome>> {
        self.engine.poll(&mut self.doc, now)
    }

    // ── Transfer ────────────────────────────────────────────────────────

    /// `dragstart` on `target`.
    ///
    /// A collapse already due at `now` fires first, so the drag carries the
    /// collapsed set; a collapse still pending is cancelled.
    pub fn drag_start(
        &mut self,
        target: NodeId,
        transfer: Option<&mut dyn DataTransfer>,
        now: Instant,
    ) -> InteractResult<Option<DragStart>> {
        self.engine.interrupt_collapse(&mut self.doc, now)?;
        self.protocol.drag_start(&self.doc, target, transfer)
    }

    /// `dragover` on `target`.
    #[must_use]
    pub fn drag_over(&self, target: NodeId, transfer: Option<&dyn DataTransfer>) -> DropDecision {
        self.protocol.drag_over(&self.doc, target, transfer)
    }

    /// `drop` on `target`.
    pub fn drop(&mut self, target: NodeId, transfer: Option<&dyn DataTransfer>) -> DropOutcome {
        self.protocol.drop(&mut self.doc, target, transfer)
    }

    /// `dragend` on `target`.
    pub fn drag_end(
        &mut self,
        target: NodeId,
        transfer: Option<&dyn DataTransfer>,
        listener: &mut dyn CleanupListener,
    ) -> InteractResult<CleanupReport> {
        self.protocol
            .drag_end(&mut self.doc, target, transfer, listener)
    }
}
