#![forbid(unsafe_code)]

//! Marking state machine.
//!
//! One [`MarkingEngine`] owns the selection behaviour of one container. The
//! host feeds it every primary pointer-down inside the container and polls
//! it from its event loop so a deferred collapse can fire.
//!
//! # Dispatch order
//!
//! A single pointer-down runs, in order:
//!
//! 1. fire a pending collapse whose deadline has passed, then cancel any
//!    collapse still pending;
//! 2. the draggable handler, on the nearest draggable ancestor-or-self;
//! 3. the marked-node handler, on the nearest marked ancestor-or-self,
//!    unless the event is already default-prevented;
//! 4. the empty-space handler, when the target is not inside a draggable.
//!
//! # State Machine (per node)
//!
//! ```text
//!              plain click on draggable / command-click
//!   ┌──────────┐ ─────────────────────────────────▶ ┌──────────┐
//!   │ unmarked │                                     │  marked  │
//!   └──────────┘ ◀───────────────────────────────── └──────────┘
//!        command-click, click elsewhere in scope, empty-space click,
//!        collapse fired for another node
//! ```
//!
//! # Invariants
//!
//! - A plain click on an unmarked draggable leaves exactly that node marked
//!   in its focus scope.
//! - A command-click flips exactly one mark bit.
//! - Marks outside the target's focus scope are never touched.

use interact_dom::{Document, NodeId};
use web_time::Instant;

use crate::config::{InteractConfig, Platform};
use crate::error::InteractResult;
use crate::event::PointerDown;
use crate::scope::{
    closest_within, is_draggable, marked_in, resolve_container, resolve_focus_scope,
};
use crate::timer::{CollapseHandle, CollapseTimer};

/// What a pointer-down did to the marked set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkingEffect {
    /// The target lies outside the container.
    Ignored,
    /// Plain click on an unmarked draggable: it became the only mark.
    Selected { node: NodeId, cleared: Vec<NodeId> },
    /// Command-click marked the node.
    ToggledOn(NodeId),
    /// Command-click unmarked the node.
    ToggledOff(NodeId),
    /// Plain click on an already-marked draggable; the set is preserved.
    Kept(NodeId),
    /// Click outside every draggable cleared the scope.
    Deselected { scope: NodeId, cleared: Vec<NodeId> },
}

/// Result of one pointer-down dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerDispatch {
    pub effect: MarkingEffect,
    /// A collapse that came due before this event, fired ahead of it.
    pub collapse_fired: Option<CollapseOutcome>,
    /// A pending collapse was discarded by this event.
    pub collapse_cancelled: bool,
    /// A new collapse was armed by this event.
    pub collapse_armed: Option<CollapseHandle>,
    /// The host must suppress the platform default.
    pub default_prevented: bool,
}

impl PointerDispatch {
    fn ignored(
        collapse_fired: Option<CollapseOutcome>,
        collapse_cancelled: bool,
        default_prevented: bool,
    ) -> Self {
        Self {
            effect: MarkingEffect::Ignored,
            collapse_fired,
            collapse_cancelled,
            collapse_armed: None,
            default_prevented,
        }
    }
}

/// A collapse that fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapseOutcome {
    /// Node left marked.
    pub kept: NodeId,
    /// Scope the collapse ran in.
    pub scope: NodeId,
    /// Nodes that lost their mark.
    pub cleared: Vec<NodeId>,
}

/// Selection state machine for one container.
#[derive(Debug, Clone)]
pub struct MarkingEngine {
    container: NodeId,
    platform: Platform,
    debug: bool,
    timer: CollapseTimer,
}

impl MarkingEngine {
    /// Create an engine for `container`.
    #[must_use]
    pub fn new(container: NodeId, config: &InteractConfig) -> Self {
        Self {
            container,
            platform: config.platform,
            debug: config.debug,
            timer: CollapseTimer::new(config.collapse_delay),
        }
    }

    /// The container this engine is bound to.
    #[must_use]
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// The collapse timer (read-only).
    #[must_use]
    pub fn timer(&self) -> &CollapseTimer {
        &self.timer
    }

    /// Toggle debug events.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Focus scope shared by `nodes`.
    pub fn resolve_focus_scope(
        &self,
        doc: &Document,
        nodes: &[NodeId],
    ) -> InteractResult<NodeId> {
        resolve_focus_scope(doc, self.container, nodes)
    }

    /// Marked nodes within `scope`, in document order.
    #[must_use]
    pub fn marked(&self, doc: &Document, scope: NodeId) -> Vec<NodeId> {
        marked_in(doc, scope)
    }

    /// Marked nodes in the focus scope of `node`.
    pub fn marked_around(&self, doc: &Document, node: NodeId) -> InteractResult<Vec<NodeId>> {
        let scope = self.resolve_focus_scope(doc, &[node])?;
        Ok(marked_in(doc, scope))
    }

    /// Mark `node`. Returns whether its state changed.
    pub fn mark(&mut self, doc: &mut Document, node: NodeId) -> InteractResult<bool> {
        resolve_container(doc, self.container, &[node])?;
        Ok(doc.set_marked(node, true))
    }

    /// Unmark `node`. Returns whether its state changed.
    pub fn unmark(&mut self, doc: &mut Document, node: NodeId) -> InteractResult<bool> {
        resolve_container(doc, self.container, &[node])?;
        Ok(doc.set_marked(node, false))
    }

    /// Unmark everything in `scope`. Returns the nodes that were cleared.
    pub fn clear_marking(
        &mut self,
        doc: &mut Document,
        scope: NodeId,
    ) -> InteractResult<Vec<NodeId>> {
        resolve_container(doc, self.container, &[scope])?;
        Ok(clear_except(doc, scope, None))
    }

    /// Settle the collapse timer before a pointer-down or drag-start.
    ///
    /// A collapse already due at `now` fires first; anything still pending
    /// is cancelled.
    pub fn interrupt_collapse(
        &mut self,
        doc: &mut Document,
        now: Instant,
    ) -> InteractResult<(Option<CollapseOutcome>, bool)> {
        let fired = self.poll(doc, now)?;
        Ok((fired, self.cancel_collapse()))
    }

    /// Discard a pending collapse. Returns whether one was pending.
    pub fn cancel_collapse(&mut self) -> bool {
        let cancelled = self.timer.cancel().is_some();
        if cancelled && self.debug {
            tracing::debug!(container = %self.container, "collapse cancelled");
        }
        cancelled
    }

    /// Handle one primary pointer-down inside the container.
    pub fn pointer_down(
        &mut self,
        doc: &mut Document,
        mut event: PointerDown,
        now: Instant,
    ) -> InteractResult<PointerDispatch> {
        let (collapse_fired, collapse_cancelled) = self.interrupt_collapse(doc, now)?;
        let target = event.target;

        if !doc.contains(self.container, target) {
            return Ok(PointerDispatch::ignored(
                collapse_fired,
                collapse_cancelled,
                event.is_default_prevented(),
            ));
        }

        // ── Draggable handler ──
        let draggable = closest_within(doc, self.container, target, |node| {
            is_draggable(doc, node)
        });
        let mut effect = None;
        if let Some(node) = draggable {
            let was_marked = doc.is_marked(node);
            effect = Some(if self.platform.is_command(event.modifiers) {
                doc.set_marked(node, !was_marked);
                event.prevent_default();
                if was_marked {
                    MarkingEffect::ToggledOff(node)
                } else {
                    MarkingEffect::ToggledOn(node)
                }
            } else if was_marked {
                MarkingEffect::Kept(node)
            } else {
                let scope = self.resolve_focus_scope(doc, &[node])?;
                let cleared = clear_except(doc, scope, Some(node));
                doc.set_marked(node, true);
                event.prevent_default();
                MarkingEffect::Selected { node, cleared }
            });
        }

        // ── Marked-node handler ──
        let mut collapse_armed = None;
        if !event.is_default_prevented()
            && let Some(node) =
                closest_within(doc, self.container, target, |node| doc.is_marked(node))
        {
            let handle = self.timer.arm(node, target, now);
            collapse_armed = Some(handle);
            if self.debug {
                tracing::debug!(
                    node = %node,
                    deadline_ms = self.timer.delay().as_millis() as u64,
                    "collapse armed"
                );
            }
        }

        // ── Empty-space handler ──
        let effect = match effect {
            Some(effect) => effect,
            None => {
                let scope = self.resolve_focus_scope(doc, &[target])?;
                let cleared = clear_except(doc, scope, None);
                MarkingEffect::Deselected { scope, cleared }
            }
        };

        if self.debug {
            tracing::debug!(
                target = %target,
                modifiers = ?event.modifiers,
                effect = ?effect,
                default_prevented = event.is_default_prevented(),
                "pointer_down"
            );
        }

        Ok(PointerDispatch {
            effect,
            collapse_fired,
            collapse_cancelled,
            collapse_armed,
            default_prevented: event.is_default_prevented(),
        })
    }

    /// Fire the pending collapse if it is due.
    ///
    /// Clears every other mark in the focus scope of the original pointer
    /// target, leaving only the clicked node.
    pub fn poll(
        &mut self,
        doc: &mut Document,
        now: Instant,
    ) -> InteractResult<Option<CollapseOutcome>> {
        let Some(pending) = self.timer.poll(now) else {
            return Ok(None);
        };
        let scope = resolve_focus_scope(doc, self.container, &[pending.origin])?;
        let cleared = clear_except(doc, scope, Some(pending.keep));
        if self.debug {
            tracing::debug!(
                kept = %pending.keep,
                scope = %scope,
                cleared = cleared.len(),
                "collapse fired"
            );
        }
        Ok(Some(CollapseOutcome {
            kept: pending.keep,
            scope,
            cleared,
        }))
    }
}

/// Unmark every marked node in `scope` except `keep`.
fn clear_except(doc: &mut Document, scope: NodeId, keep: Option<NodeId>) -> Vec<NodeId> {
    let cleared: Vec<NodeId> = marked_in(doc, scope)
        .into_iter()
        .filter(|node| Some(*node) != keep)
        .collect();
    for node in &cleared {
        doc.set_marked(*node, false);
    }
    cleared
}
