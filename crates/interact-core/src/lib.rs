#![forbid(unsafe_code)]

//! Marking and drag-transfer core.
//!
//! # Role
//! `interact-core` gives a bounded container two behaviours on top of an
//! [`interact_dom::Document`]:
//!
//! - **Marking**: pointer-downs select a working set of draggable nodes per
//!   focus scope, with command-key toggling and a deferred collapse that
//!   tells "select this one" apart from "drag the whole set".
//! - **Transfer**: a drag serializes the marked set into MIME-typed strings,
//!   a drop zone rebuilds the nodes from the markup entry, and drag end
//!   removes the originals when the platform negotiated a move.
//!
//! # How it fits
//! The host owns event dispatch and time. It calls one [`Interact`] method
//! per platform event, passes the current [`web_time::Instant`], and applies
//! the returned `default_prevented` flags. Nothing here spawns, sleeps, or
//! locks.

pub mod config;
pub mod error;
pub mod event;
pub mod interact;
pub mod marking;
pub mod payload;
pub mod protocol;
pub mod scope;
pub mod timer;
pub mod transfer;

pub use config::{InteractConfig, Platform};
pub use error::{InteractError, InteractResult};
pub use event::{DropEffect, EffectAllowed, Modifiers, PointerDown, UnknownEffect};
pub use interact::Interact;
pub use marking::{CollapseOutcome, MarkingEffect, MarkingEngine, PointerDispatch};
pub use payload::{MARKUP_MIME_TYPE, TransferPayload, build_payload, mime_type_for_key};
pub use protocol::{
    AllowCleanup, CleanupListener, CleanupReport, DragCleanup, DragStart, DropDecision,
    DropOutcome, TransferProtocol,
};
pub use timer::{CollapseHandle, CollapseTimer, PendingCollapse};
pub use transfer::{DataTransfer, MemoryTransfer, NullTransfer};
