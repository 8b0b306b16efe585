#![forbid(unsafe_code)]

//! Document model for Interact.
//!
//! # Role
//! `interact-dom` is the tree the interaction layer works against: an
//! arena of nodes addressed by [`NodeId`], a small selector engine for the
//! hooks the interaction layer uses, per-node associated data, and a markup
//! codec that round-trips subtrees through strings.
//!
//! # Invariants
//! - Node ids are never reused. Removing a node only detaches it.
//! - A node has at most one parent and the tree never contains a cycle.
//! - The selection mark bit and programmatic data are node state, never
//!   markup: [`Document::outer_markup`] does not emit them.
//! - Parsing never attaches: [`Document::parse_fragment`] returns detached
//!   top-level nodes for the caller to place.

pub mod data;
pub mod document;
pub mod error;
pub mod markup;
pub mod node;
pub mod selector;

pub use data::{DATA_ATTRIBUTE_PREFIX, DataValue, data_key_from_attribute};
pub use document::{Ancestors, Descendants, Document};
pub use error::{MarkupError, MarkupResult, SelectorError};
pub use markup::decode_entities;
pub use node::{Element, NodeId, NodeKind};
pub use selector::Selector;
