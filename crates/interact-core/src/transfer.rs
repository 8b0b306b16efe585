#![forbid(unsafe_code)]

//! The native drag data store.
//!
//! [`DataTransfer`] is the seam to the platform object. Hosts adapt their
//! own; [`MemoryTransfer`] is a faithful in-memory store for tests and
//! headless hosts; [`NullTransfer`] stands in when the platform delivers
//! no store at all.

use crate::event::{DropEffect, EffectAllowed};

/// A drag data store keyed by MIME type.
pub trait DataTransfer {
    /// Value stored for `format`, if any.
    fn get_data(&self, format: &str) -> Option<String>;

    /// Store `data` under `format`.
    fn set_data(&mut self, format: &str, data: &str);

    /// Remove one format, or everything when `format` is `None`.
    fn clear_data(&mut self, format: Option<&str>);

    /// Stored formats in insertion order.
    fn types(&self) -> Vec<String>;

    fn effect_allowed(&self) -> EffectAllowed;

    fn set_effect_allowed(&mut self, effect: EffectAllowed);

    fn drop_effect(&self) -> DropEffect;

    fn set_drop_effect(&mut self, effect: DropEffect);
}

/// Normalize a format the way platform stores do: ASCII-lowercase, with
/// `text` and `url` as aliases of `text/plain` and `text/uri-list`.
#[must_use]
pub fn normalize_format(format: &str) -> String {
    let lower = format.trim().to_ascii_lowercase();
    match lower.as_str() {
        "text" => "text/plain".to_owned(),
        "url" => "text/uri-list".to_owned(),
        _ => lower,
    }
}

/// In-memory data store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTransfer {
    entries: Vec<(String, String)>,
    effect_allowed: EffectAllowed,
    drop_effect: DropEffect,
}

impl MemoryTransfer {
    /// Empty store, `effectAllowed = uninitialized`, `dropEffect = none`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the negotiated drop effect.
    #[must_use]
    pub fn with_drop_effect(mut self, effect: DropEffect) -> Self {
        self.drop_effect = effect;
        self
    }

    /// Stored pairs in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(format, data)| (format.as_str(), data.as_str()))
    }

    /// Number of stored formats.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DataTransfer for MemoryTransfer {
    fn get_data(&self, format: &str) -> Option<String> {
        let format = normalize_format(format);
        self.entries
            .iter()
            .find(|(existing, _)| *existing == format)
            .map(|(_, data)| data.clone())
    }

    fn set_data(&mut self, format: &str, data: &str) {
        let format = normalize_format(format);
        match self.entries.iter_mut().find(|(existing, _)| *existing == format) {
            Some(slot) => slot.1 = data.to_owned(),
            None => self.entries.push((format, data.to_owned())),
        }
    }

    fn clear_data(&mut self, format: Option<&str>) {
        match format {
            Some(format) => {
                let format = normalize_format(format);
                self.entries.retain(|(existing, _)| *existing != format);
            }
            None => self.entries.clear(),
        }
    }

    fn types(&self) -> Vec<String> {
        self.entries.iter().map(|(format, _)| format.clone()).collect()
    }

    fn effect_allowed(&self) -> EffectAllowed {
        self.effect_allowed
    }

    fn set_effect_allowed(&mut self, effect: EffectAllowed) {
        self.effect_allowed = effect;
    }

    fn drop_effect(&self) -> DropEffect {
        self.drop_effect
    }

    fn set_drop_effect(&mut self, effect: DropEffect) {
        self.drop_effect = effect;
    }
}

/// Store used when the platform provides none.
///
/// Reads are empty, writes are ignored, `dropEffect` is `none` and
/// `effectAllowed` is `all`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullTransfer;

impl DataTransfer for NullTransfer {
    fn get_data(&self, _format: &str) -> Option<String> {
        None
    }

    fn set_data(&mut self, _format: &str, _data: &str) {}

    fn clear_data(&mut self, _format: Option<&str>) {}

    fn types(&self) -> Vec<String> {
        Vec::new()
    }

    fn effect_allowed(&self) -> EffectAllowed {
        EffectAllowed::All
    }

    fn set_effect_allowed(&mut self, _effect: EffectAllowed) {}

    fn drop_effect(&self) -> DropEffect {
        DropEffect::None
    }

    fn set_drop_effect(&mut self, _effect: DropEffect) {}
}
