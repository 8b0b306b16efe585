#![forbid(unsafe_code)]

//! Drag payload construction.
//!
//! Every marked node contributes its associated data plus one synthetic
//! entry holding its own markup. Keys are translated to MIME types and
//! values under the same type are joined with `\n` in marked-set order.
//!
//! # Key translation
//!
//! | key                  | MIME type               |
//! |----------------------|-------------------------|
//! | `textPlain`          | `text/plain`            |
//! | `text-x-html`        | `text/x-html`           |
//! | `applicationXMyType` | `application/x-my-type` |
//! | `text/csv`           | `text/csv`              |
//! | `plain`              | `plain`                 |

use ahash::AHashMap;
use interact_dom::{Document, NodeId};

use crate::transfer::DataTransfer;

/// Data key under which each node's markup is added.
pub const MARKUP_DATA_KEY: &str = "text-x-html";
/// MIME type carrying the structured markup.
pub const MARKUP_MIME_TYPE: &str = "text/x-html";
/// Separator between merged values.
pub const VALUE_SEPARATOR: char = '\n';

/// Translate an associated-data key to a MIME type.
///
/// Interior capitals become `-` + lowercase, then the first `-` becomes
/// `/` unless the key already names a type.
#[must_use]
pub fn mime_type_for_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (index, ch) in key.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if index > 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    if !out.contains('/')
        && let Some(dash) = out.find('-')
    {
        out.replace_range(dash..=dash, "/");
    }
    out
}

/// Insertion-ordered MIME type → value mapping.
#[derive(Debug, Clone, Default)]
pub struct TransferPayload {
    entries: Vec<(String, String)>,
    index: AHashMap<String, usize>,
}

impl PartialEq for TransferPayload {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for TransferPayload {}

impl TransferPayload {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` under `mime_type`, joining onto an existing value.
    pub fn push(&mut self, mime_type: &str, value: &str) {
        match self.index.get(mime_type) {
            Some(&slot) => {
                let existing = &mut self.entries[slot].1;
                existing.push(VALUE_SEPARATOR);
                existing.push_str(value);
            }
            None => {
                self.index.insert(mime_type.to_owned(), self.entries.len());
                self.entries.push((mime_type.to_owned(), value.to_owned()));
            }
        }
    }

    /// Value stored under `mime_type`.
    #[must_use]
    pub fn get(&self, mime_type: &str) -> Option<&str> {
        self.index
            .get(mime_type)
            .map(|&slot| self.entries[slot].1.as_str())
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(mime, value)| (mime.as_str(), value.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write every entry into `transfer`.
    pub fn write_to(&self, transfer: &mut dyn DataTransfer) {
        for (mime, value) in self.iter() {
            transfer.set_data(mime, value);
        }
    }
}

/// Build the payload for `nodes` in the given order.
///
/// A node's own `text-x-html` data, if any, is replaced by its markup.
#[must_use]
pub fn build_payload(doc: &Document, nodes: &[NodeId]) -> TransferPayload {
    let mut payload = TransferPayload::new();
    for node in nodes {
        for (key, value) in doc.data(*node) {
            if key == MARKUP_DATA_KEY {
                continue;
            }
            payload.push(&mime_type_for_key(&key), &value.to_string());
        }
        payload.push(MARKUP_MIME_TYPE, &doc.outer_markup(*node));
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn key_translation_table() {
        assert_eq!(mime_type_for_key("textPlain"), "text/plain");
        assert_eq!(mime_type_for_key("text-x-html"), "text/x-html");
        assert_eq!(mime_type_for_key("textXHtml"), "text/x-html");
        assert_eq!(mime_type_for_key("applicationXMyType"), "application/x-my-type");
        assert_eq!(mime_type_for_key("TextPlain"), "text/plain");
        assert_eq!(mime_type_for_key("text/csv"), "text/csv");
        assert_eq!(mime_type_for_key("plain"), "plain");
    }

    #[test]
    fn values_merge_in_order() {
        let mut payload = TransferPayload::new();
        payload.push("text/plain", "A");
        payload.push("text/x-html", "<li>A</li>");
        payload.push("text/plain", "");
        payload.push("text/plain", "C");
        assert_eq!(payload.get("text/plain"), Some("A\n\nC"));
        let order: Vec<_> = payload.iter().map(|(mime, _)| mime).collect();
        assert_eq!(order, vec!["text/plain", "text/x-html"]);
    }

    #[test]
    fn build_payload_from_data_and_markup() {
        let mut doc = Document::new();
        let a = doc.create_element("li");
        doc.set_attribute(a, "data-text-plain", "A");
        let b = doc.create_element("li");
        doc.set_data(b, "textPlain", "B");
        doc.set_data(b, "count", 3);
        doc.set_data(b, MARKUP_DATA_KEY, "stale");

        let payload = build_payload(&doc, &[a, b]);
        let entries: Vec<_> = payload.iter().collect();
        assert_eq!(
            entries,
            vec![
                ("text/plain", "A\nB"),
                ("text/x-html", "<li data-text-plain=\"A\"></li>\n<li></li>"),
                ("count", "3"),
            ]
        );
    }

    #[test]
    fn empty_selection_builds_empty_payload() {
        let doc = Document::new();
        assert!(build_payload(&doc, &[]).is_empty());
    }
}
