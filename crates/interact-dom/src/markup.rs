#![forbid(unsafe_code)]

//! Markup serializer and lenient fragment parser.
//!
//! The serializer produces the same shape a browser reports as `outerHTML`:
//! lowercase tags, attributes in order as `name="value"`, void elements
//! without a closing tag, text and attribute values escaped.
//!
//! The parser accepts what the serializer emits plus the usual hand-written
//! slack:
//! - several top-level fragments in a row (whitespace-only text between
//!   top-level nodes is discarded),
//! - unclosed elements (closed at end of input) and stray end tags (ignored),
//! - unquoted and valueless attributes,
//! - `<!DOCTYPE …>` and `<? … ?>` (skipped).
//!
//! `<script>` elements are dropped entirely. Structural problems that leave
//! no sensible recovery (a `<` tag that never closes, an unterminated quote
//! or comment) are reported as [`MarkupError`].


use crate::document::Document;
use crate::error::{MarkupError, MarkupResult};
use crate::node::{Element, NodeId, NodeKind};

/// Elements that never have children or an end tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is raw text.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements removed during parsing.
const DROPPED_ELEMENTS: &[&str] = &["script"];

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

// ── Serializer ──────────────────────────────────────────────────────────

pub(crate) fn serialize(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, false, &mut out);
    out
}

fn write_node(doc: &Document, id: NodeId, raw_text: bool, out: &mut String) {
    let Some(kind) = doc.kind(id) else {
        return;
    };
    match kind {
        NodeKind::Text(text) if raw_text => out.push_str(text),
        NodeKind::Text(text) => escape_into(out, text, false),
        NodeKind::Comment(body) => {
            out.push_str("<!--");
            out.push_str(body);
            out.push_str("-->");
        }
        NodeKind::Element(element) => {
            out.push('<');
            out.push_str(element.tag());
            for (name, value) in element.attributes() {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_into(out, value, true);
                out.push('"');
            }
            out.push('>');
            if is_void(element.tag()) {
                return;
            }
            let raw = RAW_TEXT_ELEMENTS.contains(&element.tag());
            for child in doc.children(id) {
                write_node(doc, *child, raw, out);
            }
            out.push_str("</");
            out.push_str(element.tag());
            out.push('>');
        }
    }
}

/// Escape the characters a browser escapes when serializing: `&`, `<`, `>`,
/// plus `"` inside attribute values.
fn escape_into(out: &mut String, s: &str, attribute: bool) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

// ── Parser ──────────────────────────────────────────────────────────────

struct Parser<'a, 'd> {
    input: &'a str,
    pos: usize,
    doc: &'d mut Document,
    open: Vec<NodeId>,
    top_level: Vec<NodeId>,
}

pub(crate) fn parse_into(doc: &mut Document, input: &str) -> MarkupResult<Vec<NodeId>> {
    let mut parser = Parser {
        input,
        pos: 0,
        doc,
        open: Vec::new(),
        top_level: Vec::new(),
    };
    parser.run()?;
    Ok(parser.top_level)
}

impl Parser<'_, '_> {
    fn rest(&self) -> &str {
        &self.input[self.pos..]
    }

    fn run(&mut self) -> MarkupResult<()> {
        while self.pos < self.input.len() {
            let rest = self.rest();
            if rest.starts_with("<!--") {
                self.comment()?;
            } else if rest.starts_with("</") {
                self.end_tag()?;
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                self.skip_declaration()?;
            } else if rest.len() > 1
                && rest.as_bytes()[0] == b'<'
                && rest.as_bytes()[1].is_ascii_alphabetic()
            {
                self.start_tag()?;
            } else {
                self.text();
            }
        }
        Ok(())
    }

    fn attach(&mut self, node: NodeId) {
        match self.open.last() {
            Some(parent) => {
                self.doc.append_child(*parent, node);
            }
            None => self.top_level.push(node),
        }
    }

    fn text(&mut self) {
        let start = self.pos;
        // Whatever sits at the current position did not open a tag: keep it.
        let scan_from = start + self.rest().chars().next().map_or(1, char::len_utf8);
        let end = self.input[scan_from..]
            .find('<')
            .map_or(self.input.len(), |rel| scan_from + rel);
        self.pos = end;

        let raw = &self.input[start..end];
        if self.open.is_empty() && raw.trim().is_empty() {
            return;
        }
        let decoded = decode_entities(raw);
        let node = self.doc.create_text(&decoded);
        self.attach(node);
    }

    fn comment(&mut self) -> MarkupResult<()> {
        let start = self.pos;
        let body_start = start + 4;
        let close = self.input[body_start..]
            .find("-->")
            .ok_or(MarkupError::UnterminatedComment(start))?;
        let body = &self.input[body_start..body_start + close];
        let node = self.doc.create_comment(body);
        self.attach(node);
        self.pos = body_start + close + 3;
        Ok(())
    }

    fn skip_declaration(&mut self) -> MarkupResult<()> {
        let start = self.pos;
        let close = self
            .rest()
            .find('>')
            .ok_or(MarkupError::UnterminatedTag(start))?;
        self.pos = start + close + 1;
        Ok(())
    }

    fn end_tag(&mut self) -> MarkupResult<()> {
        let start = self.pos;
        let close = self
            .rest()
            .find('>')
            .ok_or(MarkupError::UnterminatedTag(start))?;
        let name = self.input[start + 2..start + close]
            .trim()
            .to_ascii_lowercase();
        self.pos = start + close + 1;

        let matching = self.open.iter().rposition(|open| {
            self.doc
                .element(*open)
                .is_some_and(|element| element.tag() == name)
        });
        if let Some(index) = matching {
            self.open.truncate(index);
        }
        Ok(())
    }

    fn start_tag(&mut self) -> MarkupResult<()> {
        let start = self.pos;
        let input = self.input;
        let bytes = input.as_bytes();
        let mut pos = start + 1;
        while pos < bytes.len() && is_name_byte(bytes[pos]) {
            pos += 1;
        }
        if pos >= bytes.len() {
            return Err(MarkupError::UnterminatedTag(start));
        }
        if !(bytes[pos].is_ascii_whitespace() || bytes[pos] == b'>' || bytes[pos] == b'/') {
            return Err(MarkupError::InvalidTagName(start));
        }

        let mut element = Element::new(&input[start + 1..pos]);
        let self_closing;
        loop {
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if pos >= bytes.len() {
                return Err(MarkupError::UnterminatedTag(start));
            }
            match bytes[pos] {
                b'>' => {
                    self_closing = false;
                    pos += 1;
                    break;
                }
                b'/' if bytes.get(pos + 1) == Some(&b'>') => {
                    self_closing = true;
                    pos += 2;
                    break;
                }
                b'/' => {
                    pos += 1;
                }
                _ => {
                    pos = self.attribute(&mut element, pos, start)?;
                }
            }
        }
        self.pos = pos;

        let tag = element.tag().to_owned();
        if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
            let body = self.raw_text(&tag);
            if DROPPED_ELEMENTS.contains(&tag.as_str()) {
                tracing::trace!(tag = %tag, offset = start, "dropped element while parsing");
                return Ok(());
            }
            let node = self.doc.adopt_element(element);
            self.attach(node);
            if !body.is_empty() {
                let text = self.doc.create_text(&body);
                self.doc.append_child(node, text);
            }
            return Ok(());
        }

        let node = self.doc.adopt_element(element);
        self.attach(node);
        if !self_closing && !is_void(&tag) {
            self.open.push(node);
        }
        Ok(())
    }

    /// Parse one attribute starting at `pos`; returns the position after it.
    fn attribute(
        &self,
        element: &mut Element,
        mut pos: usize,
        tag_start: usize,
    ) -> MarkupResult<usize> {
        let bytes = self.input.as_bytes();
        let name_start = pos;
        while pos < bytes.len()
            && !bytes[pos].is_ascii_whitespace()
            && !matches!(bytes[pos], b'=' | b'>' | b'/')
        {
            pos += 1;
        }
        let name = &self.input[name_start..pos];

        let mut probe = pos;
        while probe < bytes.len() && bytes[probe].is_ascii_whitespace() {
            probe += 1;
        }
        let value = if bytes.get(probe) == Some(&b'=') {
            pos = probe + 1;
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            match bytes.get(pos) {
                Some(&quote @ (b'"' | b'\'')) => {
                    let value_start = pos + 1;
                    let close = self.input[value_start..]
                        .find(quote as char)
                        .ok_or(MarkupError::UnterminatedQuote(pos))?;
                    pos = value_start + close + 1;
                    decode_entities(&self.input[value_start..value_start + close])
                }
                Some(_) => {
                    let value_start = pos;
                    while pos < bytes.len()
                        && !bytes[pos].is_ascii_whitespace()
                        && bytes[pos] != b'>'
                    {
                        pos += 1;
                    }
                    decode_entities(&self.input[value_start..pos])
                }
                None => return Err(MarkupError::UnterminatedTag(tag_start)),
            }
        } else {
            String::new()
        };

        // First occurrence wins on duplicates.
        if !name.is_empty() && !element.has_attribute(name) {
            element.set_attribute(name, value);
        }
        Ok(pos)
    }

    /// Consume raw text up to the matching end tag (or end of input).
    fn raw_text(&mut self, tag: &str) -> String {
        let closing = format!("</{tag}");
        let lowered = self.rest().to_ascii_lowercase();
        let start = self.pos;
        match lowered.find(&closing) {
            Some(rel) => {
                let body = self.input[start..start + rel].to_owned();
                let after = start + rel;
                self.pos = self.input[after..]
                    .find('>')
                    .map_or(self.input.len(), |gt| after + gt + 1);
                body
            }
            None => {
                self.pos = self.input.len();
                self.input[start..].to_owned()
            }
        }
    }
}

fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b':')
}

/// Decode the named entities the serializer emits plus numeric references.
/// Unknown entities are kept literally.
#[must_use]
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_owned();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail.find(';').filter(|semi| *semi <= 10) {
            Some(semi) => {
                let entity = &tail[1..semi];
                match decode_entity(entity) {
                    Some(ch) => out.push(ch),
                    None => out.push_str(&tail[..=semi]),
                }
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = entity.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}
