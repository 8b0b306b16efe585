#![forbid(unsafe_code)]

//! A small CSS-like selector subset.
//!
//! Supported grammar:
//!
//! ```text
//! list      := complex ("," complex)*
//! complex   := compound (WS compound)*        descendant combinator only
//! compound  := ("*" | tag)? simple*
//! simple    := "." ident | "#" ident | "[" ident ("=" value)? "]"
//! ```
//!
//! Hosts use it with [`Document::closest`] and [`Document::find`] for tree
//! queries such as `ul[tabindex] li` or `[data-dropzone]`.

use crate::document::Document;
use crate::error::SelectorError;
use crate::node::{Element, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Simple {
    Class(String),
    Id(String),
    Attribute { name: String, value: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    simples: Vec<Simple>,
}

impl Compound {
    fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag
            && tag != element.tag()
        {
            return false;
        }
        self.simples.iter().all(|simple| match simple {
            Simple::Class(class) => element.has_class(class),
            Simple::Id(id) => element.attribute("id") == Some(id.as_str()),
            Simple::Attribute { name, value: None } => element.has_attribute(name),
            Simple::Attribute {
                name,
                value: Some(expected),
            } => element.attribute(name) == Some(expected.as_str()),
        })
    }
}

/// Parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Vec<Compound>>,
}

impl Selector {
    /// Parse a selector string.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut alternatives = Vec::new();
        let mut offset = 0;
        for part in input.split(',') {
            let complex = parse_complex(part, offset)?;
            alternatives.push(complex);
            offset += part.len() + 1;
        }
        Ok(Self { alternatives })
    }

    /// Whether `node` matches any alternative of the list.
    ///
    /// Descendant combinators look at every ancestor up to the document root.
    #[must_use]
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.alternatives
            .iter()
            .any(|complex| matches_complex(complex, doc, node))
    }
}

impl std::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn matches_complex(complex: &[Compound], doc: &Document, node: NodeId) -> bool {
    let Some((last, rest)) = complex.split_last() else {
        return false;
    };
    let Some(element) = doc.element(node) else {
        return false;
    };
    if !last.matches(element) {
        return false;
    }

    // Right-to-left greedy walk; sound for descendant-only combinators.
    let mut remaining = rest.iter().rev().peekable();
    for ancestor in doc.ancestors(node) {
        let Some(next) = remaining.peek() else {
            break;
        };
        if doc.element(ancestor).is_some_and(|el| next.matches(el)) {
            remaining.next();
        }
    }
    remaining.peek().is_none()
}

fn parse_complex(input: &str, base: usize) -> Result<Vec<Compound>, SelectorError> {
    let mut compounds = Vec::new();
    let bytes = input.as_bytes();
    let mut pos = 0;

    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= bytes.len() {
            break;
        }
        let (compound, next) = parse_compound(input, pos, base)?;
        compounds.push(compound);
        pos = next;
    }

    if compounds.is_empty() {
        return Err(SelectorError::Empty);
    }
    Ok(compounds)
}

fn parse_compound(
    input: &str,
    start: usize,
    base: usize,
) -> Result<(Compound, usize), SelectorError> {
    let bytes = input.as_bytes();
    let mut compound = Compound::default();
    let mut pos = start;

    if bytes[pos] == b'*' {
        pos += 1;
    } else if is_ident_byte(bytes[pos]) {
        let end = scan_ident(bytes, pos);
        compound.tag = Some(input[pos..end].to_ascii_lowercase());
        pos = end;
    }

    while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() {
        match bytes[pos] {
            b'.' | b'#' => {
                let end = scan_ident(bytes, pos + 1);
                if end == pos + 1 {
                    return Err(unexpected(input, pos + 1, base));
                }
                let ident = input[pos + 1..end].to_owned();
                compound.simples.push(if bytes[pos] == b'.' {
                    Simple::Class(ident)
                } else {
                    Simple::Id(ident)
                });
                pos = end;
            }
            b'[' => {
                let close = input[pos..]
                    .find(']')
                    .map(|rel| pos + rel)
                    .ok_or(SelectorError::UnterminatedAttribute(base + pos))?;
                let body = input[pos + 1..close].trim();
                let (name, value) = match body.split_once('=') {
                    Some((name, value)) => (name.trim(), Some(unquote(value.trim()))),
                    None => (body, None),
                };
                if name.is_empty() || !name.bytes().all(is_ident_byte) {
                    return Err(unexpected(input, pos + 1, base));
                }
                compound.simples.push(Simple::Attribute {
                    name: name.to_ascii_lowercase(),
                    value,
                });
                pos = close + 1;
            }
            _ => return Err(unexpected(input, pos, base)),
        }
    }

    Ok((compound, pos))
}

fn unquote(value: &str) -> String {
    let trimmed = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value);
    trimmed.to_owned()
}

fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_'
}

fn scan_ident(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() && is_ident_byte(bytes[end]) {
        end += 1;
    }
    end
}

fn unexpected(input: &str, pos: usize, base: usize) -> SelectorError {
    let found = input[pos..].chars().next().unwrap_or('\0');
    SelectorError::Unexpected {
        found,
        offset: base + pos,
    }
}
