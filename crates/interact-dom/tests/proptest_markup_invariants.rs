//! Property-based invariant tests for the markup codec.
//!
//! 1. Serialize → parse → serialize is a fixed point for generated trees
//! 2. Parsing yields detached nodes and never panics on arbitrary input
//! 3. Attribute values survive escaping byte-for-byte
//! 4. The mark bit never leaks into markup

use interact_dom::{Document, NodeId, NodeKind};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Tree {
    Text(String),
    Element {
        tag: &'static str,
        attributes: Vec<(&'static str, String)>,
        children: Vec<Tree>,
    },
}

fn tag_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["div", "span", "li", "ul", "p", "section"])
}

fn attribute_strategy() -> impl Strategy<Value = Vec<(&'static str, String)>> {
    prop::collection::vec(
        (
            prop::sample::select(vec!["id", "class", "draggable", "data-kind", "title"]),
            "[a-zA-Z0-9 <>&\"'/=]{0,10}",
        ),
        0..4,
    )
}

fn tree_strategy() -> impl Strategy<Value = Tree> {
    let leaf = "[a-zA-Z0-9 <>&\"'/]{1,12}".prop_map(Tree::Text);
    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            tag_strategy(),
            attribute_strategy(),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(tag, attributes, children)| Tree::Element {
                tag,
                attributes,
                children,
            })
    })
}

fn root_strategy() -> impl Strategy<Value = Tree> {
    (
        tag_strategy(),
        attribute_strategy(),
        prop::collection::vec(tree_strategy(), 0..4),
    )
        .prop_map(|(tag, attributes, children)| Tree::Element {
            tag,
            attributes,
            children,
        })
}

fn build(doc: &mut Document, tree: &Tree) -> NodeId {
    match tree {
        Tree::Text(text) => doc.create_text(text),
        Tree::Element {
            tag,
            attributes,
            children,
        } => {
            let node = doc.create_element(tag);
            for (name, value) in attributes {
                doc.set_attribute(node, name, value);
            }
            for child in children {
                let child = build(doc, child);
                doc.append_child(node, child);
            }
            node
        }
    }
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn serialize_parse_is_a_fixed_point(tree in root_strategy()) {
        let mut source = Document::new();
        let root = build(&mut source, &tree);
        let markup = source.outer_markup(root);

        let mut target = Document::new();
        let nodes = target.parse_fragment(&markup).expect("serializer output parses");
        prop_assert_eq!(nodes.len(), 1);
        prop_assert_eq!(target.outer_markup(nodes[0]), markup);
    }

    #[test]
    fn parse_never_panics_and_returns_detached_nodes(input in any::<String>()) {
        let mut doc = Document::new();
        if let Ok(nodes) = doc.parse_fragment(&input) {
            for node in nodes {
                prop_assert!(doc.parent(node).is_none());
            }
        }
    }

    #[test]
    fn attribute_values_survive_escaping(value in "\\PC{0,24}") {
        let mut source = Document::new();
        let node = source.create_element("li");
        source.set_attribute(node, "title", &value);

        let mut target = Document::new();
        let nodes = target
            .parse_fragment(&source.outer_markup(node))
            .expect("serializer output parses");
        prop_assert_eq!(target.attribute(nodes[0], "title"), Some(value.as_str()));
    }

    #[test]
    fn mark_bit_never_serialized(tree in root_strategy()) {
        let mut doc = Document::new();
        let root = build(&mut doc, &tree);
        let before = doc.outer_markup(root);
        let all: Vec<NodeId> = std::iter::once(root).chain(doc.descendants(root)).collect();
        for node in all {
            doc.set_marked(node, true);
        }
        prop_assert_eq!(doc.outer_markup(root), before);
    }
}

// ── Fixed cases ─────────────────────────────────────────────────────────

#[test]
fn concatenated_fragments_keep_order() {
    let mut doc = Document::new();
    let nodes = doc
        .parse_fragment("<li>one</li>\n<li>two</li>\n<li>three</li>")
        .expect("fragment parses");
    let texts: Vec<String> = nodes.iter().map(|n| doc.text_content(*n)).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
}

#[test]
fn top_level_text_is_kept_when_not_blank() {
    let mut doc = Document::new();
    let nodes = doc.parse_fragment("hello <b>world</b>").expect("fragment parses");
    assert_eq!(nodes.len(), 2);
    assert_eq!(doc.kind(nodes[0]), Some(&NodeKind::Text("hello ".into())));
}
