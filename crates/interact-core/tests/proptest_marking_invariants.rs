//! Property-based invariant tests for the marking engine.
//!
//! These tests drive random pointer sequences over two focus scopes and
//! check:
//!
//! 1. A plain click on an unmarked draggable leaves exactly one mark in its
//!    scope
//! 2. A command-click flips exactly the target's mark bit
//! 3. Nothing outside the target's scope ever changes
//! 4. A fired collapse leaves exactly one mark in the scope
//! 5. No operation sequence panics or errors on a well-formed tree

use interact_core::{Interact, InteractConfig, Modifiers, Platform, PointerDown};
use interact_dom::{Document, NodeId};
use proptest::prelude::*;
use web_time::{Duration, Instant};

const ITEMS_PER_SCOPE: usize = 4;

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Click { scope: usize, item: usize },
    CommandClick { scope: usize, item: usize },
    EmptyClick { scope: usize },
    Advance(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..2, 0..ITEMS_PER_SCOPE).prop_map(|(scope, item)| Op::Click { scope, item }),
        (0usize..2, 0..ITEMS_PER_SCOPE)
            .prop_map(|(scope, item)| Op::CommandClick { scope, item }),
        (0usize..2).prop_map(|scope| Op::EmptyClick { scope }),
        (0u64..1500).prop_map(Op::Advance),
    ]
}

struct Harness {
    interact: Interact,
    scopes: [NodeId; 2],
    items: [[NodeId; ITEMS_PER_SCOPE]; 2],
    gaps: [NodeId; 2],
}

fn harness() -> Harness {
    let mut doc = Document::new();
    let root = doc.create_element("div");
    let mut scopes = Vec::new();
    let mut items = Vec::new();
    let mut gaps = Vec::new();
    for scope_index in 0..2 {
        let scope = doc.create_element("ul");
        doc.set_attribute(scope, "tabindex", &scope_index.to_string());
        doc.append_child(root, scope);
        let mut row = Vec::new();
        for _ in 0..ITEMS_PER_SCOPE {
            let item = doc.create_element("li");
            doc.set_attribute(item, "draggable", "");
            doc.append_child(scope, item);
            row.push(item);
        }
        let gap = doc.create_element("p");
        doc.append_child(scope, gap);
        scopes.push(scope);
        items.push(row);
        gaps.push(gap);
    }

    let to_array = |row: Vec<NodeId>| -> [NodeId; ITEMS_PER_SCOPE] {
        row.try_into().expect("fixed row size")
    };
    let mut rows = items.into_iter().map(to_array);
    let config = InteractConfig::default().with_platform(Platform::Other);
    Harness {
        interact: Interact::with_config(doc, root, config).expect("attach"),
        scopes: [scopes[0], scopes[1]],
        items: [
            rows.next().expect("first scope"),
            rows.next().expect("second scope"),
        ],
        gaps: [gaps[0], gaps[1]],
    }
}

fn marks(h: &Harness) -> Vec<Vec<bool>> {
    h.items
        .iter()
        .map(|row| {
            row.iter()
                .map(|node| h.interact.document().is_marked(*node))
                .collect()
        })
        .collect()
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn marking_invariants_hold(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut h = harness();
        let mut now = Instant::now();

        for op in ops {
            let before = marks(&h);
            match op {
                Op::Click { scope, item } => {
                    let node = h.items[scope][item];
                    let was_marked = before[scope][item];
                    h.interact
                        .pointer_down(PointerDown::new(node), now)
                        .expect("pointer down");
                    let after = marks(&h);
                    if !was_marked {
                        let count = after[scope].iter().filter(|m| **m).count();
                        prop_assert_eq!(count, 1);
                        prop_assert!(after[scope][item]);
                    } else {
                        prop_assert_eq!(&after[scope], &before[scope]);
                    }
                    prop_assert_eq!(&after[1 - scope], &before[1 - scope]);
                }
                Op::CommandClick { scope, item } => {
                    let node = h.items[scope][item];
                    let event = PointerDown::new(node).with_modifiers(Modifiers::CTRL);
                    h.interact.pointer_down(event, now).expect("pointer down");
                    let mut expected = before.clone();
                    expected[scope][item] = !expected[scope][item];
                    prop_assert_eq!(marks(&h), expected);
                    prop_assert!(!h.interact.collapse_pending());
                }
                Op::EmptyClick { scope } => {
                    h.interact
                        .pointer_down(PointerDown::new(h.gaps[scope]), now)
                        .expect("pointer down");
                    let after = marks(&h);
                    prop_assert!(after[scope].iter().all(|m| !*m));
                    prop_assert_eq!(&after[1 - scope], &before[1 - scope]);
                }
                Op::Advance(ms) => {
                    now += Duration::from_millis(ms);
                    if let Some(fired) = h.interact.poll(now).expect("poll") {
                        let scope = h
                            .scopes
                            .iter()
                            .position(|s| *s == fired.scope)
                            .expect("collapse runs in a list scope");
                        prop_assert_eq!(h.interact.marked(h.scopes[scope]), vec![fired.kept]);
                        prop_assert_eq!(&marks(&h)[1 - scope], &before[1 - scope]);
                    } else {
                        prop_assert_eq!(marks(&h), before);
                    }
                }
            }
        }
    }
}
