//! Enter/leave events over the bullet lists of a tree-sitter-md tree.
//!
//! The tree builder only needs list nesting and byte spans, so the syntax
//! tree is flattened into a depth-first stream of [`ListEvent`]s. Builders
//! and tests can equally feed hand-made streams.

use std::ops::Range;

use tree_sitter::{Node, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListNodeKind {
    BulletList,
    ListItem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSpan {
    pub kind: ListNodeKind,
    pub range: Range<usize>,
}

impl ListSpan {
    pub fn bullet_list(range: Range<usize>) -> Self {
        Self {
            kind: ListNodeKind::BulletList,
            range,
        }
    }

    pub fn list_item(range: Range<usize>) -> Self {
        Self {
            kind: ListNodeKind::ListItem,
            range,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    Enter(ListSpan),
    Leave(ListSpan),
}

/// Flatten every bullet list in `tree` into enter/leave events.
///
/// Ordered lists are skipped together with everything nested in them.
pub fn list_events(tree: &Tree) -> Vec<ListEvent> {
    let mut events = Vec::new();
    collect_events(tree.root_node(), &mut events);
    events
}

fn collect_events(node: Node, events: &mut Vec<ListEvent>) {
    match node.kind() {
        "list" => {
            if !is_bullet_list(&node) {
                return;
            }
            let span = ListSpan::bullet_list(node.byte_range());
            events.push(ListEvent::Enter(span.clone()));
            collect_children(node, events);
            events.push(ListEvent::Leave(span));
        }
        "list_item" => {
            let start = list_marker(&node)
                .map(|marker| marker.start_byte())
                .unwrap_or_else(|| node.start_byte());
            let span = ListSpan::list_item(start..node.end_byte());
            events.push(ListEvent::Enter(span.clone()));
            collect_children(node, events);
            events.push(ListEvent::Leave(span));
        }
        _ => collect_children(node, events),
    }
}

fn collect_children(node: Node, events: &mut Vec<ListEvent>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_events(child, events);
    }
}

fn list_marker<'tree>(item: &Node<'tree>) -> Option<Node<'tree>> {
    let mut cursor = item.walk();
    item.children(&mut cursor)
        .find(|child| child.kind().starts_with("list_marker_"))
}

/// A list is a bullet list when its first item uses `-`, `*` or `+`.
fn is_bullet_list(list: &Node) -> bool {
    let mut cursor = list.walk();
    let Some(first_item) = list
        .children(&mut cursor)
        .find(|child| child.kind() == "list_item")
    else {
        return false;
    };

    matches!(
        list_marker(&first_item).map(|marker| marker.kind()),
        Some("list_marker_minus" | "list_marker_star" | "list_marker_plus")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::parse_markdown;
    use pretty_assertions::assert_eq;

    fn kinds(text: &str) -> Vec<String> {
        list_events(&parse_markdown(text))
            .into_iter()
            .map(|event| match event {
                ListEvent::Enter(span) => format!("enter {:?}", span.kind),
                ListEvent::Leave(span) => format!("leave {:?}", span.kind),
            })
            .collect()
    }

    #[test]
    fn nested_lists_are_balanced() {
        assert_eq!(
            kinds("- a\n  - b\n- c\n"),
            vec![
                "enter BulletList",
                "enter ListItem",
                "enter BulletList",
                "enter ListItem",
                "leave ListItem",
                "leave BulletList",
                "leave ListItem",
                "enter ListItem",
                "leave ListItem",
                "leave BulletList",
            ]
        );
    }

    #[test]
    fn ordered_lists_are_skipped() {
        assert!(kinds("1. one\n2. two\n").is_empty());
    }

    #[test]
    fn paragraphs_produce_no_events() {
        assert!(kinds("# Title\n\nJust text.\n").is_empty());
    }

    #[test]
    fn item_spans_start_at_the_marker() {
        let text = "- a\n  - b\n";
        let events = list_events(&parse_markdown(text));
        let items: Vec<usize> = events
            .iter()
            .filter_map(|event| match event {
                ListEvent::Enter(span) if span.kind == ListNodeKind::ListItem => {
                    Some(span.range.start)
                }
                _ => None,
            })
            .collect();
        assert_eq!(items.len(), 2);
        assert_eq!(&text[items[0]..items[0] + 1], "-");
        assert!(items[1] <= 6);
    }
}
