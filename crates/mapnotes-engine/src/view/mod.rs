//! # Presentation Projection
//!
//! Read-only views derived from an enriched [`OutlineTree`]: hit-testing,
//! decorations for an editor surface, the cursor-line gutter marker and
//! map layers. Nothing here mutates the tree.

pub mod decorations;
pub mod map;

use std::ops::Range;

use crate::outline::{NodeId, OutlineTree};

pub use decorations::{
    DEFAULT_RESULT_PREFIX, Decoration, LineMarker, MarkClass, Widget, decorations,
    decorations_with_prefix,
};
pub use map::{Bounds, MapLayer, map_layers};

/// Innermost node whose span contains `[from, to]`.
///
/// Siblings are tried in order and the first containing one is descended
/// into.
pub fn node_at_range(tree: &OutlineTree, from: usize, to: usize) -> Option<NodeId> {
    let mut found = None;
    let mut candidates = tree.roots();
    while let Some(&id) = candidates
        .iter()
        .find(|&&id| tree.node(id).contains(from, to))
    {
        found = Some(id);
        candidates = tree.children(id);
    }
    found
}

/// Start of the line holding `selection`, unless it spans several lines.
pub fn cursor_line_marker(text: &str, selection: Range<usize>) -> Option<usize> {
    let start = selection.start.min(text.len());
    let end = selection.end.min(text.len());
    if end < start {
        return None;
    }

    let line_from = text.as_bytes()[..start]
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|pos| pos + 1)
        .unwrap_or(0);
    let line_to = text.as_bytes()[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|pos| start + pos)
        .unwrap_or(text.len());

    (end <= line_to).then_some(line_from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{find, outline_of};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn finds_innermost_node() {
        let text = "- a\n  - b\n    - c\n  - d\n";
        let tree = outline_of(text);
        let c = find(&tree, "c");
        let pos = text.find("c").unwrap();
        assert_eq!(node_at_range(&tree, pos, pos), Some(c));
    }

    #[test]
    fn own_span_returns_node_or_descendant() {
        let tree = outline_of("- a\n  - b\n    - c\n- d\n");
        for id in tree.preorder() {
            let node = tree.node(id);
            let hit = node_at_range(&tree, node.from, node.to).unwrap();
            assert!(
                tree.ancestors(hit).any(|ancestor| ancestor == id),
                "{id} resolved to unrelated {hit}"
            );
        }
    }

    #[test]
    fn outside_every_node_is_none() {
        let text = "Intro\n\n- a\n";
        let tree = outline_of(text);
        assert_eq!(node_at_range(&tree, 0, 3), None);
    }

    #[rstest]
    #[case("one\ntwo\n", 5..5, Some(4))]
    #[case("one\ntwo\n", 4..7, Some(4))]
    #[case("one\ntwo\n", 2..5, None)]
    #[case("one\ntwo", 7..7, Some(4))]
    #[case("", 0..0, Some(0))]
    #[case("one\n", 9..9, Some(4))]
    fn cursor_line(
        #[case] text: &str,
        #[case] selection: Range<usize>,
        #[case] expected: Option<usize>,
    ) {
        assert_eq!(cursor_line_marker(text, selection), expected);
    }
}
