//! Rebuilding the outline forest from list events.
//!
//! An explicit stack holds the currently open ancestors. Opening a
//! top-level bullet list pushes a synthetic `List` node spanning the whole
//! list, and each item becomes the last child of the stack top. An item
//! only goes onto the stack once a nested item shows up under it.
//!
//! ```text
//! - Foo              List
//!   - bar     →       └─ Foo
//!   - baz                 ├─ bar
//!     - more              ├─ baz
//!                         │   └─ more
//! ```

use std::ops::Range;

use super::bullet::parse_bullet;
use super::events::{ListEvent, ListNodeKind, ListSpan};
use super::node::{NodeData, NodeId, NodeKind, OutlineNode, OutlineTree};

/// Build the outline forest for `text` from a depth-first event stream.
///
/// Unbalanced streams never fail: when exactly one ancestor is still open
/// after the last event it becomes an extra root.
pub fn build_outline<I>(text: &str, events: I) -> OutlineTree
where
    I: IntoIterator<Item = ListEvent>,
{
    let mut tree = OutlineTree::new();
    let mut parents: Vec<NodeId> = Vec::new();
    let mut current: Option<NodeId> = None;

    for event in events {
        match event {
            ListEvent::Enter(span) => match span.kind {
                ListNodeKind::BulletList => {
                    if parents.is_empty() {
                        let from = line_start(text, span.range.start);
                        let to = content_end(text, &span.range).max(from);
                        parents.push(tree.push(OutlineNode::list(from, to)));
                    }
                }
                ListNodeKind::ListItem => {
                    if let Some(open) = current.take() {
                        parents.push(open);
                    }
                    let parent = parents.last().copied();
                    let id = tree.push(item_node(text, &span, parent));
                    if let Some(parent) = parent {
                        tree.node_mut(parent).children.push(id);
                    }
                    current = Some(id);
                }
            },
            ListEvent::Leave(span) => match span.kind {
                ListNodeKind::ListItem => current = None,
                ListNodeKind::BulletList => {
                    let closed = parents.pop();
                    if parents.is_empty() {
                        // A finished top-level list never takes more items
                        tree.roots.extend(closed);
                        current = None;
                    } else {
                        current = closed;
                    }
                }
            },
        }
    }

    match parents.as_slice() {
        [] => {}
        [unclosed] => tree.roots.push(*unclosed),
        open => log::debug!("dropping {} unclosed outline ancestors", open.len()),
    }

    tree
}

fn item_node(text: &str, span: &ListSpan, parent: Option<NodeId>) -> OutlineNode {
    let start = span.range.start.min(text.len());
    let marker = start + leading_blanks(text.get(start..).unwrap_or_default());
    let from = line_start(text, marker);
    let content_start = skip_marker(text, marker);

    let line = text.get(content_start..).unwrap_or_default();
    let line = line.split('\n').next().unwrap_or_default();
    let line = line.strip_suffix('\r').unwrap_or(line);
    let bullet = parse_bullet(line, content_start);

    OutlineNode {
        kind: NodeKind::Item,
        key: bullet.key,
        value: bullet.value,
        expressions: bullet.expressions,
        children: Vec::new(),
        parent,
        from,
        to: content_end(text, &span.range).max(content_start),
        indentation: marker - from,
        attrs: Default::default(),
        data: NodeData::default(),
    }
}

fn leading_blanks(text: &str) -> usize {
    text.bytes().take_while(|b| matches!(b, b' ' | b'\t')).count()
}

/// Step past a `-`, `*` or `+` marker and one space or tab after it.
fn skip_marker(text: &str, marker: usize) -> usize {
    let bytes = text.as_bytes();
    let mut pos = marker;
    if matches!(bytes.get(pos), Some(b'-' | b'*' | b'+')) {
        pos += 1;
        if matches!(bytes.get(pos), Some(b' ' | b'\t')) {
            pos += 1;
        }
    }
    pos
}

fn line_start(text: &str, offset: usize) -> usize {
    let offset = offset.min(text.len());
    text.as_bytes()[..offset]
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|pos| pos + 1)
        .unwrap_or(0)
}

/// End of `range` with trailing whitespace and line breaks dropped.
fn content_end(text: &str, range: &Range<usize>) -> usize {
    let end = range.end.min(text.len());
    let start = range.start.min(end);
    text.as_bytes()[start..end]
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map(|pos| start + pos + 1)
        .unwrap_or(start)
}
