use std::sync::Arc;

use crate::editing::Document;
use crate::outline::{NodeId, OutlineTree};
use crate::view::{self, Decoration};

/// Everything a surface needs to draw one version of a document.
///
/// Holds the outline by `Arc`, so a snapshot stays valid while the
/// document moves on.
#[derive(Debug, Clone)]
pub struct OutlineSnapshot {
    pub version: u64,
    pub text: String,
    pub outline: Arc<OutlineTree>,
    /// Ordered by position
    pub decorations: Vec<Decoration>,
    /// Start of the line holding the selection, if it fits on one line
    pub cursor_line: Option<usize>,
    /// Innermost node holding the selection
    pub active_node: Option<NodeId>,
}

impl OutlineSnapshot {
    /// Decorations anchored within `range`.
    pub fn decorations_in(&self, range: std::ops::Range<usize>) -> impl Iterator<Item = &Decoration> {
        self.decorations
            .iter()
            .filter(move |deco| range.contains(&deco.position()))
    }
}

pub(crate) fn create_snapshot(doc: &Document, result_prefix: &str) -> OutlineSnapshot {
    let text = doc.text();
    let outline = doc.outline();
    let decorations = view::decorations_with_prefix(&outline, &text, result_prefix);
    let cursor_line = view::cursor_line_marker(&text, doc.selection());

    OutlineSnapshot {
        version: doc.version(),
        active_node: doc.node_at_selection(),
        text,
        outline,
        decorations,
        cursor_line,
    }
}
