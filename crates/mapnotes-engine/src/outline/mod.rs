//! # Outline Tree
//!
//! Turns the bullet lists of a markdown document into an enriched forest:
//!
//! ```text
//! tree-sitter Tree → list_events → build_outline → index_attrs → extract_data → evaluate_tree
//!                    (events)      (builder)       (attrs)       (extract)      (crate::eval)
//! ```
//!
//! The forest is rebuilt from scratch for every version of the text and
//! never patched in place.

pub mod attrs;
pub mod bullet;
pub mod builder;
pub mod events;
pub mod extract;
pub mod node;

pub use attrs::index_attrs;
pub use bullet::{Bullet, parse_bullet, scan_expressions};
pub use builder::build_outline;
pub use events::{ListEvent, ListNodeKind, ListSpan, list_events};
pub use extract::{extract_data, parse_lat_lng, parse_number};
pub use node::{
    Expression, ExpressionKind, GeoPoint, LatLng, NodeData, NodeId, NodeKind, OutlineNode,
    OutlineTree,
};

/// Build, index, extract and evaluate the outline of `text`.
///
/// `syntax` must be the tree-sitter-md tree of exactly `text`. Never fails;
/// broken formulas carry their error text instead.
pub fn parse_outline(text: &str, syntax: &tree_sitter::Tree) -> OutlineTree {
    enrich_outline(build_outline(text, list_events(syntax)))
}

/// Run the enrichment passes over a freshly built tree.
pub fn enrich_outline(mut tree: OutlineTree) -> OutlineTree {
    index_attrs(&mut tree);
    extract_data(&mut tree);
    crate::eval::evaluate_tree(&mut tree);

    log::debug!(
        "outline rebuilt: {} nodes, {} roots",
        tree.len(),
        tree.roots().len()
    );
    tree
}
