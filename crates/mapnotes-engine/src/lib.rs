//! Outline engine for markdown notes.
//!
//! Bullet lists become an enriched tree: `key: value` attributes,
//! coordinates and numbers pulled out of values, and `{formula}` tokens
//! evaluated against the surrounding outline. [`editing::Document`] keeps
//! that tree current while the text is edited; [`view`] projects it into
//! decorations for a display surface.

pub mod editing;
pub mod eval;
pub mod io;
pub mod outline;
pub mod view;


pub use editing::{Cmd, Document, DocumentError, OutlineSnapshot, Patch};
pub use eval::{EvalError, Value};
pub use io::*;
pub use outline::{
    Expression, ExpressionKind, GeoPoint, LatLng, NodeData, NodeId, NodeKind, OutlineNode,
    OutlineTree, parse_outline,
};
pub use view::{Bounds, Decoration, LineMarker, MapLayer, MarkClass, Widget};
