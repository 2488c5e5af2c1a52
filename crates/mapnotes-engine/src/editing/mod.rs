/*!
 * # Editing Core
 *
 * A [`Document`] owns the text as an `xi_rope::Rope`, keeps a tree-sitter
 * markdown parse in sync with it and republishes the enriched outline
 * after every edit.
 *
 * ```text
 * Cmd → Delta → tree.edit() → rope.apply() → reparse → parse_outline → Arc<OutlineTree>
 * ```
 *
 * Readers take an [`OutlineSnapshot`]: version, text, outline and
 * decorations frozen together.
 *
 * ```rust
 * use mapnotes_engine::editing::{Cmd, Document};
 *
 * let mut doc = Document::from_bytes(b"- distance: {2 * 6}\n").unwrap();
 * doc.apply(Cmd::InsertText { at: 0, text: "- trip\n".to_string() });
 *
 * let snapshot = doc.snapshot();
 * assert_eq!(snapshot.version, 1);
 * ```
 */

pub mod commands;
pub mod document;
pub mod patch;
pub mod snapshot;

pub use commands::Cmd;
pub use document::{Document, DocumentError};
pub use patch::Patch;
pub use snapshot::OutlineSnapshot;
