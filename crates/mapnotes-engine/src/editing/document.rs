use std::ops::Range;
use std::sync::Arc;

use tree_sitter::{InputEdit, Parser, Point, Tree};
use tree_sitter_md::LANGUAGE;
use xi_rope::{Delta, Rope, RopeInfo, delta::DeltaElement};

use crate::editing::{Cmd, OutlineSnapshot, Patch};
use crate::outline::{NodeId, OutlineTree, parse_outline};
use crate::view::{self, DEFAULT_RESULT_PREFIX};

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("document is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("failed to load markdown grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
}

/// An editable markdown document and the outline derived from it.
///
/// The rope is the only source of truth. Every edit goes through a [`Cmd`],
/// is compiled to a delta, fed to tree-sitter as input edits and then
/// applied to the rope; the outline is rebuilt from the fresh parse and
/// published as a new `Arc` so earlier snapshots stay valid.
pub struct Document {
    pub(crate) buffer: Rope,
    /// Byte offsets into `buffer`
    pub(crate) selection: Range<usize>,
    pub(crate) version: u64,
    pub(crate) parser: Parser,
    /// `None` only if tree-sitter gave up
    pub(crate) tree: Option<Tree>,
    pub(crate) outline: Arc<OutlineTree>,
}

impl Document {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let text = std::str::from_utf8(bytes)?;
        let buffer = Rope::from(text);
        let len = buffer.len();

        let mut parser = Parser::new();
        parser.set_language(&LANGUAGE.into())?;
        let tree = parser.parse(text, None);

        let mut doc = Self {
            buffer,
            selection: len..len,
            version: 0,
            parser,
            tree,
            outline: Arc::new(OutlineTree::new()),
        };
        doc.rebuild_outline(text);
        Ok(doc)
    }

    /// Exact bytes of the current text.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_string().into_bytes()
    }

    /// Apply one edit, reparse incrementally and rebuild the outline.
    ///
    /// Input edits must be computed against the old buffer, so they are
    /// derived from the delta before it is applied.
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let delta = self.compile_command(&cmd);

        let mut changed = Vec::new();
        let mut cursor = 0;
        for op in delta.els.iter() {
            match op {
                DeltaElement::Copy(from, to) => {
                    cursor += to - from;
                }
                DeltaElement::Insert(inserted) => {
                    changed.push(cursor..cursor + inserted.len());
                    cursor += inserted.len();
                }
            }
        }

        let new_selection = self.transform_selection_for_command(&self.selection, &cmd);

        if let Some(mut old_tree) = self.tree.take() {
            for edit in self.delta_to_input_edits(&delta) {
                old_tree.edit(&edit);
            }
            self.buffer = delta.apply(&self.buffer);
            self.tree = self.parser.parse(self.buffer.to_string(), Some(&old_tree));
        } else {
            self.buffer = delta.apply(&self.buffer);
            self.tree = self.parser.parse(self.buffer.to_string(), None);
        }

        self.selection = new_selection.clone();
        self.version += 1;
        let text = self.text();
        self.rebuild_outline(&text);

        log::trace!("applied {cmd:?}, now at version {}", self.version);

        Patch {
            changed,
            new_selection,
            version: self.version,
        }
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Set the selection, clamped to the text.
    pub fn set_selection(&mut self, selection: Range<usize>) {
        let len = self.len();
        self.selection = selection.start.min(len)..selection.end.min(len);
    }

    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    /// The outline for the current version.
    pub fn outline(&self) -> Arc<OutlineTree> {
        Arc::clone(&self.outline)
    }

    /// Innermost node holding the selection.
    pub fn node_at_selection(&self) -> Option<NodeId> {
        view::node_at_range(&self.outline, self.selection.start, self.selection.end)
    }

    pub(crate) fn slice_to_cow(&self, range: Range<usize>) -> std::borrow::Cow<'_, str> {
        let len = self.buffer.len();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        self.buffer.slice_to_cow(start..end)
    }

    pub fn snapshot(&self) -> OutlineSnapshot {
        self.snapshot_with_prefix(DEFAULT_RESULT_PREFIX)
    }

    pub fn snapshot_with_prefix(&self, result_prefix: &str) -> OutlineSnapshot {
        crate::editing::snapshot::create_snapshot(self, result_prefix)
    }

    pub(crate) fn compile_command(&self, cmd: &Cmd) -> Delta<RopeInfo> {
        crate::editing::commands::compile_command(self, cmd)
    }

    pub(crate) fn transform_selection_for_command(
        &self,
        range: &Range<usize>,
        cmd: &Cmd,
    ) -> Range<usize> {
        crate::editing::commands::transform_selection_for_command(self, range, cmd)
    }

    fn rebuild_outline(&mut self, text: &str) {
        let outline = match &self.tree {
            Some(tree) => parse_outline(text, tree),
            None => {
                log::warn!("no syntax tree for version {}, outline left empty", self.version);
                OutlineTree::new()
            }
        };
        self.outline = Arc::new(outline);
    }

    /// Convert a delta into tree-sitter input edits, one per changed region.
    ///
    /// Must run before the delta is applied: positions are measured in the
    /// old text. Edits are returned last-region-first so each one is still
    /// expressed in coordinates untouched by the edits before it.
    fn delta_to_input_edits(&self, delta: &Delta<RopeInfo>) -> Vec<InputEdit> {
        let old_text = self.buffer.to_string();
        let mut edits = Vec::new();

        let mut old_pos = 0;
        let mut inserted = String::new();
        let mut flush = |start: usize, old_end: usize, inserted: &mut String| {
            if start == old_end && inserted.is_empty() {
                return;
            }
            let start_position = byte_to_point_in_text(&old_text, start);
            edits.push(InputEdit {
                start_byte: start,
                old_end_byte: old_end,
                new_end_byte: start + inserted.len(),
                start_position,
                old_end_position: byte_to_point_in_text(&old_text, old_end),
                new_end_position: advance_point(start_position, inserted),
            });
            inserted.clear();
        };

        for op in &delta.els {
            match op {
                DeltaElement::Copy(from, to) => {
                    flush(old_pos, *from, &mut inserted);
                    old_pos = *to;
                }
                DeltaElement::Insert(text) => {
                    inserted.push_str(&text.to_string());
                }
            }
        }
        flush(old_pos, delta.base_len, &mut inserted);

        edits.reverse();
        edits
    }
}

/// Convert byte offset to a tree-sitter point in `text`.
fn byte_to_point_in_text(text: &str, byte_offset: usize) -> Point {
    let offset = byte_offset.min(text.len());
    let before = &text.as_bytes()[..offset];
    match before.iter().rposition(|&b| b == b'\n') {
        Some(newline) => Point {
            row: before.iter().filter(|&&b| b == b'\n').count(),
            column: offset - newline - 1,
        },
        None => Point {
            row: 0,
            column: offset,
        },
    }
}

/// Position reached after typing `inserted` at `start`.
fn advance_point(start: Point, inserted: &str) -> Point {
    match inserted.rfind('\n') {
        Some(last) => Point {
            row: start.row + inserted.matches('\n').count(),
            column: inserted.len() - last - 1,
        },
        None => Point {
            row: start.row,
            column: start.column + inserted.len(),
        },
    }
}
