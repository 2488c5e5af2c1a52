use std::ops::Range;

use xi_rope::{Delta, Rope, RopeInfo, delta::Builder};

use crate::editing::Document;

/// Edit commands accepted by [`Document::apply`].
///
/// Ranges are byte offsets into the current text. Out-of-bounds or
/// reversed ranges are clamped rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    InsertText { at: usize, text: String },
    DeleteRange { range: Range<usize> },
    ReplaceRange { range: Range<usize>, text: String },
}

impl Cmd {
    fn raw_parts(&self) -> (Range<usize>, &str) {
        match self {
            Cmd::InsertText { at, text } => (*at..*at, text),
            Cmd::DeleteRange { range } => (range.clone(), ""),
            Cmd::ReplaceRange { range, text } => (range.clone(), text),
        }
    }
}

/// A command reduced to one in-bounds replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Edit<'a> {
    pub range: Range<usize>,
    pub text: &'a str,
}

pub(crate) fn normalize<'a>(text: &str, cmd: &'a Cmd) -> Edit<'a> {
    let (range, inserted) = cmd.raw_parts();
    let a = floor_char_boundary(text, range.start);
    let b = floor_char_boundary(text, range.end);
    Edit {
        range: a.min(b)..a.max(b),
        text: inserted,
    }
}

fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

pub(crate) fn compile_command(doc: &Document, cmd: &Cmd) -> Delta<RopeInfo> {
    let edit = normalize(&doc.text(), cmd);
    let mut builder = Builder::new(doc.len());
    if edit.text.is_empty() {
        builder.delete(edit.range);
    } else {
        builder.replace(edit.range, Rope::from(edit.text));
    }
    builder.build()
}

/// Map a selection through `cmd`.
///
/// Offsets before the edit stay put, offsets after it shift by the size
/// change and offsets inside the replaced range land after the inserted
/// text.
pub(crate) fn transform_selection_for_command(
    doc: &Document,
    selection: &Range<usize>,
    cmd: &Cmd,
) -> Range<usize> {
    let edit = normalize(&doc.text(), cmd);
    let map = |pos: usize| {
        if pos < edit.range.start {
            pos
        } else if pos >= edit.range.end {
            pos - edit.range.len() + edit.text.len()
        } else {
            edit.range.start + edit.text.len()
        }
    };
    map(selection.start)..map(selection.end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn doc(text: &str) -> Document {
        Document::from_bytes(text.as_bytes()).unwrap()
    }

    #[rstest]
    #[case(Cmd::InsertText { at: 5, text: "!".into() }, 5..5, "!")]
    #[case(Cmd::InsertText { at: 99, text: "!".into() }, 11..11, "!")]
    #[case(Cmd::DeleteRange { range: 6..11 }, 6..11, "")]
    #[case(Cmd::DeleteRange { range: 11..6 }, 6..11, "")]
    #[case(Cmd::ReplaceRange { range: 6..50, text: "x".into() }, 6..11, "x")]
    fn normalizes_commands(
        #[case] cmd: Cmd,
        #[case] range: Range<usize>,
        #[case] text: &str,
    ) {
        assert_eq!(normalize("Hello World", &cmd), Edit { range, text });
    }

    #[test]
    fn snaps_to_char_boundaries() {
        // "é" is two bytes starting at offset 1
        let cmd = Cmd::DeleteRange { range: 2..3 };
        assert_eq!(normalize("héllo", &cmd).range, 1..3);
    }

    #[test]
    fn compiled_delta_applies_the_edit() {
        let doc = doc("Hello World");
        let cmd = Cmd::ReplaceRange {
            range: 6..11,
            text: "Map".to_string(),
        };
        let delta = compile_command(&doc, &cmd);
        assert_eq!(delta.apply(&doc.buffer).to_string(), "Hello Map");
    }

    #[rstest]
    #[case(0..0, 0..0)]
    #[case(5..5, 8..8)]
    #[case(8..8, 11..11)]
    #[case(4..9, 4..12)]
    fn selection_after_insert(#[case] before: Range<usize>, #[case] after: Range<usize>) {
        let doc = doc("Hello World");
        let cmd = Cmd::InsertText {
            at: 5,
            text: "abc".to_string(),
        };
        assert_eq!(transform_selection_for_command(&doc, &before, &cmd), after);
    }

    #[rstest]
    #[case(2..2, 2..2)]
    #[case(5..5, 3..3)]
    #[case(11..11, 5..5)]
    #[case(1..11, 1..5)]
    fn selection_after_replace(#[case] before: Range<usize>, #[case] after: Range<usize>) {
        let doc = doc("Hello World");
        let cmd = Cmd::ReplaceRange {
            range: 3..9,
            text: "".to_string(),
        };
        assert_eq!(transform_selection_for_command(&doc, &before, &cmd), after);
    }
}
