use std::ops::Range;

use crate::outline::{ExpressionKind, NodeId, OutlineTree};

use super::map::MapLayer;

pub const DEFAULT_RESULT_PREFIX: &str = "= ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkClass {
    Expression,
    ExpressionError,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    /// Rendered right after a formula
    Result { at: usize, text: String },
    /// Replaces a `{map}` token; `layer` is `None` when no enclosing
    /// node has points
    Map {
        range: Range<usize>,
        layer: Option<MapLayer>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMarker {
    /// Start of a line whose node aggregates coordinates
    GeoPoints { line_from: usize, node: NodeId },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decoration {
    Mark { range: Range<usize>, class: MarkClass },
    Widget(Widget),
    Line(LineMarker),
}

impl Decoration {
    /// Offset the decoration is anchored at.
    pub fn position(&self) -> usize {
        match self {
            Decoration::Mark { range, .. } => range.start,
            Decoration::Widget(Widget::Result { at, .. }) => *at,
            Decoration::Widget(Widget::Map { range, .. }) => range.start,
            Decoration::Line(LineMarker::GeoPoints { line_from, .. }) => *line_from,
        }
    }
}

/// Decorations for `tree` over `text`, ordered by position.
pub fn decorations(tree: &OutlineTree, text: &str) -> Vec<Decoration> {
    decorations_with_prefix(tree, text, DEFAULT_RESULT_PREFIX)
}

/// As [`decorations`], with `prefix` in front of each formula result.
///
/// Anything extending past the end of `text` is left out.
pub fn decorations_with_prefix(tree: &OutlineTree, text: &str, prefix: &str) -> Vec<Decoration> {
    let mut out = Vec::new();

    for id in tree.preorder() {
        let node = tree.node(id);

        if node.data.geo_points.is_some() && node.from <= text.len() {
            out.push(Decoration::Line(LineMarker::GeoPoints {
                line_from: node.from,
                node: id,
            }));
        }

        for expr in &node.expressions {
            if expr.to > text.len() {
                continue;
            }
            match expr.kind {
                ExpressionKind::MapWidget => {
                    let layer = tree
                        .ancestors(id)
                        .find_map(|owner| MapLayer::for_node(tree, owner));
                    out.push(Decoration::Widget(Widget::Map {
                        range: expr.from..expr.to,
                        layer,
                    }));
                }
                ExpressionKind::Formula => {
                    let class = if expr.failed {
                        MarkClass::ExpressionError
                    } else {
                        MarkClass::Expression
                    };
                    out.push(Decoration::Mark {
                        range: expr.from..expr.to,
                        class,
                    });
                    if let Some(value) = &expr.value {
                        out.push(Decoration::Widget(Widget::Result {
                            at: expr.to,
                            text: format!("{prefix}{value}"),
                        }));
                    }
                }
            }
        }
    }

    out.sort_by_key(Decoration::position);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{enrich, find};
    use pretty_assertions::assert_eq;

    #[test]
    fn formula_gets_mark_and_result() {
        let text = "- sum: {1 + 2}\n";
        let tree = enrich(text);
        assert_eq!(
            decorations(&tree, text),
            vec![
                Decoration::Mark {
                    range: 7..14,
                    class: MarkClass::Expression
                },
                Decoration::Widget(Widget::Result {
                    at: 14,
                    text: "= 3".to_string()
                }),
            ]
        );
    }

    #[test]
    fn failed_formula_is_marked_as_error() {
        let text = "- {invalid}\n";
        let tree = enrich(text);
        let decos = decorations_with_prefix(&tree, text, "→ ");
        assert_eq!(
            decos[0],
            Decoration::Mark {
                range: 2..11,
                class: MarkClass::ExpressionError
            }
        );
        assert_eq!(
            decos[1],
            Decoration::Widget(Widget::Result {
                at: 11,
                text: "→ invalid is not defined".to_string()
            })
        );
    }

    #[test]
    fn map_token_uses_nearest_points() {
        let text = "- places {map}\n  - a: 1.5, 2.5\n";
        let tree = enrich(text);
        let places = find(&tree, "places {map}");

        let map = decorations(&tree, text)
            .into_iter()
            .find_map(|deco| match deco {
                Decoration::Widget(Widget::Map { range, layer }) => Some((range, layer)),
                _ => None,
            })
            .unwrap();

        assert_eq!(map.0, 9..14);
        let layer = map.1.unwrap();
        assert_eq!(layer.node, places);
        assert_eq!(layer.points.len(), 1);
    }

    #[test]
    fn geo_point_owners_get_line_markers() {
        let text = "- trip\n  - a: 1.5, 2.5\n";
        let tree = enrich(text);
        let lines: Vec<_> = decorations(&tree, text)
            .into_iter()
            .filter_map(|deco| match deco {
                Decoration::Line(LineMarker::GeoPoints { line_from, .. }) => Some(line_from),
                _ => None,
            })
            .collect();
        // The synthetic root and `trip` both start at offset 0
        assert_eq!(lines, vec![0, 0]);
    }

    #[test]
    fn stale_ranges_are_dropped() {
        let text = "- sum: {1 + 2}\n";
        let tree = enrich(text);
        assert!(decorations(&tree, "- s").is_empty());
    }

    #[test]
    fn output_is_sorted() {
        let text = "- a: {1}\n  - b: {2}\n- {map}\n";
        let tree = enrich(text);
        let positions: Vec<_> = decorations(&tree, text).iter().map(Decoration::position).collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }
}
