use std::ops::Range;

use mapnotes_engine::{
    Decoration, LineMarker, MapLayer, MarkClass, NodeId, OutlineSnapshot, OutlineTree, Widget,
};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Byte ranges of each line, line breaks excluded.
pub fn line_ranges(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut ranges = Vec::new();
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'\n' {
            let end = if i > start && bytes[i - 1] == b'\r' {
                i - 1
            } else {
                i
            };
            ranges.push(start..end);
            start = i + 1;
        }
    }
    if start < text.len() || ranges.is_empty() {
        ranges.push(start..text.len());
    }
    ranges
}

/// One source line with its gutter and inline decorations.
pub fn annotate_line(snapshot: &OutlineSnapshot, line: Range<usize>, show_results: bool) -> Line<'static> {
    let text = &snapshot.text;
    let mut spans = vec![gutter(snapshot, line.start)];
    let mut pos = line.start;
    let mut failed = false;

    let raw_until = |spans: &mut Vec<Span<'static>>, pos: &mut usize, end: usize| {
        if end > *pos {
            spans.push(Span::raw(text[*pos..end].to_string()));
            *pos = end;
        }
    };

    for deco in snapshot.decorations_in(line.start..line.end + 1) {
        match deco {
            Decoration::Mark { range, class } => {
                if range.start < pos || range.end > line.end {
                    continue;
                }
                raw_until(&mut spans, &mut pos, range.start);
                failed = *class == MarkClass::ExpressionError;
                spans.push(Span::styled(
                    text[range.clone()].to_string(),
                    mark_style(*class),
                ));
                pos = range.end;
            }
            Decoration::Widget(Widget::Result { at, text: result }) => {
                if !show_results || *at < pos || *at > line.end {
                    continue;
                }
                raw_until(&mut spans, &mut pos, *at);
                let style = if failed {
                    Style::default().fg(Color::Red).add_modifier(Modifier::ITALIC)
                } else {
                    Style::default().fg(Color::Green)
                };
                spans.push(Span::styled(format!(" {result}"), style));
            }
            Decoration::Widget(Widget::Map { range, layer }) => {
                if range.start < pos || range.end > line.end {
                    continue;
                }
                raw_until(&mut spans, &mut pos, range.start);
                spans.push(Span::styled(
                    map_label(layer.as_ref()),
                    Style::default().fg(Color::Cyan),
                ));
                pos = range.end;
            }
            Decoration::Line(_) => {}
        }
    }
    raw_until(&mut spans, &mut pos, line.end);

    Line::from(spans)
}

fn gutter(snapshot: &OutlineSnapshot, line_from: usize) -> Span<'static> {
    let cursor = if snapshot.cursor_line == Some(line_from) {
        '▶'
    } else {
        ' '
    };
    let geo = snapshot.decorations.iter().any(|deco| {
        matches!(
            deco,
            Decoration::Line(LineMarker::GeoPoints { line_from: from, .. }) if *from == line_from
        )
    });
    let geo = if geo { '◉' } else { ' ' };
    Span::styled(
        format!("{cursor}{geo} "),
        Style::default().fg(Color::Yellow),
    )
}

fn mark_style(class: MarkClass) -> Style {
    match class {
        MarkClass::Expression => Style::default().fg(Color::Blue),
        MarkClass::ExpressionError => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::UNDERLINED),
    }
}

pub fn map_label(layer: Option<&MapLayer>) -> String {
    match layer.and_then(|layer| layer.bounds().map(|bounds| (layer, bounds))) {
        Some((layer, bounds)) => format!(
            "[map: {} points around {}]",
            layer.points.len(),
            bounds.center()
        ),
        None => "[map: no points]".to_string(),
    }
}

/// Flatten a rendered line for plain output.
pub fn plain(line: &Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

/// Details of one outline node for the side panel.
pub fn node_details(tree: &OutlineTree, id: NodeId) -> Vec<Line<'static>> {
    let node = tree.node(id);
    let label = Style::default().add_modifier(Modifier::BOLD);
    let field = |name: &str, value: String| {
        Line::from(vec![Span::styled(format!("{name}: "), label), Span::raw(value)])
    };

    let mut lines = vec![field("node", format!("{id} ({:?})", node.kind))];
    if let Some(key) = &node.key {
        lines.push(field("key", key.clone()));
    }
    lines.push(field("value", node.value.clone()));
    if let Some(lat_lng) = node.data.lat_lng {
        lines.push(field("lat/lng", lat_lng.to_string()));
    }
    if let Some(number) = node.data.number {
        lines.push(field("number", number.to_string()));
    }
    for expr in &node.expressions {
        let value = expr.value.as_deref().unwrap_or("-");
        lines.push(field(&format!("{{{}}}", expr.source), value.to_string()));
    }
    if let Some(layer) = MapLayer::for_node(tree, id) {
        lines.push(field("geo points", layer.points.len().to_string()));
        if let Some(bounds) = layer.bounds() {
            lines.push(field(
                "bounds",
                format!("{} → {}", bounds.south_west, bounds.north_east),
            ));
        }
    }
    if !node.attrs.is_empty() {
        lines.push(Line::from(Span::styled("attributes:", label)));
        for (name, &target) in &node.attrs {
            lines.push(Line::from(format!(
                "  {name} = {} ({target})",
                tree.node(target).value
            )));
        }
    }
    lines
}
