//! Typed data inferred from node values.
//!
//! Each node is classified on its own (coordinate pair, plain number), then
//! coordinates are aggregated bottom-up so every ancestor knows the points
//! below it.

use std::sync::OnceLock;

use regex::Regex;

use super::node::{GeoPoint, LatLng, NodeId, OutlineTree};

static LAT_LNG_REGEX: OnceLock<Regex> = OnceLock::new();
static NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();

fn lat_lng_regex() -> &'static Regex {
    LAT_LNG_REGEX.get_or_init(|| {
        Regex::new(r"^\s*(-?\d+\.\d+?),\s*(-?\d+\.\d+?)\s*$").expect("Invalid lat/lng regex")
    })
}

fn number_regex() -> &'static Regex {
    NUMBER_REGEX
        .get_or_init(|| Regex::new(r"^\s*(-?\d+(\.\d+)?)\s*$").expect("Invalid number regex"))
}

/// `"50.775555, 6.083611"`; both parts need a fractional part.
pub fn parse_lat_lng(value: &str) -> Option<LatLng> {
    let captures = lat_lng_regex().captures(value)?;
    let lat = captures.get(1)?.as_str().parse().ok()?;
    let lng = captures.get(2)?.as_str().parse().ok()?;
    Some(LatLng { lat, lng })
}

/// A plain decimal like `10` or `-3.5`, surrounding whitespace allowed.
pub fn parse_number(value: &str) -> Option<f64> {
    let captures = number_regex().captures(value)?;
    captures.get(1)?.as_str().parse().ok()
}

/// Fill `data` on every node reachable from the roots.
pub fn extract_data(tree: &mut OutlineTree) {
    // Reverse pre-order visits every child before its parent
    for id in tree.preorder().into_iter().rev() {
        let node = tree.node_mut(id);
        node.data.lat_lng = parse_lat_lng(&node.value);
        node.data.number = parse_number(&node.value);

        let geo_points = collect_geo_points(tree, id);
        tree.node_mut(id).data.geo_points = (!geo_points.is_empty()).then_some(geo_points);
    }
}

fn collect_geo_points(tree: &OutlineTree, id: NodeId) -> Vec<GeoPoint> {
    let children = tree.children(id);

    let own = children.iter().filter_map(|&child| {
        tree.node(child).data.lat_lng.map(|position| GeoPoint { node: id, position })
    });
    let nested = children
        .iter()
        .filter_map(|&child| tree.node(child).data.geo_points.as_deref())
        .flatten()
        .copied();

    own.chain(nested).collect()
}
