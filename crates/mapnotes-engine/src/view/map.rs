//! Point sets for map rendering.

use crate::outline::{LatLng, NodeId, OutlineTree};

/// The points a map for `node` should plot, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct MapLayer {
    pub node: NodeId,
    pub points: Vec<LatLng>,
}

impl MapLayer {
    /// Layer of a node carrying aggregated points, if it has any.
    pub fn for_node(tree: &OutlineTree, node: NodeId) -> Option<Self> {
        let geo_points = tree.node(node).data.geo_points.as_ref()?;
        Some(Self {
            node,
            points: geo_points.iter().map(|point| point.position).collect(),
        })
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::fit(&self.points)
    }
}

/// One layer per node with aggregated points, in pre-order.
pub fn map_layers(tree: &OutlineTree) -> Vec<MapLayer> {
    tree.preorder()
        .into_iter()
        .filter_map(|id| MapLayer::for_node(tree, id))
        .collect()
}

/// Smallest box holding a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    pub fn fit(points: &[LatLng]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Bounds {
            south_west: *first,
            north_east: *first,
        };
        for point in rest {
            bounds.south_west.lat = bounds.south_west.lat.min(point.lat);
            bounds.south_west.lng = bounds.south_west.lng.min(point.lng);
            bounds.north_east.lat = bounds.north_east.lat.max(point.lat);
            bounds.north_east.lng = bounds.north_east.lng.max(point.lng);
        }
        Some(bounds)
    }

    pub fn center(&self) -> LatLng {
        LatLng {
            lat: (self.south_west.lat + self.north_east.lat) / 2.0,
            lng: (self.south_west.lng + self.north_east.lng) / 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{enrich, find};
    use pretty_assertions::assert_eq;

    fn ll(lat: f64, lng: f64) -> LatLng {
        LatLng { lat, lng }
    }

    #[test]
    fn fit_spans_all_points() {
        let bounds = Bounds::fit(&[ll(1.0, 5.0), ll(-2.0, 7.0), ll(3.0, 6.0)]).unwrap();
        assert_eq!(bounds.south_west, ll(-2.0, 5.0));
        assert_eq!(bounds.north_east, ll(3.0, 7.0));
        assert_eq!(bounds.center(), ll(0.5, 6.0));
    }

    #[test]
    fn fit_of_nothing_is_none() {
        assert_eq!(Bounds::fit(&[]), None);
    }

    #[test]
    fn single_point_bounds_are_degenerate() {
        let bounds = Bounds::fit(&[ll(50.5, 6.5)]).unwrap();
        assert_eq!(bounds.south_west, bounds.north_east);
    }

    #[test]
    fn layers_follow_preorder() {
        let tree = enrich("- trip\n  - a: 1.5, 2.5\n  - leg\n    - b: 3.5, 4.5\n");
        let layers = map_layers(&tree);

        let owners: Vec<_> = layers.iter().map(|layer| layer.node).collect();
        let root = tree.roots()[0];
        assert_eq!(owners, vec![root, find(&tree, "trip"), find(&tree, "leg")]);
        assert_eq!(layers[1].points, vec![ll(1.5, 2.5), ll(3.5, 4.5)]);
        assert_eq!(layers[2].points, vec![ll(3.5, 4.5)]);
    }
}
