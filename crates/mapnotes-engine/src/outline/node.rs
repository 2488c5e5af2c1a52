use std::collections::BTreeMap;
use std::fmt;

/// Handle of a node inside one [`OutlineTree`].
///
/// Ids are plain arena indices and are only meaningful for the tree that
/// produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What produced a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Synthetic root opened for a top-level bullet list
    List,
    /// One bullet
    Item,
}

/// A geographic coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lng)
    }
}

/// A coordinate attributed to the ancestor that aggregated it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub node: NodeId,
    pub position: LatLng,
}

/// Values inferred from a node's text by the data extractor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeData {
    pub lat_lng: Option<LatLng>,
    pub number: Option<f64>,
    /// `None` when no descendant carries a coordinate, never an empty vec
    pub geo_points: Option<Vec<GeoPoint>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionKind {
    /// Evaluated formula
    Formula,
    /// The `{map}` token, rendered as a map of the surrounding points
    MapWidget,
}

/// A `{...}` span inside a bullet.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    /// Offset of `{`
    pub from: usize,
    /// Offset just past `}`
    pub to: usize,
    /// Text between the braces
    pub source: String,
    pub kind: ExpressionKind,
    /// Result or error description once evaluated
    pub value: Option<String>,
    /// Whether `value` holds an error description
    pub failed: bool,
}

impl Expression {
    pub fn new(from: usize, to: usize, source: impl Into<String>) -> Self {
        let source = source.into();
        let kind = if source == "map" {
            ExpressionKind::MapWidget
        } else {
            ExpressionKind::Formula
        };
        Self {
            from,
            to,
            source,
            kind,
            value: None,
            failed: false,
        }
    }

    pub fn is_map_widget(&self) -> bool {
        self.kind == ExpressionKind::MapWidget
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutlineNode {
    pub kind: NodeKind,
    pub key: Option<String>,
    pub value: String,
    pub expressions: Vec<Expression>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    /// Start of the line the bullet is on
    pub from: usize,
    /// End of the item including nested items
    pub to: usize,
    /// Offset of the bullet marker relative to `from`
    pub indentation: usize,
    /// Direct children by key, first one wins
    pub attrs: BTreeMap<String, NodeId>,
    pub data: NodeData,
}

impl OutlineNode {
    pub(crate) fn list(from: usize, to: usize) -> Self {
        Self {
            kind: NodeKind::List,
            key: None,
            value: String::new(),
            expressions: Vec::new(),
            children: Vec::new(),
            parent: None,
            from,
            to,
            indentation: 0,
            attrs: BTreeMap::new(),
            data: NodeData::default(),
        }
    }

    /// Whether `[from, to]` lies inside this node's span.
    pub fn contains(&self, from: usize, to: usize) -> bool {
        from >= self.from && to <= self.to
    }
}

/// The forest of outline nodes built from one version of a document.
///
/// Nodes live in a flat arena; parent and child links are [`NodeId`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutlineTree {
    pub(crate) nodes: Vec<OutlineNode>,
    pub(crate) roots: Vec<NodeId>,
}

impl OutlineTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, node: OutlineNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Panics when `id` came from a different tree.
    pub fn node(&self, id: NodeId) -> &OutlineNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&OutlineNode> {
        self.nodes.get(id.0)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut OutlineNode {
        &mut self.nodes[id.0]
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// The node followed by its parent, grandparent and so on.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |&current| self.parent(current))
    }

    /// Every node reachable from the roots, parents before children, in
    /// document order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &OutlineNode)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }
}
