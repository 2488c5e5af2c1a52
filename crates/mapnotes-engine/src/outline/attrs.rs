use super::node::OutlineTree;

/// Index every node's direct children by key.
///
/// The first child with a given key wins; later duplicates stay reachable
/// through `children` only.
pub fn index_attrs(tree: &mut OutlineTree) {
    for id in tree.preorder() {
        let mut attrs = std::collections::BTreeMap::new();
        for &child in tree.children(id) {
            if let Some(key) = &tree.node(child).key {
                attrs.entry(key.clone()).or_insert(child);
            }
        }
        tree.node_mut(id).attrs = attrs;
    }
}
