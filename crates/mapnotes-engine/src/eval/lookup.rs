//! `lookup(path)`: resolving dotted key paths through `attrs`.

use crate::outline::{NodeId, OutlineTree};

use super::value::{Value, parse_float_prefix};

/// Resolve `path` starting at `start`.
///
/// Every segment is searched in the current node's `attrs`, then in each
/// ancestor's, and the match becomes the current node for the next
/// segment. A later segment can therefore resolve above an earlier one.
pub fn resolve_path(tree: &OutlineTree, start: NodeId, path: &str) -> Option<NodeId> {
    path.split('.').try_fold(start, |current, segment| {
        tree.ancestors(current)
            .find_map(|id| tree.node(id).attrs.get(segment).copied())
    })
}

/// Value of the node `path` resolves to.
///
/// A node with formulas yields its first formula's current result. Other
/// nodes yield the numeric prefix of their value, or the raw value text.
/// An unresolved path is `Undefined`, not an error.
pub fn lookup(tree: &OutlineTree, start: NodeId, path: &str) -> Value {
    let Some(id) = resolve_path(tree, start, path) else {
        return Value::Undefined;
    };
    let node = tree.node(id);

    if let Some(first) = node.expressions.first() {
        return first
            .value
            .clone()
            .map(Value::Str)
            .unwrap_or(Value::Undefined);
    }

    match parse_float_prefix(&node.value) {
        Some(number) => Value::Number(number),
        None => Value::Str(node.value.clone()),
    }
}
