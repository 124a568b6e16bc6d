//! Structural invariant helpers shared by the quadtree and layer tests.

use crate::layer::GridLayer;
use crate::quadtree::QuadTree;
use indexmap::IndexSet;

/// Assert the tree's structural invariants: every leaf sits in the slot
/// its coordinate selects, no non-root node is empty, child nodes fit in
/// their parent's slot, and `len()` matches the leaf count.
pub(crate) fn assert_invariants<T>(tree: &QuadTree<T>) {
    if let Err(msg) = tree.audit() {
        panic!("quadtree invariant violated: {msg}");
    }
    assert_eq!(
        tree.iter().count(),
        tree.len(),
        "iter() and len() disagree"
    );
    if tree.is_empty() {
        assert_eq!(tree.depth(), tree.node_count().min(1));
    }
}

/// Assert that every coordinate reached by iteration answers `get` with
/// the same value.
pub(crate) fn assert_lookup_matches_iter<T: PartialEq + std::fmt::Debug>(tree: &QuadTree<T>) {
    for (x, y, v) in tree.iter() {
        assert_eq!(tree.get(x, y), Some(v), "get({x}, {y}) disagrees with iter()");
    }
}

/// Assert that a layer's index and position map describe the same places.
pub(crate) fn assert_layer_consistent(layer: &GridLayer) {
    assert_invariants(layer.index());
    assert_lookup_matches_iter(layer.index());
    assert_eq!(layer.len(), layer.places().count(), "index and position map sizes differ");
    let mut seen = IndexSet::new();
    for (place, x, y) in layer.places() {
        assert!(seen.insert(place), "place {place} listed twice");
        assert_eq!(
            layer.get(x, y),
            Some(place),
            "position map puts {place} at ({x}, {y}) but the index does not"
        );
    }
    if let (Some(running), Some(tight)) = (layer.extent(), layer.scan_extent()) {
        assert!(
            running.contains_extent(&tight),
            "running extent {running:?} does not cover {tight:?}"
        );
    }
}
