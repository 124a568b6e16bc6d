//! Test utilities for mudmap development.
//!
//! Provides a [`TestWorldBuilder`] for assembling small maps in a few
//! lines, ready-made world [`fixtures`], and [`assert_world_consistent`],
//! which checks every cross-reference a [`WorldGraph`] maintains.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use mudmap_core::{Exit, LayerId, PlaceId};
use mudmap_world::WorldGraph;

/// Builder for small test worlds addressed by place name.
///
/// ```
/// use mudmap_core::Exit;
/// use mudmap_test_utils::TestWorldBuilder;
///
/// let (world, ids) = TestWorldBuilder::new()
///     .place("hall", 0, 0)
///     .place("kitchen", 1, 0)
///     .path("hall", Exit::East, "kitchen", Exit::West)
///     .build();
/// assert!(world.path_between(ids["hall"], ids["kitchen"]).is_some());
/// ```
pub struct TestWorldBuilder {
    layer: LayerId,
    places: Vec<(String, LayerId, i32, i32)>,
    paths: Vec<(String, Exit, String, Exit)>,
    children: Vec<(String, String)>,
}

impl TestWorldBuilder {
    pub fn new() -> Self {
        Self {
            layer: LayerId(1),
            places: Vec::new(),
            paths: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Subsequent places go on `layer`.
    pub fn on_layer(mut self, layer: LayerId) -> Self {
        self.layer = layer;
        self
    }

    pub fn place(mut self, name: &str, x: i32, y: i32) -> Self {
        self.places.push((name.to_string(), self.layer, x, y));
        self
    }

    pub fn path(mut self, a: &str, exit_a: Exit, b: &str, exit_b: Exit) -> Self {
        self.paths
            .push((a.to_string(), exit_a, b.to_string(), exit_b));
        self
    }

    pub fn child(mut self, parent: &str, child: &str) -> Self {
        self.children.push((parent.to_string(), child.to_string()));
        self
    }

    /// Build the world.
    ///
    /// # Panics
    ///
    /// Panics if a name is reused, a slot is taken twice, or a link names
    /// an unknown place.
    pub fn build(self) -> (WorldGraph, std::collections::HashMap<String, PlaceId>) {
        let mut world = WorldGraph::new("test");
        let mut ids = std::collections::HashMap::new();
        for (name, layer, x, y) in self.places {
            let id = world
                .create_place(name.clone(), layer, x, y)
                .unwrap_or_else(|e| panic!("placing {name}: {e}"));
            assert!(ids.insert(name.clone(), id).is_none(), "duplicate name {name}");
        }
        for (a, exit_a, b, exit_b) in self.paths {
            world
                .connect(ids[&a], exit_a, ids[&b], exit_b)
                .unwrap_or_else(|e| panic!("path {a} -> {b}: {e}"));
        }
        for (parent, child) in self.children {
            world
                .connect_child(ids[&parent], ids[&child])
                .unwrap_or_else(|e| panic!("child {parent} -> {child}: {e}"));
        }
        (world, ids)
    }
}

impl Default for TestWorldBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Assert every cross-reference a world maintains:
///
/// - each place sits in its layer's slot at its recorded location;
/// - each layer holds only registered places, at their recorded slots;
/// - each path is listed by both endpoints, and each listed path exists
///   and touches the place listing it;
/// - child and parent sets mirror each other.
pub fn assert_world_consistent(world: &WorldGraph) {
    for place in world.places() {
        let id = place.id();
        let loc = place.location();
        assert_eq!(
            world.place_at(loc.layer, loc.x, loc.y),
            Some(id),
            "place {id} missing from its slot {loc}"
        );
        for path_id in place.paths() {
            let path = world
                .path(path_id)
                .unwrap_or_else(|| panic!("place {id} lists missing path {path_id}"));
            assert!(path.touches(id), "place {id} lists foreign path {path_id}");
        }
        for child in place.children() {
            let c = world
                .place(child)
                .unwrap_or_else(|| panic!("place {id} lists missing child {child}"));
            assert!(c.parents().any(|p| p == id), "child {child} does not list parent {id}");
        }
        for parent in place.parents() {
            let p = world
                .place(parent)
                .unwrap_or_else(|| panic!("place {id} lists missing parent {parent}"));
            assert!(p.children().any(|c| c == id), "parent {parent} does not list child {id}");
        }
    }
    for layer in world.layers() {
        for (id, x, y) in layer.places() {
            let place = world
                .place(id)
                .unwrap_or_else(|| panic!("layer {} holds unregistered place {id}", layer.id()));
            let loc = place.location();
            assert_eq!(
                (loc.layer, loc.x, loc.y),
                (layer.id(), x, y),
                "layer and registry disagree on place {id}"
            );
        }
    }
    for (path_id, path) in world.paths() {
        for end in path.ends() {
            let place = world
                .place(end.place)
                .unwrap_or_else(|| panic!("path {path_id} touches missing place {}", end.place));
            assert!(
                place.paths().any(|p| p == path_id),
                "place {} does not list path {path_id}",
                end.place
            );
        }
    }
}
