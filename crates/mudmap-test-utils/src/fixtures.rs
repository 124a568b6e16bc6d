//! Ready-made worlds for tests and benchmarks.
//!
//! - [`corridor`] — a straight east-west line of linked places.
//! - [`linked_grid`] — a rectangle with every orthogonal neighbour linked.
//! - [`scattered`] — far-apart places on one layer, no links.

use mudmap_core::{Exit, LayerId, PlaceId};
use mudmap_world::WorldGraph;

/// Layer used by every fixture.
pub const FIXTURE_LAYER: LayerId = LayerId(1);

/// `len` places at `(0..len, 0)`, each linked east to the next.
pub fn corridor(len: i32) -> (WorldGraph, Vec<PlaceId>) {
    let mut world = WorldGraph::new("corridor");
    let ids: Vec<PlaceId> = (0..len)
        .map(|x| {
            world
                .create_place(format!("c{x}"), FIXTURE_LAYER, x, 0)
                .unwrap_or_else(|e| panic!("corridor place {x}: {e}"))
        })
        .collect();
    for pair in ids.windows(2) {
        world
            .connect(pair[0], Exit::East, pair[1], Exit::West)
            .unwrap_or_else(|e| panic!("corridor link: {e}"));
    }
    (world, ids)
}

/// A `width` x `height` block starting at the origin with every
/// orthogonal neighbour linked. Ids are returned row-major from the
/// south-west corner.
pub fn linked_grid(width: i32, height: i32) -> (WorldGraph, Vec<PlaceId>) {
    let mut world = WorldGraph::new("grid");
    let mut ids = Vec::with_capacity((width.max(0) * height.max(0)) as usize);
    for y in 0..height {
        for x in 0..width {
            let id = world
                .create_place(format!("g{x}_{y}"), FIXTURE_LAYER, x, y)
                .unwrap_or_else(|e| panic!("grid place ({x}, {y}): {e}"));
            ids.push(id);
        }
    }
    let at = |x: i32, y: i32| ids[(y * width + x) as usize];
    for y in 0..height {
        for x in 0..width {
            if x + 1 < width {
                world
                    .connect(at(x, y), Exit::East, at(x + 1, y), Exit::West)
                    .unwrap_or_else(|e| panic!("grid link: {e}"));
            }
            if y + 1 < height {
                world
                    .connect(at(x, y), Exit::North, at(x, y + 1), Exit::South)
                    .unwrap_or_else(|e| panic!("grid link: {e}"));
            }
        }
    }
    (world, ids)
}

/// `count` unlinked places spread along a diagonal with `stride` between
/// neighbours, alternating sides of the origin.
pub fn scattered(count: i32, stride: i32) -> (WorldGraph, Vec<PlaceId>) {
    let mut world = WorldGraph::new("scattered");
    let ids = (0..count)
        .map(|i| {
            let sign = if i % 2 == 0 { 1 } else { -1 };
            let d = sign * (i / 2 + 1) * stride;
            world
                .create_place(format!("s{i}"), FIXTURE_LAYER, d, -d / 2)
                .unwrap_or_else(|e| panic!("scattered place {i}: {e}"))
        })
        .collect();
    (world, ids)
}
