//! Benchmark profiles and utilities for mudmap.
//!
//! - [`reference_world`]: a square block of linked places
//! - [`sprawl_world`]: unlinked places scattered over a wide sparse area
//! - [`scatter_coords`]: deterministic distinct coordinates via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use mudmap_core::{Exit, LayerId, PlaceId};
use mudmap_world::{WorldError, WorldGraph};

/// Layer every profile builds on.
pub const BENCH_LAYER: LayerId = LayerId(1);

/// Build a `side` x `side` block of places with every orthogonal
/// neighbour linked. Ids are row-major from the south-west corner.
pub fn reference_world(side: i32) -> Result<(WorldGraph, Vec<PlaceId>), WorldError> {
    let mut world = WorldGraph::new("reference");
    let mut ids = Vec::with_capacity((side.max(0) as usize).pow(2));
    for y in 0..side {
        for x in 0..side {
            ids.push(world.create_place(format!("r{x}_{y}"), BENCH_LAYER, x, y)?);
        }
    }
    let at = |x: i32, y: i32| ids[(y * side + x) as usize];
    for y in 0..side {
        for x in 0..side {
            if x + 1 < side {
                world.connect(at(x, y), Exit::East, at(x + 1, y), Exit::West)?;
            }
            if y + 1 < side {
                world.connect(at(x, y), Exit::North, at(x, y + 1), Exit::South)?;
            }
        }
    }
    Ok((world, ids))
}

/// Build `n` unlinked places at [`scatter_coords`] positions.
pub fn sprawl_world(
    n: usize,
    spread: i32,
    seed: u64,
) -> Result<(WorldGraph, Vec<PlaceId>), WorldError> {
    let mut world = WorldGraph::new("sprawl");
    let ids = scatter_coords(n, spread, seed)
        .into_iter()
        .enumerate()
        .map(|(i, (x, y))| world.create_place(format!("s{i}"), BENCH_LAYER, x, y))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((world, ids))
}

/// Generate `n` distinct deterministic coordinates in
/// `[-spread, spread)` on both axes.
///
/// # Panics
///
/// Panics if `spread` is not positive or the square holds fewer than `n`
/// cells.
pub fn scatter_coords(n: usize, spread: i32, seed: u64) -> Vec<(i32, i32)> {
    assert!(spread > 0, "spread must be positive");
    let side = 2 * spread as u64;
    let cells = side * side;
    assert!(cells >= n as u64, "not enough room for {n} coordinates");
    let mut coords = Vec::with_capacity(n);
    let mut occupied = std::collections::HashSet::new();

    for i in 0..n as u64 {
        let mut cell = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(i.wrapping_mul(1442695040888963407))
            % cells;

        // Linear probe to avoid collisions
        while occupied.contains(&cell) {
            cell = (cell + 1) % cells;
        }
        occupied.insert(cell);
        let x = (cell % side) as i32 - spread;
        let y = (cell / side) as i32 - spread;
        coords.push((x, y));
    }

    coords
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_world_is_fully_linked() {
        let (world, ids) = reference_world(10).unwrap();
        assert_eq!(ids.len(), 100);
        assert_eq!(world.paths().count(), 2 * 10 * 9);
        assert_eq!(
            world.shortest_route(ids[0], ids[99]).map(|r| r.len()),
            Some(19)
        );
    }

    #[test]
    fn sprawl_world_places_everything() {
        let (world, ids) = sprawl_world(500, 1000, 7).unwrap();
        assert_eq!(world.place_count(), ids.len());
        assert_eq!(world.layer(BENCH_LAYER).unwrap().len(), 500);
    }

    #[test]
    fn scatter_coords_no_collisions() {
        let coords = scatter_coords(50, 5, 42);
        let unique: std::collections::HashSet<_> = coords.iter().copied().collect();
        assert_eq!(unique.len(), 50);
        for &(x, y) in &coords {
            assert!(
                (-5..5).contains(&x) && (-5..5).contains(&y),
                "({x}, {y}) out of bounds"
            );
        }
    }

    #[test]
    fn scatter_coords_deterministic() {
        assert_eq!(scatter_coords(100, 64, 9), scatter_coords(100, 64, 9));
    }
}
