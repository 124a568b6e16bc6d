//! Mudmap: a sparse, multi-layer map model for MUD world editors.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! mudmap sub-crates. For most users, adding `mudmap` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use mudmap::prelude::*;
//!
//! let mut world = WorldGraph::new("Keep");
//! let ground = LayerId(1);
//! let hall = world.create_place("Hall", ground, 0, 0).unwrap();
//! let yard = world.create_place("Yard", ground, 0, 1).unwrap();
//! let gate = world.create_place("Gate", ground, 0, 2).unwrap();
//! world.connect(hall, Exit::North, yard, Exit::South).unwrap();
//! world.connect(yard, Exit::North, gate, Exit::South).unwrap();
//!
//! assert_eq!(world.shortest_route(hall, gate), Some(vec![hall, yard, gate]));
//!
//! // Shift the whole column one step east.
//! let column = [hall, yard, gate];
//! let mut clip = Clipboard::cut(&world, &column, Location::new(ground, 0, 0)).unwrap();
//! clip.paste(&mut world, ground, 1, 0).unwrap();
//! assert_eq!(world.place_at(ground, 1, 2), Some(gate));
//! assert_eq!(world.place_at(ground, 0, 0), None);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `mudmap-core` | IDs, locations, exits, colors |
//! | [`space`] | `mudmap-space` | Quadtree index, grid layers, extents |
//! | [`world`] | `mudmap-world` | Places, paths, world registry, search, clipboard, records |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Identifiers, locations, exits and colors (`mudmap-core`).
pub use mudmap_core as types;

/// Sparse spatial storage (`mudmap-space`).
///
/// [`space::QuadTree`] maps integer coordinates to values;
/// [`space::GridLayer`] stores one map level's places in such a tree.
pub use mudmap_space as space;

/// The world model (`mudmap-world`).
///
/// [`world::WorldGraph`] owns every layer, place and path of a map.
/// [`world::Clipboard`] copies and moves selections, and
/// [`world::record`] holds the serde persistence records.
pub use mudmap_world as world;

/// Common imports for typical mudmap usage.
///
/// ```rust
/// use mudmap::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use mudmap_core::{AreaId, Color, Exit, LayerId, Location, PlaceId, RingId};

    // Space
    pub use mudmap_space::{Extent, GridLayer, QuadTree, RootSizing};

    // World
    pub use mudmap_world::{
        Clipboard, Path, PathId, Place, WorldConfig, WorldGraph, WorldRecord, WorldSettings,
    };

    // Errors
    pub use mudmap_core::CoreError;
    pub use mudmap_space::SpaceError;
    pub use mudmap_world::{ConfigError, WorldError};
}
