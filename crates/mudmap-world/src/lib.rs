//! The mudmap world model.
//!
//! A [`WorldGraph`] owns every layer, place, path, area and information
//! ring of one map. Places sit on [`GridLayer`](mudmap_space::GridLayer)s
//! at integer coordinates and link to each other through exit-labelled
//! [`Path`]s and asymmetric parent/child links.
//!
//! On top of the registry this crate provides breadth-first search over
//! paths, the [`Clipboard`] for copying and moving groups of places, and
//! serde [records](record) for persisting a world.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod area;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod path;
pub mod place;
pub mod record;
mod search;
pub mod world;

pub use area::{Area, InfoRing};
pub use clipboard::Clipboard;
pub use config::{ConfigError, ShowPlaceId, WorldConfig, WorldSettings};
pub use error::WorldError;
pub use path::{Endpoint, Path, PathId};
pub use place::{LevelRange, Place};
pub use record::{AreaRecord, LayerRecord, PathRecord, PlaceRecord, RingRecord, WorldRecord};
pub use world::WorldGraph;
