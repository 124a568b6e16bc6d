//! Core types for the mudmap map-editing workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the spatial index and the world graph:
//! strongly-typed ids and their allocator, grid locations, the closed
//! [`Exit`] direction set, colors, and the core error type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod color;
pub mod error;
pub mod exit;
pub mod id;

pub use color::Color;
pub use error::CoreError;
pub use exit::Exit;
pub use id::{AreaId, IdAllocator, LayerId, Location, PlaceId, RingId, SequentialId};
