//! Sparse spatial storage for mudmap layers.
//!
//! This crate provides the coordinate-addressed half of the map model:
//! a point-region [`QuadTree`] mapping integer `(x, y)` coordinates to
//! values, and the [`GridLayer`] that stores one map level's places in
//! such a tree while tracking its bounding [`Extent`].
//!
//! # Coordinate convention
//!
//! `x` grows eastward and `y` grows northward. A quadtree node with
//! center `c` and half-extent `h` covers `(c - h, c + h]` on each axis;
//! a coordinate strictly greater than the center falls in the east
//! (or north) half.
//!
//! # Root sizing
//!
//! [`RootSizing::Auto`] centers the root on the first inserted
//! coordinate; [`RootSizing::Fixed`] pins the root up front, which lets
//! a loader reproduce a persisted layout without re-centering.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod extent;
pub mod layer;
pub mod quadtree;
pub mod sizing;

#[cfg(test)]
pub(crate) mod compliance;

pub use error::SpaceError;
pub use extent::Extent;
pub use layer::GridLayer;
pub use quadtree::{Iter, QuadTree, Quadrant};
pub use sizing::{RootSizing, DEFAULT_HALF_EXTENT};
