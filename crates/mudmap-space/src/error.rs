//! Error types for spatial index and layer operations.

use mudmap_core::{LayerId, Location, PlaceId};
use std::fmt;

/// Errors arising from quadtree or grid layer operations.
///
/// Every variant signals either a caller mistake or a desynchronised
/// upstream structure; none of them is corrected silently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpaceError {
    /// The quadtree could not synthesise a node separating the new
    /// coordinate from its neighbours (the coordinate lies outside the
    /// root's range).
    InsertionFailure {
        /// Column of the rejected coordinate.
        x: i32,
        /// Row of the rejected coordinate.
        y: i32,
    },
    /// The exact coordinate already holds a value.
    Occupied {
        /// Column of the occupied coordinate.
        x: i32,
        /// Row of the occupied coordinate.
        y: i32,
    },
    /// A relocation found nothing at its source coordinate.
    NothingAtSource {
        /// Column of the empty source.
        x: i32,
        /// Row of the empty source.
        y: i32,
    },
    /// A layer refused a place because another place occupies the slot.
    PlaceNotInserted {
        /// Column of the contested slot.
        x: i32,
        /// Row of the contested slot.
        y: i32,
    },
    /// A removal addressed an empty slot.
    NotFound {
        /// The empty location.
        location: Location,
    },
    /// A removal addressed a slot holding a different place.
    LocationMismatch {
        /// The addressed location.
        location: Location,
        /// The place the caller expected there.
        expected: PlaceId,
        /// The place actually stored there.
        found: PlaceId,
    },
    /// A removal addressed a different layer than the one asked.
    LayerMismatch {
        /// The layer that received the request.
        expected: LayerId,
        /// The layer recorded in the request.
        found: LayerId,
    },
    /// A root half-extent that is not a power of two in `[1, 2^30]`.
    InvalidRootSizing {
        /// The rejected half-extent.
        half_extent: u32,
    },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsertionFailure { x, y } => {
                write!(f, "cannot insert at ({x}, {y}): outside the index range")
            }
            Self::Occupied { x, y } => write!(f, "({x}, {y}) is already occupied"),
            Self::NothingAtSource { x, y } => write!(f, "nothing to move at ({x}, {y})"),
            Self::PlaceNotInserted { x, y } => {
                write!(f, "place not inserted: ({x}, {y}) holds another place")
            }
            Self::NotFound { location } => write!(f, "no place at {location}"),
            Self::LocationMismatch {
                location,
                expected,
                found,
            } => {
                write!(
                    f,
                    "location mismatch at {location}: expected place {expected}, found {found}"
                )
            }
            Self::LayerMismatch { expected, found } => {
                write!(f, "layer mismatch: request for layer {found} sent to layer {expected}")
            }
            Self::InvalidRootSizing { half_extent } => {
                write!(
                    f,
                    "root half-extent {half_extent} must be a power of two no larger than 2^30"
                )
            }
        }
    }
}

impl std::error::Error for SpaceError {}
