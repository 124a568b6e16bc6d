//! Error type for world graph operations.

use std::error::Error;
use std::fmt;

use mudmap_core::{AreaId, CoreError, Exit, LayerId, Location, PlaceId, RingId};
use mudmap_space::SpaceError;

use crate::config::ConfigError;
use crate::path::PathId;

/// Errors returned by [`WorldGraph`](crate::WorldGraph) operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorldError {
    /// No place with this id is registered.
    UnknownPlace {
        /// The missing id.
        place: PlaceId,
    },
    /// No layer with this id exists.
    UnknownLayer {
        /// The missing id.
        layer: LayerId,
    },
    /// No path with this handle exists.
    UnknownPath {
        /// The missing handle.
        path: PathId,
    },
    /// No area with this id exists.
    UnknownArea {
        /// The missing id.
        area: AreaId,
    },
    /// No information ring with this id exists.
    UnknownRing {
        /// The missing id.
        ring: RingId,
    },
    /// A place id is already registered.
    DuplicatePlace {
        /// The id in use.
        place: PlaceId,
    },
    /// A path would connect a place to itself through the same exit.
    SelfLoop {
        /// The place at both ends.
        place: PlaceId,
        /// The exit used at both ends.
        exit: Exit,
    },
    /// The place presenting a path is not one of its endpoints.
    NotAnEndpoint {
        /// The presenting place.
        place: PlaceId,
    },
    /// The registry and the layer index disagree about a place.
    LocationMismatch {
        /// The place whose records disagree.
        place: PlaceId,
        /// Where the registry says the place is.
        location: Location,
    },
    /// A paste target would overlap an occupied slot.
    PasteBlocked {
        /// The first blocked slot.
        location: Location,
    },
    /// A paste offset leaves the coordinate range.
    PasteOutOfRange {
        /// The place whose destination overflowed.
        place: PlaceId,
    },
    /// A cut clipboard was already pasted.
    ClipboardConsumed,
    /// A clipboard operation was given the wrong kind of selection.
    ClipboardMode {
        /// What the operation needs.
        expected: &'static str,
    },
    /// A record refers to data it does not contain.
    InvalidRecord {
        /// Description of the inconsistency.
        reason: String,
    },
    /// A spatial index or layer operation failed.
    Space(SpaceError),
    /// An id allocator or parse error.
    Core(CoreError),
    /// The world configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPlace { place } => write!(f, "unknown place {place}"),
            Self::UnknownLayer { layer } => write!(f, "unknown layer {layer}"),
            Self::UnknownPath { path } => write!(f, "unknown path {path}"),
            Self::UnknownArea { area } => write!(f, "unknown area {area}"),
            Self::UnknownRing { ring } => write!(f, "unknown information ring {ring}"),
            Self::DuplicatePlace { place } => write!(f, "place {place} is already registered"),
            Self::SelfLoop { place, exit } => {
                write!(f, "path would loop place {place} onto its own exit {exit}")
            }
            Self::NotAnEndpoint { place } => {
                write!(f, "place {place} is not an endpoint of the path")
            }
            Self::LocationMismatch { place, location } => {
                write!(f, "place {place} is not stored at its recorded {location}")
            }
            Self::PasteBlocked { location } => write!(f, "paste blocked at {location}"),
            Self::PasteOutOfRange { place } => {
                write!(f, "paste moves place {place} outside the coordinate range")
            }
            Self::ClipboardConsumed => write!(f, "cut clipboard was already pasted"),
            Self::ClipboardMode { expected } => write!(f, "clipboard must hold a {expected}"),
            Self::InvalidRecord { reason } => write!(f, "invalid record: {reason}"),
            Self::Space(e) => write!(f, "space: {e}"),
            Self::Core(e) => write!(f, "core: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl Error for WorldError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Space(e) => Some(e),
            Self::Core(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SpaceError> for WorldError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}

impl From<CoreError> for WorldError {
    fn from(e: CoreError) -> Self {
        Self::Core(e)
    }
}

impl From<ConfigError> for WorldError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
