//! Paths: undirected, exit-labelled connections between places.

use std::fmt;

use mudmap_core::{Exit, PlaceId, SequentialId};

use crate::error::WorldError;

/// Handle of a path in a world's path arena.
///
/// Handles are session-local: records persist the endpoints, not the
/// handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathId(pub u32);

impl fmt::Display for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl SequentialId for PathId {
    const KIND: &'static str = "path";

    fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    fn raw(self) -> u32 {
        self.0
    }
}

/// One side of a path: a place and the exit the path leaves it through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// The place.
    pub place: PlaceId,
    /// The exit used at this place.
    pub exit: Exit,
}

/// A connection between two places.
///
/// A place may connect to itself only through two different exits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Path {
    ends: [Endpoint; 2],
}

impl Path {
    /// Connect `a` through `exit_a` with `b` through `exit_b`.
    pub fn new(a: PlaceId, exit_a: Exit, b: PlaceId, exit_b: Exit) -> Result<Self, WorldError> {
        if a == b && exit_a == exit_b {
            return Err(WorldError::SelfLoop {
                place: a,
                exit: exit_a,
            });
        }
        Ok(Self {
            ends: [
                Endpoint {
                    place: a,
                    exit: exit_a,
                },
                Endpoint {
                    place: b,
                    exit: exit_b,
                },
            ],
        })
    }

    /// Both endpoints, in construction order.
    pub fn ends(&self) -> [Endpoint; 2] {
        self.ends
    }

    /// Whether `place` is one of the endpoints.
    pub fn touches(&self, place: PlaceId) -> bool {
        self.ends.iter().any(|e| e.place == place)
    }

    /// The endpoint opposite `place`.
    ///
    /// For a self-connected place this is the second endpoint.
    pub fn other_end(&self, place: PlaceId) -> Option<Endpoint> {
        match self.ends {
            [a, b] if a.place == place => Some(b),
            [a, b] if b.place == place => Some(a),
            _ => None,
        }
    }

    /// The exit the path uses at `place`.
    pub fn exit_of(&self, place: PlaceId) -> Option<Exit> {
        self.ends.iter().find(|e| e.place == place).map(|e| e.exit)
    }

    /// Whether `place` uses `exit` on this path, checking both ends.
    pub fn uses(&self, place: PlaceId, exit: Exit) -> bool {
        self.ends.iter().any(|e| e.place == place && e.exit == exit)
    }

    /// Whether two paths join the same endpoints, in either orientation.
    pub fn same_link(&self, other: &Path) -> bool {
        let [a, b] = self.ends;
        other.ends == [a, b] || other.ends == [b, a]
    }
}
