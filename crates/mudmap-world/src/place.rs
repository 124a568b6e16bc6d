//! Places: the rooms of a map.

use std::collections::BTreeMap;

use indexmap::IndexSet;
use mudmap_core::{AreaId, Location, PlaceId, RingId};
use serde::{Deserialize, Serialize};

use crate::path::PathId;

/// Recommended level range for a place; either bound may be unset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelRange {
    /// Lowest recommended level.
    pub min: Option<i32>,
    /// Highest recommended level.
    pub max: Option<i32>,
}

impl LevelRange {
    /// Encode an unset bound as `-1`, the persisted convention.
    pub fn to_raw(self) -> (i32, i32) {
        (self.min.unwrap_or(-1), self.max.unwrap_or(-1))
    }

    /// Decode a persisted pair, treating negative values as unset.
    pub fn from_raw(min: i32, max: i32) -> Self {
        let bound = |v: i32| (v >= 0).then_some(v);
        Self {
            min: bound(min),
            max: bound(max),
        }
    }
}

/// A room positioned on a layer.
///
/// The graph links (`children`, `parents`, `paths`) are maintained by
/// [`WorldGraph`](crate::WorldGraph); a detached place built with
/// [`Place::new`] or [`Place::duplicate`] has none.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Place {
    pub(crate) id: PlaceId,
    pub(crate) name: String,
    pub(crate) location: Location,
    pub(crate) area: Option<AreaId>,
    pub(crate) ring: Option<RingId>,
    /// Recommended levels.
    pub levels: LevelRange,
    /// Free-text notes.
    pub comment: String,
    /// Named boolean flags, ordered by name.
    pub flags: BTreeMap<String, bool>,
    pub(crate) children: IndexSet<PlaceId>,
    pub(crate) parents: IndexSet<PlaceId>,
    pub(crate) paths: IndexSet<PathId>,
}

impl Place {
    /// A detached place with no attributes or links.
    pub fn new(id: PlaceId, name: impl Into<String>, location: Location) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            area: None,
            ring: None,
            levels: LevelRange::default(),
            comment: String::new(),
            flags: BTreeMap::new(),
            children: IndexSet::new(),
            parents: IndexSet::new(),
            paths: IndexSet::new(),
        }
    }

    /// A detached copy under `id`: same name, location and attributes,
    /// no links.
    pub fn duplicate(&self, id: PlaceId) -> Self {
        Self {
            area: self.area,
            ring: self.ring,
            levels: self.levels,
            comment: self.comment.clone(),
            flags: self.flags.clone(),
            ..Self::new(id, self.name.clone(), self.location)
        }
    }

    /// The place id.
    pub fn id(&self) -> PlaceId {
        self.id
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the place sits.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Area membership.
    pub fn area(&self) -> Option<AreaId> {
        self.area
    }

    /// Information ring classification.
    pub fn ring(&self) -> Option<RingId> {
        self.ring
    }

    /// Set a named flag.
    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) {
        self.flags.insert(name.into(), value);
    }

    /// A flag's value; unset flags read as `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Child places.
    pub fn children(&self) -> impl Iterator<Item = PlaceId> + '_ {
        self.children.iter().copied()
    }

    /// Parent places.
    pub fn parents(&self) -> impl Iterator<Item = PlaceId> + '_ {
        self.parents.iter().copied()
    }

    /// Incident paths.
    pub fn paths(&self) -> impl Iterator<Item = PathId> + '_ {
        self.paths.iter().copied()
    }

    /// Whether the place has any path, child or parent link.
    pub fn is_linked(&self) -> bool {
        !(self.children.is_empty() && self.parents.is_empty() && self.paths.is_empty())
    }
}
