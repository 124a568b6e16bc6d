//! Flat, serde-ready snapshots of a world.
//!
//! Records address places by `(layer, x, y)` and ids only; path handles
//! are session-local and are not persisted. Any serde format can carry a
//! [`WorldRecord`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use mudmap_core::{
    AreaId, Color, Exit, IdAllocator, LayerId, Location, PlaceId, RingId, SequentialId,
};
use mudmap_space::{GridLayer, RootSizing};

use crate::area::{Area, InfoRing};
use crate::config::{WorldConfig, WorldSettings};
use crate::error::WorldError;
use crate::path::Path;
use crate::place::{LevelRange, Place};
use crate::world::WorldGraph;

/// A layer's identity, name and index center hint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerRecord {
    /// Layer id.
    pub id: LayerId,
    /// Explicit display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Index root center, used to pre-size the root on import.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<(i32, i32)>,
}

/// A place and its attributes. Unset level bounds are stored as `-1`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceRecord {
    /// Place id.
    pub id: PlaceId,
    /// Display name.
    pub name: String,
    /// Layer id.
    pub layer: LayerId,
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Area membership.
    #[serde(default)]
    pub area: Option<AreaId>,
    /// Information ring.
    #[serde(default)]
    pub ring: Option<RingId>,
    /// Lowest recommended level, `-1` if unset.
    #[serde(default = "unset_level")]
    pub level_min: i32,
    /// Highest recommended level, `-1` if unset.
    #[serde(default = "unset_level")]
    pub level_max: i32,
    /// Free-text notes.
    #[serde(default)]
    pub comment: String,
    /// Named flags.
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
    /// Child place ids.
    #[serde(default)]
    pub children: Vec<PlaceId>,
}

fn unset_level() -> i32 {
    -1
}

/// A path as its two `(place, exit)` endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRecord {
    /// First endpoint.
    pub a: PlaceId,
    /// Exit at the first endpoint.
    pub exit_a: Exit,
    /// Second endpoint.
    pub b: PlaceId,
    /// Exit at the second endpoint.
    pub exit_b: Exit,
}

/// An area with its id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaRecord {
    /// Area id.
    pub id: AreaId,
    /// Display name.
    pub name: String,
    /// Fill color.
    pub color: Color,
}

/// An information ring with its id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingRecord {
    /// Ring id.
    pub id: RingId,
    /// Meaning of the ring.
    pub description: String,
    /// Ring color.
    pub color: Color,
}

/// A complete world snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldRecord {
    /// World name.
    pub name: String,
    /// Display settings.
    #[serde(default)]
    pub settings: WorldSettings,
    /// Home location.
    #[serde(default)]
    pub home: Option<Location>,
    /// Layers.
    pub layers: Vec<LayerRecord>,
    /// Areas.
    #[serde(default)]
    pub areas: Vec<AreaRecord>,
    /// Information rings.
    #[serde(default)]
    pub rings: Vec<RingRecord>,
    /// Places.
    pub places: Vec<PlaceRecord>,
    /// Paths.
    #[serde(default)]
    pub paths: Vec<PathRecord>,
}

/// Set `ids` to hand out `max(seen) + 1` next.
fn reseed_after<I: SequentialId>(ids: &mut IdAllocator<I>, seen: impl Iterator<Item = I>) {
    let next = seen
        .map(|id| id.raw().saturating_add(1))
        .max()
        .unwrap_or(IdAllocator::<I>::FIRST);
    ids.reseed(next.max(ids.peek()));
}

impl WorldGraph {
    /// Snapshot the world.
    pub fn to_record(&self) -> WorldRecord {
        let layers = self
            .layers()
            .map(|l| LayerRecord {
                id: l.id(),
                name: l.name().map(str::to_owned),
                center: l.center_hint(),
            })
            .collect();
        let places = self
            .places()
            .map(|p| {
                let loc = p.location();
                let (level_min, level_max) = p.levels.to_raw();
                PlaceRecord {
                    id: p.id(),
                    name: p.name().to_owned(),
                    layer: loc.layer,
                    x: loc.x,
                    y: loc.y,
                    area: p.area(),
                    ring: p.ring(),
                    level_min,
                    level_max,
                    comment: p.comment.clone(),
                    flags: p.flags.clone(),
                    children: p.children().collect(),
                }
            })
            .collect();
        let paths = self
            .paths()
            .map(|(_, path)| {
                let [a, b] = path.ends();
                PathRecord {
                    a: a.place,
                    exit_a: a.exit,
                    b: b.place,
                    exit_b: b.exit,
                }
            })
            .collect();
        WorldRecord {
            name: self.name().to_owned(),
            settings: self.settings().clone(),
            home: self.home(),
            layers,
            areas: self
                .areas()
                .map(|(id, a)| AreaRecord {
                    id,
                    name: a.name.clone(),
                    color: a.color,
                })
                .collect(),
            rings: self
                .rings()
                .map(|(id, r)| RingRecord {
                    id,
                    description: r.description.clone(),
                    color: r.color,
                })
                .collect(),
            places,
            paths,
        }
    }

    /// Rebuild a world from a snapshot.
    ///
    /// Layer roots are pre-sized from their center hints so the index
    /// reproduces the saved layout. Children and paths naming missing
    /// places, and area or ring references to missing entries, are
    /// skipped with a warning. Every allocator is reseeded past the
    /// largest id in the record.
    pub fn from_record(record: WorldRecord) -> Result<Self, WorldError> {
        record.settings.validate()?;
        let mut world = WorldGraph::bare(WorldConfig {
            name: record.name,
            settings: record.settings,
            root_sizing: RootSizing::default(),
        });
        world.set_home(record.home);

        for l in record.layers {
            let sizing = l
                .center
                .map_or_else(RootSizing::default, |(x, y)| RootSizing::centered(x, y));
            let mut layer = GridLayer::with_sizing(l.id, sizing)?;
            layer.set_name(l.name);
            world.adopt_layer(layer)?;
        }
        for a in record.areas {
            world.adopt_area(a.id, Area::new(a.name, a.color))?;
        }
        for r in record.rings {
            world.adopt_ring(r.id, InfoRing::new(r.description, r.color))?;
        }

        let mut links = Vec::new();
        for p in record.places {
            let mut place = Place::new(p.id, p.name, Location::new(p.layer, p.x, p.y));
            place.levels = LevelRange::from_raw(p.level_min, p.level_max);
            place.comment = p.comment;
            place.flags = p.flags;
            if let Some(area) = p.area {
                if world.area(area).is_some() {
                    place.area = Some(area);
                } else {
                    warn!(place = %p.id, area = %area, "record: dropping unknown area reference");
                }
            }
            if let Some(ring) = p.ring {
                if world.ring(ring).is_some() {
                    place.ring = Some(ring);
                } else {
                    warn!(place = %p.id, ring = %ring, "record: dropping unknown ring reference");
                }
            }
            world.insert_place(place, p.layer, p.x, p.y)?;
            links.extend(p.children.into_iter().map(|child| (p.id, child)));
        }
        for (parent, child) in links {
            if world.place(child).is_none() {
                warn!(
                    parent = %parent,
                    child = %child,
                    "record: skipping child link to missing place"
                );
                continue;
            }
            world.connect_child(parent, child)?;
        }
        for r in record.paths {
            let path = Path::new(r.a, r.exit_a, r.b, r.exit_b).map_err(|e| {
                WorldError::InvalidRecord {
                    reason: e.to_string(),
                }
            })?;
            if let Some(missing) = [r.a, r.b].into_iter().find(|&id| world.place(id).is_none()) {
                warn!(place = %missing, "record: skipping path to missing place");
                continue;
            }
            world.connect_path(r.a, path)?;
        }

        let place_ids: Vec<PlaceId> = world.places().map(|p| p.id()).collect();
        reseed_after(&mut world.place_ids, place_ids.into_iter());
        let layer_ids: Vec<LayerId> = world.layers().map(|l| l.id()).collect();
        reseed_after(&mut world.layer_ids, layer_ids.into_iter());
        let area_ids: Vec<AreaId> = world.areas().map(|(id, _)| id).collect();
        reseed_after(&mut world.area_ids, area_ids.into_iter());
        let ring_ids: Vec<RingId> = world.rings().map(|(id, _)| id).collect();
        reseed_after(&mut world.ring_ids, ring_ids.into_iter());
        Ok(world)
    }
}
