//! The world graph: registries for layers, places, paths, areas and rings.
//!
//! [`WorldGraph`] is the single owner of every map object. Places and
//! paths refer to each other by id only, and every operation that
//! touches a link updates both of its ends, so a place's link sets are
//! always the exact mirror of its neighbours'.

use indexmap::map::Entry;
use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::{debug, warn};

use mudmap_core::{AreaId, Color, Exit, IdAllocator, LayerId, Location, PlaceId, RingId};
use mudmap_space::{GridLayer, RootSizing, SpaceError};

use crate::area::{Area, InfoRing};
use crate::config::{ShowPlaceId, WorldConfig, WorldSettings};
use crate::error::WorldError;
use crate::path::{Path, PathId};
use crate::place::Place;

/// A complete editable map.
///
/// # Examples
///
/// ```
/// use mudmap_core::{Exit, LayerId};
/// use mudmap_world::WorldGraph;
///
/// let mut world = WorldGraph::new("Midgaard");
/// let layer = LayerId(1);
/// let a = world.create_place("Temple", layer, 0, 0).unwrap();
/// let b = world.create_place("Square", layer, 0, -1).unwrap();
/// world.connect(a, Exit::South, b, Exit::North).unwrap();
///
/// assert_eq!(world.breadth_search(a, b), Some(b));
/// world.remove_place(b).unwrap();
/// assert_eq!(world.exits(a).len(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct WorldGraph {
    name: String,
    settings: WorldSettings,
    root_sizing: RootSizing,
    layers: IndexMap<LayerId, GridLayer>,
    places: IndexMap<PlaceId, Place>,
    paths: IndexMap<PathId, Path>,
    areas: IndexMap<AreaId, Area>,
    rings: IndexMap<RingId, InfoRing>,
    name_counts: IndexMap<String, usize>,
    home: Option<Location>,
    pub(crate) layer_ids: IdAllocator<LayerId>,
    pub(crate) place_ids: IdAllocator<PlaceId>,
    path_ids: IdAllocator<PathId>,
    pub(crate) area_ids: IdAllocator<AreaId>,
    pub(crate) ring_ids: IdAllocator<RingId>,
}

/// Map a layer-level removal failure onto the registry's view of it.
fn desync(place: PlaceId, location: Location, err: SpaceError) -> WorldError {
    match err {
        SpaceError::NotFound { .. } | SpaceError::LocationMismatch { .. } => {
            WorldError::LocationMismatch { place, location }
        }
        other => WorldError::Space(other),
    }
}

impl WorldGraph {
    /// An empty world with default settings and the default ring set.
    pub fn new(name: impl Into<String>) -> Self {
        let mut world = Self::bare(WorldConfig {
            name: name.into(),
            ..WorldConfig::default()
        });
        world.seed_default_rings();
        world
    }

    /// An empty world built from a validated configuration.
    pub fn with_config(config: WorldConfig) -> Result<Self, WorldError> {
        config.validate()?;
        let mut world = Self::bare(config);
        world.seed_default_rings();
        Ok(world)
    }

    /// An empty world with no rings; used by record import.
    pub(crate) fn bare(config: WorldConfig) -> Self {
        Self {
            name: config.name,
            settings: config.settings,
            root_sizing: config.root_sizing,
            layers: IndexMap::new(),
            places: IndexMap::new(),
            paths: IndexMap::new(),
            areas: IndexMap::new(),
            rings: IndexMap::new(),
            name_counts: IndexMap::new(),
            home: None,
            layer_ids: IdAllocator::new(),
            place_ids: IdAllocator::new(),
            path_ids: IdAllocator::new(),
            area_ids: IdAllocator::new(),
            ring_ids: IdAllocator::new(),
        }
    }

    fn seed_default_rings(&mut self) {
        for ring in InfoRing::defaults() {
            // A fresh allocator cannot be exhausted by five ids.
            if let Ok(id) = self.ring_ids.allocate() {
                self.rings.insert(id, ring);
            }
        }
    }

    /// The world's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the world.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Display settings.
    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    /// Replace the display settings after validating them.
    pub fn set_settings(&mut self, settings: WorldSettings) -> Result<(), WorldError> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    /// Root sizing applied to layers this world creates.
    pub fn root_sizing(&self) -> RootSizing {
        self.root_sizing
    }

    // ── Layers ─────────────────────────────────────────────────────

    /// Create a new empty layer with a fresh id.
    pub fn create_layer(&mut self) -> Result<LayerId, WorldError> {
        let id = self.layer_ids.allocate()?;
        self.ensure_layer(id)?;
        Ok(id)
    }

    /// The layer `id`, creating it if absent.
    pub(crate) fn ensure_layer(&mut self, id: LayerId) -> Result<&mut GridLayer, WorldError> {
        match self.layers.entry(id) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                self.layer_ids.reserve(id)?;
                let layer = GridLayer::with_sizing(id, self.root_sizing)?;
                debug!(layer = %id, "created layer");
                Ok(e.insert(layer))
            }
        }
    }

    /// Insert a prebuilt layer, replacing nothing.
    pub(crate) fn adopt_layer(&mut self, layer: GridLayer) -> Result<(), WorldError> {
        let id = layer.id();
        self.layer_ids.reserve(id)?;
        if let Entry::Vacant(e) = self.layers.entry(id) {
            e.insert(layer);
        }
        Ok(())
    }

    /// The layer `id`.
    pub fn layer(&self, id: LayerId) -> Option<&GridLayer> {
        self.layers.get(&id)
    }

    /// All layers in creation order.
    pub fn layers(&self) -> impl Iterator<Item = &GridLayer> + '_ {
        self.layers.values()
    }

    /// Set or clear a layer's display name.
    pub fn rename_layer(&mut self, id: LayerId, name: Option<String>) -> Result<(), WorldError> {
        self.layers
            .get_mut(&id)
            .ok_or(WorldError::UnknownLayer { layer: id })?
            .set_name(name);
        Ok(())
    }

    /// Places on layer `id`, in the order they were put there.
    pub fn layer_places(&self, id: LayerId) -> Result<Vec<PlaceId>, WorldError> {
        let layer = self.layer(id).ok_or(WorldError::UnknownLayer { layer: id })?;
        Ok(layer.places().map(|(place, _, _)| place).collect())
    }

    // ── Places ─────────────────────────────────────────────────────

    /// Create a place at `(x, y)` on `layer`, creating the layer if needed.
    pub fn create_place(
        &mut self,
        name: impl Into<String>,
        layer: LayerId,
        x: i32,
        y: i32,
    ) -> Result<PlaceId, WorldError> {
        self.ensure_layer(layer)?.check_put(x, y, None)?;
        let id = self.place_ids.allocate()?;
        self.attach(Place::new(id, name, Location::new(layer, x, y)))?;
        Ok(id)
    }

    /// Attach a detached place at `(x, y)` on `layer`.
    ///
    /// The place keeps its id, which is reserved in the allocator. Links
    /// it carries are dropped, as are area and ring references unknown to
    /// this world.
    pub fn insert_place(
        &mut self,
        mut place: Place,
        layer: LayerId,
        x: i32,
        y: i32,
    ) -> Result<PlaceId, WorldError> {
        let id = place.id;
        if self.places.contains_key(&id) {
            return Err(WorldError::DuplicatePlace { place: id });
        }
        self.ensure_layer(layer)?.check_put(x, y, None)?;
        self.place_ids.reserve(id)?;
        place.location = Location::new(layer, x, y);
        place.children.clear();
        place.parents.clear();
        place.paths.clear();
        if place.area.is_some_and(|a| !self.areas.contains_key(&a)) {
            place.area = None;
        }
        if place.ring.is_some_and(|r| !self.rings.contains_key(&r)) {
            place.ring = None;
        }
        self.attach(place)?;
        Ok(id)
    }

    /// Put an unlinked place into its layer slot and the registry.
    fn attach(&mut self, place: Place) -> Result<(), WorldError> {
        let Location { layer, x, y } = place.location;
        self.ensure_layer(layer)?.put(place.id, x, y)?;
        *self.name_counts.entry(place.name.clone()).or_insert(0) += 1;
        debug!(place = %place.id, layer = %layer, x, y, "attached place");
        self.places.insert(place.id, place);
        Ok(())
    }

    /// Move a registered place to `(x, y)` on `layer`.
    ///
    /// If the move fails the place stays where it was.
    pub fn put_place(
        &mut self,
        place: PlaceId,
        layer: LayerId,
        x: i32,
        y: i32,
    ) -> Result<(), WorldError> {
        let old = self
            .place(place)
            .ok_or(WorldError::UnknownPlace { place })?
            .location;
        let target = Location::new(layer, x, y);
        if old == target {
            return Ok(());
        }
        if old.layer == layer {
            self.layers
                .get_mut(&layer)
                .ok_or(WorldError::UnknownLayer { layer })?
                .put(place, x, y)?;
        } else {
            self.ensure_layer(layer)?.check_put(x, y, None)?;
            self.layers
                .get_mut(&old.layer)
                .ok_or(WorldError::UnknownLayer { layer: old.layer })?
                .remove(place, old)
                .map_err(|e| desync(place, old, e))?;
            if let Err(e) = self.ensure_layer(layer)?.put(place, x, y) {
                if let Some(home) = self.layers.get_mut(&old.layer) {
                    if let Err(restore) = home.put(place, old.x, old.y) {
                        warn!(
                            place = %place,
                            location = %old,
                            error = %restore,
                            "move failed and the old slot could not be restored"
                        );
                    }
                }
                return Err(e.into());
            }
        }
        if let Some(p) = self.places.get_mut(&place) {
            p.location = target;
        }
        debug!(place = %place, from = %old, to = %target, "moved place");
        Ok(())
    }

    /// Move a place out of `source` and into this world at `(x, y)` on
    /// `layer`.
    ///
    /// The target slot is validated before the source is touched. The
    /// place loses every path and parent/child link in `source`. It keeps
    /// its id unless this world already uses it, in which case a fresh id
    /// is allocated; the id used is returned. Area and ring references
    /// carry over only when this world has an identical area or ring.
    pub fn transfer_place_from(
        &mut self,
        source: &mut WorldGraph,
        place: PlaceId,
        layer: LayerId,
        x: i32,
        y: i32,
    ) -> Result<PlaceId, WorldError> {
        let (area, ring) = {
            let p = source.place(place).ok_or(WorldError::UnknownPlace { place })?;
            let area = p.area.and_then(|a| source.area(a)).cloned();
            let ring = p.ring.and_then(|r| source.ring(r)).cloned();
            (area, ring)
        };
        self.ensure_layer(layer)?.check_put(x, y, None)?;
        // The id is committed only after the detach succeeds.
        let mut ids = self.place_ids.clone();
        let id = if self.places.contains_key(&place) {
            ids.allocate()?
        } else {
            ids.reserve(place)?;
            place
        };
        let detached = match source.remove_place(place) {
            Ok(p) => p,
            Err(e) => {
                warn!(place = %place, error = %e, "cross-world transfer: detach failed");
                return Err(e);
            }
        };
        self.place_ids = ids;
        let mut moved = detached.duplicate(id);
        moved.location = Location::new(layer, x, y);
        moved.area = area.and_then(|a| self.find_area(&a));
        moved.ring = ring.and_then(|r| self.find_ring(&r));
        self.attach(moved)?;
        debug!(from = %place, to = %id, layer = %layer, x, y, "transferred place");
        Ok(id)
    }

    /// Remove a place, severing all its links, and return it detached.
    pub fn remove_place(&mut self, place: PlaceId) -> Result<Place, WorldError> {
        let location = self
            .place(place)
            .ok_or(WorldError::UnknownPlace { place })?
            .location;
        self.layers
            .get_mut(&location.layer)
            .ok_or(WorldError::LocationMismatch { place, location })?
            .remove(place, location)
            .map_err(|e| desync(place, location, e))?;
        self.remove_connections(place)?;
        let removed = self
            .places
            .shift_remove(&place)
            .ok_or(WorldError::UnknownPlace { place })?;
        self.release_name(&removed.name);
        debug!(place = %place, at = %location, "removed place");
        Ok(removed)
    }

    fn release_name(&mut self, name: &str) {
        if let Some(count) = self.name_counts.get_mut(name) {
            *count -= 1;
            if *count == 0 {
                self.name_counts.shift_remove(name);
            }
        }
    }

    /// Change a place's display name.
    pub fn rename_place(
        &mut self,
        place: PlaceId,
        name: impl Into<String>,
    ) -> Result<(), WorldError> {
        let name = name.into();
        let p = self
            .places
            .get_mut(&place)
            .ok_or(WorldError::UnknownPlace { place })?;
        let old = std::mem::replace(&mut p.name, name.clone());
        self.release_name(&old);
        *self.name_counts.entry(name).or_insert(0) += 1;
        Ok(())
    }

    /// The place `id`.
    pub fn place(&self, id: PlaceId) -> Option<&Place> {
        self.places.get(&id)
    }

    /// Mutable access to a place's free attributes (levels, comment,
    /// flags). Links, name, area and ring go through the world.
    pub fn place_mut(&mut self, id: PlaceId) -> Option<&mut Place> {
        self.places.get_mut(&id)
    }

    /// All places in registration order.
    pub fn places(&self) -> impl Iterator<Item = &Place> + '_ {
        self.places.values()
    }

    /// Number of registered places.
    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    /// The place at `(x, y)` on `layer`.
    pub fn place_at(&self, layer: LayerId, x: i32, y: i32) -> Option<PlaceId> {
        self.layer(layer)?.get(x, y)
    }

    /// A detached copy of `place` under a fresh id: same location and
    /// attributes, no links. Attach it with [`insert_place`](Self::insert_place).
    pub fn duplicate_place(&mut self, place: PlaceId) -> Result<Place, WorldError> {
        if !self.places.contains_key(&place) {
            return Err(WorldError::UnknownPlace { place });
        }
        let id = self.place_ids.allocate()?;
        let p = self.place(place).ok_or(WorldError::UnknownPlace { place })?;
        Ok(p.duplicate(id))
    }

    // ── Parent/child links ─────────────────────────────────────────

    /// Make `child` a child of `parent`. Connecting twice is a no-op.
    pub fn connect_child(&mut self, parent: PlaceId, child: PlaceId) -> Result<(), WorldError> {
        for place in [parent, child] {
            if !self.places.contains_key(&place) {
                return Err(WorldError::UnknownPlace { place });
            }
        }
        if let Some(p) = self.places.get_mut(&parent) {
            p.children.insert(child);
        }
        if let Some(c) = self.places.get_mut(&child) {
            c.parents.insert(parent);
        }
        Ok(())
    }

    /// Undo [`connect_child`](Self::connect_child); absent links are ignored.
    pub fn remove_child(&mut self, parent: PlaceId, child: PlaceId) {
        if let Some(p) = self.places.get_mut(&parent) {
            p.children.shift_remove(&child);
        }
        if let Some(c) = self.places.get_mut(&child) {
            c.parents.shift_remove(&parent);
        }
    }

    // ── Paths ──────────────────────────────────────────────────────

    /// Register `path`, presented by its endpoint `from`.
    ///
    /// If an identical path already joins the same endpoints its handle
    /// is returned and nothing is added.
    pub fn connect_path(&mut self, from: PlaceId, path: Path) -> Result<PathId, WorldError> {
        if !path.touches(from) {
            return Err(WorldError::NotAnEndpoint { place: from });
        }
        for end in path.ends() {
            if !self.places.contains_key(&end.place) {
                return Err(WorldError::UnknownPlace { place: end.place });
            }
        }
        if let Some(existing) = self.places[&from]
            .paths
            .iter()
            .copied()
            .find(|id| self.paths.get(id).is_some_and(|p| p.same_link(&path)))
        {
            return Ok(existing);
        }
        let id = self.path_ids.allocate()?;
        for end in path.ends() {
            if let Some(p) = self.places.get_mut(&end.place) {
                p.paths.insert(id);
            }
        }
        self.paths.insert(id, path);
        debug!(path = %id, from = %from, "connected path");
        Ok(id)
    }

    /// Build and register a path from `a` through `exit_a` to `b` through
    /// `exit_b`.
    pub fn connect(
        &mut self,
        a: PlaceId,
        exit_a: Exit,
        b: PlaceId,
        exit_b: Exit,
    ) -> Result<PathId, WorldError> {
        let path = Path::new(a, exit_a, b, exit_b)?;
        self.connect_path(a, path)
    }

    /// Remove a path from both endpoints and the arena.
    pub fn remove_path(&mut self, id: PathId) -> Result<Path, WorldError> {
        let path = self
            .paths
            .shift_remove(&id)
            .ok_or(WorldError::UnknownPath { path: id })?;
        for end in path.ends() {
            if let Some(p) = self.places.get_mut(&end.place) {
                p.paths.shift_remove(&id);
            }
        }
        debug!(path = %id, "removed path");
        Ok(path)
    }

    /// Sever every path and parent/child link of `place`.
    pub fn remove_connections(&mut self, place: PlaceId) -> Result<(), WorldError> {
        let p = self
            .places
            .get_mut(&place)
            .ok_or(WorldError::UnknownPlace { place })?;
        let paths: Vec<PathId> = p.paths.drain(..).collect();
        let children: Vec<PlaceId> = p.children.drain(..).collect();
        let parents: Vec<PlaceId> = p.parents.drain(..).collect();
        for id in paths {
            if let Some(path) = self.paths.shift_remove(&id) {
                for end in path.ends() {
                    if let Some(other) = self.places.get_mut(&end.place) {
                        other.paths.shift_remove(&id);
                    }
                }
            }
        }
        for child in children {
            if let Some(c) = self.places.get_mut(&child) {
                c.parents.shift_remove(&place);
            }
        }
        for parent in parents {
            if let Some(p) = self.places.get_mut(&parent) {
                p.children.shift_remove(&place);
            }
        }
        Ok(())
    }

    /// The path `id`.
    pub fn path(&self, id: PathId) -> Option<&Path> {
        self.paths.get(&id)
    }

    /// All paths with their handles.
    pub fn paths(&self) -> impl Iterator<Item = (PathId, &Path)> + '_ {
        self.paths.iter().map(|(&id, path)| (id, path))
    }

    // ── Exits and neighbours ───────────────────────────────────────

    /// The path leaving `place` through `exit`.
    pub fn path_at(&self, place: PlaceId, exit: Exit) -> Option<PathId> {
        self.place(place)?
            .paths
            .iter()
            .copied()
            .find(|id| self.paths.get(id).is_some_and(|p| p.uses(place, exit)))
    }

    /// Every `(exit, path)` pair leaving `place`. A path looping back onto
    /// the same place appears once per end.
    pub fn exits(&self, place: PlaceId) -> SmallVec<[(Exit, PathId); 8]> {
        let mut out = SmallVec::new();
        let Some(p) = self.place(place) else {
            return out;
        };
        for &id in &p.paths {
            if let Some(path) = self.paths.get(&id) {
                for end in path.ends() {
                    if end.place == place {
                        out.push((end.exit, id));
                    }
                }
            }
        }
        out
    }

    /// A path joining `a` and `b`, in either direction.
    pub fn path_between(&self, a: PlaceId, b: PlaceId) -> Option<PathId> {
        self.place(a)?.paths.iter().copied().find(|id| {
            self.paths
                .get(id)
                .is_some_and(|p| p.other_end(a).is_some_and(|e| e.place == b))
        })
    }

    /// Places in the eight grid cells around `place` on its layer.
    pub fn neighbors(&self, place: PlaceId) -> Result<Vec<PlaceId>, WorldError> {
        let loc = self
            .place(place)
            .ok_or(WorldError::UnknownPlace { place })?
            .location;
        let layer = self
            .layer(loc.layer)
            .ok_or(WorldError::UnknownLayer { layer: loc.layer })?;
        Ok(layer.neighbors(loc.x, loc.y, 1))
    }

    /// Connect `place` to each adjacent place whose facing exits are both
    /// free, returning the new paths.
    pub fn connect_neighbors(&mut self, place: PlaceId) -> Result<Vec<PathId>, WorldError> {
        let here = self
            .place(place)
            .ok_or(WorldError::UnknownPlace { place })?
            .location;
        let mut made = Vec::new();
        for other in self.neighbors(place)? {
            let Some(there) = self.place(other).map(|p| p.location) else {
                continue;
            };
            let Some(exit) = Exit::from_offset(there.x - here.x, there.y - here.y) else {
                continue;
            };
            let back = exit.opposite();
            if self.path_at(place, exit).is_some() || self.path_at(other, back).is_some() {
                continue;
            }
            made.push(self.connect(place, exit, other, back)?);
        }
        Ok(made)
    }

    // ── Areas ──────────────────────────────────────────────────────

    /// Register a new area.
    pub fn create_area(
        &mut self,
        name: impl Into<String>,
        color: Color,
    ) -> Result<AreaId, WorldError> {
        let id = self.area_ids.allocate()?;
        self.areas.insert(id, Area::new(name, color));
        debug!(area = %id, "created area");
        Ok(id)
    }

    pub(crate) fn adopt_area(&mut self, id: AreaId, area: Area) -> Result<(), WorldError> {
        self.area_ids.reserve(id)?;
        self.areas.insert(id, area);
        Ok(())
    }

    /// The area `id`.
    pub fn area(&self, id: AreaId) -> Option<&Area> {
        self.areas.get(&id)
    }

    /// All areas with their ids.
    pub fn areas(&self) -> impl Iterator<Item = (AreaId, &Area)> + '_ {
        self.areas.iter().map(|(&id, a)| (id, a))
    }

    fn find_area(&self, area: &Area) -> Option<AreaId> {
        self.areas.iter().find(|(_, a)| *a == area).map(|(&id, _)| id)
    }

    /// Delete an area, clearing it from every member place.
    pub fn remove_area(&mut self, id: AreaId) -> Result<Area, WorldError> {
        let area = self
            .areas
            .shift_remove(&id)
            .ok_or(WorldError::UnknownArea { area: id })?;
        for place in self.places.values_mut() {
            if place.area == Some(id) {
                place.area = None;
            }
        }
        Ok(area)
    }

    /// Set or clear a place's area.
    pub fn set_place_area(
        &mut self,
        place: PlaceId,
        area: Option<AreaId>,
    ) -> Result<(), WorldError> {
        if let Some(a) = area {
            if !self.areas.contains_key(&a) {
                return Err(WorldError::UnknownArea { area: a });
            }
        }
        self.places
            .get_mut(&place)
            .ok_or(WorldError::UnknownPlace { place })?
            .area = area;
        Ok(())
    }

    /// Places belonging to `area`.
    pub fn places_in_area(&self, area: AreaId) -> Vec<PlaceId> {
        self.places
            .values()
            .filter(|p| p.area == Some(area))
            .map(|p| p.id)
            .collect()
    }

    // ── Information rings ──────────────────────────────────────────

    /// Register a new information ring.
    pub fn create_ring(
        &mut self,
        description: impl Into<String>,
        color: Color,
    ) -> Result<RingId, WorldError> {
        let id = self.ring_ids.allocate()?;
        self.rings.insert(id, InfoRing::new(description, color));
        Ok(id)
    }

    pub(crate) fn adopt_ring(&mut self, id: RingId, ring: InfoRing) -> Result<(), WorldError> {
        self.ring_ids.reserve(id)?;
        self.rings.insert(id, ring);
        Ok(())
    }

    /// The ring `id`.
    pub fn ring(&self, id: RingId) -> Option<&InfoRing> {
        self.rings.get(&id)
    }

    /// All rings with their ids.
    pub fn rings(&self) -> impl Iterator<Item = (RingId, &InfoRing)> + '_ {
        self.rings.iter().map(|(&id, r)| (id, r))
    }

    fn find_ring(&self, ring: &InfoRing) -> Option<RingId> {
        self.rings.iter().find(|(_, r)| *r == ring).map(|(&id, _)| id)
    }

    /// Delete a ring, clearing it from every place that used it.
    pub fn remove_ring(&mut self, id: RingId) -> Result<InfoRing, WorldError> {
        let ring = self
            .rings
            .shift_remove(&id)
            .ok_or(WorldError::UnknownRing { ring: id })?;
        for place in self.places.values_mut() {
            if place.ring == Some(id) {
                place.ring = None;
            }
        }
        Ok(ring)
    }

    /// Set or clear a place's information ring.
    pub fn set_place_ring(
        &mut self,
        place: PlaceId,
        ring: Option<RingId>,
    ) -> Result<(), WorldError> {
        if let Some(r) = ring {
            if !self.rings.contains_key(&r) {
                return Err(WorldError::UnknownRing { ring: r });
            }
        }
        self.places
            .get_mut(&place)
            .ok_or(WorldError::UnknownPlace { place })?
            .ring = ring;
        Ok(())
    }

    // ── Names and home ─────────────────────────────────────────────

    /// Whether at most one place carries `name`.
    pub fn is_name_unique(&self, name: &str) -> bool {
        self.name_counts.get(name).copied().unwrap_or(0) <= 1
    }

    /// Whether a renderer should show `place`'s id under the current
    /// [`ShowPlaceId`] policy.
    pub fn shows_place_id(&self, place: PlaceId) -> bool {
        match self.settings.show_place_id {
            ShowPlaceId::None => false,
            ShowPlaceId::Always => true,
            ShowPlaceId::Unique => self
                .place(place)
                .is_some_and(|p| !self.is_name_unique(&p.name)),
        }
    }

    /// Set or clear the home location.
    pub fn set_home(&mut self, home: Option<Location>) {
        self.home = home;
    }

    /// The home location, if set.
    pub fn home(&self) -> Option<Location> {
        self.home
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const L1: LayerId = LayerId(1);

    fn world() -> WorldGraph {
        WorldGraph::new("test")
    }

    #[test]
    fn new_world_has_default_rings_and_no_layers() {
        let w = world();
        assert_eq!(w.rings().count(), InfoRing::defaults().len());
        assert_eq!(w.layers().count(), 0);
        assert_eq!(w.place_count(), 0);
    }

    #[test]
    fn create_place_creates_layer_lazily() {
        let mut w = world();
        let a = w.create_place("A", LayerId(4), 2, 3).unwrap();
        assert_eq!(w.place_at(LayerId(4), 2, 3), Some(a));
        assert!(w.layer(LayerId(4)).is_some());
        // The lazily created layer id is reserved.
        assert_eq!(w.create_layer().unwrap(), LayerId(5));
    }

    #[test]
    fn create_place_on_occupied_slot_fails_without_side_effects() {
        let mut w = world();
        w.create_place("A", L1, 0, 0).unwrap();
        let next = w.place_ids.peek();
        assert_eq!(
            w.create_place("B", L1, 0, 0),
            Err(WorldError::Space(SpaceError::PlaceNotInserted { x: 0, y: 0 }))
        );
        assert_eq!(w.place_ids.peek(), next);
        assert_eq!(w.place_count(), 1);
        assert!(w.is_name_unique("B"));
    }

    #[test]
    fn path_scenario_attaches_and_detaches_both_sides() {
        let mut w = world();
        let a = w.create_place("A", L1, 0, 0).unwrap();
        let b = w.create_place("B", L1, 0, 1).unwrap();
        let id = w.connect(a, Exit::North, b, Exit::South).unwrap();
        assert_eq!(w.place(a).unwrap().paths().collect::<Vec<_>>(), vec![id]);
        assert_eq!(w.place(b).unwrap().paths().collect::<Vec<_>>(), vec![id]);
        w.remove_path(id).unwrap();
        assert_eq!(w.place(a).unwrap().paths().count(), 0);
        assert_eq!(w.place(b).unwrap().paths().count(), 0);
        assert_eq!(w.remove_path(id), Err(WorldError::UnknownPath { path: id }));
    }

    #[test]
    fn identical_path_is_not_duplicated() {
        let mut w = world();
        let a = w.create_place("A", L1, 0, 0).unwrap();
        let b = w.create_place("B", L1, 1, 0).unwrap();
        let first = w.connect(a, Exit::East, b, Exit::West).unwrap();
        let again = w
            .connect_path(b, Path::new(b, Exit::West, a, Exit::East).unwrap())
            .unwrap();
        assert_eq!(first, again);
        assert_eq!(w.paths().count(), 1);
    }

    #[test]
    fn connect_path_validates_endpoints() {
        let mut w = world();
        let a = w.create_place("A", L1, 0, 0).unwrap();
        let b = w.create_place("B", L1, 1, 0).unwrap();
        let c = w.create_place("C", L1, 2, 0).unwrap();
        let path = Path::new(a, Exit::East, b, Exit::West).unwrap();
        assert_eq!(
            w.connect_path(c, path),
            Err(WorldError::NotAnEndpoint { place: c })
        );
        let ghost = PlaceId(99);
        let dangling = Path::new(a, Exit::North, ghost, Exit::South).unwrap();
        assert_eq!(
            w.connect_path(a, dangling),
            Err(WorldError::UnknownPlace { place: ghost })
        );
        assert_eq!(
            w.connect(a, Exit::Up, a, Exit::Up),
            Err(WorldError::SelfLoop {
                place: a,
                exit: Exit::Up
            })
        );
        assert_eq!(w.place(a).unwrap().paths().count(), 0);
    }

    #[test]
    fn self_connection_through_two_exits_lists_both() {
        let mut w = world();
        let a = w.create_place("Stairwell", L1, 0, 0).unwrap();
        let id = w.connect(a, Exit::Up, a, Exit::Down).unwrap();
        let exits = w.exits(a);
        assert_eq!(exits.as_slice(), &[(Exit::Up, id), (Exit::Down, id)]);
        w.remove_place(a).unwrap();
        assert_eq!(w.paths().count(), 0);
    }

    #[test]
    fn child_links_are_mirrored() {
        let mut w = world();
        let a = w.create_place("A", L1, 0, 0).unwrap();
        let b = w.create_place("B", L1, 1, 0).unwrap();
        w.connect_child(a, b).unwrap();
        w.connect_child(a, b).unwrap();
        assert_eq!(w.place(a).unwrap().children().collect::<Vec<_>>(), vec![b]);
        assert_eq!(w.place(b).unwrap().parents().collect::<Vec<_>>(), vec![a]);
        w.remove_child(a, b);
        w.remove_child(a, b);
        assert!(!w.place(a).unwrap().is_linked());
        assert!(!w.place(b).unwrap().is_linked());
        assert_eq!(
            w.connect_child(a, PlaceId(42)),
            Err(WorldError::UnknownPlace { place: PlaceId(42) })
        );
    }

    #[test]
    fn remove_place_cascades_only_links() {
        let mut w = world();
        let hub = w.create_place("Hub", L1, 0, 0).unwrap();
        let n = w.create_place("N", L1, 0, 1).unwrap();
        let s = w.create_place("S", L1, 0, -1).unwrap();
        let kid = w.create_place("Kid", L1, 5, 5).unwrap();
        w.connect(hub, Exit::North, n, Exit::South).unwrap();
        w.connect(hub, Exit::South, s, Exit::North).unwrap();
        w.connect_child(hub, kid).unwrap();
        w.connect_child(n, hub).unwrap();

        let removed = w.remove_place(hub).unwrap();
        assert_eq!(removed.id(), hub);
        assert!(!removed.is_linked());
        assert_eq!(w.place_at(L1, 0, 0), None);
        assert_eq!(w.place_count(), 3);
        assert_eq!(w.paths().count(), 0);
        for p in [n, s, kid] {
            assert!(!w.place(p).unwrap().is_linked(), "{p} still linked");
        }
    }

    #[test]
    fn remove_place_reports_registry_desync() {
        let mut w = world();
        let a = w.create_place("A", L1, 0, 0).unwrap();
        // Corrupt the registry so it disagrees with the layer.
        let bogus = Location::new(L1, 9, 9);
        w.places.get_mut(&a).unwrap().location = bogus;
        assert_eq!(
            w.remove_place(a),
            Err(WorldError::LocationMismatch {
                place: a,
                location: bogus
            })
        );
        assert!(w.place(a).is_some());
    }

    #[test]
    fn put_place_within_and_across_layers() {
        let mut w = world();
        let a = w.create_place("A", L1, 0, 0).unwrap();
        let b = w.create_place("B", L1, 1, 0).unwrap();
        w.put_place(a, L1, 0, 5).unwrap();
        assert_eq!(w.place(a).unwrap().location(), Location::new(L1, 0, 5));
        assert_eq!(w.place_at(L1, 0, 0), None);

        assert_eq!(
            w.put_place(a, L1, 1, 0),
            Err(WorldError::Space(SpaceError::PlaceNotInserted { x: 1, y: 0 }))
        );
        assert_eq!(w.place_at(L1, 0, 5), Some(a));

        let l2 = LayerId(2);
        w.put_place(a, l2, 7, 7).unwrap();
        assert_eq!(w.place_at(l2, 7, 7), Some(a));
        assert_eq!(w.place_at(L1, 0, 5), None);
        assert_eq!(w.layer_places(L1).unwrap(), vec![b]);
        assert_eq!(
            w.put_place(PlaceId(77), L1, 0, 0),
            Err(WorldError::UnknownPlace { place: PlaceId(77) })
        );
    }

    #[test]
    fn put_place_across_layers_rejects_out_of_range_target_in_place() {
        let config = WorldConfig {
            root_sizing: RootSizing::Fixed {
                center_x: 0,
                center_y: 0,
                half_extent: 8,
            },
            ..WorldConfig::default()
        };
        let mut w = WorldGraph::with_config(config).unwrap();
        let a = w.create_place("A", L1, 1, 1).unwrap();
        assert_eq!(
            w.put_place(a, LayerId(2), 100, 0),
            Err(WorldError::Space(SpaceError::InsertionFailure { x: 100, y: 0 }))
        );
        assert_eq!(w.place_at(L1, 1, 1), Some(a));
        assert_eq!(w.place(a).unwrap().location(), Location::new(L1, 1, 1));
    }

    #[test]
    fn duplicate_then_insert() {
        let mut w = world();
        let a = w.create_place("A", L1, 0, 0).unwrap();
        w.place_mut(a).unwrap().comment = "orig".into();
        let b = w.create_place("B", L1, 1, 0).unwrap();
        w.connect(a, Exit::East, b, Exit::West).unwrap();
        let copy = w.duplicate_place(a).unwrap();
        assert_ne!(copy.id(), a);
        assert_eq!(copy.location(), Location::new(L1, 0, 0));
        assert!(!copy.is_linked());
        let id = w.insert_place(copy, L1, 0, 1).unwrap();
        assert_eq!(w.place(id).unwrap().comment, "orig");
        assert!(!w.is_name_unique("A"));
    }

    #[test]
    fn insert_place_reserves_foreign_ids() {
        let mut w = world();
        let p = Place::new(PlaceId(50), "Loaded", Location::new(L1, 0, 0));
        w.insert_place(p.clone(), L1, 3, 3).unwrap();
        assert_eq!(
            w.insert_place(p, L1, 4, 4),
            Err(WorldError::DuplicatePlace { place: PlaceId(50) })
        );
        assert_eq!(w.create_place("Next", L1, 9, 9).unwrap(), PlaceId(51));
    }

    #[test]
    fn transfer_between_worlds_severs_source_links() {
        let mut src = world();
        let mut dst = world();
        let a = src.create_place("A", L1, 0, 0).unwrap();
        let b = src.create_place("B", L1, 1, 0).unwrap();
        src.connect(a, Exit::East, b, Exit::West).unwrap();
        src.set_place_ring(a, Some(RingId(2))).unwrap();

        let moved = dst.transfer_place_from(&mut src, a, L1, 10, 10).unwrap();
        assert_eq!(moved, a);
        assert!(src.place(a).is_none());
        assert!(!src.place(b).unwrap().is_linked());
        assert_eq!(dst.place_at(L1, 10, 10), Some(a));
        assert_eq!(dst.place(a).unwrap().ring(), Some(RingId(2)));
    }

    #[test]
    fn transfer_validates_target_before_detaching() {
        let mut src = world();
        let mut dst = world();
        let a = src.create_place("A", L1, 0, 0).unwrap();
        dst.create_place("Blocker", L1, 0, 0).unwrap();
        assert_eq!(
            dst.transfer_place_from(&mut src, a, L1, 0, 0),
            Err(WorldError::Space(SpaceError::PlaceNotInserted { x: 0, y: 0 }))
        );
        assert!(src.place(a).is_some());
    }

    #[test]
    fn transfer_renumbers_on_id_clash() {
        let mut src = world();
        let mut dst = world();
        let a = src.create_place("A", L1, 0, 0).unwrap();
        dst.create_place("Other", L1, 0, 0).unwrap();
        let moved = dst.transfer_place_from(&mut src, a, L1, 1, 0).unwrap();
        assert_ne!(moved, a);
        assert_eq!(dst.place(moved).unwrap().name(), "A");
    }

    #[test]
    fn connect_neighbors_uses_grid_offsets() {
        let mut w = world();
        let c = w.create_place("C", L1, 0, 0).unwrap();
        let n = w.create_place("N", L1, 0, 1).unwrap();
        let se = w.create_place("SE", L1, 1, -1).unwrap();
        let far = w.create_place("Far", L1, 3, 0).unwrap();
        w.connect(n, Exit::South, far, Exit::Up).unwrap();

        let made = w.connect_neighbors(c).unwrap();
        assert_eq!(made.len(), 1);
        let path = w.path(made[0]).unwrap();
        assert_eq!(path.exit_of(c), Some(Exit::SouthEast));
        assert_eq!(path.exit_of(se), Some(Exit::NorthWest));
        assert_eq!(w.path_between(c, n), None);
        assert_eq!(w.path_at(c, Exit::SouthEast), Some(made[0]));
        assert_eq!(w.neighbors(c).unwrap(), vec![n, se]);
    }

    #[test]
    fn removing_area_clears_members() {
        let mut w = world();
        let a = w.create_place("A", L1, 0, 0).unwrap();
        let town = w.create_area("Town", Color::rgb(10, 20, 30)).unwrap();
        w.set_place_area(a, Some(town)).unwrap();
        assert_eq!(w.places_in_area(town), vec![a]);
        assert_eq!(
            w.set_place_area(a, Some(AreaId(99))),
            Err(WorldError::UnknownArea { area: AreaId(99) })
        );
        w.remove_area(town).unwrap();
        assert_eq!(w.place(a).unwrap().area(), None);
        assert!(w.places_in_area(town).is_empty());
    }

    #[test]
    fn removing_ring_clears_members() {
        let mut w = world();
        let a = w.create_place("A", L1, 0, 0).unwrap();
        let r = w.create_ring("haunted", Color::rgb(1, 1, 1)).unwrap();
        w.set_place_ring(a, Some(r)).unwrap();
        assert_eq!(w.remove_ring(r).unwrap().description, "haunted");
        assert_eq!(w.place(a).unwrap().ring(), None);
        assert_eq!(w.remove_ring(r), Err(WorldError::UnknownRing { ring: r }));
    }

    #[test]
    fn show_place_id_policy() {
        let mut w = world();
        let a = w.create_place("Road", L1, 0, 0).unwrap();
        let u = w.create_place("Inn", L1, 1, 0).unwrap();
        assert!(!w.shows_place_id(a));
        w.create_place("Road", L1, 2, 0).unwrap();
        assert!(w.shows_place_id(a));
        assert!(!w.shows_place_id(u));

        let mut settings = w.settings().clone();
        settings.show_place_id = ShowPlaceId::Always;
        w.set_settings(settings).unwrap();
        assert!(w.shows_place_id(u));

        w.rename_place(a, "Lane").unwrap();
        assert!(w.is_name_unique("Road"));
        assert!(w.is_name_unique("Lane"));
    }

    #[test]
    fn layer_rename_and_home() {
        let mut w = world();
        let id = w.create_layer().unwrap();
        w.rename_layer(id, Some("Caves".into())).unwrap();
        assert_eq!(w.layer(id).unwrap().display_name(), "Caves");
        assert_eq!(
            w.rename_layer(LayerId(40), None),
            Err(WorldError::UnknownLayer { layer: LayerId(40) })
        );
        let home = Location::new(id, 3, 4);
        w.set_home(Some(home));
        assert_eq!(w.home(), Some(home));
    }

    #[test]
    fn duplicate_of_unknown_place_allocates_nothing() {
        let mut w = world();
        w.create_place("A", L1, 0, 0).unwrap();
        let next = w.place_ids.peek();
        assert_eq!(
            w.duplicate_place(PlaceId(50)),
            Err(WorldError::UnknownPlace { place: PlaceId(50) })
        );
        assert_eq!(w.place_ids.peek(), next);
    }

    #[test]
    fn failed_transfer_detach_allocates_nothing() {
        let mut src = world();
        src.create_place("A", L1, 0, 0).unwrap();
        src.create_place("B", L1, 1, 0).unwrap();
        let c = src.create_place("C", L1, 2, 0).unwrap();
        let bogus = Location::new(L1, 8, 8);
        src.places.get_mut(&c).unwrap().location = bogus;

        let mut dst = world();
        let next = dst.place_ids.peek();
        assert_eq!(
            dst.transfer_place_from(&mut src, c, L1, 0, 0),
            Err(WorldError::LocationMismatch {
                place: c,
                location: bogus
            })
        );
        assert_eq!(dst.place_ids.peek(), next);
        assert_eq!(dst.place_count(), 0);
        assert!(src.place(c).is_some());
    }

    #[test]
    fn cross_layer_move_onto_taken_slot_keeps_place_home() {
        let mut w = world();
        let l2 = LayerId(2);
        let a = w.create_place("A", L1, 0, 0).unwrap();
        w.create_place("B", l2, 3, 3).unwrap();
        assert_eq!(
            w.put_place(a, l2, 3, 3),
            Err(WorldError::Space(SpaceError::PlaceNotInserted { x: 3, y: 3 }))
        );
        assert_eq!(w.place_at(L1, 0, 0), Some(a));
        assert_eq!(w.place(a).unwrap().location(), Location::new(L1, 0, 0));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = WorldConfig {
            name: String::new(),
            ..WorldConfig::default()
        };
        assert!(matches!(
            WorldGraph::with_config(config),
            Err(WorldError::Config(_))
        ));
    }
}
