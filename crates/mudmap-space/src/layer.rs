//! One map level: a quadtree of place ids plus bookkeeping.

use crate::error::SpaceError;
use crate::extent::Extent;
use crate::quadtree::QuadTree;
use crate::sizing::RootSizing;
use indexmap::IndexMap;
use mudmap_core::{LayerId, Location, PlaceId};

/// A single map layer holding places at integer coordinates.
///
/// Each coordinate holds at most one place and each place occupies at
/// most one coordinate. The layer keeps a running bounding box that grows
/// on every insertion and never shrinks; [`scan_extent`](Self::scan_extent)
/// recomputes the tight box on demand.
///
/// # Examples
///
/// ```
/// use mudmap_core::{LayerId, PlaceId};
/// use mudmap_space::GridLayer;
///
/// let mut layer = GridLayer::new(LayerId(1));
/// layer.put(PlaceId(1), 0, 0).unwrap();
/// layer.put(PlaceId(2), 5, 5).unwrap();
///
/// assert_eq!(layer.get(0, 0), Some(PlaceId(1)));
/// assert!(layer.neighbors(0, 0, 1).is_empty());
/// assert_eq!(layer.neighbors(5, 5, 5), vec![PlaceId(1)]);
/// ```
#[derive(Clone, Debug)]
pub struct GridLayer {
    id: LayerId,
    name: Option<String>,
    index: QuadTree<PlaceId>,
    positions: IndexMap<PlaceId, (i32, i32)>,
    extent: Option<Extent>,
}

impl GridLayer {
    /// An empty layer with an auto-sized index.
    pub fn new(id: LayerId) -> Self {
        Self {
            id,
            name: None,
            index: QuadTree::new(),
            positions: IndexMap::new(),
            extent: None,
        }
    }

    /// An empty layer whose index root uses `sizing`.
    pub fn with_sizing(id: LayerId, sizing: RootSizing) -> Result<Self, SpaceError> {
        Ok(Self {
            index: QuadTree::with_sizing(sizing)?,
            ..Self::new(id)
        })
    }

    /// This layer's id.
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// The explicit display name, if one was set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set or clear the display name.
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// The display name, falling back to `"Map {id}"`.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("Map {}", self.id),
        }
    }

    // ── Placement ──────────────────────────────────────────────

    /// Store `place` at `(x, y)`, moving it if it already sits elsewhere
    /// on this layer.
    ///
    /// Putting a place onto its own slot is a no-op. If the move fails the
    /// place stays at its prior slot.
    pub fn put(&mut self, place: PlaceId, x: i32, y: i32) -> Result<(), SpaceError> {
        match self.index.get(x, y) {
            Some(&held) if held == place => return Ok(()),
            Some(_) => return Err(SpaceError::PlaceNotInserted { x, y }),
            None => {}
        }
        match self.positions.get(&place).copied() {
            Some((px, py)) => self.index.relocate(px, py, x, y)?,
            None => self.index.insert(place, x, y)?,
        }
        self.positions.insert(place, (x, y));
        match &mut self.extent {
            Some(extent) => extent.include(x, y),
            None => self.extent = Some(Extent::point(x, y)),
        }
        Ok(())
    }

    /// Check that [`put`](Self::put) would accept a place at `(x, y)`
    /// without changing anything.
    ///
    /// `mover` is the place being moved, if any; its own slot counts as
    /// free.
    pub fn check_put(&self, x: i32, y: i32, mover: Option<PlaceId>) -> Result<(), SpaceError> {
        match self.index.get(x, y) {
            Some(&held) if Some(held) == mover => Ok(()),
            Some(_) => Err(SpaceError::PlaceNotInserted { x, y }),
            None if !self.index.in_range(x, y) => Err(SpaceError::InsertionFailure { x, y }),
            None => Ok(()),
        }
    }

    /// Remove `place` from the slot named by `at`.
    ///
    /// The location must address this layer and hold exactly `place`.
    pub fn remove(&mut self, place: PlaceId, at: Location) -> Result<(), SpaceError> {
        if at.layer != self.id {
            return Err(SpaceError::LayerMismatch {
                expected: self.id,
                found: at.layer,
            });
        }
        match self.index.get(at.x, at.y) {
            None => return Err(SpaceError::NotFound { location: at }),
            Some(&found) if found != place => {
                return Err(SpaceError::LocationMismatch {
                    location: at,
                    expected: place,
                    found,
                })
            }
            Some(_) => {}
        }
        self.index.remove(at.x, at.y);
        self.positions.shift_remove(&place);
        Ok(())
    }

    /// Remove `place` wherever it sits, returning its former coordinate.
    pub fn take(&mut self, place: PlaceId) -> Option<(i32, i32)> {
        let (x, y) = self.positions.shift_remove(&place)?;
        self.index.remove(x, y);
        Some((x, y))
    }

    // ── Queries ────────────────────────────────────────────────

    /// The place at `(x, y)`.
    pub fn get(&self, x: i32, y: i32) -> Option<PlaceId> {
        self.index.get(x, y).copied()
    }

    /// Whether `(x, y)` holds a place.
    pub fn exists(&self, x: i32, y: i32) -> bool {
        self.index.exists(x, y)
    }

    /// Whether the layer holds no places.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of places on the layer.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Coordinate of `place`, if it is on this layer.
    pub fn position_of(&self, place: PlaceId) -> Option<(i32, i32)> {
        self.positions.get(&place).copied()
    }

    /// Whether `place` is on this layer.
    pub fn contains_place(&self, place: PlaceId) -> bool {
        self.positions.contains_key(&place)
    }

    /// Places and their coordinates in insertion order.
    pub fn places(&self) -> impl Iterator<Item = (PlaceId, i32, i32)> + '_ {
        self.positions.iter().map(|(&id, &(x, y))| (id, x, y))
    }

    /// Places within Chebyshev distance `distance` of `(x, y)`, excluding
    /// the center, ordered by `(x, y)`.
    pub fn neighbors(&self, x: i32, y: i32, distance: u32) -> Vec<PlaceId> {
        let clamp = |v: i64| v.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
        let d = distance as i64;
        let (cx, cy) = (x as i64, y as i64);
        let mut hits = self.index.query_rect(
            clamp(cx - d),
            clamp(cy - d),
            clamp(cx + d),
            clamp(cy + d),
        );
        hits.retain(|&(hx, hy, _)| (hx, hy) != (x, y));
        hits.sort_unstable_by_key(|&(hx, hy, _)| (hx, hy));
        hits.into_iter().map(|(_, _, &id)| id).collect()
    }

    /// The running bounding box; `None` until the first insertion.
    pub fn extent(&self) -> Option<Extent> {
        self.extent
    }

    /// The tight bounding box of the places currently on the layer.
    pub fn scan_extent(&self) -> Option<Extent> {
        Extent::covering(self.positions.values().copied())
    }

    /// Index root center, used as a sizing hint when persisting.
    pub fn center_hint(&self) -> Option<(i32, i32)> {
        self.index.root_geometry().map(|(x, y, _)| (x, y))
    }

    /// The underlying index.
    pub fn index(&self) -> &QuadTree<PlaceId> {
        &self.index
    }
}
