//! Copy, cut and paste of place selections.
//!
//! A selection is stored relative to an anchor location, so it can be
//! pasted with the anchor landing on any slot. A copy snapshots detached
//! duplicates and can be pasted any number of times; a cut records the
//! original places and moves them on its single paste.

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use mudmap_core::{Exit, LayerId, Location, PlaceId};
use mudmap_space::{GridLayer, SpaceError};

use crate::error::WorldError;
use crate::place::Place;
use crate::world::WorldGraph;

/// A selected place and its offset from the anchor.
#[derive(Clone, Debug)]
struct Member<P> {
    item: P,
    dx: i32,
    dy: i32,
}

#[derive(Clone, Debug)]
enum Content {
    Copy {
        members: Vec<Member<Place>>,
        paths: Vec<(PlaceId, Exit, PlaceId, Exit)>,
        children: Vec<(PlaceId, PlaceId)>,
    },
    Cut {
        members: Vec<Member<PlaceId>>,
    },
    Consumed,
}

/// Holds one copied or cut selection.
///
/// # Examples
///
/// ```
/// use mudmap_core::{LayerId, Location};
/// use mudmap_world::{Clipboard, WorldGraph};
///
/// let mut world = WorldGraph::new("w");
/// let l = LayerId(1);
/// let a = world.create_place("A", l, 0, 0).unwrap();
///
/// let mut clip = Clipboard::copy(&world, &[a], Location::new(l, 0, 0)).unwrap();
/// let pasted = clip.paste(&mut world, l, 10, 0).unwrap();
/// assert_eq!(world.place_at(l, 10, 0), Some(pasted[0]));
/// assert_eq!(world.place_at(l, 0, 0), Some(a));
/// ```
#[derive(Clone, Debug)]
pub struct Clipboard {
    content: Content,
}

fn offset(place: PlaceId, at: Location, anchor: Location) -> Result<(i32, i32), WorldError> {
    let out = || WorldError::PasteOutOfRange { place };
    let dx = at.x.checked_sub(anchor.x).ok_or_else(out)?;
    let dy = at.y.checked_sub(anchor.y).ok_or_else(out)?;
    Ok((dx, dy))
}

fn target(
    place: PlaceId,
    layer: LayerId,
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
) -> Result<Location, WorldError> {
    let out = || WorldError::PasteOutOfRange { place };
    let tx = x.checked_add(dx).ok_or_else(out)?;
    let ty = y.checked_add(dy).ok_or_else(out)?;
    Ok(Location::new(layer, tx, ty))
}

/// Check `slots` against `world`'s layer; places in `movers` count as
/// absent. Two members landing on one slot block the paste.
fn check_slots(
    world: &WorldGraph,
    layer: LayerId,
    slots: &[Location],
    movers: &IndexSet<PlaceId>,
) -> Result<(), WorldError> {
    let scratch;
    let grid = match world.layer(layer) {
        Some(grid) => grid,
        None => {
            scratch = GridLayer::with_sizing(layer, world.root_sizing())?;
            &scratch
        }
    };
    let mut claimed = IndexSet::with_capacity(slots.len());
    for &slot in slots {
        if !claimed.insert((slot.x, slot.y)) {
            return Err(WorldError::PasteBlocked { location: slot });
        }
        let mover = grid.get(slot.x, slot.y).filter(|held| movers.contains(held));
        match grid.check_put(slot.x, slot.y, mover) {
            Ok(()) => {}
            Err(SpaceError::PlaceNotInserted { .. }) => {
                return Err(WorldError::PasteBlocked { location: slot })
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

impl Clipboard {
    /// Snapshot `places` as detached duplicates, keeping the paths and
    /// child links that run strictly between them.
    pub fn copy(
        world: &WorldGraph,
        places: &[PlaceId],
        anchor: Location,
    ) -> Result<Self, WorldError> {
        let selected: IndexSet<PlaceId> = places.iter().copied().collect();
        let mut members = Vec::with_capacity(selected.len());
        let mut children = Vec::new();
        for &id in &selected {
            let p = world.place(id).ok_or(WorldError::UnknownPlace { place: id })?;
            let (dx, dy) = offset(id, p.location(), anchor)?;
            members.push(Member {
                item: p.duplicate(id),
                dx,
                dy,
            });
            children.extend(
                p.children()
                    .filter(|c| selected.contains(c))
                    .map(|c| (id, c)),
            );
        }
        let paths = world
            .paths()
            .filter_map(|(_, path)| {
                let [a, b] = path.ends();
                (selected.contains(&a.place) && selected.contains(&b.place))
                    .then_some((a.place, a.exit, b.place, b.exit))
            })
            .collect();
        Ok(Self {
            content: Content::Copy {
                members,
                paths,
                children,
            },
        })
    }

    /// Record `places` for a later move.
    pub fn cut(
        world: &WorldGraph,
        places: &[PlaceId],
        anchor: Location,
    ) -> Result<Self, WorldError> {
        let selected: IndexSet<PlaceId> = places.iter().copied().collect();
        let mut members = Vec::with_capacity(selected.len());
        for &id in &selected {
            let p = world.place(id).ok_or(WorldError::UnknownPlace { place: id })?;
            let (dx, dy) = offset(id, p.location(), anchor)?;
            members.push(Member { item: id, dx, dy });
        }
        Ok(Self {
            content: Content::Cut { members },
        })
    }

    /// Whether this clipboard holds a cut selection.
    pub fn is_cut(&self) -> bool {
        matches!(self.content, Content::Cut { .. })
    }

    /// Whether a cut has already been pasted.
    pub fn is_consumed(&self) -> bool {
        matches!(self.content, Content::Consumed)
    }

    /// Number of places in the selection.
    pub fn len(&self) -> usize {
        match &self.content {
            Content::Copy { members, .. } => members.len(),
            Content::Cut { members } => members.len(),
            Content::Consumed => 0,
        }
    }

    /// Whether the selection is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Destination slots with the anchor at `(x, y)` on `layer`.
    fn targets(
        &self,
        layer: LayerId,
        x: i32,
        y: i32,
    ) -> Result<Vec<(PlaceId, Location)>, WorldError> {
        match &self.content {
            Content::Copy { members, .. } => members
                .iter()
                .map(|m| Ok((m.item.id(), target(m.item.id(), layer, x, y, m.dx, m.dy)?)))
                .collect(),
            Content::Cut { members } => members
                .iter()
                .map(|m| Ok((m.item, target(m.item, layer, x, y, m.dx, m.dy)?)))
                .collect(),
            Content::Consumed => Err(WorldError::ClipboardConsumed),
        }
    }

    fn check_paste(
        &self,
        world: &WorldGraph,
        layer: LayerId,
        x: i32,
        y: i32,
    ) -> Result<(), WorldError> {
        let targets = self.targets(layer, x, y)?;
        let movers = match &self.content {
            Content::Cut { members } => {
                for m in members {
                    if world.place(m.item).is_none() {
                        return Err(WorldError::UnknownPlace { place: m.item });
                    }
                }
                members.iter().map(|m| m.item).collect()
            }
            _ => IndexSet::new(),
        };
        let slots: Vec<Location> = targets.into_iter().map(|(_, loc)| loc).collect();
        check_slots(world, layer, &slots, &movers)
    }

    /// Whether pasting with the anchor at `(x, y)` on `layer` would
    /// succeed. For a cut, slots held by the selection itself count as
    /// free.
    pub fn can_paste(&self, world: &WorldGraph, layer: LayerId, x: i32, y: i32) -> bool {
        self.check_paste(world, layer, x, y).is_ok()
    }

    /// Paste with the anchor at `(x, y)` on `layer`, returning the ids of
    /// the pasted places in selection order.
    ///
    /// Every destination is checked before anything changes. A copy
    /// inserts fresh duplicates and relinks them among themselves; a cut
    /// moves the original places and is consumed.
    pub fn paste(
        &mut self,
        world: &mut WorldGraph,
        layer: LayerId,
        x: i32,
        y: i32,
    ) -> Result<Vec<PlaceId>, WorldError> {
        self.check_paste(world, layer, x, y)?;
        let targets = self.targets(layer, x, y)?;
        let pasted: Vec<PlaceId> = match &self.content {
            Content::Copy {
                members,
                paths,
                children,
            } => {
                let mut renamed: IndexMap<PlaceId, PlaceId> = IndexMap::new();
                for (member, (_, at)) in members.iter().zip(&targets) {
                    let fresh = world.place_ids.allocate()?;
                    let copy = member.item.duplicate(fresh);
                    let id = world.insert_place(copy, layer, at.x, at.y)?;
                    renamed.insert(member.item.id(), id);
                }
                for &(a, exit_a, b, exit_b) in paths {
                    if let (Some(&na), Some(&nb)) = (renamed.get(&a), renamed.get(&b)) {
                        world.connect(na, exit_a, nb, exit_b)?;
                    }
                }
                for &(parent, child) in children {
                    if let (Some(&np), Some(&nc)) = (renamed.get(&parent), renamed.get(&child)) {
                        world.connect_child(np, nc)?;
                    }
                }
                renamed.into_values().collect()
            }
            Content::Cut { .. } => {
                let (sx, sy) = targets
                    .first()
                    .and_then(|&(id, to)| Some((world.place(id)?.location(), to)))
                    .map(|(from, to)| {
                        let sign = |a: i32, b: i32| (b as i64 - a as i64).signum();
                        (sign(from.x, to.x), sign(from.y, to.y))
                    })
                    .unwrap_or((0, 0));
                let mut order: Vec<(PlaceId, Location)> = targets.clone();
                order.sort_by(|(_, a), (_, b)| {
                    let by_x = if sx > 0 { b.x.cmp(&a.x) } else { a.x.cmp(&b.x) };
                    let by_y = if sy > 0 { b.y.cmp(&a.y) } else { a.y.cmp(&b.y) };
                    by_x.then(by_y)
                });
                for (id, at) in order {
                    world.put_place(id, layer, at.x, at.y)?;
                }
                targets.iter().map(|(id, _)| *id).collect()
            }
            Content::Consumed => return Err(WorldError::ClipboardConsumed),
        };
        if self.is_cut() {
            self.content = Content::Consumed;
        }
        debug!(count = pasted.len(), layer = %layer, x, y, "pasted selection");
        Ok(pasted)
    }

    /// Paste a cut selection from `source` into `target`, moving each
    /// place across worlds. Links are severed as for any cross-world
    /// move. Returns the ids the places received in `target`.
    pub fn paste_across(
        &mut self,
        source: &mut WorldGraph,
        target_world: &mut WorldGraph,
        layer: LayerId,
        x: i32,
        y: i32,
    ) -> Result<Vec<PlaceId>, WorldError> {
        let Content::Cut { members } = &self.content else {
            if self.is_consumed() {
                return Err(WorldError::ClipboardConsumed);
            }
            return Err(WorldError::ClipboardMode {
                expected: "cut selection",
            });
        };
        for m in members {
            if source.place(m.item).is_none() {
                return Err(WorldError::UnknownPlace { place: m.item });
            }
        }
        let targets = self.targets(layer, x, y)?;
        let slots: Vec<Location> = targets.iter().map(|(_, loc)| *loc).collect();
        check_slots(target_world, layer, &slots, &IndexSet::new())?;
        let mut moved = Vec::with_capacity(targets.len());
        for (id, at) in targets {
            moved.push(target_world.transfer_place_from(source, id, layer, at.x, at.y)?);
        }
        self.content = Content::Consumed;
        debug!(count = moved.len(), layer = %layer, "pasted selection across worlds");
        Ok(moved)
    }
}
