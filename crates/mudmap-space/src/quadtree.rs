//! Point-region quadtree over integer coordinates.
//!
//! The tree stores at most one value per coordinate. Internal nodes are
//! only synthesised where two entries would otherwise share a child
//! slot, and they are synthesised at the *smallest* aligned cell that
//! separates the entries, so a sparse map of far-apart rooms stays
//! shallow. Emptied nodes are pruned on removal.
//!
//! ```text
//! node (center c, half-extent h) covers (c - h, c + h] per axis
//! ┌──────────┬──────────┐
//! │ NW       │ NE       │   x > cx  → east half
//! │          │          │   y > cy  → north half
//! ├──────────c──────────┤
//! │ SW       │ SE       │   child center = c ± h/2
//! │          │          │   child half   = h/2
//! └──────────┴──────────┘
//! ```

use crate::error::SpaceError;
use crate::sizing::RootSizing;

/// One of the four child slots of a quadtree node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// `x <= cx`, `y > cy`.
    NorthWest,
    /// `x > cx`, `y > cy`.
    NorthEast,
    /// `x <= cx`, `y <= cy`.
    SouthWest,
    /// `x > cx`, `y <= cy`.
    SouthEast,
}

impl Quadrant {
    /// The quadrant of a node centered at `(cx, cy)` containing `(x, y)`.
    pub fn of(cx: i64, cy: i64, x: i64, y: i64) -> Self {
        match (x > cx, y > cy) {
            (false, true) => Self::NorthWest,
            (true, true) => Self::NorthEast,
            (false, false) => Self::SouthWest,
            (true, false) => Self::SouthEast,
        }
    }

    /// Slot index in `[NW, NE, SW, SE]` order.
    pub fn index(self) -> usize {
        match self {
            Self::NorthWest => 0,
            Self::NorthEast => 1,
            Self::SouthWest => 2,
            Self::SouthEast => 3,
        }
    }

    fn is_east(self) -> bool {
        matches!(self, Self::NorthEast | Self::SouthEast)
    }

    fn is_north(self) -> bool {
        matches!(self, Self::NorthWest | Self::NorthEast)
    }

    /// Center of this quadrant's cell within a node at `(cx, cy)` with
    /// half-extent `half`.
    fn child_center(self, cx: i64, cy: i64, half: i64) -> (i64, i64) {
        let step = half / 2;
        let x = if self.is_east() { cx + step } else { cx - step };
        let y = if self.is_north() { cy + step } else { cy - step };
        (x, y)
    }
}

#[derive(Clone, Debug)]
struct Leaf<T> {
    x: i32,
    y: i32,
    value: T,
}

#[derive(Clone, Debug, Default)]
enum Slot<T> {
    #[default]
    Empty,
    Leaf(Leaf<T>),
    Node(Box<Node<T>>),
}

#[derive(Clone, Debug)]
struct Node<T> {
    cx: i64,
    cy: i64,
    half: i64,
    slots: [Slot<T>; 4],
}

/// What an insertion should do with the slot it lands on.
enum Landing {
    Place,
    Split,
}

impl<T> Node<T> {
    fn new(cx: i64, cy: i64, half: i64) -> Self {
        Self {
            cx,
            cy,
            half,
            slots: [Slot::Empty, Slot::Empty, Slot::Empty, Slot::Empty],
        }
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        let (x, y) = (x as i64, y as i64);
        x > self.cx - self.half
            && x <= self.cx + self.half
            && y > self.cy - self.half
            && y <= self.cy + self.half
    }

    fn overlaps(&self, min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> bool {
        self.cx - self.half < max_x as i64
            && self.cx + self.half >= min_x as i64
            && self.cy - self.half < max_y as i64
            && self.cy + self.half >= min_y as i64
    }

    fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| matches!(s, Slot::Empty))
    }

    fn quadrant(&self, x: i32, y: i32) -> Quadrant {
        Quadrant::of(self.cx, self.cy, x as i64, y as i64)
    }

    /// Insert a leaf known to lie inside this node.
    ///
    /// On failure the leaf is handed back so callers can restore state.
    fn insert(&mut self, leaf: Leaf<T>) -> Result<(), (Leaf<T>, SpaceError)> {
        let q = self.quadrant(leaf.x, leaf.y);
        let i = q.index();
        let landing = match &mut self.slots[i] {
            Slot::Empty => Landing::Place,
            Slot::Node(child) if child.contains(leaf.x, leaf.y) => return child.insert(leaf),
            Slot::Leaf(existing) if existing.x == leaf.x && existing.y == leaf.y => {
                let err = SpaceError::Occupied {
                    x: leaf.x,
                    y: leaf.y,
                };
                return Err((leaf, err));
            }
            Slot::Leaf(_) | Slot::Node(_) => Landing::Split,
        };
        match landing {
            Landing::Place => {
                self.slots[i] = Slot::Leaf(leaf);
                Ok(())
            }
            Landing::Split => {
                let (ccx, ccy) = q.child_center(self.cx, self.cy, self.half);
                let existing = std::mem::take(&mut self.slots[i]);
                match split(ccx, ccy, self.half / 2, existing, leaf) {
                    Ok(node) => {
                        self.slots[i] = Slot::Node(Box::new(node));
                        Ok(())
                    }
                    Err((existing, leaf, err)) => {
                        self.slots[i] = existing;
                        Err((leaf, err))
                    }
                }
            }
        }
    }

    fn get(&self, x: i32, y: i32) -> Option<&T> {
        let mut node = self;
        loop {
            match &node.slots[node.quadrant(x, y).index()] {
                Slot::Empty => return None,
                Slot::Leaf(leaf) => {
                    return (leaf.x == x && leaf.y == y).then_some(&leaf.value);
                }
                Slot::Node(child) => {
                    if !child.contains(x, y) {
                        return None;
                    }
                    node = &**child;
                }
            }
        }
    }

    fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut T> {
        let i = self.quadrant(x, y).index();
        match &mut self.slots[i] {
            Slot::Empty => None,
            Slot::Leaf(leaf) => (leaf.x == x && leaf.y == y).then_some(&mut leaf.value),
            Slot::Node(child) => {
                if child.contains(x, y) {
                    child.get_mut(x, y)
                } else {
                    None
                }
            }
        }
    }

    fn remove_at(&mut self, x: i32, y: i32) -> Option<T> {
        let i = self.quadrant(x, y).index();
        let hit = match &self.slots[i] {
            Slot::Leaf(leaf) => leaf.x == x && leaf.y == y,
            _ => false,
        };
        if hit {
            return match std::mem::take(&mut self.slots[i]) {
                Slot::Leaf(leaf) => Some(leaf.value),
                other => {
                    self.slots[i] = other;
                    None
                }
            };
        }
        let Slot::Node(child) = &mut self.slots[i] else {
            return None;
        };
        if !child.contains(x, y) {
            return None;
        }
        let removed = child.remove_at(x, y);
        if removed.is_some() && child.is_empty() {
            self.slots[i] = Slot::Empty;
        }
        removed
    }

    fn remove_matching(&mut self, value: &T) -> usize
    where
        T: PartialEq,
    {
        let mut removed = 0;
        for slot in &mut self.slots {
            let prune = match slot {
                Slot::Empty => false,
                Slot::Leaf(leaf) => leaf.value == *value,
                Slot::Node(child) => {
                    let n = child.remove_matching(value);
                    removed += n;
                    n > 0 && child.is_empty()
                }
            };
            if prune {
                if matches!(slot, Slot::Leaf(_)) {
                    removed += 1;
                }
                *slot = Slot::Empty;
            }
        }
        removed
    }

    fn collect_rect<'a>(
        &'a self,
        min_x: i32,
        min_y: i32,
        max_x: i32,
        max_y: i32,
        out: &mut Vec<(i32, i32, &'a T)>,
    ) {
        for slot in &self.slots {
            match slot {
                Slot::Empty => {}
                Slot::Leaf(leaf) => {
                    if leaf.x >= min_x && leaf.x <= max_x && leaf.y >= min_y && leaf.y <= max_y {
                        out.push((leaf.x, leaf.y, &leaf.value));
                    }
                }
                Slot::Node(child) => {
                    if child.overlaps(min_x, min_y, max_x, max_y) {
                        child.collect_rect(min_x, min_y, max_x, max_y, out);
                    }
                }
            }
        }
    }

    fn node_count(&self) -> usize {
        1 + self
            .slots
            .iter()
            .map(|s| match s {
                Slot::Node(child) => child.node_count(),
                _ => 0,
            })
            .sum::<usize>()
    }

    fn depth(&self) -> usize {
        1 + self
            .slots
            .iter()
            .map(|s| match s {
                Slot::Node(child) => child.depth(),
                _ => 0,
            })
            .max()
            .unwrap_or(0)
    }
}

/// The point used to route an existing slot entry during a split.
///
/// For a node this is its center, which lies on the same side of every
/// enclosing aligned cell's center as the whole node does.
fn anchor<T>(slot: &Slot<T>) -> Option<(i64, i64, i64)> {
    match slot {
        Slot::Empty => None,
        Slot::Leaf(leaf) => Some((leaf.x as i64, leaf.y as i64, 0)),
        Slot::Node(node) => Some((node.cx, node.cy, node.half)),
    }
}

/// Build the smallest aligned node inside the cell `(cx, cy, half)` that
/// puts `existing` and `leaf` into different child slots.
///
/// Starting from the slot's full cell, the candidate is halved toward
/// the quadrant both entries share until they diverge.
#[allow(clippy::type_complexity)]
fn split<T>(
    mut cx: i64,
    mut cy: i64,
    mut half: i64,
    existing: Slot<T>,
    leaf: Leaf<T>,
) -> Result<Node<T>, (Slot<T>, Leaf<T>, SpaceError)> {
    let Some((ax, ay, existing_half)) = anchor(&existing) else {
        let mut node = Node::new(cx, cy, half);
        let i = node.quadrant(leaf.x, leaf.y).index();
        node.slots[i] = Slot::Leaf(leaf);
        return Ok(node);
    };
    let (lx, ly) = (leaf.x as i64, leaf.y as i64);
    loop {
        // A node entry must fit inside one child cell of the candidate.
        if half == 0 || half / 2 < existing_half {
            let err = SpaceError::InsertionFailure {
                x: leaf.x,
                y: leaf.y,
            };
            return Err((existing, leaf, err));
        }
        let qa = Quadrant::of(cx, cy, ax, ay);
        let qb = Quadrant::of(cx, cy, lx, ly);
        if qa != qb {
            tracing::trace!(cx, cy, half, x = leaf.x, y = leaf.y, "quadtree split");
            let mut node = Node::new(cx, cy, half);
            node.slots[qa.index()] = existing;
            node.slots[qb.index()] = Slot::Leaf(leaf);
            return Ok(node);
        }
        (cx, cy) = qa.child_center(cx, cy, half);
        half /= 2;
    }
}

/// Sparse map from integer `(x, y)` to values, backed by a PR-quadtree.
///
/// Lookups cost O(depth), where depth is bounded by
/// `log2(root half-extent)`. Each coordinate holds at most one value.
///
/// # Examples
///
/// ```
/// use mudmap_space::QuadTree;
///
/// let mut tree = QuadTree::new();
/// tree.insert('a', 0, 0).unwrap();
/// tree.insert('b', 5, 5).unwrap();
/// assert_eq!(tree.get(0, 0), Some(&'a'));
/// assert_eq!(tree.get(1, 1), None);
///
/// tree.remove(0, 0);
/// tree.remove(5, 5);
/// assert!(tree.is_empty());
/// assert_eq!(tree.node_count(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct QuadTree<T> {
    sizing: RootSizing,
    root: Option<Box<Node<T>>>,
    len: usize,
}

impl<T> QuadTree<T> {
    /// An empty auto-sizing tree.
    pub fn new() -> Self {
        Self {
            sizing: RootSizing::default(),
            root: None,
            len: 0,
        }
    }

    /// An empty tree with an explicit root sizing mode.
    ///
    /// A [`RootSizing::Fixed`] root is created immediately.
    pub fn with_sizing(sizing: RootSizing) -> Result<Self, SpaceError> {
        sizing.validate()?;
        let root = match sizing {
            RootSizing::Auto { .. } => None,
            RootSizing::Fixed {
                center_x,
                center_y,
                half_extent,
            } => Some(Box::new(Node::new(
                center_x as i64,
                center_y as i64,
                half_extent as i64,
            ))),
        };
        Ok(Self {
            sizing,
            root,
            len: 0,
        })
    }

    /// The sizing mode this tree was built with.
    pub fn sizing(&self) -> RootSizing {
        self.sizing
    }

    /// Root `(center_x, center_y, half_extent)`, if a root exists.
    pub fn root_geometry(&self) -> Option<(i32, i32, u32)> {
        self.root
            .as_ref()
            .map(|r| (r.cx as i32, r.cy as i32, r.half as u32))
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of internal nodes, root included.
    pub fn node_count(&self) -> usize {
        self.root.as_ref().map_or(0, |r| r.node_count())
    }

    /// Number of node levels on the deepest branch.
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, |r| r.depth())
    }

    /// The value stored at `(x, y)`.
    pub fn get(&self, x: i32, y: i32) -> Option<&T> {
        let root = self.root.as_ref()?;
        if !root.contains(x, y) {
            return None;
        }
        root.get(x, y)
    }

    /// Mutable access to the value stored at `(x, y)`.
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut T> {
        let root = self.root.as_mut()?;
        if !root.contains(x, y) {
            return None;
        }
        root.get_mut(x, y)
    }

    /// Whether `(x, y)` holds a value.
    pub fn exists(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some()
    }

    /// Whether `(x, y)` lies inside the root's range.
    ///
    /// Always true while an auto-sized tree has no root yet.
    pub fn in_range(&self, x: i32, y: i32) -> bool {
        self.root.as_ref().map_or(true, |r| r.contains(x, y))
    }

    /// Store `value` at `(x, y)`.
    ///
    /// Fails with [`SpaceError::Occupied`] if the coordinate already holds
    /// a value and with [`SpaceError::InsertionFailure`] if it lies
    /// outside the root's range.
    pub fn insert(&mut self, value: T, x: i32, y: i32) -> Result<(), SpaceError> {
        self.insert_leaf(Leaf { x, y, value }).map_err(|(_, err)| err)
    }

    fn insert_leaf(&mut self, leaf: Leaf<T>) -> Result<(), (Leaf<T>, SpaceError)> {
        let half = self.sizing.half_extent() as i64;
        let root = self
            .root
            .get_or_insert_with(|| Box::new(Node::new(leaf.x as i64, leaf.y as i64, half)));
        if !root.contains(leaf.x, leaf.y) {
            let err = SpaceError::InsertionFailure {
                x: leaf.x,
                y: leaf.y,
            };
            if root.is_empty() && matches!(self.sizing, RootSizing::Auto { .. }) {
                self.root = None;
            }
            return Err((leaf, err));
        }
        root.insert(leaf)?;
        self.len += 1;
        Ok(())
    }

    /// Remove and return the value at `(x, y)`; a no-op on an empty slot.
    pub fn remove(&mut self, x: i32, y: i32) -> Option<T> {
        let root = self.root.as_mut()?;
        if !root.contains(x, y) {
            return None;
        }
        let removed = root.remove_at(x, y);
        if removed.is_some() {
            self.len -= 1;
            self.release_empty_root();
        }
        removed
    }

    /// Remove every entry equal to `value`, returning how many went.
    ///
    /// Scans the whole tree.
    pub fn remove_value(&mut self, value: &T) -> usize
    where
        T: PartialEq,
    {
        let Some(root) = self.root.as_mut() else {
            return 0;
        };
        let removed = root.remove_matching(value);
        self.len -= removed;
        if removed > 0 {
            self.release_empty_root();
        }
        removed
    }

    /// Drop an emptied auto-sized root so the tree matches a fresh one.
    fn release_empty_root(&mut self) {
        let empty = self.root.as_ref().is_some_and(|r| r.is_empty());
        if empty && matches!(self.sizing, RootSizing::Auto { .. }) {
            self.root = None;
        }
    }

    /// Move the value at `(from_x, from_y)` to `(to_x, to_y)`.
    ///
    /// On insertion failure the value is put back at its source.
    pub fn relocate(
        &mut self,
        from_x: i32,
        from_y: i32,
        to_x: i32,
        to_y: i32,
    ) -> Result<(), SpaceError> {
        if !self.exists(from_x, from_y) {
            return Err(SpaceError::NothingAtSource {
                x: from_x,
                y: from_y,
            });
        }
        if (from_x, from_y) == (to_x, to_y) {
            return Ok(());
        }
        if self.exists(to_x, to_y) {
            return Err(SpaceError::Occupied { x: to_x, y: to_y });
        }
        let Some(value) = self.remove(from_x, from_y) else {
            return Err(SpaceError::NothingAtSource {
                x: from_x,
                y: from_y,
            });
        };
        if let Err((leaf, err)) = self.insert_leaf(Leaf {
            x: to_x,
            y: to_y,
            value,
        }) {
            self.insert_leaf(Leaf {
                x: from_x,
                y: from_y,
                value: leaf.value,
            })
            .map_err(|(_, restore_err)| restore_err)?;
            return Err(err);
        }
        Ok(())
    }

    /// Every stored value; order unspecified.
    pub fn values(&self) -> Vec<&T> {
        self.iter().map(|(_, _, v)| v).collect()
    }

    /// Whether any entry equals `value`. Scans the whole tree.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|(_, _, v)| v == value)
    }

    /// Entries inside the inclusive rectangle, visiting only the
    /// quadrants that overlap it.
    pub fn query_rect(
        &self,
        min_x: i32,
        min_y: i32,
        max_x: i32,
        max_y: i32,
    ) -> Vec<(i32, i32, &T)> {
        let mut out = Vec::new();
        if min_x > max_x || min_y > max_y {
            return out;
        }
        if let Some(root) = &self.root {
            if root.overlaps(min_x, min_y, max_x, max_y) {
                root.collect_rect(min_x, min_y, max_x, max_y, &mut out);
            }
        }
        out
    }

    /// Iterate over `(x, y, &value)` entries in tree order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            stack: self.root.iter().map(|r| r.slots.iter()).collect(),
            remaining: self.len,
        }
    }

    /// Structural audit used by the compliance helpers.
    #[cfg(test)]
    pub(crate) fn audit(&self) -> Result<(), String> {
        fn walk<T>(node: &Node<T>, is_root: bool, leaves: &mut usize) -> Result<(), String> {
            if !is_root && node.is_empty() {
                return Err(format!("empty non-root node at ({}, {})", node.cx, node.cy));
            }
            for (i, slot) in node.slots.iter().enumerate() {
                match slot {
                    Slot::Empty => {}
                    Slot::Leaf(leaf) => {
                        if !node.contains(leaf.x, leaf.y) {
                            return Err(format!("leaf ({}, {}) outside its node", leaf.x, leaf.y));
                        }
                        if node.quadrant(leaf.x, leaf.y).index() != i {
                            return Err(format!("leaf ({}, {}) in wrong slot", leaf.x, leaf.y));
                        }
                        *leaves += 1;
                    }
                    Slot::Node(child) => {
                        if child.half * 2 > node.half {
                            return Err(format!("child at ({}, {}) too large", child.cx, child.cy));
                        }
                        let corner_lo = (child.cx - child.half + 1, child.cy - child.half + 1);
                        let corner_hi = (child.cx + child.half, child.cy + child.half);
                        for (x, y) in [corner_lo, corner_hi] {
                            if Quadrant::of(node.cx, node.cy, x, y).index() != i {
                                return Err(format!(
                                    "child at ({}, {}) straddles its slot",
                                    child.cx, child.cy
                                ));
                            }
                        }
                        walk(child, false, leaves)?;
                    }
                }
            }
            Ok(())
        }
        let mut leaves = 0;
        if let Some(root) = &self.root {
            walk(root, true, &mut leaves)?;
        }
        if leaves != self.len {
            return Err(format!("len {} but {} leaves", self.len, leaves));
        }
        Ok(())
    }
}

impl<T> Default for QuadTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the entries of a [`QuadTree`], created by [`QuadTree::iter`].
pub struct Iter<'a, T> {
    stack: Vec<std::slice::Iter<'a, Slot<T>>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (i32, i32, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                None => {
                    self.stack.pop();
                }
                Some(Slot::Empty) => {}
                Some(Slot::Leaf(leaf)) => {
                    self.remaining = self.remaining.saturating_sub(1);
                    return Some((leaf.x, leaf.y, &leaf.value));
                }
                Some(Slot::Node(child)) => self.stack.push(child.slots.iter()),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> IntoIterator for &'a QuadTree<T> {
    type Item = (i32, i32, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn empty_tree_answers_nothing() {
        let tree: QuadTree<u32> = QuadTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.get(0, 0), None);
        assert!(!tree.exists(3, 3));
        assert!(tree.values().is_empty());
        assert_eq!(tree.node_count(), 0);
        assert_eq!(tree.root_geometry(), None);
    }

    #[test]
    fn first_insert_centers_auto_root() {
        let mut tree = QuadTree::new();
        tree.insert(1u32, -17, 42).unwrap();
        assert_eq!(tree.root_geometry(), Some((-17, 42, 1 << 30)));
        assert_eq!(tree.get(-17, 42), Some(&1));
    }

    #[test]
    fn two_points_get_separate_slots() {
        let mut tree = QuadTree::new();
        tree.insert("a", 0, 0).unwrap();
        tree.insert("b", 5, 5).unwrap();
        assert_eq!(tree.get(0, 0), Some(&"a"));
        assert_eq!(tree.get(5, 5), Some(&"b"));
        assert_eq!(tree.get(1, 1), None);
        compliance::assert_invariants(&tree);
    }

    #[test]
    fn colliding_slot_synthesises_minimal_node() {
        let mut tree = QuadTree::new();
        // Root at (0,0); both points land in the NE slot.
        tree.insert(0u8, 0, 0).unwrap();
        tree.insert(1u8, 1, 1).unwrap();
        tree.insert(2u8, 2, 1).unwrap();
        // (1,1) and (2,1) only differ on x by one: the separating node sits
        // deep in the tree rather than a chain of near-empty ancestors.
        assert!(tree.node_count() <= 3, "node_count = {}", tree.node_count());
        assert_eq!(tree.get(1, 1), Some(&1));
        assert_eq!(tree.get(2, 1), Some(&2));
        compliance::assert_invariants(&tree);
    }

    #[test]
    fn insert_next_to_compressed_node_splits_above_it() {
        let mut tree = QuadTree::new();
        tree.insert(0u8, 0, 0).unwrap();
        tree.insert(1u8, 1000, 1000).unwrap();
        tree.insert(2u8, 1001, 1000).unwrap();
        // Outside the compressed node around (1000..1001, 1000) but in the
        // same root quadrant.
        tree.insert(3u8, 3, 7).unwrap();
        tree.insert(4u8, 1_000_000, 5).unwrap();
        let points = [
            (0, 0, 0),
            (1, 1000, 1000),
            (2, 1001, 1000),
            (3, 3, 7),
            (4, 1_000_000, 5),
        ];
        for (v, x, y) in points {
            assert_eq!(tree.get(x, y), Some(&v));
        }
        compliance::assert_invariants(&tree);
    }

    #[test]
    fn occupied_coordinate_is_rejected() {
        let mut tree = QuadTree::new();
        tree.insert(1, 4, 4).unwrap();
        tree.insert(2, 0, 0).unwrap();
        assert_eq!(tree.insert(3, 4, 4), Err(SpaceError::Occupied { x: 4, y: 4 }));
        assert_eq!(tree.get(4, 4), Some(&1));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn out_of_range_insert_fails() {
        let mut tree = QuadTree::with_sizing(RootSizing::Fixed {
            center_x: 0,
            center_y: 0,
            half_extent: 8,
        })
        .unwrap();
        tree.insert('a', 8, -7).unwrap();
        assert_eq!(
            tree.insert('b', 9, 0),
            Err(SpaceError::InsertionFailure { x: 9, y: 0 })
        );
        assert_eq!(
            tree.insert('c', 0, -8),
            Err(SpaceError::InsertionFailure { x: 0, y: -8 })
        );
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn auto_root_covers_extreme_coordinates_near_first_point() {
        let mut tree = QuadTree::new();
        tree.insert(0, i32::MAX, i32::MIN).unwrap();
        tree.insert(1, i32::MAX - (1 << 29), i32::MIN + 12345).unwrap();
        assert_eq!(tree.get(i32::MAX, i32::MIN), Some(&0));
        assert!(tree.insert(2, 0, 0).is_err());
        compliance::assert_invariants(&tree);
    }

    #[test]
    fn failed_first_auto_insert_leaves_no_root() {
        let mut tree = QuadTree::new();
        tree.insert(0, 0, 0).unwrap();
        tree.remove(0, 0);
        assert_eq!(tree.node_count(), 0);
        tree.insert(1, i32::MIN, 0).unwrap();
        assert_eq!(tree.root_geometry().map(|g| g.0), Some(i32::MIN));
    }

    #[test]
    fn removing_absent_coordinate_is_noop() {
        let mut tree = QuadTree::new();
        assert_eq!(tree.remove(1, 1), None);
        tree.insert('x', 0, 0).unwrap();
        assert_eq!(tree.remove(1, 1), None);
        assert_eq!(tree.remove(i32::MIN, i32::MAX), None);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn removal_prunes_back_to_fresh_state() {
        let mut tree = QuadTree::new();
        let coords = [(0, 0), (1, 1), (2, 1), (-5, 3), (100, -100), (101, -100)];
        for (i, &(x, y)) in coords.iter().enumerate() {
            tree.insert(i, x, y).unwrap();
        }
        for &(x, y) in coords.iter().rev() {
            assert!(tree.remove(x, y).is_some());
            compliance::assert_invariants(&tree);
        }
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), QuadTree::<usize>::new().node_count());
    }

    #[test]
    fn fixed_root_survives_emptying() {
        let mut tree = QuadTree::with_sizing(RootSizing::centered(10, 10)).unwrap();
        assert_eq!(tree.node_count(), 1);
        tree.insert(1, 11, 10).unwrap();
        tree.insert(2, 12, 10).unwrap();
        tree.remove(11, 10);
        tree.remove(12, 10);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.root_geometry(), Some((10, 10, 1 << 30)));
    }

    #[test]
    fn remove_value_removes_every_copy() {
        let mut tree = QuadTree::new();
        tree.insert("dup", 0, 0).unwrap();
        tree.insert("dup", 9, 9).unwrap();
        tree.insert("keep", 9, 8).unwrap();
        assert_eq!(tree.remove_value(&"dup"), 2);
        assert_eq!(tree.remove_value(&"dup"), 0);
        assert_eq!(tree.values(), vec![&"keep"]);
        assert!(tree.contains(&"keep"));
        assert!(!tree.contains(&"dup"));
        compliance::assert_invariants(&tree);
    }

    #[test]
    fn relocate_moves_and_restores() {
        let mut tree = QuadTree::new();
        tree.insert('a', 0, 0).unwrap();
        tree.insert('b', 3, 3).unwrap();
        tree.relocate(0, 0, -4, 2).unwrap();
        assert_eq!(tree.get(-4, 2), Some(&'a'));
        assert_eq!(tree.get(0, 0), None);

        assert_eq!(
            tree.relocate(0, 0, 1, 1),
            Err(SpaceError::NothingAtSource { x: 0, y: 0 })
        );
        assert_eq!(
            tree.relocate(-4, 2, 3, 3),
            Err(SpaceError::Occupied { x: 3, y: 3 })
        );
        assert_eq!(tree.get(-4, 2), Some(&'a'));
        compliance::assert_invariants(&tree);
    }

    #[test]
    fn relocate_out_of_range_puts_value_back() {
        let mut tree = QuadTree::with_sizing(RootSizing::Fixed {
            center_x: 0,
            center_y: 0,
            half_extent: 4,
        })
        .unwrap();
        tree.insert('a', 1, 1).unwrap();
        assert_eq!(
            tree.relocate(1, 1, 50, 1),
            Err(SpaceError::InsertionFailure { x: 50, y: 1 })
        );
        assert_eq!(tree.get(1, 1), Some(&'a'));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn query_rect_returns_only_inside_points() {
        let mut tree = QuadTree::new();
        for x in -5..=5 {
            for y in -5..=5 {
                tree.insert((x, y), x * 3, y * 3).unwrap();
            }
        }
        let mut hits: Vec<_> = tree
            .query_rect(-3, 0, 6, 3)
            .into_iter()
            .map(|(x, y, _)| (x, y))
            .collect();
        hits.sort();
        assert_eq!(hits, vec![(-3, 0), (-3, 3), (0, 0), (0, 3), (3, 0), (3, 3), (6, 0), (6, 3)]);
        assert!(tree.query_rect(1, 1, 0, 0).is_empty());
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut tree = QuadTree::new();
        tree.insert(1, 2, 2).unwrap();
        *tree.get_mut(2, 2).unwrap() += 10;
        assert_eq!(tree.get(2, 2), Some(&11));
        assert!(tree.get_mut(2, 3).is_none());
    }

    #[test]
    fn iter_reports_exact_len() {
        let mut tree = QuadTree::new();
        for i in 0..20 {
            tree.insert(i, i * 7 - 50, 3 - i).unwrap();
        }
        let it = tree.iter();
        assert_eq!(it.len(), 20);
        let seen: HashSet<_> = (&tree).into_iter().map(|(_, _, v)| *v).collect();
        assert_eq!(seen.len(), 20);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn coords() -> impl Strategy<Value = Vec<(i32, i32)>> {
            proptest::collection::vec((-2000i32..2000, -2000i32..2000), 0..80)
        }

        proptest! {
            #[test]
            fn insert_then_values_round_trips(raw in coords()) {
                let mut expected = HashMap::new();
                let mut tree = QuadTree::new();
                for (i, (x, y)) in raw.into_iter().enumerate() {
                    if expected.contains_key(&(x, y)) {
                        continue;
                    }
                    tree.insert(i, x, y).unwrap();
                    expected.insert((x, y), i);
                }
                prop_assert_eq!(tree.len(), expected.len());
                let values: HashSet<usize> = tree.values().into_iter().copied().collect();
                let wanted: HashSet<usize> = expected.values().copied().collect();
                prop_assert_eq!(values, wanted);
                for (&(x, y), v) in &expected {
                    prop_assert_eq!(tree.get(x, y), Some(v));
                }
                prop_assert!(tree.audit().is_ok(), "{:?}", tree.audit());
            }

            #[test]
            fn insert_all_remove_all_leaves_no_nodes(
                raw in coords(),
                seed in any::<u64>(),
            ) {
                let mut tree = QuadTree::new();
                let mut placed = Vec::new();
                for (x, y) in raw {
                    if tree.insert((), x, y).is_ok() {
                        placed.push((x, y));
                    }
                }
                // Deterministic shuffle so removal order differs from insertion.
                let n = placed.len();
                for i in 0..n {
                    let j = (seed.wrapping_mul(i as u64 + 1) % n as u64) as usize;
                    placed.swap(i, j);
                }
                for (x, y) in placed {
                    prop_assert!(tree.remove(x, y).is_some());
                    prop_assert!(tree.audit().is_ok(), "{:?}", tree.audit());
                }
                prop_assert!(tree.is_empty());
                prop_assert_eq!(tree.node_count(), 0);
                prop_assert!(tree.values().is_empty());
            }

            #[test]
            fn query_rect_matches_linear_scan(
                raw in coords(),
                (x0, y0, w, h) in (-2000i32..2000, -2000i32..2000, 0i32..600, 0i32..600),
            ) {
                let mut tree = QuadTree::new();
                for (x, y) in raw {
                    let _ = tree.insert((x, y), x, y);
                }
                let (x1, y1) = (x0 + w, y0 + h);
                let mut fast: Vec<_> = tree
                    .query_rect(x0, y0, x1, y1)
                    .into_iter()
                    .map(|(_, _, v)| *v)
                    .collect();
                let mut slow: Vec<_> = tree
                    .iter()
                    .filter(|(x, y, _)| *x >= x0 && *x <= x1 && *y >= y0 && *y <= y1)
                    .map(|(_, _, v)| *v)
                    .collect();
                fast.sort();
                slow.sort();
                prop_assert_eq!(fast, slow);
            }
        }
    }
}
