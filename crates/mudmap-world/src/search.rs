//! Breadth-first search over path edges.

use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};
use mudmap_core::PlaceId;

use crate::world::WorldGraph;

impl WorldGraph {
    /// Places reachable from `place` in one step along a path.
    pub fn path_neighbors(&self, place: PlaceId) -> impl Iterator<Item = PlaceId> + '_ {
        self.place(place)
            .into_iter()
            .flat_map(|p| p.paths())
            .filter_map(move |id| self.path(id)?.other_end(place))
            .map(|end| end.place)
    }

    /// Whether `end` is reachable from `start` along paths.
    ///
    /// Returns `Some(end)` when reached. Parent/child links are not
    /// followed.
    pub fn breadth_search(&self, start: PlaceId, end: PlaceId) -> Option<PlaceId> {
        self.place(start)?;
        let mut visited = IndexSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            if current == end {
                return Some(end);
            }
            for next in self.path_neighbors(current) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        None
    }

    /// A hop-shortest route from `start` to `end`, both included.
    pub fn shortest_route(&self, start: PlaceId, end: PlaceId) -> Option<Vec<PlaceId>> {
        self.place(start)?;
        let mut came_from: IndexMap<PlaceId, Option<PlaceId>> = IndexMap::from([(start, None)]);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            if current == end {
                let mut route = vec![end];
                let mut at = end;
                while let Some(&Some(prev)) = came_from.get(&at) {
                    route.push(prev);
                    at = prev;
                }
                route.reverse();
                return Some(route);
            }
            for next in self.path_neighbors(current) {
                if !came_from.contains_key(&next) {
                    came_from.insert(next, Some(current));
                    queue.push_back(next);
                }
            }
        }
        None
    }
}
