//! Pathfinding trait and default A* implementation.
//!
//! # Pluggability
//!
//! Behaviors reach pathfinding through [`SpatialWorld::find_path`], which
//! uses [`AStarPathfinder`].  Code that needs a different search (weighted
//! terrain, flow fields) can implement [`Pathfinder`] and call it directly.
//!
//! # Heuristic
//!
//! Steps cost 1 and move along the world's 4-neighbor adjacency.  The
//! heuristic is [`SpatialWorld::distance`]: Manhattan distance taking the
//! short way around each axis on a torus.  Plain Manhattan would overestimate
//! across a wrap edge and A* could return a longer path.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use dd_core::Coordinate;

use crate::error::{SpaceError, SpaceResult};
use crate::world::SpatialWorld;

const UNREACHED: u32 = u32::MAX;

// ── Path ──────────────────────────────────────────────────────────────────────

/// The result of a path query: the cells to step through in order, not
/// including the start and ending at the goal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    pub steps: Vec<Coordinate>,
}

impl Path {
    /// `true` if start and goal were the same cell.
    pub fn is_trivial(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The first cell to move to.
    pub fn next_step(&self) -> Option<Coordinate> {
        self.steps.first().copied()
    }

    pub fn goal(&self) -> Option<Coordinate> {
        self.steps.last().copied()
    }
}

impl IntoIterator for Path {
    type Item = Coordinate;
    type IntoIter = std::vec::IntoIter<Coordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

// ── Pathfinder trait ──────────────────────────────────────────────────────────

pub trait Pathfinder {
    /// Shortest path from `start` to `goal` through cells where `passable`
    /// holds (the start cell is never tested).
    ///
    /// `OutOfBounds` if either end is off the grid; `NoPath` if the goal
    /// cannot be reached.  `start == goal` is an empty path, not an error.
    fn find_path(
        &self,
        world: &SpatialWorld,
        start: Coordinate,
        goal: Coordinate,
        passable: &dyn Fn(Coordinate) -> bool,
    ) -> SpaceResult<Path>;
}

// ── AStarPathfinder ───────────────────────────────────────────────────────────

pub struct AStarPathfinder;

impl Pathfinder for AStarPathfinder {
    fn find_path(
        &self,
        world: &SpatialWorld,
        start: Coordinate,
        goal: Coordinate,
        passable: &dyn Fn(Coordinate) -> bool,
    ) -> SpaceResult<Path> {
        astar(world, start, goal, passable)
    }
}

fn astar(
    world: &SpatialWorld,
    start: Coordinate,
    goal: Coordinate,
    passable: &dyn Fn(Coordinate) -> bool,
) -> SpaceResult<Path> {
    let from = world.cell_index(start)?;
    let to = world.cell_index(goal)?;
    if from == to {
        return Ok(Path::default());
    }

    let n = world.cell_count();
    let mut g = vec![UNREACHED; n];
    let mut prev = vec![UNREACHED; n];
    g[from] = 0;

    // Min-heap on (f, h, cell).  Preferring smaller h among equal f pushes
    // toward the goal; the cell index makes ties deterministic.
    let mut heap: BinaryHeap<Reverse<(u32, u32, usize)>> = BinaryHeap::new();
    let h0 = world.distance(start, goal);
    heap.push(Reverse((h0, h0, from)));

    while let Some(Reverse((f, h, cell))) = heap.pop() {
        if cell == to {
            return Ok(reconstruct(world, &prev, from, to));
        }

        let cost = f - h;
        // Stale entry.
        if cost > g[cell] {
            continue;
        }

        for next in world.adjacent_indices(cell) {
            let new_cost = cost + 1;
            if new_cost >= g[next] {
                continue;
            }
            let c = world.coordinate_at(next);
            if !passable(c) {
                continue;
            }
            g[next] = new_cost;
            prev[next] = cell as u32;
            let h = world.distance(c, goal);
            heap.push(Reverse((new_cost + h, h, next)));
        }
    }

    Err(SpaceError::NoPath { from: start, to: goal })
}

fn reconstruct(world: &SpatialWorld, prev: &[u32], from: usize, to: usize) -> Path {
    let mut steps = Vec::new();
    let mut cur = to;
    while cur != from {
        steps.push(world.coordinate_at(cur));
        cur = prev[cur] as usize;
    }
    steps.reverse();
    Path { steps }
}
