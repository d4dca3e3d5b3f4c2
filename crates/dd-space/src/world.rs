//! The grid world.
//!
//! # Data layout
//!
//! Cells live in a `Vec<Cell>` in row-major order: the cell at `(x, y)` has
//! index `y * width + x`.  Cells are created once by [`SpatialWorld::build`]
//! and never destroyed.
//!
//! 4-neighbor adjacency is precomputed in **CSR** form.  The neighbors of
//! cell `i` are
//!
//! ```text
//! adj_to[ adj_start[i] .. adj_start[i+1] ]
//! ```
//!
//! On a torus the wrap edges are included.  Duplicate edges (a width-2
//! torus reaches the same cell going left or right) and self-loops (a
//! width-1 torus) are dropped.  The A* inner loop is a contiguous scan.
//!
//! # Occupant index
//!
//! `index` maps every placed occupant to its coordinate.  The world keeps it
//! and the cells in lockstep: an occupant is in the index iff it is in
//! exactly one cell, and that cell's coordinate is the indexed one.  The
//! index is only ever used for lookups, never iterated for results, so its
//! hasher cannot affect determinism.

use serde::{Deserialize, Serialize};

use dd_core::{Coordinate, SimRng};

use crate::cell::{Cell, Locatable, Occupant, OccupantKind};
use crate::error::{SpaceError, SpaceResult};
use crate::pathfinding::{AStarPathfinder, Path, Pathfinder};

#[cfg(feature = "fx-hash")]
type OccupantIndex = rustc_hash::FxHashMap<Occupant, Coordinate>;
#[cfg(not(feature = "fx-hash"))]
type OccupantIndex = std::collections::HashMap<Occupant, Coordinate>;

/// Up, right, down, left.
const VON_NEUMANN: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Row by row, top-left first.
const MOORE: [(i32, i32); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum Neighborhood {
    /// The 4 orthogonal neighbors.  This is the world's graph adjacency.
    #[default]
    VonNeumann,
    /// The 8 surrounding cells.
    Moore,
}

/// Serializable summary of the world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WorldState {
    pub width: i32,
    pub height: i32,
    pub torus: bool,
    pub occupants: usize,
    pub occupied_cells: usize,
}

// ── SpatialWorld ──────────────────────────────────────────────────────────────

pub struct SpatialWorld {
    width: i32,
    height: i32,
    torus: bool,

    cells: Vec<Cell>,

    // ── CSR adjacency ─────────────────────────────────────────────────────
    /// Length = `cell_count + 1`.
    adj_start: Vec<u32>,
    adj_to: Vec<u32>,

    index: OccupantIndex,
}

impl SpatialWorld {
    /// Build a `width × height` grid.  `InvalidDimensions` unless both are
    /// positive.
    pub fn build(width: i32, height: i32, torus: bool) -> SpaceResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(SpaceError::InvalidDimensions { width, height });
        }

        let count = width as usize * height as usize;
        let mut cells = Vec::with_capacity(count);
        for y in 0..height {
            for x in 0..width {
                cells.push(Cell::new(Coordinate::new(x, y)));
            }
        }

        let mut world = Self {
            width,
            height,
            torus,
            cells,
            adj_start: Vec::with_capacity(count + 1),
            adj_to: Vec::with_capacity(count * 4),
            index: OccupantIndex::default(),
        };

        for i in 0..count {
            world.adj_start.push(world.adj_to.len() as u32);
            let here = world.cells[i].coordinate();
            for c in world.offset_cells(here, &VON_NEUMANN) {
                let n = world.raw_index(c) as u32;
                world.adj_to.push(n);
            }
        }
        world.adj_start.push(world.adj_to.len() as u32);

        Ok(world)
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn is_torus(&self) -> bool {
        self.torus
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of occupants currently placed.
    #[inline]
    pub fn occupant_count(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn in_bounds(&self, c: Coordinate) -> bool {
        c.x >= 0 && c.y >= 0 && c.x < self.width && c.y < self.height
    }

    fn check_bounds(&self, c: Coordinate) -> SpaceResult<()> {
        if self.in_bounds(c) {
            Ok(())
        } else {
            Err(SpaceError::OutOfBounds { coordinate: c, width: self.width, height: self.height })
        }
    }

    #[inline]
    fn raw_index(&self, c: Coordinate) -> usize {
        c.y as usize * self.width as usize + c.x as usize
    }

    /// Row-major index of `c`.
    pub fn cell_index(&self, c: Coordinate) -> SpaceResult<usize> {
        self.check_bounds(c)?;
        Ok(self.raw_index(c))
    }

    /// Coordinate of the cell at row-major index `i`.
    ///
    /// # Panics
    /// Panics if `i >= cell_count()`.
    #[inline]
    pub fn coordinate_at(&self, i: usize) -> Coordinate {
        self.cells[i].coordinate()
    }

    /// Every coordinate in row-major order.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.cells.iter().map(Cell::coordinate)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    // ── Placement ─────────────────────────────────────────────────────────

    /// Put `occupant` in the cell at `c`.
    ///
    /// `OutOfBounds` if `c` is off the grid, `AlreadyPlaced` if the occupant
    /// is already somewhere in the world.  The caller is responsible for the
    /// entity's own position field; prefer [`place_entity`](Self::place_entity)
    /// when the entity is at hand.
    pub fn place(&mut self, occupant: Occupant, c: Coordinate) -> SpaceResult<()> {
        self.check_bounds(c)?;
        if let Some(&at) = self.index.get(&occupant) {
            return Err(SpaceError::AlreadyPlaced { occupant, at });
        }
        let i = self.raw_index(c);
        self.cells[i].insert(occupant);
        self.index.insert(occupant, c);
        Ok(())
    }

    /// Place `entity` at `c` and record `c` as its position.
    pub fn place_entity<E: Locatable + ?Sized>(
        &mut self,
        entity: &mut E,
        c: Coordinate,
    ) -> SpaceResult<()> {
        self.place(entity.occupant(), c)?;
        entity.set_position(c);
        Ok(())
    }

    /// Remove `occupant` from the world, returning where it was.
    pub fn remove_by_id(&mut self, occupant: Occupant) -> SpaceResult<Coordinate> {
        let c = self.index.remove(&occupant).ok_or(SpaceError::NotFound(occupant))?;
        let i = self.raw_index(c);
        let removed = self.cells[i].remove(occupant);
        debug_assert!(removed, "index pointed {occupant} at {c} but the cell did not hold it");
        Ok(c)
    }

    /// Remove `entity` using its own identity.  The world's index is
    /// authoritative; the entity's recorded position is not consulted.
    pub fn remove_by_reference<E: Locatable + ?Sized>(&mut self, entity: &E) -> SpaceResult<Coordinate> {
        self.remove_by_id(entity.occupant())
    }

    /// Move `occupant` to `to`, returning its previous coordinate.  Nothing
    /// changes if `to` is out of bounds or the occupant is unknown.
    pub fn relocate(&mut self, occupant: Occupant, to: Coordinate) -> SpaceResult<Coordinate> {
        self.check_bounds(to)?;
        let from = self.remove_by_id(occupant)?;
        let i = self.raw_index(to);
        self.cells[i].insert(occupant);
        self.index.insert(occupant, to);
        Ok(from)
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn cell_at(&self, c: Coordinate) -> SpaceResult<&Cell> {
        let i = self.cell_index(c)?;
        Ok(&self.cells[i])
    }

    /// The cell currently holding `occupant`.
    pub fn cell_of_id(&self, occupant: Occupant) -> SpaceResult<&Cell> {
        let c = self.position_of(occupant).ok_or(SpaceError::NotFound(occupant))?;
        Ok(&self.cells[self.raw_index(c)])
    }

    #[inline]
    pub fn position_of(&self, occupant: Occupant) -> Option<Coordinate> {
        self.index.get(&occupant).copied()
    }

    #[inline]
    pub fn contains(&self, occupant: Occupant) -> bool {
        self.index.contains_key(&occupant)
    }

    /// Occupants of the cell at `c` in arrival order.
    pub fn contents(&self, c: Coordinate) -> SpaceResult<&[Occupant]> {
        Ok(self.cell_at(c)?.occupants())
    }

    /// Every occupant of `kind`, cells in row-major order and arrival order
    /// within a cell.
    pub fn contents_of_kind(&self, kind: OccupantKind) -> impl Iterator<Item = Occupant> + '_ {
        self.cells
            .iter()
            .flat_map(|cell| cell.occupants().iter().copied())
            .filter(move |o| o.kind() == kind)
    }

    // ── Neighborhoods ─────────────────────────────────────────────────────

    /// In-bounds cells at the given offsets from `c`, wrapped on a torus.
    /// No duplicates, never `c` itself.
    fn offset_cells(&self, c: Coordinate, offsets: &[(i32, i32)]) -> Vec<Coordinate> {
        let mut out: Vec<Coordinate> = Vec::with_capacity(offsets.len());
        for &(dx, dy) in offsets {
            let mut n = c.offset(dx, dy);
            if self.torus {
                n = Coordinate::new(n.x.rem_euclid(self.width), n.y.rem_euclid(self.height));
            } else if !self.in_bounds(n) {
                continue;
            }
            if n != c && !out.contains(&n) {
                out.push(n);
            }
        }
        out
    }

    /// Neighbors of `c`.  Von Neumann order is up, right, down, left; Moore
    /// order is row by row.  Wrapped on a torus, clipped otherwise.
    pub fn neighbors(&self, c: Coordinate, hood: Neighborhood) -> SpaceResult<Vec<Coordinate>> {
        let i = self.cell_index(c)?;
        Ok(match hood {
            Neighborhood::VonNeumann => self.adjacent_indices(i).map(|n| self.coordinate_at(n)).collect(),
            Neighborhood::Moore => self.offset_cells(c, &MOORE),
        })
    }

    /// The neighbor cells themselves, in [`neighbors`](Self::neighbors) order.
    pub fn nearby_cells(&self, c: Coordinate, hood: Neighborhood) -> SpaceResult<Vec<&Cell>> {
        let coords = self.neighbors(c, hood)?;
        Ok(coords.into_iter().map(|n| &self.cells[self.raw_index(n)]).collect())
    }

    /// CSR scan of the 4-neighbors of cell index `i`.
    #[inline]
    pub(crate) fn adjacent_indices(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        let start = self.adj_start[i] as usize;
        let end = self.adj_start[i + 1] as usize;
        self.adj_to[start..end].iter().map(|&n| n as usize)
    }

    /// `true` if `b` is among the neighbors of `a`.
    pub fn is_neighbor(&self, a: Coordinate, b: Coordinate, hood: Neighborhood) -> bool {
        if !self.in_bounds(a) || !self.in_bounds(b) || a == b {
            return false;
        }
        let dx = self.axis_distance(a.x, b.x, self.width);
        let dy = self.axis_distance(a.y, b.y, self.height);
        match hood {
            Neighborhood::VonNeumann => dx + dy == 1,
            Neighborhood::Moore => dx <= 1 && dy <= 1,
        }
    }

    #[inline]
    fn axis_distance(&self, a: i32, b: i32, extent: i32) -> u32 {
        let d = a.abs_diff(b);
        if self.torus { d.min(extent as u32 - d) } else { d }
    }

    /// Manhattan distance, taking the short way around on a torus.  Never
    /// overestimates the number of 4-neighbor steps between two cells.
    pub fn distance(&self, a: Coordinate, b: Coordinate) -> u32 {
        self.axis_distance(a.x, b.x, self.width) + self.axis_distance(a.y, b.y, self.height)
    }

    // ── Paths ─────────────────────────────────────────────────────────────

    /// Shortest 4-neighbor path from `start` to `goal`.
    pub fn find_path(&self, start: Coordinate, goal: Coordinate) -> SpaceResult<Path> {
        AStarPathfinder.find_path(self, start, goal, &|_| true)
    }

    /// Like [`find_path`](Self::find_path), but only through cells for which
    /// `passable` holds.  The start cell is always allowed.
    pub fn find_path_where<F>(&self, start: Coordinate, goal: Coordinate, passable: F) -> SpaceResult<Path>
    where
        F: Fn(Coordinate) -> bool,
    {
        AStarPathfinder.find_path(self, start, goal, &passable)
    }

    // ── Randomness ────────────────────────────────────────────────────────

    /// A uniformly chosen coordinate.  One RNG draw.
    pub fn random_cell(&self, rng: &mut SimRng) -> Coordinate {
        let i = rng.gen_range(0..self.cells.len());
        self.coordinate_at(i)
    }

    // ── Snapshots & checks ────────────────────────────────────────────────

    pub fn state(&self) -> WorldState {
        WorldState {
            width: self.width,
            height: self.height,
            torus: self.torus,
            occupants: self.index.len(),
            occupied_cells: self.cells.iter().filter(|c| !c.is_empty()).count(),
        }
    }

    /// Verify the index and the cells agree: every indexed occupant appears
    /// exactly once, in the cell at its indexed coordinate, and nowhere else.
    pub fn is_consistent(&self) -> bool {
        let in_cells: usize = self.cells.iter().map(Cell::len).sum();
        if in_cells != self.index.len() {
            return false;
        }
        self.index.iter().all(|(occupant, &c)| {
            self.in_bounds(c)
                && self.cells[self.raw_index(c)]
                    .occupants()
                    .iter()
                    .filter(|o| *o == occupant)
                    .count()
                    == 1
        })
    }
}
