use std::collections::HashMap;

use super::error::SpatialHashError;
use crate::units::*;

pub type ParticleIndex = u32;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

struct GridProperties {
    cell_size: Real,
    cell_size_inv: Real,
}
impl GridProperties {
    #[inline]
    fn position_to_cellpos(&self, position: Point) -> CellPos {
        CellPos {
            x: (position.x * self.cell_size_inv).floor() as i32,
            y: (position.y * self.cell_size_inv).floor() as i32,
            z: (position.z * self.cell_size_inv).floor() as i32,
        }
    }
}

/// Unbounded uniform grid, mapping cells to the particles inside them.
///
/// Unlike a sorted cell list this is updated incrementally: a particle only touches the hash map
/// when it crosses a cell border.
pub struct SpatialHash {
    grid: GridProperties,
    cells: HashMap<CellPos, Vec<ParticleIndex>>,
    particle_cells: HashMap<ParticleIndex, CellPos>, // last known cell of every registered particle
}

impl SpatialHash {
    /// * cell_size: Edge length of a cell. Queries are cheapest if this is close to the query radius.
    pub fn new(cell_size: Real) -> SpatialHash {
        assert!(cell_size > 0.0, "cell size needs to be positive");
        SpatialHash {
            grid: GridProperties {
                cell_size,
                cell_size_inv: 1.0 / cell_size,
            },
            cells: HashMap::new(),
            particle_cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> Real {
        self.grid.cell_size
    }

    pub fn cell_at(&self, position: Point) -> CellPos {
        self.grid.position_to_cellpos(position)
    }

    pub fn cell_of(&self, pidx: ParticleIndex) -> Option<CellPos> {
        self.particle_cells.get(&pidx).copied()
    }

    pub fn len(&self) -> usize {
        self.particle_cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particle_cells.is_empty()
    }

    pub fn num_occupied_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.particle_cells.clear();
    }

    pub fn insert(&mut self, position: Point, pidx: ParticleIndex) -> Result<(), SpatialHashError> {
        if self.particle_cells.contains_key(&pidx) {
            return Err(SpatialHashError::AlreadyInserted(pidx));
        }
        let cell = self.grid.position_to_cellpos(position);
        self.cells.entry(cell).or_default().push(pidx);
        self.particle_cells.insert(pidx, cell);
        Ok(())
    }

    /// Moves a particle to the cell of its new position.
    ///
    /// Particles that were never inserted are inserted.
    pub fn update_position(&mut self, position: Point, pidx: ParticleIndex) {
        let new_cell = self.grid.position_to_cellpos(position);
        match self.particle_cells.insert(pidx, new_cell) {
            Some(old_cell) if old_cell == new_cell => return,
            Some(old_cell) => self.remove_from_cell(old_cell, pidx),
            None => (),
        }
        self.cells.entry(new_cell).or_default().push(pidx);
    }

    /// Returns true if the particle was registered.
    pub fn remove(&mut self, pidx: ParticleIndex) -> bool {
        match self.particle_cells.remove(&pidx) {
            Some(cell) => {
                self.remove_from_cell(cell, pidx);
                true
            }
            None => false,
        }
    }

    fn remove_from_cell(&mut self, cell: CellPos, pidx: ParticleIndex) {
        if let Some(bucket) = self.cells.get_mut(&cell) {
            if let Some(slot) = bucket.iter().position(|&p| p == pidx) {
                bucket.swap_remove(slot);
            }
            if bucket.is_empty() {
                self.cells.remove(&cell);
            }
        }
    }

    /// Calls `f` for every particle in a cell that overlaps the cube `position ± radius`.
    ///
    /// Includes all particles within `radius` but may report more. Order is unspecified.
    #[inline]
    pub fn foreach_potential_neighbor(&self, position: Point, radius: Real, mut f: impl FnMut(ParticleIndex)) {
        let extent = Vector::new(radius, radius, radius);
        let min = self.grid.position_to_cellpos(position - extent);
        let max = self.grid.position_to_cellpos(position + extent);

        for z in min.z..=max.z {
            for y in min.y..=max.y {
                for x in min.x..=max.x {
                    if let Some(bucket) = self.cells.get(&CellPos { x, y, z }) {
                        for &pidx in bucket {
                            f(pidx);
                        }
                    }
                }
            }
        }
    }

    pub fn query_neighbors(&self, position: Point, radius: Real) -> Vec<ParticleIndex> {
        let mut neighbors = Vec::new();
        self.foreach_potential_neighbor(position, radius, |pidx| neighbors.push(pidx));
        neighbors
    }
}
