//! Cell-list neighbor search for periodic rectangular boxes.
//!
//! The box is split into cells no narrower than the cutoff, so every pair
//! inside the cutoff sits in the same or an adjacent (wrapped) cell. Which of
//! those candidates are kept is left to the injected [`PairInclusion`].

use nalgebra::Vector3;
use tracing::debug;

use super::inclusion::{PairCandidate, PairInclusion};
use crate::error::{PimcError, Result};
use crate::potential::PairPotentialTable;
use crate::space::Boundary;
use crate::system::SimBox;

/// A pair accepted into the neighbor list. `i < j`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborPair {
    pub i: usize,
    pub j: usize,
    /// Shift to add to atom `j`'s position to reach the minimum image.
    pub offset: Vector3<f64>,
}

pub struct CellNeighborSearch<P: PairInclusion> {
    inclusion: P,
    cutoff: f64,
    n_cells: [usize; 3],
    /// Distinct neighbor cells (including the cell itself) for each cell.
    stencil: Vec<Vec<usize>>,
    cell_atoms: Vec<Vec<usize>>,
    pairs: Vec<NeighborPair>,
}

impl<P: PairInclusion> CellNeighborSearch<P> {
    /// Set up the cell grid for `boundary`.
    ///
    /// Fails for open boundaries and for cutoffs longer than half the box.
    pub fn new(cutoff: f64, inclusion: P, boundary: &Boundary) -> Result<Self> {
        let mut search = Self {
            inclusion,
            cutoff,
            n_cells: [1; 3],
            stencil: Vec::new(),
            cell_atoms: Vec::new(),
            pairs: Vec::new(),
        };
        search.reset_geometry(boundary)?;
        Ok(search)
    }

    /// Rebuild the cell grid after the box shape changed.
    pub fn reset_geometry(&mut self, boundary: &Boundary) -> Result<()> {
        let dimensions = boundary.dimensions().ok_or_else(|| {
            PimcError::Neighbor("cell lists require a periodic boundary".to_string())
        })?;
        if !(self.cutoff > 0.0) {
            return Err(PimcError::Neighbor(format!("cutoff must be positive, got {}", self.cutoff)));
        }
        let shortest = dimensions.min();
        if self.cutoff > 0.5 * shortest {
            return Err(PimcError::Neighbor(format!(
                "cutoff {} exceeds half the shortest box edge {}",
                self.cutoff, shortest
            )));
        }

        for axis in 0..3 {
            self.n_cells[axis] = ((dimensions[axis] / self.cutoff).floor() as usize).max(1);
        }
        let total = self.n_cells.iter().product::<usize>();
        self.stencil = (0..total).map(|c| self.neighbor_cells(c)).collect();
        self.cell_atoms = vec![Vec::new(); total];
        debug!(n_cells = ?self.n_cells, cutoff = self.cutoff, "cell grid configured");
        Ok(())
    }

    fn cell_coordinates(&self, cell: usize) -> [usize; 3] {
        let [nx, ny, _] = self.n_cells;
        [cell % nx, (cell / nx) % ny, cell / (nx * ny)]
    }

    fn cell_index(&self, coords: [usize; 3]) -> usize {
        let [nx, ny, _] = self.n_cells;
        coords[0] + nx * (coords[1] + ny * coords[2])
    }

    fn neighbor_cells(&self, cell: usize) -> Vec<usize> {
        let center = self.cell_coordinates(cell);
        let mut cells = Vec::with_capacity(27);
        for dz in -1i64..=1 {
            for dy in -1i64..=1 {
                for dx in -1i64..=1 {
                    let mut coords = [0usize; 3];
                    for (axis, delta) in [dx, dy, dz].into_iter().enumerate() {
                        let n = self.n_cells[axis] as i64;
                        coords[axis] = (center[axis] as i64 + delta).rem_euclid(n) as usize;
                    }
                    cells.push(self.cell_index(coords));
                }
            }
        }
        cells.sort_unstable();
        cells.dedup();
        cells
    }

    /// Bin the atoms and collect every pair accepted by the inclusion strategy.
    ///
    /// Returns the number of pairs in the rebuilt list.
    pub fn rebuild(&mut self, sim_box: &SimBox, potentials: &PairPotentialTable) -> usize {
        let boundary = sim_box.boundary();
        for cell in self.cell_atoms.iter_mut() {
            cell.clear();
        }
        for atom in sim_box.atoms() {
            let fraction = boundary.wrapped_fraction(&atom.position).unwrap_or_else(Vector3::zeros);
            let mut coords = [0usize; 3];
            for axis in 0..3 {
                let n = self.n_cells[axis];
                coords[axis] = ((fraction[axis] * n as f64) as usize).min(n - 1);
            }
            let cell = self.cell_index(coords);
            self.cell_atoms[cell].push(atom.leaf_index);
        }

        let cutoff2 = self.cutoff * self.cutoff;
        self.pairs.clear();
        for (cell, neighbors) in self.stencil.iter().enumerate() {
            for &i in &self.cell_atoms[cell] {
                let atom_i = sim_box.atom(i);
                for &other in neighbors {
                    for &j in &self.cell_atoms[other] {
                        if j <= i {
                            continue;
                        }
                        let atom_j = sim_box.atom(j);
                        let dr = atom_j.position - atom_i.position;
                        let offset = boundary.nearest_image(&dr) - dr;
                        let candidate = PairCandidate { i, j, atom_i, atom_j, offset: &offset };
                        let row = potentials.row(atom_i.atom_type);
                        if self.inclusion.check_pair(&candidate, cutoff2, row) > 0 {
                            self.pairs.push(NeighborPair { i, j, offset });
                        }
                    }
                }
            }
        }
        debug!(pairs = self.pairs.len(), "neighbor list rebuilt");
        self.pairs.len()
    }

    pub fn pairs(&self) -> &[NeighborPair] {
        &self.pairs
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn n_cells(&self) -> [usize; 3] {
        self.n_cells
    }

    pub fn inclusion(&self) -> &P {
        &self.inclusion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighbor::{CutoffInclusion, PathIntegralInclusion};
    use crate::potential::P2LennardJones;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeSet;
    use std::rc::Rc;

    fn lj_table() -> PairPotentialTable {
        let mut table = PairPotentialTable::new(1);
        table.set(0, 0, Rc::new(P2LennardJones::new(1.0, 1.0)));
        table
    }

    fn random_box(n_molecules: usize, n_beads: usize, length: f64, seed: u64) -> SimBox {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut sim_box = SimBox::ring_polymers(n_molecules, n_beads, Boundary::cubic(length));
        for i in 0..sim_box.len() {
            let r = Vector3::new(
                rng.gen_range(-0.5..0.5) * length,
                rng.gen_range(-0.5..0.5) * length,
                rng.gen_range(-0.5..0.5) * length,
            );
            sim_box.set_position(i, r);
        }
        sim_box
    }

    fn brute_force(sim_box: &SimBox, cutoff: f64, same_bead_only: bool) -> BTreeSet<(usize, usize)> {
        let mut pairs = BTreeSet::new();
        for i in 0..sim_box.len() {
            for j in i + 1..sim_box.len() {
                let (a, b) = (sim_box.atom(i), sim_box.atom(j));
                if same_bead_only && a.index != b.index {
                    continue;
                }
                let dr = sim_box.boundary().nearest_image(&(b.position - a.position));
                if dr.norm_squared() < cutoff * cutoff {
                    pairs.insert((i, j));
                }
            }
        }
        pairs
    }

    #[test]
    fn test_cell_list_matches_brute_force() {
        let sim_box = random_box(60, 1, 9.0, 7);
        let table = lj_table();
        let mut search = CellNeighborSearch::new(2.5, CutoffInclusion, sim_box.boundary()).unwrap();
        assert_eq!(search.n_cells(), [3, 3, 3]);

        search.rebuild(&sim_box, &table);
        let found: BTreeSet<(usize, usize)> = search.pairs().iter().map(|p| (p.i, p.j)).collect();
        assert_eq!(found.len(), search.pairs().len(), "pair listed twice");
        assert_eq!(found, brute_force(&sim_box, 2.5, false));
    }

    #[test]
    fn test_small_grid_does_not_double_count() {
        // two cells per side: every neighbor offset wraps onto the same cells
        let sim_box = random_box(30, 1, 5.4, 11);
        let table = lj_table();
        let mut search = CellNeighborSearch::new(2.6, CutoffInclusion, sim_box.boundary()).unwrap();
        assert_eq!(search.n_cells(), [2, 2, 2]);

        search.rebuild(&sim_box, &table);
        let found: BTreeSet<(usize, usize)> = search.pairs().iter().map(|p| (p.i, p.j)).collect();
        assert_eq!(found.len(), search.pairs().len());
        assert_eq!(found, brute_force(&sim_box, 2.6, false));
    }

    #[test]
    fn test_path_integral_search_keeps_same_bead_pairs() {
        let sim_box = random_box(20, 4, 8.0, 3);
        let table = lj_table();
        let mut search =
            CellNeighborSearch::new(2.0, PathIntegralInclusion::new(), sim_box.boundary()).unwrap();
        search.rebuild(&sim_box, &table);

        for pair in search.pairs() {
            assert_eq!(sim_box.atom(pair.i).index, sim_box.atom(pair.j).index);
        }
        let found: BTreeSet<(usize, usize)> = search.pairs().iter().map(|p| (p.i, p.j)).collect();
        assert_eq!(found, brute_force(&sim_box, 2.0, true));
    }

    #[test]
    fn test_offsets_reach_minimum_image() {
        let sim_box = SimBox::from_positions(
            &[(0, Vector3::new(-4.5, 0.0, 0.0)), (0, Vector3::new(4.5, 0.0, 0.0))],
            Boundary::cubic(10.0),
        );
        let mut search = CellNeighborSearch::new(2.0, CutoffInclusion, sim_box.boundary()).unwrap();
        assert_eq!(search.rebuild(&sim_box, &lj_table()), 1);
        let pair = search.pairs()[0];
        assert_eq!(pair.offset, Vector3::new(-10.0, 0.0, 0.0));
    }

    #[test]
    fn test_rejects_bad_geometry() {
        assert!(CellNeighborSearch::new(1.0, CutoffInclusion, &Boundary::NonPeriodic).is_err());
        assert!(CellNeighborSearch::new(3.0, CutoffInclusion, &Boundary::cubic(5.0)).is_err());
        assert!(CellNeighborSearch::new(0.0, CutoffInclusion, &Boundary::cubic(5.0)).is_err());
    }
}
