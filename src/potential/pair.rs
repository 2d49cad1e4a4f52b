//! Pair potentials and the cell-list pair engine.

use std::rc::Rc;

use nalgebra::Vector3;

use super::traits::{PotentialCalculation, PotentialCompute};
use crate::error::Result;
use crate::neighbor::{CellNeighborSearch, PairCandidate, PairInclusion, PathIntegralInclusion};
use crate::system::{Shared, SimBox};

/// Spherically symmetric pair potential.
pub trait PairPotential {
    /// Energy at squared separation `r2`.
    fn u(&self, r2: f64) -> f64;

    /// `r du/dr` at squared separation `r2`.
    fn du(&self, r2: f64) -> f64;
}

/// Lennard-Jones 12-6 potential.
#[derive(Debug, Clone, Copy)]
pub struct P2LennardJones {
    pub sigma: f64,
    pub epsilon: f64,
}

impl P2LennardJones {
    pub fn new(sigma: f64, epsilon: f64) -> Self {
        Self { sigma, epsilon }
    }
}

impl PairPotential for P2LennardJones {
    fn u(&self, r2: f64) -> f64 {
        let s2 = self.sigma * self.sigma / r2;
        let s6 = s2 * s2 * s2;
        4.0 * self.epsilon * (s6 * s6 - s6)
    }

    fn du(&self, r2: f64) -> f64 {
        let s2 = self.sigma * self.sigma / r2;
        let s6 = s2 * s2 * s2;
        -24.0 * self.epsilon * (2.0 * s6 * s6 - s6)
    }
}

/// Wraps a potential so it vanishes beyond `cutoff` and is shifted to zero there.
pub struct P2TruncatedShifted {
    inner: Rc<dyn PairPotential>,
    cutoff2: f64,
    shift: f64,
}

impl P2TruncatedShifted {
    pub fn new(inner: Rc<dyn PairPotential>, cutoff: f64) -> Self {
        let cutoff2 = cutoff * cutoff;
        let shift = inner.u(cutoff2);
        Self { inner, cutoff2, shift }
    }
}

impl PairPotential for P2TruncatedShifted {
    fn u(&self, r2: f64) -> f64 {
        if r2 < self.cutoff2 { self.inner.u(r2) - self.shift } else { 0.0 }
    }

    fn du(&self, r2: f64) -> f64 {
        if r2 < self.cutoff2 { self.inner.du(r2) } else { 0.0 }
    }
}

/// Symmetric table of pair potentials indexed by atom type.
#[derive(Clone)]
pub struct PairPotentialTable {
    n_types: usize,
    entries: Vec<Option<Rc<dyn PairPotential>>>,
}

impl PairPotentialTable {
    pub fn new(n_types: usize) -> Self {
        Self { n_types, entries: vec![None; n_types * n_types] }
    }

    pub fn set(&mut self, type_a: usize, type_b: usize, potential: Rc<dyn PairPotential>) {
        self.entries[type_a * self.n_types + type_b] = Some(potential.clone());
        self.entries[type_b * self.n_types + type_a] = Some(potential);
    }

    pub fn get(&self, type_a: usize, type_b: usize) -> Option<&Rc<dyn PairPotential>> {
        self.entries[type_a * self.n_types + type_b].as_ref()
    }

    /// Potentials felt by `type_a` against every other type.
    pub fn row(&self, type_a: usize) -> &[Option<Rc<dyn PairPotential>>] {
        &self.entries[type_a * self.n_types..(type_a + 1) * self.n_types]
    }
}

/// Pair engine driven by a cell-list neighbor search.
///
/// The neighbor list is rebuilt on every `compute_all`, so the energy always
/// reflects the current configuration.
pub struct PairPotentialCompute<P: PairInclusion = PathIntegralInclusion> {
    sim_box: Shared<SimBox>,
    table: PairPotentialTable,
    search: CellNeighborSearch<P>,
    forces: Vec<Vector3<f64>>,
    last_energy: f64,
}

impl<P: PairInclusion> PairPotentialCompute<P> {
    pub fn new(sim_box: Shared<SimBox>, table: PairPotentialTable, cutoff: f64, inclusion: P) -> Result<Self> {
        let search = CellNeighborSearch::new(cutoff, inclusion, sim_box.borrow().boundary())?;
        Ok(Self {
            sim_box,
            table,
            search,
            forces: Vec::new(),
            last_energy: 0.0,
        })
    }

    pub fn search(&self) -> &CellNeighborSearch<P> {
        &self.search
    }

    /// Re-validate the cell grid against the box's current boundary.
    pub fn reset_geometry(&mut self) -> Result<()> {
        let sim_box = self.sim_box.borrow();
        self.search.reset_geometry(sim_box.boundary())
    }
}

impl<P: PairInclusion> PotentialCompute for PairPotentialCompute<P> {
    fn compute_all(&mut self, compute_forces: bool) -> f64 {
        let sim_box = self.sim_box.borrow();
        self.search.rebuild(&sim_box, &self.table);
        if compute_forces {
            self.forces.clear();
            self.forces.resize(sim_box.len(), Vector3::zeros());
        }

        let mut energy = 0.0;
        for pair in self.search.pairs() {
            let (atom_i, atom_j) = (sim_box.atom(pair.i), sim_box.atom(pair.j));
            let Some(potential) = self.table.get(atom_i.atom_type, atom_j.atom_type) else {
                continue;
            };
            let dr = atom_j.position + pair.offset - atom_i.position;
            let r2 = dr.norm_squared();
            energy += potential.u(r2);
            if compute_forces {
                let fij = potential.du(r2) / r2 * dr;
                self.forces[pair.i] += fij;
                self.forces[pair.j] -= fij;
            }
        }
        self.last_energy = energy;
        energy
    }

    fn last_energy(&self) -> f64 {
        self.last_energy
    }

    fn forces(&self) -> &[Vector3<f64>] {
        &self.forces
    }
}

impl<P: PairInclusion> PotentialCalculation for PairPotentialCompute<P> {
    /// All-pairs evaluation of `sim_box` with this engine's inclusion rule.
    fn calculate_energy(&self, sim_box: &SimBox) -> f64 {
        let cutoff2 = self.search.cutoff() * self.search.cutoff();
        let boundary = sim_box.boundary();
        let atoms = sim_box.atoms();
        let mut energy = 0.0;
        for (i, atom_i) in atoms.iter().enumerate() {
            for (j, atom_j) in atoms.iter().enumerate().skip(i + 1) {
                let dr = atom_j.position - atom_i.position;
                let offset = boundary.nearest_image(&dr) - dr;
                let candidate = PairCandidate { i, j, atom_i, atom_j, offset: &offset };
                let row = self.table.row(atom_i.atom_type);
                if self.search.inclusion().check_pair(&candidate, cutoff2, row) == 0 {
                    continue;
                }
                if let Some(potential) = self.table.get(atom_i.atom_type, atom_j.atom_type) {
                    energy += potential.u(candidate.separation().norm_squared());
                }
            }
        }
        energy
    }
}
