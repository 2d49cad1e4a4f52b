//! Intramolecular bonds: the harmonic springs that close each ring polymer.

use nalgebra::Vector3;

use super::traits::{PotentialCalculation, PotentialCompute};
use crate::system::{Shared, SimBox};

/// Potential between two bonded beads as a function of their separation.
pub trait BondPotential {
    fn u(&self, r2: f64) -> f64;

    /// `r du/dr` at squared separation `r2`.
    fn du(&self, r2: f64) -> f64;
}

/// Harmonic spring `u = ½ k (r - r0)²`.
#[derive(Debug, Clone, Copy)]
pub struct P2Harmonic {
    pub k: f64,
    pub r0: f64,
}

impl BondPotential for P2Harmonic {
    fn u(&self, r2: f64) -> f64 {
        if self.r0 == 0.0 {
            return 0.5 * self.k * r2;
        }
        let dr = r2.sqrt() - self.r0;
        0.5 * self.k * dr * dr
    }

    fn du(&self, r2: f64) -> f64 {
        if self.r0 == 0.0 {
            return self.k * r2;
        }
        let r = r2.sqrt();
        self.k * r * (r - self.r0)
    }
}

/// Engine for bonds between beads of the same molecule.
///
/// Bonds are given as pairs of bead indices and applied to every molecule.
pub struct BondingPotentialCompute {
    sim_box: Shared<SimBox>,
    potential: Box<dyn BondPotential>,
    bonds: Vec<(usize, usize)>,
    forces: Vec<Vector3<f64>>,
    last_energy: f64,
}

impl BondingPotentialCompute {
    pub fn new(sim_box: Shared<SimBox>, potential: Box<dyn BondPotential>, bonds: Vec<(usize, usize)>) -> Self {
        Self {
            sim_box,
            potential,
            bonds,
            forces: Vec::new(),
            last_energy: 0.0,
        }
    }

    /// Bonds `(k, k+1 mod n)` closing an `n`-bead ring. Empty for a single bead.
    pub fn ring_bonds(n_beads: usize) -> Vec<(usize, usize)> {
        match n_beads {
            0 | 1 => Vec::new(),
            n => (0..n).map(|k| (k, (k + 1) % n)).collect(),
        }
    }

    /// Engine closing each molecule of `sim_box` into a ring with spring constant `k`.
    pub fn ring(sim_box: Shared<SimBox>, k: f64) -> Self {
        let n_beads = sim_box.borrow().n_beads();
        Self::new(sim_box, Box::new(P2Harmonic { k, r0: 0.0 }), Self::ring_bonds(n_beads))
    }

    pub fn bonds(&self) -> &[(usize, usize)] {
        &self.bonds
    }

    fn bond_energy(&self, sim_box: &SimBox, mut forces: Option<&mut Vec<Vector3<f64>>>) -> f64 {
        let boundary = sim_box.boundary();
        let mut energy = 0.0;
        for m in 0..sim_box.n_molecules() {
            let first = sim_box.molecule_atoms(m).start;
            for &(a, b) in &self.bonds {
                let (i, j) = (first + a, first + b);
                let dr = boundary.nearest_image(&(sim_box.atom(j).position - sim_box.atom(i).position));
                let r2 = dr.norm_squared();
                energy += self.potential.u(r2);
                if let Some(forces) = forces.as_deref_mut() {
                    if r2 > 0.0 {
                        let fij = self.potential.du(r2) / r2 * dr;
                        forces[i] += fij;
                        forces[j] -= fij;
                    }
                }
            }
        }
        energy
    }
}

impl PotentialCompute for BondingPotentialCompute {
    fn compute_all(&mut self, compute_forces: bool) -> f64 {
        let sim_box = self.sim_box.borrow();
        let energy = if compute_forces {
            let mut forces = vec![Vector3::zeros(); sim_box.len()];
            let energy = self.bond_energy(&sim_box, Some(&mut forces));
            self.forces = forces;
            energy
        } else {
            self.bond_energy(&sim_box, None)
        };
        drop(sim_box);
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

impl PotentialCalculation for BondingPotentialCompute {
    fn calculate_energy(&self, sim_box: &SimBox) -> f64 {
        self.bond_energy(sim_box, None)
    }
}
