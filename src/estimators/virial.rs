//! Force-based energy estimators.
//!
//! Both estimators request forces from their engine on every query and
//! contract them with bead displacements. The engine's energies are per bead
//! (already divided by the number of beads), so no further slice average is
//! taken.

use nalgebra::Vector3;

use super::traits::{Dimension, Estimator};
use crate::agents::{AgentManager, PositionSource};
use crate::potential::PotentialCompute;
use crate::system::{Shared, SimBox};

/// Virial energy `U - ½ Σ_i (r_i - s_i)·F_i` about fixed reference sites.
///
/// Sites are snapshots of the bead positions at construction. The estimate
/// is exact for potentials that are homogeneous about those sites, such as
/// the harmonic lattice reference.
pub struct VirialEstimator {
    potential: Shared<dyn PotentialCompute>,
    sim_box: Shared<SimBox>,
    sites: AgentManager<PositionSource>,
}

impl VirialEstimator {
    pub fn new(potential: Shared<dyn PotentialCompute>, sim_box: Shared<SimBox>) -> Self {
        let sites = AgentManager::new(PositionSource, &sim_box.borrow());
        Self { potential, sim_box, sites }
    }
}

impl Estimator for VirialEstimator {
    fn label(&self) -> &str {
        "virial energy"
    }

    fn dimension(&self) -> Dimension {
        Dimension::Energy
    }

    fn value(&self) -> f64 {
        let mut potential = self.potential.borrow_mut();
        let energy = potential.compute_all(true);
        let sim_box = self.sim_box.borrow();
        let boundary = sim_box.boundary();
        let virial: f64 = sim_box
            .atoms()
            .iter()
            .zip(potential.forces())
            .map(|(atom, force)| {
                let dr = boundary.nearest_image(&(atom.position - self.sites.agent(atom.leaf_index)));
                dr.dot(force)
            })
            .sum();
        energy - 0.5 * virial
    }
}

/// Centroid-virial energy `3 N / (2 beta) + U - ½ Σ_i (r_i - c_i)·F_i`,
/// where `c_i` is the centroid of the ring holding bead `i` and `N` the
/// number of rings.
pub struct CentroidVirialEstimator {
    potential: Shared<dyn PotentialCompute>,
    sim_box: Shared<SimBox>,
    beta: f64,
}

impl CentroidVirialEstimator {
    pub fn new(potential: Shared<dyn PotentialCompute>, sim_box: Shared<SimBox>, beta: f64) -> Self {
        Self { potential, sim_box, beta }
    }
}

/// Centroid of molecule `m`, unwrapped around its first bead.
fn ring_centroid(sim_box: &SimBox, m: usize) -> Vector3<f64> {
    let range = sim_box.molecule_atoms(m);
    let n = range.len() as f64;
    let anchor = sim_box.atom(range.start).position;
    let spread: Vector3<f64> = range
        .map(|i| sim_box.boundary().nearest_image(&(sim_box.atom(i).position - anchor)))
        .sum();
    anchor + spread / n
}

impl Estimator for CentroidVirialEstimator {
    fn label(&self) -> &str {
        "centroid virial energy"
    }

    fn dimension(&self) -> Dimension {
        Dimension::Energy
    }

    fn value(&self) -> f64 {
        let mut potential = self.potential.borrow_mut();
        let energy = potential.compute_all(true);
        let forces = potential.forces();
        let sim_box = self.sim_box.borrow();
        let boundary = sim_box.boundary();

        let mut virial = 0.0;
        for m in 0..sim_box.n_molecules() {
            let centroid = ring_centroid(&sim_box, m);
            for i in sim_box.molecule_atoms(m) {
                let dr = boundary.nearest_image(&(sim_box.atom(i).position - centroid));
                virial += dr.dot(&forces[i]);
            }
        }
        1.5 * sim_box.n_molecules() as f64 / self.beta + energy - 0.5 * virial
    }
}
