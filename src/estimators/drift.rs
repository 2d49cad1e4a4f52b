use nalgebra::Vector3;

use super::traits::{Dimension, Estimator};
use crate::agents::{AgentManager, PositionSource};
use crate::system::{Shared, SimBox};

/// Distance the center of mass has moved from the reference sites.
///
/// Each bead is paired with the site recorded for it at construction and
/// its displacement taken through the minimum image, so wrapping through a
/// periodic boundary does not count as drift.
pub struct CenterOfMassDriftEstimator {
    sim_box: Shared<SimBox>,
    sites: AgentManager<PositionSource>,
}

impl CenterOfMassDriftEstimator {
    pub fn new(sim_box: Shared<SimBox>) -> Self {
        let sites = AgentManager::new(PositionSource, &sim_box.borrow());
        Self { sim_box, sites }
    }

    pub fn sites(&self) -> &AgentManager<PositionSource> {
        &self.sites
    }

    /// Drop the reference sites, handing them back to their source.
    pub fn release(self) {
        let sim_box = self.sim_box.borrow();
        self.sites.release_all(&sim_box);
    }
}

impl Estimator for CenterOfMassDriftEstimator {
    fn label(&self) -> &str {
        "center of mass drift"
    }

    fn dimension(&self) -> Dimension {
        Dimension::Length
    }

    fn value(&self) -> f64 {
        let sim_box = self.sim_box.borrow();
        if sim_box.is_empty() {
            return 0.0;
        }
        let boundary = sim_box.boundary();
        let total: Vector3<f64> = sim_box
            .atoms()
            .iter()
            .zip(self.sites.agents())
            .map(|(atom, site)| boundary.nearest_image(&(atom.position - site)))
            .sum();
        (total / sim_box.len() as f64).norm()
    }
}
