//! Energy-derived estimators.

use std::rc::Rc;

use super::traits::{Dimension, Estimator};
use crate::moves::MonteCarloMove;
use crate::potential::{PotentialCalculation, PotentialCompute};
use crate::system::{Shared, SimBox};

/// Potential energy of a box from any [`PotentialCalculation`].
///
/// The box can be swapped after construction with [`PotentialEnergyEstimator::set_box`].
pub struct PotentialEnergyEstimator {
    potential: Rc<dyn PotentialCalculation>,
    sim_box: Shared<SimBox>,
}

impl PotentialEnergyEstimator {
    pub fn new(potential: Rc<dyn PotentialCalculation>, sim_box: Shared<SimBox>) -> Self {
        Self { potential, sim_box }
    }

    pub fn set_box(&mut self, sim_box: Shared<SimBox>) {
        self.sim_box = sim_box;
    }
}

impl Estimator for PotentialEnergyEstimator {
    fn label(&self) -> &str {
        "potential energy"
    }

    fn dimension(&self) -> Dimension {
        Dimension::Energy
    }

    fn value(&self) -> f64 {
        self.potential.calculate_energy(&self.sim_box.borrow())
    }
}

/// Harmonic reference energy cached by a Monte Carlo move.
///
/// Reads the move's last value without recomputing it; the move must have
/// run in the current sampling step.
pub struct HarmonicEnergyEstimator {
    mc_move: Shared<dyn MonteCarloMove>,
}

impl HarmonicEnergyEstimator {
    pub fn new(mc_move: Shared<dyn MonteCarloMove>) -> Self {
        Self { mc_move }
    }
}

impl Estimator for HarmonicEnergyEstimator {
    fn label(&self) -> &str {
        "harmonic energy"
    }

    fn dimension(&self) -> Dimension {
        Dimension::Energy
    }

    fn value(&self) -> f64 {
        self.mc_move.borrow().last_total_energy()
    }
}

/// Primitive energy estimator `1/(2 betaN) + E_potential - E_bonding`.
///
/// `potential` is the sampled inter-bead potential and `bonding` the ring
/// springs. Both engines are recomputed on every query.
pub struct PrimitiveEstimator {
    bonding: Shared<dyn PotentialCompute>,
    potential: Shared<dyn PotentialCompute>,
    beta_n: f64,
    n_beads: usize,
}

impl PrimitiveEstimator {
    pub fn new(
        bonding: Shared<dyn PotentialCompute>,
        potential: Shared<dyn PotentialCompute>,
        n_beads: usize,
        beta_n: f64,
    ) -> Self {
        Self { bonding, potential, beta_n, n_beads }
    }

    pub fn n_beads(&self) -> usize {
        self.n_beads
    }

    pub fn beta_n(&self) -> f64 {
        self.beta_n
    }
}

impl Estimator for PrimitiveEstimator {
    fn label(&self) -> &str {
        "primitive energy"
    }

    fn dimension(&self) -> Dimension {
        Dimension::Energy
    }

    fn value(&self) -> f64 {
        let e_potential = self.potential.borrow_mut().compute_all(false);
        let e_bonding = self.bonding.borrow_mut().compute_all(false);
        1.0 / (2.0 * self.beta_n) + e_potential - e_bonding
    }
}

/// Thermodynamic-integration derivative `dU/dλ = E_model - E_field`.
pub struct DuDlambdaEstimator {
    model: Shared<dyn PotentialCompute>,
    field: Shared<dyn PotentialCompute>,
}

impl DuDlambdaEstimator {
    pub fn new(model: Shared<dyn PotentialCompute>, field: Shared<dyn PotentialCompute>) -> Self {
        Self { model, field }
    }
}

impl Estimator for DuDlambdaEstimator {
    fn label(&self) -> &str {
        "dU/dlambda"
    }

    fn dimension(&self) -> Dimension {
        Dimension::Energy
    }

    fn value(&self) -> f64 {
        let e_model = self.model.borrow_mut().compute_all(false);
        let e_field = self.field.borrow_mut().compute_all(false);
        e_model - e_field
    }
}
