//! Rust PIMC - path-integral Monte Carlo building blocks in Rust
//!
//! This crate provides the ring-polymer pieces of a path-integral simulation:
//! a cell-list neighbor search that only pairs beads of the same imaginary-time
//! slice, field/bonding/pair energy engines, a staging Monte Carlo move, and the
//! scalar estimators sampled along a run.

pub mod error;
pub mod space;
pub mod system;
pub mod agents;
pub mod neighbor;
pub mod potential;
pub mod moves;
pub mod estimators;
pub mod stats;
pub mod io;
pub mod simulation;

// Re-export commonly used types at crate root
pub use error::{PimcError, Result};
pub use space::Boundary;
pub use system::{shared, Atom, Shared, SimBox};
pub use agents::{AgentManager, AgentSource, PositionSource};
pub use neighbor::{CellNeighborSearch, CutoffInclusion, PairInclusion, PathIntegralInclusion};
pub use potential::{PotentialCalculation, PotentialCompute};
pub use moves::{MonteCarloMove, RingStagingMove};
pub use estimators::{
    CenterOfMassDriftEstimator, CentroidVirialEstimator, Dimension, DuDlambdaEstimator, Estimator,
    HarmonicEnergyEstimator, MsdEstimator, PotentialEnergyEstimator, PrimitiveEstimator, VirialEstimator,
};
pub use stats::BlockAccumulator;
pub use io::{read_config, write_config, SimulationConfig};
pub use simulation::{EstimatorSummary, PathIntegralSimulation, SimulationResults};

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use crate::potential::{
        FieldPotentialCompute, P2LennardJones, PairPotential, PairPotentialCompute, PairPotentialTable,
    };
    use crate::*;

    /// Two rings of two beads; molecule 1 is placed so that only its bead 0
    /// is close to bead 0 of molecule 0.
    fn two_rings() -> Shared<SimBox> {
        let mut sim_box = SimBox::ring_polymers(2, 2, Boundary::cubic(10.0));
        sim_box.set_position(0, Vector3::new(0.0, 0.0, 0.0));
        sim_box.set_position(1, Vector3::new(0.0, -4.0, 0.0));
        sim_box.set_position(2, Vector3::new(1.5, 0.0, 0.0));
        sim_box.set_position(3, Vector3::new(0.0, 1.2, 0.0));
        shared(sim_box)
    }

    #[test]
    fn test_dudlambda_sees_only_same_slice_pairs() {
        let sim_box = two_rings();
        let lj: Rc<dyn PairPotential> = Rc::new(P2LennardJones::new(1.0, 1.0));
        let mut table = PairPotentialTable::new(1);
        table.set(0, 0, lj.clone());
        let pair = shared(PairPotentialCompute::new(sim_box.clone(), table, 3.0, PathIntegralInclusion::new()).unwrap());
        let field = shared(FieldPotentialCompute::new(sim_box.clone()));

        // bead 1 of molecule 1 sits at 1.2 from bead 0 of molecule 0 but in another slice
        let estimator = DuDlambdaEstimator::new(pair.clone(), field);
        assert_relative_eq!(estimator.value(), lj.u(1.5 * 1.5), epsilon = 1e-12);
        assert_eq!(pair.borrow().search().pairs().len(), 1);

        let generic = PotentialEnergyEstimator::new(pair, sim_box);
        assert_relative_eq!(generic.value(), estimator.value(), epsilon = 1e-12);
    }
}
