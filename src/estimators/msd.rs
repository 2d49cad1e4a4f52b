use super::traits::{Dimension, Estimator};
use crate::system::{Shared, SimBox};

/// Mean-square displacement of the first `n` beads from the origin.
///
/// Positions are taken as they are stored; no centroid is subtracted.
/// `n_beads` must lie in `1..=sim_box.len()`: a larger count panics on the
/// slice and zero yields NaN.
pub struct MsdEstimator {
    sim_box: Shared<SimBox>,
    n_beads: usize,
}

impl MsdEstimator {
    pub fn new(sim_box: Shared<SimBox>, n_beads: usize) -> Self {
        Self { sim_box, n_beads }
    }
}

impl Estimator for MsdEstimator {
    fn label(&self) -> &str {
        "msd"
    }

    fn dimension(&self) -> Dimension {
        Dimension::Area
    }

    fn value(&self) -> f64 {
        let sim_box = self.sim_box.borrow();
        let sum: f64 = sim_box.atoms()[..self.n_beads]
            .iter()
            .map(|atom| atom.position.norm_squared())
            .sum();
        sum / self.n_beads as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::Boundary;
    use crate::system::shared;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn test_msd_of_three_beads() {
        let sim_box = shared(SimBox::from_positions(
            &[
                (0, Vector3::new(1.0, 0.0, 0.0)),
                (1, Vector3::new(0.0, 2.0, 0.0)),
                (2, Vector3::new(0.0, 0.0, 3.0)),
            ],
            Boundary::NonPeriodic,
        ));
        let msd = MsdEstimator::new(sim_box, 3);
        assert_relative_eq!(msd.value(), 14.0 / 3.0, epsilon = 1e-12);
        assert_eq!(msd.dimension(), Dimension::Area);
    }

    #[test]
    fn test_msd_ignores_atoms_past_n() {
        let sim_box = shared(SimBox::ring_polymers(2, 2, Boundary::NonPeriodic));
        sim_box.borrow_mut().set_position(0, Vector3::new(2.0, 0.0, 0.0));
        sim_box.borrow_mut().set_position(3, Vector3::new(50.0, 0.0, 0.0));
        let msd = MsdEstimator::new(sim_box, 2);
        assert_relative_eq!(msd.value(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_repeated_queries_are_bit_identical() {
        let sim_box = shared(SimBox::ring_polymers(1, 4, Boundary::cubic(6.0)));
        for i in 0..4 {
            sim_box.borrow_mut().set_position(i, Vector3::new(0.7 - 0.3 * i as f64, 0.11, -1.9));
        }
        let msd = MsdEstimator::new(sim_box, 4);
        let first = msd.value();
        for _ in 0..5 {
            assert_eq!(msd.value().to_bits(), first.to_bits());
        }
    }
}
