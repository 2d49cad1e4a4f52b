//! Engine-level traits for energy and force evaluation.

use std::cell::RefCell;

use nalgebra::Vector3;

use crate::system::SimBox;

/// An energy engine bound to one box.
///
/// `compute_all` evaluates the current configuration and returns the total
/// energy. `last_energy` only reports the value cached by the most recent
/// `compute_all` and is stale as soon as any position changes.
pub trait PotentialCompute {
    /// Recompute the total energy, and the per-atom forces when `compute_forces` is set.
    fn compute_all(&mut self, compute_forces: bool) -> f64;

    /// Energy from the last call to [`PotentialCompute::compute_all`].
    fn last_energy(&self) -> f64;

    /// Forces from the last call that requested them, indexed by leaf index.
    fn forces(&self) -> &[Vector3<f64>];
}

/// Stateless energy evaluation for an arbitrary box.
pub trait PotentialCalculation {
    fn calculate_energy(&self, sim_box: &SimBox) -> f64;
}

impl<T: PotentialCalculation + ?Sized> PotentialCalculation for RefCell<T> {
    fn calculate_energy(&self, sim_box: &SimBox) -> f64 {
        self.borrow().calculate_energy(sim_box)
    }
}
