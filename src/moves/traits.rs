//! Traits for Monte Carlo moves.

use rand::RngCore;

/// A Monte Carlo move that also reports the reference energy it tracked.
pub trait MonteCarloMove {
    /// Attempt one trial. Returns true if the trial was accepted.
    fn do_trial(&mut self, rng: &mut dyn RngCore) -> bool;

    /// Total reference energy recorded at the end of the last trial.
    ///
    /// Not recomputed on read; it is only as fresh as the last `do_trial`.
    fn last_total_energy(&self) -> f64;

    /// Fraction of trials accepted so far.
    fn acceptance_rate(&self) -> f64;
}
