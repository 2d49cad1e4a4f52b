//! Whole-ring staging move.
//!
//! One bead of a randomly chosen ring polymer is held fixed and every other
//! bead is regrown with a Lévy bridge that starts and ends on it. The bridge
//! samples the spring action exactly, so acceptance only depends on the
//! change of the remaining potential energy.
//!
//! Reference: Ceperley, D.M. (1995) "Path integrals in the theory of condensed helium"
//! Rev. Mod. Phys. 67, 279

use nalgebra::Vector3;
use rand::{Rng, RngCore};
use rand_distr::{Distribution, StandardNormal};
use tracing::trace;

use super::traits::MonteCarloMove;
use crate::potential::PotentialCompute;
use crate::system::{Shared, SimBox};

pub struct RingStagingMove {
    sim_box: Shared<SimBox>,
    /// Everything except the springs; decides acceptance.
    potential: Shared<dyn PotentialCompute>,
    /// Harmonic reference engine whose energy is cached after every trial.
    reference: Shared<dyn PotentialCompute>,
    beta: f64,
    spring_k: f64,
    last_total_energy: f64,
    accepted: usize,
    trials: usize,
}

impl RingStagingMove {
    /// `spring_k` must match the ring springs of `reference`, sampled at inverse temperature `beta`.
    pub fn new(
        sim_box: Shared<SimBox>,
        potential: Shared<dyn PotentialCompute>,
        reference: Shared<dyn PotentialCompute>,
        beta: f64,
        spring_k: f64,
    ) -> Self {
        Self {
            sim_box,
            potential,
            reference,
            beta,
            spring_k,
            last_total_energy: 0.0,
            accepted: 0,
            trials: 0,
        }
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Regrow every bead of molecule `m` except `anchor`. Returns the old positions.
    fn regrow(&self, sim_box: &mut SimBox, m: usize, anchor: usize, rng: &mut dyn RngCore) -> Vec<Vector3<f64>> {
        let range = sim_box.molecule_atoms(m);
        let first = range.start;
        let n_beads = range.len();
        let old_positions: Vec<Vector3<f64>> = range.map(|i| sim_box.atom(i).position).collect();

        // variance of one free link at inverse temperature beta
        let link_variance = 1.0 / (self.beta * self.spring_k);
        let x_end = old_positions[anchor];
        let mut x_prev = x_end;

        for k in 1..n_beads {
            let idx = first + (anchor + k) % n_beads;
            // links left between the previous bead and the anchor
            let remaining = (n_beads - k + 1) as f64;
            let mean = x_prev + (x_end - x_prev) / remaining;
            let sigma = (link_variance * (remaining - 1.0) / remaining).sqrt();
            let noise = Vector3::from_fn(|_, _| {
                let z: f64 = StandardNormal.sample(&mut *rng);
                z
            });
            let x_new = mean + sigma * noise;
            sim_box.set_position(idx, x_new);
            x_prev = x_new;
        }
        old_positions
    }

    fn restore(&self, m: usize, old_positions: &[Vector3<f64>]) {
        let mut sim_box = self.sim_box.borrow_mut();
        let first = sim_box.molecule_atoms(m).start;
        for (k, &x) in old_positions.iter().enumerate() {
            sim_box.set_position(first + k, x);
        }
    }
}

impl MonteCarloMove for RingStagingMove {
    fn do_trial(&mut self, rng: &mut dyn RngCore) -> bool {
        let (n_molecules, n_beads) = {
            let sim_box = self.sim_box.borrow();
            (sim_box.n_molecules(), sim_box.n_beads())
        };
        if n_molecules == 0 || n_beads < 2 {
            self.last_total_energy = self.reference.borrow_mut().compute_all(false);
            return false;
        }

        let u_old = self.potential.borrow_mut().compute_all(false);
        let m = rng.gen_range(0..n_molecules);
        let anchor = rng.gen_range(0..n_beads);
        let old_positions = {
            let mut sim_box = self.sim_box.borrow_mut();
            self.regrow(&mut sim_box, m, anchor, rng)
        };
        let u_new = self.potential.borrow_mut().compute_all(false);

        // Metropolis acceptance on the non-spring energy only
        let delta_u = u_new - u_old;
        let accept = if delta_u <= 0.0 {
            true
        } else {
            let r: f64 = rng.gen();
            r < (-self.beta * delta_u).exp()
        };
        if !accept {
            self.restore(m, &old_positions);
        }

        self.trials += 1;
        if accept {
            self.accepted += 1;
        }
        self.last_total_energy = self.reference.borrow_mut().compute_all(false);
        trace!(molecule = m, anchor, delta_u, accept, "staging trial");
        accept
    }

    fn last_total_energy(&self) -> f64 {
        self.last_total_energy
    }

    fn acceptance_rate(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.accepted as f64 / self.trials as f64
        }
    }
}
