//! Path-integral Monte Carlo driver for Lennard-Jones ring polymers.
//!
//! The sampled potential couples the Lennard-Jones model to a harmonic
//! reference well centered on each molecule's FCC lattice site,
//! `U = lambda U_LJ + (1 - lambda) U_field`, on top of the ring springs.
//! Every engine evaluates per-bead energies already divided by the number
//! of beads.

use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::agents::{AgentManager, PositionSource};
use crate::error::Result;
use crate::estimators::{
    CenterOfMassDriftEstimator, CentroidVirialEstimator, Dimension, DuDlambdaEstimator, Estimator,
    HarmonicEnergyEstimator, MsdEstimator, PotentialEnergyEstimator, PrimitiveEstimator, VirialEstimator,
};
use crate::io::SimulationConfig;
use crate::moves::{MonteCarloMove, RingStagingMove};
use crate::neighbor::PathIntegralInclusion;
use crate::potential::{
    BondingPotentialCompute, FieldPotentialCompute, P1Harmonic, P2LennardJones, P2TruncatedShifted, PairPotential,
    PairPotentialCompute, PairPotentialTable, PotentialComputeAggregate,
};
use crate::space::Boundary;
use crate::stats::BlockAccumulator;
use crate::system::{shared, Shared, SimBox};

/// Statistics of one estimator over the production run.
#[derive(Debug, Clone)]
pub struct EstimatorSummary {
    pub label: String,
    pub dimension: Dimension,
    pub mean: f64,
    pub error: f64,
    pub autocorrelation_time: f64,
}

#[derive(Debug, Clone)]
pub struct SimulationResults {
    pub estimators: Vec<EstimatorSummary>,
    pub acceptance_rate: f64,
    pub n_samples: usize,
}

impl SimulationResults {
    pub fn get(&self, label: &str) -> Option<&EstimatorSummary> {
        self.estimators.iter().find(|s| s.label == label)
    }
}

pub struct PathIntegralSimulation {
    config: SimulationConfig,
    sim_box: Shared<SimBox>,
    mc_move: Shared<RingStagingMove>,
    estimators: Vec<Box<dyn Estimator>>,
    rng: StdRng,
}

impl PathIntegralSimulation {
    /// Build the box, engines, move and estimators described by `config`.
    pub fn from_config(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let n_beads = config.n_beads;

        let mut sim_box = SimBox::ring_polymers(config.n_molecules, n_beads, Boundary::cubic(config.box_length()));
        sim_box.place_on_fcc_lattice();
        let sim_box = shared(sim_box);

        let bonding = shared(BondingPotentialCompute::ring(sim_box.clone(), config.spring_constant()));

        let mut field = FieldPotentialCompute::new(sim_box.clone());
        field.set_field_potential(0, Box::new(P1Harmonic { k: config.field_constant() }));
        field.set_sites(AgentManager::new(PositionSource, &sim_box.borrow()));
        let field = shared(field);

        let lj: Rc<dyn PairPotential> = Rc::new(P2LennardJones::new(config.lj_sigma, config.lj_epsilon / n_beads as f64));
        let mut table = PairPotentialTable::new(1);
        table.set(0, 0, Rc::new(P2TruncatedShifted::new(lj, config.cutoff)));
        let pair = shared(PairPotentialCompute::new(
            sim_box.clone(),
            table,
            config.cutoff,
            PathIntegralInclusion::new(),
        )?);

        let mut sampled = PotentialComputeAggregate::new(Vec::new());
        sampled.add_scaled(pair.clone(), config.lambda);
        sampled.add_scaled(field.clone(), 1.0 - config.lambda);
        let sampled = shared(sampled);

        let mc_move = shared(RingStagingMove::new(
            sim_box.clone(),
            sampled.clone(),
            bonding.clone(),
            config.beta(),
            config.spring_constant(),
        ));

        let mut estimators: Vec<Box<dyn Estimator>> = Vec::new();
        estimators.push(Box::new(PotentialEnergyEstimator::new(pair.clone(), sim_box.clone())));
        estimators.push(Box::new(HarmonicEnergyEstimator::new(mc_move.clone())));
        estimators.push(Box::new(PrimitiveEstimator::new(bonding, sampled.clone(), n_beads, config.beta_n())));
        estimators.push(Box::new(DuDlambdaEstimator::new(pair, field)));
        // the first n_beads atoms are molecule 0, which starts at the origin
        estimators.push(Box::new(MsdEstimator::new(sim_box.clone(), n_beads)));
        estimators.push(Box::new(CenterOfMassDriftEstimator::new(sim_box.clone())));
        estimators.push(Box::new(VirialEstimator::new(sampled.clone(), sim_box.clone())));
        estimators.push(Box::new(CentroidVirialEstimator::new(sampled, sim_box.clone(), config.beta())));

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(
            n_molecules = config.n_molecules,
            n_beads,
            box_length = config.box_length(),
            spring_constant = config.spring_constant(),
            "built path-integral system"
        );
        Ok(Self { config, sim_box, mc_move, estimators, rng })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn sim_box(&self) -> &Shared<SimBox> {
        &self.sim_box
    }

    pub fn estimators(&self) -> &[Box<dyn Estimator>] {
        &self.estimators
    }

    /// Equilibrate, then sample every estimator each `sample_interval` trials.
    pub fn run(&mut self) -> SimulationResults {
        for _ in 0..self.config.equilibration_steps {
            self.mc_move.borrow_mut().do_trial(&mut self.rng);
        }
        debug!(
            acceptance = self.mc_move.borrow().acceptance_rate(),
            "equilibration finished"
        );

        let n_samples = (self.config.steps / self.config.sample_interval) as usize;
        let mut accumulators = vec![BlockAccumulator::with_capacity(n_samples); self.estimators.len()];
        let report_every = (self.config.steps / 10).max(1);

        for step in 1..=self.config.steps {
            self.mc_move.borrow_mut().do_trial(&mut self.rng);
            if step % self.config.sample_interval == 0 {
                for (estimator, acc) in self.estimators.iter().zip(accumulators.iter_mut()) {
                    acc.push(estimator.value());
                }
            }
            if step % report_every == 0 {
                info!(
                    step,
                    total = self.config.steps,
                    acceptance = self.mc_move.borrow().acceptance_rate(),
                    "production"
                );
            }
        }

        let estimators = self
            .estimators
            .iter()
            .zip(&accumulators)
            .map(|(estimator, acc)| {
                let (mean, error, autocorrelation_time) = acc.summary();
                EstimatorSummary {
                    label: estimator.label().to_string(),
                    dimension: estimator.dimension(),
                    mean,
                    error,
                    autocorrelation_time,
                }
            })
            .collect();

        SimulationResults {
            estimators,
            acceptance_rate: self.mc_move.borrow().acceptance_rate(),
            n_samples: accumulators.first().map_or(0, BlockAccumulator::len),
        }
    }
}
