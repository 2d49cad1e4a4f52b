//! YAML run configuration for a path-integral Lennard-Jones simulation.
//!
//! ```yaml
//! n_molecules: 256
//! n_beads: 4
//! temperature: 0.5
//! hbar: 0.1
//! density: 1.0
//! cutoff: 2.5
//! omega2: 219.231319
//! steps: 20000
//! seed: 7
//! ```
//!
//! Every key is optional and falls back to the defaults below.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PimcError, Result};
use crate::system::is_full_fcc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of quantum particles, each one ring polymer. Must be `4 m^3`.
    pub n_molecules: usize,
    /// Beads per ring polymer (imaginary-time slices).
    pub n_beads: usize,
    pub temperature: f64,
    pub hbar: f64,
    pub mass: f64,
    /// Number density of particles; sets the cubic box edge.
    pub density: f64,
    /// Pair cutoff, at most half the box edge.
    pub cutoff: f64,
    /// Squared angular frequency of the harmonic reference well.
    pub omega2: f64,
    /// Coupling between the harmonic reference (0) and Lennard-Jones (1).
    pub lambda: f64,
    pub lj_sigma: f64,
    pub lj_epsilon: f64,
    /// Production trials.
    pub steps: u64,
    pub equilibration_steps: u64,
    /// Trials between estimator samples.
    pub sample_interval: u64,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            n_molecules: 256,
            n_beads: 2,
            temperature: 0.5,
            hbar: 0.1,
            mass: 1.0,
            density: 1.0,
            cutoff: 2.5,
            omega2: 219.231319,
            lambda: 1.0,
            lj_sigma: 1.0,
            lj_epsilon: 1.0,
            steps: 10_000,
            equilibration_steps: 1_000,
            sample_interval: 10,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn beta(&self) -> f64 {
        1.0 / self.temperature
    }

    /// Inverse temperature of a single imaginary-time slice.
    pub fn beta_n(&self) -> f64 {
        self.beta() / self.n_beads as f64
    }

    /// Ring-polymer frequency `n / (hbar beta)`.
    pub fn omega_n(&self) -> f64 {
        self.n_beads as f64 / (self.hbar * self.beta())
    }

    /// Spring constant between neighboring beads, `m omega_n^2 / n`; zero for a classical particle.
    pub fn spring_constant(&self) -> f64 {
        if self.n_beads == 1 {
            return 0.0;
        }
        let omega_n = self.omega_n();
        self.mass * omega_n * omega_n / self.n_beads as f64
    }

    /// Per-bead force constant of the harmonic reference well.
    pub fn field_constant(&self) -> f64 {
        self.mass * self.omega2 / self.n_beads as f64
    }

    pub fn box_length(&self) -> f64 {
        (self.n_molecules as f64 / self.density).cbrt()
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("temperature", self.temperature),
            ("hbar", self.hbar),
            ("mass", self.mass),
            ("density", self.density),
            ("cutoff", self.cutoff),
            ("lj_sigma", self.lj_sigma),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(PimcError::InvalidConfig(format!("{} must be positive, got {}", name, value)));
            }
        }
        if !is_full_fcc(self.n_molecules) {
            return Err(PimcError::InvalidConfig(format!(
                "n_molecules must fill an FCC lattice (4 m^3: 4, 32, 108, 256, 500, ...), got {}",
                self.n_molecules
            )));
        }
        // the staging move is the only move, and it needs a ring to regrow
        if self.n_beads < 2 {
            return Err(PimcError::InvalidConfig(format!("n_beads must be at least 2, got {}", self.n_beads)));
        }
        if self.omega2 < 0.0 {
            return Err(PimcError::InvalidConfig(format!("omega2 must be non-negative, got {}", self.omega2)));
        }
        if !(0.0..=1.0).contains(&self.lambda) {
            return Err(PimcError::InvalidConfig(format!("lambda must lie in [0, 1], got {}", self.lambda)));
        }
        if self.steps == 0 || self.sample_interval == 0 {
            return Err(PimcError::InvalidConfig("steps and sample_interval must be at least 1".into()));
        }
        let half_box = 0.5 * self.box_length();
        if self.cutoff > half_box {
            return Err(PimcError::InvalidConfig(format!(
                "cutoff {} exceeds half the box edge {:.4}; lower it or add molecules",
                self.cutoff, half_box
            )));
        }
        Ok(())
    }
}

/// Read and validate a configuration file.
pub fn read_config<P: AsRef<Path>>(path: P) -> Result<SimulationConfig> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config: SimulationConfig = serde_yaml::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}

pub fn write_config<P: AsRef<Path>>(path: P, config: &SimulationConfig) -> Result<()> {
    let file = File::create(path)?;
    serde_yaml::to_writer(BufWriter::new(file), config)?;
    Ok(())
}
