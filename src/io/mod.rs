//! File handling: YAML run configuration.

mod config;

pub use config::{read_config, write_config, SimulationConfig};
