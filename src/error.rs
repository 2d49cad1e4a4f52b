//! Error type shared by the configuration, neighbor and driver layers.

use thiserror::Error;

/// Errors raised while building or configuring a simulation.
///
/// Estimators and pair-inclusion strategies never produce these; they only
/// surface from construction-time validation and file handling.
#[derive(Debug, Error)]
pub enum PimcError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("neighbor search misconfigured: {0}")]
    Neighbor(String),
}

pub type Result<T> = std::result::Result<T, PimcError>;
