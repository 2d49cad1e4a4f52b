//! Traits for scalar estimators.

use std::fmt;

/// Physical dimension of an estimator's value, for unit bookkeeping downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Null,
    Length,
    Area,
    Energy,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Null => "dimensionless",
            Dimension::Length => "length",
            Dimension::Area => "length^2",
            Dimension::Energy => "energy",
        };
        f.write_str(name)
    }
}

/// A single scalar observable of the current configuration.
pub trait Estimator {
    fn label(&self) -> &str;

    fn dimension(&self) -> Dimension;

    /// Evaluate the observable now. Engine-backed estimators recompute their
    /// engines, so this is not a cheap read.
    fn value(&self) -> f64;
}
