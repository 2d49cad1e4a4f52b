//! Geometry helpers: simulation-cell boundaries and minimum-image convention.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Boundary of a simulation box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Boundary {
    /// Rectangular box, periodic in every dimension.
    Periodic { dimensions: Vector3<f64> },
    /// Open boundary; displacements are used as-is.
    NonPeriodic,
}

impl Boundary {
    /// Cubic periodic box of edge `length`.
    pub fn cubic(length: f64) -> Self {
        Boundary::Periodic { dimensions: Vector3::repeat(length) }
    }

    pub fn is_periodic(&self) -> bool {
        matches!(self, Boundary::Periodic { .. })
    }

    pub fn dimensions(&self) -> Option<Vector3<f64>> {
        match self {
            Boundary::Periodic { dimensions } => Some(*dimensions),
            Boundary::NonPeriodic => None,
        }
    }

    /// Volume of the cell, `None` for an open boundary.
    pub fn volume(&self) -> Option<f64> {
        self.dimensions().map(|d| d.x * d.y * d.z)
    }

    /// Minimum-image displacement: `dr - L * round(dr / L)` per component.
    pub fn nearest_image(&self, dr: &Vector3<f64>) -> Vector3<f64> {
        match self {
            Boundary::Periodic { dimensions } => {
                let shift = dr.component_div(dimensions).map(|x| x.round());
                dr - dimensions.component_mul(&shift)
            }
            Boundary::NonPeriodic => *dr,
        }
    }

    /// Fractional coordinate of `r` wrapped into `[0, 1)` along each axis.
    pub fn wrapped_fraction(&self, r: &Vector3<f64>) -> Option<Vector3<f64>> {
        self.dimensions().map(|d| {
            r.component_div(&d).map(|x| {
                let f = x - x.floor();
                // floor of a tiny negative number can round back up to 1.0
                if f >= 1.0 { 0.0 } else { f }
            })
        })
    }
}
