//! Scalar estimators sampled once per sampling interval.
//!
//! Each estimator evaluates its dependencies' current state on every call to
//! [`Estimator::value`]; averaging is left to the caller.

mod traits;
mod energy;
mod msd;
mod drift;
mod virial;

pub use traits::{Estimator, Dimension};
pub use energy::{PotentialEnergyEstimator, HarmonicEnergyEstimator, PrimitiveEstimator, DuDlambdaEstimator};
pub use msd::MsdEstimator;
pub use drift::CenterOfMassDriftEstimator;
pub use virial::{CentroidVirialEstimator, VirialEstimator};
