//! Potential-energy engines: one-body fields, ring-polymer springs and
//! cell-list pair interactions.

mod traits;
mod field;
mod bonding;
mod pair;
mod aggregate;

pub use traits::{PotentialCompute, PotentialCalculation};
pub use field::{FieldPotential, FieldPotentialCompute, P1Harmonic, P1Anharmonic234};
pub use bonding::{BondPotential, BondingPotentialCompute, P2Harmonic};
pub use pair::{PairPotential, PairPotentialTable, PairPotentialCompute, P2LennardJones, P2TruncatedShifted};
pub use aggregate::PotentialComputeAggregate;
