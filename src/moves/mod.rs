//! Monte Carlo moves for ring-polymer configurations.

mod traits;
mod staging;

pub use traits::MonteCarloMove;
pub use staging::RingStagingMove;
