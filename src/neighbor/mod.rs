//! Neighbor determination: a generic cell-list search with a pluggable
//! pair-inclusion strategy, and the path-integral strategy that restricts
//! interactions to beads of the same imaginary-time slice.

mod inclusion;
mod cell;

pub use inclusion::{PairInclusion, PairCandidate, PotentialRow, CutoffInclusion, PathIntegralInclusion};
pub use cell::{CellNeighborSearch, NeighborPair};
