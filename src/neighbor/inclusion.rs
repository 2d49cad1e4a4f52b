//! Pair-inclusion strategies consulted by the cell-list search for each
//! candidate pair.

use std::rc::Rc;

use nalgebra::Vector3;

use crate::potential::PairPotential;
use crate::system::Atom;

/// Row of the pair-potential table for the first atom's type, indexed by the
/// second atom's type.
pub type PotentialRow<'a> = &'a [Option<Rc<dyn PairPotential>>];

/// A candidate pair produced by cell traversal. `i != j` always holds.
#[derive(Debug, Clone, Copy)]
pub struct PairCandidate<'a> {
    pub i: usize,
    pub j: usize,
    pub atom_i: &'a Atom,
    pub atom_j: &'a Atom,
    /// Periodic shift applied to `atom_j` so the pair is in minimum image.
    pub offset: &'a Vector3<f64>,
}

impl PairCandidate<'_> {
    /// Separation vector `r_j + offset - r_i`.
    pub fn separation(&self) -> Vector3<f64> {
        self.atom_j.position + self.offset - self.atom_i.position
    }
}

/// Decides whether a candidate pair enters the neighbor list.
///
/// Returns the number of potentials that apply to the pair; zero means the
/// pair is skipped.
pub trait PairInclusion {
    fn check_pair(&self, candidate: &PairCandidate, cutoff2: f64, potentials: PotentialRow) -> usize;
}

/// Generic inclusion test: a potential must exist for the type pair and the
/// minimum-image separation must be inside the cutoff.
#[derive(Debug, Clone, Copy, Default)]
pub struct CutoffInclusion;

impl PairInclusion for CutoffInclusion {
    fn check_pair(&self, candidate: &PairCandidate, cutoff2: f64, potentials: PotentialRow) -> usize {
        let has_potential = potentials
            .get(candidate.atom_j.atom_type)
            .map_or(false, |p| p.is_some());
        if !has_potential {
            return 0;
        }
        if candidate.separation().norm_squared() < cutoff2 { 1 } else { 0 }
    }
}

/// Inclusion test for path-integral replicas.
///
/// Beads only interact with the beads of other ring polymers that sit at the
/// same imaginary-time slice. Pairs with different bead indices are rejected
/// before any geometry is evaluated; matching pairs are decided by `inner`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathIntegralInclusion<P: PairInclusion = CutoffInclusion> {
    inner: P,
}

impl PathIntegralInclusion<CutoffInclusion> {
    pub fn new() -> Self {
        Self { inner: CutoffInclusion }
    }
}

impl<P: PairInclusion> PathIntegralInclusion<P> {
    pub fn with_inner(inner: P) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: PairInclusion> PairInclusion for PathIntegralInclusion<P> {
    fn check_pair(&self, candidate: &PairCandidate, cutoff2: f64, potentials: PotentialRow) -> usize {
        if candidate.atom_i.index != candidate.atom_j.index {
            return 0;
        }
        self.inner.check_pair(candidate, cutoff2, potentials)
    }
}
