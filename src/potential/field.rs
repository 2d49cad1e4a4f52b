//! One-body (external field) potentials and their engine.

use nalgebra::Vector3;

use super::traits::{PotentialCalculation, PotentialCompute};
use crate::agents::{AgentManager, PositionSource};
use crate::system::{Atom, Shared, SimBox};

/// Potential acting on each atom independently of the others.
pub trait FieldPotential {
    fn u(&self, r: &Vector3<f64>) -> f64;

    /// Gradient of `u` at `r`.
    fn gradient(&self, r: &Vector3<f64>) -> Vector3<f64>;
}

/// Isotropic harmonic well `u = ½ k |r|²`.
#[derive(Debug, Clone, Copy)]
pub struct P1Harmonic {
    pub k: f64,
}

impl FieldPotential for P1Harmonic {
    fn u(&self, r: &Vector3<f64>) -> f64 {
        0.5 * self.k * r.norm_squared()
    }

    fn gradient(&self, r: &Vector3<f64>) -> Vector3<f64> {
        self.k * r
    }
}

/// Anharmonic well `u = k2/2 r² + k3/6 r³ + k4/24 r⁴` in `r = |r|`.
#[derive(Debug, Clone, Copy)]
pub struct P1Anharmonic234 {
    pub k2: f64,
    pub k3: f64,
    pub k4: f64,
}

impl FieldPotential for P1Anharmonic234 {
    fn u(&self, r: &Vector3<f64>) -> f64 {
        let r2 = r.norm_squared();
        let r1 = r2.sqrt();
        self.k2 / 2.0 * r2 + self.k3 / 6.0 * r2 * r1 + self.k4 / 24.0 * r2 * r2
    }

    fn gradient(&self, r: &Vector3<f64>) -> Vector3<f64> {
        // du/dr / r = k2 + k3 r / 2 + k4 r² / 6
        let r2 = r.norm_squared();
        let r1 = r2.sqrt();
        (self.k2 + self.k3 * r1 / 2.0 + self.k4 * r2 / 6.0) * r
    }
}

/// Engine summing a field potential over every atom of a box.
///
/// Only atoms whose type has a potential assigned contribute. With sites
/// attached, each atom feels the field centered on its own site (through the
/// minimum image) instead of the origin.
pub struct FieldPotentialCompute {
    sim_box: Shared<SimBox>,
    potentials: Vec<Option<Box<dyn FieldPotential>>>,
    sites: Option<AgentManager<PositionSource>>,
    forces: Vec<Vector3<f64>>,
    last_energy: f64,
}

impl FieldPotentialCompute {
    pub fn new(sim_box: Shared<SimBox>) -> Self {
        Self {
            sim_box,
            potentials: Vec::new(),
            sites: None,
            forces: Vec::new(),
            last_energy: 0.0,
        }
    }

    /// Assign the field potential felt by atoms of `atom_type`.
    pub fn set_field_potential(&mut self, atom_type: usize, potential: Box<dyn FieldPotential>) {
        if self.potentials.len() <= atom_type {
            self.potentials.resize_with(atom_type + 1, || None);
        }
        self.potentials[atom_type] = Some(potential);
    }

    /// Center each atom's field on its recorded site.
    pub fn set_sites(&mut self, sites: AgentManager<PositionSource>) {
        self.sites = Some(sites);
    }

    pub fn sites(&self) -> Option<&AgentManager<PositionSource>> {
        self.sites.as_ref()
    }

    fn potential_for(&self, atom_type: usize) -> Option<&dyn FieldPotential> {
        self.potentials.get(atom_type).and_then(|p| p.as_deref())
    }
}

fn site_displacement(sites: Option<&AgentManager<PositionSource>>, atom: &Atom, sim_box: &SimBox) -> Vector3<f64> {
    match sites {
        Some(sites) => sim_box.boundary().nearest_image(&(atom.position - sites.agent(atom.leaf_index))),
        None => atom.position,
    }
}

impl PotentialCompute for FieldPotentialCompute {
    fn compute_all(&mut self, compute_forces: bool) -> f64 {
        let sim_box = self.sim_box.borrow();
        if compute_forces {
            self.forces.clear();
            self.forces.resize(sim_box.len(), Vector3::zeros());
        }

        let mut energy = 0.0;
        let sites = self.sites.as_ref();
        for atom in sim_box.atoms() {
            let Some(potential) = self.potentials.get(atom.atom_type).and_then(|p| p.as_deref()) else {
                continue;
            };
            let dr = site_displacement(sites, atom, &sim_box);
            energy += potential.u(&dr);
            if compute_forces {
                self.forces[atom.leaf_index] = -potential.gradient(&dr);
            }
        }
        self.last_energy = energy;
        energy
    }

    fn last_energy(&self) -> f64 {
        self.last_energy
    }

    fn forces(&self) -> &[Vector3<f64>] {
        &self.forces
    }
}

impl PotentialCalculation for FieldPotentialCompute {
    fn calculate_energy(&self, sim_box: &SimBox) -> f64 {
        sim_box
            .atoms()
            .iter()
            .filter_map(|atom| {
                self.potential_for(atom.atom_type)
                    .map(|p| p.u(&site_displacement(self.sites.as_ref(), atom, sim_box)))
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::Boundary;
    use crate::system::shared;
    use approx::assert_relative_eq;

    fn two_atom_box() -> Shared<SimBox> {
        shared(SimBox::from_positions(
            &[(0, Vector3::new(1.0, 0.0, 0.0)), (1, Vector3::new(0.0, 2.0, 2.0))],
            Boundary::NonPeriodic,
        ))
    }

    #[test]
    fn test_harmonic_field_energy_and_forces() {
        let sim_box = two_atom_box();
        let mut engine = FieldPotentialCompute::new(sim_box.clone());
        engine.set_field_potential(0, Box::new(P1Harmonic { k: 2.0 }));

        let energy = engine.compute_all(true);
        // ½·2·(1 + 8)
        assert_relative_eq!(energy, 9.0, epsilon = 1e-12);
        assert_relative_eq!(engine.last_energy(), 9.0, epsilon = 1e-12);
        assert_relative_eq!(engine.forces()[1].y, -4.0, epsilon = 1e-12);
        assert_relative_eq!(engine.calculate_energy(&sim_box.borrow()), 9.0, epsilon = 1e-12);
    }

    #[test]
    fn test_last_energy_is_stale_until_recompute() {
        let sim_box = two_atom_box();
        let mut engine = FieldPotentialCompute::new(sim_box.clone());
        engine.set_field_potential(0, Box::new(P1Harmonic { k: 1.0 }));
        engine.compute_all(false);
        let before = engine.last_energy();

        sim_box.borrow_mut().set_position(0, Vector3::zeros());
        assert_eq!(engine.last_energy(), before);
        assert_relative_eq!(engine.compute_all(false), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_field_centered_on_sites() {
        let sim_box = shared(SimBox::from_positions(&[(0, Vector3::new(4.5, 1.0, 0.0))], Boundary::cubic(10.0)));
        let mut engine = FieldPotentialCompute::new(sim_box.clone());
        engine.set_field_potential(0, Box::new(P1Harmonic { k: 2.0 }));
        engine.set_sites(AgentManager::new(PositionSource, &sim_box.borrow()));
        assert_eq!(engine.compute_all(true), 0.0);
        assert_eq!(engine.sites().map(|s| s.len()), Some(1));

        // one unit past the boundary along x is still one unit from the site
        sim_box.borrow_mut().set_position(0, Vector3::new(-4.5, 1.0, 0.0));
        assert_relative_eq!(engine.compute_all(true), 1.0, epsilon = 1e-12);
        assert_relative_eq!(engine.forces()[0].x, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_anharmonic_gradient_matches_finite_difference() {
        let p = P1Anharmonic234 { k2: 1.5, k3: -0.4, k4: 0.3 };
        let r = Vector3::new(0.3, -0.7, 1.1);
        let h = 1e-6;
        let grad = p.gradient(&r);
        for axis in 0..3 {
            let mut fwd = r;
            let mut bwd = r;
            fwd[axis] += h;
            bwd[axis] -= h;
            let numerical = (p.u(&fwd) - p.u(&bwd)) / (2.0 * h);
            assert_relative_eq!(grad[axis], numerical, epsilon = 1e-6);
        }
    }
}
