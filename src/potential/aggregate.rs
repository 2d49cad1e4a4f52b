//! Sum of several engines acting on the same box.

use nalgebra::Vector3;

use super::traits::PotentialCompute;
use crate::system::Shared;

/// Engine whose energy and forces are weighted sums over its members.
///
/// Members added with [`PotentialComputeAggregate::new`] or
/// [`PotentialComputeAggregate::add`] carry weight 1.
pub struct PotentialComputeAggregate {
    members: Vec<(f64, Shared<dyn PotentialCompute>)>,
    forces: Vec<Vector3<f64>>,
    last_energy: f64,
}

impl PotentialComputeAggregate {
    pub fn new(members: Vec<Shared<dyn PotentialCompute>>) -> Self {
        let members = members.into_iter().map(|m| (1.0, m)).collect();
        Self { members, forces: Vec::new(), last_energy: 0.0 }
    }

    pub fn add(&mut self, member: Shared<dyn PotentialCompute>) {
        self.members.push((1.0, member));
    }

    /// Add a member whose energy and forces are scaled by `weight`.
    pub fn add_scaled(&mut self, member: Shared<dyn PotentialCompute>, weight: f64) {
        self.members.push((weight, member));
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl PotentialCompute for PotentialComputeAggregate {
    fn compute_all(&mut self, compute_forces: bool) -> f64 {
        let mut energy = 0.0;
        if compute_forces {
            self.forces.clear();
        }
        for (weight, member) in &self.members {
            let mut member = member.borrow_mut();
            energy += weight * member.compute_all(compute_forces);
            if compute_forces {
                let forces = member.forces();
                if self.forces.len() < forces.len() {
                    self.forces.resize(forces.len(), Vector3::zeros());
                }
                for (total, f) in self.forces.iter_mut().zip(forces) {
                    *total += f * *weight;
                }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::potential::{BondingPotentialCompute, FieldPotentialCompute, P1Harmonic};
    use crate::space::Boundary;
    use crate::system::{shared, SimBox};
    use approx::assert_relative_eq;

    #[test]
    fn test_aggregate_sums_members() {
        let mut sim_box = SimBox::ring_polymers(1, 3, Boundary::NonPeriodic);
        sim_box.set_position(0, Vector3::new(1.0, 0.0, 0.0));
        sim_box.set_position(1, Vector3::new(0.0, 1.0, 0.0));
        let sim_box = shared(sim_box);

        let mut field = FieldPotentialCompute::new(sim_box.clone());
        field.set_field_potential(0, Box::new(P1Harmonic { k: 1.0 }));
        let field = shared(field);
        let bonding = shared(BondingPotentialCompute::ring(sim_box.clone(), 2.0));

        let mut aggregate = PotentialComputeAggregate::new(vec![
            field.clone() as Shared<dyn PotentialCompute>,
            bonding.clone() as Shared<dyn PotentialCompute>,
        ]);
        let total = aggregate.compute_all(true);
        let expected = field.borrow().last_energy() + bonding.borrow().last_energy();
        assert_relative_eq!(total, expected, epsilon = 1e-12);
        // field ½·(1 + 1) and springs ½·2·(2 + 1 + 1)
        assert_relative_eq!(total, 5.0, epsilon = 1e-12);

        let f_field = field.borrow().forces()[2];
        let f_bond = bonding.borrow().forces()[2];
        assert_relative_eq!((aggregate.forces()[2] - f_field - f_bond).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_scaled_members_interpolate() {
        let sim_box = shared(SimBox::from_positions(&[(0, Vector3::new(0.0, 0.0, 2.0))], Boundary::NonPeriodic));
        let mut soft = FieldPotentialCompute::new(sim_box.clone());
        soft.set_field_potential(0, Box::new(P1Harmonic { k: 1.0 }));
        let mut stiff = FieldPotentialCompute::new(sim_box.clone());
        stiff.set_field_potential(0, Box::new(P1Harmonic { k: 3.0 }));

        let mut aggregate = PotentialComputeAggregate::new(Vec::new());
        assert!(aggregate.is_empty());
        aggregate.add_scaled(shared(soft), 0.25);
        aggregate.add_scaled(shared(stiff), 0.75);
        assert_eq!(aggregate.len(), 2);

        // 0.25·2 + 0.75·6
        assert_relative_eq!(aggregate.compute_all(true), 5.0, epsilon = 1e-12);
        // -(0.25·1 + 0.75·3)·2
        assert_relative_eq!(aggregate.forces()[0].z, -5.0, epsilon = 1e-12);
    }
}
