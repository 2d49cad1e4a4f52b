//! Per-atom agents: objects created for each atom of a box and released with it.
//!
//! [`PositionSource`] is the agent source used for reference sites. It snapshots
//! each atom's position when the agent is made; the site never follows the
//! atom afterwards.

use nalgebra::Vector3;
use tracing::trace;

use crate::system::{Atom, SimBox};

/// Creates and releases one agent per atom.
pub trait AgentSource {
    type Agent;

    /// Build the agent for `atom`, owned by `sim_box`.
    fn make_agent(&self, atom: &Atom, sim_box: &SimBox) -> Self::Agent;

    /// Tear down an agent created by [`AgentSource::make_agent`].
    fn release_agent(&self, agent: Self::Agent, atom: &Atom, sim_box: &SimBox);
}

/// Agent source producing a snapshot of each atom's position.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionSource;

impl AgentSource for PositionSource {
    type Agent = Vector3<f64>;

    fn make_agent(&self, atom: &Atom, _sim_box: &SimBox) -> Vector3<f64> {
        atom.position
    }

    fn release_agent(&self, _agent: Vector3<f64>, _atom: &Atom, _sim_box: &SimBox) {}
}

/// Holds one agent per atom of a box, indexed by leaf index.
pub struct AgentManager<S: AgentSource> {
    source: S,
    agents: Vec<S::Agent>,
}

impl<S: AgentSource> AgentManager<S> {
    /// Make agents for every atom currently in `sim_box`.
    pub fn new(source: S, sim_box: &SimBox) -> Self {
        let agents = sim_box
            .atoms()
            .iter()
            .map(|atom| source.make_agent(atom, sim_box))
            .collect::<Vec<_>>();
        trace!(count = agents.len(), "created atom agents");
        Self { source, agents }
    }

    pub fn agent(&self, leaf_index: usize) -> &S::Agent {
        &self.agents[leaf_index]
    }

    pub fn agents(&self) -> &[S::Agent] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Release every agent back through its source.
    pub fn release_all(self, sim_box: &SimBox) {
        let count = self.agents.len();
        for (agent, atom) in self.agents.into_iter().zip(sim_box.atoms()) {
            self.source.release_agent(agent, atom, sim_box);
        }
        trace!(count, "released atom agents");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::Boundary;
    use std::cell::Cell;

    #[test]
    fn test_position_agent_is_snapshot() {
        let mut sim_box = SimBox::from_positions(
            &[(0, Vector3::new(1.0, 2.0, 3.0)), (0, Vector3::new(-1.0, 0.0, 0.5))],
            Boundary::NonPeriodic,
        );
        let source = PositionSource;
        let site = source.make_agent(sim_box.atom(0), &sim_box);
        assert_eq!(site, Vector3::new(1.0, 2.0, 3.0));

        sim_box.set_position(0, Vector3::new(7.0, 7.0, 7.0));
        assert_eq!(site, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(sim_box.atom(0).position, Vector3::new(7.0, 7.0, 7.0));
    }

    #[test]
    fn test_manager_sites_survive_moves() {
        let mut sim_box = SimBox::ring_polymers(2, 2, Boundary::cubic(4.0));
        sim_box.place_on_fcc_lattice();
        let before = sim_box.positions();

        let manager = AgentManager::new(PositionSource, &sim_box);
        for i in 0..sim_box.len() {
            sim_box.set_position(i, Vector3::repeat(0.25 * i as f64));
        }
        assert_eq!(manager.len(), 4);
        for (i, site) in manager.agents().iter().enumerate() {
            assert_eq!(*site, before[i]);
        }
        manager.release_all(&sim_box);
    }

    struct CountingSource {
        released: Cell<usize>,
    }

    impl AgentSource for &CountingSource {
        type Agent = usize;

        fn make_agent(&self, atom: &Atom, _sim_box: &SimBox) -> usize {
            atom.leaf_index
        }

        fn release_agent(&self, agent: usize, atom: &Atom, _sim_box: &SimBox) {
            assert_eq!(agent, atom.leaf_index);
            self.released.set(self.released.get() + 1);
        }
    }

    #[test]
    fn test_release_all_visits_every_agent() {
        let sim_box = SimBox::ring_polymers(3, 2, Boundary::NonPeriodic);
        let source = CountingSource { released: Cell::new(0) };
        let manager = AgentManager::new(&source, &sim_box);
        assert_eq!(*manager.agent(5), 5);
        manager.release_all(&sim_box);
        assert_eq!(source.released.get(), 6);
    }
}
