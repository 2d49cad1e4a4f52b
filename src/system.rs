//! Box and atom bookkeeping for ring-polymer systems.
//!
//! Each physical particle is represented by `n_beads` atoms (its ring polymer).
//! Atoms are stored molecule-major, so atom `m * n_beads + k` is bead `k` of
//! molecule `m`.

use std::cell::RefCell;
use std::rc::Rc;

use nalgebra::Vector3;

use crate::space::Boundary;

/// Shared, single-threaded handle used to wire boxes, engines and moves together.
pub type Shared<T> = Rc<RefCell<T>>;

/// Wrap a value in a [`Shared`] handle.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Smallest number of cubic cells per edge whose FCC lattice holds `n_molecules` sites.
pub fn fcc_cells_per_edge(n_molecules: usize) -> usize {
    let mut n_cells = 1;
    while 4 * n_cells * n_cells * n_cells < n_molecules {
        n_cells += 1;
    }
    n_cells
}

/// Whether `n_molecules` fills an FCC lattice exactly (`4 m^3` sites).
pub fn is_full_fcc(n_molecules: usize) -> bool {
    let n_cells = fcc_cells_per_edge(n_molecules);
    4 * n_cells * n_cells * n_cells == n_molecules
}

/// A single bead (or classical particle).
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Position in the box's leaf list.
    pub leaf_index: usize,
    /// Bead index inside the owning ring polymer.
    pub index: usize,
    /// Ring polymer this bead belongs to.
    pub molecule: usize,
    pub atom_type: usize,
    pub position: Vector3<f64>,
}

/// Container of all simulated atoms and their geometry.
#[derive(Debug, Clone)]
pub struct SimBox {
    atoms: Vec<Atom>,
    boundary: Boundary,
    n_beads: usize,
    n_molecules: usize,
}

impl SimBox {
    /// Create `n_molecules` ring polymers of `n_beads` beads each, all at the origin.
    pub fn ring_polymers(n_molecules: usize, n_beads: usize, boundary: Boundary) -> Self {
        let atoms = (0..n_molecules)
            .flat_map(|m| (0..n_beads).map(move |k| (m, k)))
            .enumerate()
            .map(|(leaf_index, (molecule, index))| Atom {
                leaf_index,
                index,
                molecule,
                atom_type: 0,
                position: Vector3::zeros(),
            })
            .collect();

        Self { atoms, boundary, n_beads, n_molecules }
    }

    /// Build a box from explicit `(bead index, position)` entries.
    ///
    /// Every entry becomes its own single-type molecule; this is the layout
    /// used when replicas are bookkept as independent particles.
    pub fn from_positions(entries: &[(usize, Vector3<f64>)], boundary: Boundary) -> Self {
        let atoms: Vec<Atom> = entries
            .iter()
            .enumerate()
            .map(|(leaf_index, &(index, position))| Atom {
                leaf_index,
                index,
                molecule: leaf_index,
                atom_type: 0,
                position,
            })
            .collect();
        let n_molecules = atoms.len();

        Self { atoms, boundary, n_beads: 1, n_molecules }
    }

    /// Put every molecule on a site of an FCC lattice filling the box.
    ///
    /// The box holds [`fcc_cells_per_edge`] cubic cells per edge with a four-site
    /// basis, and molecule 0 sits at the origin. All beads of a molecule share
    /// its site. Open boundaries use a unit cell edge.
    pub fn place_on_fcc_lattice(&mut self) {
        const BASIS: [[f64; 3]; 4] = [[0.0, 0.0, 0.0], [0.5, 0.5, 0.0], [0.5, 0.0, 0.5], [0.0, 0.5, 0.5]];

        let n_cells = fcc_cells_per_edge(self.n_molecules);
        let cell_edge = match self.boundary.dimensions() {
            Some(d) => d / n_cells as f64,
            None => Vector3::repeat(1.0),
        };
        let boundary = self.boundary;

        for atom in self.atoms.iter_mut() {
            let cell = atom.molecule / 4;
            let basis = BASIS[atom.molecule % 4];
            let site = Vector3::new(
                (cell % n_cells) as f64 + basis[0],
                ((cell / n_cells) % n_cells) as f64 + basis[1],
                (cell / (n_cells * n_cells)) as f64 + basis[2],
            );
            atom.position = boundary.nearest_image(&site.component_mul(&cell_edge));
        }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, leaf_index: usize) -> &Atom {
        &self.atoms[leaf_index]
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn n_beads(&self) -> usize {
        self.n_beads
    }

    pub fn n_molecules(&self) -> usize {
        self.n_molecules
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn set_boundary(&mut self, boundary: Boundary) {
        self.boundary = boundary;
    }

    /// Leaf indices of the beads of molecule `m`, in bead order.
    pub fn molecule_atoms(&self, m: usize) -> std::ops::Range<usize> {
        m * self.n_beads..(m + 1) * self.n_beads
    }

    pub fn set_position(&mut self, leaf_index: usize, position: Vector3<f64>) {
        self.atoms[leaf_index].position = position;
    }

    pub fn positions(&self) -> Vec<Vector3<f64>> {
        self.atoms.iter().map(|a| a.position).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ring_polymer_layout() {
        let sim_box = SimBox::ring_polymers(3, 4, Boundary::cubic(5.0));
        assert_eq!(sim_box.len(), 12);
        let atom = sim_box.atom(6);
        assert_eq!(atom.molecule, 1);
        assert_eq!(atom.index, 2);
        assert_eq!(atom.leaf_index, 6);
        assert_eq!(sim_box.molecule_atoms(2), 8..12);
    }

    fn min_site_distance(sim_box: &SimBox) -> f64 {
        let mut min = f64::INFINITY;
        for a in 0..sim_box.n_molecules() {
            for b in (a + 1)..sim_box.n_molecules() {
                let ra = sim_box.atom(sim_box.molecule_atoms(a).start).position;
                let rb = sim_box.atom(sim_box.molecule_atoms(b).start).position;
                min = min.min(sim_box.boundary().nearest_image(&(rb - ra)).norm());
            }
        }
        min
    }

    #[test]
    fn test_fcc_cell_count() {
        assert_eq!(fcc_cells_per_edge(1), 1);
        assert_eq!(fcc_cells_per_edge(4), 1);
        assert_eq!(fcc_cells_per_edge(32), 2);
        assert_eq!(fcc_cells_per_edge(33), 3);
        assert_eq!(fcc_cells_per_edge(256), 4);
        assert!(is_full_fcc(108));
        assert!(!is_full_fcc(27));
    }

    #[test]
    fn test_fcc_lattice_fills_box() {
        let length = 4.0;
        let mut sim_box = SimBox::ring_polymers(32, 3, Boundary::cubic(length));
        sim_box.place_on_fcc_lattice();

        for m in 0..32 {
            let range = sim_box.molecule_atoms(m);
            let first = sim_box.atom(range.start).position;
            for i in range {
                assert_eq!(sim_box.atom(i).position, first);
            }
            assert!(first.iter().all(|x| x.abs() <= 0.5 * length));
        }
        assert_eq!(sim_box.atom(0).position, Vector3::zeros());
        // cell edge 2, nearest neighbors at half a face diagonal
        assert_relative_eq!(min_site_distance(&sim_box), 2f64.sqrt(), epsilon = 1e-12);
        // every site has 12 nearest neighbors, so no site is doubly occupied or empty
        let r0 = sim_box.atom(0).position;
        let shell = (1..32)
            .map(|m| sim_box.atom(sim_box.molecule_atoms(m).start).position)
            .filter(|r| (sim_box.boundary().nearest_image(&(r - r0)).norm() - 2f64.sqrt()).abs() < 1e-9)
            .count();
        assert_eq!(shell, 12);
    }

    #[test]
    fn test_fcc_at_unit_density_sits_at_lj_minimum() {
        let n = 256;
        let mut sim_box = SimBox::ring_polymers(n, 1, Boundary::cubic((n as f64).cbrt()));
        sim_box.place_on_fcc_lattice();
        assert_relative_eq!(min_site_distance(&sim_box), 2f64.powf(1.0 / 6.0), epsilon = 1e-9);
    }

    #[test]
    fn test_from_positions_keeps_bead_index() {
        let sim_box = SimBox::from_positions(
            &[(0, Vector3::zeros()), (1, Vector3::x()), (0, Vector3::y())],
            Boundary::NonPeriodic,
        );
        assert_eq!(sim_box.n_molecules(), 3);
        assert_eq!(sim_box.atom(1).index, 1);
        assert_eq!(sim_box.atom(2).molecule, 2);
        assert_eq!(sim_box.molecule_atoms(2), 2..3);
    }
}
