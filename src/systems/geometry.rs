//! Molecular geometry: atom coordinates and integer nuclear charges.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Atomic geometry of a molecule.
///
/// Charges are integer nuclear charges; walker initialization assigns
/// electrons to atoms with probability proportional to them.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Geometry {
    /// Atom coordinates (Bohr)
    pub coords: Vec<Vector3<f64>>,
    /// Nuclear charge of each atom
    pub charges: Vec<u32>,
}

impl Geometry {
    pub fn new(coords: Vec<Vector3<f64>>, charges: Vec<u32>) -> Self {
        assert_eq!(
            coords.len(),
            charges.len(),
            "one charge per atom coordinate"
        );
        Self { coords, charges }
    }

    pub fn n_atoms(&self) -> usize {
        self.coords.len()
    }

    /// Electron count of the neutral molecule.
    pub fn n_electrons(&self) -> usize {
        self.charges.iter().map(|&z| z as usize).sum()
    }
}
