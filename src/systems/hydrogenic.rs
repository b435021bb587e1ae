//! Hydrogen-like LCAO trial wavefunction over an arbitrary geometry.
//!
//! Each electron occupies the same molecular orbital, a sum of Slater 1s
//! functions centered on the atoms: Ψ(R) = Πᵢ Σ_A φ_A(rᵢ). Crude as a trial
//! state, but smooth, strictly positive, and cheap, which is what walker
//! equilibration needs.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::systems::Geometry;
use crate::wavefunction::{SingleWfn, MultiWfn};

/// Slater 1s orbital centered at position `center` with exponent `alpha`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Slater1s {
    /// Orbital exponent
    pub alpha: f64,
    /// Center position of the orbital
    pub center: Vector3<f64>,
}

impl SingleWfn for Slater1s {
    fn evaluate(&self, r: &Vector3<f64>) -> f64 {
        let dr = r - self.center;
        (-self.alpha * dr.norm()).exp()
    }

    fn derivative(&self, r: &Vector3<f64>) -> Vector3<f64> {
        let dr = r - self.center;
        let r_norm = dr.norm();
        if r_norm == 0.0 {
            return Vector3::zeros();
        }
        let scalar = -self.alpha / r_norm * (-self.alpha * r_norm).exp();
        dr * scalar
    }
}

/// Product-of-LCAO wavefunction: one Slater 1s orbital per atom, exponent
/// equal to the nuclear charge.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Hydrogenic {
    pub orbitals: Vec<Slater1s>,
}

impl Hydrogenic {
    pub fn from_geometry(geom: &Geometry) -> Self {
        let orbitals = geom
            .coords
            .iter()
            .zip(geom.charges.iter())
            .map(|(&center, &z)| Slater1s {
                alpha: z as f64,
                center,
            })
            .collect();
        Self { orbitals }
    }

    /// Molecular orbital value Σ_A φ_A(r). Strictly positive.
    fn orbital_sum(&self, r: &Vector3<f64>) -> f64 {
        self.orbitals.iter().map(|o| o.evaluate(r)).sum()
    }

    fn orbital_sum_derivative(&self, r: &Vector3<f64>) -> Vector3<f64> {
        self.orbitals
            .iter()
            .fold(Vector3::zeros(), |acc, o| acc + o.derivative(r))
    }
}

impl MultiWfn for Hydrogenic {
    fn evaluate(&self, r: &[Vector3<f64>]) -> f64 {
        r.iter().map(|ri| self.orbital_sum(ri)).product()
    }

    fn derivative(&self, r: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
        let phis: Vec<f64> = r.iter().map(|ri| self.orbital_sum(ri)).collect();
        let psi: f64 = phis.iter().product();
        r.iter()
            .zip(phis.iter())
            .map(|(ri, &phi)| self.orbital_sum_derivative(ri) * (psi / phi))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn h2_like() -> Hydrogenic {
        let geom = Geometry::new(
            vec![Vector3::new(0.0, 0.0, 0.7), Vector3::new(0.0, 0.0, -0.7)],
            vec![1, 1],
        );
        Hydrogenic::from_geometry(&geom)
    }

    #[test]
    fn test_positive_everywhere() {
        let wf = h2_like();
        let r = vec![
            Vector3::new(2.0, -3.0, 1.0),
            Vector3::new(-1.0, 0.5, -4.0),
        ];
        assert!(wf.evaluate(&r) > 0.0);
    }

    #[test]
    fn test_analytic_vs_numerical_derivative() {
        let wf = h2_like();
        let r = vec![
            Vector3::new(0.4, 0.3, 0.9),
            Vector3::new(-0.6, 0.2, -0.5),
        ];
        let analytic = wf.derivative(&r);
        let numerical = wf.numerical_derivative(&r, 1e-5);
        for (a, n) in analytic.iter().zip(numerical.iter()) {
            assert_relative_eq!(a.x, n.x, epsilon = 1e-6);
            assert_relative_eq!(a.y, n.y, epsilon = 1e-6);
            assert_relative_eq!(a.z, n.z, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_slater_derivative_at_center() {
        let orb = Slater1s {
            alpha: 1.0,
            center: Vector3::new(1.0, 0.0, 0.0),
        };
        assert_eq!(orb.derivative(&Vector3::new(1.0, 0.0, 0.0)), Vector3::zeros());
    }
}
