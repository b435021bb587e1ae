//! Isotropic Gaussian trial wavefunction.
//!
//! Ψ(R) = exp(-α Σᵢ |rᵢ|²). The squared amplitude is a product of normal
//! densities with per-coordinate variance 1/(4α), which makes this the
//! reference system for checking that every sampler reproduces the same
//! stationary distribution.

use nalgebra::Vector3;

use crate::wavefunction::MultiWfn;

/// Gaussian wavefunction centered at the origin.
#[derive(Debug, Clone, Copy)]
pub struct GaussianWfn {
    /// Exponent α
    pub alpha: f64,
}

impl GaussianWfn {
    pub fn new(alpha: f64) -> Self {
        assert!(alpha > 0.0, "exponent must be positive");
        Self { alpha }
    }

    /// Per-coordinate variance of the squared-amplitude density.
    pub fn density_variance(&self) -> f64 {
        1.0 / (4.0 * self.alpha)
    }
}

impl MultiWfn for GaussianWfn {
    fn evaluate(&self, r: &[Vector3<f64>]) -> f64 {
        let sum_sq: f64 = r.iter().map(|ri| ri.norm_squared()).sum();
        (-self.alpha * sum_sq).exp()
    }

    fn derivative(&self, r: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
        let psi = self.evaluate(r);
        r.iter().map(|ri| ri * (-2.0 * self.alpha * psi)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_evaluate_at_origin() {
        let wf = GaussianWfn::new(0.5);
        let r = vec![Vector3::zeros(), Vector3::zeros()];
        assert_relative_eq!(wf.evaluate(&r), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_analytic_vs_numerical_derivative() {
        let wf = GaussianWfn::new(0.7);
        let r = vec![
            Vector3::new(0.3, -0.2, 0.5),
            Vector3::new(-0.8, 0.1, 0.4),
        ];
        let analytic = wf.derivative(&r);
        let numerical = wf.numerical_derivative(&r, 1e-5);
        for (a, n) in analytic.iter().zip(numerical.iter()) {
            assert_relative_eq!(a.x, n.x, epsilon = 1e-6);
            assert_relative_eq!(a.y, n.y, epsilon = 1e-6);
            assert_relative_eq!(a.z, n.z, epsilon = 1e-6);
        }
    }
}
