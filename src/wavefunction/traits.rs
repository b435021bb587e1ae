//! Wave function traits consumed by the samplers.
//!
//! Provides `SingleWfn` for single-center orbitals and `MultiWfn` for
//! multi-electron wavefunctions. A `MultiWfn` must be square-integrable and
//! expose an analytic gradient; the drift force is derived from it.

use nalgebra::Vector3;

/// Single-center wavefunction trait (e.g., atomic orbitals).
pub trait SingleWfn {
    /// Evaluate the orbital at position `r`.
    fn evaluate(&self, r: &Vector3<f64>) -> f64;

    /// Compute the gradient at position `r`.
    fn derivative(&self, r: &Vector3<f64>) -> Vector3<f64>;

    /// Numerical gradient using central difference.
    fn numerical_derivative(&self, r: &Vector3<f64>, h: f64) -> Vector3<f64> {
        let mut grad = Vector3::zeros();
        for axis in 0..3 {
            let mut r_fwd = *r;
            let mut r_bwd = *r;
            r_fwd[axis] += h;
            r_bwd[axis] -= h;
            grad[axis] = (self.evaluate(&r_fwd) - self.evaluate(&r_bwd)) / (2.0 * h);
        }
        grad
    }
}

/// Multi-electron wavefunction trait.
///
/// `r` holds one 3-vector per electron; the electron count is fixed for the
/// lifetime of a chain sampling this wavefunction.
pub trait MultiWfn {
    /// Evaluate the wavefunction at positions `r`.
    fn evaluate(&self, r: &[Vector3<f64>]) -> f64;

    /// Compute gradients with respect to all electron positions.
    fn derivative(&self, r: &[Vector3<f64>]) -> Vec<Vector3<f64>>;

    /// Numerical gradients using central difference.
    fn numerical_derivative(&self, r: &[Vector3<f64>], h: f64) -> Vec<Vector3<f64>> {
        let mut grad = vec![Vector3::zeros(); r.len()];
        for i in 0..r.len() {
            for axis in 0..3 {
                let mut r_fwd = r.to_vec();
                let mut r_bwd = r.to_vec();
                r_fwd[i][axis] += h;
                r_bwd[i][axis] -= h;
                grad[i][axis] = (self.evaluate(&r_fwd) - self.evaluate(&r_bwd)) / (2.0 * h);
            }
        }
        grad
    }
}
