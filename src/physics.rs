//! Quantum force evaluation.
//!
//! The drift force on electron i of a walker is ∇ᵢ log|Ψ| = ∇ᵢΨ / Ψ,
//! clamped in magnitude so walkers near a node of the wavefunction do not
//! pick up divergent drift.

use nalgebra::Vector3;

use crate::sampling::SamplingError;
use crate::wavefunction::MultiWfn;

/// Evaluate the drift force and amplitude for every walker in a batch.
///
/// `clamp` caps the norm of each per-electron force vector. Walkers whose
/// amplitude is zero or non-finite, or whose force blows up to a
/// non-finite value, are reported together in a single
/// [`SamplingError::Factorization`] carrying their indices.
pub fn quantum_force<W: MultiWfn>(
    rs: &[Vec<Vector3<f64>>],
    wf: &W,
    clamp: f64,
) -> Result<(Vec<Vec<Vector3<f64>>>, Vec<f64>), SamplingError> {
    let mut forces = Vec::with_capacity(rs.len());
    let mut psis = Vec::with_capacity(rs.len());
    let mut failed = Vec::new();

    for (w, r) in rs.iter().enumerate() {
        let psi = wf.evaluate(r);
        if psi == 0.0 || !psi.is_finite() {
            failed.push(w);
            forces.push(vec![Vector3::zeros(); r.len()]);
            psis.push(psi);
            continue;
        }
        let force: Vec<Vector3<f64>> = wf
            .derivative(r)
            .into_iter()
            .map(|g| clamp_norm(g / psi, clamp))
            .collect();
        if force.iter().any(|f| !f.norm_squared().is_finite()) {
            failed.push(w);
        }
        forces.push(force);
        psis.push(psi);
    }

    if !failed.is_empty() {
        return Err(SamplingError::Factorization {
            walkers: failed,
            positions: Vec::new(),
        });
    }
    Ok((forces, psis))
}

/// Rescale `f` so its norm does not exceed `clamp`.
fn clamp_norm(f: Vector3<f64>, clamp: f64) -> Vector3<f64> {
    let norm = f.norm();
    if norm > clamp {
        f * (clamp / norm)
    } else {
        f
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::systems::GaussianWfn;

    #[test]
    fn test_force_is_grad_log_psi() {
        // For Ψ = exp(-α Σ|rᵢ|²), ∇ᵢ log Ψ = -2α rᵢ.
        let wf = GaussianWfn::new(0.5);
        let rs = vec![vec![Vector3::new(0.3, -0.1, 0.2)]];
        let (forces, psis) = quantum_force(&rs, &wf, 1e6).unwrap();
        assert_relative_eq!(forces[0][0].x, -0.3, epsilon = 1e-10);
        assert_relative_eq!(forces[0][0].y, 0.1, epsilon = 1e-10);
        assert_relative_eq!(forces[0][0].z, -0.2, epsilon = 1e-10);
        assert!(psis[0] > 0.0);
    }

    #[test]
    fn test_clamp_caps_force_norm() {
        let wf = GaussianWfn::new(0.5);
        // Far from the origin the unclamped force is |r|, much larger than 0.5.
        let rs = vec![vec![Vector3::new(100.0, 0.0, 0.0)]];
        let (forces, _) = quantum_force(&rs, &wf, 0.5).unwrap();
        assert_relative_eq!(forces[0][0].norm(), 0.5, epsilon = 1e-10);
    }

    #[test]
    fn test_zero_amplitude_is_factorization_failure() {
        struct NodalWfn;
        impl MultiWfn for NodalWfn {
            fn evaluate(&self, r: &[Vector3<f64>]) -> f64 {
                if r[0].x < 0.0 {
                    0.0
                } else {
                    1.0
                }
            }
            fn derivative(&self, r: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
                vec![Vector3::zeros(); r.len()]
            }
        }

        let rs = vec![
            vec![Vector3::new(1.0, 0.0, 0.0)],
            vec![Vector3::new(-1.0, 0.0, 0.0)],
            vec![Vector3::new(-2.0, 0.0, 0.0)],
        ];
        let err = quantum_force(&rs, &NodalWfn, 1.0).unwrap_err();
        match err {
            SamplingError::Factorization { walkers, .. } => {
                assert_eq!(walkers, vec![1, 2]);
            }
            other => panic!("expected factorization failure, got {other:?}"),
        }
    }
}
