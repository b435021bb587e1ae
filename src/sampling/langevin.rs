//! Langevin sampler: discretized drift-diffusion proposals with a
//! Metropolis-Hastings correction.
//!
//! Proposals follow the quantum force for a time step τ plus Gaussian
//! diffusion of width √τ. The asymmetry of the drifted proposal is
//! corrected with the symmetrized trapezoidal Green's-function ratio.

use nalgebra::Vector3;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use super::traits::{assign_where, Sampler, SamplingError, StepInfo, StepSample};
use crate::physics::quantum_force;
use crate::wavefunction::MultiWfn;

/// Langevin discretization parameters.
#[derive(Copy, Clone, Debug)]
pub struct LangevinParams {
    /// Diffusion time step τ
    pub tau: f64,
    /// Force-clamp numerator; the per-electron force norm is capped at
    /// `cutoff / tau`
    pub cutoff: f64,
}

impl LangevinParams {
    pub fn new(tau: f64) -> Self {
        assert!(tau > 0.0, "tau must be positive");
        Self { tau, cutoff: 1.0 }
    }

    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff;
        self
    }

    fn clamp(&self) -> f64 {
        self.cutoff / self.tau
    }
}

/// Langevin sampler over a walker batch.
///
/// Positions, amplitudes, and forces are held together and updated jointly
/// under one acceptance mask per step. Unlike the Metropolis and
/// Hamiltonian samplers, each [`step`](Sampler::step) reports the state
/// *after* the step's accepted moves are applied, so the first snapshot
/// already reflects one transition.
pub struct LangevinSampler<W: MultiWfn, R: Rng> {
    wf: W,
    rs: Vec<Vec<Vector3<f64>>>,
    psis: Vec<f64>,
    forces: Vec<Vec<Vector3<f64>>>,
    lifetime: Vec<u64>,
    params: LangevinParams,
    rng: R,
}

impl<W: MultiWfn, R: Rng> LangevinSampler<W, R> {
    /// Evaluates the force field at the starting batch; a factorization
    /// failure there is propagated immediately.
    pub fn new(
        wf: W,
        rs: Vec<Vec<Vector3<f64>>>,
        params: LangevinParams,
        rng: R,
    ) -> Result<Self, SamplingError> {
        assert!(!rs.is_empty(), "walker batch must not be empty");
        let (forces, psis) = quantum_force(&rs, &wf, params.clamp())?;
        let lifetime = vec![0; rs.len()];
        Ok(Self {
            wf,
            rs,
            psis,
            forces,
            lifetime,
            params,
            rng,
        })
    }

    pub fn positions(&self) -> &[Vec<Vector3<f64>>] {
        &self.rs
    }

    /// Consecutive rejected steps per walker since the last acceptance.
    pub fn lifetime(&self) -> &[u64] {
        &self.lifetime
    }
}

impl<W: MultiWfn, R: Rng> Sampler for LangevinSampler<W, R> {
    fn step(&mut self) -> Result<StepSample, SamplingError> {
        let n_walkers = self.rs.len();
        let tau = self.params.tau;
        let sqrt_tau = tau.sqrt();
        let normal = Normal::new(0.0, 1.0).unwrap();

        let rs_new: Vec<Vec<Vector3<f64>>> = self
            .rs
            .iter()
            .zip(self.forces.iter())
            .map(|(r, f)| {
                r.iter()
                    .zip(f.iter())
                    .map(|(ri, fi)| {
                        let noise = Vector3::new(
                            normal.sample(&mut self.rng),
                            normal.sample(&mut self.rng),
                            normal.sample(&mut self.rng),
                        );
                        ri + fi * tau + noise * sqrt_tau
                    })
                    .collect()
            })
            .collect();

        let (forces_new, psis_new) =
            match quantum_force(&rs_new, &self.wf, self.params.clamp()) {
                Ok(pair) => pair,
                Err(SamplingError::Factorization { walkers, .. }) => {
                    // Attach the pre-proposal positions of the failing
                    // walkers for diagnosis before propagating.
                    let positions =
                        walkers.iter().map(|&w| self.rs[w].clone()).collect();
                    return Err(SamplingError::Factorization { walkers, positions });
                }
                Err(e) => return Err(e),
            };

        // Symmetrized trapezoidal Green's-function log-ratio, summed over
        // electrons: Σ (F + F')·((r − r') + τ/2 (F − F')).
        let log_g_ratios: Vec<f64> = (0..n_walkers)
            .map(|w| {
                self.forces[w]
                    .iter()
                    .zip(forces_new[w].iter())
                    .zip(self.rs[w].iter().zip(rs_new[w].iter()))
                    .map(|((f, f_new), (r, r_new))| {
                        (f + f_new).dot(&((r - r_new) + (f - f_new) * (tau / 2.0)))
                    })
                    .sum()
            })
            .collect();

        let accepted: Vec<bool> = log_g_ratios
            .iter()
            .zip(self.psis.iter().zip(psis_new.iter()))
            .map(|(&log_g, (&psi, &psi_new))| {
                log_g.exp() * (psi_new / psi).powi(2) > self.rng.gen::<f64>()
            })
            .collect();

        for (life, &acc) in self.lifetime.iter_mut().zip(accepted.iter()) {
            *life = if acc { 0 } else { *life + 1 };
        }
        let acceptance =
            accepted.iter().filter(|&&a| a).count() as f64 / n_walkers as f64;
        let info = StepInfo {
            acceptance,
            lifetime: Some(self.lifetime.clone()),
        };

        assign_where(&mut self.rs, &rs_new, &accepted);
        assign_where(&mut self.psis, &psis_new, &accepted);
        assign_where(&mut self.forces, &forces_new, &accepted);

        Ok(StepSample {
            positions: self.rs.clone(),
            psis: self.psis.clone(),
            info,
        })
    }
}
