//! Metropolis sampler with an independence proposal.
//!
//! Proposals are drawn fresh from an isotropic Gaussian scaled by
//! `stepsize`, independent of the walker's current position, so the
//! acceptance ratio is the bare squared-amplitude ratio with no
//! Hastings correction.

use nalgebra::Vector3;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use super::traits::{assign_where, Sampler, SamplingError, StepInfo, StepSample};
use crate::wavefunction::MultiWfn;

/// Metropolis sampler over a walker batch.
///
/// Each [`step`](Sampler::step) reports the batch state *before* that
/// step's accepted moves are applied, so the first snapshot is the initial
/// configuration.
pub struct MetropolisSampler<W: MultiWfn, R: Rng> {
    wf: W,
    rs: Vec<Vec<Vector3<f64>>>,
    stepsize: f64,
    rng: R,
}

impl<W: MultiWfn, R: Rng> MetropolisSampler<W, R> {
    pub fn new(wf: W, rs: Vec<Vec<Vector3<f64>>>, stepsize: f64, rng: R) -> Self {
        assert!(!rs.is_empty(), "walker batch must not be empty");
        assert!(stepsize > 0.0, "stepsize must be positive");
        Self {
            wf,
            rs,
            stepsize,
            rng,
        }
    }

    pub fn positions(&self) -> &[Vec<Vector3<f64>>] {
        &self.rs
    }
}

impl<W: MultiWfn, R: Rng> Sampler for MetropolisSampler<W, R> {
    fn step(&mut self) -> Result<StepSample, SamplingError> {
        let n_walkers = self.rs.len();
        let normal = Normal::new(0.0, self.stepsize).unwrap();

        let rs_new: Vec<Vec<Vector3<f64>>> = self
            .rs
            .iter()
            .map(|r| {
                r.iter()
                    .map(|_| {
                        Vector3::new(
                            normal.sample(&mut self.rng),
                            normal.sample(&mut self.rng),
                            normal.sample(&mut self.rng),
                        )
                    })
                    .collect()
            })
            .collect();

        let psis: Vec<f64> = self.rs.iter().map(|r| self.wf.evaluate(r)).collect();
        let psis_new: Vec<f64> = rs_new.iter().map(|r| self.wf.evaluate(r)).collect();

        let accepted: Vec<bool> = psis
            .iter()
            .zip(psis_new.iter())
            .map(|(&psi, &psi_new)| (psi_new / psi).powi(2) > self.rng.gen::<f64>())
            .collect();

        let acceptance =
            accepted.iter().filter(|&&a| a).count() as f64 / n_walkers as f64;
        let sample = StepSample {
            positions: self.rs.clone(),
            psis,
            info: StepInfo {
                acceptance,
                lifetime: None,
            },
        };

        assign_where(&mut self.rs, &rs_new, &accepted);
        Ok(sample)
    }
}
