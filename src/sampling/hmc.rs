//! Hamiltonian (hybrid) Monte Carlo sampler.
//!
//! Each proposal integrates Hamiltonian dynamics for `dysteps` leapfrog
//! sub-steps with momenta drawn fresh from a standard normal, then applies
//! a single Metropolis correction comparing the kinetic-energy drift.

use nalgebra::Vector3;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use super::traits::{assign_where, Sampler, SamplingError, StepInfo, StepSample};
use crate::physics::quantum_force;
use crate::wavefunction::MultiWfn;

/// Hamiltonian dynamics parameters.
#[derive(Copy, Clone, Debug)]
pub struct HmcParams {
    /// Leapfrog sub-step size
    pub stepsize: f64,
    /// Discretization step entering the force clamp (`cutoff / tau`)
    pub tau: f64,
    /// Force-clamp numerator
    pub cutoff: f64,
    /// Leapfrog sub-steps per proposal
    pub dysteps: usize,
}

impl HmcParams {
    pub fn new(stepsize: f64, tau: f64, dysteps: usize) -> Self {
        assert!(stepsize > 0.0, "stepsize must be positive");
        assert!(tau > 0.0, "tau must be positive");
        assert!(dysteps >= 1, "at least one leapfrog sub-step");
        Self {
            stepsize,
            tau,
            cutoff: 1.0,
            dysteps,
        }
    }

    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff;
        self
    }

    fn clamp(&self) -> f64 {
        self.cutoff / self.tau
    }
}

/// Integrate leapfrog dynamics from `pos` for `steps` sub-steps.
///
/// Returns the end positions, end velocities, and the freshly drawn start
/// velocities. The integration works on its own accumulators; `pos` is
/// never mutated. Velocity updates use the half-kick / full-kick / half-kick
/// leapfrog splitting (interior kicks are doubled).
pub fn dynamics<W: MultiWfn, R: Rng>(
    wf: &W,
    pos: &[Vec<Vector3<f64>>],
    stepsize: f64,
    steps: usize,
    clamp: f64,
    rng: &mut R,
) -> Result<
    (
        Vec<Vec<Vector3<f64>>>,
        Vec<Vec<Vector3<f64>>>,
        Vec<Vec<Vector3<f64>>>,
    ),
    SamplingError,
> {
    assert!(steps >= 1, "at least one leapfrog sub-step");
    let normal = Normal::new(0.0, 1.0).unwrap();
    let v0: Vec<Vec<Vector3<f64>>> = pos
        .iter()
        .map(|r| {
            r.iter()
                .map(|_| {
                    Vector3::new(
                        normal.sample(rng),
                        normal.sample(rng),
                        normal.sample(rng),
                    )
                })
                .collect()
        })
        .collect();

    let (forces, _psis) = quantum_force(pos, wf, clamp)?;
    let mut v = add_scaled(&v0, &forces, stepsize);
    let mut p = add_scaled(pos, &v, stepsize);
    for _ in 1..steps {
        let (forces, _psis) = quantum_force(&p, wf, clamp)?;
        v = add_scaled(&v, &forces, 2.0 * stepsize);
        p = add_scaled(&p, &v, stepsize);
    }
    let (forces, _psis) = quantum_force(&p, wf, clamp)?;
    let v_end = add_scaled(&v, &forces, stepsize);

    Ok((p, v_end, v0))
}

fn add_scaled(
    a: &[Vec<Vector3<f64>>],
    b: &[Vec<Vector3<f64>>],
    s: f64,
) -> Vec<Vec<Vector3<f64>>> {
    a.iter()
        .zip(b.iter())
        .map(|(aw, bw)| aw.iter().zip(bw.iter()).map(|(ai, bi)| ai + bi * s).collect())
        .collect()
}

fn kinetic(v: &[Vector3<f64>]) -> f64 {
    v.iter().map(|vi| vi.norm_squared()).sum()
}

/// Hamiltonian Monte Carlo sampler over a walker batch.
///
/// Each [`step`](Sampler::step) reports the batch state *before* that
/// step's accepted moves are applied, matching the Metropolis sampler.
pub struct HamiltonianSampler<W: MultiWfn, R: Rng> {
    wf: W,
    rs: Vec<Vec<Vector3<f64>>>,
    params: HmcParams,
    rng: R,
}

impl<W: MultiWfn, R: Rng> HamiltonianSampler<W, R> {
    pub fn new(wf: W, rs: Vec<Vec<Vector3<f64>>>, params: HmcParams, rng: R) -> Self {
        assert!(!rs.is_empty(), "walker batch must not be empty");
        Self {
            wf,
            rs,
            params,
            rng,
        }
    }

    pub fn positions(&self) -> &[Vec<Vector3<f64>>] {
        &self.rs
    }
}

impl<W: MultiWfn, R: Rng> Sampler for HamiltonianSampler<W, R> {
    fn step(&mut self) -> Result<StepSample, SamplingError> {
        let n_walkers = self.rs.len();
        let (rs_new, v_end, v0) = dynamics(
            &self.wf,
            &self.rs,
            self.params.stepsize,
            self.params.dysteps,
            self.params.clamp(),
            &mut self.rng,
        )?;

        let psis: Vec<f64> = self.rs.iter().map(|r| self.wf.evaluate(r)).collect();
        let psis_new: Vec<f64> = rs_new.iter().map(|r| self.wf.evaluate(r)).collect();

        let accepted: Vec<bool> = (0..n_walkers)
            .map(|w| {
                let kinetic_drift = kinetic(&v_end[w]) - kinetic(&v0[w]);
                let ratio =
                    (psis_new[w] / psis[w]).powi(2) * (-0.5 * kinetic_drift).exp();
                ratio > self.rng.gen::<f64>()
            })
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::systems::GaussianWfn;

    struct ConstWfn;
    impl MultiWfn for ConstWfn {
        fn evaluate(&self, _r: &[Vector3<f64>]) -> f64 {
            1.0
        }
        fn derivative(&self, r: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
            vec![Vector3::zeros(); r.len()]
        }
    }

    fn batch(n_walkers: usize, n_electrons: usize) -> Vec<Vec<Vector3<f64>>> {
        vec![vec![Vector3::zeros(); n_electrons]; n_walkers]
    }

    #[test]
    fn test_dynamics_zero_force_preserves_velocity() {
        // With no force the leapfrog is free flight: v_end == v0.
        let mut rng = StdRng::seed_from_u64(13);
        let pos = batch(8, 2);
        let (p_end, v_end, v0) =
            dynamics(&ConstWfn, &pos, 0.1, 5, 10.0, &mut rng).unwrap();
        assert_eq!(v_end, v0);
        assert_ne!(p_end, pos);
    }

    #[test]
    fn test_constant_wavefunction_accepts_everything() {
        let rng = StdRng::seed_from_u64(17);
        let params = HmcParams::new(0.1, 0.1, 5);
        let mut sampler = HamiltonianSampler::new(ConstWfn, batch(16, 2), params, rng);
        for _ in 0..50 {
            let sample = sampler.step().unwrap();
            assert_relative_eq!(sample.info.acceptance, 1.0);
        }
    }

    #[test]
    fn test_snapshot_precedes_update() {
        let rng = StdRng::seed_from_u64(29);
        let init = batch(4, 1);
        let params = HmcParams::new(0.1, 0.1, 3);
        let mut sampler = HamiltonianSampler::new(ConstWfn, init.clone(), params, rng);
        let first = sampler.step().unwrap();
        assert_eq!(first.positions, init);
    }

    #[test]
    fn test_gaussian_stationary_variance() {
        let wf = GaussianWfn::new(0.5);
        let rng = StdRng::seed_from_u64(31);
        // Clamp kept far above any force this target produces so the
        // dynamics stay exactly Hamiltonian.
        let params = HmcParams::new(0.1, 0.01, 10);
        let mut sampler = HamiltonianSampler::new(wf, batch(200, 1), params, rng);

        for _ in 0..100 {
            sampler.step().unwrap();
        }
        let mut sum_sq = 0.0;
        let mut count = 0usize;
        for _ in 0..400 {
            let sample = sampler.step().unwrap();
            for walker in &sample.positions {
                for r in walker {
                    sum_sq += r.x * r.x + r.y * r.y + r.z * r.z;
                    count += 3;
                }
            }
        }
        let variance = sum_sq / count as f64;
        assert_relative_eq!(variance, wf.density_variance(), epsilon = 0.05);
    }
}
