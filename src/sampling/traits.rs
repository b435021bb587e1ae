//! Traits and shared types for Monte Carlo sampling.

use nalgebra::Vector3;
use thiserror::Error;

/// Failure kinds raised by the sampling core.
#[derive(Error, Debug)]
pub enum SamplingError {
    /// The wavefunction could not be factorized at some configurations
    /// (zero or non-finite amplitude, typically at a node). Carries the
    /// indices of the failing walkers; the Langevin sampler additionally
    /// attaches their pre-proposal positions before propagating.
    #[error("wavefunction factorization failed for {} walker(s)", .walkers.len())]
    Factorization {
        walkers: Vec<usize>,
        positions: Vec<Vec<Vector3<f64>>>,
    },

    /// A trajectory window retained no steps. The discard/decorrelate
    /// settings exceeded the pulled range.
    #[error(
        "no samples retained out of {n_pulled} pulled steps \
         (n_discard = {n_discard}, n_decorrelate = {n_decorrelate})"
    )]
    EmptySample {
        n_pulled: usize,
        n_discard: usize,
        n_decorrelate: usize,
    },
}

/// Per-step sampler diagnostics.
#[derive(Clone, Debug)]
pub struct StepInfo {
    /// Fraction of walkers that accepted this step's proposal.
    pub acceptance: f64,
    /// Consecutive-rejection counters, reported by the Langevin sampler only.
    pub lifetime: Option<Vec<u64>>,
}

/// One step's snapshot of a walker batch.
///
/// Which chain state the snapshot reflects is a per-sampler contract:
/// Metropolis and Hamiltonian samplers report the state *before* this
/// step's accepted moves are applied, the Langevin sampler the state
/// *after*. See each sampler's documentation.
#[derive(Clone, Debug)]
pub struct StepSample {
    pub positions: Vec<Vec<Vector3<f64>>>,
    pub psis: Vec<f64>,
    pub info: StepInfo,
}

/// A Markov-chain sampler over a walker batch.
///
/// `step` advances every walker by one transition and returns a snapshot.
/// There is no internal stopping condition; callers pull as many steps as
/// they need (see `samples_from` for windowed collection).
pub trait Sampler {
    fn step(&mut self) -> Result<StepSample, SamplingError>;
}

/// Overwrite `current[i]` with `proposed[i]` wherever `accepted[i]` holds.
///
/// Kernels call this once per state field of a joint update, always under
/// the same mask, so positions, amplitudes, and forces stay consistent for
/// every walker. Length mismatches panic at the call site.
pub fn assign_where<T: Clone>(current: &mut [T], proposed: &[T], accepted: &[bool]) {
    assert_eq!(
        current.len(),
        accepted.len(),
        "mask length must match batch size"
    );
    assert_eq!(
        proposed.len(),
        accepted.len(),
        "mask length must match batch size"
    );
    for (i, &acc) in accepted.iter().enumerate() {
        if acc {
            current[i] = proposed[i].clone();
        }
    }
}
