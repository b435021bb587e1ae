//! Windowed collection of sampler output into stacked trajectories.

use nalgebra::Vector3;

use super::traits::{Sampler, SamplingError, StepInfo};

/// A finite, time-stacked slice of a chain's output.
///
/// All stacks are time-major and share the same length: entry `t` holds
/// the snapshot of retained step `steps[t]`.
#[derive(Clone, Debug)]
pub struct Trajectory {
    /// Walker positions per retained step: `positions[t][walker][electron]`
    pub positions: Vec<Vec<Vec<Vector3<f64>>>>,
    /// Amplitudes per retained step: `psis[t][walker]`
    pub psis: Vec<Vec<f64>>,
    /// Indices of the retained steps, in pull order
    pub steps: Vec<usize>,
    /// Diagnostics row per retained step
    pub infos: Vec<StepInfo>,
}

impl Trajectory {
    pub fn n_retained(&self) -> usize {
        self.steps.len()
    }

    pub fn n_walkers(&self) -> usize {
        self.positions.first().map_or(0, |batch| batch.len())
    }

    pub fn mean_acceptance(&self) -> f64 {
        let sum: f64 = self.infos.iter().map(|info| info.acceptance).sum();
        sum / self.infos.len() as f64
    }
}

/// Pull a finite window of steps from `sampler` and stack the retained ones.
///
/// One `step()` is pulled per index yielded by `steps`; discarded steps
/// still advance the chain. A step with index `i` is retained when
/// `i >= n_discard` and `(i - n_discard) % (n_decorrelate + 1) == 0`: the
/// burn-in prefix is dropped and the remainder thinned, anchored so the
/// first retained sample is the first post-burn-in step.
/// `n_decorrelate = 0` keeps every post-burn-in step.
///
/// Fails with [`SamplingError::EmptySample`] when nothing is retained.
pub fn samples_from<S: Sampler>(
    sampler: &mut S,
    steps: impl IntoIterator<Item = usize>,
    n_discard: usize,
    n_decorrelate: usize,
) -> Result<Trajectory, SamplingError> {
    let mut trajectory = Trajectory {
        positions: Vec::new(),
        psis: Vec::new(),
        steps: Vec::new(),
        infos: Vec::new(),
    };
    let mut n_pulled = 0;

    for i in steps {
        let sample = sampler.step()?;
        n_pulled += 1;
        if i < n_discard || (i - n_discard) % (n_decorrelate + 1) != 0 {
            continue;
        }
        trajectory.steps.push(i);
        trajectory.positions.push(sample.positions);
        trajectory.psis.push(sample.psis);
        trajectory.infos.push(sample.info);
    }

    if trajectory.steps.is_empty() {
        return Err(SamplingError::EmptySample {
            n_pulled,
            n_discard,
            n_decorrelate,
        });
    }
    Ok(trajectory)
}
