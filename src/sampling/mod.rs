//! Sampling module - MCMC kernels, walker initialization, and trajectory
//! assembly.

mod traits;
mod metropolis;
mod langevin;
mod hmc;
mod trajectory;
mod init;

pub use traits::{assign_where, Sampler, SamplingError, StepInfo, StepSample};
pub use metropolis::MetropolisSampler;
pub use langevin::{LangevinParams, LangevinSampler};
pub use hmc::{dynamics, HamiltonianSampler, HmcParams};
pub use trajectory::{samples_from, Trajectory};
pub use init::{rand_from_mf, sample_start, MeanField};
