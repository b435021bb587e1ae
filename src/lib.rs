//! QMC walker sampling - Markov chain Monte Carlo over many-body
//! wavefunctions.
//!
//! This crate draws correlated samples of electron configurations
//! ("walkers") distributed as the squared magnitude of a trial
//! wavefunction, the input to variational and diffusion Monte Carlo energy
//! estimates. Three interchangeable kernels are provided - plain
//! Metropolis, drift-diffusion Langevin, and Hamiltonian Monte Carlo -
//! together with walker initialization from a geometry or mean-field
//! reference and windowed trajectory collection with burn-in and
//! decorrelation.

pub mod wavefunction;
pub mod systems;
pub mod physics;
pub mod sampling;
pub mod io;

// Re-export commonly used types at crate root
pub use wavefunction::{SingleWfn, MultiWfn};
pub use systems::{Geometry, GaussianWfn, Slater1s, Hydrogenic};
pub use physics::quantum_force;
pub use sampling::{
    assign_where, dynamics, rand_from_mf, sample_start, samples_from, HamiltonianSampler,
    HmcParams, LangevinParams, LangevinSampler, MeanField, MetropolisSampler, Sampler,
    SamplingError, StepInfo, StepSample, Trajectory,
};
pub use io::{read_geometry, read_run_config, RunConfig, SamplerKind};
