//! YAML readers for geometries and sampling run configurations.

use serde::{Deserialize, Serialize};

use crate::systems::Geometry;

/// Which kernel a run uses.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SamplerKind {
    Metropolis,
    Langevin,
    Hmc,
}

/// Full configuration of a sampling run.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RunConfig {
    pub geometry: Geometry,
    pub sampler: SamplerKind,
    pub n_walker: usize,
    pub n_steps: usize,
    #[serde(default)]
    pub n_discard: usize,
    #[serde(default)]
    pub n_decorrelate: usize,
    /// Metropolis proposal scale
    #[serde(default = "default_stepsize")]
    pub stepsize: f64,
    /// Langevin/HMC discretization step
    #[serde(default = "default_tau")]
    pub tau: f64,
    /// HMC leapfrog sub-steps
    #[serde(default = "default_dysteps")]
    pub dysteps: usize,
    /// Force-clamp numerator for Langevin/HMC
    #[serde(default = "default_cutoff")]
    pub cutoff: f64,
    /// Gaussian spread of initial electron placement
    #[serde(default = "default_init_var")]
    pub init_var: f64,
}

fn default_stepsize() -> f64 {
    1.0
}

fn default_tau() -> f64 {
    0.1
}

fn default_dysteps() -> usize {
    10
}

fn default_cutoff() -> f64 {
    1.0
}

fn default_init_var() -> f64 {
    1.0
}

/// Read a bare geometry from a YAML file.
pub fn read_geometry(filename: &str) -> Geometry {
    let file = std::fs::File::open(filename).unwrap();
    let reader = std::io::BufReader::new(file);
    serde_yaml::from_reader(reader).unwrap()
}

/// Read a run configuration from a YAML file.
pub fn read_run_config(filename: &str) -> RunConfig {
    let file = std::fs::File::open(filename).unwrap();
    let reader = std::io::BufReader::new(file);
    serde_yaml::from_reader(reader).unwrap()
}

// example of yaml file
// geometry:
//   coords:
//     - [0.0, 0.0, 0.0]
//     - [0.0, 0.0, 1.8]
//   charges: [1, 1]
// sampler: langevin
// n_walker: 100
// n_steps: 2000
// n_discard: 500
// n_decorrelate: 4
// tau: 0.1
