//! IO module - configuration and file handling.

mod config;

pub use config::{read_geometry, read_run_config, RunConfig, SamplerKind};
