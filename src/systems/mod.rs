//! Systems module - molecular geometries and concrete trial wavefunctions.

mod geometry;
mod gaussian;
mod hydrogenic;

pub use geometry::Geometry;
pub use gaussian::GaussianWfn;
pub use hydrogenic::{Slater1s, Hydrogenic};
