//! # multiple-sle
//!
//! Numerical simulation of multiple Schramm-Loewner evolution (SLE).
//!
//! The chordal Loewner equation is discretized backwards in time: each slit's
//! trace is obtained by pushing its driving value through a chain of inverse
//! vertical-slit maps, with every slit's map acting on every slit's tail.
//! Driving functions come either from a coupled Dyson-type SDE (true multiple
//! SLE) or from a single Brownian / geometric Brownian motion.
//!
//! ```text
//! DrivingFunctionGenerator ──paths──▶ LoewnerTraceEngine ──▶ TraceArray
//!         │
//!   ItoIntegrator (Euler–Maruyama, Milstein)
//!         │
//! BurgersTraceSolver ──▶ Burgers characteristic endpoints
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use multiple_sle::prelude::*;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let t = TimeGrid::linspace(0.0, 50.0, 50_000).unwrap();
//! let x0 = [-0.01, -0.004, 0.003, 0.009];
//! let mut rng = StdRng::seed_from_u64(42);
//! let u = multiple_driving_functions(&x0, &t, 2.618, &EulerMaruyama, &mut rng).unwrap();
//! let z = multiple_slits(&t, &u).unwrap();
//! println!("tip of slit 0: {}", z[(0, t.len() - 1)]);
//! ```
//!
//! ## References
//!
//! - Kennedy (2009), "Numerical computations for the Schramm-Loewner
//!   evolution", J. Stat. Phys. 137, 839
//! - del Monaco, Schleissinger (2016), "Multiple SLE and the complex Burgers
//!   equation", Math. Nachr. 289, 2007

pub mod burgers;
pub mod complex_analysis;
pub mod driving;
pub mod error;
pub mod grid;
pub mod integrator;
pub mod loewner;
pub mod simulation;
#[cfg(test)]
mod tests;

pub use error::{SleError, SleResult};

pub mod prelude {
    pub use crate::burgers::*;
    pub use crate::complex_analysis::*;
    pub use crate::driving::*;
    pub use crate::error::*;
    pub use crate::grid::*;
    pub use crate::integrator::*;
    pub use crate::loewner::*;
    pub use crate::simulation::*;
}
