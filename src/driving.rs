//! Driving functions for single and multiple SLE.
//!
//! # Coupled mode
//!
//! N driving functions evolve as a Dyson-type system
//!
//! ```text
//!   dX_k = Σ_{m≠k} 2 / (X_k − X_m) dt + √(κ/N) dW_k
//! ```
//!
//! Each coordinate is repelled by every other one, so distinct starting
//! points stay distinct; coinciding starting points make the drift singular
//! and are rejected up front.
//!
//! # Single-process mode
//!
//! | Method | Path                                              |
//! |--------|---------------------------------------------------|
//! | `BM`   | `U[n] = x0 + Σ_{i≤n} √(κ·dt)·Z_i`                  |
//! | `GBM`  | `U[n] = x0·exp(Σ_{i≤n} [(μ − σ²/2)·dt + σ·√(κ·dt)·Z_i])` |
//!
//! Note that a `BM` path already carries its first increment at index 0,
//! while a `GBM` path is reset to `U[0] = x0`.

use std::fmt;
use std::str::FromStr;

use num_complex::Complex64;
use rand::Rng;

use crate::error::{ensure_finite, ensure_non_negative, SleError, SleResult};
use crate::grid::{DrivingPath, TimeGrid};
use crate::integrator::{DiffusionMatrix, ItoIntegrator};

/// Single-process driving-function family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrivingMethod {
    /// Arithmetic Brownian motion.
    #[default]
    BrownianMotion,
    /// Geometric Brownian motion.
    GeometricBrownianMotion,
}

impl FromStr for DrivingMethod {
    type Err = SleError;

    fn from_str(name: &str) -> SleResult<Self> {
        match name {
            "BM" => Ok(DrivingMethod::BrownianMotion),
            "GBM" => Ok(DrivingMethod::GeometricBrownianMotion),
            other => Err(SleError::UnknownMethod(other.to_string())),
        }
    }
}

impl fmt::Display for DrivingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrivingMethod::BrownianMotion => write!(f, "BM"),
            DrivingMethod::GeometricBrownianMotion => write!(f, "GBM"),
        }
    }
}

/// Parameters of a single-process driving function.
#[derive(Debug, Clone, PartialEq)]
pub struct DrivingSpec {
    /// Starting value.
    pub x0: f64,
    pub method: DrivingMethod,
    /// GBM drift μ.
    pub mu: f64,
    /// GBM volatility σ.
    pub sigma: f64,
    /// SLE parameter κ scaling the Brownian increments.
    pub kappa: f64,
}

impl Default for DrivingSpec {
    fn default() -> Self {
        Self {
            x0: 1.0,
            method: DrivingMethod::BrownianMotion,
            mu: 0.0,
            sigma: 1.0,
            kappa: 1.0,
        }
    }
}

impl DrivingSpec {
    /// Brownian motion started at `x0` with parameter `kappa`.
    pub fn brownian(x0: f64, kappa: f64) -> Self {
        Self {
            x0,
            kappa,
            ..Self::default()
        }
    }

    /// Geometric Brownian motion started at `x0`.
    pub fn geometric(x0: f64, mu: f64, sigma: f64, kappa: f64) -> Self {
        Self {
            x0,
            method: DrivingMethod::GeometricBrownianMotion,
            mu,
            sigma,
            kappa,
        }
    }

    fn validate(&self) -> SleResult<()> {
        ensure_finite("x0", self.x0)?;
        ensure_finite("mu", self.mu)?;
        ensure_finite("sigma", self.sigma)?;
        ensure_non_negative("kappa", self.kappa)
    }
}

/// Interaction drift `Σ_{m≠k} 2 / (x_k − x_m)` for every coordinate.
fn dyson_drift(x: &[Complex64]) -> Vec<Complex64> {
    x.iter()
        .enumerate()
        .map(|(k, &xk)| {
            x.iter()
                .enumerate()
                .filter(|&(m, _)| m != k)
                .map(|(_, &xm)| 2.0 / (xk - xm))
                .sum()
        })
        .collect()
}

fn check_distinct(x0: &[f64]) -> SleResult<()> {
    for first in 0..x0.len() {
        for second in first + 1..x0.len() {
            if x0[first] == x0[second] {
                return Err(SleError::CoincidentStartingPoints {
                    first,
                    second,
                    value: x0[first],
                });
            }
        }
    }
    Ok(())
}

/// Coupled driving functions for multiple SLE, one per starting point.
///
/// Each returned path has one sample per grid point, starting at its `x0`.
pub fn multiple_driving_functions<I, R>(
    x0: &[f64],
    t: &TimeGrid,
    kappa: f64,
    integrator: &I,
    rng: &mut R,
) -> SleResult<Vec<DrivingPath>>
where
    I: ItoIntegrator,
    R: Rng + ?Sized,
{
    if x0.is_empty() {
        return Err(SleError::InvalidParameter(
            "at least one starting point is needed".to_string(),
        ));
    }
    for &x in x0 {
        ensure_finite("starting point", x)?;
    }
    ensure_non_negative("kappa", kappa)?;
    check_distinct(x0)?;

    let slits = x0.len();
    let scale = (kappa / slits as f64).sqrt();
    log::debug!(
        "integrating {} coupled driving functions over {} points with {}",
        slits,
        t.len(),
        integrator.name()
    );

    let start: Vec<Complex64> = x0.iter().map(|&x| Complex64::new(x, 0.0)).collect();
    let paths = integrator.integrate(
        |x: &[Complex64], _t: f64| dyson_drift(x),
        |x: &[Complex64], _t: f64| DiffusionMatrix::scaled_identity(x.len(), scale),
        &start,
        t,
        rng,
    )?;

    let driving: Vec<DrivingPath> = paths
        .components()
        .into_iter()
        .map(|path| path.into_iter().map(|x| x.re).collect())
        .collect();
    if driving.iter().flatten().any(|u| !u.is_finite()) {
        log::warn!("coupled driving functions diverged; two coordinates likely collided");
    }
    Ok(driving)
}

/// One driving function of `sample_size` samples spaced `dt` apart.
pub fn driving_function<I, R>(
    sample_size: usize,
    dt: f64,
    spec: &DrivingSpec,
    integrator: &I,
    rng: &mut R,
) -> SleResult<DrivingPath>
where
    I: ItoIntegrator,
    R: Rng + ?Sized,
{
    ensure_finite("dt", dt)?;
    if dt <= 0.0 {
        return Err(SleError::InvalidParameter(format!(
            "dt must be positive, got {dt}"
        )));
    }
    spec.validate()?;

    // The integrator's initial sample is dropped, so index 0 already holds
    // the first increment.
    let grid = TimeGrid::uniform(dt, sample_size + 1)?;
    let noise = spec.kappa.sqrt();

    let path: DrivingPath = match spec.method {
        DrivingMethod::BrownianMotion => {
            let paths = integrator.integrate(
                |x: &[Complex64], _t: f64| vec![Complex64::new(0.0, 0.0); x.len()],
                |x: &[Complex64], _t: f64| DiffusionMatrix::scaled_identity(x.len(), noise),
                &[Complex64::new(spec.x0, 0.0)],
                &grid,
                rng,
            )?;
            paths.component(0).iter().skip(1).map(|x| x.re).collect()
        }
        DrivingMethod::GeometricBrownianMotion => {
            let growth = spec.mu - 0.5 * spec.sigma * spec.sigma;
            let volatility = spec.sigma * noise;
            let log_paths = integrator.integrate(
                |x: &[Complex64], _t: f64| vec![Complex64::new(growth, 0.0); x.len()],
                |x: &[Complex64], _t: f64| DiffusionMatrix::scaled_identity(x.len(), volatility),
                &[Complex64::new(0.0, 0.0)],
                &grid,
                rng,
            )?;
            let mut path: DrivingPath = log_paths
                .component(0)
                .iter()
                .skip(1)
                .map(|y| spec.x0 * y.re.exp())
                .collect();
            if let Some(first) = path.first_mut() {
                *first = spec.x0;
            }
            path
        }
    };
    Ok(path)
}
