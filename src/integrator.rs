//! Fixed-step Itô integration of complex-valued SDE systems.
//!
//! For the system
//!
//! ```text
//!   dX_t = a(X_t, t) dt + B(X_t, t) dW_t
//! ```
//!
//! with `X ∈ ℂⁿ`, an n×m diffusion matrix `B` and m independent real Wiener
//! processes, the schemes below advance the state across every interval of a
//! [`TimeGrid`] using increments `ΔW = √Δt · Z`, `Z ~ N(0, 1)`.
//!
//! - **Euler–Maruyama**: `X += a·Δt + B·ΔW` (strong order 0.5)
//! - **Milstein** (diagonal noise): adds `½·b·∂b/∂x·(ΔW² − Δt)` per component
//!   (strong order 1.0). For additive noise it coincides with Euler–Maruyama.
//!
//! A diffusion matrix with zero columns turns either scheme into the explicit
//! Euler method for the ODE `dX = a dt` and draws no random numbers.

use num_complex::Complex64;
use num_traits::Zero;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::{SleError, SleResult};
use crate::grid::TimeGrid;

/// Dense n×m diffusion matrix, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffusionMatrix {
    rows: usize,
    cols: usize,
    entries: Vec<Complex64>,
}

impl DiffusionMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            entries: vec![Complex64::zero(); rows * cols],
        }
    }

    /// Square matrix with `diagonal` on its diagonal.
    pub fn diagonal(diagonal: &[Complex64]) -> Self {
        let n = diagonal.len();
        let mut matrix = Self::zeros(n, n);
        for (k, &d) in diagonal.iter().enumerate() {
            matrix.entries[k * n + k] = d;
        }
        matrix
    }

    /// `n` independent noise sources all scaled by `scale`.
    pub fn scaled_identity(n: usize, scale: f64) -> Self {
        Self::diagonal(&vec![Complex64::new(scale, 0.0); n])
    }

    /// No noise at all: the SDE degenerates to an ODE.
    pub fn none(rows: usize) -> Self {
        Self::zeros(rows, 0)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.entries[row * self.cols + col]
    }

    pub fn is_diagonal(&self) -> bool {
        self.rows == self.cols
            && (0..self.rows).all(|i| {
                (0..self.cols).all(|j| i == j || self.get(i, j).is_zero())
            })
    }
}

/// State of every component at every grid point, row-major by time.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePaths {
    dim: usize,
    samples: Vec<Complex64>,
}

impl SamplePaths {
    fn with_capacity(dim: usize, points: usize) -> Self {
        Self {
            dim,
            samples: Vec::with_capacity(dim * points),
        }
    }

    fn push(&mut self, state: &[Complex64]) {
        self.samples.extend_from_slice(state);
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of grid points sampled.
    pub fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.samples.len() / self.dim
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Full state at grid point `step`.
    pub fn at(&self, step: usize) -> &[Complex64] {
        &self.samples[step * self.dim..(step + 1) * self.dim]
    }

    /// State at the last grid point.
    pub fn terminal(&self) -> &[Complex64] {
        self.at(self.len() - 1)
    }

    /// Path of one component over the whole grid.
    pub fn component(&self, k: usize) -> Vec<Complex64> {
        self.samples.iter().skip(k).step_by(self.dim).copied().collect()
    }

    /// One path per component.
    pub fn components(&self) -> Vec<Vec<Complex64>> {
        (0..self.dim).map(|k| self.component(k)).collect()
    }
}

/// An Itô integration scheme.
///
/// The state must have at least one component. `drift(x, t)` must return
/// `x.len()` values and `diffusion(x, t)` an `x.len()`×m matrix; m may be
/// zero.
pub trait ItoIntegrator {
    fn integrate<F, G, R>(
        &self,
        drift: F,
        diffusion: G,
        x0: &[Complex64],
        grid: &TimeGrid,
        rng: &mut R,
    ) -> SleResult<SamplePaths>
    where
        F: Fn(&[Complex64], f64) -> Vec<Complex64>,
        G: Fn(&[Complex64], f64) -> DiffusionMatrix,
        R: Rng + ?Sized;

    fn name(&self) -> &'static str;
}

/// Selects an integration scheme from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    #[default]
    EulerMaruyama,
    Milstein,
}

impl ItoIntegrator for Scheme {
    fn integrate<F, G, R>(
        &self,
        drift: F,
        diffusion: G,
        x0: &[Complex64],
        grid: &TimeGrid,
        rng: &mut R,
    ) -> SleResult<SamplePaths>
    where
        F: Fn(&[Complex64], f64) -> Vec<Complex64>,
        G: Fn(&[Complex64], f64) -> DiffusionMatrix,
        R: Rng + ?Sized,
    {
        match self {
            Scheme::EulerMaruyama => EulerMaruyama.integrate(drift, diffusion, x0, grid, rng),
            Scheme::Milstein => Milstein::default().integrate(drift, diffusion, x0, grid, rng),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Scheme::EulerMaruyama => EulerMaruyama.name(),
            Scheme::Milstein => Milstein::default().name(),
        }
    }
}

fn check_state(x0: &[Complex64]) -> SleResult<()> {
    if x0.is_empty() {
        return Err(SleError::DimensionMismatch {
            what: "state dimension",
            expected: 1,
            found: 0,
        });
    }
    Ok(())
}

fn check_drift(drift: &[Complex64], dim: usize) -> SleResult<()> {
    if drift.len() != dim {
        return Err(SleError::DimensionMismatch {
            what: "drift length",
            expected: dim,
            found: drift.len(),
        });
    }
    Ok(())
}

fn check_diffusion(diffusion: &DiffusionMatrix, dim: usize) -> SleResult<()> {
    if diffusion.rows() != dim {
        return Err(SleError::DimensionMismatch {
            what: "diffusion rows",
            expected: dim,
            found: diffusion.rows(),
        });
    }
    Ok(())
}

/// Wiener increments `√dt · Z` for each noise column.
fn wiener_increments<R: Rng + ?Sized>(count: usize, dt: f64, rng: &mut R) -> Vec<f64> {
    let scale = dt.sqrt();
    (0..count)
        .map(|_| {
            let z: f64 = rng.sample(StandardNormal);
            scale * z
        })
        .collect()
}

/// Euler–Maruyama scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct EulerMaruyama;

impl ItoIntegrator for EulerMaruyama {
    fn integrate<F, G, R>(
        &self,
        drift: F,
        diffusion: G,
        x0: &[Complex64],
        grid: &TimeGrid,
        rng: &mut R,
    ) -> SleResult<SamplePaths>
    where
        F: Fn(&[Complex64], f64) -> Vec<Complex64>,
        G: Fn(&[Complex64], f64) -> DiffusionMatrix,
        R: Rng + ?Sized,
    {
        check_state(x0)?;
        let dim = x0.len();
        let mut paths = SamplePaths::with_capacity(dim, grid.len());
        let mut state = x0.to_vec();
        paths.push(&state);

        for step in 1..grid.len() {
            let t = grid[step - 1];
            let dt = grid.increment(step);
            let a = drift(&state, t);
            check_drift(&a, dim)?;
            let b = diffusion(&state, t);
            check_diffusion(&b, dim)?;
            let dw = wiener_increments(b.cols(), dt, rng);

            for (k, x) in state.iter_mut().enumerate() {
                let noise: Complex64 = dw.iter().enumerate().map(|(j, &w)| b.get(k, j) * w).sum();
                *x += a[k] * dt + noise;
            }
            paths.push(&state);
        }
        Ok(paths)
    }

    fn name(&self) -> &'static str {
        "euler-maruyama"
    }
}

/// Milstein scheme for diagonal noise.
///
/// The derivative of each diagonal diffusion entry with respect to its own
/// component is estimated by a forward difference along the real axis.
#[derive(Debug, Clone, Copy)]
pub struct Milstein {
    /// Relative step of the forward difference.
    pub relative_step: f64,
}

impl Default for Milstein {
    fn default() -> Self {
        Self {
            relative_step: 1e-7,
        }
    }
}

impl ItoIntegrator for Milstein {
    fn integrate<F, G, R>(
        &self,
        drift: F,
        diffusion: G,
        x0: &[Complex64],
        grid: &TimeGrid,
        rng: &mut R,
    ) -> SleResult<SamplePaths>
    where
        F: Fn(&[Complex64], f64) -> Vec<Complex64>,
        G: Fn(&[Complex64], f64) -> DiffusionMatrix,
        R: Rng + ?Sized,
    {
        check_state(x0)?;
        let dim = x0.len();
        let mut paths = SamplePaths::with_capacity(dim, grid.len());
        let mut state = x0.to_vec();
        paths.push(&state);

        for step in 1..grid.len() {
            let t = grid[step - 1];
            let dt = grid.increment(step);
            let a = drift(&state, t);
            check_drift(&a, dim)?;
            let b = diffusion(&state, t);
            check_diffusion(&b, dim)?;
            if b.cols() != 0 && !b.is_diagonal() {
                return Err(SleError::NonDiagonalNoise);
            }
            let dw = wiener_increments(b.cols(), dt, rng);

            let mut next = state.clone();
            for k in 0..dim {
                next[k] += a[k] * dt;
                if dw.is_empty() {
                    continue;
                }
                let b_kk = b.get(k, k);
                let h = self.relative_step * state[k].norm().max(1.0);
                let mut shifted = state.clone();
                shifted[k] += h;
                let slope = (diffusion(&shifted, t).get(k, k) - b_kk) / h;
                next[k] += b_kk * dw[k] + 0.5 * b_kk * slope * (dw[k] * dw[k] - dt);
            }
            state = next;
            paths.push(&state);
        }
        Ok(paths)
    }

    fn name(&self) -> &'static str {
        "milstein"
    }
}
