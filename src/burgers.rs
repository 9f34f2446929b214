//! Characteristics of the complex Burgers equation.
//!
//! For multiple SLE with many slits the driving measure evolves by the
//! complex Burgers equation. Its characteristics solve
//!
//! ```text
//!   dx/dt = −4 / (x ± r),    r = √(x² − 16·(T − t))
//! ```
//!
//! where the sign is chosen by the half-plane `r` falls in. As `t → T` the
//! argument of the root crosses the cut, so the branch has to be continued by
//! hand: with `Im(r) > 0` the `+` sign is taken, otherwise the `−` sign.
//!
//! Characteristics start on a horizontal segment just above the real axis
//! and are integrated up to the terminal time of the grid. They are mutually
//! independent, which is why the loop over starting points may run on rayon's
//! pool.

use num_complex::Complex64;
use rand::rngs::mock::StepRng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::complex_analysis::{principal_branch_sqrt, HalfPlane};
use crate::error::{ensure_finite, SleError, SleResult};
use crate::grid::TimeGrid;
use crate::integrator::{DiffusionMatrix, ItoIntegrator};

/// Segment the characteristics start from.
#[derive(Debug, Clone, PartialEq)]
pub struct BurgersLine {
    /// Left end of the segment.
    pub start: f64,
    /// Length of the segment.
    pub width: f64,
    /// Height above the real axis.
    pub offset: f64,
}

impl Default for BurgersLine {
    fn default() -> Self {
        Self {
            start: -5.0,
            width: 10.0,
            offset: 1e-3,
        }
    }
}

impl BurgersLine {
    /// Starting point of characteristic `j` out of `n`.
    pub fn point(&self, j: usize, n: usize) -> Complex64 {
        Complex64::new(self.start + self.width * j as f64 / n as f64, self.offset)
    }

    fn validate(&self) -> SleResult<()> {
        ensure_finite("start", self.start)?;
        ensure_finite("width", self.width)?;
        ensure_finite("offset", self.offset)?;
        if self.offset <= 0.0 {
            return Err(SleError::InvalidParameter(format!(
                "offset must lie above the real axis, got {}",
                self.offset
            )));
        }
        Ok(())
    }
}

/// Characteristic field at `(x, t)` for terminal time `terminal`.
pub fn characteristic_velocity(x: Complex64, t: f64, terminal: f64) -> Complex64 {
    let r = principal_branch_sqrt(x * x - 16.0 * (terminal - t), HalfPlane::Right);
    if r.im > 0.0 {
        -4.0 / (x + r)
    } else {
        -4.0 / (x - r)
    }
}

fn terminal_point<I: ItoIntegrator>(
    x0: Complex64,
    t: &TimeGrid,
    integrator: &I,
) -> SleResult<Complex64> {
    let terminal = t.terminal();
    // no noise columns, so the generator is never drawn from
    let mut rng = StepRng::new(0, 0);
    let paths = integrator.integrate(
        |x: &[Complex64], s: f64| {
            x.iter()
                .map(|&xk| characteristic_velocity(xk, s, terminal))
                .collect()
        },
        |x: &[Complex64], _s: f64| DiffusionMatrix::none(x.len()),
        &[x0],
        t,
        &mut rng,
    )?;
    Ok(paths.terminal()[0])
}

/// Terminal points of `n` characteristics started on the default segment.
pub fn burgers<I>(t: &TimeGrid, n: usize, integrator: &I) -> SleResult<Vec<Complex64>>
where
    I: ItoIntegrator + Sync,
{
    burgers_with(t, n, &BurgersLine::default(), integrator)
}

/// Terminal points of `n` characteristics started on `line`.
pub fn burgers_with<I>(
    t: &TimeGrid,
    n: usize,
    line: &BurgersLine,
    integrator: &I,
) -> SleResult<Vec<Complex64>>
where
    I: ItoIntegrator + Sync,
{
    line.validate()?;
    log::debug!(
        "integrating {} Burgers characteristics up to T = {} with {}",
        n,
        t.terminal(),
        integrator.name()
    );

    let starts: Vec<Complex64> = (0..n).map(|j| line.point(j, n)).collect();

    #[cfg(feature = "parallel")]
    let points = starts.par_iter();
    #[cfg(not(feature = "parallel"))]
    let points = starts.iter();

    let result: Vec<Complex64> = points
        .map(|&x0| terminal_point(x0, t, integrator))
        .collect::<SleResult<_>>()?;

    if result.iter().any(|x| !x.is_finite()) {
        log::warn!("Burgers characteristics hit the branch point; some endpoints are not finite");
    }
    Ok(result)
}
