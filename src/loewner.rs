//! Discretized Loewner traces of one or several interacting slits.
//!
//! The trace is built backwards in time by composing inverse vertical-slit
//! maps. Over a time interval of length `dt` the chordal Loewner equation
//!
//! ```text
//!   dg/dt = 2 / (g(t, z) - U(t))
//! ```
//!
//! with constant driving value `U = u` is solved by a vertical slit of height
//! `2√dt` above `u`; its inverse is
//!
//! ```text
//!   w = i·√(4·dt − (z − u)²) + u
//! ```
//!
//! which maps `u` itself to `u + 2i√dt`.
//!
//! For N slits every time interval is split equally among the slits and every
//! slit's tail is pushed through the map of every slit's driving value, one
//! ordered pair at a time. The pair order matters: each correction reads what
//! the previous one wrote.
//!
//! References:
//! - Kennedy (2009), J. Stat. Phys. 137, 839 (numerical SLE)
//! - del Monaco, Schleissinger (2016), Math. Nachr. 289, 2007 (multiple SLE
//!   and the complex Burgers equation)

use num_complex::Complex64;

use crate::complex_analysis::{principal_branch_sqrt, HalfPlane};
use crate::error::SleResult;
use crate::grid::{DrivingPath, TimeGrid};

/// Offset above the real axis for the initial trace points.
pub const SEED_OFFSET: f64 = 1e-6;

/// Inverse of the vertical-slit map for one time increment.
///
/// `Im(w) ≥ 0` for every input since the root is taken in the right
/// half-plane.
#[inline]
pub fn vertical_slit_zip(z: Complex64, dt: f64, u: f64) -> Complex64 {
    let shifted = z - u;
    let root = principal_branch_sqrt(4.0 * dt - shifted * shifted, HalfPlane::Right);
    Complex64::i() * root + u
}

/// Apply [`vertical_slit_zip`] to each element of `points`.
pub fn vertical_slit_zip_in_place(points: &mut [Complex64], dt: f64, u: f64) {
    for z in points.iter_mut() {
        *z = vertical_slit_zip(*z, dt, u);
    }
}

/// N×M matrix of trace points `z[slit][step]`, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceArray {
    slits: usize,
    steps: usize,
    points: Vec<Complex64>,
}

impl TraceArray {
    /// Seed every point at its driving value, just above the real axis.
    fn seeded(driving: &[&[f64]], steps: usize) -> Self {
        let points = driving
            .iter()
            .flat_map(|path| path.iter().map(|&u| Complex64::new(u, SEED_OFFSET)))
            .collect();
        Self {
            slits: driving.len(),
            steps,
            points,
        }
    }

    pub fn slits(&self) -> usize {
        self.slits
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Trace of one slit over the whole grid.
    pub fn row(&self, slit: usize) -> &[Complex64] {
        &self.points[slit * self.steps..(slit + 1) * self.steps]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Complex64]> {
        // chunks_exact panics on zero; a trace always has at least one step
        self.points.chunks_exact(self.steps.max(1))
    }

    pub fn into_rows(self) -> Vec<Vec<Complex64>> {
        self.rows().map(<[Complex64]>::to_vec).collect()
    }

    fn row_tail_mut(&mut self, slit: usize, from: usize) -> &mut [Complex64] {
        let start = slit * self.steps;
        &mut self.points[start + from..start + self.steps]
    }

    /// Whether every point is finite and not below the real axis.
    pub fn is_well_formed(&self) -> bool {
        self.points.iter().all(|z| z.is_finite() && z.im >= 0.0)
    }
}

impl std::ops::Index<(usize, usize)> for TraceArray {
    type Output = Complex64;

    fn index(&self, (slit, step): (usize, usize)) -> &Complex64 {
        &self.points[slit * self.steps + step]
    }
}

/// Ordered `(driving slit, moved slit)` pairs for one time step, row-major.
fn interaction_pairs(slits: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..slits).flat_map(move |driver| (0..slits).map(move |moved| (driver, moved)))
}

/// Advance the trace by one backward time step.
///
/// Takes the trace by value and hands back the next snapshot; the N² pair
/// corrections are folded in their fixed order.
fn zip_step(
    trace: TraceArray,
    driving: &[&[f64]],
    grid: &TimeGrid,
    step: usize,
) -> TraceArray {
    let dt = grid.increment(step) / driving.len() as f64;
    interaction_pairs(driving.len()).fold(trace, |mut trace, (driver, moved)| {
        vertical_slit_zip_in_place(trace.row_tail_mut(moved, step), dt, driving[driver][step]);
        trace
    })
}

/// Loewner trace of several slits with prescribed driving functions.
///
/// With no driving functions a single slit driven by `U ≡ 0` is traced.
/// Every driving path must have exactly `t.len()` samples.
pub fn multiple_slits(t: &TimeGrid, driving_fncs: &[DrivingPath]) -> SleResult<TraceArray> {
    let zero_path;
    let driving: Vec<&[f64]> = if driving_fncs.is_empty() {
        zero_path = vec![0.0; t.len()];
        vec![zero_path.as_slice()]
    } else {
        driving_fncs.iter().map(Vec::as_slice).collect()
    };
    for (slit, path) in driving.iter().enumerate() {
        t.check_path(slit, path)?;
    }

    log::debug!(
        "tracing {} slit(s) over {} time steps",
        driving.len(),
        t.len()
    );

    let seeded = TraceArray::seeded(&driving, t.len());
    let trace = (1..t.len())
        .rev()
        .fold(seeded, |trace, step| zip_step(trace, &driving, t, step));

    if !trace.is_well_formed() {
        log::warn!("Loewner trace contains non-finite points or points below the real axis");
    }
    Ok(trace)
}

/// Loewner trace of one slit with driving function `u`.
pub fn single_slit(t: &TimeGrid, u: &[f64]) -> SleResult<Vec<Complex64>> {
    let trace = multiple_slits(t, &[u.to_vec()])?;
    Ok(trace.row(0).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SleError;

    #[test]
    fn zip_of_driving_value_is_slit_tip() {
        for &(u, dt) in &[(0.0, 1.0), (0.37, 0.01), (-2.5, 3.0), (1e3, 1e-6)] {
            let w = vertical_slit_zip(Complex64::new(u, 0.0), dt, u);
            assert_eq!(w, Complex64::new(u, (4.0 * dt).sqrt()));
        }
    }

    #[test]
    fn zip_stays_in_upper_half_plane() {
        let points = [
            Complex64::new(3.0, 0.0),
            Complex64::new(-3.0, 0.0),
            Complex64::new(0.5, 2.0),
            Complex64::new(-10.0, 1e-9),
        ];
        for z in points {
            let w = vertical_slit_zip(z, 0.25, 0.1);
            assert!(w.im >= 0.0, "{:?} -> {:?}", z, w);
        }
    }

    #[test]
    fn in_place_zip_matches_pointwise() {
        let mut points = vec![Complex64::new(0.2, 0.1), Complex64::new(-1.0, 0.5)];
        let expected: Vec<_> = points.iter().map(|&z| vertical_slit_zip(z, 0.1, 0.3)).collect();
        vertical_slit_zip_in_place(&mut points, 0.1, 0.3);
        assert_eq!(points, expected);
    }

    #[test]
    fn constant_driving_grows_a_vertical_slit() {
        let t = TimeGrid::linspace(0.0, 1.0, 10).unwrap();
        let z = single_slit(&t, &[0.1; 10]).unwrap();

        // first point is the untouched seed
        assert_eq!(z[0], Complex64::new(0.1, SEED_OFFSET));
        for w in &z {
            assert!((w.re - 0.1).abs() < 1e-9);
        }
        for step in 1..z.len() {
            assert!(z[step].im > z[step - 1].im);
        }
        let rises: Vec<f64> = z.windows(2).map(|w| w[1].im - w[0].im).collect();
        for pair in rises.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
        // height 2√T at the tip
        assert!((z[9].im - 2.0).abs() < 1e-9);
        assert!((z[4].im - 2.0 * (4.0f64 / 9.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn no_driving_functions_means_zero_driving() {
        let t = TimeGrid::linspace(0.0, 2.0, 25).unwrap();
        let default = multiple_slits(&t, &[]).unwrap();
        let explicit = multiple_slits(&t, &[vec![0.0; 25]]).unwrap();
        assert_eq!(default, explicit);
        assert_eq!(default.slits(), 1);
    }

    #[test]
    fn single_slit_is_first_row() {
        let t = TimeGrid::linspace(0.0, 1.0, 40).unwrap();
        let u: Vec<f64> = (0..40).map(|i| (i as f64 * 0.3).sin()).collect();
        let trace = multiple_slits(&t, &[u.clone()]).unwrap();
        assert_eq!(single_slit(&t, &u).unwrap(), trace.row(0));
    }

    #[test]
    fn trace_shape_and_seeds() {
        let t = TimeGrid::linspace(0.0, 1.0, 7).unwrap();
        let paths = vec![vec![-1.0; 7], vec![0.0; 7], vec![1.0; 7]];
        let trace = multiple_slits(&t, &paths).unwrap();
        assert_eq!(trace.slits(), 3);
        assert_eq!(trace.steps(), 7);
        assert_eq!(trace.rows().count(), 3);
        for slit in 0..3 {
            assert_eq!(trace[(slit, 0)], Complex64::new(paths[slit][0], SEED_OFFSET));
        }
        assert!(trace.is_well_formed());
    }

    #[test]
    fn mirrored_driving_mirrors_the_trace() {
        let t = TimeGrid::linspace(0.0, 1.0, 30).unwrap();
        let paths: Vec<DrivingPath> = vec![
            (0..30).map(|i| 0.5 + 0.01 * i as f64).collect(),
            (0..30).map(|i| -0.4 - 0.02 * i as f64).collect(),
        ];
        let mirrored: Vec<DrivingPath> =
            paths.iter().map(|p| p.iter().map(|u| -u).collect()).collect();
        let a = multiple_slits(&t, &paths).unwrap();
        let b = multiple_slits(&t, &mirrored).unwrap();
        for slit in 0..2 {
            for (z, w) in a.row(slit).iter().zip(b.row(slit)) {
                assert!((z.re + w.re).abs() < 1e-9);
                assert!((z.im - w.im).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn pair_order_is_row_major() {
        let pairs: Vec<_> = interaction_pairs(2).collect();
        assert_eq!(pairs, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn mismatched_path_is_rejected() {
        let t = TimeGrid::linspace(0.0, 1.0, 5).unwrap();
        let err = multiple_slits(&t, &[vec![0.0; 5], vec![0.0; 4]]).unwrap_err();
        assert_eq!(
            err,
            SleError::LengthMismatch {
                slit: 1,
                expected: 5,
                found: 4
            }
        );
    }

    #[test]
    fn single_point_grid_returns_seeds() {
        let t = TimeGrid::new(vec![0.0]).unwrap();
        let trace = multiple_slits(&t, &[vec![0.25]]).unwrap();
        assert_eq!(trace.row(0), &[Complex64::new(0.25, SEED_OFFSET)]);
    }
}
