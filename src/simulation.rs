//! Experiment runner for multiple SLE.
//!
//! One run:
//! 1. Draw N starting points uniformly from `[−spread, spread]`
//! 2. Integrate the coupled driving functions on `linspace(0, t_end, steps)`
//! 3. Trace all slits with those driving functions
//!
//! Trials are independent: each owns its grid and a `StdRng` seeded from the
//! base seed and its trial index, so a batch gives the same result whether
//! or not it runs in parallel.

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::driving::multiple_driving_functions;
use crate::error::{ensure_non_negative, SleError, SleResult};
use crate::grid::{DrivingPath, TimeGrid};
use crate::integrator::{ItoIntegrator, Scheme};
use crate::loewner::{multiple_slits, TraceArray};

/// Configuration for a multiple SLE experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct SleConfig {
    /// Number of slits.
    pub slits: usize,
    /// Starting points are drawn from `[−spread, spread]`.
    pub spread: f64,
    /// Terminal time of the grid.
    pub t_end: f64,
    /// Number of grid points.
    pub steps: usize,
    /// SLE parameter κ.
    pub kappa: f64,
    /// Base seed; trial `k` uses a seed derived from it.
    pub seed: u64,
    /// Integration scheme for the driving functions.
    pub scheme: Scheme,
}

impl Default for SleConfig {
    fn default() -> Self {
        Self {
            slits: 3,
            spread: 1.0,
            t_end: 1.0,
            steps: 500,
            kappa: 2.0,
            seed: 42,
            scheme: Scheme::EulerMaruyama,
        }
    }
}

impl SleConfig {
    /// Ten slits started close together, κ = φ² ≈ 2.618.
    pub fn ten_slits() -> Self {
        Self {
            slits: 10,
            spread: 0.01,
            t_end: 50.0,
            steps: 50_000,
            kappa: 2.618,
            ..Self::default()
        }
    }

    /// Seed of trial `trial`.
    pub fn trial_seed(&self, trial: usize) -> u64 {
        self.seed.wrapping_add(trial as u64 * 7919)
    }

    fn validate(&self) -> SleResult<()> {
        if self.slits == 0 {
            return Err(SleError::InvalidParameter("slits must be positive".to_string()));
        }
        if self.steps == 0 {
            return Err(SleError::EmptyTimeGrid);
        }
        ensure_non_negative("spread", self.spread)?;
        if self.slits > 1 && self.spread == 0.0 {
            return Err(SleError::InvalidParameter(format!(
                "{} slits cannot start from a zero-width interval",
                self.slits
            )));
        }
        ensure_non_negative("kappa", self.kappa)?;
        if !(self.t_end > 0.0) || !self.t_end.is_finite() {
            return Err(SleError::InvalidParameter(format!(
                "t_end must be positive, got {}",
                self.t_end
            )));
        }
        Ok(())
    }
}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct SleRun {
    pub seed: u64,
    pub grid: TimeGrid,
    pub starting_points: Vec<f64>,
    pub driving: Vec<DrivingPath>,
    pub trace: TraceArray,
}

/// Shape statistics of one slit.
#[derive(Debug, Clone, PartialEq)]
pub struct SlitSummary {
    /// Trace point at the terminal time.
    pub tip: Complex64,
    /// Largest imaginary part along the trace.
    pub height: f64,
    /// Smallest and largest real part along the trace.
    pub extent: (f64, f64),
}

/// Per-slit statistics of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceSummary {
    pub slits: Vec<SlitSummary>,
}

impl SleRun {
    pub fn summary(&self) -> TraceSummary {
        let slits = self
            .trace
            .rows()
            .map(|row| {
                let height = row.iter().map(|z| z.im).fold(f64::NEG_INFINITY, f64::max);
                let left = row.iter().map(|z| z.re).fold(f64::INFINITY, f64::min);
                let right = row.iter().map(|z| z.re).fold(f64::NEG_INFINITY, f64::max);
                SlitSummary {
                    tip: row[row.len() - 1],
                    height,
                    extent: (left, right),
                }
            })
            .collect();
        TraceSummary { slits }
    }
}

fn draw_starting_points<R: Rng>(slits: usize, spread: f64, rng: &mut R) -> Vec<f64> {
    (0..slits).map(|_| rng.gen_range(-spread..=spread)).collect()
}

fn run_seeded(config: &SleConfig, seed: u64) -> SleResult<SleRun> {
    let mut rng = StdRng::seed_from_u64(seed);
    let grid = TimeGrid::linspace(0.0, config.t_end, config.steps)?;
    let starting_points = draw_starting_points(config.slits, config.spread, &mut rng);
    let driving = multiple_driving_functions(
        &starting_points,
        &grid,
        config.kappa,
        &config.scheme,
        &mut rng,
    )?;
    let trace = multiple_slits(&grid, &driving)?;
    Ok(SleRun {
        seed,
        grid,
        starting_points,
        driving,
        trace,
    })
}

/// Run one multiple SLE experiment with the configured seed.
pub fn run_multiple_sle(config: &SleConfig) -> SleResult<SleRun> {
    config.validate()?;
    run_seeded(config, config.trial_seed(0))
}

/// Run `trials` independent experiments.
pub fn run_trials(config: &SleConfig, trials: usize) -> SleResult<Vec<SleRun>> {
    config.validate()?;
    log::info!(
        "running {} trial(s): {} slits, {} steps, kappa = {}, {}",
        trials,
        config.slits,
        config.steps,
        config.kappa,
        config.scheme.name()
    );

    #[cfg(feature = "parallel")]
    let indices = (0..trials).into_par_iter();
    #[cfg(not(feature = "parallel"))]
    let indices = 0..trials;

    indices
        .map(|trial| run_seeded(config, config.trial_seed(trial)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SleConfig {
        SleConfig {
            slits: 3,
            spread: 1.0,
            t_end: 0.5,
            steps: 120,
            kappa: 2.0,
            seed: 7,
            scheme: Scheme::EulerMaruyama,
        }
    }

    #[test]
    fn run_produces_consistent_shapes() {
        let run = run_multiple_sle(&small()).unwrap();
        assert_eq!(run.starting_points.len(), 3);
        assert_eq!(run.driving.len(), 3);
        assert_eq!(run.trace.slits(), 3);
        assert_eq!(run.trace.steps(), 120);
        assert_eq!(run.grid.terminal(), 0.5);
        for (path, &x0) in run.driving.iter().zip(&run.starting_points) {
            assert_eq!(path[0], x0);
            assert!(x0.abs() <= 1.0);
        }
    }

    #[test]
    fn runs_are_reproducible() {
        let a = run_multiple_sle(&small()).unwrap();
        let b = run_multiple_sle(&small()).unwrap();
        assert_eq!(a.driving, b.driving);
        assert_eq!(a.trace, b.trace);
    }

    #[test]
    fn trials_use_distinct_seeds() {
        let runs = run_trials(&small(), 3).unwrap();
        assert_eq!(runs.len(), 3);
        assert_ne!(runs[0].starting_points, runs[1].starting_points);
        assert_eq!(runs[0].seed, small().trial_seed(0));
        // trial 0 of a batch is the single run
        assert_eq!(runs[0].trace, run_multiple_sle(&small()).unwrap().trace);
    }

    #[test]
    fn summary_reports_every_slit() {
        let run = run_multiple_sle(&small()).unwrap();
        let summary = run.summary();
        assert_eq!(summary.slits.len(), 3);
        for (slit, s) in summary.slits.iter().enumerate() {
            assert_eq!(s.tip, run.trace[(slit, 119)]);
            assert!(s.height >= s.tip.im);
            assert!(s.extent.0 <= s.extent.1);
        }
    }

    #[test]
    fn zero_spread_is_rejected_for_several_slits() {
        let config = SleConfig {
            spread: 0.0,
            ..small()
        };
        assert!(matches!(
            run_multiple_sle(&config),
            Err(SleError::InvalidParameter(_))
        ));
        assert!(run_trials(&config, 2).is_err());

        // a single slit has nothing to collide with
        let single = SleConfig {
            slits: 1,
            ..config
        };
        let run = run_multiple_sle(&single).unwrap();
        assert_eq!(run.starting_points, vec![0.0]);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        assert!(run_multiple_sle(&SleConfig { slits: 0, ..small() }).is_err());
        assert_eq!(
            run_multiple_sle(&SleConfig { steps: 0, ..small() }).unwrap_err(),
            SleError::EmptyTimeGrid
        );
        assert!(run_multiple_sle(&SleConfig { t_end: 0.0, ..small() }).is_err());
        assert!(run_multiple_sle(&SleConfig { kappa: -2.0, ..small() }).is_err());
    }

    #[test]
    fn ten_slit_preset() {
        let config = SleConfig::ten_slits();
        assert_eq!(config.slits, 10);
        assert_eq!(config.steps, 50_000);
        assert!((config.kappa - 2.618).abs() < 1e-12);
    }
}
