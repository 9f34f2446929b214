//! Time grids shared by all slits of a simulation.

use crate::error::{SleError, SleResult};

/// One slit's driving function sampled on a [`TimeGrid`].
pub type DrivingPath = Vec<f64>;

/// Strictly increasing sample times `t[0..M-1]`.
///
/// Steps need not be uniform. The grid is validated once on construction and
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: Vec<f64>,
}

impl TimeGrid {
    /// Build a grid from explicit sample times.
    pub fn new(times: Vec<f64>) -> SleResult<Self> {
        if times.is_empty() {
            return Err(SleError::EmptyTimeGrid);
        }
        for (index, t) in times.iter().enumerate() {
            if !t.is_finite() {
                return Err(SleError::NonFiniteTime { index });
            }
        }
        for index in 1..times.len() {
            let (previous, current) = (times[index - 1], times[index]);
            if current <= previous {
                return Err(SleError::NonIncreasingTime {
                    index,
                    previous,
                    current,
                });
            }
        }
        Ok(Self { times })
    }

    /// `points` evenly spaced samples from `start` to `end`, both included.
    ///
    /// The last sample is exactly `end`.
    pub fn linspace(start: f64, end: f64, points: usize) -> SleResult<Self> {
        let times = match points {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (end - start) / (points - 1) as f64;
                let mut times: Vec<f64> = (0..points).map(|i| start + i as f64 * step).collect();
                times[points - 1] = end;
                times
            }
        };
        Self::new(times)
    }

    /// Uniform grid `0, dt, 2·dt, …` with `points` samples.
    pub fn uniform(dt: f64, points: usize) -> SleResult<Self> {
        Self::new((0..points).map(|i| i as f64 * dt).collect())
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Terminal time `t[M-1]`.
    pub fn terminal(&self) -> f64 {
        // non-empty by construction
        self.times[self.times.len() - 1]
    }

    /// Increment `t[step] - t[step-1]`, for `step >= 1`.
    #[inline]
    pub fn increment(&self, step: usize) -> f64 {
        self.times[step] - self.times[step - 1]
    }

    /// Check that a driving path covers the grid exactly.
    pub fn check_path(&self, slit: usize, path: &[f64]) -> SleResult<()> {
        if path.len() != self.len() {
            return Err(SleError::LengthMismatch {
                slit,
                expected: self.len(),
                found: path.len(),
            });
        }
        Ok(())
    }
}

impl std::ops::Index<usize> for TimeGrid {
    type Output = f64;

    fn index(&self, step: usize) -> &f64 {
        &self.times[step]
    }
}
