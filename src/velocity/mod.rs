//! Least-squares velocity estimation from time-stamped 2D samples.
//!
//! A [`VelocityTracker`] follows one 2D quantity (an offset or a size).
//! [`BoundsVelocityTracker`] pairs two of them to estimate the velocity of
//! all four degrees of freedom of a [`Rect`].

use std::collections::VecDeque;

use glam::Vec2;

use crate::util::rect::Rect;

/// Maximum number of retained samples.
pub const HISTORY_SIZE: usize = 20;

/// Samples older than this (relative to the newest) are dropped.
pub const HORIZON_MS: i64 = 100;

/// A gap longer than this between consecutive samples means the motion
/// stopped; everything before the gap is discarded.
pub const ASSUME_STOPPED_MS: i64 = 40;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    time_ms: i64,
    position: Vec2,
}

/// Tracks samples of a 2D quantity and estimates its velocity.
#[derive(Debug, Clone, Default)]
pub struct VelocityTracker {
    samples: VecDeque<Sample>,
}

impl VelocityTracker {
    /// Empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of samples currently retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no samples are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Record `position` at `time_ms`.
    ///
    /// Samples older than the newest one are ignored.
    pub fn add_sample(&mut self, time_ms: i64, position: Vec2) {
        if let Some(newest) = self.samples.back() {
            if time_ms < newest.time_ms {
                return;
            }
            if time_ms - newest.time_ms > ASSUME_STOPPED_MS {
                self.samples.clear();
            }
        }

        self.samples.push_back(Sample { time_ms, position });

        while self.samples.len() > HISTORY_SIZE {
            let _ = self.samples.pop_front();
        }
        while self
            .samples
            .front()
            .is_some_and(|oldest| time_ms - oldest.time_ms > HORIZON_MS)
        {
            let _ = self.samples.pop_front();
        }
    }

    /// Velocity in units per second from an ordinary least-squares line
    /// through the retained samples. Zero with fewer than two samples or
    /// when every sample shares one timestamp.
    #[must_use]
    pub fn estimate_velocity(&self) -> Vec2 {
        let Some(newest) = self.samples.back() else {
            return Vec2::ZERO;
        };
        if self.samples.len() < 2 {
            return Vec2::ZERO;
        }

        // Seconds relative to the newest sample keep the sums small.
        let n = self.samples.len() as f32;
        let times = self
            .samples
            .iter()
            .map(|s| (s.time_ms - newest.time_ms) as f32 / 1000.0);
        let mean_t = times.clone().sum::<f32>() / n;
        let mean_p = self.samples.iter().map(|s| s.position).sum::<Vec2>() / n;

        let mut covariance = Vec2::ZERO;
        let mut variance = 0.0_f32;
        for (t, sample) in times.zip(self.samples.iter()) {
            let dt = t - mean_t;
            covariance += (sample.position - mean_p) * dt;
            variance += dt * dt;
        }

        if variance <= f32::EPSILON {
            return Vec2::ZERO;
        }
        covariance / variance
    }

    /// Drop all samples.
    pub fn reset(&mut self) {
        self.samples.clear();
    }
}

/// Position and size trackers for one rectangle.
#[derive(Debug, Clone, Default)]
pub struct BoundsVelocityTracker {
    position: VelocityTracker,
    size: VelocityTracker,
}

impl BoundsVelocityTracker {
    /// Empty tracker pair.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample the top-left corner and size of `bounds`.
    pub fn add_bounds(&mut self, time_ms: i64, bounds: Rect) {
        self.position.add_sample(time_ms, bounds.top_left());
        self.size.add_sample(time_ms, bounds.size());
    }

    /// Rectangle velocity: offset velocity as the top-left, size velocity
    /// as the extent.
    #[must_use]
    pub fn velocity(&self) -> Rect {
        Rect::from_offset_size(
            self.position.estimate_velocity(),
            self.size.estimate_velocity(),
        )
    }

    /// Drop all samples of both trackers.
    pub fn reset(&mut self) {
        self.position.reset();
        self.size.reset();
    }
}
