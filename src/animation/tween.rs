//! Duration-based bounds motion with easing.

use std::time::Duration;

use crate::util::easing::EasingFunction;

/// Tween parameters: wait `delay`, then ease over `duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec {
    /// Length of the eased section.
    pub duration: Duration,
    /// Time held at the initial value before moving.
    pub delay: Duration,
    /// Curve applied to the fraction of `duration` elapsed.
    pub easing: EasingFunction,
}

impl TweenSpec {
    /// Create with no delay.
    #[must_use]
    pub fn new(duration: Duration, easing: EasingFunction) -> Self {
        Self {
            duration,
            delay: Duration::ZERO,
            easing,
        }
    }

    /// Linear tween (no easing distortion).
    #[must_use]
    pub fn linear(duration: Duration) -> Self {
        Self::new(duration, EasingFunction::Linear)
    }

    /// Set a start delay.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Delay plus duration, in nanoseconds.
    #[must_use]
    pub fn total_nanos(&self) -> i64 {
        let total = self.delay + self.duration;
        i64::try_from(total.as_nanos()).unwrap_or(i64::MAX)
    }

    /// Eased progress (0.0 to 1.0) at `play_nanos`.
    #[must_use]
    pub fn progress(&self, play_nanos: i64) -> f32 {
        let delay = i64::try_from(self.delay.as_nanos()).unwrap_or(i64::MAX);
        let active = play_nanos.saturating_sub(delay).max(0);
        if self.duration.is_zero() {
            return if play_nanos >= delay { 1.0 } else { 0.0 };
        }
        let raw = active as f64 / self.duration.as_nanos() as f64;
        self.easing.evaluate(raw.min(1.0) as f32)
    }
}

impl Default for TweenSpec {
    /// 300ms fast-out-slow-in.
    fn default() -> Self {
        Self::new(Duration::from_millis(300), EasingFunction::DEFAULT)
    }
}
