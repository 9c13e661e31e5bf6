//! Target-based motion: a fixed curve from an initial to a target rect.
//!
//! A motion is immutable once built. Retargeting builds a new one; the
//! animator keeps a play-time cursor into the current motion.

use super::spring::SpringSolution;
use super::transition::AnimationSpec;
use crate::util::rect::Rect;

/// Finite-difference step for tween velocity (1ms).
const VELOCITY_STEP_NANOS: i64 = 1_000_000;

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Per-spec evaluation state.
#[derive(Debug, Clone)]
enum Curve {
    /// One closed-form solution per rect component.
    Spring([SpringSolution; 4]),
    Tween(super::tween::TweenSpec),
    Snap,
}

/// A motion curve for one rectangle.
#[derive(Debug, Clone)]
pub struct RectMotion {
    spec: AnimationSpec,
    curve: Curve,
    initial: Rect,
    target: Rect,
    duration_nanos: i64,
    infinite: bool,
}

impl RectMotion {
    /// Build the curve for `spec` from `initial` to `target`, starting with
    /// `initial_velocity` (units per second, per component).
    #[must_use]
    pub fn new(
        spec: AnimationSpec,
        initial: Rect,
        target: Rect,
        initial_velocity: Rect,
    ) -> Self {
        let (curve, duration_nanos, infinite) = match spec {
            AnimationSpec::Spring(spring) => {
                let displacement = (initial - target).to_array();
                let velocity = initial_velocity.to_array();
                let solutions: [SpringSolution; 4] = std::array::from_fn(|i| {
                    spring.solve(displacement[i], velocity[i])
                });

                let threshold = f64::from(spring.visibility_threshold);
                let mut longest = 0.0_f64;
                let mut infinite = false;
                for solution in &solutions {
                    match solution.settle_time(threshold) {
                        Some(secs) => longest = longest.max(secs),
                        None => infinite = true,
                    }
                }
                let nanos = if infinite {
                    i64::MAX
                } else {
                    (longest * NANOS_PER_SEC).ceil() as i64
                };
                (Curve::Spring(solutions), nanos, infinite)
            }
            AnimationSpec::Tween(tween) => {
                (Curve::Tween(tween), tween.total_nanos(), false)
            }
            AnimationSpec::Snap => (Curve::Snap, 0, false),
        };

        Self {
            spec,
            curve,
            initial,
            target,
            duration_nanos,
            infinite,
        }
    }

    /// Spec this motion was built from.
    #[must_use]
    pub fn spec(&self) -> &AnimationSpec {
        &self.spec
    }

    /// Start value.
    #[must_use]
    pub fn initial(&self) -> Rect {
        self.initial
    }

    /// End value.
    #[must_use]
    pub fn target(&self) -> Rect {
        self.target
    }

    /// Play time after which the motion is complete.
    #[must_use]
    pub fn duration_nanos(&self) -> i64 {
        self.duration_nanos
    }

    /// Whether the motion never completes on its own.
    #[must_use]
    pub fn is_infinite(&self) -> bool {
        self.infinite
    }

    /// Whether `play_nanos` is at or past the end of a finite motion.
    #[must_use]
    pub fn is_finished_at(&self, play_nanos: i64) -> bool {
        !self.infinite && play_nanos >= self.duration_nanos
    }

    /// Value at `play_nanos`.
    #[must_use]
    pub fn value_at(&self, play_nanos: i64) -> Rect {
        match &self.curve {
            Curve::Spring(solutions) => {
                let t = play_nanos.max(0) as f64 / NANOS_PER_SEC;
                let target = self.target.to_array();
                Rect::from_array(std::array::from_fn(|i| {
                    target[i] + solutions[i].displacement(t) as f32
                }))
            }
            Curve::Tween(tween) => {
                self.initial.lerp(&self.target, tween.progress(play_nanos))
            }
            Curve::Snap => self.target,
        }
    }

    /// Velocity (units per second) at `play_nanos`.
    #[must_use]
    pub fn velocity_at(&self, play_nanos: i64) -> Rect {
        match &self.curve {
            Curve::Spring(solutions) => {
                let t = play_nanos.max(0) as f64 / NANOS_PER_SEC;
                Rect::from_array(std::array::from_fn(|i| {
                    solutions[i].velocity(t) as f32
                }))
            }
            Curve::Tween(_) => {
                let before = (play_nanos - VELOCITY_STEP_NANOS).max(0);
                let span = (play_nanos - before) as f32 / NANOS_PER_SEC as f32;
                if span <= 0.0 {
                    return Rect::ZERO;
                }
                (self.value_at(play_nanos) - self.value_at(before)) * (1.0 / span)
            }
            Curve::Snap => Rect::ZERO,
        }
    }
}
