//! Easing curves for duration-based (tween) bounds motion.
//!
//! The named curves are the standard material motion cubic Béziers; all
//! of them map 0 to 0 and 1 to 1.

/// Easing function variants for tween curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// Accelerate quickly, settle slowly. Bezier (0.4, 0.0, 0.2, 1.0).
    FastOutSlowIn,
    /// Start at full speed, settle slowly. Bezier (0.0, 0.0, 0.2, 1.0).
    LinearOutSlowIn,
    /// Accelerate, then leave at full speed. Bezier (0.4, 0.0, 1.0, 1.0).
    FastOutLinearIn,
    /// Arbitrary cubic Bézier through (0,0), (x1,y1), (x2,y2), (1,1).
    CubicBezier {
        /// First control point x, in [0, 1].
        x1: f32,
        /// First control point y.
        y1: f32,
        /// Second control point x, in [0, 1].
        x2: f32,
        /// Second control point y.
        y2: f32,
    },
}

/// Newton/bisection tolerance when inverting the Bézier x(t).
const BEZIER_EPSILON: f32 = 1e-5;

impl EasingFunction {
    /// Default tween easing.
    pub const DEFAULT: EasingFunction = EasingFunction::FastOutSlowIn;

    /// Evaluate the easing function at fraction `t`.
    ///
    /// Input is clamped to [0.0, 1.0].
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            EasingFunction::Linear => t,
            EasingFunction::FastOutSlowIn => cubic_bezier(0.4, 0.0, 0.2, 1.0, t),
            EasingFunction::LinearOutSlowIn => {
                cubic_bezier(0.0, 0.0, 0.2, 1.0, t)
            }
            EasingFunction::FastOutLinearIn => {
                cubic_bezier(0.4, 0.0, 1.0, 1.0, t)
            }
            EasingFunction::CubicBezier { x1, y1, x2, y2 } => {
                cubic_bezier(x1, y1, x2, y2, t)
            }
        }
    }
}

impl Default for EasingFunction {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One axis of a cubic Bézier with endpoints 0 and 1.
#[inline]
fn bezier_axis(p1: f32, p2: f32, s: f32) -> f32 {
    let omt = 1.0 - s;
    3.0 * p1 * s * omt * omt + 3.0 * p2 * omt * s * s + s * s * s
}

#[inline]
fn bezier_axis_slope(p1: f32, p2: f32, s: f32) -> f32 {
    let omt = 1.0 - s;
    3.0 * p1 * omt * omt + 6.0 * (p2 - p1) * omt * s + 3.0 * (1.0 - p2) * s * s
}

/// Solve x(s) = `x` for the curve parameter, then return y(s).
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, x: f32) -> f32 {
    if x <= 0.0 || x >= 1.0 {
        return x;
    }

    // Newton first; it converges in a few steps for well-behaved curves.
    let mut s = x;
    for _ in 0..8 {
        let err = bezier_axis(x1, x2, s) - x;
        if err.abs() < BEZIER_EPSILON {
            return bezier_axis(y1, y2, s);
        }
        let slope = bezier_axis_slope(x1, x2, s);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= err / slope;
    }

    // Fall back to bisection (x(s) is monotonic for x1, x2 in [0, 1]).
    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    s = x;
    for _ in 0..32 {
        let value = bezier_axis(x1, x2, s);
        if (value - x).abs() < BEZIER_EPSILON {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = 0.5 * (lo + hi);
    }
    bezier_axis(y1, y2, s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_endpoints() {
        let linear = EasingFunction::Linear;
        assert_eq!(linear.evaluate(0.0), 0.0);
        assert_eq!(linear.evaluate(0.5), 0.5);
        assert_eq!(linear.evaluate(1.0), 1.0);
    }

    #[test]
    fn test_named_curves_hit_endpoints() {
        for easing in [
            EasingFunction::FastOutSlowIn,
            EasingFunction::LinearOutSlowIn,
            EasingFunction::FastOutLinearIn,
        ] {
            assert_eq!(easing.evaluate(0.0), 0.0);
            assert_eq!(easing.evaluate(1.0), 1.0);
        }
    }

    #[test]
    fn test_fast_out_slow_in_is_ahead_late() {
        // Decelerating tail: past the midpoint the curve leads linear time.
        let v = EasingFunction::FastOutSlowIn.evaluate(0.75);
        assert!(v > 0.75, "expected ease-out tail above 0.75, got {v}");
    }

    #[test]
    fn test_linear_bezier_matches_linear() {
        let easing = EasingFunction::CubicBezier {
            x1: 1.0 / 3.0,
            y1: 1.0 / 3.0,
            x2: 2.0 / 3.0,
            y2: 2.0 / 3.0,
        };
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((easing.evaluate(t) - t).abs() < 1e-3);
        }
    }

    #[test]
    fn test_input_clamping() {
        assert_eq!(EasingFunction::Linear.evaluate(-0.5), 0.0);
        assert_eq!(EasingFunction::Linear.evaluate(1.5), 1.0);
        assert_eq!(EasingFunction::FastOutSlowIn.evaluate(2.0), 1.0);
    }
}
