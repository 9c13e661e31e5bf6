//! Damped harmonic oscillator used as the default bounds physics.
//!
//! The spring is solved in closed form (unit mass), so any play time can
//! be evaluated directly without integrating frame by frame. This is what
//! lets the animator rebuild a motion mid-flight and keep evaluating it at
//! an accumulated play time.
//!
//! - **stiffness** (k): restoring force strength. ω₀ = √k.
//! - **damping ratio** (ζ): < 1 oscillates, = 1 is critically damped,
//!   > 1 creeps without overshoot. ζ = 0 never settles.
//! - **visibility threshold**: displacement below which motion is no
//!   longer visible; used to estimate a finite duration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Stiffness presets.
pub mod stiffness {
    /// Very stiff spring.
    pub const HIGH: f32 = 10_000.0;
    /// Medium stiffness.
    pub const MEDIUM: f32 = 1_500.0;
    /// Medium-low stiffness; the default for bounds transitions.
    pub const MEDIUM_LOW: f32 = 400.0;
    /// Low stiffness.
    pub const LOW: f32 = 200.0;
    /// Very low stiffness.
    pub const VERY_LOW: f32 = 50.0;
}

/// Damping ratio presets.
pub mod damping {
    /// Pronounced bounce.
    pub const HIGH_BOUNCY: f32 = 0.2;
    /// Noticeable bounce.
    pub const MEDIUM_BOUNCY: f32 = 0.5;
    /// Subtle bounce.
    pub const LOW_BOUNCY: f32 = 0.75;
    /// Critically damped, no overshoot.
    pub const NO_BOUNCY: f32 = 1.0;
}

/// Displacement below which rectangle motion is considered invisible.
pub const RECT_VISIBILITY_THRESHOLD: f32 = 0.5;

/// Upper bound on any estimated spring duration.
const MAX_SETTLE_SECS: f64 = 60.0;

/// Spring physics parameters.
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema,
)]
#[serde(default)]
pub struct SpringSpec {
    /// Damping ratio ζ (clamped to ≥ 0).
    pub damping_ratio: f32,
    /// Stiffness k (clamped to > 0).
    pub stiffness: f32,
    /// Displacement below which the spring counts as settled.
    pub visibility_threshold: f32,
}

impl SpringSpec {
    /// Create with explicit parameters.
    #[must_use]
    pub fn new(
        damping_ratio: f32,
        stiffness: f32,
        visibility_threshold: f32,
    ) -> Self {
        Self {
            damping_ratio: damping_ratio.max(0.0),
            stiffness: stiffness.max(f32::EPSILON),
            visibility_threshold: visibility_threshold.abs(),
        }
    }

    /// Same spring with a different visibility threshold.
    #[must_use]
    pub fn with_visibility_threshold(mut self, threshold: f32) -> Self {
        self.visibility_threshold = threshold.abs();
        self
    }

    /// Whether the spring oscillates forever.
    #[must_use]
    pub fn is_undamped(&self) -> bool {
        self.damping_ratio <= 0.0
    }

    /// Closed-form solution for one component released at `displacement`
    /// from its rest point with `velocity`.
    #[must_use]
    pub fn solve(&self, displacement: f32, velocity: f32) -> SpringSolution {
        SpringSolution::new(self, f64::from(displacement), f64::from(velocity))
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self {
            damping_ratio: damping::NO_BOUNCY,
            stiffness: stiffness::MEDIUM_LOW,
            visibility_threshold: RECT_VISIBILITY_THRESHOLD,
        }
    }
}

/// Regime-specific coefficients of x(t).
#[derive(Debug, Clone, Copy)]
enum Regime {
    /// x = e^(-ζω₀t)(a·cos ω_d t + b·sin ω_d t)
    Under { decay: f64, omega_d: f64, a: f64, b: f64 },
    /// x = (a + b·t)e^(-ω₀t)
    Critical { omega: f64, a: f64, b: f64 },
    /// x = c1·e^(r1·t) + c2·e^(r2·t)
    Over { r1: f64, r2: f64, c1: f64, c2: f64 },
}

/// Displacement and velocity of one spring component over time.
#[derive(Debug, Clone, Copy)]
pub struct SpringSolution {
    regime: Regime,
}

impl SpringSolution {
    fn new(spec: &SpringSpec, x0: f64, v0: f64) -> Self {
        let omega = f64::from(spec.stiffness).sqrt();
        let zeta = f64::from(spec.damping_ratio);

        let regime = if zeta < 1.0 {
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let decay = zeta * omega;
            Regime::Under {
                decay,
                omega_d,
                a: x0,
                b: (v0 + decay * x0) / omega_d,
            }
        } else if zeta == 1.0 {
            Regime::Critical {
                omega,
                a: x0,
                b: v0 + omega * x0,
            }
        } else {
            let root = omega * (zeta * zeta - 1.0).sqrt();
            let r1 = -zeta * omega + root;
            let r2 = -zeta * omega - root;
            let c2 = (v0 - r1 * x0) / (r2 - r1);
            Regime::Over {
                r1,
                r2,
                c1: x0 - c2,
                c2,
            }
        };
        Self { regime }
    }

    /// Displacement from the rest point at `t` seconds.
    #[must_use]
    pub fn displacement(&self, t: f64) -> f64 {
        match self.regime {
            Regime::Under {
                decay,
                omega_d,
                a,
                b,
            } => {
                let (sin, cos) = (omega_d * t).sin_cos();
                (-decay * t).exp() * (a * cos + b * sin)
            }
            Regime::Critical { omega, a, b } => (a + b * t) * (-omega * t).exp(),
            Regime::Over { r1, r2, c1, c2 } => {
                c1 * (r1 * t).exp() + c2 * (r2 * t).exp()
            }
        }
    }

    /// Velocity at `t` seconds.
    #[must_use]
    pub fn velocity(&self, t: f64) -> f64 {
        match self.regime {
            Regime::Under {
                decay,
                omega_d,
                a,
                b,
            } => {
                let (sin, cos) = (omega_d * t).sin_cos();
                (-decay * t).exp()
                    * ((b * omega_d - decay * a) * cos
                        - (a * omega_d + decay * b) * sin)
            }
            Regime::Critical { omega, a, b } => {
                (b - omega * (a + b * t)) * (-omega * t).exp()
            }
            Regime::Over { r1, r2, c1, c2 } => {
                c1 * r1 * (r1 * t).exp() + c2 * r2 * (r2 * t).exp()
            }
        }
    }

    /// Upper bound on |displacement| at `t`.
    fn envelope(&self, t: f64) -> f64 {
        match self.regime {
            Regime::Under { decay, a, b, .. } => {
                a.hypot(b) * (-decay * t).exp()
            }
            Regime::Critical { omega, a, b } => {
                (a.abs() + b.abs() * t) * (-omega * t).exp()
            }
            Regime::Over { r1, r2, c1, c2 } => {
                c1.abs() * (r1 * t).exp() + c2.abs() * (r2 * t).exp()
            }
        }
    }

    /// Time (seconds) at which the envelope is non-increasing. Past this
    /// point, once below the threshold it stays below.
    fn envelope_peak(&self) -> f64 {
        match self.regime {
            Regime::Critical { omega, a, b } if b != 0.0 => {
                ((b.abs() - omega * a.abs()) / (omega * b.abs())).max(0.0)
            }
            _ => 0.0,
        }
    }

    /// Seconds until the displacement stays within `threshold`, or `None`
    /// if it never does.
    #[must_use]
    pub fn settle_time(&self, threshold: f64) -> Option<f64> {
        if let Regime::Under { decay, .. } = self.regime {
            if decay <= 0.0 {
                return (self.envelope(0.0) <= threshold).then_some(0.0);
            }
        }

        // The envelope is largest at its peak, so below there means always.
        let start = self.envelope_peak();
        if self.envelope(start) <= threshold {
            return Some(0.0);
        }

        // Expand until the envelope drops below threshold, then bisect.
        let mut lo = start;
        let mut step = 0.001;
        let mut hi = start + step;
        while self.envelope(hi) > threshold {
            lo = hi;
            step *= 2.0;
            hi = start + step;
            if hi > MAX_SETTLE_SECS {
                return Some(MAX_SETTLE_SECS);
            }
        }
        for _ in 0..40 {
            let mid = 0.5 * (lo + hi);
            if self.envelope(mid) > threshold {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Some(hi)
    }
}
