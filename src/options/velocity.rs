use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default scale applied to tracked velocity at hand-off.
pub const DEFAULT_VELOCITY_MULTIPLIER: f32 = 1.3;

/// Gesture velocity hand-off.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Velocity", inline)]
#[serde(default)]
pub struct VelocityOptions {
    /// Scale applied to the tracked velocity of a key group when it seeds
    /// a new animation.
    #[schemars(title = "Multiplier", range(min = 0.0, max = 3.0), extend("step" = 0.1))]
    pub initial_velocity_multiplier: f32,
}

impl Default for VelocityOptions {
    fn default() -> Self {
        Self {
            initial_velocity_multiplier: DEFAULT_VELOCITY_MULTIPLIER,
        }
    }
}
