use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::animation::spring::{damping, stiffness, SpringSpec, RECT_VISIBILITY_THRESHOLD};

/// Spring used when an instance registers without its own bounds
/// transform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Spring", inline)]
#[serde(default)]
pub struct SpringOptions {
    /// Damping ratio; 1.0 is critically damped.
    #[schemars(title = "Damping Ratio", range(min = 0.05, max = 2.0), extend("step" = 0.05))]
    pub damping_ratio: f32,
    /// Spring stiffness.
    #[schemars(title = "Stiffness", range(min = 10.0, max = 10000.0), extend("step" = 10.0))]
    pub stiffness: f32,
    /// Displacement (px) below which motion counts as settled.
    #[schemars(skip)]
    pub visibility_threshold: f32,
}

impl SpringOptions {
    /// Physics parameters for these options.
    #[must_use]
    pub fn spec(&self) -> SpringSpec {
        SpringSpec::new(self.damping_ratio, self.stiffness, self.visibility_threshold)
    }
}

impl Default for SpringOptions {
    fn default() -> Self {
        Self {
            damping_ratio: damping::NO_BOUNCY,
            stiffness: stiffness::MEDIUM_LOW,
            visibility_threshold: RECT_VISIBILITY_THRESHOLD,
        }
    }
}
