use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Debug toggles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Debug", inline)]
#[serde(default)]
pub struct DebugOptions {
    /// Time dilation; 2.0 plays transitions at half speed, 0.0 finishes
    /// them on the next frame.
    #[schemars(title = "Duration Scale", range(min = 0.0, max = 10.0), extend("step" = 0.25))]
    pub duration_scale: f32,
    /// Draw matched elements in the overlay while transitioning. When off,
    /// everything renders in place.
    #[schemars(title = "Render In Overlay")]
    pub render_in_overlay: bool,
}

impl Default for DebugOptions {
    fn default() -> Self {
        Self {
            duration_scale: 1.0,
            render_in_overlay: true,
        }
    }
}
