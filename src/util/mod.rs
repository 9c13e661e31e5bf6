//! Shared utilities for the transition engine.
//!
//! Rectangle math, easing curves for tween motion, and the host frame
//! clock.

pub mod easing;
pub mod frame_timing;
pub mod rect;
