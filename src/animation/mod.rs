//! Bounds animation: motion curves, the retargetable animator and the
//! per-instance transition controller.

pub mod animator;
pub mod motion;
pub mod spring;
pub mod transition;
pub mod tween;

pub use animator::{DeviationAwareAnimator, TransitionController, VisibilityPredicate};
pub use transition::{AnimationSpec, BoundsTransform, SharedBoundsTransform};
