//! Bounds transforms describe how to animate from current to target bounds.

use std::sync::Arc;

use super::spring::SpringSpec;
use super::tween::TweenSpec;
use crate::util::rect::Rect;

/// Physics model used to build a motion curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationSpec {
    /// Closed-form damped spring; duration derived from its threshold.
    Spring(SpringSpec),
    /// Fixed-duration eased interpolation.
    Tween(TweenSpec),
    /// Jump to the target with zero duration.
    Snap,
}

impl AnimationSpec {
    /// Short name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Spring(_) => "spring",
            Self::Tween(_) => "tween",
            Self::Snap => "snap",
        }
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::Spring(SpringSpec::default())
    }
}

/// Produces the animation spec for a transition given where the element is
/// now and where it is going.
///
/// Closures `Fn(Rect, Rect) -> AnimationSpec` implement this trait, so
/// callers can pick springs based on travel distance.
pub trait BoundsTransform: Send + Sync {
    /// Spec for animating from `initial` to `target`.
    fn transform(&self, initial: Rect, target: Rect) -> AnimationSpec;

    /// Optional name for debugging/logging.
    fn name(&self) -> &'static str {
        "unnamed"
    }
}

impl<F> BoundsTransform for F
where
    F: Fn(Rect, Rect) -> AnimationSpec + Send + Sync,
{
    fn transform(&self, initial: Rect, target: Rect) -> AnimationSpec {
        self(initial, target)
    }
}

/// Type alias for shared bounds transform references.
pub type SharedBoundsTransform = Arc<dyn BoundsTransform>;

/// Create a shared transform from any [`BoundsTransform`].
#[must_use]
pub fn shared<T: BoundsTransform + 'static>(transform: T) -> SharedBoundsTransform {
    Arc::new(transform)
}

/// Always the same spring, regardless of travel.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpringTransform(pub SpringSpec);

impl BoundsTransform for SpringTransform {
    fn transform(&self, _initial: Rect, _target: Rect) -> AnimationSpec {
        AnimationSpec::Spring(self.0)
    }

    fn name(&self) -> &'static str {
        "spring"
    }
}

/// Always the same tween.
#[derive(Debug, Clone, Copy, Default)]
pub struct TweenTransform(pub TweenSpec);

impl BoundsTransform for TweenTransform {
    fn transform(&self, _initial: Rect, _target: Rect) -> AnimationSpec {
        AnimationSpec::Tween(self.0)
    }

    fn name(&self) -> &'static str {
        "tween"
    }
}

/// No animation: bounds jump to the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapTransform;

impl BoundsTransform for SnapTransform {
    fn transform(&self, _initial: Rect, _target: Rect) -> AnimationSpec {
        AnimationSpec::Snap
    }

    fn name(&self) -> &'static str {
        "snap"
    }
}

/// Default bounds transform: medium-low stiffness, no bounce, 0.5px
/// visibility threshold.
#[must_use]
pub fn default_bounds_transform() -> SharedBoundsTransform {
    shared(SpringTransform::default())
}
