//! Animated rectangle state.

use crate::animation::transition::AnimationSpec;
use crate::util::rect::Rect;

/// Holds the values a [`DeviationAwareAnimator`](super::DeviationAwareAnimator)
/// mutates.
///
/// The displayed value is `trajectory - deviation`: the trajectory evolves
/// under the motion curve toward the nominal target, the deviation absorbs
/// later changes of the destination so the displayed value stays
/// continuous.
///
/// Invariant: `!running` implies `velocity == Rect::ZERO` and
/// `target == None`.
#[derive(Debug, Clone)]
pub(crate) struct AnimatorState {
    /// Start of the most recent `animate` call.
    pub(super) initial: Option<Rect>,
    /// Nominal destination of the running motion.
    pub(super) target: Option<Rect>,
    /// Value under the motion curve, before deviation compensation.
    pub(super) trajectory: Option<Rect>,
    /// Offset subtracted from the trajectory.
    pub(super) deviation: Rect,
    /// Velocity of the trajectory (units per second).
    pub(super) velocity: Rect,
    /// Whether a frame loop is subscribed.
    pub(super) running: bool,
    /// Spec the next motion will be built from.
    pub(super) spec: AnimationSpec,
    /// Bumped on every `animate` call; the frame loop rebuilds its motion
    /// when this no longer matches the generation it was built for.
    pub(super) generation: u64,
}

impl AnimatorState {
    /// Idle state, optionally already showing `initial`.
    pub(super) fn new(initial: Option<Rect>) -> Self {
        Self {
            initial,
            target: None,
            trajectory: initial,
            deviation: Rect::ZERO,
            velocity: Rect::ZERO,
            running: false,
            spec: AnimationSpec::default(),
            generation: 0,
        }
    }

    /// Displayed value.
    pub(super) fn current_value(&self) -> Option<Rect> {
        self.trajectory.map(|t| t - self.deviation)
    }

    /// Return to idle, keeping the trajectory where it is.
    pub(super) fn clear_motion(&mut self) {
        self.running = false;
        self.velocity = Rect::ZERO;
        self.target = None;
    }

    /// Place the trajectory at `value` with no deviation.
    pub(super) fn place(&mut self, value: Rect) {
        self.trajectory = Some(value);
        self.deviation = Rect::ZERO;
    }
}
