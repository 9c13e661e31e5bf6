//! Transition controller decides when a bounds change starts a new
//! animation and when it only moves the destination.

use super::DeviationAwareAnimator;
use crate::animation::transition::{default_bounds_transform, SharedBoundsTransform};
use crate::util::rect::Rect;

/// Host-supplied visibility predicate for one element instance.
pub type VisibilityPredicate = Box<dyn Fn() -> bool>;

/// Per-instance controller wrapping a lazily created
/// [`DeviationAwareAnimator`].
///
/// Every time [`is_target`](Self::is_target) observes the visibility
/// predicate flip, an animation request becomes pending. The next
/// [`animate`](Self::animate) call while the transition is active consumes
/// it and starts a fresh motion; calls without a pending request only move
/// the destination.
pub struct TransitionController {
    animator: Option<DeviationAwareAnimator>,
    bounds_transform: SharedBoundsTransform,
    predicate: VisibilityPredicate,
    previous_target: bool,
    pending: bool,
}

impl TransitionController {
    /// Create a controller and take the first predicate reading.
    ///
    /// The previous reading starts out `false`, so an instance that is
    /// already visible at creation has a pending animation request.
    #[must_use]
    pub fn new(predicate: VisibilityPredicate, bounds_transform: SharedBoundsTransform) -> Self {
        let mut controller = Self {
            animator: None,
            bounds_transform,
            predicate,
            previous_target: false,
            pending: false,
        };
        let _ = controller.is_target();
        controller
    }

    /// Controller using the default spring transform.
    #[must_use]
    pub fn with_default_transform(predicate: VisibilityPredicate) -> Self {
        Self::new(predicate, default_bounds_transform())
    }

    /// Evaluate the visibility predicate. A change since the last reading
    /// marks an animation request pending.
    pub fn is_target(&mut self) -> bool {
        let target = (self.predicate)();
        if target != self.previous_target {
            self.pending = true;
        }
        self.previous_target = target;
        target
    }

    /// Last predicate reading, without re-evaluating.
    #[must_use]
    pub fn last_target(&self) -> bool {
        self.previous_target
    }

    /// Whether an animation request is waiting for the next
    /// [`animate`](Self::animate).
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Running animator or pending request.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.pending || self.animator.as_ref().is_some_and(DeviationAwareAnimator::is_running)
    }

    /// Feed new bounds. Ignored unless `transition_active`.
    ///
    /// The animator is created at `current` if needed, then follows
    /// `target` through its deviation. If a request is pending a new motion
    /// starts from `current` with the spec the bounds transform picks for
    /// the trajectory value and `target`; `initial_velocity` is only called
    /// in that case.
    pub fn animate(
        &mut self,
        current: Rect,
        target: Rect,
        transition_active: bool,
        initial_velocity: impl FnOnce() -> Option<Rect>,
    ) {
        if !transition_active {
            return;
        }
        let animator = self
            .animator
            .get_or_insert_with(|| DeviationAwareAnimator::new(Some(current)));
        animator.deviate_or_snap_to(target);

        if self.pending {
            let from = animator.trajectory().unwrap_or(current);
            let spec = self.bounds_transform.transform(from, target);
            log::debug!(
                "starting bounds transition ({} via {})",
                spec.name(),
                self.bounds_transform.name()
            );
            animator.animate(current, target, spec, initial_velocity());
            self.pending = false;
        }
    }

    /// Advance the animator one frame. Returns whether it is still running.
    pub fn on_frame(&mut self, frame_nanos: i64, duration_scale: f32) -> bool {
        self.animator
            .as_mut()
            .is_some_and(|animator| animator.on_frame(frame_nanos, duration_scale))
    }

    /// Animated value, only while the transition is active.
    #[must_use]
    pub fn value(&self, transition_active: bool) -> Option<Rect> {
        if !transition_active {
            return None;
        }
        self.animator.as_ref().and_then(DeviationAwareAnimator::current_value)
    }

    /// Stop any running motion, drop a pending request and rest at
    /// `bounds`. Used when a bounds change must not animate.
    pub fn settle(&mut self, bounds: Rect) {
        self.pending = false;
        if let Some(animator) = self.animator.as_mut() {
            animator.snap_to(bounds);
        }
    }

    /// Transform used for the next animation request.
    #[must_use]
    pub fn bounds_transform(&self) -> &SharedBoundsTransform {
        &self.bounds_transform
    }

    /// Replace the transform. Takes effect on the next animation request.
    pub fn set_bounds_transform(&mut self, bounds_transform: SharedBoundsTransform) {
        self.bounds_transform = bounds_transform;
    }

    /// Underlying animator, once created.
    #[must_use]
    pub fn animator(&self) -> Option<&DeviationAwareAnimator> {
        self.animator.as_ref()
    }
}

impl std::fmt::Debug for TransitionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionController")
            .field("animator", &self.animator)
            .field("bounds_transform", &self.bounds_transform.name())
            .field("previous_target", &self.previous_target)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::animation::transition::{shared, AnimationSpec, SnapTransform};

    fn toggle(initial: bool) -> (Rc<Cell<bool>>, VisibilityPredicate) {
        let flag = Rc::new(Cell::new(initial));
        let reader = Rc::clone(&flag);
        (flag, Box::new(move || reader.get()))
    }

    fn a() -> Rect {
        Rect::new(0.0, 0.0, 10.0, 10.0)
    }

    fn b() -> Rect {
        Rect::new(50.0, 50.0, 90.0, 90.0)
    }

    #[test]
    fn test_visible_at_creation_is_pending() {
        let (_, predicate) = toggle(true);
        let controller = TransitionController::with_default_transform(predicate);
        assert!(controller.is_pending());
        assert!(controller.is_running());
    }

    #[test]
    fn test_hidden_at_creation_is_idle() {
        let (flag, predicate) = toggle(false);
        let mut controller = TransitionController::with_default_transform(predicate);
        assert!(!controller.is_running());
        flag.set(true);
        assert!(controller.is_target());
        assert!(controller.is_pending());
    }

    #[test]
    fn test_animate_ignored_when_inactive() {
        let (_, predicate) = toggle(true);
        let mut controller = TransitionController::with_default_transform(predicate);
        controller.animate(a(), b(), false, || None);
        assert!(controller.animator().is_none());
        assert!(controller.is_pending());
        assert!(controller.value(false).is_none());
    }

    #[test]
    fn test_pending_request_starts_motion_once() {
        let (_, predicate) = toggle(true);
        let mut controller = TransitionController::with_default_transform(predicate);
        let calls = Cell::new(0);
        controller.animate(a(), b(), true, || {
            calls.set(calls.get() + 1);
            Some(Rect::new(100.0, 0.0, 100.0, 0.0))
        });
        assert!(!controller.is_pending());
        assert!(controller.is_running());
        assert_eq!(controller.value(true), Some(a()));
        assert_eq!(
            controller.animator().map(DeviationAwareAnimator::velocity),
            Some(Rect::new(100.0, 0.0, 100.0, 0.0))
        );

        // No new request: only the destination moves.
        let moved = b().translate(glam::Vec2::new(0.0, 5.0));
        controller.animate(a(), moved, true, || {
            calls.set(calls.get() + 1);
            None
        });
        assert_eq!(calls.get(), 1);
        assert_eq!(controller.value(true), Some(a() - Rect::new(0.0, -5.0, 0.0, -5.0)));
    }

    #[test]
    fn test_runs_to_completion_through_frames() {
        let (_, predicate) = toggle(true);
        let mut controller = TransitionController::new(
            predicate,
            shared(|_: Rect, _: Rect| AnimationSpec::Snap),
        );
        controller.animate(a(), b(), true, || None);
        assert!(controller.on_frame(0, 1.0));
        assert!(!controller.on_frame(16_000_000, 1.0));
        assert!(!controller.is_running());
        assert_eq!(controller.value(true), Some(b()));
    }

    #[test]
    fn test_settle_snaps_running_animator() {
        let (_, predicate) = toggle(true);
        let mut controller = TransitionController::with_default_transform(predicate);
        controller.animate(a(), b(), true, || None);
        controller.settle(b());
        assert!(!controller.is_running());
        assert_eq!(controller.value(true), Some(b()));
    }

    #[test]
    fn test_settle_drops_pending_request() {
        let (_, predicate) = toggle(true);
        let mut controller = TransitionController::with_default_transform(predicate);
        controller.settle(a());
        assert!(!controller.is_pending());
        assert!(!controller.is_running());
        assert!(controller.animator().is_none());
    }

    #[test]
    fn test_transform_sees_trajectory_value_on_retarget() {
        use std::sync::{Arc, Mutex};

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let (flag, predicate) = toggle(true);
        let mut controller = TransitionController::new(
            predicate,
            shared(move |from: Rect, to: Rect| {
                sink.lock().unwrap().push((from, to));
                AnimationSpec::default()
            }),
        );
        controller.animate(a(), b(), true, || None);
        assert!(controller.on_frame(0, 1.0));
        assert!(controller.on_frame(48_000_000, 1.0));
        let mid_flight = controller.animator().and_then(DeviationAwareAnimator::trajectory).unwrap();
        assert_ne!(mid_flight, a());

        // Hide and show again: a new request while the motion is running.
        flag.set(false);
        let _ = controller.is_target();
        flag.set(true);
        let _ = controller.is_target();
        let c = Rect::new(200.0, 0.0, 240.0, 40.0);
        controller.animate(a(), c, true, || None);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        // Idle animator snaps to the target before the spec is picked.
        assert_eq!(seen[0], (b(), b()));
        // Running animator keeps its trajectory through the deviation.
        assert_eq!(seen[1], (mid_flight, c));
    }

    #[test]
    fn test_set_bounds_transform() {
        let (_, predicate) = toggle(false);
        let mut controller = TransitionController::with_default_transform(predicate);
        assert_eq!(controller.bounds_transform().name(), "spring");
        controller.set_bounds_transform(shared(SnapTransform));
        assert_eq!(controller.bounds_transform().name(), "snap");
    }
}
