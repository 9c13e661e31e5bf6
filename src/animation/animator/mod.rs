//! Retargetable rectangle animator composed from smaller components.
//!
//! - `AnimatorState`: trajectory, deviation, target and velocity
//! - `FrameLoop`: play-time cursor into the current motion
//! - [`TransitionController`]: decides when to start a new animation
//!   versus following a moving target

mod controller;
mod runner;
mod state;

pub use controller::{TransitionController, VisibilityPredicate};
use runner::FrameLoop;
use state::AnimatorState;

use super::motion::RectMotion;
use super::transition::AnimationSpec;
use crate::util::rect::Rect;

/// Animates a rectangle toward a target that may keep moving.
///
/// A motion curve is built from the trajectory, target and velocity when
/// [`animate`](Self::animate) is called. If the destination then shifts
/// (for example because a list scrolled), [`deviate_or_snap_to`]
/// records the difference as a deviation instead of rebuilding the curve,
/// so the displayed value `trajectory - deviation` tracks the destination
/// without a jump.
///
/// [`deviate_or_snap_to`]: Self::deviate_or_snap_to
#[derive(Debug)]
pub struct DeviationAwareAnimator {
    state: AnimatorState,
    frame_loop: Option<FrameLoop>,
}

impl DeviationAwareAnimator {
    /// Idle animator, optionally already showing `initial`.
    #[must_use]
    pub fn new(initial: Option<Rect>) -> Self {
        Self {
            state: AnimatorState::new(initial),
            frame_loop: None,
        }
    }

    /// Displayed value: trajectory minus deviation.
    #[must_use]
    pub fn current_value(&self) -> Option<Rect> {
        self.state.current_value()
    }

    /// Value under the motion curve.
    #[must_use]
    pub fn trajectory(&self) -> Option<Rect> {
        self.state.trajectory
    }

    /// Offset between the nominal target and the latest reported
    /// destination.
    #[must_use]
    pub fn deviation(&self) -> Rect {
        self.state.deviation
    }

    /// Trajectory velocity in units per second. Zero when idle.
    #[must_use]
    pub fn velocity(&self) -> Rect {
        self.state.velocity
    }

    /// Nominal destination of the running motion.
    #[must_use]
    pub fn target(&self) -> Option<Rect> {
        self.state.target
    }

    /// Start of the most recent animation.
    #[must_use]
    pub fn initial(&self) -> Option<Rect> {
        self.state.initial
    }

    /// Spec of the most recent animation.
    #[must_use]
    pub fn spec(&self) -> AnimationSpec {
        self.state.spec
    }

    /// Whether a frame loop is subscribed.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Start (or restart) an animation from `from` to `to`.
    ///
    /// The trajectory is placed at `from` and the deviation cleared. When
    /// `initial_velocity` is `None` the current velocity carries over, so
    /// retargeting mid-flight keeps momentum. If a frame loop is already
    /// running it rebuilds its motion on the next frame.
    pub fn animate(
        &mut self,
        from: Rect,
        to: Rect,
        spec: AnimationSpec,
        initial_velocity: Option<Rect>,
    ) {
        let state = &mut self.state;
        state.initial = Some(from);
        state.target = Some(to);
        state.spec = spec;
        if let Some(velocity) = initial_velocity {
            state.velocity = velocity;
        }
        state.place(from);
        state.generation = state.generation.wrapping_add(1);

        if self.frame_loop.is_none() {
            let motion = RectMotion::new(spec, from, to, state.velocity);
            self.frame_loop = Some(FrameLoop::new(motion, state.generation));
            state.running = true;
            log::trace!("bounds animation started ({})", spec.name());
        }
    }

    /// Advance one frame. Returns whether the animator is still running.
    ///
    /// The first frame after starting only records its timestamp. Play
    /// time advances by the frame delta divided by `duration_scale`; a
    /// scale of zero finishes the motion on the next frame.
    pub fn on_frame(&mut self, frame_nanos: i64, duration_scale: f32) -> bool {
        let Some(frame_loop) = self.frame_loop.as_mut() else {
            return false;
        };
        if frame_loop.record_first_frame(frame_nanos) {
            return true;
        }

        let (Some(trajectory), Some(target)) = (self.state.trajectory, self.state.target)
        else {
            self.stop();
            return false;
        };

        if frame_loop.is_stale(self.state.generation) {
            let motion =
                RectMotion::new(self.state.spec, trajectory, target, self.state.velocity);
            frame_loop.rebuild(motion, self.state.generation);
        }

        let play_nanos = frame_loop.advance(frame_nanos, duration_scale);
        let motion = frame_loop.motion();
        if motion.is_finished_at(play_nanos) {
            let end = motion.target();
            self.stop();
            self.state.trajectory = Some(end);
            log::trace!("bounds animation finished");
            return false;
        }

        self.state.trajectory = Some(motion.value_at(play_nanos));
        self.state.velocity = motion.velocity_at(play_nanos);
        true
    }

    /// Cancel the frame loop. The trajectory stays where it is.
    pub fn stop(&mut self) {
        self.frame_loop = None;
        self.state.clear_motion();
    }

    /// Stop and jump to `value` with no deviation.
    pub fn snap_to(&mut self, value: Rect) {
        self.stop();
        self.state.place(value);
    }

    /// Follow a moved destination.
    ///
    /// While running, sets `deviation = target - to` so the displayed value
    /// shifts by exactly as much as the destination did. When idle this is
    /// [`snap_to`](Self::snap_to).
    pub fn deviate_or_snap_to(&mut self, to: Rect) {
        match self.state.target {
            Some(target) if self.state.running => {
                self.state.deviation = target - to;
            }
            _ => self.snap_to(to),
        }
    }
}

impl Default for DeviationAwareAnimator {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::animation::spring::SpringSpec;
    use crate::animation::tween::TweenSpec;

    const FRAME: i64 = 16_000_000;

    fn a() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    fn b() -> Rect {
        Rect::new(100.0, 100.0, 200.0, 200.0)
    }

    fn spring() -> AnimationSpec {
        AnimationSpec::Spring(SpringSpec::default())
    }

    /// Runs frames until the animator stops, returning the frame count.
    fn run_to_end(animator: &mut DeviationAwareAnimator, start: i64) -> usize {
        let mut frames = 0;
        let mut now = start;
        while animator.on_frame(now, 1.0) {
            now += FRAME;
            frames += 1;
            assert!(frames < 10_000, "animation never finished");
        }
        frames
    }

    #[test]
    fn test_idle_invariant() {
        let animator = DeviationAwareAnimator::new(Some(a()));
        assert!(!animator.is_running());
        assert_eq!(animator.velocity(), Rect::ZERO);
        assert!(animator.target().is_none());
        assert_eq!(animator.current_value(), Some(a()));
    }

    #[test]
    fn test_first_frame_only_records_time() {
        let mut animator = DeviationAwareAnimator::default();
        animator.animate(a(), b(), spring(), None);
        assert!(animator.is_running());
        assert!(animator.on_frame(0, 1.0));
        assert_eq!(animator.current_value(), Some(a()));
        assert!(animator.on_frame(FRAME, 1.0));
        assert_ne!(animator.current_value(), Some(a()));
    }

    #[test]
    fn test_spring_settles_on_target() {
        let mut animator = DeviationAwareAnimator::default();
        animator.animate(a(), b(), spring(), None);
        let _ = run_to_end(&mut animator, 0);
        assert!(!animator.is_running());
        assert_eq!(animator.current_value(), Some(b()));
        assert_eq!(animator.velocity(), Rect::ZERO);
        assert!(animator.target().is_none());
    }

    #[test]
    fn test_deviation_follows_scrolled_destination() {
        let mut animator = DeviationAwareAnimator::default();
        animator.animate(a(), b(), spring(), None);
        let _ = animator.on_frame(0, 1.0);
        let _ = animator.on_frame(FRAME, 1.0);

        let before = animator.current_value().unwrap_or_default();
        let traj_before = animator.trajectory().unwrap_or_default();
        let scroll = Rect::new(0.0, -30.0, 0.0, -30.0);
        animator.deviate_or_snap_to(b() + scroll);
        let _ = animator.on_frame(2 * FRAME, 1.0);

        let after = animator.current_value().unwrap_or_default();
        let traj_after = animator.trajectory().unwrap_or_default();
        let expected = (traj_after - traj_before) + scroll;
        assert!((after - before).max_component_delta(&expected) < 1e-3);
    }

    #[test]
    fn test_deviated_animation_lands_on_reported_destination() {
        let mut animator = DeviationAwareAnimator::default();
        animator.animate(a(), b(), spring(), None);
        let _ = animator.on_frame(0, 1.0);
        let moved = b().translate(glam::Vec2::new(0.0, 40.0));
        animator.deviate_or_snap_to(moved);
        let _ = run_to_end(&mut animator, FRAME);
        assert!(animator
            .current_value()
            .is_some_and(|v| v.max_component_delta(&moved) < 1e-3));
    }

    #[test]
    fn test_retarget_is_continuous() {
        let mut animator = DeviationAwareAnimator::default();
        animator.animate(a(), b(), spring(), None);
        let _ = animator.on_frame(0, 1.0);
        for i in 1..=5 {
            let _ = animator.on_frame(i * FRAME, 1.0);
        }
        let mid = animator.current_value().unwrap_or_default();
        let velocity = animator.velocity();
        assert_ne!(velocity, Rect::ZERO);

        let c = Rect::new(-100.0, 50.0, 0.0, 150.0);
        animator.animate(mid, c, spring(), None);
        assert_eq!(animator.current_value(), Some(mid));
        assert_eq!(animator.velocity(), velocity);

        let _ = animator.on_frame(6 * FRAME, 1.0);
        let next = animator.current_value().unwrap_or_default();
        assert!(next.max_component_delta(&mid) < 40.0);
        assert_eq!(animator.target(), Some(c));
    }

    #[test]
    fn test_snap_to_then_read() {
        let mut animator = DeviationAwareAnimator::default();
        animator.animate(a(), b(), spring(), None);
        let _ = animator.on_frame(0, 1.0);
        animator.snap_to(b());
        assert!(!animator.is_running());
        assert_eq!(animator.current_value(), Some(b()));
        assert_eq!(animator.deviation(), Rect::ZERO);
    }

    #[test]
    fn test_deviate_when_idle_snaps() {
        let mut animator = DeviationAwareAnimator::new(Some(a()));
        animator.deviate_or_snap_to(b());
        assert_eq!(animator.current_value(), Some(b()));
        assert!(!animator.is_running());
    }

    #[test]
    fn test_zero_duration_scale_finishes_next_frame() {
        let mut animator = DeviationAwareAnimator::default();
        animator.animate(a(), b(), spring(), None);
        assert!(animator.on_frame(0, 0.0));
        assert!(!animator.on_frame(FRAME, 0.0));
        assert_eq!(animator.current_value(), Some(b()));
    }

    #[test]
    fn test_tween_runs_for_its_duration() {
        let mut animator = DeviationAwareAnimator::default();
        let tween = TweenSpec::linear(Duration::from_millis(160));
        animator.animate(a(), b(), AnimationSpec::Tween(tween), None);
        let frames = run_to_end(&mut animator, 0);
        // One recording frame plus nine 16ms frames.
        assert_eq!(frames, 10);
    }

    #[test]
    fn test_snap_spec_finishes_after_one_tick() {
        let mut animator = DeviationAwareAnimator::default();
        animator.animate(a(), b(), AnimationSpec::Snap, None);
        assert!(animator.on_frame(0, 1.0));
        assert!(!animator.on_frame(FRAME, 1.0));
        assert_eq!(animator.current_value(), Some(b()));
    }
}
