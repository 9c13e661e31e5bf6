//! Frame loop subscription of a running animator.

use crate::animation::motion::RectMotion;
use crate::util::frame_timing::scaled_play_delta;

/// Play-time cursor into the current motion.
///
/// Exists only while the animator is running; dropping it is the
/// cancellation of the frame subscription.
#[derive(Debug)]
pub(crate) struct FrameLoop {
    /// Motion being played.
    motion: RectMotion,
    /// Animator generation the motion was built for.
    generation: u64,
    /// Accumulated (scaled) play time since the motion was built.
    play_nanos: i64,
    /// Timestamp of the previous frame, `None` until the first frame.
    last_frame_nanos: Option<i64>,
}

impl FrameLoop {
    /// Subscribe with a freshly built motion.
    pub(super) fn new(motion: RectMotion, generation: u64) -> Self {
        Self {
            motion,
            generation,
            play_nanos: 0,
            last_frame_nanos: None,
        }
    }

    /// Motion being played.
    pub(super) fn motion(&self) -> &RectMotion {
        &self.motion
    }

    /// Whether the motion predates the animator's latest `animate` call.
    pub(super) fn is_stale(&self, generation: u64) -> bool {
        self.generation != generation
    }

    /// Swap in a new motion and restart play time at zero.
    pub(super) fn rebuild(&mut self, motion: RectMotion, generation: u64) {
        self.motion = motion;
        self.generation = generation;
        self.play_nanos = 0;
    }

    /// Record the very first frame. Returns `false` if one was already
    /// recorded.
    pub(super) fn record_first_frame(&mut self, frame_nanos: i64) -> bool {
        if self.last_frame_nanos.is_some() {
            return false;
        }
        self.last_frame_nanos = Some(frame_nanos);
        true
    }

    /// Accumulate the scaled delta since the previous frame and return the
    /// new play time.
    pub(super) fn advance(&mut self, frame_nanos: i64, duration_scale: f32) -> i64 {
        let last = self.last_frame_nanos.unwrap_or(frame_nanos);
        let delta = scaled_play_delta(frame_nanos - last, duration_scale);
        self.play_nanos = self.play_nanos.saturating_add(delta);
        self.last_frame_nanos = Some(frame_nanos);
        self.play_nanos
    }
}
