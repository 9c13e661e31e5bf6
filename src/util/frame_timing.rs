//! Frame clock for hosts driving the engine.

use std::time::Duration;

use web_time::Instant;

/// Host-side frame clock producing the timestamps the engine consumes.
///
/// Frame times are nanoseconds since the clock was created and never go
/// backwards.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Origin all frame times are measured from.
    origin: Instant,
    /// Last frame time handed out, for monotonicity.
    last_frame_nanos: i64,
}

impl FrameClock {
    /// Create a clock starting now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            last_frame_nanos: 0,
        }
    }

    /// Call at the start of each frame. Returns the frame time in
    /// nanoseconds.
    pub fn frame_nanos(&mut self) -> i64 {
        let elapsed = Instant::now().saturating_duration_since(self.origin);
        self.advance_to(elapsed)
    }

    /// Frame time for an explicit elapsed duration (deterministic hosts,
    /// tests). Clamped so it never precedes the previous frame.
    pub fn advance_to(&mut self, elapsed: Duration) -> i64 {
        let nanos = i64::try_from(elapsed.as_nanos()).unwrap_or(i64::MAX);
        self.last_frame_nanos = self.last_frame_nanos.max(nanos);
        self.last_frame_nanos
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Scale a raw frame delta into animation play time.
///
/// 2.0 plays at half speed. A zero scale means "no animation": the play
/// time jumps to the end.
#[must_use]
pub fn scaled_play_delta(frame_delta_nanos: i64, duration_scale: f32) -> i64 {
    let delta = frame_delta_nanos.max(0);
    if duration_scale <= 0.0 {
        return i64::MAX;
    }
    (delta as f64 / f64::from(duration_scale)).round() as i64
}
