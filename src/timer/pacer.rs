use std::time::{Duration, Instant};

/// Logical steps per second.
pub const FRAME_RATE: u32 = 60;

/// Scheduler overhead subtracted from every delay. Measured on the event loop
/// the display window runs on; tunable through the application settings.
pub const SCHEDULER_TOLERANCE: Duration = Duration::from_micros(2_860);

pub fn frame_length() -> Duration {
    Duration::from_secs(1) / FRAME_RATE
}

/// `max(0, frame_length - elapsed - tolerance)`
pub fn compute_delay(frame_length: Duration, elapsed: Duration, tolerance: Duration) -> Duration {
    frame_length
        .saturating_sub(elapsed)
        .saturating_sub(tolerance)
}

/// Deadline bookkeeping for the tick loop. At most one tick is pending at a
/// time; scheduling again replaces the previous deadline.
#[derive(Debug, Clone)]
pub struct FramePacer {
    frame_length: Duration,
    tolerance: Duration,
    next_due: Option<Instant>,
    resumed_at: Option<Instant>,
    frames_since_resume: u64,
}

impl FramePacer {
    pub fn new(tolerance: Duration) -> Self {
        Self {
            frame_length: frame_length(),
            tolerance,
            next_due: None,
            resumed_at: None,
            frames_since_resume: 0,
        }
    }

    pub fn frame_length(&self) -> Duration {
        self.frame_length
    }

    pub fn tolerance(&self) -> Duration {
        self.tolerance
    }

    /// Start a fresh measurement window and make a tick due right away.
    pub fn resume(&mut self, now: Instant) {
        self.resumed_at = Some(now);
        self.frames_since_resume = 0;
        self.next_due = Some(now);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
        self.resumed_at = None;
    }

    pub fn is_pending(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.next_due.is_some_and(|due| now >= due)
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// Account for a finished tick and schedule the next one. Returns the
    /// delay applied after `end`.
    pub fn finish_tick(&mut self, start: Instant, end: Instant) -> Duration {
        let elapsed = end.saturating_duration_since(start);
        let delay = compute_delay(self.frame_length, elapsed, self.tolerance);
        self.frames_since_resume += 1;
        self.next_due = Some(end + delay);
        delay
    }

    /// Wall-clock time minus logical time since the last resume, in seconds.
    /// Positive values mean the loop is running behind.
    pub fn drift(&self, now: Instant) -> Option<f64> {
        let resumed_at = self.resumed_at?;
        let wall = now.saturating_duration_since(resumed_at).as_secs_f64();
        let logical = self.frames_since_resume as f64 * self.frame_length.as_secs_f64();
        Some(wall - logical)
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(SCHEDULER_TOLERANCE)
    }
}
