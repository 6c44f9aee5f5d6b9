//! Frame pacing for the render loop.

use std::time::{Duration, Instant};

/// Decides when the next frame may start.
pub trait FrameScheduler {
    /// Block until the next frame is due.
    fn wait_for_frame(&mut self);
}

/// Render frames back to back.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unpaced;

impl FrameScheduler for Unpaced {
    fn wait_for_frame(&mut self) {}
}

/// One frame per fixed interval, like a display refresh.
///
/// Missed deadlines are skipped rather than caught up, so a slow frame never
/// triggers a burst of back-to-back frames.
#[derive(Debug, Clone)]
pub struct FixedRate {
    interval: Duration,
    next: Option<Instant>,
}

impl FixedRate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: None,
        }
    }

    pub fn from_fps(fps: u32) -> Self {
        Self::new(Duration::from_secs(1) / fps.max(1))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Deadline after `deadline`, given the current time.
    fn advance(&self, deadline: Instant, now: Instant) -> Instant {
        let next = deadline + self.interval;
        if next >= now || self.interval.is_zero() {
            return next.max(now);
        }
        let behind = now.duration_since(deadline).as_nanos();
        let skipped = behind / self.interval.as_nanos();
        log::warn!("Frame loop fell behind, skipping {skipped} frame(s)");
        let step = self.interval.as_nanos() * (skipped + 1);
        deadline + Duration::from_nanos(step.min(u64::MAX as u128) as u64)
    }
}

impl FrameScheduler for FixedRate {
    fn wait_for_frame(&mut self) {
        let now = Instant::now();
        let deadline = match self.next {
            None => now,
            Some(deadline) => deadline,
        };

        if deadline > now {
            std::thread::sleep(deadline - now);
        }

        let now = Instant::now();
        self.next = Some(self.advance(deadline, now));
    }
}
