//! Frame timing and the frame-rate limiter.
//!
//! [`Time`] is updated at the start of each frame and feeds the FPS readout.
//! [`FrameLimiter`] caps the window loop at a target rate by spinning until
//! the next frame deadline.

use std::time::{Duration, Instant};

/// Frame timing. Updated by the window loop each frame.
#[derive(Clone, Copy)]
pub struct Time {
    /// When the current frame started.
    frame_start: Instant,
    /// Duration of the previous frame.
    delta: Duration,
    frame_count: u64,
}

impl Time {
    pub fn new() -> Self {
        Self {
            frame_start: Instant::now(),
            delta: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Call at the start of each frame to update timing.
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta = now - self.frame_start;
        self.frame_start = now;
        self.frame_count += 1;
    }

    /// Duration of the previous frame in seconds.
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Number of frames so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Estimated FPS based on the last frame's delta.
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

/// Busy-wait frame limiter.
///
/// Each [`wait`](FrameLimiter::wait) spins until one interval has passed since
/// the previous deadline, then advances the deadline by exactly one interval so
/// the long-run rate stays on target. If the loop falls more than one interval
/// behind, the deadline resyncs to now instead of trying to catch up.
#[derive(Debug, Clone, Copy)]
pub struct FrameLimiter {
    interval: Duration,
    last: Instant,
}

impl FrameLimiter {
    pub fn new(target_fps: f32) -> Self {
        Self {
            interval: Duration::from_secs_f32(1.0 / target_fps.max(1.0)),
            last: Instant::now(),
        }
    }

    /// Block until the next frame deadline.
    pub fn wait(&mut self) {
        let deadline = self.last + self.interval;
        while Instant::now() < deadline {
            std::hint::spin_loop();
        }
        let now = Instant::now();
        self.last = if now - deadline > self.interval {
            now
        } else {
            deadline
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_counts_frames() {
        let mut t = Time::new();
        assert_eq!(t.frame_count(), 0);
        assert_eq!(t.fps(), 0.0);
        t.update();
        t.update();
        assert_eq!(t.frame_count(), 2);
    }

    #[test]
    fn fps_follows_frame_delta() {
        let mut t = Time::new();
        t.update();
        std::thread::sleep(Duration::from_millis(10));
        t.update();
        assert!(t.delta_secs() >= 0.009);
        assert!(t.fps() > 0.0 && t.fps() <= 1.0 / 0.009);
    }

    #[test]
    fn limiter_paces_frames() {
        let mut limiter = FrameLimiter::new(200.0);
        let start = Instant::now();
        for _ in 0..4 {
            limiter.wait();
        }
        // Four 5ms intervals.
        assert!(start.elapsed() >= Duration::from_millis(19));
    }

    #[test]
    fn limiter_resyncs_after_stall() {
        let mut limiter = FrameLimiter::new(1000.0);
        std::thread::sleep(Duration::from_millis(20));
        limiter.wait();
        let after_stall = Instant::now();
        limiter.wait();
        // No burst of catch-up frames: the next wait still takes ~1ms.
        assert!(after_stall.elapsed() >= Duration::from_micros(500));
    }
}
