//! Per-session streaming statistics.
//!
//! Each stream connection tracks the instant of its previous frame and a
//! rolling average of frame intervals. Purely observational: the numbers
//! feed one log line per frame and never steer the loop.

use std::time::Instant;

use framecast_core::RollingAverage;

/// Frame timing for one streamed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTiming {
    /// Milliseconds since the previous frame (or since session start).
    pub frame_time_ms: u64,
    /// Smoothed frame time over the session's window.
    pub avg_frame_time_ms: u64,
}

impl FrameTiming {
    /// Instantaneous FPS derived from this frame's interval.
    pub fn fps(&self) -> f64 {
        1000.0 / self.frame_time_ms as f64
    }

    /// Smoothed FPS over the window.
    pub fn avg_fps(&self) -> f64 {
        1000.0 / self.avg_frame_time_ms as f64
    }
}

/// Timing state for one stream session. Does not outlive the connection.
#[derive(Debug)]
pub struct SessionStats {
    last_frame: Instant,
    filter: RollingAverage,
}

impl SessionStats {
    /// Start the clock. The first frame's interval is time-to-first-frame.
    pub fn new(window: usize) -> Self {
        Self {
            last_frame: Instant::now(),
            filter: RollingAverage::new(window),
        }
    }

    /// Record a frame boundary and return its timing.
    pub fn observe(&mut self) -> FrameTiming {
        let now = Instant::now();
        let frame_time_ms = now.duration_since(self.last_frame).as_millis() as u64;
        self.last_frame = now;
        let avg_frame_time_ms = self.filter.push(frame_time_ms);
        FrameTiming {
            frame_time_ms,
            avg_frame_time_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_feeds_filter() {
        let mut stats = SessionStats::new(4);
        let first = stats.observe();
        // The average over a single sample is that sample.
        assert_eq!(first.avg_frame_time_ms, first.frame_time_ms);
    }

    #[test]
    fn test_fps_derivation() {
        let timing = FrameTiming {
            frame_time_ms: 40,
            avg_frame_time_ms: 50,
        };
        assert_eq!(timing.fps(), 25.0);
        assert_eq!(timing.avg_fps(), 20.0);
    }

    #[test]
    fn test_observe_advances_clock() {
        let mut stats = SessionStats::new(4);
        stats.observe();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = stats.observe();
        assert!(second.frame_time_ms >= 5);
    }
}
