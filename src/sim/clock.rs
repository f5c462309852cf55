//! Host frame timing
//!
//! Turns host timestamps into the per-frame delta that advances the
//! simulated clock. Long stalls (tab switch, debugger) are clamped so
//! pending timers fire at most one clamp late instead of all at once.

use crate::consts::{MAX_FRAME_MS, NOMINAL_FRAME_MS};

#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_frame_ms: f64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_MS)
    }
}

impl FrameClock {
    pub fn new(max_frame_ms: f64) -> Self {
        Self {
            last_ms: None,
            max_frame_ms,
        }
    }

    /// Milliseconds since the previous frame.
    ///
    /// The first frame has no predecessor and gets the nominal delta.
    /// Timestamps that go backwards yield zero.
    pub fn frame(&mut self, now_ms: f64) -> f64 {
        if !now_ms.is_finite() {
            return NOMINAL_FRAME_MS;
        }
        let dt = match self.last_ms {
            None => NOMINAL_FRAME_MS,
            Some(last) => (now_ms - last).clamp(0.0, self.max_frame_ms),
        };
        self.last_ms = Some(now_ms);
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_nominal() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.frame(12_345.0), NOMINAL_FRAME_MS);
    }

    #[test]
    fn test_deltas_between_frames() {
        let mut clock = FrameClock::default();
        clock.frame(1000.0);
        assert_eq!(clock.frame(1016.0), 16.0);
        assert_eq!(clock.frame(1050.0), 34.0);
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut clock = FrameClock::default();
        clock.frame(0.0);
        assert_eq!(clock.frame(5_000.0), MAX_FRAME_MS);
    }

    #[test]
    fn test_backwards_time_is_zero() {
        let mut clock = FrameClock::default();
        clock.frame(500.0);
        assert_eq!(clock.frame(400.0), 0.0);
    }

    #[test]
    fn test_non_finite_timestamp_ignored() {
        let mut clock = FrameClock::default();
        clock.frame(100.0);
        assert_eq!(clock.frame(f64::NAN), NOMINAL_FRAME_MS);
        // Previous timestamp kept
        assert_eq!(clock.frame(110.0), 10.0);
    }
}
