// clock.rs - Turns wall-clock time into whole presentation frames at a fixed rate

use std::time::{Duration, Instant};

pub const FRAMES_PER_SECOND: u32 = 60;

/// Frames replayed at most per update after a stall.
const MAX_CATCH_UP: u32 = 4;

pub struct FrameClock {
    frame : Duration,
    last  : Instant,
    carry : Duration,   // time not yet spent on a whole frame
}

impl FrameClock {
    pub fn new(frames_per_second: u32, now: Instant) -> Self {
        Self {
            frame: Duration::from_secs(1) / frames_per_second.max(1),
            last: now,
            carry: Duration::ZERO,
        }
    }

    pub fn frames_per_second(&self) -> f64 {
        1.0 / self.frame.as_secs_f64()
    }

    /// Whole frames elapsed since the previous call.
    pub fn advance(&mut self, now: Instant) -> u32 {
        self.carry += now.saturating_duration_since(self.last);
        self.last = now;

        let due = self.carry.as_nanos() / self.frame.as_nanos();
        if due > u128::from(MAX_CATCH_UP) {
            self.carry = Duration::ZERO;
            return MAX_CATCH_UP;
        }
        let due = due as u32;
        self.carry -= self.frame * due;
        due
    }

    /// Time left before the next whole frame is due.
    pub fn until_next_frame(&self) -> Duration {
        self.frame.saturating_sub(self.carry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_whole_frames_and_keeps_the_remainder() {
        let start = Instant::now();
        let mut clock = FrameClock::new(10, start);

        assert_eq!(clock.advance(start + Duration::from_millis(50)), 0);
        assert_eq!(clock.until_next_frame(), Duration::from_millis(50));
        assert_eq!(clock.advance(start + Duration::from_millis(120)), 1);
        assert_eq!(clock.advance(start + Duration::from_millis(300)), 2);
        assert_eq!(clock.until_next_frame(), Duration::from_millis(100));
    }

    #[test]
    fn stalls_are_capped() {
        let start = Instant::now();
        let mut clock = FrameClock::new(60, start);
        assert_eq!(clock.advance(start + Duration::from_secs(5)), MAX_CATCH_UP);
        assert_eq!(clock.advance(start + Duration::from_secs(5)), 0);
    }

    #[test]
    fn rate() {
        let clock = FrameClock::new(FRAMES_PER_SECOND, Instant::now());
        assert!((clock.frames_per_second() - 60.0).abs() < 1e-3);
    }
}
