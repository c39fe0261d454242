use std::time::Instant;

/// Timing snapshot taken once per presented frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Monotonic timestamp of this tick. Ripples are aged against it, so every
    /// ripple in a frame sees the same instant.
    pub now: Instant,

    pub frame_index: u64,
}

/// Per-window frame clock.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    frame_index: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let ft = FrameTime {
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn frame_index_counts_ticks() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        assert_eq!(clock.tick_at(t0 + Duration::from_millis(16)).frame_index, 0);
        assert_eq!(clock.tick_at(t0 + Duration::from_millis(32)).frame_index, 1);
    }

    #[test]
    fn now_is_taken_verbatim() {
        let mut clock = FrameClock::new();
        let stalled = Instant::now() + Duration::from_secs(5);
        assert_eq!(clock.tick_at(stalled).now, stalled);
        // A stalled or repeated instant still advances the frame index.
        assert_eq!(clock.tick_at(stalled).frame_index, 1);
    }
}
