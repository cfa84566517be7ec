use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(1);

/// Counts events per one-second window.
#[derive(Debug)]
pub(crate) struct RateCounter {
    window_start: Instant,
    count: u32,
}

impl RateCounter {
    pub(crate) fn new() -> Self {
        Self {
            window_start: Instant::now(),
            count: 0,
        }
    }

    /// Count one event. When at least a second has passed since the window
    /// opened, returns the count for that window and opens a new one.
    pub(crate) fn record(&mut self) -> Option<u32> {
        self.record_at(Instant::now())
    }

    fn record_at(&mut self, now: Instant) -> Option<u32> {
        self.count += 1;
        if now.duration_since(self.window_start) < WINDOW {
            return None;
        }
        let rate = self.count;
        self.count = 0;
        self.window_start = now;
        Some(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_once_per_window() {
        let start = Instant::now();
        let mut counter = RateCounter {
            window_start: start,
            count: 0,
        };
        for i in 0..59 {
            assert_eq!(counter.record_at(start + Duration::from_millis(i * 16)), None);
        }
        assert_eq!(counter.record_at(start + WINDOW), Some(60));
        assert_eq!(counter.record_at(start + WINDOW + Duration::from_millis(5)), None);
    }
}
