use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Time elapsed between consecutive frames.
#[derive(Debug, Clone, Copy)]
pub struct FrameTimer {
    last_tick: Instant,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }

    /// Seconds since the previous tick; restarts the interval.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let dt = now.saturating_duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        dt
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// FpsCounter — frames seen in the trailing second, reported once per second
// ---------------------------------------------------------------------------

const WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct FpsCounter {
    frames: VecDeque<Instant>,
    last_report: Instant,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            frames: VecDeque::new(),
            last_report: now,
        }
    }

    /// Record a frame. Returns the current FPS if a full second has passed
    /// since the last report, so the caller can log it.
    pub fn tick(&mut self) -> Option<usize> {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Option<usize> {
        self.frames.push_back(now);
        while let Some(&first) = self.frames.front() {
            if first + WINDOW > now {
                break;
            }
            self.frames.pop_front();
        }

        if now.saturating_duration_since(self.last_report) >= WINDOW {
            self.last_report = now;
            Some(self.frames.len())
        } else {
            None
        }
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn frame_timer_measures_interval() {
        let start = Instant::now();
        let mut timer = FrameTimer { last_tick: start };
        let dt = timer.tick_at(start + ms(250));
        assert!((dt - 0.25).abs() < 1e-6, "got {dt}");
        let dt = timer.tick_at(start + ms(300));
        assert!((dt - 0.05).abs() < 1e-6, "got {dt}");
    }

    #[test]
    fn default_timers_start_now() {
        let before = Instant::now();
        let mut timer = FrameTimer::default();
        let mut fps = FpsCounter::default();
        assert!(timer.last_tick >= before);
        assert!(fps.frames.is_empty());
        assert!(timer.tick() < 1.0);
        assert_eq!(fps.tick_at(before), None);
    }

    #[test]
    fn no_report_before_one_second() {
        let start = Instant::now();
        let mut fps = FpsCounter::starting_at(start);
        for i in 1..10 {
            assert_eq!(fps.tick_at(start + ms(i * 100)), None);
        }
    }

    #[test]
    fn reports_frames_in_trailing_second() {
        let start = Instant::now();
        let mut fps = FpsCounter::starting_at(start);
        // One frame every 20ms; the report lands on the 50th (t = 1000ms).
        let mut report = None;
        for i in 1..=50 {
            if let Some(n) = fps.tick_at(start + ms(i * 20)) {
                report = Some(n);
            }
        }
        assert_eq!(report, Some(50));
    }

    #[test]
    fn old_frames_fall_out_of_window() {
        let start = Instant::now();
        let mut fps = FpsCounter::starting_at(start);
        for i in 1..=10 {
            fps.tick_at(start + ms(i * 10));
        }
        // Long pause, then one frame: only that frame is in the window.
        assert_eq!(fps.tick_at(start + ms(5000)), Some(1));
    }
}
