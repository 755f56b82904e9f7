use std::time::{Duration, Instant};

/// Frame timing snapshot handed to window ticks.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,

    /// Seconds since the clock was created (unclamped wall time).
    pub elapsed: f32,

    /// Number of ticks before this one.
    pub frame_index: u64,
}

/// Wall-clock delta timer shared by every window of an App.
///
/// One clock per loop: every window ticked in the same frame sees the same
/// `dt`. Delta time is clamped so a debugger pause or a minimized window does
/// not produce a huge step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub const DEFAULT_DT_MIN: Duration = Duration::from_micros(100);
    pub const DEFAULT_DT_MAX: Duration = Duration::from_millis(250);

    pub fn new() -> Self {
        Self::with_clamps(Self::DEFAULT_DT_MIN, Self::DEFAULT_DT_MAX)
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Restarts delta measurement from now without touching `elapsed`.
    ///
    /// Called before the first frame so window setup time is not counted.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
