use std::time::Instant;

/// Per-frame delta clock
#[derive(Debug)]
pub struct Clock {
    last_tick: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }

    /// Seconds since the previous tick; advances the clock
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        (now - std::mem::replace(&mut self.last_tick, now)).as_secs_f32()
    }

    /// Restart the measurement from now
    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregates frame deltas into a once-per-interval FPS reading
#[derive(Debug)]
pub struct FpsCounter {
    interval: f32,
    frame_count: u32,
    elapsed: f32,
    fps: f32,
}

impl FpsCounter {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            frame_count: 0,
            elapsed: 0.0,
            fps: 0.0,
        }
    }

    /// Count one frame. Returns the fresh FPS value when a full
    /// interval has elapsed, otherwise None.
    pub fn tick(&mut self, delta: f32) -> Option<f32> {
        self.frame_count += 1;
        self.elapsed += delta;

        if self.elapsed >= self.interval {
            self.fps = self.frame_count as f32 / self.elapsed;
            self.frame_count = 0;
            self.elapsed = 0.0;
            Some(self.fps)
        } else {
            None
        }
    }

    /// Most recent completed reading (0.0 before the first interval)
    pub fn fps(&self) -> f32 {
        self.fps
    }
}
