/// Fixed timestep accumulator.
/// Physics advances in whole steps of `dt` regardless of the frame rate.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// The fixed delta time per step.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
    /// Upper bound on steps per frame, so a long stall cannot snowball.
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self::with_max_steps(dt, 10)
    }

    pub fn with_max_steps(dt: f32, max_steps: u32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: max_steps.max(1),
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f32);
        // A hair of tolerance so 1/60 + 1/60 + ... lands on whole steps.
        let steps = ((self.accumulator + self.dt * 1e-4) / self.dt) as u32;
        self.accumulator = (self.accumulator - steps as f32 * self.dt).max(0.0);
        steps
    }

    /// Interpolation alpha between the last two steps (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Per-frame timing, kept as a singleton by the runner.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStats {
    /// Frames completed so far.
    pub frame: u64,
    /// Seconds since the runner started ticking.
    pub elapsed: f64,
    /// Delta of the last frame.
    pub frame_time: f32,
    /// Smoothed frames per second.
    pub fps: f32,
}

impl FrameStats {
    pub fn record(&mut self, dt: f32) {
        self.frame += 1;
        self.elapsed += dt as f64;
        self.frame_time = dt;
        if dt > 0.0 {
            let instant = 1.0 / dt;
            self.fps = if self.fps == 0.0 {
                instant
            } else {
                self.fps * 0.9 + instant * 0.1
            };
        }
    }
}
