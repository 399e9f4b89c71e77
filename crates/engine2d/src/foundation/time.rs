//! Time management utilities
//!
//! [`FrameClock`] turns raw frame durations into the scaled delta the scene
//! consumes, and [`FixedTimestep`] decides how many fixed-rate physics steps
//! each frame owes.

use std::time::{Duration, Instant};

/// Length of the window over which FPS is averaged, in seconds
const FPS_WINDOW: f32 = 1.0;

/// Frame timing with time scaling and windowed FPS
#[derive(Debug, Clone)]
pub struct FrameClock {
    delta_time: f32,
    time_scale: f32,
    max_delta: f32,
    total_time: f32,
    frame_count: u64,
    fps: f32,
    fps_frames: u32,
    fps_elapsed: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a new clock with unit time scale and a 0.25s delta cap
    pub fn new() -> Self {
        Self {
            delta_time: 0.0,
            time_scale: 1.0,
            max_delta: 0.25,
            total_time: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frames: 0,
            fps_elapsed: 0.0,
        }
    }

    /// Builder pattern: set the time scale
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.set_time_scale(time_scale);
        self
    }

    /// Builder pattern: set the per-frame delta cap
    pub fn with_max_delta(mut self, max_delta: f32) -> Self {
        self.max_delta = max_delta.max(0.0);
        self
    }

    /// Advance by a raw (unscaled) frame duration in seconds
    pub fn advance(&mut self, raw_delta: f32) {
        self.delta_time = raw_delta.clamp(0.0, self.max_delta);
        self.total_time += self.delta_time;
        self.frame_count += 1;

        self.fps_frames += 1;
        self.fps_elapsed += self.delta_time;
        if self.fps_elapsed >= FPS_WINDOW {
            self.fps = self.fps_frames as f32 / self.fps_elapsed;
            self.fps_frames = 0;
            self.fps_elapsed = 0.0;
        }
    }

    /// Scaled delta time in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time * self.time_scale
    }

    /// Unscaled delta time in seconds
    pub fn unscaled_delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Current time scale
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Set the time scale (negative values clamp to zero)
    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.time_scale = time_scale.max(0.0);
    }

    /// Total unscaled time since the clock was created
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of frames advanced so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// FPS averaged over the last completed one-second window
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

/// Fixed-rate step accumulator
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    max_steps: u32,
    accumulator: f32,
}

impl FixedTimestep {
    /// Create an accumulator with the given step length and per-frame step cap
    pub fn new(step: f32, max_steps: u32) -> Self {
        Self {
            step: step.max(f32::EPSILON),
            max_steps: max_steps.max(1),
            accumulator: 0.0,
        }
    }

    /// Fixed step length in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Accumulate `delta_time` and return how many fixed steps to run now
    ///
    /// Time beyond the step cap is dropped so a long stall cannot trigger a
    /// runaway catch-up.
    pub fn accumulate(&mut self, delta_time: f32) -> u32 {
        self.accumulator += delta_time.max(0.0);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_steps {
            self.accumulator = self.accumulator.min(self.step);
        }
        steps
    }

    /// Leftover time as a fraction of one step, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(1.0 / 50.0, 5)
    }
}

/// Wall-clock frame timer feeding a [`FrameClock`]
pub struct Timer {
    last_frame: Instant,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer starting now
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
        }
    }

    /// Seconds since the previous call (or since creation)
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        elapsed.as_secs_f32()
    }
}

/// Simple stopwatch for measuring elapsed time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.elapsed += start.elapsed();
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        self.elapsed + self.start_time.map_or(Duration::ZERO, |start| start.elapsed())
    }

    /// Get the elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f32 {
        self.elapsed().as_secs_f32() * 1000.0
    }
}
