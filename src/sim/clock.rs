//! Fixed-step accumulator
//!
//! Converts variable display frame times into a whole number of fixed ticks.
//! Frame time is clamped so a stall (tab switch, debugger) cannot trigger an
//! unbounded catch-up burst. While paused nothing accumulates, and the
//! leftover sub-tick time is kept as-is for when play resumes.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_TIME, TICK_SECONDS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedStepClock {
    /// Tick length (seconds)
    step: f64,
    /// Longest frame accepted (seconds)
    max_frame_time: f64,
    /// Unsimulated time carried to the next frame (seconds)
    accumulator: f64,
    /// Previous display timestamp (milliseconds)
    last_timestamp: Option<f64>,
    paused: bool,
}

impl Default for FixedStepClock {
    fn default() -> Self {
        Self::new(TICK_SECONDS, MAX_FRAME_TIME)
    }
}

impl FixedStepClock {
    pub fn new(step: f64, max_frame_time: f64) -> Self {
        debug_assert!(step > 0.0, "tick length must be positive");
        Self {
            step,
            max_frame_time,
            accumulator: 0.0,
            last_timestamp: None,
            paused: false,
        }
    }

    /// Feed a display timestamp in milliseconds (e.g. from
    /// requestAnimationFrame). Returns the number of ticks to run.
    /// The first frame only establishes the baseline.
    pub fn frame(&mut self, timestamp_ms: f64) -> u32 {
        let elapsed = match self.last_timestamp {
            Some(last) => (timestamp_ms - last) / 1000.0,
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp_ms);
        self.advance(elapsed)
    }

    /// Feed elapsed real time in seconds. Returns the number of ticks to run.
    pub fn advance(&mut self, elapsed: f64) -> u32 {
        if self.paused {
            return 0;
        }
        let elapsed = if elapsed.is_finite() {
            elapsed.clamp(0.0, self.max_frame_time)
        } else {
            0.0
        };

        self.accumulator += elapsed;
        let mut steps = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            steps += 1;
        }
        steps
    }

    pub fn set_paused(&mut self, paused: bool) {
        if paused != self.paused {
            log::debug!("Clock {}", if paused { "frozen" } else { "running" });
        }
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Drop leftover time (level change, restart). The timestamp baseline
    /// is kept so the next frame measures a normal delta.
    pub fn clear(&mut self) {
        self.accumulator = 0.0;
    }

    /// Unsimulated time in seconds, always in [0, step)
    pub fn leftover(&self) -> f64 {
        self.accumulator
    }

    /// Fraction of a tick pending, for render interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.step) as f32
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}
