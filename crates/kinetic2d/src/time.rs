//! Fixed-step frame pacing
//!
//! [`FrameController`] turns variable frame times into a whole number of
//! fixed simulation steps. Leftover time stays in the accumulator for the
//! next frame.

use crate::config::SimulationConfig;
use log::{trace, warn};

/// Slack when comparing accumulated time against one step, so an `f32`
/// step widened to `f64` still matches frame times of the same rate
const STEP_TOLERANCE: f64 = 1e-6;

/// Accumulator that releases fixed steps from variable frame times
#[derive(Debug, Clone, PartialEq)]
pub struct FrameController {
    fixed_delta_time: f64,
    max_steps: u32,
    accumulator: f64,
    delta_time: f64,
    steps_this_frame: u32,
    total_steps: u64,
    frame_count: u64,
    dropped_time: f64,
}

impl Default for FrameController {
    fn default() -> Self {
        Self::new(1.0 / 60.0, 5)
    }
}

impl FrameController {
    /// Create a controller stepping `fixed_delta_time` seconds, at most
    /// `max_steps` times per frame
    pub fn new(fixed_delta_time: f32, max_steps: u32) -> Self {
        Self {
            fixed_delta_time: f64::from(fixed_delta_time),
            max_steps: max_steps.max(1),
            accumulator: 0.0,
            delta_time: 0.0,
            steps_this_frame: 0,
            total_steps: 0,
            frame_count: 0,
            dropped_time: 0.0,
        }
    }

    /// Create from simulation settings
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.fixed_delta_time, config.max_steps_per_frame)
    }

    /// Feed one frame's elapsed time and return the number of fixed steps to run
    ///
    /// Non-finite or negative frame times count as zero. When more steps are
    /// due than the per-frame limit allows, the excess is discarded and the
    /// accumulator keeps less than one step.
    pub fn advance(&mut self, frame_time: f64) -> u32 {
        let frame_time = if frame_time.is_finite() { frame_time.max(0.0) } else { 0.0 };
        self.delta_time = frame_time;
        self.frame_count += 1;
        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator + STEP_TOLERANCE >= self.fixed_delta_time && steps < self.max_steps {
            self.accumulator = (self.accumulator - self.fixed_delta_time).max(0.0);
            steps += 1;
        }

        if self.accumulator + STEP_TOLERANCE >= self.fixed_delta_time {
            let kept = self.accumulator % self.fixed_delta_time;
            let dropped = self.accumulator - kept;
            warn!(
                "frame {} fell behind: dropping {:.4}s after {} steps",
                self.frame_count, dropped, steps
            );
            self.dropped_time += dropped;
            self.accumulator = kept;
        }

        self.steps_this_frame = steps;
        self.total_steps += u64::from(steps);
        trace!("frame {}: {} steps, alpha {:.3}", self.frame_count, steps, self.alpha());
        steps
    }

    /// Length of one simulation step in seconds
    pub fn fixed_delta_time(&self) -> f32 {
        self.fixed_delta_time as f32
    }

    /// Elapsed time of the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time as f32
    }

    /// Steps released by the last call to [`advance`](Self::advance)
    pub const fn steps_this_frame(&self) -> u32 {
        self.steps_this_frame
    }

    /// Per-frame step limit
    pub const fn max_steps(&self) -> u32 {
        self.max_steps
    }

    /// Fraction of a step left in the accumulator, in `[0, 1)`
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.fixed_delta_time) as f32
    }

    /// Steps released since creation
    pub const fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Frames fed since creation
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Total time discarded by the step limit
    pub const fn dropped_time(&self) -> f64 {
        self.dropped_time
    }

    /// Clear accumulated time and counters
    pub fn reset(&mut self) {
        *self = Self {
            fixed_delta_time: self.fixed_delta_time,
            max_steps: self.max_steps,
            ..Self::default()
        };
    }
}
