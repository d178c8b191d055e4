//! Time management for the game loop.

use std::time::Duration;

/// Default fixed physics rate in Hz.
pub const DEFAULT_FIXED_RATE_HZ: f64 = 120.0;

/// Default cap on fixed sub-steps run inside a single frame (~166 ms at 120 Hz).
pub const DEFAULT_MAX_SUBSTEPS: u32 = 20;

/// Manages frame timing and delta time calculation.
#[derive(Debug)]
pub struct Time {
    /// Duration of the last frame.
    delta: Duration,
    /// Total frame time since start.
    elapsed: Duration,
    /// Backlog discarded by the sub-step cap since start.
    dropped: Duration,
    /// Backlog discarded by the last `advance`.
    dropped_this_frame: Duration,
    /// Frame count since start.
    frame_count: u64,
    /// Fixed timestep for physics (default 120 Hz).
    fixed_timestep: Duration,
    /// Accumulated time for fixed updates.
    accumulator: Duration,
    /// Upper bound on sub-steps per frame.
    max_substeps: u32,
    /// Sub-steps consumed since the last frame boundary.
    substeps_this_frame: u32,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager.
    pub fn new() -> Self {
        Self {
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            dropped: Duration::ZERO,
            dropped_this_frame: Duration::ZERO,
            frame_count: 0,
            fixed_timestep: Duration::from_secs_f64(1.0 / DEFAULT_FIXED_RATE_HZ),
            accumulator: Duration::ZERO,
            max_substeps: DEFAULT_MAX_SUBSTEPS,
            substeps_this_frame: 0,
        }
    }

    /// Advance by one frame of `delta`.
    ///
    /// Backlog beyond `max_substeps` fixed steps is discarded so a long stall
    /// cannot snowball into ever longer frames.
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.frame_count += 1;
        self.accumulator += delta;
        self.substeps_this_frame = 0;
        self.dropped_this_frame = Duration::ZERO;

        let budget = self.fixed_timestep * self.max_substeps;
        if self.accumulator > budget {
            let dropped = self.accumulator - budget;
            log::warn!(
                "Frame took {:.1} ms; dropping {:.1} ms of physics backlog",
                delta.as_secs_f64() * 1000.0,
                dropped.as_secs_f64() * 1000.0
            );
            self.accumulator = budget;
            self.dropped += dropped;
            self.dropped_this_frame = dropped;
        }
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get total elapsed time as Duration.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Elapsed time the simulation kept: `elapsed` minus dropped backlog.
    /// Stays within one fixed step of the time covered by physics.
    pub fn simulated_elapsed(&self) -> Duration {
        self.elapsed.saturating_sub(self.dropped)
    }

    /// Last frame's delta minus the backlog it dropped.
    pub fn simulated_delta(&self) -> Duration {
        self.delta.saturating_sub(self.dropped_this_frame)
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the fixed timestep in seconds.
    pub fn fixed_timestep_seconds(&self) -> f32 {
        self.fixed_timestep.as_secs_f32()
    }

    /// Check if a fixed update should run and consume the time.
    pub fn should_fixed_update(&mut self) -> bool {
        if self.accumulator >= self.fixed_timestep {
            self.accumulator -= self.fixed_timestep;
            self.substeps_this_frame += 1;
            true
        } else {
            false
        }
    }

    /// Fixed sub-steps consumed since the last `advance`.
    pub fn substeps_this_frame(&self) -> u32 {
        self.substeps_this_frame
    }

    /// Get the current FPS (averaged over last frame).
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }

    /// Set the fixed timestep rate in Hz. Non-finite or non-positive rates
    /// are ignored.
    pub fn set_fixed_rate(&mut self, hz: f64) {
        match Duration::try_from_secs_f64(1.0 / hz) {
            Ok(step) if hz.is_finite() && !step.is_zero() => self.fixed_timestep = step,
            _ => log::warn!(
                "Ignoring fixed rate {} Hz; keeping {:.1} Hz",
                hz,
                1.0 / self.fixed_timestep.as_secs_f64()
            ),
        }
    }

    /// Set the per-frame sub-step cap (at least one).
    pub fn set_max_substeps(&mut self, max: u32) {
        self.max_substeps = max.max(1);
    }
}
