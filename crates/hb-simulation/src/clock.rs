use crate::error::{SimError, SimResult};

/// Largest accepted time step (exclusive).
pub const MAX_DURATION: f64 = 0.2;

/// Check that a time step lies in `[0, MAX_DURATION)`.
pub fn validate_duration(dt: f64) -> SimResult<()> {
    if (0.0..MAX_DURATION).contains(&dt) {
        Ok(())
    } else {
        Err(SimError::InvalidDuration(dt))
    }
}

/// Tracks simulation time: a monotonic tick counter and the elapsed game time.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    tick: u64,
    elapsed: f64,
}

impl SimClock {
    /// Create a new clock at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one tick of length `dt`. Returns the new tick number.
    pub fn advance(&mut self, dt: f64) -> u64 {
        self.tick += 1;
        self.elapsed += dt;
        self.tick
    }

    /// Return the current tick number.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Total game time elapsed since the world was created.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}
