//! Simulated clock for the pond engine.
//!
//! Time inside the engine is counted in whole simulated seconds, one per
//! tick. Every timestamp a slot carries (plant expiry, last feeding, hunger
//! onset) is a reading of this clock, never wall-clock time.

/// Errors that can occur during clock operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// The second counter would overflow.
    #[error("clock overflow: cannot advance beyond u64::MAX")]
    Overflow,
}

/// Monotonic simulated-seconds counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PondClock {
    now: u64,
}

impl PondClock {
    /// A clock at second 0.
    pub const fn new() -> Self {
        Self { now: 0 }
    }

    /// A clock at an explicit second (state restoration and tests).
    pub const fn at(now: u64) -> Self {
        Self { now }
    }

    /// Advance by one second and return the new reading.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::Overflow`] at `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.now = self.now.checked_add(1).ok_or(ClockError::Overflow)?;
        Ok(self.now)
    }

    /// The current simulated second.
    pub const fn now(&self) -> u64 {
        self.now
    }
}
