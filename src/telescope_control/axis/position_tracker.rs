use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use tokio::time::Instant;

use crate::util::*;

/// Dead reckoning estimate of the position along one axis.
///
/// The axis only ever moves at a known rate, so the position is the last
/// position it stopped at plus the rate times the time spent moving since.
pub struct PositionTracker {
    base_position: f64,
    slew_rate: f64,
    slew_start_time: Instant,
    time_source: Arc<dyn TimeSource>,
}

impl Debug for PositionTracker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionTracker")
            .field("base_position", &self.base_position)
            .field("slew_rate", &self.slew_rate)
            .finish()
    }
}

impl PositionTracker {
    pub fn new(time_source: Arc<dyn TimeSource>) -> Self {
        let now = time_source.now();
        Self {
            base_position: 0.,
            slew_rate: 0.,
            slew_start_time: now,
            time_source,
        }
    }

    fn position_delta_at(&self, now: Instant) -> f64 {
        if self.slew_rate == 0. {
            return 0.;
        }
        let slew_time = now.saturating_duration_since(self.slew_start_time);
        self.slew_rate * slew_time.as_secs_f64()
    }

    /// Starts moving at a signed rate, positive meaning the Plus orientation.
    /// Motion accumulated at a previous rate is kept.
    pub fn start(&mut self, slew_rate: f64) {
        let now = self.time_source.now();
        self.base_position += self.position_delta_at(now);
        self.slew_rate = slew_rate;
        self.slew_start_time = now;
    }

    pub fn stop(&mut self) {
        let now = self.time_source.now();
        self.base_position += self.position_delta_at(now);
        self.slew_rate = 0.;
        self.slew_start_time = now;
    }

    pub fn position(&self) -> f64 {
        self.base_position + self.position_delta_at(self.time_source.now())
    }

    /// Resets the estimate. Only allowed while stationary.
    pub fn set_position(&mut self, position: f64) -> DriverResult<()> {
        if self.is_moving() {
            return Err(DriverError::invalid_operation(
                "Can't set the position of a moving axis",
            ));
        }
        self.base_position = position;
        Ok(())
    }

    /// Signed rate, zero when stationary
    pub fn slew_rate(&self) -> f64 {
        self.slew_rate
    }

    pub fn is_moving(&self) -> bool {
        self.slew_rate != 0.
    }
}
