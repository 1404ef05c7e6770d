use std::time::Duration;

use crate::telescope_control::Telescope;
use crate::util::*;

impl Telescope {
    /// Guiding moves at the slew rate, so this is the current right ascension rate
    pub async fn get_guide_rate_ra(&self) -> DriverResult<f64> {
        self.get_ra_rate().await
    }

    /// Guiding moves at the slew rate, so this is the current declination rate
    pub async fn get_guide_rate_declination(&self) -> DriverResult<f64> {
        self.get_dec_rate().await
    }

    /// True if this telescope is capable of software-pulsed guiding
    pub async fn can_pulse_guide(&self) -> DriverResult<bool> {
        Ok(true)
    }

    /// Moves the scope in the given direction for the given time (milliseconds).
    /// Returns immediately, the axis stops by itself.
    pub async fn pulse_guide(&self, direction: GuideDirection, duration: u32) -> DriverResult<()> {
        let (axis, orientation) = direction.axis_orientation();
        tracing::debug!(%direction, duration, "Pulse guide");
        self.axis_controller(axis)
            .move_for(Duration::from_millis(duration as u64), orientation)
            .await
    }

    /// True if a pulse guide is in progress
    pub async fn is_pulse_guiding(&self) -> DriverResult<bool> {
        Ok(self.is_moving().await)
    }
}
