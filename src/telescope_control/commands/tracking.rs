use crate::telescope_control::Telescope;
use crate::util::*;

impl Telescope {
    /// Signed rate the right ascension currently changes at (hours per second)
    pub async fn get_ra_rate(&self) -> DriverResult<f64> {
        Ok(self.ra_axis.slew_rate())
    }

    /// Signed rate the declination currently changes at (degrees per second)
    pub async fn get_dec_rate(&self) -> DriverResult<f64> {
        Ok(self.dec_axis.slew_rate())
    }

    /// True if either axis is moving
    pub async fn is_moving(&self) -> bool {
        self.ra_axis.is_moving() || self.dec_axis.is_moving()
    }

    /// The mount tracks on its own whenever the axes aren't being driven
    pub async fn is_tracking(&self) -> DriverResult<bool> {
        Ok(!self.is_moving().await)
    }

    /// Tracking is up to the mount and can't be switched from here
    pub async fn set_tracking(&self, _tracking: bool) -> DriverResult<()> {
        Err(DriverError::from_msg(
            ErrorType::NotImplemented,
            "Tracking can't be switched by the driver",
        ))
    }
    /// The mount only tracks at the sidereal rate
    pub async fn get_tracking_rate(&self) -> DriverResult<TrackingRate> {
        Ok(TrackingRate::Sidereal)
    }

    pub async fn get_tracking_rates(&self) -> DriverResult<Vec<TrackingRate>> {
        Ok(vec![TrackingRate::Sidereal])
    }

    pub async fn set_tracking_rate(&self, tracking_rate: TrackingRate) -> DriverResult<()> {
        if tracking_rate == TrackingRate::Sidereal {
            Ok(())
        } else {
            Err(DriverError::invalid_value(format!(
                "Tracking rate {:?} isn't supported",
                tracking_rate
            )))
        }
    }
}
