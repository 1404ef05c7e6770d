use crate::telescope_control::Telescope;
use crate::util::*;

impl Telescope {
    /// True if this telescope is capable of programmed synching to equatorial coordinates.
    pub async fn can_sync(&self) -> DriverResult<bool> {
        Ok(true)
    }

    /// Matches the scope's equatorial coordinates to the given equatorial coordinates.
    /// The mount must be stationary.
    pub async fn sync_to_coordinates(&self, ra: Hours, dec: Degrees) -> DriverResult<()> {
        self.planner.sync(ra, dec)
    }

    /// Matches the scope's equatorial coordinates to the TargetRightAscension and TargetDeclination equatorial coordinates.
    pub async fn sync_to_target(&self) -> DriverResult<()> {
        let target = *self.target.read().await;
        self.sync_to_coordinates(
            target.try_get_right_ascension()?,
            target.try_get_declination()?,
        )
        .await
    }
}
