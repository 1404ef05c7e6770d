use crate::telescope_control::Telescope;
use crate::util::*;

#[derive(Debug, Default, PartialEq, Copy, Clone)]
pub struct Target {
    pub right_ascension: Option<Hours>,
    pub declination: Option<Degrees>,
}

impl Target {
    pub fn try_get_right_ascension(&self) -> DriverResult<Hours> {
        self.right_ascension
            .ok_or_else(|| DriverError::value_not_set("Target right ascension not set"))
    }

    pub fn try_get_declination(&self) -> DriverResult<Degrees> {
        self.declination
            .ok_or_else(|| DriverError::value_not_set("Target declination not set"))
    }
}

impl Telescope {
    /// The declination (degrees, positive North) for the target of an equatorial slew or sync operation
    pub async fn get_target_declination(&self) -> DriverResult<Degrees> {
        self.target.read().await.try_get_declination()
    }

    /// Sets the declination (degrees, positive North) for the target of an equatorial slew or sync operation
    pub async fn set_target_declination(&self, dec: Degrees) -> DriverResult<()> {
        check_dec(dec)?;
        self.target.write().await.declination = Some(dec);
        tracing::debug!(dec, "Target declination set");
        Ok(())
    }

    /// The right ascension (hours) for the target of an equatorial slew or sync operation
    pub async fn get_target_ra(&self) -> DriverResult<Hours> {
        self.target.read().await.try_get_right_ascension()
    }

    /// Sets the right ascension (hours) for the target of an equatorial slew or sync operation
    pub async fn set_target_ra(&self, ra: Hours) -> DriverResult<()> {
        check_ra(ra)?;
        self.target.write().await.right_ascension = Some(ra);
        tracing::debug!(ra, "Target right ascension set");
        Ok(())
    }
    /// Sets both target coordinates, or neither if either is out of range
    pub async fn set_target(&self, ra: Hours, dec: Degrees) -> DriverResult<()> {
        check_ra(ra)?;
        check_dec(dec)?;
        *self.target.write().await = Target {
            right_ascension: Some(ra),
            declination: Some(dec),
        };
        tracing::debug!(ra, dec, "Target set");
        Ok(())
    }
}
