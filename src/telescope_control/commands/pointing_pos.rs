use chrono::{DateTime, Utc};

use crate::astro_math;
use crate::telescope_control::Telescope;
use crate::util::*;

impl Telescope {
    /// The right ascension (hours) of the mount's current equatorial coordinates
    pub async fn get_ra(&self) -> DriverResult<Hours> {
        Ok(self.planner.current_ra())
    }

    /// The declination (degrees) of the mount's current equatorial coordinates
    pub async fn get_dec(&self) -> DriverResult<Degrees> {
        Ok(self.planner.current_dec())
    }

    /// The local apparent sidereal time at Greenwich (hours)
    pub async fn get_sidereal_time(&self) -> DriverResult<Hours> {
        Ok(astro_math::calculate_greenwich_sidereal_time(
            Utc::now(),
        ))
    }
    /// The mount has no clock of its own, so this is the system's UTC time
    pub async fn get_utc_date(&self) -> DriverResult<DateTime<Utc>> {
        Ok(Utc::now())
    }
}
