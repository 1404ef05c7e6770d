use crate::astro_math::DEGREES_PER_SECOND;
use crate::telescope_control::Telescope;
use crate::util::*;

/// Range of rates accepted by [`Telescope::move_axis`]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AxisRateRange {
    pub minimum: f64,
    pub maximum: f64,
}

impl AxisRateRange {
    pub fn contains(&self, rate: f64) -> bool {
        self.minimum <= rate && rate <= self.maximum
    }
}

impl Telescope {
    pub(in crate::telescope_control) fn get_axis_rate_range() -> AxisRateRange {
        AxisRateRange {
            minimum: 0.,
            maximum: 8. * DEGREES_PER_SECOND,
        }
    }

    /// The rates at which the telescope may be moved about the specified axis by move_axis
    pub async fn get_axis_rates(&self, _axis: Axis) -> DriverResult<Vec<AxisRateRange>> {
        Ok(vec![Self::get_axis_rate_range()])
    }

    /// True if this telescope can move the requested axis.
    pub async fn can_move_axis(&self, _axis: Axis) -> DriverResult<bool> {
        Ok(true)
    }

    /// Moves an axis until told otherwise. The sign of `rate` gives the direction
    /// and zero stops the axis. The axis always moves at its configured rate.
    pub async fn move_axis(&self, axis: Axis, rate: f64) -> DriverResult<()> {
        tracing::debug!(%axis, rate, "Move axis");
        let range = Self::get_axis_rate_range();
        if !range.contains(rate.abs()) {
            return Err(DriverError::invalid_value(format!(
                "Rate {} for {} must be within {}..{}",
                rate, axis, range.minimum, range.maximum
            )));
        }

        let axis_controller = self.axis_controller(axis);
        if rate == 0. {
            axis_controller.stop().await;
            Ok(())
        } else {
            axis_controller
                .move_indefinitely(Orientation::from_signed_rate(rate))
                .await
        }
    }

    /// True if telescope is currently moving in response to one of the Slew methods or move_axis
    pub async fn is_slewing(&self) -> DriverResult<bool> {
        Ok(self.is_moving().await)
    }

    /// Immediately stops a slew in progress.
    pub async fn abort_slew(&self) -> DriverResult<()> {
        tracing::info!("Aborting slew");
        self.planner.abort_all().await;
        Ok(())
    }

    /// True if this telescope is capable of programmed slewing (synchronous or asynchronous) to equatorial coordinates
    pub async fn can_slew(&self) -> DriverResult<bool> {
        Ok(true)
    }

    /// Move the telescope to the given equatorial coordinates, return when slew is complete
    pub async fn slew_to_coordinates(&self, ra: Hours, dec: Degrees) -> DriverResult<()> {
        self.planner.slew(ra, dec).await
    }

    /// Move the telescope to the given equatorial coordinates, return immediately after starting the slew
    pub async fn slew_to_coordinates_async(&self, ra: Hours, dec: Degrees) -> DriverResult<()> {
        self.planner.slew_async(ra, dec).await
    }

    /// Move the telescope to the TargetRightAscension and TargetDeclination equatorial coordinates, return when slew is complete
    pub async fn slew_to_target(&self) -> DriverResult<()> {
        let target = *self.target.read().await;
        self.slew_to_coordinates(
            target.try_get_right_ascension()?,
            target.try_get_declination()?,
        )
        .await
    }

    /// Move the telescope to the TargetRightAscension and TargetDeclination equatorial coordinates, return immediately after starting the slew
    pub async fn slew_to_target_async(&self) -> DriverResult<()> {
        let target = *self.target.read().await;
        self.slew_to_coordinates_async(
            target.try_get_right_ascension()?,
            target.try_get_declination()?,
        )
        .await
    }
}
