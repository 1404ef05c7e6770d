use std::sync::Arc;

use tokio::join;

use super::axis::AxisController;
use crate::astro_math::modulo;
use crate::util::*;

/// Signed distances each axis has to move to reach a target
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SlewPlan {
    pub ra_delta: Hours,
    pub dec_delta: Degrees,
}

impl SlewPlan {
    /// Takes the shortest way around the right ascension circle.
    /// A distance of exactly 12 hours is kept as computed, so 12h to 0h is -12h.
    pub fn new(current_ra: Hours, current_dec: Degrees, target_ra: Hours, target_dec: Degrees) -> Self {
        let mut ra_delta = target_ra - modulo(current_ra, 24.);
        if ra_delta < -12. {
            ra_delta += 24.;
        } else if ra_delta > 12. {
            ra_delta -= 24.;
        }

        Self {
            ra_delta,
            // Declination doesn't wrap
            dec_delta: target_dec - current_dec,
        }
    }
}

/// Turns absolute coordinates into moves of the two axes
pub struct CoordinateSlewPlanner {
    ra_axis: Arc<AxisController>,
    dec_axis: Arc<AxisController>,
}

impl CoordinateSlewPlanner {
    pub fn new(ra_axis: Arc<AxisController>, dec_axis: Arc<AxisController>) -> Self {
        Self { ra_axis, dec_axis }
    }

    /// Right ascension in [0, 24)
    pub fn current_ra(&self) -> Hours {
        modulo(self.ra_axis.position(), 24.)
    }

    pub fn current_dec(&self) -> Degrees {
        self.dec_axis.position()
    }

    pub fn plan(&self, target_ra: Hours, target_dec: Degrees) -> DriverResult<SlewPlan> {
        check_ra(target_ra)?;
        check_dec(target_dec)?;
        Ok(SlewPlan::new(
            self.current_ra(),
            self.current_dec(),
            target_ra,
            target_dec,
        ))
    }

    /// Starts both axes towards the target and returns without waiting
    pub async fn slew_async(&self, target_ra: Hours, target_dec: Degrees) -> DriverResult<()> {
        let plan = self.plan(target_ra, target_dec)?;
        // Fail before either axis moves
        self.ra_axis.duration_for_delta(plan.ra_delta)?;
        self.dec_axis.duration_for_delta(plan.dec_delta)?;

        tracing::info!(
            target_ra,
            target_dec,
            current_ra = self.current_ra(),
            current_dec = self.current_dec(),
            ra_delta = plan.ra_delta,
            dec_delta = plan.dec_delta,
            "Slewing"
        );

        self.ra_axis.move_by(plan.ra_delta).await?;
        if let Err(e) = self.dec_axis.move_by(plan.dec_delta).await {
            self.ra_axis.stop().await;
            return Err(e);
        }
        Ok(())
    }

    /// Slews and waits until both axes are stationary
    pub async fn slew(&self, target_ra: Hours, target_dec: Degrees) -> DriverResult<()> {
        self.slew_async(target_ra, target_dec).await?;
        let (ra_result, dec_result) = join!(
            self.ra_axis.wait_for_move_end(),
            self.dec_axis.wait_for_move_end()
        );
        if ra_result.is_aborted() || dec_result.is_aborted() {
            tracing::info!("Slew aborted");
        } else {
            tracing::info!(ra = self.current_ra(), dec = self.current_dec(), "Slew complete");
        }
        Ok(())
    }

    /// Sets the position of both axes without moving them
    pub fn sync(&self, ra: Hours, dec: Degrees) -> DriverResult<()> {
        check_ra(ra)?;
        check_dec(dec)?;
        if self.ra_axis.is_moving() || self.dec_axis.is_moving() {
            return Err(DriverError::invalid_operation(
                "Can't sync while the mount is moving",
            ));
        }

        self.ra_axis.set_position(ra)?;
        self.dec_axis.set_position(dec)?;
        tracing::info!(ra, dec, "Synced");
        Ok(())
    }

    /// Stops both axes, right ascension first
    pub async fn abort_all(&self) {
        self.ra_axis.stop().await;
        self.dec_axis.stop().await;
    }
}
