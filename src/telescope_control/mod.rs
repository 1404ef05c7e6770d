pub use commands::slew::AxisRateRange;
pub use commands::target::Target;
pub use slew_planner::{CoordinateSlewPlanner, SlewPlan};
pub use telescope::Telescope;

use crate::util::*;

pub mod axis;
mod commands {
    pub mod connection;
    pub mod guide;
    pub mod pointing_pos;
    pub mod slew;
    pub mod sync;
    pub mod target;
    pub mod tracking;
}
pub mod device;
mod slew_planner;
mod telescope;
#[cfg(test)]
pub(in crate::telescope_control) mod test_util;

impl Telescope {
    /// Short name of the driver
    pub async fn get_name(&self) -> String {
        "ST4 Telescope".to_string()
    }

    /// Description and version of the driver
    pub async fn get_driver_info(&self) -> String {
        format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    /// True if the telescope is stopped in the Home position. Homing isn't supported.
    pub async fn is_home(&self) -> DriverResult<bool> {
        Ok(false)
    }

    /// True if the telescope has been put into the parked state. Parking isn't supported.
    pub async fn is_parked(&self) -> DriverResult<bool> {
        Ok(false)
    }
    pub async fn get_alignment_mode(&self) -> DriverResult<AlignmentMode> {
        Ok(AlignmentMode::GermanPolar)
    }
}
