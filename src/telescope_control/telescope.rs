use std::sync::Arc;

use tokio::sync::RwLock;

use super::axis::AxisController;
use super::commands::target::Target;
use super::device::DeviceController;
use super::slew_planner::CoordinateSlewPlanner;
use crate::config::Config;
use crate::util::*;

/// A two axis mount driven through ST4 style relays, with dead reckoning in
/// place of position feedback
pub struct Telescope {
    pub(in crate::telescope_control) device: Arc<dyn DeviceController>,
    pub(in crate::telescope_control) ra_axis: Arc<AxisController>,
    pub(in crate::telescope_control) dec_axis: Arc<AxisController>,
    pub(in crate::telescope_control) planner: CoordinateSlewPlanner,
    pub(in crate::telescope_control) target: RwLock<Target>,
}

impl Telescope {
    pub fn new(config: &Config, device: Arc<dyn DeviceController>) -> Self {
        let ra_axis = Arc::new(AxisController::new(
            Axis::RightAscension,
            config.right_ascension_rates(),
            false,
            device.clone(),
        ));
        let dec_axis = Arc::new(AxisController::new(
            Axis::Declination,
            config.declination_rates(),
            config.meridian_flip,
            device.clone(),
        ));

        Telescope {
            device,
            planner: CoordinateSlewPlanner::new(ra_axis.clone(), dec_axis.clone()),
            ra_axis,
            dec_axis,
            target: RwLock::new(Target::default()), // No target initially
        }
    }

    pub(in crate::telescope_control) fn axis_controller(&self, axis: Axis) -> &AxisController {
        match axis {
            Axis::RightAscension => &self.ra_axis,
            Axis::Declination => &self.dec_axis,
        }
    }
}
