use std::sync::Arc;

use super::device::DummyDeviceController;
use super::Telescope;
use crate::config::{Config, DeviceType, SlewRateSettings};

/// Connected telescope on a dummy device with round rates:
/// RA moves 1h per 100s, DEC 1 degree per 10s
pub(in crate::telescope_control) async fn create_telescope() -> (Telescope, Arc<DummyDeviceController>) {
    create_telescope_with(test_config()).await
}

pub(in crate::telescope_control) fn test_config() -> Config {
    Config {
        device: DeviceType::Dummy,
        slew_rates: SlewRateSettings {
            right_ascension_plus: 36.,
            right_ascension_minus: 36.,
            declination_plus: 24.,
            declination_minus: 24.,
        },
        mount_compensates_earth_rotation_in_slew: true,
        ..Default::default()
    }
}

pub(in crate::telescope_control) async fn create_telescope_with(
    config: Config,
) -> (Telescope, Arc<DummyDeviceController>) {
    let device = Arc::new(DummyDeviceController::new());
    let telescope = Telescope::new(&config, device.clone());
    telescope.connect().await.unwrap();
    device.clear_history();
    (telescope, device)
}
