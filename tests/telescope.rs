use std::sync::Arc;
use std::time::Duration;

use assert_float_eq::*;
use tokio::time::{self, Instant};

use st4_driver::config::{AxisRates, Config, DeviceType, SlewRateSettings};
use st4_driver::telescope_control::axis::AxisController;
use st4_driver::telescope_control::device::{DeviceController, DummyDeviceController};
use st4_driver::util::*;
use st4_driver::Telescope;

/// RA moves 1h per 100s, DEC 1 degree per 10s
fn config(meridian_flip: bool) -> Config {
    Config {
        device: DeviceType::Dummy,
        slew_rates: SlewRateSettings {
            right_ascension_plus: 36.,
            right_ascension_minus: 36.,
            declination_plus: 24.,
            declination_minus: 24.,
        },
        mount_compensates_earth_rotation_in_slew: true,
        meridian_flip,
        ..Default::default()
    }
}

async fn connected_telescope(meridian_flip: bool) -> (Telescope, Arc<DummyDeviceController>) {
    let device = Arc::new(DummyDeviceController::new());
    let telescope = Telescope::new(&config(meridian_flip), device.clone());
    telescope.connect().await.unwrap();
    device.clear_history();
    (telescope, device)
}

#[tokio::test(start_paused = true)]
async fn slew_takes_shortest_way_around() {
    let (telescope, device) = connected_telescope(false).await;
    telescope.sync_to_coordinates(23., 0.).await.unwrap();

    let start = Instant::now();
    telescope.slew_to_coordinates(1., 0.).await.unwrap();
    // 2h, not 22h
    assert_eq!(start.elapsed(), Duration::from_secs(200));
    assert_float_absolute_eq!(telescope.get_ra().await.unwrap(), 1., 1E-9);
    assert_eq!(device.history(), vec!["RA0", "RA+", "DEC0", "RA0"]);

    device.clear_history();
    telescope.slew_to_coordinates(23., 0.).await.unwrap();
    assert_float_absolute_eq!(telescope.get_ra().await.unwrap(), 23., 1E-9);
    assert_eq!(device.history(), vec!["RA0", "RA-", "DEC0", "RA0"]);
}

#[tokio::test(start_paused = true)]
async fn declination_does_not_wrap() {
    let (telescope, device) = connected_telescope(false).await;
    telescope.sync_to_coordinates(0., 80.).await.unwrap();

    let start = Instant::now();
    telescope.slew_to_coordinates(0., -80.).await.unwrap();
    assert_eq!(start.elapsed(), Duration::from_secs(1600));
    assert_float_absolute_eq!(telescope.get_dec().await.unwrap(), -80., 1E-9);
    assert_eq!(device.history(), vec!["RA0", "DEC0", "DEC-", "DEC0"]);
}

#[tokio::test(start_paused = true)]
async fn meridian_flip_inverts_declination_hardware() {
    let (telescope, device) = connected_telescope(true).await;
    telescope
        .pulse_guide(GuideDirection::North, 2_000)
        .await
        .unwrap();
    assert!(telescope.get_dec_rate().await.unwrap() > 0.);
    time::sleep(Duration::from_secs(5)).await;

    assert_float_absolute_eq!(telescope.get_dec().await.unwrap(), 0.2, 1E-9);
    assert_eq!(device.history(), vec!["DEC0", "DEC-", "DEC0"]);

    // Right ascension is unaffected
    device.clear_history();
    telescope
        .pulse_guide(GuideDirection::East, 1_000)
        .await
        .unwrap();
    time::sleep(Duration::from_secs(2)).await;
    assert_eq!(device.history(), vec!["RA0", "RA+", "RA0"]);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_telescope_stops_the_mount() {
    let (telescope, device) = connected_telescope(false).await;
    telescope
        .pulse_guide(GuideDirection::North, 10_000)
        .await
        .unwrap();
    telescope
        .move_axis(Axis::RightAscension, 0.01)
        .await
        .unwrap();
    drop(telescope);

    time::sleep(Duration::from_secs(1)).await;
    let history = device.history();
    assert_eq!(&history[..2], ["DEC0", "DEC+"]);
    assert_eq!(&history[2..4], ["RA0", "RA+"]);
    let mut stops = history[4..].to_vec();
    stops.sort();
    assert_eq!(stops, vec!["DEC0", "RA0"]);
}

#[tokio::test(start_paused = true)]
async fn new_move_retires_pending_stop() {
    let (telescope, device) = connected_telescope(false).await;
    let telescope = Arc::new(telescope);

    // Long guide pulse whose stop must never fire
    telescope
        .pulse_guide(GuideDirection::North, 30_000)
        .await
        .unwrap();

    let canceller = {
        let telescope = telescope.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(50)).await;
            telescope.move_axis(Axis::Declination, -0.01).await.unwrap();
        })
    };
    canceller.await.unwrap();

    time::sleep(Duration::from_secs(60)).await;
    assert!(telescope.is_moving().await);
    assert!(telescope.get_dec_rate().await.unwrap() < 0.);
    assert_float_absolute_eq!(telescope.get_dec().await.unwrap(), 0.005 - 6., 1E-9);
    assert_eq!(device.history(), vec!["DEC0", "DEC+", "DEC0", "DEC-"]);

    telescope.abort_slew().await.unwrap();
    assert!(!telescope.is_moving().await);
}

#[tokio::test]
async fn invalid_coordinates_touch_nothing() {
    let (telescope, device) = connected_telescope(false).await;
    telescope.sync_to_coordinates(6., 45.).await.unwrap();

    for err in [
        telescope.sync_to_coordinates(25., 0.).await.unwrap_err(),
        telescope.slew_to_coordinates(0., 91.).await.unwrap_err(),
        telescope.slew_to_coordinates_async(-0.5, 0.).await.unwrap_err(),
        telescope.set_target_declination(-90.1).await.unwrap_err(),
    ] {
        assert_eq!(err.error_type, ErrorType::InvalidValue);
        assert_eq!(err.error_number(), 0x401);
    }

    assert_eq!(telescope.get_ra().await.unwrap(), 6.);
    assert_eq!(telescope.get_dec().await.unwrap(), 45.);
    assert!(!telescope.is_moving().await);
    assert!(device.history().is_empty());
}

#[tokio::test(start_paused = true)]
async fn lost_device_keeps_tracking_consistent() {
    let (telescope, device) = connected_telescope(false).await;
    telescope.slew_to_coordinates_async(1., 10.).await.unwrap();
    time::sleep(Duration::from_secs(10)).await;

    device.set_failing(true);
    // Both background stops fail on the wire
    time::sleep(Duration::from_secs(200)).await;
    assert!(!telescope.is_moving().await);
    assert_float_absolute_eq!(telescope.get_ra().await.unwrap(), 1., 1E-9);
    assert_float_absolute_eq!(telescope.get_dec().await.unwrap(), 10., 1E-9);

    let err = telescope
        .slew_to_coordinates_async(2., 10.)
        .await
        .unwrap_err();
    assert_eq!(err.error_type, ErrorType::Communication);
    assert!(!telescope.is_moving().await);
    assert_float_absolute_eq!(telescope.get_ra().await.unwrap(), 1., 1E-9);
}

#[tokio::test]
async fn disconnected_moves_fail() {
    let device = Arc::new(DummyDeviceController::new());
    let telescope = Telescope::new(&config(false), device.clone());

    let err = telescope.slew_to_coordinates(1., 1.).await.unwrap_err();
    assert_eq!(err.error_type, ErrorType::NotConnected);
    assert_eq!(err.error_number(), 0x407);
    assert_eq!(telescope.get_ra().await.unwrap(), 0.);

    // Stopping and shutting down still work
    telescope.abort_slew().await.unwrap();
    telescope.shutdown().await.unwrap();
}

#[tokio::test]
async fn duration_from_delta_uses_physical_rate() {
    let device: Arc<dyn DeviceController> = Arc::new(DummyDeviceController::new());
    let rates = AxisRates {
        plus: 2.,
        minus: 2.,
    };
    for inverted in [false, true] {
        let controller = AxisController::new(Axis::Declination, rates, inverted, device.clone());
        let (orientation, duration) = controller.duration_for_delta(10.).unwrap();
        assert_eq!(orientation, Orientation::Plus);
        assert_eq!(duration, Duration::from_secs(5));
    }
}
