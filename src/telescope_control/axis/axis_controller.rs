use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio::{select, sync};

use super::position_tracker::PositionTracker;
use crate::config::AxisRates;
use crate::telescope_control::device::DeviceController;
use crate::util::*;

/// The tokio timer is woken this much early and the rest is spun
const EARLY_RETURN: Duration = Duration::from_millis(5);

type TimedMoveTask = AbortableTask<(), ()>;

/// Background task that stops the axis once a timed move is over
struct TimedMove {
    task: TimedMoveTask,
    handle: JoinHandle<()>,
}

fn lock_tracker(tracker: &Mutex<PositionTracker>) -> MutexGuard<'_, PositionTracker> {
    tracker.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Stops tracking, then tells the hardware to stop.
/// The hardware stop is always attempted and its failure only logged.
async fn stop_movement(axis: Axis, tracker: &Mutex<PositionTracker>, device: &dyn DeviceController) {
    lock_tracker(tracker).stop();
    if let Err(e) = device.move_axis(axis, None).await {
        tracing::warn!(%axis, "Failed to stop axis: {}", e);
    }
}

async fn wait_until(deadline: Instant) {
    let coarse_deadline = deadline.checked_sub(EARLY_RETURN).unwrap_or(deadline);
    time::sleep_until(coarse_deadline).await;
    spin_sleep::sleep(deadline.saturating_duration_since(Instant::now()));
    // The runtime clock only follows the wall clock when it isn't paused
    if Instant::now() < deadline {
        time::sleep_until(deadline).await;
    }
}

/// Controls one axis.
///
/// Tells the hardware to start and stop moving and keeps track of the position
/// while doing so. The axis can be moved indefinitely, for a given time, or by
/// a given distance.
///
/// At most one move is active per axis: every move or stop first cancels the
/// pending timed move and waits until its task is gone.
pub struct AxisController {
    axis: Axis,
    rates: AxisRates,
    inverted_hardware: bool,
    device: Arc<dyn DeviceController>,
    tracker: Arc<Mutex<PositionTracker>>,
    timed_move: sync::Mutex<Option<TimedMove>>,
}

impl AxisController {
    pub fn new(
        axis: Axis,
        rates: AxisRates,
        inverted_hardware: bool,
        device: Arc<dyn DeviceController>,
    ) -> Self {
        tracing::debug!(%axis, plus = rates.plus, minus = rates.minus, inverted_hardware, "Creating axis controller");
        Self {
            axis,
            rates,
            inverted_hardware,
            device,
            tracker: Arc::new(Mutex::new(PositionTracker::new(Arc::new(TokioTimeSource)))),
            timed_move: sync::Mutex::new(None),
        }
    }

    pub fn position(&self) -> f64 {
        lock_tracker(&self.tracker).position()
    }

    /// Syncs the position estimate. The axis must be stationary.
    pub fn set_position(&self, position: f64) -> DriverResult<()> {
        lock_tracker(&self.tracker).set_position(position)?;
        tracing::info!(axis = %self.axis, position, "Position set");
        Ok(())
    }

    /// Signed rate the position currently changes at, zero when stationary
    pub fn slew_rate(&self) -> f64 {
        lock_tracker(&self.tracker).slew_rate()
    }

    pub fn is_moving(&self) -> bool {
        self.slew_rate() != 0.
    }

    /// Rate of the hardware when asked to move in the logical `orientation`
    fn physical_slew_rate(&self, orientation: Orientation) -> f64 {
        match orientation.invert_if(self.inverted_hardware) {
            Orientation::Plus => self.rates.plus,
            Orientation::Minus => self.rates.minus,
        }
    }

    /// Orientation and time needed to change the position by `position_delta`
    pub fn duration_for_delta(&self, position_delta: f64) -> DriverResult<(Orientation, Duration)> {
        let orientation = Orientation::from_signed_rate(position_delta);
        if position_delta == 0. {
            return Ok((orientation, Duration::ZERO));
        }
        if !position_delta.is_finite() {
            return Err(DriverError::invalid_value(format!(
                "Can't move {} by {}",
                self.axis, position_delta
            )));
        }

        let rate = self.physical_slew_rate(orientation);
        if !(rate > 0. && rate.is_finite()) {
            return Err(DriverError::configuration(format!(
                "Slew rate of {} for {} in the {} orientation can't be used to reach a position",
                rate, self.axis, orientation
            )));
        }

        Duration::try_from_secs_f64(position_delta.abs() / rate)
            .map(|duration| (orientation, duration))
            .map_err(|e| DriverError::configuration(format!("Invalid move duration: {}", e)))
    }

    /// Moves the axis in `orientation`.
    ///
    /// Without a duration the axis keeps moving until stopped or moved again.
    /// With one, the axis is stopped once it elapses; a synchronous move only
    /// returns then. A zero duration just stops the axis.
    pub async fn move_axis(
        &self,
        duration: Option<Duration>,
        orientation: Orientation,
        mode: MoveMode,
    ) -> DriverResult<()> {
        tracing::debug!(axis = %self.axis, ?duration, %orientation, ?mode, "Move");
        if !self.device.is_connected() {
            return Err(DriverError::not_connected(format!(
                "Can't move {} while disconnected",
                self.axis
            )));
        }
        if let Some(duration) = duration {
            if Instant::now().checked_add(duration).is_none() {
                return Err(DriverError::invalid_value(format!(
                    "Can't move {} for {:?}",
                    self.axis, duration
                )));
            }
        }

        let mut timed_move = self.timed_move.lock().await;
        self.cancel_timed_move(&mut timed_move).await;
        stop_movement(self.axis, &self.tracker, self.device.as_ref()).await;

        if duration == Some(Duration::ZERO) {
            tracing::debug!(axis = %self.axis, "Nothing to do");
            return Ok(());
        }

        let physical_orientation = orientation.invert_if(self.inverted_hardware);
        self.device
            .move_axis(self.axis, Some(physical_orientation))
            .await?;
        // Track the logical direction even when the hardware runs reversed
        let slew_rate = orientation.get_sign_f64() * self.physical_slew_rate(orientation);
        lock_tracker(&self.tracker).start(slew_rate);

        let deadline = match duration.and_then(|duration| Instant::now().checked_add(duration)) {
            Some(deadline) => deadline,
            None => return Ok(()),
        };

        let new_move = self.spawn_timed_stop(deadline);
        let waiter = new_move.task.get_waitable_task();
        *timed_move = Some(new_move);
        drop(timed_move);

        if mode == MoveMode::Synchronous {
            if waiter.await.is_aborted() {
                tracing::debug!(axis = %self.axis, "Synchronous move cut short");
            }
        }
        Ok(())
    }

    /// Moves until stopped
    pub async fn move_indefinitely(&self, orientation: Orientation) -> DriverResult<()> {
        self.move_axis(None, orientation, MoveMode::Asynchronous)
            .await
    }

    /// Moves for `duration` in the background
    pub async fn move_for(&self, duration: Duration, orientation: Orientation) -> DriverResult<()> {
        self.move_axis(Some(duration), orientation, MoveMode::Asynchronous)
            .await
    }

    /// Changes the position by `position_delta` in the background
    pub async fn move_by(&self, position_delta: f64) -> DriverResult<()> {
        let (orientation, duration) = self.duration_for_delta(position_delta)?;
        tracing::debug!(
            axis = %self.axis,
            position_delta,
            current_position = self.position(),
            ?duration,
            "Move by"
        );
        self.move_axis(Some(duration), orientation, MoveMode::Asynchronous)
            .await
    }

    /// Cancels any timed move and stops the axis
    pub async fn stop(&self) {
        let mut timed_move = self.timed_move.lock().await;
        self.cancel_timed_move(&mut timed_move).await;
        stop_movement(self.axis, &self.tracker, self.device.as_ref()).await;
        tracing::debug!(axis = %self.axis, position = self.position(), "Stopped");
    }

    /// Waits for the pending timed move, if any, to complete or be cancelled.
    /// Indefinite moves are not waited for.
    pub async fn wait_for_move_end(&self) -> AbortResult<(), ()> {
        let waiter = self
            .timed_move
            .lock()
            .await
            .as_ref()
            .map(|m| m.task.get_waitable_task());

        match waiter {
            Some(waiter) => waiter.await,
            None => AbortResult::Completed(()),
        }
    }

    /// Stops the axis and releases the timed move task.
    /// Safe while the device is unreachable.
    pub async fn shutdown(&self) {
        self.stop().await;
        tracing::debug!(axis = %self.axis, "Axis controller shut down");
    }

    /// Returns once the task can no longer touch the tracker or the device
    async fn cancel_timed_move(&self, timed_move: &mut Option<TimedMove>) {
        if let Some(TimedMove { task, handle }) = timed_move.take() {
            if !task.is_finished() {
                tracing::debug!(axis = %self.axis, "Cancelling timed move");
            }
            task.abort();
            if let Err(e) = handle.await {
                tracing::warn!(axis = %self.axis, "Timed move task failed: {}", e);
            }
        }
    }

    fn spawn_timed_stop(&self, deadline: Instant) -> TimedMove {
        let (task, finisher) = TimedMoveTask::new();
        let abort_waiter = task.get_abort_waiter();
        let axis = self.axis;
        let tracker = self.tracker.clone();
        let device = self.device.clone();

        let handle = tokio::spawn(async move {
            select! {
                _ = wait_until(deadline) => {
                    if finisher.is_abort_requested() {
                        finisher.aborted(());
                        return;
                    }
                    stop_movement(axis, &tracker, device.as_ref()).await;
                    tracing::debug!(
                        %axis,
                        position = lock_tracker(&tracker).position(),
                        "Timed move complete"
                    );
                    finisher.finish(());
                }
                _ = abort_waiter => {
                    finisher.aborted(());
                }
            }
        });

        TimedMove { task, handle }
    }
}

/// Stops a moving axis in the background. A pending timed move is cancelled
/// and joined first, as in [`AxisController::stop`].
impl Drop for AxisController {
    fn drop(&mut self) {
        let timed_move = self.timed_move.get_mut().take();
        if timed_move.is_none() && lock_tracker(&self.tracker).slew_rate() == 0. {
            return;
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::warn!(axis = %self.axis, "Can't stop axis on drop: {}", e);
                return;
            }
        };

        let axis = self.axis;
        let tracker = self.tracker.clone();
        let device = self.device.clone();
        runtime.spawn(async move {
            if let Some(TimedMove { task, handle }) = timed_move {
                task.abort();
                if let Err(e) = handle.await {
                    tracing::warn!(%axis, "Timed move task failed: {}", e);
                }
            }
            stop_movement(axis, &tracker, device.as_ref()).await;
            tracing::debug!(%axis, "Stopped on drop");
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telescope_control::device::DummyDeviceController;
    use assert_float_eq::*;

    const RATES: AxisRates = AxisRates {
        plus: 2.,
        minus: 1.,
    };

    async fn create_controller(
        axis: Axis,
        rates: AxisRates,
        inverted_hardware: bool,
    ) -> (AxisController, Arc<DummyDeviceController>) {
        let device = Arc::new(DummyDeviceController::new());
        device.connect().await.unwrap();
        device.clear_history();
        let controller = AxisController::new(axis, rates, inverted_hardware, device.clone());
        (controller, device)
    }

    #[tokio::test(start_paused = true)]
    async fn test_indefinite_move() {
        let (controller, device) = create_controller(Axis::RightAscension, RATES, false).await;
        controller.move_indefinitely(Orientation::Plus).await.unwrap();
        assert!(controller.is_moving());
        assert_eq!(controller.slew_rate(), 2.);

        time::sleep(Duration::from_secs(3)).await;
        assert_float_absolute_eq!(controller.position(), 6., 1E-9);
        // Not a timed move
        assert!(controller.wait_for_move_end().await.is_completed());
        assert!(controller.is_moving());

        controller.stop().await;
        assert!(!controller.is_moving());
        assert_eq!(device.history(), vec!["RA0", "RA+", "RA0"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_move_stops_itself() {
        let (controller, device) = create_controller(Axis::RightAscension, RATES, false).await;
        controller
            .move_for(Duration::from_secs(2), Orientation::Minus)
            .await
            .unwrap();
        assert!(controller.is_moving());
        assert_eq!(controller.slew_rate(), -1.);

        time::sleep(Duration::from_secs(3)).await;
        assert!(!controller.is_moving());
        assert_float_absolute_eq!(controller.position(), -2., 1E-9);
        assert_eq!(device.history(), vec!["RA0", "RA-", "RA0"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_synchronous_move() {
        let (controller, _device) = create_controller(Axis::Declination, RATES, false).await;
        let start = Instant::now();
        controller
            .move_axis(
                Some(Duration::from_millis(1500)),
                Orientation::Plus,
                MoveMode::Synchronous,
            )
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1500));
        assert!(!controller.is_moving());
        assert_float_absolute_eq!(controller.position(), 3., 1E-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_move_cancels_pending_stop() {
        let (controller, device) = create_controller(Axis::RightAscension, RATES, false).await;
        controller
            .move_for(Duration::from_secs(5), Orientation::Plus)
            .await
            .unwrap();
        time::sleep(Duration::from_secs(1)).await;

        controller.move_indefinitely(Orientation::Minus).await.unwrap();
        // Well past the deadline of the first move
        time::sleep(Duration::from_secs(10)).await;

        assert!(controller.is_moving());
        assert_eq!(controller.slew_rate(), -1.);
        assert_float_absolute_eq!(controller.position(), 2. - 10., 1E-9);
        assert_eq!(device.history(), vec!["RA0", "RA+", "RA0", "RA-"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_races_pending_stop() {
        let (controller, device) = create_controller(Axis::Declination, RATES, false).await;
        let controller = Arc::new(controller);
        controller
            .move_for(Duration::from_secs(60), Orientation::Plus)
            .await
            .unwrap();

        let stopper = {
            let controller = controller.clone();
            tokio::spawn(async move {
                time::sleep(Duration::from_millis(100)).await;
                controller.stop().await;
            })
        };
        assert!(controller.wait_for_move_end().await.is_aborted());
        stopper.await.unwrap();

        controller
            .move_for(Duration::from_secs(1), Orientation::Minus)
            .await
            .unwrap();
        time::sleep(Duration::from_secs(120)).await;

        assert!(!controller.is_moving());
        assert_float_absolute_eq!(controller.position(), 0.2 - 1., 1E-9);
        assert_eq!(
            device.history(),
            vec!["DEC0", "DEC+", "DEC0", "DEC0", "DEC-", "DEC0"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_synchronous_move_can_be_stopped() {
        let (controller, _device) = create_controller(Axis::Declination, RATES, false).await;
        let controller = Arc::new(controller);
        let mover = {
            let controller = controller.clone();
            tokio::spawn(async move {
                controller
                    .move_axis(
                        Some(Duration::from_secs(30)),
                        Orientation::Plus,
                        MoveMode::Synchronous,
                    )
                    .await
            })
        };
        time::sleep(Duration::from_secs(2)).await;
        controller.stop().await;
        mover.await.unwrap().unwrap();
        assert_float_absolute_eq!(controller.position(), 4., 1E-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_inverted_hardware() {
        let (controller, device) = create_controller(Axis::Declination, RATES, true).await;
        controller.move_indefinitely(Orientation::Plus).await.unwrap();
        // Hardware moves the other way at its minus rate, tracking stays logical
        assert_eq!(controller.slew_rate(), 1.);
        time::sleep(Duration::from_secs(2)).await;
        controller.stop().await;
        assert_float_absolute_eq!(controller.position(), 2., 1E-9);

        controller.move_indefinitely(Orientation::Minus).await.unwrap();
        assert_eq!(controller.slew_rate(), -2.);
        controller.stop().await;
        assert_eq!(
            device.history(),
            vec!["DEC0", "DEC-", "DEC0", "DEC0", "DEC+", "DEC0"]
        );
    }

    #[tokio::test]
    async fn test_duration_for_delta() {
        let rates = AxisRates {
            plus: 2.,
            minus: 2.,
        };
        for inverted in [false, true] {
            let (controller, _device) = create_controller(Axis::RightAscension, rates, inverted).await;
            let (orientation, duration) = controller.duration_for_delta(10.).unwrap();
            assert_eq!(orientation, Orientation::Plus);
            assert_eq!(duration, Duration::from_secs(5));

            let (orientation, duration) = controller.duration_for_delta(-3.).unwrap();
            assert_eq!(orientation, Orientation::Minus);
            assert_eq!(duration, Duration::from_millis(1500));
        }

        let (controller, _device) = create_controller(Axis::RightAscension, RATES, true).await;
        // Plus runs the hardware in its minus orientation
        let (_, duration) = controller.duration_for_delta(4.).unwrap();
        assert_eq!(duration, Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_by() {
        let (controller, _device) = create_controller(Axis::RightAscension, RATES, false).await;
        controller.move_by(10.).await.unwrap();
        assert!(controller.is_moving());
        assert!(controller.wait_for_move_end().await.is_completed());
        assert_float_absolute_eq!(controller.position(), 10., 1E-9);

        controller.move_by(-2.5).await.unwrap();
        controller.wait_for_move_end().await;
        assert_float_absolute_eq!(controller.position(), 7.5, 1E-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_by_stops_where_the_estimate_arrives() {
        let (controller, device) = create_controller(Axis::Declination, RATES, false).await;
        controller.move_by(10.).await.unwrap();
        time::sleep(Duration::from_secs(6)).await;
        assert!(!controller.is_moving());
        assert_float_absolute_eq!(controller.position(), 10., 1E-9);

        time::sleep(Duration::from_secs(5)).await;
        assert_float_absolute_eq!(controller.position(), 10., 1E-9);
        assert_eq!(device.history(), vec!["DEC0", "DEC+", "DEC0"]);
    }

    #[tokio::test]
    async fn test_unreachable_deadline_is_rejected() {
        let (controller, device) = create_controller(Axis::Declination, RATES, false).await;
        let err = controller
            .move_for(Duration::MAX, Orientation::Plus)
            .await
            .unwrap_err();
        assert_eq!(err.error_type, ErrorType::InvalidValue);
        assert!(!controller.is_moving());
        assert!(device.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_pending_timed_move() {
        let (controller, device) = create_controller(Axis::Declination, RATES, false).await;
        controller
            .move_for(Duration::from_secs(1), Orientation::Plus)
            .await
            .unwrap();
        drop(controller);

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(device.history(), vec!["DEC0", "DEC+", "DEC0"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_indefinite_move() {
        let (controller, device) = create_controller(Axis::RightAscension, RATES, false).await;
        controller.move_indefinitely(Orientation::Minus).await.unwrap();
        drop(controller);

        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(device.history(), vec!["RA0", "RA-", "RA0"]);

        // A stationary axis sends nothing
        let (controller, device) = create_controller(Axis::RightAscension, RATES, false).await;
        drop(controller);
        time::sleep(Duration::from_millis(10)).await;
        assert!(device.history().is_empty());
    }

    #[tokio::test]
    async fn test_zero_rate_is_configuration_error() {
        let rates = AxisRates {
            plus: 0.,
            minus: 1.,
        };
        let (controller, device) = create_controller(Axis::Declination, rates, false).await;
        let err = controller.move_by(3.).await.unwrap_err();
        assert_eq!(err.error_type, ErrorType::Configuration);
        assert!(!controller.is_moving());
        assert!(device.history().is_empty());

        // Nothing to divide for a zero distance
        controller.move_by(0.).await.unwrap();
        assert!(!controller.is_moving());
    }

    #[tokio::test]
    async fn test_zero_duration_only_stops() {
        let (controller, device) = create_controller(Axis::RightAscension, RATES, false).await;
        controller.move_indefinitely(Orientation::Plus).await.unwrap();
        controller
            .move_for(Duration::ZERO, Orientation::Minus)
            .await
            .unwrap();
        assert!(!controller.is_moving());
        assert_eq!(device.history(), vec!["RA0", "RA+", "RA0"]);
    }

    #[tokio::test]
    async fn test_move_while_disconnected() {
        let (controller, device) = create_controller(Axis::RightAscension, RATES, false).await;
        device.disconnect().await.unwrap();
        let err = controller
            .move_indefinitely(Orientation::Plus)
            .await
            .unwrap_err();
        assert_eq!(err.error_type, ErrorType::NotConnected);
        assert!(!controller.is_moving());
        assert_eq!(controller.position(), 0.);

        // Stopping is always allowed
        controller.stop().await;
        controller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_hardware_failure_keeps_tracking_consistent() {
        let (controller, device) = create_controller(Axis::RightAscension, RATES, false).await;
        device.set_failing(true);
        let err = controller
            .move_indefinitely(Orientation::Plus)
            .await
            .unwrap_err();
        assert_eq!(err.error_type, ErrorType::Communication);
        assert!(!controller.is_moving());

        device.set_failing(false);
        controller
            .move_for(Duration::from_secs(1), Orientation::Plus)
            .await
            .unwrap();
        device.set_failing(true);
        // The background stop fails on the wire but tracking still ends
        controller.wait_for_move_end().await;
        assert!(!controller.is_moving());
        assert_float_absolute_eq!(controller.position(), 2., 1E-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_position() {
        let (controller, _device) = create_controller(Axis::Declination, RATES, false).await;
        controller.set_position(45.).unwrap();
        assert_eq!(controller.position(), 45.);

        controller.move_indefinitely(Orientation::Minus).await.unwrap();
        assert!(controller.set_position(0.).is_err());
        controller.stop().await;
        assert_float_absolute_eq!(controller.position(), 45., 1E-9);
    }
}
