use std::sync::Arc;

use async_trait::async_trait;

pub use arduino::ArduinoDeviceController;
pub use dummy::DummyDeviceController;

use crate::config::{Config, DeviceType};
use crate::util::*;

mod arduino;
pub mod consts;
mod dummy;

/// Command interface of the hardware that starts and stops the axes.
///
/// The hardware has no position feedback: it can only be told to move an axis
/// in one direction at its fixed rate, or to stop it.
#[async_trait]
pub trait DeviceController: Send + Sync {
    /// Connecting while connected does nothing
    async fn connect(&self) -> DriverResult<()>;

    async fn disconnect(&self) -> DriverResult<()>;

    fn is_connected(&self) -> bool;

    /// Starts moving `axis` in `orientation`, or stops it for `None`.
    /// Silently does nothing while disconnected.
    async fn move_axis(&self, axis: Axis, orientation: Option<Orientation>) -> DriverResult<()>;

    /// Sends a raw command and returns the raw response
    async fn command_string(&self, command: &str) -> DriverResult<String>;

    /// Sends a raw command, true if the device acknowledged it
    async fn command_bool(&self, command: &str) -> DriverResult<bool> {
        Ok(self.command_string(command).await? == consts::RESPONSE_OK)
    }

    /// Sends a raw command and ignores the response
    async fn command_blind(&self, command: &str) -> DriverResult<()> {
        self.command_string(command).await.map(|_| ())
    }
}

/// Command understood by the controller firmware, e.g. `RA+` or `DEC0`
pub fn axis_command(axis: Axis, orientation: Option<Orientation>) -> String {
    let sign = orientation.map_or('0', |o| o.wire_sign());
    format!("{}{}", axis.wire_name(), sign)
}

pub fn create_device(config: &Config) -> Arc<dyn DeviceController> {
    match config.device {
        DeviceType::Arduino => Arc::new(ArduinoDeviceController::new(config.com_settings.clone())),
        DeviceType::Dummy => Arc::new(DummyDeviceController::new()),
    }
}
