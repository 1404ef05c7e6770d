use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::consts::*;
use super::{axis_command, DeviceController};
use crate::util::*;

/// Device that drives nothing. Every command sent while connected is logged and
/// kept in a history, and it can be told to fail to simulate a broken link.
#[derive(Debug, Default)]
pub struct DummyDeviceController {
    connected: AtomicBool,
    failing: AtomicBool,
    history: Mutex<Vec<String>>,
}

impl DummyDeviceController {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every command fails with a communication error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Commands sent so far, oldest first
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear_history(&self) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn send(&self, command: &str) -> DriverResult<String> {
        tracing::debug!(command, "Dummy device received command");
        if self.failing.load(Ordering::SeqCst) {
            return Err(DriverError::communication(format!(
                "Dummy device failed to send {}",
                command
            )));
        }
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command.to_string());
        Ok(RESPONSE_OK.to_string())
    }
}

#[async_trait]
impl DeviceController for DummyDeviceController {
    async fn connect(&self) -> DriverResult<()> {
        if self.is_connected() {
            return Ok(());
        }
        self.send(CMD_CONNECT)?;
        self.connected.store(true, Ordering::SeqCst);
        tracing::info!("Dummy device connected");
        Ok(())
    }

    async fn disconnect(&self) -> DriverResult<()> {
        if !self.is_connected() {
            return Ok(());
        }
        self.connected.store(false, Ordering::SeqCst);
        tracing::info!("Dummy device disconnected");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn move_axis(&self, axis: Axis, orientation: Option<Orientation>) -> DriverResult<()> {
        if !self.is_connected() {
            return Ok(());
        }
        self.send(&axis_command(axis, orientation)).map(|_| ())
    }

    async fn command_string(&self, command: &str) -> DriverResult<String> {
        if !self.is_connected() {
            return Err(DriverError::not_connected("Dummy device not connected"));
        }
        self.send(command)?;
        Ok(String::new())
    }

    async fn command_bool(&self, command: &str) -> DriverResult<bool> {
        self.command_string(command).await.map(|_| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_moves_ignored_while_disconnected() {
        let device = DummyDeviceController::new();
        device
            .move_axis(Axis::RightAscension, Some(Orientation::Plus))
            .await
            .unwrap();
        assert!(device.history().is_empty());

        device.connect().await.unwrap();
        device
            .move_axis(Axis::RightAscension, Some(Orientation::Plus))
            .await
            .unwrap();
        device.move_axis(Axis::RightAscension, None).await.unwrap();
        assert_eq!(device.history(), vec!["CONNECT", "RA+", "RA0"]);
    }

    #[tokio::test]
    async fn test_raw_commands() {
        let device = DummyDeviceController::new();
        assert_eq!(
            device.command_bool("PING").await.unwrap_err().error_type,
            ErrorType::NotConnected
        );

        device.connect().await.unwrap();
        assert!(device.command_bool("PING").await.unwrap());
        assert_eq!(device.command_string("PING").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_failing() {
        let device = DummyDeviceController::new();
        device.connect().await.unwrap();
        device.set_failing(true);
        let err = device
            .move_axis(Axis::Declination, Some(Orientation::Minus))
            .await
            .unwrap_err();
        assert_eq!(err.error_type, ErrorType::Communication);
        assert_eq!(device.history(), vec!["CONNECT"]);
    }
}
