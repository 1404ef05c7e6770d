use crate::telescope_control::Telescope;
use crate::util::*;

impl Telescope {
    pub async fn is_connected(&self) -> bool {
        self.device.is_connected()
    }

    /// Connects to the device. Does nothing when already connected.
    pub async fn connect(&self) -> DriverResult<()> {
        if self.device.is_connected() {
            return Ok(());
        }
        self.device.connect().await?;
        tracing::info!("Telescope connected");
        Ok(())
    }

    /// Stops both axes, then disconnects
    pub async fn disconnect(&self) -> DriverResult<()> {
        if !self.device.is_connected() {
            return Ok(());
        }
        self.planner.abort_all().await;
        self.device.disconnect().await?;
        tracing::info!("Telescope disconnected");
        Ok(())
    }

    fn check_connected(&self) -> DriverResult<()> {
        if self.device.is_connected() {
            Ok(())
        } else {
            Err(DriverError::not_connected("Telescope not connected"))
        }
    }

    /// Transmits an arbitrary string to the device and does not wait for a response
    pub async fn command_blind(&self, command: &str) -> DriverResult<()> {
        self.check_connected()?;
        self.device.command_blind(command).await
    }

    /// Transmits an arbitrary string to the device and waits for a boolean response
    pub async fn command_bool(&self, command: &str) -> DriverResult<bool> {
        self.check_connected()?;
        self.device.command_bool(command).await
    }

    /// Transmits an arbitrary string to the device and waits for a string response
    pub async fn command_string(&self, command: &str) -> DriverResult<String> {
        self.check_connected()?;
        self.device.command_string(command).await
    }

    /// Stops everything and lets go of the device. Works while the device is unreachable.
    pub async fn shutdown(&self) -> DriverResult<()> {
        self.ra_axis.shutdown().await;
        self.dec_axis.shutdown().await;
        if let Err(e) = self.device.disconnect().await {
            tracing::warn!("Failed to disconnect during shutdown: {}", e);
        }
        tracing::info!("Telescope shut down");
        Ok(())
    }
}
