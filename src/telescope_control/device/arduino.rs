use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serialport::{DataBits, Parity, SerialPort, StopBits};
use tokio::task;

use super::consts::*;
use super::{axis_command, DeviceController};
use crate::config::ComSettings;
use crate::util::*;

type PortSlot = Arc<Mutex<Option<Box<dyn SerialPort>>>>;

/// ST4 relay board driven by an Arduino over a serial line
pub struct ArduinoDeviceController {
    settings: ComSettings,
    port: PortSlot,
    connected: AtomicBool,
}

fn join_error(e: task::JoinError) -> DriverError {
    DriverError::communication(format!("Serial task failed: {}", e))
}

fn frame_command(command: &str) -> String {
    format!("{}{}", command, TERMINATOR)
}

/// Reads up to the terminator and strips line breaks
fn read_response<P: Read + ?Sized>(port: &mut P) -> DriverResult<String> {
    let mut raw = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        port.read_exact(&mut byte)?;
        if byte[0] == TERMINATOR as u8 {
            break;
        }
        raw.push(byte[0]);
    }

    let response: String = String::from_utf8_lossy(&raw)
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n'))
        .collect();
    tracing::debug!(%response, "Received response");
    Ok(response)
}

fn exchange<P: Read + Write + ?Sized>(port: &mut P, command: &str) -> DriverResult<String> {
    tracing::debug!(command, "Sending command");
    port.write_all(frame_command(command).as_bytes())?;
    port.flush()?;
    read_response(port)
}

impl ArduinoDeviceController {
    pub fn new(settings: ComSettings) -> Self {
        Self {
            settings,
            port: Arc::new(Mutex::new(None)),
            connected: AtomicBool::new(false),
        }
    }

    fn determine_serial_port() -> DriverResult<String> {
        let available_ports = serialport::available_ports()?;

        let port = available_ports.into_iter().find(|p| {
            matches!(
                &p.port_type,
                serialport::SerialPortType::UsbPort(i) if ARDUINO_VENDOR_IDS.contains(&i.vid)
            )
        });

        match port {
            Some(port) => Ok(port.port_name),
            None => Err(DriverError::not_connected("Arduino serial port not found")),
        }
    }

    /// Run an exchange on the open port.
    /// On failure, it is retried up to a set number of tries, so it must be idempotent.
    async fn do_command_with_retries(&self, command: String) -> DriverResult<String> {
        let port = self.port.clone();
        task::spawn_blocking(move || {
            let mut lock = port.lock().unwrap_or_else(PoisonError::into_inner);
            let port = lock
                .as_mut()
                .ok_or_else(|| DriverError::not_connected("Serial port is closed"))?;

            let result = retry::retry_with_index(
                retry::delay::Exponential::from_millis(RETRY_MILLIS).take(NUM_TRIES - 1),
                |try_no| {
                    let r = exchange(port.as_mut(), &command);
                    if let Err(e) = &r {
                        if (try_no as usize) < NUM_TRIES {
                            tracing::warn!("Error sending {} to device: {} -- Retrying", command, e);
                        }
                    }
                    r
                },
            );

            result.map_err(|e| match e {
                retry::Error::Operation { error, .. } => error,
                retry::Error::Internal(msg) => DriverError::communication(msg),
            })
        })
        .await
        .map_err(join_error)?
    }
}

#[async_trait]
impl DeviceController for ArduinoDeviceController {
    async fn connect(&self) -> DriverResult<()> {
        if self.is_connected() {
            return Ok(());
        }

        let path = match &self.settings.path {
            Some(path) => path.clone(),
            None => {
                let port = Self::determine_serial_port()?;
                tracing::warn!("Found Arduino serial port at {}", port);
                port
            }
        };
        tracing::info!(%path, "Connecting to device");

        let baud_rate = self.settings.baud_rate;
        let timeout = Duration::from_millis(self.settings.timeout_millis as u64);
        let (port, acknowledged) = task::spawn_blocking(move || -> DriverResult<_> {
            let mut port = serialport::new(path, baud_rate)
                .data_bits(DataBits::Eight)
                .parity(Parity::None)
                .stop_bits(StopBits::One)
                .timeout(timeout)
                .open()?;

            // The board announces itself once its firmware is up
            let initial_message = read_response(port.as_mut())?;
            tracing::debug!(%initial_message, "Device initialized");

            let acknowledged = exchange(port.as_mut(), CMD_CONNECT)? == RESPONSE_OK;
            Ok((port, acknowledged))
        })
        .await
        .map_err(join_error)??;

        if !acknowledged {
            // Dropping the port closes it
            drop(port);
            return Err(DriverError::not_connected("Device refused the connection"));
        }

        *self.port.lock().unwrap_or_else(PoisonError::into_inner) = Some(port);
        self.connected.store(true, Ordering::SeqCst);
        tracing::info!("Device connected");
        Ok(())
    }

    async fn disconnect(&self) -> DriverResult<()> {
        if !self.is_connected() {
            return Ok(());
        }

        if let Err(e) = self.do_command_with_retries(CMD_DISCONNECT.to_string()).await {
            tracing::warn!("Device did not acknowledge disconnect: {}", e);
        }
        self.connected.store(false, Ordering::SeqCst);
        self.port
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        tracing::info!("Device disconnected");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn move_axis(&self, axis: Axis, orientation: Option<Orientation>) -> DriverResult<()> {
        if !self.is_connected() {
            return Ok(());
        }

        let command = axis_command(axis, orientation);
        if self.command_bool(&command).await? {
            Ok(())
        } else {
            Err(DriverError::communication(format!(
                "Device did not acknowledge {}",
                command
            )))
        }
    }

    async fn command_string(&self, command: &str) -> DriverResult<String> {
        if !self.is_connected() {
            return Err(DriverError::not_connected("Device not connected"));
        }
        self.do_command_with_retries(command.to_string()).await
    }
}
