use crate::{Degrees, Hours};
use num_enum::IntoPrimitive;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::{fmt, io, result};

pub type DriverResult<T> = result::Result<T, DriverError>;

/// Error numbers follow the Alpaca/ASCOM conventions where one exists.
/// Driver specific failures live in the 0x500 range.
#[derive(Debug, Eq, PartialEq, Copy, Clone, IntoPrimitive)]
#[repr(u16)]
pub enum ErrorType {
    NotImplemented = 0x400,
    InvalidValue = 0x401,
    ValueNotSet = 0x402,
    NotConnected = 0x407,
    InvalidOperation = 0x40B,
    Configuration = 0x500,
    Communication = 0x501,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriverError {
    pub error_type: ErrorType,
    pub message: String,
}

impl DriverError {
    pub fn from_msg(error_type: ErrorType, message: impl Into<String>) -> Self {
        DriverError {
            error_type,
            message: message.into(),
        }
    }

    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::from_msg(ErrorType::InvalidValue, message)
    }

    pub fn value_not_set(message: impl Into<String>) -> Self {
        Self::from_msg(ErrorType::ValueNotSet, message)
    }

    pub fn not_connected(message: impl Into<String>) -> Self {
        Self::from_msg(ErrorType::NotConnected, message)
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::from_msg(ErrorType::InvalidOperation, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::from_msg(ErrorType::Configuration, message)
    }

    pub fn communication(message: impl Into<String>) -> Self {
        Self::from_msg(ErrorType::Communication, message)
    }

    pub fn error_number(&self) -> u16 {
        self.error_type.into()
    }
}

impl Display for DriverError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}: {}", self.error_number(), self.message)
    }
}

impl Error for DriverError {}

impl From<io::Error> for DriverError {
    fn from(e: io::Error) -> Self {
        Self::communication(e.to_string())
    }
}

impl From<serialport::Error> for DriverError {
    fn from(e: serialport::Error) -> Self {
        Self::communication(e.description)
    }
}

pub fn check_dec(dec: Degrees) -> DriverResult<()> {
    if (-90. ..=90.).contains(&dec) {
        Ok(())
    } else {
        Err(DriverError::invalid_value(format!(
            "Declination of {} is not valid, expected -90..90",
            dec
        )))
    }
}

pub fn check_ra(ra: Hours) -> DriverResult<()> {
    if (0. ..24.).contains(&ra) {
        Ok(())
    } else {
        Err(DriverError::invalid_value(format!(
            "Right Ascension of {} is not valid, expected 0..24",
            ra
        )))
    }
}
