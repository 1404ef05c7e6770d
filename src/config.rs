use serde::{Deserialize, Serialize};

use crate::astro_math::{DEGREES_PER_SECOND, RA_PER_SECOND};

/* Config */
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub com_settings: ComSettings,
    pub device: DeviceType,
    pub slew_rates: SlewRateSettings,
    /// If false, the earth rotation is compensated in software while slewing in right ascension
    pub mount_compensates_earth_rotation_in_slew: bool,
    /// Declination hardware runs reversed, e.g. after a meridian flip
    pub meridian_flip: bool,
}

/* Serial Port Settings */
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComSettings {
    pub path: Option<String>, // None for automatic
    pub baud_rate: u32,
    pub timeout_millis: u32,
}

impl Default for ComSettings {
    fn default() -> Self {
        Self {
            path: None,
            baud_rate: 57_600,
            // The board can take several seconds to initialize after the port opens
            timeout_millis: 5_000,
        }
    }
}

#[derive(Default, Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum DeviceType {
    #[default]
    Arduino,
    Dummy,
}

/* Slew rates, as multiples of the sidereal rate */
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct SlewRateSettings {
    pub right_ascension_plus: f64,
    pub right_ascension_minus: f64,
    pub declination_plus: f64,
    pub declination_minus: f64,
}

impl Default for SlewRateSettings {
    fn default() -> Self {
        Self {
            right_ascension_plus: 8.,
            right_ascension_minus: 8.,
            declination_plus: 8.,
            declination_minus: 8.,
        }
    }
}

/// Unsigned rates of one axis, in axis units per second
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AxisRates {
    pub plus: f64,
    pub minus: f64,
}

impl Config {
    /// Right ascension rates in hours per second
    pub fn right_ascension_rates(&self) -> AxisRates {
        let mut plus = self.slew_rates.right_ascension_plus;
        let mut minus = self.slew_rates.right_ascension_minus;
        if !self.mount_compensates_earth_rotation_in_slew {
            // The sky keeps turning by one sidereal rate during the slew
            plus += 1.;
            minus -= 1.;
        }
        AxisRates {
            plus: plus * RA_PER_SECOND,
            minus: minus * RA_PER_SECOND,
        }
    }

    /// Declination rates in degrees per second
    pub fn declination_rates(&self) -> AxisRates {
        AxisRates {
            plus: self.slew_rates.declination_plus * DEGREES_PER_SECOND,
            minus: self.slew_rates.declination_minus * DEGREES_PER_SECOND,
        }
    }
}
