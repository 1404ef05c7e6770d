pub use astro_math::{Degrees, Hours};
pub use config::Config;
pub use telescope_control::Telescope;

pub mod astro_math;
pub mod config;
pub mod telescope_control;
pub mod util;
