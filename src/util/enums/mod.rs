pub mod alignment_mode;
pub mod axis;
pub mod guide_direction;
pub mod move_mode;
pub mod orientation;
pub mod tracking_rate;

pub use alignment_mode::*;
pub use axis::*;
pub use guide_direction::*;
pub use move_mode::*;
pub use orientation::*;
pub use tracking_rate::*;

pub use crate::astro_math::{Degrees, Hours};
