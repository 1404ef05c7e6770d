use std::fmt::Formatter;
use std::str::FromStr;

use super::{Axis, Orientation};

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum GuideDirection {
    North,
    South,
    East,
    West,
}

impl core::fmt::Display for GuideDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GuideDirection::North => write!(f, "North"),
            GuideDirection::South => write!(f, "South"),
            GuideDirection::East => write!(f, "East"),
            GuideDirection::West => write!(f, "West"),
        }
    }
}

impl FromStr for GuideDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "n" | "north" => Ok(GuideDirection::North),
            "s" | "south" => Ok(GuideDirection::South),
            "e" | "east" => Ok(GuideDirection::East),
            "w" | "west" => Ok(GuideDirection::West),
            _ => Err(format!("Unknown guide direction {}", s)),
        }
    }
}

impl GuideDirection {
    /// The axis and logical orientation a pulse in this direction moves
    pub fn axis_orientation(&self) -> (Axis, Orientation) {
        match self {
            GuideDirection::East => (Axis::RightAscension, Orientation::Plus),
            GuideDirection::West => (Axis::RightAscension, Orientation::Minus),
            GuideDirection::North => (Axis::Declination, Orientation::Plus),
            GuideDirection::South => (Axis::Declination, Orientation::Minus),
        }
    }
}
