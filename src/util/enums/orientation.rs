use std::fmt::{Display, Formatter};

use Orientation::{Minus, Plus};

/// Direction of a move along an axis
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Orientation {
    Plus,
    Minus,
}

impl Orientation {
    pub fn invert(self) -> Self {
        match self {
            Plus => Minus,
            Minus => Plus,
        }
    }

    /// Inverts only when `invert` is set, used to map a logical orientation onto
    /// hardware that is mounted reversed
    pub fn invert_if(self, invert: bool) -> Self {
        if invert {
            self.invert()
        } else {
            self
        }
    }

    /// A zero rate maps to Minus
    pub fn from_signed_rate(rate: f64) -> Self {
        if 0. < rate {
            Plus
        } else {
            Minus
        }
    }

    pub fn get_sign_f64(&self) -> f64 {
        match self {
            Plus => 1.,
            Minus => -1.,
        }
    }

    /// Sign character sent to the controller
    pub fn wire_sign(&self) -> char {
        match self {
            Plus => '+',
            Minus => '-',
        }
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Plus => write!(f, "PLUS"),
            Minus => write!(f, "MINUS"),
        }
    }
}
