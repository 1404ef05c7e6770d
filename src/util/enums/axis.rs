use std::fmt::{Display, Formatter};

/// One of the two independently driven axes of the mount
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone)]
pub enum Axis {
    RightAscension,
    Declination,
}

impl Axis {
    /// Name used by the controller firmware for this axis
    pub fn wire_name(&self) -> &'static str {
        match self {
            Axis::RightAscension => "RA",
            Axis::Declination => "DEC",
        }
    }
}

impl Display for Axis {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}
