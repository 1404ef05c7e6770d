use num_enum::IntoPrimitive;

#[derive(Debug, Eq, PartialEq, Copy, Clone, IntoPrimitive)]
#[repr(u8)]
pub enum AlignmentMode {
    /// Altitude-Azimuth alignment
    AltAz = 0,
    /// Polar (equatorial) mount other than German equatorial
    Polar = 1,
    /// German equatorial mount
    GermanPolar = 2,
}
