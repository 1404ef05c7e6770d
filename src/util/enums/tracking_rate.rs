use num_enum::IntoPrimitive;

#[derive(Debug, Eq, PartialEq, Copy, Clone, IntoPrimitive)]
#[repr(u8)]
pub enum TrackingRate {
    Sidereal = 0,
    Lunar = 1,
    Solar = 2,
    King = 3,
}
