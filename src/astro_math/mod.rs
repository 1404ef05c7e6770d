use chrono::{Datelike, Timelike};
use polynomials::poly;
use std::f64::consts::TAU;

pub type Hours = f64;
pub type Degrees = f64;
pub type Radians = f64;

/// Sidereal rate expressed in degrees of declination per second
pub const DEGREES_PER_SECOND: Degrees = 360. / (24. * 3600.);
/// Sidereal rate expressed in hours of right ascension per second
pub const RA_PER_SECOND: Hours = 1. / 3600.;

pub fn rad_to_hours(rad: Radians) -> Hours {
    12. * rad / std::f64::consts::PI
}

pub fn deg_to_hours(deg: Degrees) -> Hours {
    deg / 15.
}

pub fn hours_to_deg(hours: Hours) -> Degrees {
    hours * 15.
}

// Convert hms to hours or dms to degrees
pub fn ms_to_dec(d: u32, minutes: u32, seconds: f64) -> f64 {
    (d as f64) + (minutes as f64) / 60. + seconds / 3600.
}

/// Always in [0, base) for a positive base
pub fn modulo(val: f64, base: f64) -> f64 {
    ((val % base) + base) % base
}

/// Calculates the Julian Date of a time
/// see https://scienceworld.wolfram.com/astronomy/JulianDate.html
fn calc_jd(time: chrono::DateTime<chrono::Utc>) -> f64 {
    let y = time.year() as f64;
    let m = time.month() as f64;
    let d = time.day() as f64;

    let mut jd = 367. * y;
    jd -= f64::floor(7. * (y + f64::floor((m + 9.) / 12.)) / 4.);
    jd -= f64::floor(3. * (f64::floor((y + (m - 9.) / 7.) / 100.) + 1.) / 4.);
    jd += f64::floor(275. * m / 9.);
    jd += d;
    jd += 1721028.5;
    jd + ms_to_dec(time.hour(), time.minute(), time.second() as f64) / 24.
}

// see https://thecynster.home.blog/2019/11/04/calculating-sidereal-time/
pub fn calculate_greenwich_sidereal_time(time: chrono::DateTime<chrono::Utc>) -> Hours {
    // Off by the leap seconds added after 2017
    const LEAP_SECOND_TOTAL: u32 = 27;

    let jd_utc = calc_jd(time);

    let du = jd_utc - 2451545.0;
    let theta = rad_to_hours(modulo(
        TAU * (0.779_057_273_264f64 + 1.002_737_811_911_354_5f64 * du),
        TAU,
    ));

    let precession = poly![
        0.014506,
        4612.156534,
        1.3915817,
        -0.00000044,
        -0.000029956,
        -0.0000000368,
    ];
    let jd_tt = jd_utc + ((LEAP_SECOND_TOTAL as f64 + 32.184) / 3600.) / 24.;
    let t = (jd_tt - 2451545.0) / 36525.; // centuries

    let gmstp = match precession.eval(t) {
        Some(arcseconds) => deg_to_hours(modulo(arcseconds / 3600., 360.)),
        None => 0.,
    };

    modulo(theta + gmstp, 24.)
}
