//! Solar illumination of an orbiting body.
//!
//! The Sun direction comes from the low-precision series of the Astronomical
//! Almanac (about 0.01 degree between 1950 and 2050), which is plenty for an
//! umbra test. Earth's shadow is modelled as a cylinder of one equatorial
//! radius extending away from the Sun.

use chrono::{DateTime, Utc};

use crate::orbit::propagation::EARTH_EQUATORIAL_RADIUS_KM;

const JULIAN_DATE_UNIX_EPOCH: f64 = 2_440_587.5;
const JULIAN_DATE_J2000: f64 = 2_451_545.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

pub fn julian_date(timestamp: DateTime<Utc>) -> f64 {
    let seconds =
        timestamp.timestamp() as f64 + f64::from(timestamp.timestamp_subsec_nanos()) * 1e-9;
    JULIAN_DATE_UNIX_EPOCH + seconds / SECONDS_PER_DAY
}

/// Unit vector towards the Sun in the equatorial frame of date.
pub fn sun_direction(timestamp: DateTime<Utc>) -> [f64; 3] {
    let n = julian_date(timestamp) - JULIAN_DATE_J2000;

    let mean_longitude = (280.460 + 0.985_647_4 * n).rem_euclid(360.0);
    let mean_anomaly = (357.528 + 0.985_600_3 * n).rem_euclid(360.0).to_radians();
    let ecliptic_longitude = (mean_longitude
        + 1.915 * mean_anomaly.sin()
        + 0.020 * (2.0 * mean_anomaly).sin())
    .to_radians();
    let obliquity = (23.439 - 0.000_000_4 * n).to_radians();

    [
        ecliptic_longitude.cos(),
        obliquity.cos() * ecliptic_longitude.sin(),
        obliquity.sin() * ecliptic_longitude.sin(),
    ]
}

/// True when a body at `position_km` (TEME) is outside Earth's shadow.
pub fn is_sunlit(position_km: [f64; 3], timestamp: DateTime<Utc>) -> bool {
    let sun = sun_direction(timestamp);
    let along = position_km[0] * sun[0] + position_km[1] * sun[1] + position_km[2] * sun[2];
    if along >= 0.0 {
        return true;
    }

    let perpendicular = [
        position_km[0] - along * sun[0],
        position_km[1] - along * sun[1],
        position_km[2] - along * sun[2],
    ];
    let distance = (perpendicular[0] * perpendicular[0]
        + perpendicular[1] * perpendicular[1]
        + perpendicular[2] * perpendicular[2])
        .sqrt();

    distance > EARTH_EQUATORIAL_RADIUS_KM
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;

    #[test]
    fn julian_date_of_j2000() {
        let j2000 = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert_abs_diff_eq!(julian_date(j2000), JULIAN_DATE_J2000, epsilon = 1e-9);
    }

    #[test]
    fn sun_sits_on_the_equinox_in_march() {
        let equinox = Utc.with_ymd_and_hms(2022, 3, 20, 15, 33, 0).unwrap();
        let sun = sun_direction(equinox);
        assert_abs_diff_eq!(sun[0], 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(sun[2], 0.0, epsilon = 1e-3);
    }

    #[test]
    fn sun_is_north_in_june_solstice() {
        let solstice = Utc.with_ymd_and_hms(2022, 6, 21, 9, 14, 0).unwrap();
        let sun = sun_direction(solstice);
        let declination = sun[2].asin().to_degrees();
        assert_abs_diff_eq!(declination, 23.44, epsilon = 0.05);
    }

    #[test]
    fn shadow_is_behind_the_earth() {
        let at = Utc.with_ymd_and_hms(2022, 3, 20, 15, 33, 0).unwrap();
        let sun = sun_direction(at);
        let r = EARTH_EQUATORIAL_RADIUS_KM + 420.0;

        let day_side = [sun[0] * r, sun[1] * r, sun[2] * r];
        let night_side = [-sun[0] * r, -sun[1] * r, -sun[2] * r];
        // Above the pole, out of the shadow cylinder.
        let terminator = [0.0, 0.0, r];

        assert!(is_sunlit(day_side, at));
        assert!(!is_sunlit(night_side, at));
        assert!(is_sunlit(terminator, at));
    }
}
