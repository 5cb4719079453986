use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use crate::orbit::error::OrbitError;
use crate::orbit::sun::is_sunlit;
use crate::orbit::types::PositionSample;

// WGS-84
pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.137;
pub const EARTH_ECCENTRICITY_SQ: f64 = 0.006_694_379_990_14;

const GEODETIC_ITERATIONS: usize = 6;

/// Propagate to `timestamp` and reduce to the geodetic sub-point.
pub fn propagate_subpoint(
    elements: &Elements,
    constants: &Constants,
    timestamp: DateTime<Utc>,
) -> Result<PositionSample, OrbitError> {
    let minutes = elements
        .datetime_to_minutes_since_epoch(&timestamp.naive_utc())
        .map_err(|e| OrbitError::Propagation(e.to_string()))?;

    let prediction = constants
        .propagate(minutes)
        .map_err(|e| OrbitError::Propagation(e.to_string()))?;

    let sidereal =
        sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&timestamp.naive_utc()));

    let ecef = teme_to_ecef_position(prediction.position, sidereal);
    let (latitude_deg, longitude_deg, elevation_km) = ecef_to_geodetic(ecef);

    Ok(PositionSample {
        timestamp,
        latitude_deg,
        longitude_deg,
        elevation_km,
        sunlit: is_sunlit(prediction.position, timestamp),
    })
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

/// ECEF (km) to geodetic latitude/longitude in degrees and height in km.
pub fn ecef_to_geodetic(ecef: [f64; 3]) -> (f64, f64, f64) {
    let [x, y, z] = ecef;
    let a = EARTH_EQUATORIAL_RADIUS_KM;
    let e2 = EARTH_ECCENTRICITY_SQ;

    let lon = y.atan2(x);
    let p = (x * x + y * y).sqrt();

    let mut lat = z.atan2(p * (1.0 - e2));
    let mut height = 0.0;
    for _ in 0..GEODETIC_ITERATIONS {
        let sin_lat = lat.sin();
        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        height = if lat.cos().abs() > 1e-12 {
            p / lat.cos() - n
        } else {
            z.abs() - n * (1.0 - e2)
        };
        lat = z.atan2(p * (1.0 - e2 * n / (n + height)));
    }

    (lat.to_degrees(), lon.to_degrees(), height)
}
