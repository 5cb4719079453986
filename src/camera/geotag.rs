//! GPS EXIF encoding of the station sub-point.

use std::fmt;

/// An unsigned angle split into whole degrees, whole minutes and tenths of
/// an arc-second, the three rationals EXIF uses for GPS coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExifAngle {
    pub degrees: u32,
    pub minutes: u32,
    pub tenths_of_seconds: u32,
}

impl ExifAngle {
    /// Encode `|angle_deg|`. Degrees and minutes are truncated; seconds are
    /// rounded to 0.1", carrying into minutes and degrees at 60.
    pub fn from_degrees(angle_deg: f64) -> Self {
        let magnitude = angle_deg.abs();
        let degrees = magnitude.trunc();
        let minutes_full = (magnitude - degrees) * 60.0;
        let minutes = minutes_full.trunc();
        let seconds = (minutes_full - minutes) * 60.0;

        let mut degrees = degrees as u32;
        let mut minutes = minutes as u32;
        let mut tenths_of_seconds = (seconds * 10.0).round() as u32;

        if tenths_of_seconds >= 600 {
            tenths_of_seconds -= 600;
            minutes += 1;
        }
        if minutes >= 60 {
            minutes -= 60;
            degrees += 1;
        }

        Self {
            degrees,
            minutes,
            tenths_of_seconds,
        }
    }

    pub fn to_degrees(self) -> f64 {
        f64::from(self.degrees)
            + f64::from(self.minutes) / 60.0
            + f64::from(self.tenths_of_seconds) / 36_000.0
    }
}

impl fmt::Display for ExifAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/1,{}/1,{}/10",
            self.degrees, self.minutes, self.tenths_of_seconds
        )
    }
}

/// Convert a signed decimal angle to `(is_negative, "D/1,M/1,S/10")`.
pub fn convert(angle_deg: f64) -> (bool, String) {
    (angle_deg < 0.0, ExifAngle::from_degrees(angle_deg).to_string())
}

/// Geotag for the next capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoTag {
    pub latitude: ExifAngle,
    pub latitude_ref: char,
    pub longitude: ExifAngle,
    pub longitude_ref: char,
}

impl GeoTag {
    pub fn from_coordinates(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude: ExifAngle::from_degrees(latitude_deg),
            latitude_ref: if latitude_deg < 0.0 { 'S' } else { 'N' },
            longitude: ExifAngle::from_degrees(longitude_deg),
            longitude_ref: if longitude_deg < 0.0 { 'W' } else { 'E' },
        }
    }

    /// Tag names and values in the `IFD.Tag` form understood by the camera
    /// tools.
    pub fn exif_tags(&self) -> [(&'static str, String); 4] {
        [
            ("GPS.GPSLatitude", self.latitude.to_string()),
            ("GPS.GPSLatitudeRef", self.latitude_ref.to_string()),
            ("GPS.GPSLongitude", self.longitude.to_string()),
            ("GPS.GPSLongitudeRef", self.longitude_ref.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Half a tenth of an arc-second, plus float slack.
    const TOLERANCE_DEG: f64 = 0.05 / 3600.0 + 1e-12;

    #[test]
    fn encodes_known_angles() {
        assert_eq!(convert(47.0725), (false, "47/1,4/1,210/10".to_string()));
        assert_eq!(convert(-21.5), (true, "21/1,30/1,0/10".to_string()));
        assert_eq!(convert(0.0), (false, "0/1,0/1,0/10".to_string()));
        assert_eq!(convert(-179.999_999), (true, "180/1,0/1,0/10".to_string()));
    }

    #[test]
    fn sign_flag_matches_input() {
        for d in [-90.0, -0.000_01, 0.0, 0.000_01, 51.6, 179.9] {
            assert_eq!(convert(d).0, d < 0.0);
        }
    }

    #[test]
    fn decoding_stays_within_rounding_precision() {
        let mut d = -180.0;
        while d <= 180.0 {
            let angle = ExifAngle::from_degrees(d);
            assert!(
                (angle.to_degrees() - d.abs()).abs() <= TOLERANCE_DEG,
                "{} -> {}",
                d,
                angle
            );
            assert!(angle.minutes < 60);
            assert!(angle.tenths_of_seconds < 600);
            d += 0.123_457;
        }
    }

    #[test]
    fn conversion_is_reproducible() {
        for d in [12.345_678, -0.7, 33.333_333_3] {
            assert_eq!(convert(d), convert(d));
        }
    }

    #[test]
    fn hemisphere_refs() {
        let tag = GeoTag::from_coordinates(-33.9, 151.2);
        assert_eq!(tag.latitude_ref, 'S');
        assert_eq!(tag.longitude_ref, 'E');

        let tag = GeoTag::from_coordinates(47.07, -21.93);
        assert_eq!(tag.latitude_ref, 'N');
        assert_eq!(tag.longitude_ref, 'W');
        assert_eq!(tag.exif_tags()[3], ("GPS.GPSLongitudeRef", "W".to_string()));
    }
}
