/// Decimal places kept for environmental, inertial and magnetic channels.
pub const CHANNEL_PRECISION: u32 = 3;
/// Decimal places kept for pitch, roll and yaw.
pub const ORIENTATION_PRECISION: u32 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn rounded(self, decimals: u32) -> Self {
        Self {
            x: round_to(self.x, decimals),
            y: round_to(self.y, decimals),
            z: round_to(self.z, decimals),
        }
    }
}

/// One reading of every channel on the sensor board.
///
/// Units: degrees Celsius, percent relative humidity, millibar, g for the
/// accelerometer, microtesla for the raw compass and degrees for headings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorSample {
    pub temperature: f64,
    pub temperature_from_pressure: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub accel: Vector3,
    pub compass_heading: f64,
    pub compass_raw: Vector3,
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
}

impl SensorSample {
    /// Apply the storage precision policy to every channel.
    pub fn rounded(self) -> Self {
        Self {
            temperature: round_to(self.temperature, CHANNEL_PRECISION),
            temperature_from_pressure: round_to(self.temperature_from_pressure, CHANNEL_PRECISION),
            humidity: round_to(self.humidity, CHANNEL_PRECISION),
            pressure: round_to(self.pressure, CHANNEL_PRECISION),
            accel: self.accel.rounded(CHANNEL_PRECISION),
            compass_heading: round_angle(self.compass_heading, CHANNEL_PRECISION),
            compass_raw: self.compass_raw.rounded(CHANNEL_PRECISION),
            pitch: round_angle(self.pitch, ORIENTATION_PRECISION),
            roll: round_angle(self.roll, ORIENTATION_PRECISION),
            yaw: round_angle(self.yaw, ORIENTATION_PRECISION),
        }
    }
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

// Angles stay in [0, 360) after rounding.
fn round_angle(value: f64, decimals: u32) -> f64 {
    let rounded = round_to(value, decimals);
    if rounded >= 360.0 {
        rounded - 360.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_policy_per_channel() {
        let raw = SensorSample {
            temperature: 27.123_456,
            temperature_from_pressure: 26.987_65,
            humidity: 41.000_49,
            pressure: 1012.345_67,
            accel: Vector3::new(0.012_345, -0.999_6, 0.000_4),
            compass_heading: 181.818_18,
            compass_raw: Vector3::new(12.345_6, -7.777_7, 0.5),
            pitch: 3.14159,
            roll: 359.996,
            yaw: 90.004_9,
        };

        let rounded = raw.rounded();
        assert_eq!(rounded.temperature, 27.123);
        assert_eq!(rounded.temperature_from_pressure, 26.988);
        assert_eq!(rounded.humidity, 41.0);
        assert_eq!(rounded.pressure, 1012.346);
        assert_eq!(rounded.accel, Vector3::new(0.012, -1.0, 0.0));
        assert_eq!(rounded.compass_heading, 181.818);
        assert_eq!(rounded.compass_raw, Vector3::new(12.346, -7.778, 0.5));
        assert_eq!(rounded.pitch, 3.14);
        assert_eq!(rounded.roll, 0.0);
        assert_eq!(rounded.yaw, 90.0);
    }

    #[test]
    fn angles_round_into_full_circle() {
        let rounded = SensorSample {
            compass_heading: 359.999_8,
            yaw: 359.996,
            pitch: 359.994,
            ..Default::default()
        }
        .rounded();
        assert_eq!(rounded.compass_heading, 0.0);
        assert_eq!(rounded.yaw, 0.0);
        assert_eq!(rounded.pitch, 359.99);
    }

    #[test]
    fn rounding_is_idempotent() {
        let once = SensorSample {
            pressure: 1000.123_456,
            pitch: 12.345_678,
            ..Default::default()
        }
        .rounded();
        assert_eq!(once.rounded(), once);
    }
}
