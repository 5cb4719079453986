use crate::sensors::error::SensorError;
use crate::sensors::types::{SensorSample, Vector3};
use crate::sensors::SensorSource;

/// Deterministic stand-in for the sensor board, used for bench runs.
///
/// Channels drift slowly around typical cabin values so logs look plausible.
#[derive(Debug, Default)]
pub struct SimulatedSensorBoard {
    tick: u64,
}

impl SimulatedSensorBoard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SensorSource for SimulatedSensorBoard {
    fn read(&mut self) -> Result<SensorSample, SensorError> {
        self.tick += 1;
        let t = self.tick as f64;
        let slow = (t / 240.0).sin();
        let fast = (t / 17.0).sin();

        let yaw = (t * 0.5).rem_euclid(360.0);
        let heading = yaw.to_radians();

        Ok(SensorSample {
            temperature: 27.5 + 1.5 * slow,
            temperature_from_pressure: 26.0 + 1.2 * slow,
            humidity: 42.0 + 3.0 * fast,
            pressure: 1013.25 + 2.0 * slow,
            accel: Vector3::new(0.002 * fast, -0.001 * slow, 0.015 + 0.003 * fast),
            compass_heading: yaw,
            compass_raw: Vector3::new(30.0 * heading.cos(), -30.0 * heading.sin(), -45.0),
            pitch: (1.5 * fast).rem_euclid(360.0),
            roll: (0.8 * slow).rem_euclid(360.0),
            yaw,
        })
    }
}
