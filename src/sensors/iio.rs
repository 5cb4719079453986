//! Sensor board access through the Linux Industrial I/O sysfs interface.
//!
//! The Sense HAT drivers expose each chip as `/sys/bus/iio/devices/iio:deviceN`
//! with a `name` file and `in_<channel>_raw`, `_scale` and `_offset`
//! attributes. Processed value = (raw + offset) * scale.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SensorBoardConfig;
use crate::sensors::display::LedMatrix;
use crate::sensors::error::SensorError;
use crate::sensors::types::{SensorSample, Vector3};
use crate::sensors::SensorSource;

const STANDARD_GRAVITY: f64 = 9.806_65;
const GAUSS_TO_MICROTESLA: f64 = 100.0;
const KILOPASCAL_TO_MILLIBAR: f64 = 10.0;
const MILLI: f64 = 1e-3;

#[derive(Debug, Clone)]
pub struct IioDevice {
    name: String,
    path: PathBuf,
}

impl IioDevice {
    /// Find the device whose `name` attribute equals `name`.
    pub fn find(root: &Path, name: &str) -> Result<Self, SensorError> {
        let entries = fs::read_dir(root).map_err(|source| SensorError::Read {
            path: root.to_path_buf(),
            source,
        })?;

        for entry in entries.flatten() {
            let path = entry.path();
            let Ok(device_name) = fs::read_to_string(path.join("name")) else {
                continue;
            };
            if device_name.trim() == name {
                log::debug!("IIO device {} at {}", name, path.display());
                return Ok(Self {
                    name: name.to_string(),
                    path,
                });
            }
        }

        Err(SensorError::DeviceNotFound(name.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read a processed channel value, e.g. `temp` or `accel_x`.
    pub fn channel(&self, channel: &str) -> Result<f64, SensorError> {
        let raw = self.read_number(&format!("in_{}_raw", channel))?;
        let offset = self.channel_attribute(channel, "offset")?.unwrap_or(0.0);
        let scale = self.channel_attribute(channel, "scale")?.unwrap_or(1.0);
        Ok((raw + offset) * scale)
    }

    pub fn vector(&self, kind: &str) -> Result<Vector3, SensorError> {
        Ok(Vector3::new(
            self.channel(&format!("{}_x", kind))?,
            self.channel(&format!("{}_y", kind))?,
            self.channel(&format!("{}_z", kind))?,
        ))
    }

    // Per-channel attribute first, then the one shared by all axes.
    fn channel_attribute(
        &self,
        channel: &str,
        attribute: &str,
    ) -> Result<Option<f64>, SensorError> {
        let own = format!("in_{}_{}", channel, attribute);
        if self.path.join(&own).exists() {
            return self.read_number(&own).map(Some);
        }
        if let Some((kind, _axis)) = channel.rsplit_once('_') {
            let shared = format!("in_{}_{}", kind, attribute);
            if self.path.join(&shared).exists() {
                return self.read_number(&shared).map(Some);
            }
        }
        Ok(None)
    }

    fn read_number(&self, attribute: &str) -> Result<f64, SensorError> {
        let path = self.path.join(attribute);
        let content = fs::read_to_string(&path).map_err(|source| SensorError::Read {
            path: path.clone(),
            source,
        })?;
        let value = content.trim();
        value.parse().map_err(|_| SensorError::Parse {
            path,
            value: value.to_string(),
        })
    }
}

/// Sense HAT style board: humidity, pressure, accelerometer and magnetometer
/// chips plus the optional LED matrix.
pub struct IioSensorBoard {
    humidity: IioDevice,
    pressure: IioDevice,
    accelerometer: IioDevice,
    magnetometer: IioDevice,
    display: Option<LedMatrix>,
}

impl IioSensorBoard {
    pub fn open(config: &SensorBoardConfig) -> Result<Self, SensorError> {
        let root = &config.iio_root;
        let board = Self {
            humidity: IioDevice::find(root, &config.humidity_device)?,
            pressure: IioDevice::find(root, &config.pressure_device)?,
            accelerometer: IioDevice::find(root, &config.accelerometer_device)?,
            magnetometer: IioDevice::find(root, &config.magnetometer_device)?,
            display: LedMatrix::locate(config),
        };

        log::info!(
            "Sensor board ready: {}, {}, {}, {}",
            board.humidity.name(),
            board.pressure.name(),
            board.accelerometer.name(),
            board.magnetometer.name()
        );
        match &board.display {
            Some(display) => log::info!("LED matrix at {}", display.device().display()),
            None => log::warn!("No LED matrix framebuffer found, display will not be cleared"),
        }

        Ok(board)
    }
}

impl SensorSource for IioSensorBoard {
    fn read(&mut self) -> Result<SensorSample, SensorError> {
        let temperature = self.humidity.channel("temp")? * MILLI;
        let humidity = self.humidity.channel("humidityrelative")? * MILLI;
        let temperature_from_pressure = self.pressure.channel("temp")? * MILLI;
        let pressure = self.pressure.channel("pressure")? * KILOPASCAL_TO_MILLIBAR;

        let accel_ms2 = self.accelerometer.vector("accel")?;
        let accel = Vector3::new(
            accel_ms2.x / STANDARD_GRAVITY,
            accel_ms2.y / STANDARD_GRAVITY,
            accel_ms2.z / STANDARD_GRAVITY,
        );

        let magn_gauss = self.magnetometer.vector("magn")?;
        let compass_raw = Vector3::new(
            magn_gauss.x * GAUSS_TO_MICROTESLA,
            magn_gauss.y * GAUSS_TO_MICROTESLA,
            magn_gauss.z * GAUSS_TO_MICROTESLA,
        );

        let orientation = Orientation::from_vectors(accel, compass_raw);

        Ok(SensorSample {
            temperature,
            temperature_from_pressure,
            humidity,
            pressure,
            accel,
            compass_heading: orientation.yaw,
            compass_raw,
            pitch: orientation.pitch,
            roll: orientation.roll,
            yaw: orientation.yaw,
        })
    }

    fn clear_display(&mut self) -> Result<(), SensorError> {
        match &self.display {
            Some(display) => display.clear(),
            None => Ok(()),
        }
    }
}

/// Board attitude in degrees, each angle in [0, 360).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
}

impl Orientation {
    /// Pitch and roll from gravity, yaw from the tilt-compensated magnetic
    /// field.
    pub fn from_vectors(accel: Vector3, magn: Vector3) -> Self {
        let roll = accel.y.atan2(accel.z);
        let pitch = (-accel.x).atan2((accel.y * accel.y + accel.z * accel.z).sqrt());

        let mx = magn.x * pitch.cos() + magn.z * pitch.sin();
        let my = magn.x * roll.sin() * pitch.sin() + magn.y * roll.cos()
            - magn.z * roll.sin() * pitch.cos();
        let yaw = (-my).atan2(mx);

        Self {
            pitch: normalize_degrees(pitch.to_degrees()),
            roll: normalize_degrees(roll.to_degrees()),
            yaw: normalize_degrees(yaw.to_degrees()),
        }
    }
}

fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
