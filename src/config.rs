use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::time::Duration;
use strum_macros::Display;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Team name written in every log row and in the log file name.
    pub team: String,
    /// Image file name prefix.
    pub photo_prefix: String,
    /// Root folder for `logs/` and `images/`.
    pub output_root: PathBuf,
    pub mission: MissionConfig,
    pub orbit: OrbitConfig,
    pub camera: CameraConfig,
    pub sensors: SensorBoardConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            team: "LionTech".to_string(),
            photo_prefix: "LTech".to_string(),
            output_root: PathBuf::from("LTdata"),
            mission: MissionConfig::default(),
            orbit: OrbitConfig::default(),
            camera: CameraConfig::default(),
            sensors: SensorBoardConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    #[serde(deserialize_with = "human_duration")]
    pub duration: Duration,
    #[serde(deserialize_with = "human_duration")]
    pub loop_interval: Duration,
    #[serde(deserialize_with = "human_duration")]
    pub photo_delay: Duration,
    #[serde(deserialize_with = "human_duration")]
    pub status_interval: Duration,
    pub capture_gate: CaptureGate,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(175 * 60),
            loop_interval: Duration::from_millis(250),
            photo_delay: Duration::from_millis(7500),
            status_interval: Duration::from_secs(10 * 60),
            capture_gate: CaptureGate::IntervalSunlit,
        }
    }
}

/// When a photograph may be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CaptureGate {
    /// Photo delay elapsed.
    Interval,
    /// Photo delay elapsed and the station is in sunlight.
    IntervalSunlit,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    /// TLE file; the built-in ISS elements are used when absent.
    pub tle: Option<PathBuf>,
    /// NORAD id or name fragment selecting an entry of `tle`.
    pub satellite: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub command: String,
    /// Arguments placed before the generated ones.
    pub args: Vec<String>,
    pub width: u32,
    pub height: u32,
    #[serde(deserialize_with = "human_duration")]
    pub timeout: Duration,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            command: "rpicam-still".to_string(),
            args: Vec::new(),
            width: 1296,
            height: 972,
            timeout: Duration::from_millis(1),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SensorBoardConfig {
    pub iio_root: PathBuf,
    pub graphics_root: PathBuf,
    pub dev_root: PathBuf,
    /// Framebuffer of the LED matrix; looked up by driver name when absent.
    pub led_framebuffer: Option<PathBuf>,
    pub humidity_device: String,
    pub pressure_device: String,
    pub accelerometer_device: String,
    pub magnetometer_device: String,
}

impl Default for SensorBoardConfig {
    fn default() -> Self {
        Self {
            iio_root: PathBuf::from("/sys/bus/iio/devices"),
            graphics_root: PathBuf::from("/sys/class/graphics"),
            dev_root: PathBuf::from("/dev"),
            led_framebuffer: None,
            humidity_device: "hts221".to_string(),
            pressure_device: "lps25h".to_string(),
            accelerometer_device: "lsm9ds1_accel".to_string(),
            magnetometer_device: "lsm9ds1_magn".to_string(),
        }
    }
}

fn human_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    humantime::parse_duration(text.trim()).map_err(serde::de::Error::custom)
}

fn fits_calendar(duration: Duration) -> bool {
    chrono::Duration::from_std(duration)
        .ok()
        .and_then(|d| chrono::Utc::now().checked_add_signed(d))
        .is_some()
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: &str| {
            Err(ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            })
        };

        if self.team.trim().is_empty() {
            return invalid("team", "must not be empty");
        }
        if self.photo_prefix.is_empty() || self.photo_prefix.contains(['/', '\\']) {
            return invalid("photo_prefix", "must be a plain file name prefix");
        }
        if self.mission.duration.is_zero() {
            return invalid("mission.duration", "must be positive");
        }
        if self.mission.loop_interval.is_zero() {
            return invalid("mission.loop_interval", "must be positive");
        }
        if self.mission.status_interval.is_zero() {
            return invalid("mission.status_interval", "must be positive");
        }
        for (field, duration) in [
            ("mission.duration", self.mission.duration),
            ("mission.loop_interval", self.mission.loop_interval),
            ("mission.photo_delay", self.mission.photo_delay),
            ("mission.status_interval", self.mission.status_interval),
        ] {
            if !fits_calendar(duration) {
                return invalid(field, "does not fit the calendar from now");
            }
        }
        if self.camera.width == 0 || self.camera.height == 0 {
            return invalid("camera", "resolution must be non-zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = Config::from_str("{}").unwrap();
        assert_eq!(config.team, "LionTech");
        assert_eq!(config.mission.duration, Duration::from_secs(10_500));
        assert_eq!(config.mission.photo_delay, Duration::from_millis(7500));
        assert_eq!(config.mission.capture_gate, CaptureGate::IntervalSunlit);
        assert_eq!(config.camera.width, 1296);
        assert!(config.orbit.tle.is_none());
    }

    #[test]
    fn parses_human_durations_and_gate() {
        let yaml = r#"
team: Orbiters
photo_prefix: ORB
output_root: /home/pi/run
mission:
  duration: 1m
  loop_interval: 250ms
  photo_delay: 10s
  capture_gate: interval
orbit:
  tle: /home/pi/iss.tle
  satellite: "25544"
"#;
        let config = Config::from_str(yaml).unwrap();
        assert_eq!(config.team, "Orbiters");
        assert_eq!(config.mission.duration, Duration::from_secs(60));
        assert_eq!(config.mission.loop_interval, Duration::from_millis(250));
        assert_eq!(config.mission.photo_delay, Duration::from_secs(10));
        assert_eq!(config.mission.status_interval, Duration::from_secs(600));
        assert_eq!(config.mission.capture_gate, CaptureGate::Interval);
        assert_eq!(config.orbit.satellite.as_deref(), Some("25544"));
        assert_eq!(config.output_root, PathBuf::from("/home/pi/run"));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::from_str("mission:\n  duration: soon\n"),
            Err(ConfigError::Yaml(_))
        ));
        assert!(matches!(
            Config::from_str("mission:\n  loop_interval: 0s\n"),
            Err(ConfigError::Invalid {
                field: "mission.loop_interval",
                ..
            })
        ));
        assert!(matches!(
            Config::from_str("photo_prefix: a/b\n"),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn rejects_durations_past_the_calendar() {
        assert!(matches!(
            Config::from_str("mission:\n  duration: 300000years\n"),
            Err(ConfigError::Invalid {
                field: "mission.duration",
                ..
            })
        ));
        assert!(Config::from_str("mission:\n  duration: 1000years\n").is_ok());
    }

    #[test]
    fn gate_displays_as_config_value() {
        assert_eq!(CaptureGate::IntervalSunlit.to_string(), "interval_sunlit");
    }
}
