pub mod camera;
pub mod config;
pub mod mission;
pub mod orbit;
pub mod sensors;

pub use config::{CaptureGate, Config, ConfigError};
pub use mission::{Mission, MissionSummary, Services};
