use std::path::PathBuf;

use serde::Serialize;
use strum_macros::Display;
use thiserror::Error;

use crate::camera::CaptureError;
use crate::mission::logs::LogError;
use crate::orbit::OrbitError;
use crate::sensors::SensorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    Sensor,
    Position,
    Capture,
    LogWrite,
}

/// Failure of one step of an iteration. Never fatal to the mission.
#[derive(Debug, Error)]
pub enum MissionError {
    #[error("sensor read failed: {0}")]
    Sensor(#[from] SensorError),
    #[error("position computation failed: {0}")]
    Position(#[from] OrbitError),
    #[error("capture failed: {0}")]
    Capture(#[from] CaptureError),
    #[error("log write failed: {0}")]
    LogWrite(#[from] LogError),
}

impl MissionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            MissionError::Sensor(_) => FailureKind::Sensor,
            MissionError::Position(_) => FailureKind::Position,
            MissionError::Capture(_) => FailureKind::Capture,
            MissionError::LogWrite(_) => FailureKind::LogWrite,
        }
    }
}

/// Failure before the loop can start.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("cannot create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}
