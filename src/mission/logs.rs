//! The two files a mission leaves behind: the CSV data log and the plain
//! text error/status log.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use strum_macros::Display;
use thiserror::Error;

use crate::orbit::PositionSample;
use crate::sensors::SensorSample;

pub const CSV_HEADER: [&str; 19] = [
    "Team",
    "Timestamp",
    "Longitude",
    "Latitude",
    "Height",
    "Temperature",
    "Temp_from_pressure",
    "Humidity",
    "Pressure",
    "AccelX",
    "AccelY",
    "AccelZ",
    "CompassMag",
    "CompassX",
    "CompassY",
    "CompassZ",
    "Pitch",
    "Roll",
    "Yaw",
];

pub const ROW_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

#[derive(Debug, Error)]
pub enum LogError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
}

/// One data row: who, when, where and what the sensors saw.
#[derive(Debug, Clone, Copy)]
pub struct LogRow<'a> {
    pub team: &'a str,
    pub timestamp: DateTime<Utc>,
    pub position: &'a PositionSample,
    pub sensors: &'a SensorSample,
}

impl LogRow<'_> {
    pub fn to_record(&self) -> [String; 19] {
        let s = self.sensors;
        [
            self.team.to_string(),
            self.timestamp.format(ROW_TIMESTAMP_FORMAT).to_string(),
            format!("{:.4}", self.position.longitude_deg),
            format!("{:.4}", self.position.latitude_deg),
            format!("{:.3}", self.position.elevation_km),
            s.temperature.to_string(),
            s.temperature_from_pressure.to_string(),
            s.humidity.to_string(),
            s.pressure.to_string(),
            s.accel.x.to_string(),
            s.accel.y.to_string(),
            s.accel.z.to_string(),
            s.compass_heading.to_string(),
            s.compass_raw.x.to_string(),
            s.compass_raw.y.to_string(),
            s.compass_raw.z.to_string(),
            s.pitch.to_string(),
            s.roll.to_string(),
            s.yaw.to_string(),
        ]
    }
}

/// Append-only CSV log. The file is reopened for every row and synced
/// before `append` returns, so an interrupted run keeps every row written.
#[derive(Debug, Clone)]
pub struct CsvLog {
    path: PathBuf,
}

impl CsvLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the header unless the file already has content.
    pub fn write_header(&self) -> Result<(), LogError> {
        self.write(None)
    }

    /// Append one row, preceded by the header if the file is still empty.
    pub fn append(&self, row: &LogRow<'_>) -> Result<(), LogError> {
        self.write(Some(row.to_record()))
    }

    fn write(&self, record: Option<[String; 19]>) -> Result<(), LogError> {
        let file = self.open()?;
        let empty = file.metadata().map_err(|e| self.io_error(e))?.len() == 0;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if empty {
            writer
                .write_record(CSV_HEADER)
                .map_err(|e| self.csv_error(e))?;
        }
        if let Some(record) = record {
            writer
                .write_record(&record)
                .map_err(|e| self.csv_error(e))?;
        }
        writer.flush().map_err(|e| self.io_error(e))?;

        let file = writer
            .into_inner()
            .map_err(|e| self.io_error(e.into_error()))?;
        file.sync_data().map_err(|e| self.io_error(e))
    }

    fn open(&self) -> Result<File, LogError> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> LogError {
        LogError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> LogError {
        LogError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EventKind {
    #[strum(serialize = "Mission error")]
    Error,
    #[strum(serialize = "Mission update")]
    Update,
}

/// Plain text log of failures and progress, one line per event.
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn error(&self, at: DateTime<Utc>, message: &str) -> Result<(), LogError> {
        self.record(EventKind::Error, at, message)
    }

    pub fn update(&self, at: DateTime<Utc>, message: &str) -> Result<(), LogError> {
        self.record(EventKind::Update, at, message)
    }

    pub fn record(
        &self,
        kind: EventKind,
        at: DateTime<Utc>,
        message: &str,
    ) -> Result<(), LogError> {
        let io_error = |source| LogError::Io {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_error)?;
        writeln!(
            file,
            "{}: [{}] {}",
            kind,
            at.format(ROW_TIMESTAMP_FORMAT),
            message
        )
        .map_err(io_error)
    }
}
