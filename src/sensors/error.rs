use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SensorError {
    #[error("IIO device '{0}' not found")]
    DeviceNotFound(String),
    #[error("read error on {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid value '{value}' in {path}")]
    Parse { path: PathBuf, value: String },
    #[error("display error: {0}")]
    Display(std::io::Error),
}
