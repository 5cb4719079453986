use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrbitError {
    #[error("TLE file not found: {0}")]
    FileNotFound(String),
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Invalid TLE format in {file}: {message}")]
    InvalidTle { file: String, message: String },
    #[error("No element set matching {0}")]
    NoMatch(String),
    #[error("Propagation error: {0}")]
    Propagation(String),
}
