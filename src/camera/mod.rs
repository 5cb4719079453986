mod command;
mod error;
mod geotag;

use std::path::{Path, PathBuf};

pub use command::CommandCamera;
pub use error::CaptureError;
pub use geotag::{convert, ExifAngle, GeoTag};

/// Camera that embeds a geotag in every image it takes.
pub trait ImageSink {
    /// Set the geotag used by the next capture. Applying the same tag again
    /// leaves the camera state unchanged.
    fn set_geotag(&mut self, tag: &GeoTag);

    fn capture(&mut self, output: &Path) -> Result<(), CaptureError>;
}

/// Camera stand-in for bench runs: remembers what it was asked to do and
/// writes nothing.
#[derive(Debug, Default)]
pub struct NullCamera {
    geotag: Option<GeoTag>,
    captures: Vec<PathBuf>,
}

impl NullCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn geotag(&self) -> Option<&GeoTag> {
        self.geotag.as_ref()
    }

    pub fn captures(&self) -> &[PathBuf] {
        &self.captures
    }
}

impl ImageSink for NullCamera {
    fn set_geotag(&mut self, tag: &GeoTag) {
        self.geotag = Some(tag.clone());
    }

    fn capture(&mut self, output: &Path) -> Result<(), CaptureError> {
        log::info!("Simulated capture {}", output.display());
        self.captures.push(output.to_path_buf());
        Ok(())
    }
}
