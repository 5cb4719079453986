use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::SensorBoardConfig;
use crate::sensors::error::SensorError;

/// Framebuffer name registered by the Sense HAT LED matrix driver.
pub const SENSE_FB_NAME: &str = "RPi-Sense FB";

// 8x8 pixels, RGB565
const MATRIX_BYTES: usize = 8 * 8 * 2;

/// The 8x8 LED matrix behind a framebuffer device.
#[derive(Debug, Clone)]
pub struct LedMatrix {
    device: PathBuf,
}

impl LedMatrix {
    pub fn new(device: PathBuf) -> Self {
        Self { device }
    }

    /// Use the configured framebuffer, or look the matrix up by name.
    pub fn locate(config: &SensorBoardConfig) -> Option<Self> {
        if let Some(device) = &config.led_framebuffer {
            return Some(Self::new(device.clone()));
        }
        find_framebuffer(&config.graphics_root, &config.dev_root).map(Self::new)
    }

    pub fn device(&self) -> &Path {
        &self.device
    }

    /// Switch every pixel off.
    pub fn clear(&self) -> Result<(), SensorError> {
        let mut fb = OpenOptions::new()
            .write(true)
            .open(&self.device)
            .map_err(SensorError::Display)?;
        fb.write_all(&[0u8; MATRIX_BYTES])
            .and_then(|_| fb.flush())
            .map_err(SensorError::Display)
    }
}

/// Scan `graphics_root` (normally `/sys/class/graphics`) for the matrix and
/// map it to its node under `dev_root`.
fn find_framebuffer(graphics_root: &Path, dev_root: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(graphics_root).ok()?;
    for entry in entries.flatten() {
        let fb_name = entry.file_name().to_string_lossy().to_string();
        if !fb_name.starts_with("fb") {
            continue;
        }
        let Ok(name) = fs::read_to_string(entry.path().join("name")) else {
            continue;
        };
        if name.trim() == SENSE_FB_NAME {
            return Some(dev_root.join(fb_name));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn finds_matrix_by_driver_name() {
        let tmp = TempDir::new().unwrap();
        let graphics = tmp.path().join("graphics");
        fs::create_dir_all(graphics.join("fb0")).unwrap();
        fs::create_dir_all(graphics.join("fb1")).unwrap();
        fs::write(graphics.join("fb0/name"), "vc4drmfb\n").unwrap();
        fs::write(graphics.join("fb1/name"), "RPi-Sense FB\n").unwrap();

        let found = find_framebuffer(&graphics, Path::new("/dev")).unwrap();
        assert_eq!(found, PathBuf::from("/dev/fb1"));
    }

    #[test]
    fn clear_zeroes_the_matrix() {
        let tmp = TempDir::new().unwrap();
        let fb = tmp.path().join("fb1");
        fs::write(&fb, vec![0xffu8; MATRIX_BYTES]).unwrap();

        LedMatrix::new(fb.clone()).clear().unwrap();
        let content = fs::read(&fb).unwrap();
        assert_eq!(content.len(), MATRIX_BYTES);
        assert!(content.iter().all(|b| *b == 0));
    }

    #[test]
    fn clear_reports_missing_device() {
        let matrix = LedMatrix::new(PathBuf::from("/nonexistent/fb9"));
        assert!(matches!(matrix.clear(), Err(SensorError::Display(_))));
    }
}
