use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};

use crate::camera::error::CaptureError;
use crate::camera::geotag::GeoTag;
use crate::camera::ImageSink;
use crate::config::CameraConfig;

/// Still camera driven through a capture program such as `rpicam-still`.
///
/// Every capture runs `<command> <args...> -n -t <ms> --width W --height H
/// [--exif TAG=VALUE]... -o <output>` and blocks until the program exits.
pub struct CommandCamera {
    config: CameraConfig,
    exif: BTreeMap<&'static str, String>,
}

impl CommandCamera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            exif: BTreeMap::new(),
        }
    }

    /// EXIF tags that the next capture will carry.
    pub fn pending_exif(&self) -> &BTreeMap<&'static str, String> {
        &self.exif
    }

    pub fn build_args(&self, output: &Path) -> Vec<String> {
        let mut args = self.config.args.clone();
        args.extend([
            "-n".to_string(),
            "-t".to_string(),
            self.config.timeout.as_millis().max(1).to_string(),
            "--width".to_string(),
            self.config.width.to_string(),
            "--height".to_string(),
            self.config.height.to_string(),
        ]);
        for (tag, value) in &self.exif {
            args.push("--exif".to_string());
            args.push(format!("{}={}", tag, value));
        }
        args.push("-o".to_string());
        args.push(output.display().to_string());
        args
    }
}

impl ImageSink for CommandCamera {
    fn set_geotag(&mut self, tag: &GeoTag) {
        for (name, value) in tag.exif_tags() {
            self.exif.insert(name, value);
        }
    }

    fn capture(&mut self, output: &Path) -> Result<(), CaptureError> {
        let args = self.build_args(output);
        log::debug!("Capturing {} with {}", output.display(), self.config.command);

        let result = StdCommand::new(&self.config.command)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| CaptureError::Spawn {
                command: self.config.command.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(CaptureError::Failed {
                command: self.config.command.clone(),
                code: result.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        if !output.exists() {
            return Err(CaptureError::MissingOutput(output.to_path_buf()));
        }

        log::info!("Captured {}", output.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    // Stands in for the capture tool: writes a file at the `-o` argument.
    const FAKE_STILL: &str = r#"while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then shift; out="$1"; fi
  shift
done
printf 'jpeg' > "$out""#;

    fn shell_camera(script: &str) -> CommandCamera {
        CommandCamera::new(CameraConfig {
            command: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string(), "still".to_string()],
            width: 1296,
            height: 972,
            timeout: Duration::from_millis(500),
        })
    }

    #[test]
    fn geotag_becomes_exif_arguments() {
        let mut camera = CommandCamera::new(CameraConfig::default());
        camera.set_geotag(&GeoTag::from_coordinates(-33.9, 151.2));
        let args = camera.build_args(Path::new("/tmp/LTech_0001.jpg"));

        assert_eq!(args[0], "-n");
        assert!(args.contains(&"GPS.GPSLatitude=33/1,54/1,0/10".to_string()));
        assert!(args.contains(&"GPS.GPSLatitudeRef=S".to_string()));
        assert!(args.contains(&"GPS.GPSLongitudeRef=E".to_string()));
        assert_eq!(args[args.len() - 2..], ["-o", "/tmp/LTech_0001.jpg"]);
    }

    #[test]
    fn reapplying_geotag_is_idempotent() {
        let mut camera = CommandCamera::new(CameraConfig::default());
        let tag = GeoTag::from_coordinates(47.07, 21.93);

        camera.set_geotag(&tag);
        let once = camera.pending_exif().clone();
        camera.set_geotag(&tag);
        assert_eq!(camera.pending_exif(), &once);
        assert_eq!(once.len(), 4);
    }

    #[cfg(unix)]
    #[test]
    fn capture_runs_the_program() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("LTech_0001.jpg");
        let mut camera = shell_camera(FAKE_STILL);

        camera.capture(&output).unwrap();
        assert_eq!(std::fs::read(&output).unwrap(), b"jpeg");
    }

    #[cfg(unix)]
    #[test]
    fn failing_program_is_reported() {
        let tmp = TempDir::new().unwrap();
        let mut camera = shell_camera("echo 'no camera' >&2; exit 3");

        match camera.capture(&tmp.path().join("x.jpg")) {
            Err(CaptureError::Failed { code, stderr, .. }) => {
                assert_eq!(code, 3);
                assert_eq!(stderr, "no camera");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn silent_program_without_output_is_reported() {
        let tmp = TempDir::new().unwrap();
        let mut camera = shell_camera("exit 0");
        assert!(matches!(
            camera.capture(&tmp.path().join("x.jpg")),
            Err(CaptureError::MissingOutput(_))
        ));
    }
}
