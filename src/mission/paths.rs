use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::mission::error::SetupError;

/// Stamp shared by every file of one run, e.g. `2022Apr05_10h20m30s`.
pub const FILE_STAMP_FORMAT: &str = "%Y%b%d_%Hh%Mm%Ss";

pub fn file_stamp(start: DateTime<Utc>) -> String {
    start.format(FILE_STAMP_FORMAT).to_string()
}

/// Output locations of one run under the configured root.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub stamp: String,
    pub logs_dir: PathBuf,
    pub images_dir: PathBuf,
    pub csv_log: PathBuf,
    pub error_log: PathBuf,
    pub summary: PathBuf,
}

impl RunPaths {
    pub fn new(root: &Path, team: &str, start: DateTime<Utc>) -> Self {
        let stamp = file_stamp(start);
        let logs_dir = root.join("logs");
        let images_dir = root.join("images").join(&stamp);
        Self {
            csv_log: logs_dir.join(format!("{}_Log_{}.csv", team, stamp)),
            error_log: logs_dir.join(format!("Errors{}.txt", stamp)),
            summary: logs_dir.join(format!("Summary{}.yaml", stamp)),
            logs_dir,
            images_dir,
            stamp,
        }
    }

    /// Create the log and image folders; existing folders are kept.
    pub fn create_dirs(&self) -> Result<(), SetupError> {
        for dir in [&self.logs_dir, &self.images_dir] {
            fs::create_dir_all(dir).map_err(|source| SetupError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn image_path(&self, file_name: &str) -> PathBuf {
        self.images_dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn layout_follows_start_stamp() {
        let start = Utc.with_ymd_and_hms(2022, 4, 5, 10, 20, 30).unwrap();
        let paths = RunPaths::new(Path::new("/data"), "LionTech", start);

        assert_eq!(paths.stamp, "2022Apr05_10h20m30s");
        assert_eq!(
            paths.csv_log,
            PathBuf::from("/data/logs/LionTech_Log_2022Apr05_10h20m30s.csv")
        );
        assert_eq!(
            paths.error_log,
            PathBuf::from("/data/logs/Errors2022Apr05_10h20m30s.txt")
        );
        assert_eq!(
            paths.image_path("LTech_0001.jpg"),
            PathBuf::from("/data/images/2022Apr05_10h20m30s/LTech_0001.jpg")
        );
    }

    #[test]
    fn creating_dirs_twice_is_fine() {
        let tmp = TempDir::new().unwrap();
        let paths = RunPaths::new(tmp.path(), "LionTech", Utc::now());
        paths.create_dirs().unwrap();
        paths.create_dirs().unwrap();
        assert!(paths.images_dir.is_dir());
        assert!(paths.logs_dir.is_dir());
    }
}
