mod error;
mod propagation;
mod sun;
mod tle_loader;
mod types;

use std::path::Path;

use chrono::{DateTime, Duration, Utc};

pub use error::OrbitError;
pub use propagation::{ecef_to_geodetic, propagate_subpoint, teme_to_ecef_position};
pub use sun::{is_sunlit, sun_direction};
pub use tle_loader::{load_builtin, load_tle_file, TleEntry, BUILTIN_ISS_TLE};
pub use types::{PositionSample, SatelliteInfo};

const STALE_ELEMENTS: Duration = Duration::days(14);

/// Anything that can report where the station is.
pub trait PositionSource {
    fn position_at(&mut self, timestamp: DateTime<Utc>) -> Result<PositionSample, OrbitError>;
}

/// SGP4-backed position of one satellite.
pub struct OrbitalPosition {
    entry: TleEntry,
}

impl OrbitalPosition {
    pub fn new(entry: TleEntry) -> Self {
        Self { entry }
    }

    /// Load from `tle` if given, otherwise use the built-in ISS elements.
    pub fn load(tle: Option<&Path>, satellite: Option<&str>) -> Result<Self, OrbitError> {
        let entry = match tle {
            Some(path) => load_tle_file(path, satellite)?,
            None => load_builtin()?,
        };
        log::info!(
            "Using elements for {} (NORAD {}) from {}, epoch {}",
            entry.info.name,
            entry.info.norad_id,
            entry.info.tle_source,
            entry.info.epoch
        );
        Ok(Self::new(entry))
    }

    pub fn info(&self) -> &SatelliteInfo {
        &self.entry.info
    }

    /// Warn when propagating far from the element epoch.
    pub fn check_epoch(&self, now: DateTime<Utc>) -> bool {
        let age = now - self.entry.info.epoch;
        if age > STALE_ELEMENTS {
            log::warn!(
                "Element set for {} is {} days old, positions will drift",
                self.entry.info.name,
                age.num_days()
            );
            return false;
        }
        true
    }
}

impl PositionSource for OrbitalPosition {
    fn position_at(&mut self, timestamp: DateTime<Utc>) -> Result<PositionSample, OrbitError> {
        propagate_subpoint(&self.entry.elements, &self.entry.constants, timestamp)
    }
}
