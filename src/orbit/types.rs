use chrono::{DateTime, Utc};
use serde::Serialize;

/// Sub-point of the station at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionSample {
    pub timestamp: DateTime<Utc>,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub elevation_km: f64,
    pub sunlit: bool,
}

/// Identification of the element set in use
#[derive(Debug, Clone, Serialize)]
pub struct SatelliteInfo {
    pub name: String,
    pub norad_id: u32,
    pub tle_source: String,
    pub epoch: DateTime<Utc>,
}
