use std::fs;
use std::path::Path;

use sgp4::{Constants, Elements};

use crate::orbit::error::OrbitError;
use crate::orbit::types::SatelliteInfo;

/// Element set flown with the logger when no TLE file is configured.
pub const BUILTIN_ISS_TLE: &str = "ISS (ZARYA)
1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992
2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";

pub const BUILTIN_SOURCE: &str = "built-in";

pub struct TleEntry {
    pub info: SatelliteInfo,
    pub elements: Elements,
    pub constants: Constants,
}

/// Load the element set for `satellite` from a TLE file.
///
/// `satellite` matches either the NORAD id or a case-insensitive fragment of
/// the object name. With no selector the first entry in the file wins.
pub fn load_tle_file(path: &Path, satellite: Option<&str>) -> Result<TleEntry, OrbitError> {
    if !path.exists() {
        return Err(OrbitError::FileNotFound(path.display().to_string()));
    }
    let content = fs::read_to_string(path)?;
    let filename = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    select_entry(&content, &filename, satellite)
}

pub fn load_builtin() -> Result<TleEntry, OrbitError> {
    select_entry(BUILTIN_ISS_TLE, BUILTIN_SOURCE, None)
}

fn select_entry(
    content: &str,
    source: &str,
    satellite: Option<&str>,
) -> Result<TleEntry, OrbitError> {
    for (name, line1, line2) in parse_multi_tle(content) {
        let entry = build_entry(name, &line1, &line2, source)?;
        if matches_selector(&entry.info, satellite) {
            return Ok(entry);
        }
    }

    Err(OrbitError::NoMatch(
        satellite.unwrap_or("any satellite").to_string(),
    ))
}

fn build_entry(
    name: Option<String>,
    line1: &str,
    line2: &str,
    source: &str,
) -> Result<TleEntry, OrbitError> {
    let invalid = |message: String| OrbitError::InvalidTle {
        file: source.to_string(),
        message,
    };

    let elements = Elements::from_tle(name.clone(), line1.as_bytes(), line2.as_bytes())
        .map_err(|e| invalid(e.to_string()))?;
    let constants = Constants::from_elements(&elements).map_err(|e| invalid(e.to_string()))?;

    let sat_name = name.unwrap_or_else(|| format!("NORAD {}", elements.norad_id));

    Ok(TleEntry {
        info: SatelliteInfo {
            name: sat_name,
            norad_id: elements.norad_id as u32,
            tle_source: source.to_string(),
            epoch: elements.datetime.and_utc(),
        },
        elements,
        constants,
    })
}

fn matches_selector(info: &SatelliteInfo, satellite: Option<&str>) -> bool {
    let Some(selector) = satellite.map(str::trim) else {
        return true;
    };
    if let Ok(norad_id) = selector.parse::<u32>() {
        return info.norad_id == norad_id;
    }
    info.name.to_lowercase().contains(&selector.to_lowercase())
}

/// Parse multi-satellite TLE content
fn parse_multi_tle(content: &str) -> Vec<(Option<String>, String, String)> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            // 2-line TLE (no name)
            result.push((None, lines[i].to_string(), lines[i + 1].to_string()));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            // 3-line TLE (with name)
            result.push((
                Some(lines[i].to_string()),
                lines[i + 1].to_string(),
                lines[i + 2].to_string(),
            ));
            i += 3;
        } else {
            i += 1;
        }
    }

    result
}
