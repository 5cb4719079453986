use std::collections::BTreeMap;
use std::path::Path;
use std::{fmt, fs, io};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use strum_macros::Display;

use crate::camera::{GeoTag, ImageSink};
use crate::config::{Config, MissionConfig};
use crate::mission::capture::PhotoCaptureState;
use crate::mission::clock::{to_chrono, Clock, MissionClock};
use crate::mission::error::{FailureKind, MissionError, SetupError};
use crate::mission::logs::{CsvLog, ErrorLog, LogRow};
use crate::mission::paths::RunPaths;
use crate::mission::progress::format_progress;
use crate::orbit::PositionSource;
use crate::sensors::SensorSource;

const PROGRESS_DECIMALS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum MissionState {
    Initializing,
    Running,
    Terminated,
}

/// The external collaborators a mission drives.
pub struct Services<S, I, P> {
    pub sensors: S,
    pub camera: I,
    pub position: P,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MissionStats {
    pub iterations: u64,
    pub rows_written: u64,
    pub capture_attempts: u64,
    pub captures: u64,
    pub failures: BTreeMap<FailureKind, u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MissionSummary {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub stats: MissionStats,
}

impl MissionSummary {
    pub fn elapsed(&self) -> Duration {
        self.end - self.start
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        fs::write(
            path,
            serde_yaml::to_string(self)
                .map_err(|e| io::Error::other(format!("Failed to serialize summary: {}", e)))?,
        )
    }
}

impl fmt::Display for MissionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let runtime = self
            .elapsed()
            .to_std()
            .map(humantime::format_duration)
            .map(|d| d.to_string())
            .unwrap_or_else(|_| self.elapsed().to_string());
        writeln!(f, "- Mission started at:         {}", self.start.format("%Y-%b-%d %Hh%Mm%Ss"))?;
        writeln!(f, "- Mission ended at:           {}", self.end.format("%Y-%b-%d %Hh%Mm%Ss"))?;
        writeln!(f, "- Total runtime:              {}", runtime)?;
        writeln!(
            f,
            "- Rows logged:                {} of {} iterations",
            self.stats.rows_written, self.stats.iterations
        )?;
        write!(
            f,
            "- Photos taken:               {} of {} attempts",
            self.stats.captures, self.stats.capture_attempts
        )
    }
}

/// One mission run: owns the clocks, the capture state, both logs and the
/// services, and steps through `Initializing -> Running -> Terminated`.
pub struct Mission<S, I, P, C> {
    team: String,
    photo_prefix: String,
    settings: MissionConfig,
    paths: RunPaths,
    clock: C,
    mission_clock: MissionClock,
    capture: PhotoCaptureState,
    csv_log: CsvLog,
    error_log: ErrorLog,
    services: Services<S, I, P>,
    state: MissionState,
    stats: MissionStats,
    next_status: Duration,
}

impl<S, I, P, C> Mission<S, I, P, C>
where
    S: SensorSource,
    I: ImageSink,
    P: PositionSource,
    C: Clock,
{
    /// Prepare a mission starting now according to `clock`.
    pub fn new(config: &Config, services: Services<S, I, P>, clock: C) -> Self {
        let start = clock.now();
        let settings = config.mission.clone();
        let paths = RunPaths::new(&config.output_root, &config.team, start);

        Self {
            team: config.team.clone(),
            photo_prefix: config.photo_prefix.clone(),
            mission_clock: MissionClock::new(start, to_chrono(settings.duration)),
            capture: PhotoCaptureState::new(
                to_chrono(settings.photo_delay),
                settings.capture_gate,
            ),
            csv_log: CsvLog::new(paths.csv_log.clone()),
            error_log: ErrorLog::new(paths.error_log.clone()),
            next_status: to_chrono(settings.status_interval),
            settings,
            paths,
            clock,
            services,
            state: MissionState::Initializing,
            stats: MissionStats::default(),
        }
    }

    pub fn state(&self) -> MissionState {
        self.state
    }

    pub fn paths(&self) -> &RunPaths {
        &self.paths
    }

    pub fn stats(&self) -> &MissionStats {
        &self.stats
    }

    pub fn services(&self) -> &Services<S, I, P> {
        &self.services
    }

    pub fn into_services(self) -> Services<S, I, P> {
        self.services
    }

    /// Run the whole mission. Only a failure to create the output folders
    /// stops it before the deadline.
    pub fn run(&mut self) -> Result<MissionSummary, SetupError> {
        self.initialize()?;
        while self.mission_clock.is_running() {
            self.step();
        }
        Ok(self.terminate())
    }

    pub fn initialize(&mut self) -> Result<(), SetupError> {
        self.paths.create_dirs()?;
        if let Err(e) = self.csv_log.write_header() {
            // The first successful append writes the header instead.
            self.record_failure(MissionError::LogWrite(e));
        }

        log::info!(
            "Mission {} started at {}, logging to {}",
            self.paths.stamp,
            self.mission_clock.start(),
            self.csv_log.path().display()
        );
        log::info!(
            "Duration {}, loop every {}, photo delay {}, gate {}",
            humantime::format_duration(self.settings.duration),
            humantime::format_duration(self.settings.loop_interval),
            humantime::format_duration(self.settings.photo_delay),
            self.capture.gate()
        );

        self.state = MissionState::Running;
        Ok(())
    }

    /// One loop iteration. Always completes, even past the deadline.
    pub fn step(&mut self) {
        self.clock.sleep(self.settings.loop_interval);
        self.mission_clock.refresh(self.clock.now());
        self.stats.iterations += 1;

        if let Err(e) = self.iterate() {
            self.record_failure(e);
        }
        self.report_status();
    }

    fn iterate(&mut self) -> Result<(), MissionError> {
        let now = self.mission_clock.now();

        let position = self.services.position.position_at(now)?;
        let geotag = GeoTag::from_coordinates(position.latitude_deg, position.longitude_deg);
        let sensors = self.services.sensors.read()?.rounded();

        self.csv_log.append(&LogRow {
            team: &self.team,
            timestamp: now,
            position: &position,
            sensors: &sensors,
        })?;
        self.stats.rows_written += 1;

        self.services.camera.set_geotag(&geotag);

        if self.capture.should_capture(&self.mission_clock, position.sunlit) {
            self.take_photo()?;
        }
        Ok(())
    }

    fn take_photo(&mut self) -> Result<(), MissionError> {
        let output = self
            .paths
            .image_path(&self.capture.file_name(&self.photo_prefix));
        self.mission_clock.mark_photo();
        self.stats.capture_attempts += 1;

        self.services.camera.capture(&output)?;
        self.capture.record_success();
        self.stats.captures += 1;
        Ok(())
    }

    fn record_failure(&mut self, error: MissionError) {
        let kind = error.kind();
        *self.stats.failures.entry(kind).or_default() += 1;
        log::warn!("Iteration {} failed: {}", self.stats.iterations, error);

        if let Err(e) = self
            .error_log
            .error(self.mission_clock.now(), &error.to_string())
        {
            log::error!("Cannot write error log: {}", e);
        }
        if kind == FailureKind::LogWrite {
            log::error!("Data row lost for iteration {}", self.stats.iterations);
        }
    }

    // One status line per crossed status-interval boundary.
    fn report_status(&mut self) {
        let elapsed = self.mission_clock.elapsed();
        let interval = to_chrono(self.settings.status_interval);

        while elapsed >= self.next_status {
            let message = format!(
                "{} elapsed, {} done, {} rows, {} photos",
                humantime::format_duration(self.next_status.to_std().unwrap_or_default()),
                self.progress().trim_end(),
                self.stats.rows_written,
                self.stats.captures
            );
            log::info!("{}", message);
            if let Err(e) = self.error_log.update(self.mission_clock.now(), &message) {
                log::error!("Cannot write status line: {}", e);
            }
            self.next_status = self
                .next_status
                .checked_add(&interval)
                .unwrap_or(Duration::MAX);
        }
    }

    pub fn terminate(&mut self) -> MissionSummary {
        if let Err(e) = self.services.sensors.clear_display() {
            log::warn!("Cannot clear display: {}", e);
        }
        self.state = MissionState::Terminated;

        let summary = MissionSummary {
            start: self.mission_clock.start(),
            end: self.mission_clock.now(),
            stats: self.stats.clone(),
        };
        log::info!(
            "Mission {} finished after {} iterations",
            self.paths.stamp,
            summary.stats.iterations
        );
        if let Err(e) = summary.save(&self.paths.summary) {
            log::warn!("Cannot write {}: {}", self.paths.summary.display(), e);
        }
        summary
    }

    /// Elapsed mission time as a percentage of the duration, in
    /// milliseconds. Reads 100% once the deadline has passed.
    fn progress(&self) -> String {
        let total = self.mission_clock.duration().num_milliseconds().max(0) as u64;
        let elapsed = if self.mission_clock.is_running() {
            (self.mission_clock.elapsed().num_milliseconds().max(0) as u64).min(total)
        } else {
            total
        };
        format_progress(elapsed, total, PROGRESS_DECIMALS)
    }

    /// Completion report for the console; ends with a blank line once the
    /// mission is over.
    pub fn final_progress(&self) -> String {
        self.progress()
    }
}
