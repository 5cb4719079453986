use chrono::{DateTime, Duration, Utc};

/// Source of wall-clock time and the loop's only suspension point.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
    fn sleep(&mut self, duration: std::time::Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&mut self, duration: std::time::Duration) {
        std::thread::sleep(duration);
    }
}

/// Clock that only moves when slept on or set, for replaying a mission
/// faster than real time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: DateTime<Utc>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: start }
    }

    pub fn set(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn sleep(&mut self, duration: std::time::Duration) {
        self.now += to_chrono(duration);
    }
}

pub fn to_chrono(duration: std::time::Duration) -> Duration {
    Duration::from_std(duration).unwrap_or(Duration::MAX)
}

/// Start, current and last-photo instants of one run.
#[derive(Debug, Clone)]
pub struct MissionClock {
    start: DateTime<Utc>,
    now: DateTime<Utc>,
    last_photo: DateTime<Utc>,
    deadline: DateTime<Utc>,
}

impl MissionClock {
    pub fn new(start: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            start,
            now: start,
            last_photo: start,
            deadline: start
                .checked_add_signed(duration)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Advance to `reading`. A reading older than the current time is
    /// ignored so `now` never goes backwards.
    pub fn refresh(&mut self, reading: DateTime<Utc>) -> DateTime<Utc> {
        if reading < self.now {
            log::warn!(
                "Clock went backwards by {}, holding at {}",
                self.now - reading,
                self.now
            );
        } else {
            self.now = reading;
        }
        self.now
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn last_photo(&self) -> DateTime<Utc> {
        self.last_photo
    }

    /// `start + duration`, saturating at the last representable instant.
    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    pub fn duration(&self) -> Duration {
        self.deadline - self.start
    }

    pub fn elapsed(&self) -> Duration {
        self.now - self.start
    }

    pub fn is_running(&self) -> bool {
        self.now < self.deadline()
    }

    /// Strictly more than `delay` since the last photo.
    pub fn photo_due(&self, delay: Duration) -> bool {
        self.now - self.last_photo > delay
    }

    pub fn mark_photo(&mut self) {
        self.last_photo = self.now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 4, 5, 10, 20, 30).unwrap()
    }

    #[test]
    fn now_never_goes_backwards() {
        let mut clock = MissionClock::new(start(), Duration::minutes(1));
        clock.refresh(start() + Duration::seconds(5));
        let held = clock.refresh(start() + Duration::seconds(2));
        assert_eq!(held, start() + Duration::seconds(5));
    }

    #[test]
    fn runs_until_deadline_is_reached() {
        let mut clock = MissionClock::new(start(), Duration::minutes(1));
        assert!(clock.is_running());
        clock.refresh(start() + Duration::milliseconds(59_999));
        assert!(clock.is_running());
        clock.refresh(start() + Duration::minutes(1));
        assert!(!clock.is_running());
    }

    #[test]
    fn photo_due_is_strict() {
        let mut clock = MissionClock::new(start(), Duration::minutes(1));
        let delay = Duration::seconds(10);
        clock.refresh(start() + delay);
        assert!(!clock.photo_due(delay));
        clock.refresh(start() + delay + Duration::milliseconds(1));
        assert!(clock.photo_due(delay));
        clock.mark_photo();
        assert!(!clock.photo_due(delay));
        assert_eq!(clock.last_photo(), clock.now());
    }

    #[test]
    fn oversized_duration_saturates() {
        let clock = MissionClock::new(start(), to_chrono(std::time::Duration::MAX));
        assert_eq!(clock.deadline(), DateTime::<Utc>::MAX_UTC);
        assert!(clock.is_running());
    }

    #[test]
    fn manual_clock_advances_on_sleep() {
        let mut clock = ManualClock::new(start());
        clock.sleep(std::time::Duration::from_millis(250));
        assert_eq!(clock.now(), start() + Duration::milliseconds(250));
    }
}
