use chrono::Duration;

use crate::config::CaptureGate;
use crate::mission::clock::MissionClock;

/// Photo counter and gating policy.
#[derive(Debug, Clone)]
pub struct PhotoCaptureState {
    counter: u32,
    delay: Duration,
    gate: CaptureGate,
}

impl PhotoCaptureState {
    pub fn new(delay: Duration, gate: CaptureGate) -> Self {
        Self {
            counter: 1,
            delay,
            gate,
        }
    }

    /// Number the next successful capture will carry.
    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn gate(&self) -> CaptureGate {
        self.gate
    }

    pub fn should_capture(&self, clock: &MissionClock, sunlit: bool) -> bool {
        if !clock.photo_due(self.delay) {
            return false;
        }
        match self.gate {
            CaptureGate::Interval => true,
            CaptureGate::IntervalSunlit => sunlit,
        }
    }

    pub fn file_name(&self, prefix: &str) -> String {
        format!("{}_{:04}.jpg", prefix, self.counter)
    }

    pub fn record_success(&mut self) {
        self.counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn clock_at(offset_ms: i64) -> MissionClock {
        let start = Utc.with_ymd_and_hms(2022, 4, 5, 10, 0, 0).unwrap();
        let mut clock = MissionClock::new(start, Duration::minutes(175));
        clock.refresh(start + Duration::milliseconds(offset_ms));
        clock
    }

    #[test]
    fn interval_gate_ignores_sunlight() {
        let state = PhotoCaptureState::new(Duration::milliseconds(7500), CaptureGate::Interval);
        assert!(!state.should_capture(&clock_at(7500), true));
        assert!(state.should_capture(&clock_at(7750), false));
    }

    #[test]
    fn sunlit_gate_needs_both() {
        let state =
            PhotoCaptureState::new(Duration::milliseconds(7500), CaptureGate::IntervalSunlit);
        assert!(!state.should_capture(&clock_at(7750), false));
        assert!(state.should_capture(&clock_at(7750), true));
        assert!(!state.should_capture(&clock_at(1000), true));
    }

    #[test]
    fn file_names_are_zero_padded_and_increasing() {
        let mut state = PhotoCaptureState::new(Duration::seconds(10), CaptureGate::Interval);
        assert_eq!(state.file_name("LTech"), "LTech_0001.jpg");
        let mut previous = state.file_name("LTech");
        for _ in 0..1200 {
            state.record_success();
            let next = state.file_name("LTech");
            assert!(next > previous);
            previous = next;
        }
        assert_eq!(previous, "LTech_1201.jpg");
    }
}
