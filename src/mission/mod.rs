mod capture;
mod clock;
mod error;
mod logs;
mod paths;
mod progress;
mod session;

pub use capture::PhotoCaptureState;
pub use clock::{Clock, ManualClock, MissionClock, SystemClock};
pub use error::{FailureKind, MissionError, SetupError};
pub use logs::{CsvLog, ErrorLog, EventKind, LogError, LogRow, CSV_HEADER};
pub use paths::{file_stamp, RunPaths};
pub use progress::format_progress;
pub use session::{Mission, MissionState, MissionStats, MissionSummary, Services};
