mod display;
mod error;
mod iio;
mod simulated;
mod types;

pub use display::{LedMatrix, SENSE_FB_NAME};
pub use error::SensorError;
pub use iio::{IioDevice, IioSensorBoard, Orientation};
pub use simulated::SimulatedSensorBoard;
pub use types::{round_to, SensorSample, Vector3, CHANNEL_PRECISION, ORIENTATION_PRECISION};

/// Environmental and inertial sensor board.
pub trait SensorSource {
    /// Read every channel once. Values are unrounded.
    fn read(&mut self) -> Result<SensorSample, SensorError>;

    /// Blank any on-board display. Boards without one do nothing.
    fn clear_display(&mut self) -> Result<(), SensorError> {
        Ok(())
    }
}
