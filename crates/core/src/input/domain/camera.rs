use async_trait::async_trait;

use crate::input::domain::input_error::InputError;
use crate::shared::display_size::DisplaySize;
use crate::shared::frame::Frame;

/// A granted capture stream with stoppable tracks.
pub trait CameraStream: Send {
    /// Size of the video as reported by its metadata.
    fn display_size(&self) -> DisplaySize;

    /// The current frame, or `None` when the track has ended or is paused.
    fn read_frame(&mut self) -> Option<Frame>;

    fn is_live(&self) -> bool;

    /// Stops every track. Must be safe to call more than once.
    fn stop(&mut self);
}

/// Media capture boundary. The permission prompt may take arbitrarily long.
#[async_trait]
pub trait MediaCapture: Send + Sync {
    async fn request_camera(&self) -> Result<Box<dyn CameraStream>, InputError>;
}
