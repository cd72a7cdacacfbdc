use crate::input::domain::camera::CameraStream;
use crate::input::domain::input_error::InputError;
use crate::input::domain::input_mode::InputMode;
use crate::shared::display_size::DisplaySize;
use crate::shared::frame::Frame;

/// A decoded still image and the container it is displayed in.
#[derive(Clone, Debug, PartialEq)]
pub struct StillImage {
    pub frame: Frame,
    pub container: DisplaySize,
}

/// Owns the single active frame source and the generation counter that
/// tags every detection pass.
///
/// Every change of active source advances the generation, so a pass that
/// started against an earlier source can be recognised as stale when its
/// result arrives.
pub struct InputSourceManager {
    mode: InputMode,
    camera: Option<Box<dyn CameraStream>>,
    still: Option<StillImage>,
    camera_error: Option<InputError>,
    generation: u64,
}

impl InputSourceManager {
    pub fn new() -> Self {
        Self {
            mode: InputMode::Idle,
            camera: None,
            still: None,
            camera_error: None,
            generation: 0,
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn camera_error(&self) -> Option<&InputError> {
        self.camera_error.as_ref()
    }

    pub fn is_streaming(&self) -> bool {
        self.mode == InputMode::Camera && self.camera.as_ref().is_some_and(|c| c.is_live())
    }

    pub fn still_image(&self) -> Option<&StillImage> {
        self.still.as_ref()
    }

    /// Makes `stream` the active source, dropping any previous camera or
    /// still image. Returns the new generation.
    pub fn activate_camera(&mut self, stream: Box<dyn CameraStream>) -> u64 {
        if let Some(mut previous) = self.camera.take() {
            previous.stop();
        }
        self.still = None;
        self.camera = Some(stream);
        self.camera_error = None;
        self.mode = InputMode::Camera;
        self.advance()
    }

    /// Records a refused or failed camera request. The current source, if
    /// any, is left alone.
    pub fn report_camera_denied(&mut self, error: InputError) {
        self.camera_error = Some(error);
    }

    /// Stops and detaches the camera. Safe to call with no camera active.
    /// Returns true when the active source changed.
    pub fn release_camera(&mut self) -> bool {
        if let Some(mut camera) = self.camera.take() {
            camera.stop();
        }
        if self.mode == InputMode::Camera {
            self.mode = InputMode::Idle;
            self.advance();
            true
        } else {
            false
        }
    }

    /// Makes a decoded image the active source, superseding any earlier one.
    /// Returns the new generation.
    pub fn activate_still_image(&mut self, frame: Frame, container: DisplaySize) -> u64 {
        self.release_camera();
        self.still = Some(StillImage { frame, container });
        self.mode = InputMode::StillImage;
        self.advance()
    }

    /// Drops every source.
    pub fn deactivate(&mut self) {
        self.release_camera();
        if self.still.take().is_some() || self.mode != InputMode::Idle {
            self.mode = InputMode::Idle;
            self.advance();
        }
    }

    /// Frame to analyse next, with the display box the results will be drawn
    /// into. `None` when idle or when the camera track has ended.
    pub fn capture_frame(&mut self) -> Option<(Frame, DisplaySize)> {
        match self.mode {
            InputMode::Idle => None,
            InputMode::Camera => {
                let camera = self.camera.as_mut()?;
                if !camera.is_live() {
                    return None;
                }
                let size = camera.display_size();
                camera.read_frame().map(|frame| (frame, size))
            }
            InputMode::StillImage => self
                .still
                .as_ref()
                .map(|still| (still.frame.clone(), still.container)),
        }
    }

    /// Display box of the active source.
    pub fn display_size(&self) -> Option<DisplaySize> {
        match self.mode {
            InputMode::Idle => None,
            InputMode::Camera => self.camera.as_ref().map(|c| c.display_size()),
            InputMode::StillImage => self.still.as_ref().map(|s| s.container),
        }
    }

    fn advance(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}

impl Default for InputSourceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputSourceManager {
    fn drop(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            camera.stop();
        }
    }
}
