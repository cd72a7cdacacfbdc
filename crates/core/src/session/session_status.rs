use serde::Serialize;

use crate::detection::domain::model_lifecycle::ModelState;
use crate::input::domain::input_mode::InputMode;

/// Point-in-time view of the controller for status displays.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub mode: InputMode,
    pub models: ModelState,
    pub streaming: bool,
    pub camera_denied: bool,
    pub processing_image: bool,
    pub detecting: bool,
    pub tracking: bool,
    pub face_count: usize,
    pub sample_count: usize,
}

impl SessionStatus {
    pub fn models_ready(&self) -> bool {
        self.models == ModelState::Ready
    }
}
