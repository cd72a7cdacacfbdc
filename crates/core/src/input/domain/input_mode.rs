use serde::Serialize;

/// Which frame source is active. Exactly one at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InputMode {
    #[default]
    Idle,
    Camera,
    StillImage,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputMode::Idle => write!(f, "idle"),
            InputMode::Camera => write!(f, "camera"),
            InputMode::StillImage => write!(f, "still image"),
        }
    }
}
