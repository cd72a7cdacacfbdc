use serde::{Deserialize, Serialize};

/// Presentation switches. Changing one never triggers a detection pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DisplayToggles {
    pub show_landmarks: bool,
    pub show_expressions: bool,
}
