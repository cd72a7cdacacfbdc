use serde::{Deserialize, Serialize};

/// Pixel dimensions of a drawing target or an input source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySize {
    pub width: u32,
    pub height: u32,
}

impl DisplaySize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Per-axis factors mapping coordinates in `source` space onto `self`.
    ///
    /// An empty source maps to identity so degenerate inputs never divide by zero.
    pub fn scale_from(&self, source: DisplaySize) -> (f64, f64) {
        if source.is_empty() {
            return (1.0, 1.0);
        }
        (
            self.width as f64 / source.width as f64,
            self.height as f64 / source.height as f64,
        )
    }
}

impl std::fmt::Display for DisplaySize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
