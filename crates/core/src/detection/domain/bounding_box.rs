use serde::{Deserialize, Serialize};

/// Axis-aligned face box in pixel space (top-left origin).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        Self {
            x: self.x * sx,
            y: self.y * sy,
            width: self.width * sx,
            height: self.height * sy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_edges() {
        let b = BoundingBox::new(10.0, 20.0, 30.0, 40.0);
        assert_relative_eq!(b.right(), 40.0);
        assert_relative_eq!(b.bottom(), 60.0);
    }

    #[test]
    fn test_scaled_is_linear() {
        let b = BoundingBox::new(10.0, 20.0, 30.0, 40.0).scaled(2.0, 0.5);
        assert_eq!(b, BoundingBox::new(20.0, 10.0, 60.0, 20.0));
    }
}
