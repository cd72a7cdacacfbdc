//! Ordered facial landmark points.
//!
//! The engine decides how many points a face gets (68 for the usual
//! jaw/brow/nose/eye/mouth layout); the controller only ever scales and
//! paints them, so order is preserved but never interpreted.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceLandmarks {
    points: Vec<Point>,
}

impl FaceLandmarks {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| Point::new(p.x * sx, p.y * sy))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> FaceLandmarks {
        FaceLandmarks::new(vec![
            Point::new(10.0, 10.0),
            Point::new(20.0, 10.0),
            Point::new(15.0, 30.0),
        ])
    }

    #[test]
    fn test_scaled_preserves_order() {
        let scaled = triangle().scaled(2.0, 3.0);
        assert_eq!(
            scaled.points(),
            &[
                Point::new(20.0, 30.0),
                Point::new(40.0, 30.0),
                Point::new(30.0, 90.0)
            ]
        );
    }

    #[test]
    fn test_len_and_empty() {
        assert_eq!(triangle().len(), 3);
        assert!(FaceLandmarks::default().is_empty());
    }

    #[test]
    fn test_serializes_as_point_list() {
        let json = serde_json::to_string(&triangle()).unwrap();
        assert!(json.starts_with("[{\"x\":10.0"));
        let back: FaceLandmarks = serde_json::from_str(&json).unwrap();
        assert_eq!(back, triangle());
    }
}
