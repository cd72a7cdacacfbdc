use image::RgbaImage;

use crate::detection::domain::bounding_box::BoundingBox;
use crate::detection::domain::face_landmarks::Point;
use crate::shared::display_size::DisplaySize;

/// Drawing target laid over the displayed input.
///
/// Coordinates are in the surface's own pixel space, which the renderer
/// keeps equal to the display box of the active input.
pub trait OverlaySurface: Send {
    fn resize(&mut self, size: DisplaySize);

    fn size(&self) -> DisplaySize;

    /// Erases everything drawn so far.
    fn clear(&mut self);

    fn draw_box(&mut self, bbox: &BoundingBox, label: Option<&str>);

    fn draw_points(&mut self, points: &[Point]);

    fn draw_text(&mut self, text: &str, at: Point);

    /// Pixel contents, for surfaces that have any.
    fn snapshot(&self) -> Option<RgbaImage> {
        None
    }
}
