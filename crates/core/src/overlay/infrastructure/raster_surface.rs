use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::detection::domain::bounding_box::BoundingBox;
use crate::detection::domain::face_landmarks::Point;
use crate::overlay::domain::overlay_surface::OverlaySurface;
use crate::shared::display_size::DisplaySize;
use crate::shared::frame::Frame;

const BOX_COLOR: Rgba<u8> = Rgba([0, 120, 255, 255]);
const BOX_THICKNESS: i32 = 2;
const LANDMARK_COLOR: Rgba<u8> = Rgba([0, 255, 128, 255]);
const LANDMARK_RADIUS: i32 = 1;
const LABEL_COLOR: Rgba<u8> = Rgba([20, 20, 20, 200]);
/// Label plates are sized from the text length; no glyphs are rasterised.
const LABEL_CHAR_WIDTH: u32 = 7;
const LABEL_HEIGHT: u32 = 14;

/// Transparent RGBA canvas the overlay is painted into.
pub struct RasterSurface {
    canvas: RgbaImage,
}

impl RasterSurface {
    pub fn new() -> Self {
        Self {
            canvas: RgbaImage::new(0, 0),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.canvas
    }

    fn is_blank(&self) -> bool {
        self.canvas.width() == 0 || self.canvas.height() == 0
    }

    fn label_plate(&mut self, text: &str, x: f64, baseline: f64) {
        if self.is_blank() {
            return;
        }
        let width = (text.chars().count() as u32 * LABEL_CHAR_WIDTH).max(1);
        let top = baseline.round() as i32 - LABEL_HEIGHT as i32;
        let rect = Rect::at(x.round() as i32, top).of_size(width, LABEL_HEIGHT);
        draw_filled_rect_mut(&mut self.canvas, rect, LABEL_COLOR);
    }
}

impl Default for RasterSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlaySurface for RasterSurface {
    fn resize(&mut self, size: DisplaySize) {
        self.canvas = RgbaImage::new(size.width, size.height);
    }

    fn size(&self) -> DisplaySize {
        let (width, height) = self.canvas.dimensions();
        DisplaySize::new(width, height)
    }

    fn clear(&mut self) {
        for pixel in self.canvas.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    fn draw_box(&mut self, bbox: &BoundingBox, label: Option<&str>) {
        if self.is_blank() {
            return;
        }
        let width = bbox.width.round().max(1.0) as u32;
        let height = bbox.height.round().max(1.0) as u32;
        let (x, y) = (bbox.x.round() as i32, bbox.y.round() as i32);
        for inset in 0..BOX_THICKNESS {
            let w = width.saturating_sub(2 * inset as u32).max(1);
            let h = height.saturating_sub(2 * inset as u32).max(1);
            draw_hollow_rect_mut(
                &mut self.canvas,
                Rect::at(x + inset, y + inset).of_size(w, h),
                BOX_COLOR,
            );
        }
        if let Some(label) = label {
            self.label_plate(label, bbox.x, bbox.y + bbox.height + LABEL_HEIGHT as f64);
        }
    }

    fn draw_points(&mut self, points: &[Point]) {
        if self.is_blank() {
            return;
        }
        for p in points {
            draw_filled_circle_mut(
                &mut self.canvas,
                (p.x.round() as i32, p.y.round() as i32),
                LANDMARK_RADIUS,
                LANDMARK_COLOR,
            );
        }
    }

    fn draw_text(&mut self, text: &str, at: Point) {
        self.label_plate(text, at.x, at.y);
    }

    fn snapshot(&self) -> Option<RgbaImage> {
        Some(self.canvas.clone())
    }
}

/// Lays `overlay` over `base`, scaling the frame to the overlay's size.
/// Returns `None` for frames that are not 3-channel RGB.
pub fn composite_over(base: &Frame, overlay: &RgbaImage) -> Option<RgbaImage> {
    let rgb = base.to_rgb_image()?;
    let mut out = image::DynamicImage::ImageRgb8(rgb).to_rgba8();
    let (width, height) = overlay.dimensions();
    if width > 0 && height > 0 && out.dimensions() != (width, height) {
        out = imageops::resize(&out, width, height, FilterType::Triangle);
    }
    imageops::overlay(&mut out, overlay, 0, 0);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::domain::display_toggles::DisplayToggles;
    use crate::overlay::overlay_renderer::render;
    use crate::detection::domain::detection_result::DetectionResult;

    fn painted(surface: &RasterSurface) -> usize {
        surface.image().pixels().filter(|p| p.0[3] > 0).count()
    }

    #[test]
    fn test_resize_and_clear() {
        let mut surface = RasterSurface::new();
        surface.resize(DisplaySize::new(40, 30));
        assert_eq!(surface.size(), DisplaySize::new(40, 30));

        surface.draw_box(&BoundingBox::new(5.0, 5.0, 10.0, 10.0), None);
        assert!(painted(&surface) > 0);
        surface.clear();
        assert_eq!(painted(&surface), 0);
    }

    #[test]
    fn test_unsized_surface_ignores_drawing() {
        let mut surface = RasterSurface::new();
        surface.draw_box(&BoundingBox::new(0.0, 0.0, 5.0, 5.0), Some("0.5"));
        surface.draw_points(&[Point::new(1.0, 1.0)]);
        surface.draw_text("x", Point::new(1.0, 1.0));
        assert_eq!(surface.size(), DisplaySize::new(0, 0));
    }

    #[test]
    fn test_box_outline_is_hollow() {
        let mut surface = RasterSurface::new();
        surface.resize(DisplaySize::new(40, 40));
        surface.draw_box(&BoundingBox::new(10.0, 10.0, 20.0, 20.0), None);

        assert_eq!(*surface.image().get_pixel(10, 10), BOX_COLOR);
        assert_eq!(*surface.image().get_pixel(11, 11), BOX_COLOR);
        assert_eq!(surface.image().get_pixel(20, 20).0[3], 0);
    }

    #[test]
    fn test_drawing_off_canvas_is_clipped() {
        let mut surface = RasterSurface::new();
        surface.resize(DisplaySize::new(10, 10));
        surface.draw_box(&BoundingBox::new(-50.0, -50.0, 5.0, 5.0), Some("0.99"));
        surface.draw_points(&[Point::new(500.0, 500.0)]);
        surface.draw_text("far away", Point::new(100.0, 100.0));
        assert_eq!(painted(&surface), 0);
    }

    #[test]
    fn test_render_twice_is_pixel_identical() {
        let results = vec![DetectionResult::new(BoundingBox::new(4.0, 6.0, 12.0, 12.0))
            .with_confidence(0.8)];
        let display = DisplaySize::new(32, 32);
        let mut surface = RasterSurface::new();

        render(&mut surface, &results, display, DisplayToggles::default());
        let first = surface.snapshot().unwrap();
        render(&mut surface, &results, display, DisplayToggles::default());

        assert_eq!(surface.snapshot().unwrap(), first);
    }

    #[test]
    fn test_composite_scales_frame_to_overlay() {
        let frame = Frame::new(vec![255u8; 4 * 2 * 3], 4, 2, 3, 0);
        let mut surface = RasterSurface::new();
        surface.resize(DisplaySize::new(8, 4));
        surface.draw_points(&[Point::new(4.0, 2.0)]);

        let out = composite_over(&frame, surface.image()).unwrap();

        assert_eq!(out.dimensions(), (8, 4));
        assert_eq!(*out.get_pixel(4, 2), LANDMARK_COLOR);
        assert_eq!(*out.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_composite_rejects_non_rgb_frame() {
        let frame = Frame::new(vec![0u8; 4], 2, 2, 1, 0);
        assert!(composite_over(&frame, &RgbaImage::new(2, 2)).is_none());
    }
}
