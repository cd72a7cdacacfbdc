use crate::detection::domain::bounding_box::BoundingBox;
use crate::detection::domain::face_landmarks::Point;
use crate::overlay::domain::overlay_surface::OverlaySurface;
use crate::shared::display_size::DisplaySize;

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear,
    Box {
        bbox: BoundingBox,
        label: Option<String>,
    },
    Points(Vec<Point>),
    Text {
        text: String,
        at: Point,
    },
}

/// Records draw calls instead of painting them.
///
/// `clear` drops the recorded list, so after a render the list holds exactly
/// that render's output, starting with `Clear`.
#[derive(Debug, Default)]
pub struct DisplayListSurface {
    size: DisplaySize,
    commands: Vec<DrawCommand>,
    resizes: usize,
}

impl DisplayListSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn resize_count(&self) -> usize {
        self.resizes
    }

    pub fn box_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Box { .. }))
            .count()
    }
}

impl OverlaySurface for DisplayListSurface {
    fn resize(&mut self, size: DisplaySize) {
        self.size = size;
        self.resizes += 1;
    }

    fn size(&self) -> DisplaySize {
        self.size
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn draw_box(&mut self, bbox: &BoundingBox, label: Option<&str>) {
        self.commands.push(DrawCommand::Box {
            bbox: *bbox,
            label: label.map(str::to_string),
        });
    }

    fn draw_points(&mut self, points: &[Point]) {
        self.commands.push(DrawCommand::Points(points.to_vec()));
    }

    fn draw_text(&mut self, text: &str, at: Point) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
        });
    }
}
