use crate::detection::domain::detection_result::{AgeGender, DetectionResult};
use crate::detection::domain::expression::ExpressionScores;
use crate::detection::domain::face_landmarks::Point;
use crate::overlay::domain::display_toggles::DisplayToggles;
use crate::overlay::domain::overlay_surface::OverlaySurface;
use crate::shared::constants::{AGE_GENDER_LABEL_OFFSET, EXPRESSION_MIN_CONFIDENCE};
use crate::shared::display_size::DisplaySize;

/// Vertical distance between stacked expression labels.
pub const EXPRESSION_LINE_HEIGHT: f64 = 18.0;

/// Paints one pass worth of results.
///
/// `results` must already be in `display` coordinates. The surface is
/// resized to `display` when it differs, then cleared, so rendering the
/// same input twice leaves the same picture. Paint order: every box, then
/// landmarks, then expressions (each per toggle), then age/gender labels.
pub fn render(
    surface: &mut dyn OverlaySurface,
    results: &[DetectionResult],
    display: DisplaySize,
    toggles: DisplayToggles,
) {
    if surface.size() != display {
        surface.resize(display);
    }
    surface.clear();

    for result in results {
        let label = result.confidence.map(|c| format!("{c:.2}"));
        surface.draw_box(&result.bounding_box, label.as_deref());
    }

    if toggles.show_landmarks {
        for landmarks in results.iter().filter_map(|r| r.landmarks.as_ref()) {
            surface.draw_points(landmarks.points());
        }
    }

    if toggles.show_expressions {
        for result in results {
            if let Some(expressions) = &result.expressions {
                let bbox = result.bounding_box;
                for (line, text) in expression_lines(expressions).iter().enumerate() {
                    let y = bbox.bottom() + EXPRESSION_LINE_HEIGHT * (line + 1) as f64;
                    surface.draw_text(text, Point::new(bbox.x, y));
                }
            }
        }
    }

    for result in results {
        if let Some(age_gender) = &result.age_gender {
            let bbox = result.bounding_box;
            surface.draw_text(
                &age_gender_label(age_gender),
                Point::new(bbox.x, bbox.y - AGE_GENDER_LABEL_OFFSET),
            );
        }
    }
}

/// `label (0.97)` for every emotion scoring at least the minimum, best first.
pub fn expression_lines(expressions: &ExpressionScores) -> Vec<String> {
    expressions
        .ranked_above(EXPRESSION_MIN_CONFIDENCE)
        .into_iter()
        .map(|(emotion, score)| format!("{} ({score:.2})", emotion.label()))
        .collect()
}

pub fn age_gender_label(age_gender: &AgeGender) -> String {
    format!(
        "{} years, {} ({}%)",
        age_gender.age.round() as i64,
        age_gender.gender,
        (age_gender.gender_confidence * 100.0).round() as i64
    )
}
