use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke};

use artist_network::{MAX_SCORE, MIN_SCORE, ViewTransform};

pub(super) const FOCAL_COLOR: Color32 = Color32::from_rgb(173, 216, 230);
pub(super) const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
pub(super) const MATCH_COLOR: Color32 = Color32::from_rgb(103, 196, 255);
pub(super) const HOVER_COLOR: Color32 = Color32::from_rgb(255, 164, 101);
pub(super) const LABEL_COLOR: Color32 = Color32::from_gray(230);

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let mix = |from: u8, to: u8| (from as f32 + (to as f32 - from as f32) * amount) as u8;
    Color32::from_rgba_unmultiplied(
        mix(base.r(), overlay.r()),
        mix(base.g(), overlay.g()),
        mix(base.b(), overlay.b()),
        mix(base.a(), overlay.a()),
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    blend_color(color, Color32::from_rgb(19, 23, 29), 1.0 - factor.clamp(0.0, 1.0))
}

/// Light grey for weak connections, deepening toward slate blue as the score rises.
pub(super) fn score_color(score: Option<f32>) -> Color32 {
    let score = score.unwrap_or(MIN_SCORE).clamp(MIN_SCORE, MAX_SCORE);
    let t = (score - MIN_SCORE) / (MAX_SCORE - MIN_SCORE);
    blend_color(
        Color32::from_rgb(211, 211, 211),
        Color32::from_rgb(92, 118, 168),
        t,
    )
}

/// Dark backdrop with a grid that pans and zooms with the scene.
pub(super) fn draw_background(painter: &Painter, rect: Rect, transform: ViewTransform) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * transform.scale.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.min + transform.translation;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    rect.expand(radius).contains(position)
}

pub(super) fn segment_visible(rect: Rect, start: Pos2, end: Pos2) -> bool {
    Rect::from_two_pos(start, end).expand(2.0).intersects(rect)
}
