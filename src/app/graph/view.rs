use std::collections::HashSet;

use eframe::egui::{Align2, Color32, FontId, Painter, Rect, Sense, Stroke, Ui, vec2};

use artist_network::util::truncate_label;
use artist_network::{Frame, FrameNode, FrameRenderer, Role};

use super::super::ViewModel;
use super::super::render_utils::{
    FOCAL_COLOR, HOVER_COLOR, LABEL_COLOR, MATCH_COLOR, SELECTED_COLOR, blend_color,
    circle_visible, dim_color, draw_background, score_color, segment_visible,
};

const MAX_LABEL_CHARS: usize = 28;

/// Paints scene frames onto the egui canvas.
struct CanvasRenderer<'a> {
    painter: &'a Painter,
    rect: Rect,
    hovered: Option<usize>,
    matches: Option<&'a HashSet<usize>>,
}

impl CanvasRenderer<'_> {
    fn node_color(&self, node: &FrameNode<'_>) -> Color32 {
        let base = match node.role {
            Role::Focal => FOCAL_COLOR,
            Role::Peripheral => score_color(node.score),
        };
        let is_match = self
            .matches
            .is_some_and(|matches| matches.contains(&node.index));
        let search_active = self.matches.is_some_and(|matches| !matches.is_empty());

        if self.hovered == Some(node.index) {
            blend_color(base, HOVER_COLOR, 0.45)
        } else if is_match {
            blend_color(base, MATCH_COLOR, 0.6)
        } else if search_active {
            dim_color(base, 0.45)
        } else {
            base
        }
    }
}

impl FrameRenderer for CanvasRenderer<'_> {
    fn paint(&mut self, frame: &Frame<'_>) {
        draw_background(self.painter, self.rect, frame.transform);

        let offset = self.rect.min.to_vec2();
        let zoom_sqrt = frame.transform.scale.sqrt();

        for (link, from, to) in frame.link_segments() {
            let (from, to) = (from + offset, to + offset);
            if !segment_visible(self.rect, from, to) {
                continue;
            }
            let width = ((0.6 + link.score * 0.2) * zoom_sqrt).clamp(0.5, 4.0);
            let alpha = (80.0 + link.score * 12.0) as u8;
            self.painter.line_segment(
                [from, to],
                Stroke::new(width, Color32::from_rgba_unmultiplied(150, 160, 175, alpha)),
            );
        }

        // Largest first so small nodes are drawn on top.
        let mut order = frame.nodes.iter().collect::<Vec<_>>();
        order.sort_by(|a, b| b.radius.total_cmp(&a.radius));

        let font_scale = frame.transform.scale.clamp(0.6, 1.6);
        for node in order {
            let center = frame.transform.world_to_screen(node.position) + offset;
            let radius = frame.screen_radius(node).max(2.0);
            if !circle_visible(self.rect, center, radius + 24.0) {
                continue;
            }

            self.painter
                .circle_filled(center, radius, self.node_color(node));
            let outline = if node.pinned {
                Stroke::new(2.0, Color32::from_gray(240))
            } else {
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190))
            };
            self.painter.circle_stroke(center, radius, outline);

            if node.selected {
                self.painter
                    .circle_stroke(center, radius + 4.0, Stroke::new(2.0, SELECTED_COLOR));
            }

            let font_size = match node.role {
                Role::Focal => 14.0,
                Role::Peripheral => 12.0,
            } * font_scale;
            self.painter.text(
                center + vec2(0.0, radius + 4.0),
                Align2::CENTER_TOP,
                truncate_label(node.label, MAX_LABEL_CHARS),
                FontId::proportional(font_size),
                LABEL_COLOR,
            );
        }
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.canvas_origin = rect.min;
        self.scene.set_viewport(rect.size());

        let interacting = self.handle_canvas_input(ui, rect, &response);

        if self.scene.graph().is_none() {
            let painter = ui.painter_at(rect);
            draw_background(&painter, rect, self.scene.interaction().transform());
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No artist to show. Pass --artist or include an artist name in the data.",
                FontId::proportional(14.0),
                LABEL_COLOR,
            );
            return;
        }

        let matches = self.search_matches();
        let painter = ui.painter_at(rect);
        let mut renderer = CanvasRenderer {
            painter: &painter,
            rect,
            hovered: self.hovered,
            matches: matches.as_deref(),
        };
        let running = self.scene.advance(&mut renderer);

        if running || interacting {
            ui.ctx().request_repaint();
        }
    }
}
