use eframe::egui::{self, Align, Context, Layout, RichText, Ui, vec2};

use artist_network::Role;

use super::super::ViewModel;

fn detail_row(ui: &mut Ui, label: &str, value: Option<&str>) {
    ui.horizontal_wrapped(|ui| {
        ui.label(RichText::new(format!("{label}:")).strong());
        ui.label(value.unwrap_or("Unknown"));
    });
}

impl ViewModel {
    /// Floating card for the selected node, anchored where it was clicked.
    pub(in crate::app) fn draw_popup(&mut self, ctx: &Context) {
        let Some(selected) = self.scene.selected_detail() else {
            return;
        };

        let position = self.canvas_origin + selected.anchor.to_vec2() + vec2(12.0, 12.0);
        let mut close_requested = false;

        egui::Area::new(egui::Id::new("node_detail_popup"))
            .order(egui::Order::Foreground)
            .fixed_pos(position)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_max_width(320.0);
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(selected.display_name.as_str()).heading());
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            if ui.small_button("x").on_hover_text("Close").clicked() {
                                close_requested = true;
                            }
                        });
                    });
                    ui.separator();

                    match (selected.role, selected.detail.as_ref()) {
                        (Role::Peripheral, Some(detail)) => {
                            detail_row(ui, "Type", detail.entity_type.as_deref());
                            detail_row(ui, "Connection", detail.summary.as_deref());
                            detail_row(ui, "Duration", detail.duration.as_deref());
                            if let Some(url) = detail.source_url.as_deref() {
                                ui.horizontal(|ui| {
                                    ui.label(RichText::new("Source:").strong());
                                    ui.hyperlink_to("Link", url);
                                });
                            }
                        }
                        _ => {
                            ui.label("This is the main artist.");
                        }
                    }
                });
            });

        if close_requested {
            self.scene.close_popup();
        }
    }
}
