use eframe::egui::{self, Align, Context, Layout, Pos2, Vec2};

use artist_network::{LayoutConfig, NetworkPayload, NetworkScene};

use super::super::{DataSource, ViewModel};

/// Used until the canvas has been laid out once.
const INITIAL_VIEWPORT: Vec2 = Vec2::new(960.0, 720.0);

impl ViewModel {
    pub(in crate::app) fn new(payload: &NetworkPayload, layout: LayoutConfig) -> Self {
        let mut scene = NetworkScene::new(layout, INITIAL_VIEWPORT);
        scene.set_payload(payload);

        Self {
            scene,
            simulation: layout.simulation,
            search: String::new(),
            search_match_cache: None,
            hovered: None,
            canvas_origin: Pos2::ZERO,
        }
    }

    pub(in crate::app) fn replace_data(&mut self, payload: &NetworkPayload) {
        self.scene.set_payload(payload);
        self.search_match_cache = None;
        self.hovered = None;
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source: &DataSource,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("artist-network");
                    ui.separator();
                    match self.scene.focal_name() {
                        Some(name) => ui.label(format!("artist: {name}")),
                        None => ui.label("artist: none"),
                    };
                    let connections = self
                        .scene
                        .graph()
                        .map_or(0, |graph| graph.peripheral_count());
                    ui.label(format!("connections: {connections}"));
                    ui.label(format!("data: {}", source.path.display()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload data"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.layout_status_text());
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading connection network...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });

        if !is_loading {
            self.draw_popup(ctx);
        }
    }

    fn layout_status_text(&self) -> String {
        match self.scene.simulation() {
            None => "no graph".to_owned(),
            Some(simulation) if simulation.is_running() => format!(
                "settling | tick {} | energy {:.3}",
                simulation.ticks(),
                simulation.energy()
            ),
            Some(simulation) => format!("settled after {} ticks", simulation.ticks()),
        }
    }
}
