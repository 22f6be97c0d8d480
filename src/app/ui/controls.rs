use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{self, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use artist_network::SimulationConfig;

use super::super::{SearchMatchCache, ViewModel};

const MAX_SEARCH_ROWS: usize = 40;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Layout");
        ui.add_space(4.0);

        let mut changed = false;
        changed |= ui
            .add(
                egui::Slider::new(&mut self.simulation.charge_strength, -300.0..=0.0)
                    .text("Charge")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Many-body strength. More negative pushes nodes further apart.")
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut self.simulation.collision_padding, 0.0..=24.0)
                    .text("Collision padding")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Extra space kept around every node.")
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut self.simulation.velocity_decay, 0.05..=0.9)
                    .text("Velocity decay")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Friction applied each tick. Higher settles faster but stiffer.")
            .changed();
        changed |= ui
            .checkbox(&mut self.simulation.pin_focal, "Pin main artist at the centre")
            .on_hover_text(
                "Tuning override. Unpinned, the main artist is only pulled toward the centre \
                 and may drift while the layout settles.",
            )
            .changed();

        if changed {
            self.scene.set_simulation_config(self.simulation);
        }

        ui.horizontal(|ui| {
            if ui
                .button("Reheat layout")
                .on_hover_text("Restart the simulation at full energy.")
                .clicked()
            {
                self.scene.reheat();
            }
            if ui.button("Reset view").clicked() {
                self.scene.reset_view();
            }
            if ui.button("Default tuning").clicked() {
                self.simulation = SimulationConfig::default();
                self.scene.set_simulation_config(self.simulation);
            }
        });

        ui.separator();
        ui.heading("Search");
        ui.add_space(4.0);
        ui.text_edit_singleline(&mut self.search)
            .on_hover_text("Fuzzy match on connection names; matches are highlighted.");

        let rows = self.search_rows();
        if self.search.trim().is_empty() {
            return;
        }
        if rows.is_empty() {
            ui.label("No connections match.");
            return;
        }

        let mut clicked = None;
        egui::ScrollArea::vertical()
            .id_salt("search_results_scroll")
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for (index, label) in &rows {
                    let is_selected = self.scene.interaction().selected() == Some(*index);
                    if ui.selectable_label(is_selected, label.as_str()).clicked() {
                        clicked = Some(*index);
                    }
                }
            });

        if let Some(index) = clicked {
            let anchor = self
                .scene
                .frame()
                .screen_position(index)
                .unwrap_or_default();
            self.scene.select(index, anchor);
        }
    }

    /// Node indices matching the current search, cached per query and graph revision.
    pub(in crate::app) fn search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        let revision = self.scene.revision();
        if let Some(cached) = &self.search_match_cache
            && cached.revision == revision
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let graph = self.scene.graph()?;
        let matcher = SkimMatcherV2::default();
        let matches = graph
            .nodes()
            .iter()
            .enumerate()
            .filter(|(_, node)| fuzzy_match_score(&matcher, &node.display_name, query).is_some())
            .map(|(index, _)| index)
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            revision,
            matches: Arc::clone(&matches),
        });
        Some(matches)
    }

    fn search_rows(&mut self) -> Vec<(usize, String)> {
        let Some(matches) = self.search_matches() else {
            return Vec::new();
        };
        let Some(graph) = self.scene.graph() else {
            return Vec::new();
        };

        let mut rows = matches
            .iter()
            .filter_map(|&index| {
                let node = graph.node(index)?;
                let score = node
                    .connection_score
                    .map(|score| format!("  ({score:.0})"))
                    .unwrap_or_default();
                Some((index, format!("{}{score}", node.display_name)))
            })
            .collect::<Vec<_>>();
        rows.sort_by_key(|(index, _)| *index);
        rows.truncate(MAX_SEARCH_ROWS);
        rows
    }
}
