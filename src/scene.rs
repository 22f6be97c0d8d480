use eframe::egui::{Pos2, Vec2};

use crate::config::LayoutConfig;
use crate::graph::{Graph, build};
use crate::interaction::{
    InteractionConfig, InteractionController, InteractionOutcome, PointerEvent, SelectedDetail,
};
use crate::network::{ConnectionRecord, NetworkPayload};
use crate::physics::{Simulation, SimulationConfig};
use crate::render::{Frame, FrameRenderer};
use crate::scale::ScaleConfig;

/// Owns the single live simulation and the pointer state over it.
///
/// Replacing the data always stops the previous simulation before it is dropped, so at
/// most one layout is ever iterating.
pub struct NetworkScene {
    config: LayoutConfig,
    viewport: Vec2,
    focal_name: Option<String>,
    simulation: Option<Simulation>,
    interaction: InteractionController,
    revision: u64,
}

impl NetworkScene {
    pub fn new(config: LayoutConfig, viewport: Vec2) -> Self {
        let config = config.sanitized();
        Self {
            config,
            viewport,
            focal_name: None,
            simulation: None,
            interaction: InteractionController::new(config.interaction),
            revision: 0,
        }
    }

    pub fn set_data(&mut self, focal_name: Option<&str>, connections: &[ConnectionRecord]) {
        if let Some(mut previous) = self.simulation.take() {
            previous.stop();
        }
        self.interaction.reset();

        let graph = build(focal_name, connections);
        self.focal_name = graph.focal().map(|node| node.display_name.clone());
        self.simulation = (!graph.is_empty()).then(|| {
            Simulation::new(
                graph,
                self.config.simulation,
                self.config.scale,
                self.viewport,
            )
        });
        self.revision += 1;

        tracing::info!(
            revision = self.revision,
            focal = self.focal_name.as_deref().unwrap_or(""),
            connections = connections.len(),
            "graph rebuilt"
        );
    }

    pub fn set_payload(&mut self, payload: &NetworkPayload) {
        self.set_data(payload.artist.as_deref(), &payload.connections);
    }

    pub fn clear(&mut self) {
        self.set_data(None, &[]);
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.set_viewport(viewport);
        }
    }

    /// Runs one tick if the layout is still moving, then paints. Returns whether another
    /// frame should be scheduled.
    pub fn advance(&mut self, renderer: &mut impl FrameRenderer) -> bool {
        let running = self
            .simulation
            .as_mut()
            .is_some_and(|simulation| simulation.tick());
        renderer.paint(&self.frame());
        running
    }

    /// Settles the layout without painting. Returns the number of ticks run.
    pub fn run_until_idle(&mut self, max_ticks: usize) -> usize {
        self.simulation
            .as_mut()
            .map_or(0, |simulation| simulation.run_until_idle(max_ticks))
    }

    pub fn frame(&self) -> Frame<'_> {
        match &self.simulation {
            Some(simulation) => Frame::capture(simulation, &self.interaction),
            None => Frame::empty(self.interaction.transform()),
        }
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> InteractionOutcome {
        self.interaction.handle(event, self.simulation.as_mut())
    }

    pub fn selected_detail(&self) -> Option<SelectedDetail> {
        self.interaction.selected_detail(self.simulation.as_ref()?.graph())
    }

    /// Selects a node by index without a pointer, e.g. from a search result.
    pub fn select(&mut self, index: usize, anchor: Pos2) -> bool {
        let exists = self.graph().is_some_and(|graph| graph.node(index).is_some());
        if exists {
            self.interaction.select(index, anchor);
        }
        exists
    }

    pub fn close_popup(&mut self) -> bool {
        self.interaction.close()
    }

    /// Kicks a settled layout back to full energy.
    pub fn reheat(&mut self) {
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.reheat(1.0);
        }
    }

    pub fn reset_view(&mut self) {
        self.interaction.reset_view();
    }

    pub fn set_simulation_config(&mut self, config: SimulationConfig) {
        let config = config.sanitized();
        self.config.simulation = config;
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.set_config(config);
        }
    }

    pub fn set_scale_config(&mut self, scale: ScaleConfig) {
        self.config.scale = scale;
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.set_scale(scale);
        }
    }

    pub fn set_interaction_config(&mut self, config: InteractionConfig) {
        let config = config.sanitized();
        self.config.interaction = config;
        self.interaction.set_config(config);
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn focal_name(&self) -> Option<&str> {
        self.focal_name.as_deref()
    }

    pub fn graph(&self) -> Option<&Graph> {
        self.simulation.as_ref().map(Simulation::graph)
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.simulation.as_ref()
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    pub fn is_running(&self) -> bool {
        self.simulation.as_ref().is_some_and(Simulation::is_running)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}
