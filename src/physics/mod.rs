//! Force-directed layout for the connection graph.
//!
//! The simulation is either `Stopped` or `Running`. While running, every `tick` decays the
//! scalar `energy` toward `energy_target`, applies spring, charge, collision and centering
//! forces to the free nodes and integrates their velocities. Pinned nodes (the focal node
//! and any node under drag) are boundary conditions: they keep their pin and take no
//! share of any correction. Once the energy and its target both fall below `energy_min`
//! the simulation stops and costs nothing until it is reheated.

mod forces;
mod quadtree;

use eframe::egui::{Vec2, vec2};
use serde::{Deserialize, Serialize};

use crate::graph::{Graph, Role};
use crate::scale::ScaleConfig;
use crate::util::stable_pair;
use forces::{
    ChargeParams, CollisionParams, Spring, apply_charge, apply_collisions, apply_springs,
    centering_shift,
};
use quadtree::Cell;

/// Energy injected when tuning parameters change under a settled layout.
pub const REHEAT_ENERGY: f32 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Many-body strength; negative values repel.
    pub charge_strength: f32,
    /// Barnes-Hut opening angle.
    pub theta: f32,
    pub distance_min: f32,
    /// `None` uses `1 / min(degree(source), degree(target))`.
    pub link_strength: Option<f32>,
    pub collision_padding: f32,
    pub collision_strength: f32,
    pub center_strength: f32,
    pub velocity_decay: f32,
    pub energy_min: f32,
    pub energy_decay: f32,
    pub drag_energy_target: f32,
    pub max_speed: f32,
    pub pin_focal: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let energy_min = 0.001_f32;
        Self {
            charge_strength: -30.0,
            theta: 0.9,
            distance_min: 1.0,
            link_strength: None,
            collision_padding: 3.0,
            collision_strength: 1.0,
            center_strength: 0.1,
            velocity_decay: 0.4,
            energy_min,
            energy_decay: 1.0 - energy_min.powf(1.0 / 300.0),
            drag_energy_target: 0.3,
            max_speed: 200.0,
            pin_focal: true,
        }
    }
}

impl SimulationConfig {
    /// Replaces values that would keep the layout from ever settling with their defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let unit = |value: f32, fallback: f32| {
            if value.is_finite() && value > 0.0 && value <= 1.0 { value } else { fallback }
        };

        Self {
            energy_decay: unit(self.energy_decay, defaults.energy_decay),
            energy_min: unit(self.energy_min, defaults.energy_min),
            velocity_decay: if self.velocity_decay.is_finite() {
                self.velocity_decay.clamp(0.0, 1.0)
            } else {
                defaults.velocity_decay
            },
            theta: if self.theta.is_finite() && self.theta >= 0.0 {
                self.theta
            } else {
                defaults.theta
            },
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationState {
    Stopped,
    Running,
}

#[derive(Default)]
struct Scratch {
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    predicted: Vec<Vec2>,
    fixed: Vec<bool>,
    collide_radii: Vec<f32>,
}

pub struct Simulation {
    graph: Graph,
    config: SimulationConfig,
    scale: ScaleConfig,
    center: Vec2,
    state: SimulationState,
    energy: f32,
    energy_target: f32,
    ticks: u64,
    radii: Vec<f32>,
    springs: Vec<Spring>,
    dragged: Option<usize>,
    scratch: Scratch,
}

impl Simulation {
    /// Takes ownership of a freshly built graph (seeded around the origin) and centres it
    /// in a viewport of `viewport` size.
    pub fn new(
        mut graph: Graph,
        config: SimulationConfig,
        scale: ScaleConfig,
        viewport: Vec2,
    ) -> Self {
        let config = config.sanitized();
        let center = viewport_center(viewport).unwrap_or(Vec2::ZERO);
        for node in &mut graph.nodes {
            node.position += center;
            node.velocity = Vec2::ZERO;
            node.pin = None;
            if node.role == Role::Focal {
                node.position = center;
                if config.pin_focal {
                    node.pin = Some(center);
                }
            }
        }

        let has_unknowns = graph.peripheral_count() > 0;
        let mut simulation = Self {
            graph,
            config,
            scale,
            center,
            state: if has_unknowns {
                SimulationState::Running
            } else {
                SimulationState::Stopped
            },
            energy: if has_unknowns { 1.0 } else { 0.0 },
            energy_target: 0.0,
            ticks: 0,
            radii: Vec::new(),
            springs: Vec::new(),
            dragged: None,
            scratch: Scratch::default(),
        };
        simulation.refresh_cached_terms();

        tracing::debug!(
            nodes = simulation.graph.len(),
            links = simulation.graph.links().len(),
            state = ?simulation.state,
            "simulation created"
        );
        simulation
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn scale(&self) -> &ScaleConfig {
        &self.scale
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SimulationState::Running
    }

    pub fn energy(&self) -> f32 {
        self.energy
    }

    pub fn energy_target(&self) -> f32 {
        self.energy_target
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn radii(&self) -> &[f32] {
        &self.radii
    }

    pub fn radius(&self, index: usize) -> Option<f32> {
        self.radii.get(index).copied()
    }

    pub fn dragged(&self) -> Option<usize> {
        self.dragged
    }

    pub fn position(&self, index: usize) -> Option<Vec2> {
        self.graph.node(index).map(|node| node.position)
    }

    /// Kinetic energy of the free nodes, `sum(|v|^2) / 2`.
    pub fn kinetic_energy(&self) -> f32 {
        self.graph
            .nodes
            .iter()
            .filter(|node| node.pin.is_none())
            .map(|node| node.velocity.length_sq() * 0.5)
            .sum()
    }

    fn has_unknowns(&self) -> bool {
        self.graph.peripheral_count() > 0
    }

    fn focal_pinned(&self) -> bool {
        self.graph.focal().is_some_and(|node| node.pin.is_some())
    }

    fn refresh_cached_terms(&mut self) {
        self.radii = self
            .graph
            .nodes
            .iter()
            .map(|node| self.scale.node_radius(node))
            .collect();

        let degrees = self.graph.degrees();
        self.springs = self
            .graph
            .links
            .iter()
            .filter(|link| {
                link.source != link.target
                    && link.source < self.graph.nodes.len()
                    && link.target < self.graph.nodes.len()
            })
            .map(|link| {
                let source_degree = degrees[link.source].max(1) as f32;
                let target_degree = degrees[link.target].max(1) as f32;
                Spring {
                    source: link.source,
                    target: link.target,
                    rest_length: self.scale.rest_length_of(Some(link.score)),
                    strength: self
                        .config
                        .link_strength
                        .unwrap_or(1.0 / source_degree.min(target_degree)),
                    bias: source_degree / (source_degree + target_degree),
                }
            })
            .collect();
    }

    /// Stops iterating immediately. Positions are left where they are.
    pub fn stop(&mut self) {
        if self.state == SimulationState::Running {
            tracing::debug!(ticks = self.ticks, "simulation stopped");
        }
        self.state = SimulationState::Stopped;
    }

    /// Raises the energy to at least `energy` and resumes iterating.
    pub fn reheat(&mut self, energy: f32) {
        self.energy = self.energy.max(energy.clamp(0.0, 1.0));
        self.restart();
    }

    pub fn set_energy_target(&mut self, target: f32) {
        self.energy_target = target.clamp(0.0, 1.0);
        if self.energy_target >= self.config.energy_min {
            self.restart();
        }
    }

    fn restart(&mut self) {
        if self.has_unknowns() && self.state == SimulationState::Stopped {
            tracing::debug!(energy = self.energy, "simulation restarted");
            self.state = SimulationState::Running;
        }
    }

    /// Fixes a node at `at`; the solver treats it as a boundary condition until unpinned.
    pub fn pin(&mut self, index: usize, at: Vec2) {
        if !at.is_finite() {
            return;
        }
        if let Some(node) = self.graph.nodes.get_mut(index) {
            node.pin = Some(at);
            node.position = at;
            node.velocity = Vec2::ZERO;
        }
    }

    pub fn unpin(&mut self, index: usize) {
        if let Some(node) = self.graph.nodes.get_mut(index) {
            node.pin = None;
        }
    }

    /// Starts a drag: pins the node at `at` and keeps the layout warm while it is held.
    /// The focal node cannot be dragged.
    pub fn begin_drag(&mut self, index: usize, at: Vec2) -> bool {
        let Some(node) = self.graph.node(index) else {
            return false;
        };
        if node.role == Role::Focal {
            return false;
        }

        if let Some(previous) = self.dragged.take()
            && previous != index
        {
            self.unpin(previous);
        }

        self.pin(index, at);
        self.dragged = Some(index);
        self.set_energy_target(self.config.drag_energy_target);
        tracing::debug!(index, "drag started");
        true
    }

    pub fn drag_to(&mut self, index: usize, at: Vec2) {
        if self.dragged == Some(index) {
            self.pin(index, at);
        }
    }

    /// Releases the node back to the solver and lets the energy decay.
    pub fn end_drag(&mut self, index: usize) {
        if self.dragged != Some(index) {
            return;
        }
        self.unpin(index);
        self.dragged = None;
        self.set_energy_target(0.0);
        tracing::debug!(index, "drag ended");
    }

    /// Moves the centre to the middle of the new viewport, translating the whole layout
    /// (pins included) so nothing is disturbed.
    pub fn set_viewport(&mut self, viewport: Vec2) {
        let Some(center) = viewport_center(viewport) else {
            return;
        };
        let shift = center - self.center;
        if shift.length_sq() <= f32::EPSILON {
            return;
        }

        for node in &mut self.graph.nodes {
            node.position += shift;
            if let Some(pin) = node.pin.as_mut() {
                *pin += shift;
            }
        }
        self.center = center;
    }

    pub fn set_config(&mut self, config: SimulationConfig) {
        let config = config.sanitized();
        if config == self.config {
            return;
        }

        self.config = config;
        if let Some(focal) = self.graph.focal_index() {
            if config.pin_focal {
                self.pin(focal, self.center);
            } else {
                self.unpin(focal);
            }
        }
        self.refresh_cached_terms();
        self.reheat(REHEAT_ENERGY);
    }

    pub fn set_scale(&mut self, scale: ScaleConfig) {
        if scale == self.scale {
            return;
        }

        self.scale = scale;
        self.refresh_cached_terms();
        self.reheat(REHEAT_ENERGY);
    }

    /// Runs ticks until idle or `max_ticks` is reached. Returns the number of ticks run.
    pub fn run_until_idle(&mut self, max_ticks: usize) -> usize {
        let mut ran = 0;
        while ran < max_ticks && self.tick() {
            ran += 1;
        }
        ran
    }

    /// Advances the layout by one step. Returns whether the simulation is still running.
    pub fn tick(&mut self) -> bool {
        if self.state == SimulationState::Stopped {
            return false;
        }

        self.energy += (self.energy_target - self.energy) * self.config.energy_decay;
        self.apply_forces();
        self.integrate();
        if !self.focal_pinned() {
            self.recenter();
        }
        self.ticks += 1;

        if self.energy < self.config.energy_min && self.energy_target < self.config.energy_min {
            self.state = SimulationState::Stopped;
            tracing::debug!(
                ticks = self.ticks,
                kinetic_energy = self.kinetic_energy(),
                "simulation idle"
            );
        }

        self.is_running()
    }

    fn apply_forces(&mut self) {
        let scratch = &mut self.scratch;
        scratch.positions.clear();
        scratch.velocities.clear();
        scratch.fixed.clear();
        for node in &self.graph.nodes {
            scratch.positions.push(node.position);
            scratch.velocities.push(node.velocity);
            scratch.fixed.push(node.pin.is_some());
        }

        apply_springs(
            &self.springs,
            &scratch.positions,
            &scratch.fixed,
            &mut scratch.velocities,
            self.energy,
        );

        if let Some(tree) = Cell::build(&scratch.positions) {
            apply_charge(
                &tree,
                &scratch.positions,
                &mut scratch.velocities,
                ChargeParams {
                    strength: self.config.charge_strength,
                    energy: self.energy,
                    theta: self.config.theta,
                    distance_min_sq: self.config.distance_min * self.config.distance_min,
                    fixed: &scratch.fixed,
                },
            );
        }

        scratch.predicted.clear();
        scratch.collide_radii.clear();
        let mut max_reach = 0.0_f32;
        for (index, position) in scratch.positions.iter().enumerate() {
            let predicted = if scratch.fixed[index] {
                *position
            } else {
                *position + scratch.velocities[index]
            };
            scratch.predicted.push(predicted);
            let radius = self.radii[index] + self.config.collision_padding;
            scratch.collide_radii.push(radius);
            max_reach = max_reach.max(radius);
        }

        if let Some(tree) = Cell::build(&scratch.predicted) {
            let reach = max_reach * 2.0;
            apply_collisions(
                &tree,
                &scratch.predicted,
                &scratch.collide_radii,
                &mut scratch.velocities,
                CollisionParams {
                    strength: self.config.collision_strength,
                    reach_sq: reach * reach,
                    fixed: &scratch.fixed,
                },
            );
        }
    }

    fn integrate(&mut self) {
        let retain = 1.0 - self.config.velocity_decay.clamp(0.0, 1.0);
        let max_speed = self.config.max_speed.max(0.0);
        let center = self.center;

        for (index, node) in self.graph.nodes.iter_mut().enumerate() {
            if let Some(pin) = node.pin {
                node.position = pin;
                node.velocity = Vec2::ZERO;
                continue;
            }

            let mut velocity = self.scratch.velocities[index] * retain;
            let speed = velocity.length();
            if speed > max_speed {
                velocity *= max_speed / speed;
            }

            let next = node.position + velocity;
            if next.is_finite() {
                node.velocity = velocity;
                node.position = next;
            } else {
                tracing::warn!(index, id = %node.id, "non-finite node position reset");
                node.velocity = Vec2::ZERO;
                node.position = center + fallback_offset(index);
            }
        }
    }

    fn recenter(&mut self) {
        self.scratch.positions.clear();
        self.scratch
            .positions
            .extend(self.graph.nodes.iter().map(|node| node.position));
        let shift = centering_shift(
            &self.scratch.positions,
            self.center,
            self.config.center_strength,
        );
        if shift == Vec2::ZERO {
            return;
        }

        for node in self.graph.nodes.iter_mut().filter(|node| node.pin.is_none()) {
            node.position += shift;
        }
    }
}

fn viewport_center(viewport: Vec2) -> Option<Vec2> {
    (viewport.is_finite() && viewport.x > 0.0 && viewport.y > 0.0).then_some(viewport * 0.5)
}

fn fallback_offset(index: usize) -> Vec2 {
    let (jx, jy) = stable_pair(&index);
    let direction = vec2(jx, jy);
    if direction.length_sq() > 1e-6 {
        direction.normalized() * 10.0
    } else {
        vec2(10.0, 0.0)
    }
}
