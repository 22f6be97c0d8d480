//! Pointer state machine layered over the simulated scene.
//!
//! Transitions:
//! - `Idle --down on node--> Node` (non-focal nodes are pinned under the pointer)
//! - `Idle --down on background--> Background` (resets `gesture_occurred`)
//! - `Node --move--> Node` (pin follows the pointer)
//! - `Background --move beyond tolerance--> Background` (pans, sets `gesture_occurred`)
//! - `Node --up--> Idle` (unpins; selects the node if the pointer never left tolerance)
//! - `Background --up--> Idle` (clears the selection unless a gesture occurred)
//!
//! Wheel events zoom about the pointer in any state and count as a gesture.
//! All positions are container-local screen coordinates.

use eframe::egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use crate::graph::{Graph, NodeDetail, Role};
use crate::physics::Simulation;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    /// Pointer travel (screen units) below which a press still counts as a click.
    pub click_tolerance: f32,
    pub wheel_sensitivity: f32,
}

impl InteractionConfig {
    /// Orders the zoom bounds and replaces non-finite or non-positive values with defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let positive = |value: f32, fallback: f32| {
            if value.is_finite() && value > 0.0 { value } else { fallback }
        };

        let mut min_scale = positive(self.min_scale, defaults.min_scale);
        let mut max_scale = positive(self.max_scale, defaults.max_scale);
        if min_scale > max_scale {
            std::mem::swap(&mut min_scale, &mut max_scale);
        }

        Self {
            min_scale,
            max_scale,
            click_tolerance: if self.click_tolerance.is_finite() {
                self.click_tolerance.max(0.0)
            } else {
                defaults.click_tolerance
            },
            wheel_sensitivity: if self.wheel_sensitivity.is_finite() {
                self.wheel_sensitivity
            } else {
                defaults.wheel_sensitivity
            },
        }
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 8.0,
            click_tolerance: 3.0,
            wheel_sensitivity: 0.002,
        }
    }
}

/// `screen = translation + world * scale`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub translation: Vec2,
    pub scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl ViewTransform {
    pub fn world_to_screen(&self, world: Vec2) -> Pos2 {
        (self.translation + world * self.scale).to_pos2()
    }

    pub fn screen_to_world(&self, screen: Pos2) -> Vec2 {
        (screen.to_vec2() - self.translation) / self.scale
    }

    /// Scales by `factor` keeping the world point under `anchor` fixed. Returns whether the
    /// transform changed.
    pub fn zoom_about(&mut self, anchor: Pos2, factor: f32, min_scale: f32, max_scale: f32) -> bool {
        if !factor.is_finite()
            || factor <= 0.0
            || min_scale.is_nan()
            || max_scale.is_nan()
            || min_scale > max_scale
        {
            return false;
        }

        let world = self.screen_to_world(anchor);
        let scale = (self.scale * factor).clamp(min_scale, max_scale);
        if (scale - self.scale).abs() <= f32::EPSILON {
            return false;
        }

        self.scale = scale;
        self.translation = anchor.to_vec2() - world * scale;
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down(Pos2),
    Move(Pos2),
    Up(Pos2),
    Wheel { pos: Pos2, delta: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionOutcome {
    None,
    DragStarted(usize),
    Dragged(usize),
    DragEnded(usize),
    Selected(usize),
    SelectionCleared,
    Panned,
    Zoomed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Press {
    Idle,
    Node {
        index: usize,
        origin: Pos2,
        moved: bool,
        draggable: bool,
    },
    Background {
        origin: Pos2,
        start_translation: Vec2,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Selection {
    pub index: usize,
    /// Where the popup is anchored, container-local.
    pub anchor: Pos2,
}

/// What the popup surface shows for the selected node.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedDetail {
    pub index: usize,
    pub role: Role,
    pub display_name: String,
    pub detail: Option<NodeDetail>,
    pub anchor: Pos2,
}

pub struct InteractionController {
    config: InteractionConfig,
    transform: ViewTransform,
    press: Press,
    gesture_occurred: bool,
    selection: Option<Selection>,
}

impl InteractionController {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config: config.sanitized(),
            transform: ViewTransform::default(),
            press: Press::Idle,
            gesture_occurred: false,
            selection: None,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: InteractionConfig) {
        let config = config.sanitized();
        self.config = config;
        self.transform.scale = self
            .transform
            .scale
            .clamp(config.min_scale, config.max_scale);
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn reset_view(&mut self) {
        self.transform = ViewTransform::default();
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn selected(&self) -> Option<usize> {
        self.selection.map(|selection| selection.index)
    }

    pub fn gesture_occurred(&self) -> bool {
        self.gesture_occurred
    }

    pub fn is_pressed(&self) -> bool {
        self.press != Press::Idle
    }

    pub fn dragging(&self) -> Option<usize> {
        match self.press {
            Press::Node {
                index,
                draggable: true,
                ..
            } => Some(index),
            _ => None,
        }
    }

    /// Selecting replaces any previous selection.
    pub fn select(&mut self, index: usize, anchor: Pos2) {
        self.selection = Some(Selection { index, anchor });
    }

    /// Explicit popup close. Returns whether something was selected.
    pub fn close(&mut self) -> bool {
        self.selection.take().is_some()
    }

    /// Forgets everything tied to the previous graph. The view transform is kept.
    pub fn reset(&mut self) {
        self.press = Press::Idle;
        self.gesture_occurred = false;
        self.selection = None;
    }

    pub fn selected_detail(&self, graph: &Graph) -> Option<SelectedDetail> {
        let selection = self.selection?;
        let node = graph.node(selection.index)?;
        Some(SelectedDetail {
            index: selection.index,
            role: node.role,
            display_name: node.display_name.clone(),
            detail: node.detail.clone(),
            anchor: selection.anchor,
        })
    }

    /// Nearest node whose disc contains `pos`.
    pub fn hit_test(&self, simulation: &Simulation, pos: Pos2) -> Option<usize> {
        let world = self.transform.screen_to_world(pos);
        simulation
            .graph()
            .nodes()
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let distance = (node.position() - world).length();
                let radius = simulation.radius(index)?;
                (distance <= radius).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    pub fn handle(
        &mut self,
        event: PointerEvent,
        simulation: Option<&mut Simulation>,
    ) -> InteractionOutcome {
        match event {
            PointerEvent::Down(pos) => self.pointer_down(pos, simulation),
            PointerEvent::Move(pos) => self.pointer_move(pos, simulation),
            PointerEvent::Up(pos) => self.pointer_up(pos, simulation),
            PointerEvent::Wheel { pos, delta } => self.wheel(pos, delta),
        }
    }

    fn beyond_tolerance(&self, origin: Pos2, pos: Pos2) -> bool {
        origin.distance(pos) > self.config.click_tolerance
    }

    fn pointer_down(
        &mut self,
        pos: Pos2,
        mut simulation: Option<&mut Simulation>,
    ) -> InteractionOutcome {
        // A down without a matching up (pointer released outside the surface).
        if let Press::Node {
            index,
            draggable: true,
            ..
        } = self.press
            && let Some(sim) = simulation.as_deref_mut()
        {
            sim.end_drag(index);
        }
        self.press = Press::Idle;

        let hit = simulation
            .as_deref()
            .and_then(|sim| self.hit_test(sim, pos));

        match (hit, simulation) {
            (Some(index), Some(sim)) => {
                let world = self.transform.screen_to_world(pos);
                let draggable = sim.begin_drag(index, world);
                self.press = Press::Node {
                    index,
                    origin: pos,
                    moved: false,
                    draggable,
                };
                if draggable {
                    InteractionOutcome::DragStarted(index)
                } else {
                    InteractionOutcome::None
                }
            }
            _ => {
                self.press = Press::Background {
                    origin: pos,
                    start_translation: self.transform.translation,
                };
                self.gesture_occurred = false;
                InteractionOutcome::None
            }
        }
    }

    fn pointer_move(&mut self, pos: Pos2, simulation: Option<&mut Simulation>) -> InteractionOutcome {
        match self.press {
            Press::Idle => InteractionOutcome::None,
            Press::Node {
                index,
                origin,
                moved,
                draggable,
            } => {
                let moved = moved || self.beyond_tolerance(origin, pos);
                self.press = Press::Node {
                    index,
                    origin,
                    moved,
                    draggable,
                };
                if !draggable {
                    return InteractionOutcome::None;
                }
                if let Some(sim) = simulation {
                    sim.drag_to(index, self.transform.screen_to_world(pos));
                }
                InteractionOutcome::Dragged(index)
            }
            Press::Background {
                origin,
                start_translation,
            } => {
                if !self.gesture_occurred && !self.beyond_tolerance(origin, pos) {
                    return InteractionOutcome::None;
                }
                self.gesture_occurred = true;
                self.transform.translation = start_translation + (pos - origin);
                InteractionOutcome::Panned
            }
        }
    }

    fn pointer_up(&mut self, pos: Pos2, simulation: Option<&mut Simulation>) -> InteractionOutcome {
        match std::mem::replace(&mut self.press, Press::Idle) {
            Press::Idle => InteractionOutcome::None,
            Press::Node {
                index,
                origin,
                moved,
                draggable,
            } => {
                if draggable && let Some(sim) = simulation {
                    sim.end_drag(index);
                }

                if moved || self.beyond_tolerance(origin, pos) {
                    if draggable {
                        InteractionOutcome::DragEnded(index)
                    } else {
                        InteractionOutcome::None
                    }
                } else {
                    self.select(index, pos);
                    InteractionOutcome::Selected(index)
                }
            }
            Press::Background { .. } => {
                if self.gesture_occurred {
                    InteractionOutcome::None
                } else if self.close() {
                    InteractionOutcome::SelectionCleared
                } else {
                    InteractionOutcome::None
                }
            }
        }
    }

    fn wheel(&mut self, pos: Pos2, delta: f32) -> InteractionOutcome {
        if delta == 0.0 || !delta.is_finite() {
            return InteractionOutcome::None;
        }

        self.gesture_occurred = true;
        let factor = 2.0_f32.powf(-delta * self.config.wheel_sensitivity);
        if self
            .transform
            .zoom_about(pos, factor, self.config.min_scale, self.config.max_scale)
        {
            InteractionOutcome::Zoomed
        } else {
            InteractionOutcome::None
        }
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}
