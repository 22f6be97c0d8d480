//! Per-tick snapshot handed to whatever draws the graph.

use eframe::egui::{Pos2, Vec2};

use crate::graph::Role;
use crate::interaction::{InteractionController, ViewTransform};
use crate::physics::Simulation;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameNode<'a> {
    pub index: usize,
    pub id: &'a str,
    pub label: &'a str,
    pub role: Role,
    pub score: Option<f32>,
    /// World coordinates; map through `Frame::transform` to get container-local pixels.
    pub position: Vec2,
    pub radius: f32,
    pub pinned: bool,
    pub selected: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameLink {
    pub source: usize,
    pub target: usize,
    pub score: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Frame<'a> {
    pub nodes: Vec<FrameNode<'a>>,
    pub links: Vec<FrameLink>,
    pub transform: ViewTransform,
    pub tick: u64,
    pub running: bool,
}

impl<'a> Frame<'a> {
    pub fn empty(transform: ViewTransform) -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
            transform,
            tick: 0,
            running: false,
        }
    }

    pub fn capture(simulation: &'a Simulation, interaction: &InteractionController) -> Self {
        let graph = simulation.graph();
        let selected = interaction.selected();

        let nodes = graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(index, node)| FrameNode {
                index,
                id: &node.id,
                label: &node.display_name,
                role: node.role,
                score: node.connection_score,
                position: node.position(),
                radius: simulation.radius(index).unwrap_or_default(),
                pinned: node.is_pinned(),
                selected: selected == Some(index),
            })
            .collect();

        let links = graph
            .links()
            .iter()
            .map(|link| FrameLink {
                source: link.source,
                target: link.target,
                score: link.score,
            })
            .collect();

        Self {
            nodes,
            links,
            transform: interaction.transform(),
            tick: simulation.ticks(),
            running: simulation.is_running(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn screen_position(&self, index: usize) -> Option<Pos2> {
        self.nodes
            .get(index)
            .map(|node| self.transform.world_to_screen(node.position))
    }

    pub fn screen_radius(&self, node: &FrameNode<'_>) -> f32 {
        node.radius * self.transform.scale
    }

    /// Endpoints of every link in container-local coordinates.
    pub fn link_segments(&self) -> impl Iterator<Item = (&FrameLink, Pos2, Pos2)> + '_ {
        self.links.iter().filter_map(|link| {
            let from = self.screen_position(link.source)?;
            let to = self.screen_position(link.target)?;
            Some((link, from, to))
        })
    }
}

/// Implemented by the drawing surface. Called once per advanced frame.
pub trait FrameRenderer {
    fn paint(&mut self, frame: &Frame<'_>);
}
