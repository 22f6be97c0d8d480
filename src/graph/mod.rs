//! Arena-backed star graph: the focal node is index 0, every link points from it to one
//! peripheral node.

mod build;

use eframe::egui::Vec2;

pub use build::{ID_SEPARATOR, build};

use crate::network::ConnectionRecord;
use crate::scale::clamp_score;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Focal,
    Peripheral,
}

/// Popup payload carried by peripheral nodes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeDetail {
    pub summary: Option<String>,
    pub duration: Option<String>,
    pub entity_type: Option<String>,
    pub source_url: Option<String>,
}

impl From<&ConnectionRecord> for NodeDetail {
    fn from(record: &ConnectionRecord) -> Self {
        Self {
            summary: record.summary.clone(),
            duration: record.duration.clone(),
            entity_type: record.entity_type.clone(),
            source_url: record.source_url.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub id: String,
    pub display_name: String,
    pub role: Role,
    pub connection_score: Option<f32>,
    pub detail: Option<NodeDetail>,
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) pin: Option<Vec2>,
}

impl Node {
    pub fn focal(name: &str) -> Self {
        Self {
            id: name.to_owned(),
            display_name: name.to_owned(),
            role: Role::Focal,
            connection_score: None,
            detail: None,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            pin: None,
        }
    }

    pub fn peripheral(id: String, display_name: String, record: &ConnectionRecord) -> Self {
        Self {
            id,
            display_name,
            role: Role::Peripheral,
            connection_score: record.score,
            detail: Some(NodeDetail::from(record)),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            pin: None,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn pin(&self) -> Option<Vec2> {
        self.pin
    }

    pub fn is_pinned(&self) -> bool {
        self.pin.is_some()
    }

    pub fn is_focal(&self) -> bool {
        self.role == Role::Focal
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    pub score: f32,
}

impl Link {
    pub(crate) fn new(source: usize, target: usize, score: Option<f32>) -> Self {
        Self {
            source,
            target,
            score: clamp_score(score),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) links: Vec<Link>,
}

impl Graph {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn focal_index(&self) -> Option<usize> {
        self.nodes.iter().position(Node::is_focal)
    }

    pub fn focal(&self) -> Option<&Node> {
        self.focal_index().and_then(|index| self.nodes.get(index))
    }

    pub fn peripheral_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.role == Role::Peripheral)
            .count()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }

    /// Number of links touching each node, indexed like `nodes()`.
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0usize; self.nodes.len()];
        for link in &self.links {
            if let Some(count) = degrees.get_mut(link.source) {
                *count += 1;
            }
            if let Some(count) = degrees.get_mut(link.target) {
                *count += 1;
            }
        }
        degrees
    }
}
