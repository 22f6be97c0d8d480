use std::f32::consts::PI;

use eframe::egui::{Vec2, vec2};

use super::{Graph, Link, Node};
use crate::network::ConnectionRecord;

pub const ID_SEPARATOR: char = '_';

const SEED_RADIUS: f32 = 10.0;
const UNKNOWN_NAME: &str = "Unknown";

/// Builds the star graph for one focal artist.
///
/// A blank focal name yields an empty graph. Otherwise there is one focal node plus one
/// peripheral node and one link per record, in record order.
pub fn build(focal_name: Option<&str>, connections: &[ConnectionRecord]) -> Graph {
    let Some(focal_name) = focal_name.map(str::trim).filter(|name| !name.is_empty()) else {
        return Graph::empty();
    };

    let mut nodes = Vec::with_capacity(connections.len() + 1);
    let mut links = Vec::with_capacity(connections.len());
    nodes.push(Node::focal(focal_name));

    for (ordinal, record) in connections.iter().enumerate() {
        let name = record.name.trim();
        let display_name = if name.is_empty() { UNKNOWN_NAME } else { name };
        let id = format!("{display_name}{ID_SEPARATOR}{ordinal}");

        let index = nodes.len();
        let mut node = Node::peripheral(id, display_name.to_owned(), record);
        node.position = seed_position(index);
        nodes.push(node);
        links.push(Link::new(0, index, record.score));
    }

    tracing::debug!(
        focal = focal_name,
        nodes = nodes.len(),
        links = links.len(),
        "built connection graph"
    );

    Graph { nodes, links }
}

// Phyllotaxis spiral around the origin; gives every node a distinct, finite start.
fn seed_position(index: usize) -> Vec2 {
    let golden_angle = PI * (3.0 - 5.0_f32.sqrt());
    let radius = SEED_RADIUS * (0.5 + index as f32).sqrt();
    let angle = index as f32 * golden_angle;
    vec2(angle.cos(), angle.sin()) * radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Role;

    #[test]
    fn blank_focal_name_gives_empty_graph() {
        let connections = vec![ConnectionRecord::new("Theo")];
        assert!(build(None, &connections).is_empty());
        assert!(build(Some("   "), &connections).is_empty());
    }

    #[test]
    fn repeated_names_get_unique_ids() {
        let connections = vec![ConnectionRecord::new("Theo"), ConnectionRecord::new("Theo")];
        let graph = build(Some("Van Gogh"), &connections);

        assert_eq!(graph.nodes()[1].id, "Theo_0");
        assert_eq!(graph.nodes()[2].id, "Theo_1");
        assert_eq!(graph.nodes()[1].display_name, graph.nodes()[2].display_name);
    }

    #[test]
    fn focal_node_has_no_detail_and_peripherals_keep_theirs() {
        let connections = vec![ConnectionRecord::new("Theo").with_summary("Brother and dealer")];
        let graph = build(Some("Van Gogh"), &connections);

        let focal = graph.focal().unwrap();
        assert_eq!(focal.role, Role::Focal);
        assert!(focal.detail.is_none());

        let theo = &graph.nodes()[1];
        assert_eq!(
            theo.detail.as_ref().and_then(|detail| detail.summary.as_deref()),
            Some("Brother and dealer")
        );
    }

    #[test]
    fn seed_positions_are_distinct() {
        let connections = (0..20)
            .map(|index| ConnectionRecord::new(format!("peer {index}")))
            .collect::<Vec<_>>();
        let graph = build(Some("Van Gogh"), &connections);

        for (index, node) in graph.nodes().iter().enumerate().skip(1) {
            assert!(node.position().is_finite());
            for other in &graph.nodes()[index + 1..] {
                assert!((node.position() - other.position()).length() > 1.0);
            }
        }
    }
}
