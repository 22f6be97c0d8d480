//! Layout and interaction engine for an artist's relationship network.
//!
//! A [`NetworkScene`] turns a focal artist plus a list of [`ConnectionRecord`]s into a star
//! graph, settles it with a force simulation and routes pointer input to drag, pan, zoom
//! and selection. Drawing is left to a [`FrameRenderer`].

pub mod config;
pub mod graph;
pub mod interaction;
pub mod network;
pub mod physics;
pub mod render;
pub mod scale;
pub mod scene;
pub mod util;

pub use config::{LayoutConfig, load_config};
pub use graph::{Graph, Link, Node, NodeDetail, Role, build};
pub use interaction::{
    InteractionConfig, InteractionController, InteractionOutcome, PointerEvent, SelectedDetail,
    Selection, ViewTransform,
};
pub use network::{ConnectionRecord, NetworkPayload, load_network, parse_network_payload};
pub use physics::{REHEAT_ENERGY, Simulation, SimulationConfig, SimulationState};
pub use render::{Frame, FrameLink, FrameNode, FrameRenderer};
pub use scale::{MAX_SCORE, MIN_SCORE, ScaleConfig, clamp_score, radius_of, rest_length_of};
pub use scene::NetworkScene;
