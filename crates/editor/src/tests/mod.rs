
use crate::{EditorConfig, GraphController};
use fake_bridge::FakeBridge;
use nb_core::{Node, NodeId, Position};
use std::sync::Arc;

fn id(value: &str) -> NodeId {
    NodeId::try_new(value).unwrap()
}

fn stored(value: &str, label: &str) -> Node {
    Node::new(id(value), Position::new(10.0, 20.0), label).unwrap()
}

fn seeded_config() -> EditorConfig {
    EditorConfig {
        placement_seed: Some(7),
        ..EditorConfig::default()
    }
}

/// Controller over a fake bridge already holding `nodes`, initialized.
async fn ready_controller(nodes: Vec<Node>) -> (GraphController, Arc<FakeBridge>) {
    let bridge = Arc::new(FakeBridge::with_nodes(nodes));
    let controller = GraphController::new(bridge.clone(), seeded_config());
    controller.initialize().await.expect("initialize");
    (controller, bridge)
}
