use super::*;

fn id(raw: &str) -> NodeId {
    NodeId::try_new(raw).expect("node id")
}

#[test]
fn node_id_validation() {
    assert_eq!(NodeId::try_new("").unwrap_err(), NodeIdError::Empty);
    assert_eq!(NodeId::try_new("  ").unwrap_err(), NodeIdError::Empty);
    assert_eq!(
        NodeId::try_new("bad|id").unwrap_err(),
        NodeIdError::ContainsPipe
    );
    assert_eq!(
        NodeId::try_new("bad\u{0007}id").unwrap_err(),
        NodeIdError::ContainsControl
    );
    assert_eq!(
        NodeId::try_new("x".repeat(300)).unwrap_err(),
        NodeIdError::TooLong
    );
    assert!(NodeId::try_new("n12").is_ok());
}

#[test]
fn sequence_number_only_for_n_prefixed_ids() {
    assert_eq!(id("n12").sequence_number(), Some(12));
    assert_eq!(id("node-3").sequence_number(), None);
    assert_eq!(id("n").sequence_number(), None);
}

#[test]
fn edge_ids_are_directional_and_never_collide() {
    let a = id("a");
    let b = id("b");
    let forward = EdgeId::between(&a, &b);
    let backward = EdgeId::between(&b, &a);
    assert_ne!(forward, backward);
    assert_eq!(forward.as_str(), "a|b");
    assert_eq!(forward.endpoints(), ("a", "b"));

    assert_eq!(
        EdgeId::try_new("ab").unwrap_err(),
        EdgeIdError::MissingSeparator
    );
    assert_eq!(
        EdgeId::try_new("a|b|c").unwrap_err(),
        EdgeIdError::Endpoint(NodeIdError::ContainsPipe)
    );
    assert_eq!(EdgeId::try_new("a|b").unwrap(), forward);
}

#[test]
fn node_requires_a_label() {
    assert_eq!(
        Node::new(id("n1"), Position::default(), "   ").unwrap_err(),
        LabelError::Empty
    );
    assert_eq!(
        Node::new(id("n1"), Position::default(), "a\nb").unwrap_err(),
        LabelError::ContainsControl
    );
    let node = Node::new(id("n1"), Position::new(1.0, 2.0), "Widget").unwrap();
    assert_eq!(node.description, "");
    assert_eq!(node.label, "Widget");
}

#[test]
fn edge_touches_both_endpoints() {
    let edge = Edge::connect(id("a"), id("b"));
    assert!(edge.touches(&id("a")));
    assert!(edge.touches(&id("b")));
    assert!(!edge.touches(&id("c")));
}

#[test]
fn selection_serializes_with_explicit_kind() {
    let selection = Selection::Node(id("n1"));
    let json = serde_json::to_value(&selection).unwrap();
    assert_eq!(json, serde_json::json!({ "kind": "node", "id": "n1" }));

    let edge: Selection =
        serde_json::from_value(serde_json::json!({ "kind": "edge", "id": "n1|n2" })).unwrap();
    assert_eq!(edge.edge().map(EdgeId::as_str), Some("n1|n2"));
    assert!(edge.node().is_none());
}

#[test]
fn node_ids_validate_on_deserialize() {
    let bad = serde_json::from_value::<Node>(serde_json::json!({
        "id": "bad|id",
        "position": { "x": 0.0, "y": 0.0 },
        "label": "x",
    }));
    assert!(bad.is_err());

    let good: Node = serde_json::from_value(serde_json::json!({
        "id": "n1",
        "position": { "x": 1.5, "y": -2.0 },
        "label": "x",
    }))
    .unwrap();
    assert_eq!(good.description, "");
    assert_eq!(good.position, Position::new(1.5, -2.0));
}
