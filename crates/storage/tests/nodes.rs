use nb_core::{Node, NodeId, Position};
use nb_storage::{DB_FILE_NAME, SqliteStore, StoreError};

fn node(id: &str, label: &str, x: f64, y: f64) -> Node {
    Node::new(NodeId::try_new(id).expect("node id"), Position::new(x, y), label).expect("node")
}

#[test]
fn inserted_nodes_round_trip_through_list() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = SqliteStore::open(dir.path()).expect("open store");

    let a = node("n1", "Alpha", 12.5, -3.0).with_description("first");
    let b = node("n2", "Beta", 0.0, 400.25);
    store.insert_node(&a).expect("insert a");
    store.insert_node(&b).expect("insert b");

    assert_eq!(store.list_nodes().expect("list"), vec![a, b]);
    assert!(dir.path().join(DB_FILE_NAME).is_file());
}

#[test]
fn duplicate_insert_is_a_conflict_and_leaves_store_unchanged() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = SqliteStore::open(dir.path()).expect("open store");

    let original = node("n1", "Original", 1.0, 1.0);
    store.insert_node(&original).expect("insert");

    let err = store
        .insert_node(&node("n1", "Impostor", 9.0, 9.0))
        .expect_err("duplicate id must be rejected");
    assert!(matches!(err, StoreError::Conflict { ref id } if id == "n1"));
    assert_eq!(store.list_nodes().expect("list"), vec![original]);
}

#[test]
fn deleted_nodes_never_come_back() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = SqliteStore::open(dir.path()).expect("open store");

    store.insert_node(&node("n1", "A", 0.0, 0.0)).expect("insert");
    store.insert_node(&node("n2", "B", 0.0, 0.0)).expect("insert");

    let n1 = NodeId::try_new("n1").unwrap();
    store.delete_node(&n1).expect("delete");

    let ids = store
        .list_nodes()
        .expect("list")
        .into_iter()
        .map(|n| n.id.into_string())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["n2".to_string()]);

    let err = store.delete_node(&n1).expect_err("second delete is unknown");
    assert_eq!(err.code(), "UNKNOWN_ID");
}

#[test]
fn updates_on_unknown_ids_do_not_touch_other_rows() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = SqliteStore::open(dir.path()).expect("open store");

    let kept = node("n1", "Keep", 5.0, 5.0).with_description("untouched");
    store.insert_node(&kept).expect("insert");

    let ghost = NodeId::try_new("n99").unwrap();
    assert!(store.rename_node(&ghost, "Renamed").is_err());
    assert!(store.update_node_description(&ghost, "changed").is_err());

    assert_eq!(store.list_nodes().expect("list"), vec![kept]);
}

#[test]
fn rename_and_describe_update_only_their_field() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = SqliteStore::open(dir.path()).expect("open store");
    store.insert_node(&node("n1", "Before", 7.0, 8.0)).expect("insert");

    let id = NodeId::try_new("n1").unwrap();
    store.rename_node(&id, "After").expect("rename");
    store.update_node_description(&id, "notes").expect("describe");
    store.update_node_description(&id, "").expect("descriptions may be cleared");

    let row = store.list_nodes().expect("list").remove(0);
    assert_eq!(row.label, "After");
    assert_eq!(row.description, "");
    assert_eq!(row.position, Position::new(7.0, 8.0));
}

#[test]
fn data_survives_close_and_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = SqliteStore::open(dir.path()).expect("open store");
    store.insert_node(&node("n1", "Persisted", 1.0, 2.0)).expect("insert");
    assert_eq!(store.storage_dir(), Some(dir.path()));
    store.close().expect("close");

    let store = SqliteStore::open(dir.path()).expect("reopen");
    assert_eq!(store.count_nodes().expect("count"), 1);
    assert_eq!(store.list_nodes().expect("list")[0].label, "Persisted");
}

#[test]
fn list_preserves_insertion_order() {
    let mut store = SqliteStore::open_in_memory().expect("open");
    for (id, label) in [("zeta", "Z"), ("alpha", "A"), ("mid", "M")] {
        store.insert_node(&node(id, label, 0.0, 0.0)).expect("insert");
    }
    let labels = store
        .list_nodes()
        .expect("list")
        .into_iter()
        .map(|n| n.label)
        .collect::<Vec<_>>();
    assert_eq!(labels, vec!["Z", "A", "M"]);
}
