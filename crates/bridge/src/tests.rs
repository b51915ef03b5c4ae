use super::*;
use async_trait::async_trait;
use nb_core::{Node, NodeId, Position};
use nb_storage::SqliteStore;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn node(id: &str, label: &str) -> Node {
    Node::new(NodeId::try_new(id).unwrap(), Position::new(4.0, 8.0), label).unwrap()
}

fn memory_backend() -> Backend {
    Backend::new(SqliteStore::open_in_memory().expect("open store"))
}

#[test]
fn request_frames_use_named_calls() {
    let frame = RequestFrame {
        id: 7,
        request: BridgeRequest::RenameNode {
            id: NodeId::try_new("n1").unwrap(),
            label: "Renamed".to_string(),
        },
    };
    assert_eq!(
        serde_json::to_value(&frame).unwrap(),
        json!({ "id": 7, "request": { "call": "rename-node", "args": { "id": "n1", "label": "Renamed" } } })
    );

    let get: RequestFrame =
        serde_json::from_value(json!({ "id": 1, "request": { "call": "get-nodes" } })).unwrap();
    assert_eq!(get.request, BridgeRequest::GetNodes);
    assert_eq!(get.request.call_name(), "get-nodes");
}

#[test]
fn store_errors_cross_the_bridge_with_their_kind() {
    let mut backend = memory_backend();
    backend
        .handle(BridgeRequest::AddNode { node: node("n1", "A") })
        .expect("first insert");

    let conflict = backend
        .handle(BridgeRequest::AddNode { node: node("n1", "B") })
        .unwrap_err();
    assert_eq!(conflict.code, RemoteErrorCode::Conflict);

    let missing = backend
        .handle(BridgeRequest::DeleteNode {
            id: NodeId::try_new("n2").unwrap(),
        })
        .unwrap_err();
    assert_eq!(missing.code, RemoteErrorCode::NotFound);

    let invalid = backend
        .handle(BridgeRequest::RenameNode {
            id: NodeId::try_new("n1").unwrap(),
            label: " ".to_string(),
        })
        .unwrap_err();
    assert_eq!(invalid.code, RemoteErrorCode::InvalidInput);

    assert_eq!(
        backend.handle(BridgeRequest::GetNodes).unwrap(),
        BridgeReply::Nodes(vec![node("n1", "A")])
    );
}

#[test]
fn corrupt_rows_cross_the_bridge_as_storage_errors() {
    let err = RemoteError::from(nb_storage::StoreError::Corrupt("id \"a|b\"".to_string()));
    assert_eq!(err.code, RemoteErrorCode::Storage);
    assert!(err.message.contains("a|b"));
}

#[test]
fn malformed_frames_answer_with_invalid_input() {
    let mut backend = memory_backend();

    let raw = backend.handle_frame(r#"{"id": 42, "request": {"call": "explode"}}"#);
    let response: ResponseFrame = serde_json::from_str(&raw).unwrap();
    assert_eq!(response.id, 42);
    let err = response.outcome.into_result().unwrap_err();
    assert_eq!(err.code, RemoteErrorCode::InvalidInput);

    let raw = backend.handle_frame("not json");
    let response: ResponseFrame = serde_json::from_str(&raw).unwrap();
    assert_eq!(response.id, 0);
}

#[test]
fn serve_answers_one_line_per_frame() {
    let mut backend = memory_backend();
    let input = concat!(
        r#"{"id":1,"request":{"call":"add-node","args":{"node":{"id":"n1","position":{"x":1.0,"y":2.0},"label":"A","description":""}}}}"#,
        "\n\n",
        r#"{"id":2,"request":{"call":"get-nodes"}}"#,
        "\n",
    );
    let mut output = Vec::new();
    let handled = serve(&mut backend, input.as_bytes(), &mut output).unwrap();
    assert_eq!(handled, 2);

    let lines = String::from_utf8(output).unwrap();
    let frames = lines
        .lines()
        .map(|line| serde_json::from_str::<ResponseFrame>(line).unwrap())
        .collect::<Vec<_>>();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].outcome, Outcome::Ok { reply: BridgeReply::Done });
    assert_eq!(
        frames[1].outcome,
        Outcome::Ok {
            reply: BridgeReply::Nodes(vec![
                Node::new(NodeId::try_new("n1").unwrap(), Position::new(1.0, 2.0), "A").unwrap()
            ])
        }
    );
}

#[test]
fn non_utf8_lines_are_answered_and_serving_continues() {
    let mut backend = memory_backend();
    let mut input = b"\xff\xfe\n".to_vec();
    input.extend_from_slice(br#"{"id":5,"request":{"call":"get-nodes"}}"#);
    input.push(b'\n');

    let mut output = Vec::new();
    let handled = serve(&mut backend, input.as_slice(), &mut output).unwrap();
    assert_eq!(handled, 2);

    let lines = String::from_utf8(output).unwrap();
    let frames = lines
        .lines()
        .map(|line| serde_json::from_str::<ResponseFrame>(line).unwrap())
        .collect::<Vec<_>>();
    assert_eq!(frames[0].id, 0);
    let err = frames[0].outcome.clone().into_result().unwrap_err();
    assert_eq!(err.code, RemoteErrorCode::InvalidInput);
    assert_eq!(frames[1].id, 5);
    assert_eq!(
        frames[1].outcome,
        Outcome::Ok {
            reply: BridgeReply::Nodes(Vec::new())
        }
    );
}

#[test]
fn storage_dir_comes_from_the_environment_or_defaults() {
    let config = BackendConfig::from_lookup(|_| None);
    assert_eq!(config, BackendConfig::default());
    assert_eq!(config.storage_dir, std::path::PathBuf::from(DEFAULT_STORAGE_DIR));

    let config = BackendConfig::from_lookup(|key| {
        (key == STORAGE_DIR_ENV).then(|| " /tmp/nodes ".to_string())
    });
    assert_eq!(config.storage_dir, std::path::PathBuf::from("/tmp/nodes"));

    let config = BackendConfig::from_lookup(|_| Some("   ".to_string()));
    assert_eq!(config, BackendConfig::default());
}

struct Stalled {
    abandoned: Arc<AtomicUsize>,
}

#[async_trait]
impl Transport for Stalled {
    async fn roundtrip(&self, _id: u64, _frame: String) -> Result<String, BridgeError> {
        std::future::pending().await
    }

    fn abandon(&self, _id: u64) {
        self.abandoned.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test(start_paused = true)]
async fn calls_time_out_instead_of_hanging() {
    let abandoned = Arc::new(AtomicUsize::new(0));
    let bridge = RemoteBridge::new(Stalled {
        abandoned: abandoned.clone(),
    })
    .with_timeout(Duration::from_millis(250));

    let err = bridge
        .rename_node(&NodeId::try_new("n1").unwrap(), "x")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BridgeError::Timeout { call: "rename-node", after } if after == Duration::from_millis(250)
    ));
    assert_eq!(abandoned.load(Ordering::SeqCst), 1);
}

struct WrongId;

#[async_trait]
impl Transport for WrongId {
    async fn roundtrip(&self, id: u64, _frame: String) -> Result<String, BridgeError> {
        Ok(json!({ "id": id + 100, "outcome": { "status": "ok", "reply": { "kind": "done" } } })
            .to_string())
    }
}

#[tokio::test]
async fn mismatched_response_ids_are_protocol_errors() {
    let bridge = RemoteBridge::new(WrongId);
    let err = bridge
        .delete_node(&NodeId::try_new("n1").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::Protocol(_)));
}

#[tokio::test]
async fn channel_bridge_round_trips_every_call() {
    let transport = ChannelTransport::spawn(memory_backend()).expect("spawn backend");
    let bridge = RemoteBridge::new(transport);

    let a = node("n1", "Alpha");
    bridge.add_node(&a).await.expect("add");
    let err = bridge.add_node(&a).await.unwrap_err();
    assert_eq!(err.remote_code(), Some(RemoteErrorCode::Conflict));

    bridge.rename_node(&a.id, "Beta").await.expect("rename");
    bridge
        .update_node_description(&a.id, "about beta")
        .await
        .expect("describe");

    let nodes = bridge.get_nodes().await.expect("list");
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].label, "Beta");
    assert_eq!(nodes[0].description, "about beta");

    bridge.delete_node(&a.id).await.expect("delete");
    let err = bridge.delete_node(&a.id).await.unwrap_err();
    assert_eq!(err.remote_code(), Some(RemoteErrorCode::NotFound));

    let store = bridge.into_transport().shutdown().expect("shutdown");
    assert_eq!(store.count_nodes().unwrap(), 0);
    store.close().expect("close");
}

#[tokio::test]
async fn open_local_persists_to_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let bridge = open_local(dir.path()).expect("open local");
    bridge.add_node(&node("n1", "Saved")).await.expect("add");
    bridge
        .into_transport()
        .shutdown()
        .expect("shutdown")
        .close()
        .expect("close");

    let store = SqliteStore::open(dir.path()).expect("reopen");
    assert_eq!(store.list_nodes().unwrap(), vec![node("n1", "Saved")]);
}
