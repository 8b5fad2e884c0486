use async_trait::async_trait;
use openrpc_document::{OpenRpcError, ValidatedDocument};
use ras_jsonrpc_types::error_codes;
use ras_openrpc_client::{
    ClientError, ClientResult, ClientState, JsonRpcClient, Transport, TransportEvent,
};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// Transport that hands every sent frame to the test and can be told to fail.
struct MockTransport {
    sent: mpsc::UnboundedSender<String>,
    fail_sends: Arc<AtomicBool>,
    open: AtomicBool,
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, text: String) -> ClientResult<()> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(ClientError::connection("socket not writable"));
        }
        let _ = self.sent.send(text);
        Ok(())
    }

    async fn close(&self) -> ClientResult<()> {
        self.open.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

struct Harness {
    client: JsonRpcClient,
    events: mpsc::Sender<TransportEvent>,
    sent: mpsc::UnboundedReceiver<String>,
    fail_sends: Arc<AtomicBool>,
}

impl Harness {
    async fn open() -> Self {
        let harness = Self::connecting();
        harness.events.send(TransportEvent::Open).await.unwrap();
        let mut changes = harness.client.state_changes();
        changes
            .wait_for(|state| *state == ClientState::Open)
            .await
            .unwrap();
        harness
    }

    fn connecting() -> Self {
        let (events_tx, events_rx) = mpsc::channel(32);
        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        let fail_sends = Arc::new(AtomicBool::new(false));
        let transport = MockTransport {
            sent: sent_tx,
            fail_sends: Arc::clone(&fail_sends),
            open: AtomicBool::new(true),
        };

        Self {
            client: JsonRpcClient::with_transport(document(), transport, events_rx),
            events: events_tx,
            sent: sent_rx,
            fail_sends,
        }
    }

    /// Next frame the client sent, parsed
    async fn next_request(&mut self) -> Value {
        let text = tokio::time::timeout(Duration::from_secs(5), self.sent.recv())
            .await
            .expect("client did not send a request")
            .expect("transport dropped");
        serde_json::from_str(&text).unwrap()
    }

    async fn deliver(&self, message: Value) {
        self.events
            .send(TransportEvent::Message(message.to_string()))
            .await
            .unwrap();
    }
}

fn document() -> ValidatedDocument {
    ValidatedDocument::from_value(json!({
        "openrpc": "1.3.2",
        "info": {"title": "Game server", "version": "1.0.0"},
        "methods": [
            {
                "name": "ping",
                "params": [],
                "result": {"name": "reply", "schema": {"type": "string"}}
            },
            {
                "name": "add",
                "params": [
                    {"name": "a", "required": true, "schema": {"type": "integer"}},
                    {"name": "b", "schema": {"type": "integer"}}
                ],
                "result": {"name": "sum", "schema": {"type": "integer"}}
            },
            {
                "name": "tick",
                "params": [{"name": "n", "schema": {"type": "integer"}}]
            },
            {
                "name": "walk",
                "params": [
                    {"name": "root", "required": true, "schema": {"$ref": "#/components/schemas/Node"}}
                ],
                "result": {"name": "visited", "schema": {"type": "integer"}}
            }
        ],
        "components": {
            "schemas": {
                "Node": {
                    "type": "object",
                    "properties": {"children": {"type": "array", "items": {"$ref": "#/components/schemas/Node"}}}
                }
            }
        }
    }))
    .unwrap()
}

#[tokio::test]
async fn test_ping_without_params() {
    let mut harness = Harness::open().await;

    let client = harness.client.clone();
    let call = tokio::spawn(async move { client.call("ping", vec![]).await });

    let request = harness.next_request().await;
    assert_eq!(request, json!({"jsonrpc": "2.0", "method": "ping", "id": 1}));
    assert!(request.get("params").is_none());

    harness
        .deliver(json!({"jsonrpc": "2.0", "id": 1, "result": "pong"}))
        .await;

    assert_eq!(call.await.unwrap().unwrap(), json!("pong"));
    assert_eq!(harness.client.pending_requests_count(), 0);
}

#[tokio::test]
async fn test_out_of_order_responses() {
    let mut harness = Harness::open().await;

    let client = harness.client.clone();
    let first = tokio::spawn(async move { client.call_as::<i64>("add", vec![json!(1), json!(2)]).await });
    let first_request = harness.next_request().await;

    let client = harness.client.clone();
    let second = tokio::spawn(async move { client.call_as::<i64>("add", vec![json!(10)]).await });
    let second_request = harness.next_request().await;

    assert_eq!(first_request["params"], json!([1, 2]));
    assert_eq!(second_request["params"], json!([10]));
    let first_id = first_request["id"].as_u64().unwrap();
    let second_id = second_request["id"].as_u64().unwrap();
    assert!(second_id > first_id);

    harness
        .deliver(json!({"jsonrpc": "2.0", "id": second_id, "result": 10}))
        .await;
    harness
        .deliver(json!({"jsonrpc": "2.0", "id": first_id, "result": 3}))
        .await;

    assert_eq!(first.await.unwrap().unwrap(), 3);
    assert_eq!(second.await.unwrap().unwrap(), 10);
}

#[tokio::test]
async fn test_close_fails_pending_calls() {
    let mut harness = Harness::open().await;

    let client = harness.client.clone();
    let call = tokio::spawn(async move { client.call("ping", vec![]).await });
    harness.next_request().await;
    assert_eq!(harness.client.pending_requests_count(), 1);

    harness
        .events
        .send(TransportEvent::Close {
            reason: Some("server shutting down".to_string()),
        })
        .await
        .unwrap();

    let err = call.await.unwrap().unwrap_err();
    assert_eq!(err.code(), Some(error_codes::INTERNAL_ERROR));
    assert_eq!(err.rpc_error().unwrap().message, "Connection closed");
    assert_eq!(harness.client.pending_requests_count(), 0);
    assert_eq!(harness.client.state(), ClientState::Closed);
}

#[tokio::test]
async fn test_transport_error_closes_connection() {
    let mut harness = Harness::open().await;

    let client = harness.client.clone();
    let call = tokio::spawn(async move { client.call("ping", vec![]).await });
    harness.next_request().await;

    harness
        .events
        .send(TransportEvent::Error("connection reset".to_string()))
        .await
        .unwrap();

    let err = call.await.unwrap().unwrap_err();
    assert_eq!(err.code(), Some(error_codes::INTERNAL_ERROR));
    harness.client.wait_closed().await;

    let err = harness.client.call("ping", vec![]).await.unwrap_err();
    assert!(matches!(err, ClientError::NotConnected));
}

#[tokio::test]
async fn test_explicit_close() {
    let mut harness = Harness::open().await;

    let client = harness.client.clone();
    let call = tokio::spawn(async move { client.call("ping", vec![]).await });
    harness.next_request().await;

    harness.client.close().await.unwrap();

    let err = call.await.unwrap().unwrap_err();
    assert_eq!(err.code(), Some(error_codes::INTERNAL_ERROR));
    assert_eq!(harness.client.pending_requests_count(), 0);
}

#[tokio::test]
async fn test_notification_delivered_once() {
    let harness = Harness::open().await;

    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    harness
        .client
        .add_event_listener("tick", move |params| sink.lock().unwrap().push(params.clone()))
        .unwrap();

    harness
        .deliver(json!({"jsonrpc": "2.0", "method": "tick", "params": [1]}))
        .await;
    // Closing flushes the dispatcher: every earlier event has been handled.
    harness.events.send(TransportEvent::Close { reason: None }).await.unwrap();
    harness.client.wait_closed().await;

    assert_eq!(*received.lock().unwrap(), vec![json!([1])]);
}

#[tokio::test]
async fn test_notification_without_params_is_null() {
    let harness = Harness::open().await;

    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    harness
        .client
        .add_event_listener("tick", move |params| sink.lock().unwrap().push(params.clone()))
        .unwrap();

    harness.deliver(json!({"jsonrpc": "2.0", "method": "tick"})).await;
    harness.events.send(TransportEvent::Close { reason: None }).await.unwrap();
    harness.client.wait_closed().await;

    assert_eq!(*received.lock().unwrap(), vec![Value::Null]);
}

#[tokio::test]
async fn test_removed_listener_is_not_called() {
    let harness = Harness::open().await;

    let kept = Arc::new(Mutex::new(0));
    let removed = Arc::new(Mutex::new(0));

    let counter = Arc::clone(&kept);
    harness
        .client
        .add_event_listener("tick", move |_| *counter.lock().unwrap() += 1)
        .unwrap();
    let counter = Arc::clone(&removed);
    let id = harness
        .client
        .add_event_listener("tick", move |_| *counter.lock().unwrap() += 1)
        .unwrap();
    assert!(harness.client.remove_event_listener("tick", id));

    harness
        .deliver(json!({"jsonrpc": "2.0", "method": "tick", "params": [2]}))
        .await;
    harness.events.send(TransportEvent::Close { reason: None }).await.unwrap();
    harness.client.wait_closed().await;

    assert_eq!(*kept.lock().unwrap(), 1);
    assert_eq!(*removed.lock().unwrap(), 0);
}

#[tokio::test]
async fn test_application_error_passes_through() {
    let mut harness = Harness::open().await;

    let client = harness.client.clone();
    let call = tokio::spawn(async move { client.call("add", vec![json!(1)]).await });
    let request = harness.next_request().await;

    harness
        .deliver(json!({
            "jsonrpc": "2.0",
            "id": request["id"],
            "error": {"code": 4001, "message": "Server not running", "data": {"server": "lobby"}}
        }))
        .await;

    let err = call.await.unwrap().unwrap_err();
    let rpc = err.rpc_error().unwrap();
    assert_eq!(rpc.code, 4001);
    assert_eq!(rpc.message, "Server not running");
    assert_eq!(rpc.data, Some(json!({"server": "lobby"})));
}

#[tokio::test]
async fn test_send_failure_fails_only_that_call() {
    let mut harness = Harness::open().await;

    let client = harness.client.clone();
    let survivor = tokio::spawn(async move { client.call("ping", vec![]).await });
    let request = harness.next_request().await;

    harness.fail_sends.store(true, Ordering::SeqCst);
    let err = harness.client.call("ping", vec![]).await.unwrap_err();
    assert_eq!(err.code(), Some(error_codes::INTERNAL_ERROR));
    assert!(err.rpc_error().unwrap().message.starts_with("Failed to send request"));
    assert_eq!(harness.client.pending_requests_count(), 1);
    assert_eq!(harness.client.state(), ClientState::Open);

    harness
        .deliver(json!({"jsonrpc": "2.0", "id": request["id"], "result": "pong"}))
        .await;
    assert_eq!(survivor.await.unwrap().unwrap(), json!("pong"));
}

#[tokio::test]
async fn test_unmatched_and_malformed_messages_are_ignored() {
    let mut harness = Harness::open().await;

    let client = harness.client.clone();
    let call = tokio::spawn(async move { client.call("ping", vec![]).await });
    let request = harness.next_request().await;

    harness
        .deliver(json!({"jsonrpc": "2.0", "id": 999, "result": "stray"}))
        .await;
    harness
        .events
        .send(TransportEvent::Message("{not json".to_string()))
        .await
        .unwrap();
    harness.deliver(json!([1, 2, 3])).await;
    harness
        .deliver(json!({"jsonrpc": "2.0", "method": "unknown/event", "params": {}}))
        .await;
    harness
        .deliver(json!({"jsonrpc": "2.0", "id": request["id"], "result": "pong"}))
        .await;

    assert_eq!(call.await.unwrap().unwrap(), json!("pong"));
    assert_eq!(harness.client.state(), ClientState::Open);
}

#[tokio::test]
async fn test_call_waits_while_connecting() {
    let mut harness = Harness::connecting();
    assert_eq!(harness.client.state(), ClientState::Connecting);

    let client = harness.client.clone();
    let call = tokio::spawn(async move { client.call("ping", vec![]).await });

    tokio::task::yield_now().await;
    assert!(harness.sent.try_recv().is_err());

    harness.events.send(TransportEvent::Open).await.unwrap();
    let request = harness.next_request().await;
    harness
        .deliver(json!({"jsonrpc": "2.0", "id": request["id"], "result": "pong"}))
        .await;

    assert_eq!(call.await.unwrap().unwrap(), json!("pong"));
}

#[tokio::test]
async fn test_ids_strictly_increase() {
    let mut harness = Harness::open().await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        let client = harness.client.clone();
        tokio::spawn(async move { client.call("ping", vec![]).await });
        ids.push(harness.next_request().await["id"].as_u64().unwrap());
    }
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(ids[0], 1);
}

#[tokio::test]
async fn test_subscribing_to_request_method_is_rejected() {
    let harness = Harness::open().await;

    let err = harness.client.add_event_listener("ping", |_| {}).unwrap_err();
    assert!(matches!(err, ClientError::UnknownNotification(name) if name == "ping"));

    let err = harness.client.add_event_listener("missing", |_| {}).unwrap_err();
    assert!(matches!(err, ClientError::UnknownNotification(_)));
}

#[tokio::test]
async fn test_argument_checks() {
    let harness = Harness::open().await;

    let err = harness.client.call("tick", vec![json!(1)]).await.unwrap_err();
    assert!(matches!(err, ClientError::NotARequest(name) if name == "tick"));

    let err = harness.client.call("nope", vec![]).await.unwrap_err();
    assert!(matches!(err, ClientError::UnknownMethod(name) if name == "nope"));

    let err = harness.client.call("add", vec![]).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidArguments { .. }));

    let err = harness
        .client
        .call("add", vec![json!(1), json!(2), json!(3)])
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidArguments { .. }));

    assert_eq!(harness.client.pending_requests_count(), 0);
}

#[tokio::test]
async fn test_recursive_parameter_schema_is_callable() {
    let mut harness = Harness::open().await;

    let client = harness.client.clone();
    let tree = json!({"children": [{"children": []}]});
    let call = tokio::spawn(async move { client.call("walk", vec![tree]).await });

    let request = harness.next_request().await;
    assert_eq!(request["method"], "walk");
    assert_eq!(request["params"][0]["children"][0], json!({"children": []}));

    harness
        .deliver(json!({"jsonrpc": "2.0", "id": request["id"], "result": 2}))
        .await;
    assert_eq!(call.await.unwrap().unwrap(), json!(2));

    let err = harness.client.call("walk", vec![]).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidArguments { .. }));
}

#[test]
fn test_gate_rejects_invalid_document() {
    let err = ValidatedDocument::from_value(json!({
        "openrpc": "1.3.2",
        "info": {"title": "Broken", "version": "1.0.0"},
        "methods": [
            {
                "name": "get",
                "params": [{"$ref": "#/components/contentDescriptors/missing"}],
                "result": {"name": "r", "schema": {"$ref": "#/components/schemas/Nope"}}
            }
        ],
        "components": {"schemas": {}}
    }))
    .unwrap_err();

    match err {
        OpenRpcError::InvalidReferences { references } => assert_eq!(
            references,
            vec![
                "#/components/contentDescriptors/missing".to_string(),
                "#/components/schemas/Nope".to_string()
            ]
        ),
        other => panic!("unexpected error: {other}"),
    }
}
