use futures::{SinkExt, StreamExt};
use openrpc_document::ValidatedDocument;
use ras_openrpc_client::{ClientConfig, ClientError, ClientState, JsonRpcClient};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::{
    Message,
    handshake::server::{ErrorResponse, Request, Response},
};

fn document() -> ValidatedDocument {
    ValidatedDocument::from_value(json!({
        "openrpc": "1.3.2",
        "info": {"title": "Echo", "version": "1.0.0"},
        "methods": [
            {"name": "ping", "params": [], "result": {"name": "reply", "schema": {"type": "string"}}},
            {"name": "tick", "params": [{"name": "n", "schema": {"type": "integer"}}]}
        ]
    }))
    .unwrap()
}

/// Accept one connection, answer a single request with "pong", push a `tick`
/// notification and close.
async fn serve_once(listener: TcpListener, auth_header: oneshot::Sender<Option<String>>) {
    let (stream, _) = listener.accept().await.unwrap();

    let callback = move |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
        let value = request
            .headers()
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let _ = auth_header.send(value);
        Ok(response)
    };
    let mut ws = tokio_tungstenite::accept_hdr_async(stream, callback)
        .await
        .unwrap();

    while let Some(Ok(message)) = ws.next().await {
        let Message::Text(text) = message else {
            continue;
        };
        let request: Value = serde_json::from_str(text.as_str()).unwrap();
        assert_eq!(request["method"], "ping");

        let reply = json!({"jsonrpc": "2.0", "id": request["id"], "result": "pong"});
        ws.send(Message::Text(reply.to_string().into())).await.unwrap();

        let tick = json!({"jsonrpc": "2.0", "method": "tick", "params": [1]});
        ws.send(Message::Text(tick.to_string().into())).await.unwrap();

        ws.close(None).await.unwrap();
        break;
    }
}

#[tokio::test]
async fn test_round_trip_over_websocket() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (header_tx, header_rx) = oneshot::channel();
    let server = tokio::spawn(serve_once(listener, header_tx));

    let config = ClientConfig::new(format!("ws://{}", addr)).with_bearer_token("s3cret");
    let client = JsonRpcClient::connect(config, document()).await.unwrap();

    assert_eq!(header_rx.await.unwrap().as_deref(), Some("Bearer s3cret"));

    let ticks = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&ticks);
    client
        .add_event_listener("tick", move |params| sink.lock().unwrap().push(params.clone()))
        .unwrap();

    let reply: String = client.call_as("ping", vec![]).await.unwrap();
    assert_eq!(reply, "pong");

    tokio::time::timeout(Duration::from_secs(5), client.wait_closed())
        .await
        .unwrap();
    assert_eq!(client.state(), ClientState::Closed);
    assert_eq!(*ticks.lock().unwrap(), vec![json!([1])]);

    server.await.unwrap();
}

#[tokio::test]
async fn test_invalid_configuration_is_rejected() {
    let config = ClientConfig::new("http://127.0.0.1:1");
    let err = JsonRpcClient::connect(config, document()).await.unwrap_err();
    assert!(matches!(err, ClientError::Configuration(_)));
}
