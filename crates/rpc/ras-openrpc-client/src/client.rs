//! The document-driven JSON-RPC client

use crate::{
    ClientState, ListenerId, NotificationHandler, PendingRequest, Transport, TransportEvent,
    config::ClientConfig,
    error::{ClientError, ClientResult},
    native::WebSocketTransport,
};
use dashmap::DashMap;
use openrpc_document::{OpenRpcError, ValidatedDocument};
use ras_jsonrpc_types::{IncomingMessage, JsonRpcError, JsonRpcRequest};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, trace, warn};

/// JSON-RPC client bound to one connection and one validated document.
///
/// Cloning is cheap; all clones share the connection, the pending table and the
/// listener registry.
#[derive(Clone)]
pub struct JsonRpcClient {
    inner: Arc<Inner>,
}

struct Inner {
    document: ValidatedDocument,
    transport: Box<dyn Transport>,
    state: watch::Sender<ClientState>,
    pending: DashMap<u64, PendingRequest>,
    listeners: DashMap<String, Vec<(ListenerId, NotificationHandler)>>,
    next_request_id: AtomicU64,
    next_listener_id: AtomicU64,
}

impl JsonRpcClient {
    /// Connect over WebSocket and start dispatching.
    ///
    /// The configuration is validated before any network activity.
    pub async fn connect(config: ClientConfig, document: ValidatedDocument) -> ClientResult<Self> {
        config.validate().map_err(ClientError::configuration)?;

        let (transport, events) = WebSocketTransport::connect(&config).await?;
        Ok(Self::with_transport(document, transport, events))
    }

    /// Build a client over an already established transport.
    ///
    /// `events` must be the receiver the transport reports its lifecycle on. The
    /// client starts in [`ClientState::Connecting`] and moves to `Open` when the
    /// transport reports [`TransportEvent::Open`]. Must be called inside a tokio
    /// runtime.
    pub fn with_transport<T>(
        document: ValidatedDocument,
        transport: T,
        events: mpsc::Receiver<TransportEvent>,
    ) -> Self
    where
        T: Transport + 'static,
    {
        for name in document.duplicate_method_names() {
            warn!(method = name, "method declared more than once, using the first declaration");
        }

        let (state, _) = watch::channel(ClientState::Connecting);
        let inner = Arc::new(Inner {
            document,
            transport: Box::new(transport),
            state,
            pending: DashMap::new(),
            listeners: DashMap::new(),
            next_request_id: AtomicU64::new(1),
            next_listener_id: AtomicU64::new(1),
        });

        tokio::spawn(dispatch(Arc::clone(&inner), events));

        Self { inner }
    }

    /// Call a request method with positional arguments and return its raw result.
    pub async fn call(&self, method: &str, args: Vec<Value>) -> ClientResult<Value> {
        let document = &self.inner.document;
        let declared = document.method(method).map_err(|e| match e {
            OpenRpcError::MethodNotFound { name } => ClientError::UnknownMethod(name),
            other => ClientError::Document(other),
        })?;

        if declared.is_notification() {
            return Err(ClientError::NotARequest(method.to_string()));
        }
        let arity = document.arity(method)?;
        if args.len() > arity.total {
            return Err(ClientError::invalid_arguments(
                method,
                format!("expected at most {} arguments, got {}", arity.total, args.len()),
            ));
        }
        if args.len() < arity.required {
            return Err(ClientError::invalid_arguments(
                method,
                format!("expected at least {} arguments, got {}", arity.required, args.len()),
            ));
        }

        if self.wait_until_settled().await == ClientState::Closed {
            return Err(ClientError::NotConnected);
        }

        let id = self.inner.next_request_id.fetch_add(1, Ordering::SeqCst);
        let (sender, receiver) = oneshot::channel();
        self.inner.pending.insert(
            id,
            PendingRequest {
                method: method.to_string(),
                sender,
            },
        );

        // Closure may have drained the table between the state check and the insert.
        if self.state() == ClientState::Closed {
            self.inner.pending.remove(&id);
            return Err(JsonRpcError::connection_closed().into());
        }

        let params = if args.is_empty() {
            None
        } else {
            Some(Value::Array(args))
        };
        let text = serde_json::to_string(&JsonRpcRequest::call(method, params, id))?;

        debug!(id, method, "sending request");
        if let Err(e) = self.inner.transport.send(text).await {
            self.inner.pending.remove(&id);
            return Err(JsonRpcError::internal_error(format!("Failed to send request: {}", e)).into());
        }

        match receiver.await {
            Ok(outcome) => outcome.map_err(ClientError::Rpc),
            Err(_) => Err(JsonRpcError::connection_closed().into()),
        }
    }

    /// Call a request method and deserialize its result
    pub async fn call_as<R>(&self, method: &str, args: Vec<Value>) -> ClientResult<R>
    where
        R: DeserializeOwned,
    {
        let result = self.call(method, args).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Register a handler for a notification method.
    ///
    /// The handler receives the notification's `params`, or `null` when absent.
    pub fn add_event_listener<F>(&self, name: &str, handler: F) -> ClientResult<ListenerId>
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        if !self
            .inner
            .document
            .notification_method_names()
            .contains(&name)
        {
            return Err(ClientError::UnknownNotification(name.to_string()));
        }

        let id = ListenerId(self.inner.next_listener_id.fetch_add(1, Ordering::SeqCst));
        let handler: NotificationHandler = Arc::new(handler);
        self.inner
            .listeners
            .entry(name.to_string())
            .or_default()
            .push((id, handler));

        debug!(name, listener = id.0, "listener registered");
        Ok(id)
    }

    /// Remove a previously registered listener. Returns whether it was found.
    pub fn remove_event_listener(&self, name: &str, id: ListenerId) -> bool {
        let Some(mut handlers) = self.inner.listeners.get_mut(name) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(listener, _)| *listener != id);
        before != handlers.len()
    }

    /// Close the connection. Pending calls fail with `-32603 Connection closed`.
    pub async fn close(&self) -> ClientResult<()> {
        let result = self.inner.transport.close().await;
        self.inner.mark_closed("closed by client");
        result
    }

    pub fn state(&self) -> ClientState {
        *self.inner.state.borrow()
    }

    /// Subscribe to connection state changes
    pub fn state_changes(&self) -> watch::Receiver<ClientState> {
        self.inner.state.subscribe()
    }

    /// Resolve once the connection has closed
    pub async fn wait_closed(&self) {
        let mut changes = self.state_changes();
        let _ = changes.wait_for(|state| *state == ClientState::Closed).await;
    }

    /// Number of calls still waiting for a response
    pub fn pending_requests_count(&self) -> usize {
        self.inner.pending.len()
    }

    pub fn document(&self) -> &ValidatedDocument {
        &self.inner.document
    }

    async fn wait_until_settled(&self) -> ClientState {
        let mut changes = self.state_changes();
        let state = match changes
            .wait_for(|state| *state != ClientState::Connecting)
            .await
        {
            Ok(state) => *state,
            Err(_) => ClientState::Closed,
        };
        state
    }
}

impl std::fmt::Debug for JsonRpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRpcClient")
            .field("state", &self.state())
            .field("pending_requests", &self.pending_requests_count())
            .finish()
    }
}

impl Inner {
    /// Transition to `Closed` and fail every pending call. Runs at most once.
    fn mark_closed(&self, reason: &str) {
        let changed = self.state.send_if_modified(|state| {
            if *state == ClientState::Closed {
                false
            } else {
                *state = ClientState::Closed;
                true
            }
        });
        if !changed {
            return;
        }

        info!(reason, pending = self.pending.len(), "connection closed");

        let ids: Vec<u64> = self.pending.iter().map(|entry| *entry.key()).collect();
        for id in ids {
            if let Some((_, pending)) = self.pending.remove(&id) {
                trace!(id, method = %pending.method, "failing pending request");
                let _ = pending.sender.send(Err(JsonRpcError::connection_closed()));
            }
        }
    }

    fn handle_message(&self, text: &str) {
        match IncomingMessage::parse(text) {
            Ok(IncomingMessage::Response { id, outcome }) => {
                let pending = id.as_u64().and_then(|id| self.pending.remove(&id));
                match pending {
                    Some((_, pending)) => {
                        debug!(%id, method = %pending.method, "response received");
                        let _ = pending.sender.send(outcome);
                    }
                    None => warn!(%id, "response for unknown request id"),
                }
            }
            Ok(IncomingMessage::Notification { method, params }) => {
                let handlers: Vec<NotificationHandler> = self
                    .listeners
                    .get(&method)
                    .map(|entry| entry.iter().map(|(_, handler)| Arc::clone(handler)).collect())
                    .unwrap_or_default();

                trace!(method = %method, listeners = handlers.len(), "notification received");
                for handler in handlers {
                    handler(&params);
                }
            }
            Err(e) => warn!(error = %e, "dropping malformed message"),
        }
    }
}

async fn dispatch(inner: Arc<Inner>, mut events: mpsc::Receiver<TransportEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            TransportEvent::Open => {
                inner.state.send_if_modified(|state| {
                    if *state == ClientState::Connecting {
                        *state = ClientState::Open;
                        true
                    } else {
                        false
                    }
                });
                debug!("transport open");
            }
            TransportEvent::Message(text) => inner.handle_message(&text),
            TransportEvent::Error(error) => {
                warn!(error = %error, "transport error");
                inner.mark_closed(&error);
                return;
            }
            TransportEvent::Close { reason } => {
                inner.mark_closed(reason.as_deref().unwrap_or("closed by peer"));
                return;
            }
        }
    }

    inner.mark_closed("transport event stream ended");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct NullTransport;

    #[async_trait]
    impl Transport for NullTransport {
        async fn send(&self, _text: String) -> ClientResult<()> {
            Ok(())
        }

        async fn close(&self) -> ClientResult<()> {
            Ok(())
        }

        fn is_open(&self) -> bool {
            true
        }
    }

    fn document() -> ValidatedDocument {
        ValidatedDocument::from_value(json!({
            "openrpc": "1.3.2",
            "info": {"title": "Test", "version": "1.0.0"},
            "methods": [
                {"name": "ping", "params": [], "result": {"name": "r", "schema": {"type": "string"}}},
                {"name": "tick", "params": [{"name": "n", "schema": {"type": "integer"}}]}
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_closure_runs_once() {
        let (events_tx, events_rx) = mpsc::channel(8);
        let client = JsonRpcClient::with_transport(document(), NullTransport, events_rx);
        let mut changes = client.state_changes();
        assert_eq!(client.state(), ClientState::Connecting);

        events_tx.send(TransportEvent::Open).await.unwrap();
        changes.changed().await.unwrap();
        assert_eq!(*changes.borrow_and_update(), ClientState::Open);

        client.close().await.unwrap();
        assert_eq!(*changes.borrow_and_update(), ClientState::Closed);

        client.inner.mark_closed("again");
        assert!(!changes.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_listener_ids_are_distinct() {
        let (_events_tx, events_rx) = mpsc::channel(8);
        let client = JsonRpcClient::with_transport(document(), NullTransport, events_rx);

        let first = client.add_event_listener("tick", |_| {}).unwrap();
        let second = client.add_event_listener("tick", |_| {}).unwrap();
        assert_ne!(first, second);
        assert!(client.remove_event_listener("tick", first));
        assert!(!client.remove_event_listener("tick", first));
        assert!(!client.remove_event_listener("other", second));
    }

    #[tokio::test]
    async fn test_call_after_close_is_not_connected() {
        let (_events_tx, events_rx) = mpsc::channel(8);
        let client = JsonRpcClient::with_transport(document(), NullTransport, events_rx);
        client.close().await.unwrap();

        let err = client.call("ping", vec![]).await.unwrap_err();
        assert!(matches!(err, ClientError::NotConnected));
    }
}
