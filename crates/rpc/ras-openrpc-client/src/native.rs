//! WebSocket transport implementation using tokio-tungstenite

use crate::{
    Transport, TransportEvent,
    config::ClientConfig,
    error::{ClientError, ClientResult},
};
use async_trait::async_trait;
use futures::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use http::{HeaderName, HeaderValue};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Message, client::IntoClientRequest, handshake::client::Request},
};
use tracing::{debug, error, info, warn};
use url::Url;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket transport using tokio-tungstenite
pub struct WebSocketTransport {
    url: Url,
    sink: Mutex<SplitSink<WsStream, Message>>,
    open: Arc<AtomicBool>,
}

impl WebSocketTransport {
    /// Open the connection and start forwarding inbound frames as [`TransportEvent`]s.
    ///
    /// The returned receiver yields `Open` first, then one `Message` per text frame,
    /// and finally `Close` or `Error`. The configuration is validated first.
    pub async fn connect(
        config: &ClientConfig,
    ) -> ClientResult<(Self, mpsc::Receiver<TransportEvent>)> {
        config.validate().map_err(ClientError::configuration)?;

        let url = Url::parse(&config.url)?;
        let request = build_request(config)?;

        info!("Connecting to WebSocket server: {}", url);

        let (ws_stream, response) = tokio::time::timeout(config.connection_timeout, connect_async(request))
            .await
            .map_err(|_| {
                ClientError::connection(format!(
                    "Connection timed out after {}s",
                    config.connection_timeout.as_secs()
                ))
            })??;

        debug!(
            "WebSocket connection established, status: {}",
            response.status()
        );

        let (sink, stream) = ws_stream.split();
        let (events_tx, events_rx) = mpsc::channel(config.event_buffer_size);
        let open = Arc::new(AtomicBool::new(true));

        if events_tx.send(TransportEvent::Open).await.is_err() {
            return Err(ClientError::connection("Event receiver dropped"));
        }
        tokio::spawn(read_loop(stream, events_tx, Arc::clone(&open)));

        Ok((
            Self {
                url,
                sink: Mutex::new(sink),
                open,
            },
            events_rx,
        ))
    }

    /// Get the connection URL
    pub fn url(&self) -> &str {
        self.url.as_str()
    }
}

/// Build the handshake request, including authentication headers
pub(crate) fn build_request(config: &ClientConfig) -> ClientResult<Request> {
    let mut request = config.url.as_str().into_client_request()?;

    for (key, value) in config.connection_headers() {
        let name = HeaderName::try_from(key.as_str())
            .map_err(|e| ClientError::InvalidHeader(format!("{}: {}", key, e)))?;
        let value = HeaderValue::try_from(value.as_str())
            .map_err(|e| ClientError::InvalidHeader(format!("{}: {}", key, e)))?;
        request.headers_mut().insert(name, value);
    }

    Ok(request)
}

async fn read_loop(
    mut stream: SplitStream<WsStream>,
    events: mpsc::Sender<TransportEvent>,
    open: Arc<AtomicBool>,
) {
    let reason = loop {
        let event = match stream.next().await {
            Some(Ok(Message::Text(text))) => TransportEvent::Message(text.as_str().to_string()),
            Some(Ok(Message::Binary(data))) => match String::from_utf8(data.to_vec()) {
                Ok(text) => TransportEvent::Message(text),
                Err(_) => {
                    warn!("Dropping non UTF-8 binary frame ({} bytes)", data.len());
                    continue;
                }
            },
            Some(Ok(Message::Close(frame))) => {
                info!("Received close frame: {:?}", frame);
                break frame.map(|f| f.reason.as_str().to_string());
            }
            Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => continue,
            Some(Err(e)) => {
                error!("WebSocket error: {}", e);
                open.store(false, Ordering::SeqCst);
                let _ = events.send(TransportEvent::Error(e.to_string())).await;
                return;
            }
            None => {
                info!("WebSocket stream ended");
                break None;
            }
        };

        if events.send(event).await.is_err() {
            debug!("Event receiver dropped, stopping reader");
            open.store(false, Ordering::SeqCst);
            return;
        }
    };

    open.store(false, Ordering::SeqCst);
    let _ = events.send(TransportEvent::Close { reason }).await;
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn send(&self, text: String) -> ClientResult<()> {
        if !self.is_open() {
            return Err(ClientError::NotConnected);
        }

        debug!("Sending message: {}", text);

        self.sink
            .lock()
            .await
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| ClientError::connection(format!("Failed to send message: {}", e)))
    }

    async fn close(&self) -> ClientResult<()> {
        if !self.open.swap(false, Ordering::SeqCst) {
            return Ok(());
        }

        info!("Closing WebSocket connection");
        if let Err(e) = self.sink.lock().await.close().await {
            warn!("Error sending close frame: {}", e);
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for WebSocketTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSocketTransport")
            .field("url", &self.url.as_str())
            .field("is_open", &self.is_open())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_headers() {
        let config = ClientConfig::new("ws://localhost:8080/ws")
            .with_bearer_token("test_token")
            .with_header("X-Custom", "value");

        let request = build_request(&config).unwrap();
        assert_eq!(request.uri(), "ws://localhost:8080/ws");
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer test_token"
        );
        assert_eq!(request.headers().get("x-custom").unwrap(), "value");
        assert!(request.headers().contains_key("sec-websocket-key"));
    }

    #[test]
    fn test_invalid_header_rejected() {
        let config = ClientConfig::new("ws://localhost:8080/ws").with_header("bad header", "v");
        assert!(matches!(
            build_request(&config),
            Err(ClientError::InvalidHeader(_))
        ));
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = ClientConfig::new(format!("ws://{}", addr));
        let result = WebSocketTransport::connect(&config).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_zero_event_buffer_is_rejected() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mut config = ClientConfig::new(format!("ws://{}", addr));
        config.event_buffer_size = 0;
        let result = WebSocketTransport::connect(&config).await;
        assert!(matches!(result, Err(ClientError::Configuration(_))));
    }
}
