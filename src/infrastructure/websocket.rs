// Websocket client adapter
use crate::application::connection::Connection;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

pub struct WsConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsConnection {
    pub async fn connect(endpoint: &str) -> Result<Self, ConnectionError> {
        let (stream, response) = connect_async(endpoint).await?;
        tracing::info!("Connected to {} ({})", endpoint, response.status());
        Ok(Self { stream })
    }
}

#[async_trait]
impl Connection for WsConnection {
    async fn send_text(&mut self, text: &str) -> anyhow::Result<()> {
        self.stream
            .send(Message::Text(text.to_string()))
            .await
            .map_err(ConnectionError::from)?;
        Ok(())
    }

    async fn next_frame(&mut self) -> Option<anyhow::Result<String>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(text)),
                Ok(Message::Close(frame)) => {
                    tracing::info!("Server closed the connection: {:?}", frame);
                    return None;
                }
                Ok(Message::Binary(data)) => {
                    tracing::debug!("Ignoring binary frame of {} bytes", data.len());
                }
                // Ping/pong are answered by tungstenite itself
                Ok(_) => {}
                Err(e) => return Some(Err(ConnectionError::from(e).into())),
            }
        }
    }
}
