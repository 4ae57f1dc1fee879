//! Websocket transport between a [`ChannelSender`](crate::ChannelSender) and
//! the chat server.

use std::time::Duration;

use anyhow::{Context, Result};
use banter_protocol::{ServerFrame, parse_server_frame};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    /// `None` retries forever
    pub max_attempts: Option<usize>,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Some(5),
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl ReconnectPolicy {
    /// The wait before each reconnect attempt, one item per attempt
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        std::iter::successors(Some(self.initial_delay.min(self.max_delay)), |delay| {
            Some(Duration::from_secs_f64(delay.as_secs_f64() * self.backoff_multiplier).min(self.max_delay))
        })
        .take(self.max_attempts.unwrap_or(usize::MAX))
    }
}

/// What the transport has for the client
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Frame(ServerFrame),
    /// The socket was re-established; server-side rooms are gone
    Reconnected,
    /// Every sender was dropped
    Closed,
}

/// A websocket read, sorted by what the transport does with it
#[derive(Debug, PartialEq)]
enum Incoming {
    Frame(ServerFrame),
    Ping(Vec<u8>),
    Ignore,
    Lost(String),
}

fn classify(read: Option<Result<Message, tungstenite::Error>>) -> Incoming {
    match read {
        Some(Ok(Message::Text(text))) => match parse_server_frame(&text) {
            Ok(frame) => Incoming::Frame(frame),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unparseable frame");
                Incoming::Ignore
            }
        },
        Some(Ok(Message::Ping(data))) => Incoming::Ping(data),
        Some(Ok(Message::Close(_))) | None => Incoming::Lost("closed by server".to_string()),
        Some(Ok(_)) => Incoming::Ignore,
        Some(Err(e)) => Incoming::Lost(e.to_string()),
    }
}

/// Pumps queued lines out and server frames in over one websocket
pub struct Connection {
    socket: Socket,
    url: String,
    policy: ReconnectPolicy,
    outgoing: mpsc::UnboundedReceiver<String>,
}

impl Connection {
    /// Connect to `url`; lines queued on `outgoing` are written as they come
    pub async fn open(
        url: &str,
        policy: ReconnectPolicy,
        outgoing: mpsc::UnboundedReceiver<String>,
    ) -> Result<Self> {
        let (socket, _) = connect_async(url)
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;
        tracing::info!(url, "Connected");

        Ok(Self {
            socket,
            url: url.to_string(),
            policy,
            outgoing,
        })
    }

    /// Write queued lines until the server has something for the client
    pub async fn next_event(&mut self) -> Result<TransportEvent> {
        loop {
            tokio::select! {
                line = self.outgoing.recv() => {
                    let Some(line) = line else {
                        return Ok(TransportEvent::Closed);
                    };
                    tracing::trace!(line = %line, "Sending");
                    self.socket
                        .send(Message::Text(line))
                        .await
                        .context("Failed to send line")?;
                }
                read = self.socket.next() => match classify(read) {
                    Incoming::Frame(frame) => return Ok(TransportEvent::Frame(frame)),
                    Incoming::Ping(data) => {
                        self.socket
                            .send(Message::Pong(data))
                            .await
                            .context("Failed to answer ping")?;
                    }
                    Incoming::Ignore => {}
                    Incoming::Lost(reason) => {
                        tracing::warn!(url = %self.url, reason = %reason, "Connection lost");
                        self.reestablish().await?;
                        return Ok(TransportEvent::Reconnected);
                    }
                },
            }
        }
    }

    async fn reestablish(&mut self) -> Result<()> {
        for (attempt, delay) in self.policy.delays().enumerate() {
            tokio::time::sleep(delay).await;
            match connect_async(self.url.as_str()).await {
                Ok((socket, _)) => {
                    self.socket = socket;
                    tracing::info!(url = %self.url, attempt = attempt + 1, "Reconnected");
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(attempt = attempt + 1, error = %e, "Reconnection attempt failed")
                }
            }
        }
        anyhow::bail!("Gave up reconnecting to {}", self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays_back_off_to_cap() {
        let policy = ReconnectPolicy::default();
        let delays: Vec<u64> = policy.delays().map(|d| d.as_secs()).collect();

        assert_eq!(delays, vec![1, 2, 4, 8, 16]);

        let policy = ReconnectPolicy {
            max_attempts: Some(3),
            initial_delay: Duration::from_secs(20),
            ..ReconnectPolicy::default()
        };
        let delays: Vec<u64> = policy.delays().map(|d| d.as_secs()).collect();
        assert_eq!(delays, vec![20, 30, 30]);
    }

    #[test]
    fn test_unlimited_attempts() {
        let policy = ReconnectPolicy {
            max_attempts: None,
            ..ReconnectPolicy::default()
        };
        assert_eq!(policy.delays().nth(100), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_classify_text_frame() {
        let read = Some(Ok(Message::Text(">lobby\n|j| Blue".to_string())));
        let Incoming::Frame(frame) = classify(read) else {
            panic!("expected a frame");
        };

        assert_eq!(frame.room_id.as_deref(), Some("lobby"));
        assert_eq!(frame.lines.len(), 1);
    }

    #[test]
    fn test_classify_other_reads() {
        assert_eq!(classify(Some(Ok(Message::Text(String::new())))), Incoming::Ignore);
        assert_eq!(classify(Some(Ok(Message::Ping(vec![1])))), Incoming::Ping(vec![1]));
        assert_eq!(classify(Some(Ok(Message::Pong(vec![])))), Incoming::Ignore);
        assert!(matches!(classify(Some(Ok(Message::Close(None)))), Incoming::Lost(_)));
        assert!(matches!(classify(None), Incoming::Lost(_)));
        assert!(matches!(
            classify(Some(Err(tungstenite::Error::ConnectionClosed))),
            Incoming::Lost(_)
        ));
    }
}
