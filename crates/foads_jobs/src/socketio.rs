//! Socket.IO push channel over a raw WebSocket.
//!
//! Only the slice of Engine.IO v4 / Socket.IO v5 the backend uses is spoken:
//! open, ping/pong, namespace connect and `42` event packets on the default
//! namespace.

use crate::{JobEventSource, JobEvents};
use async_trait::async_trait;
use foads_core::{JobId, JobUpdate};
use foads_error::{JobError, JobErrorKind};
use futures::StreamExt;
use futures_util::SinkExt;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, instrument, trace, warn};

/// Name of the event carrying job progress.
pub const JOB_UPDATE_EVENT: &str = "job_update";

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A decoded Socket.IO frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// Engine.IO handshake, `0{...}`
    Open(Value),
    /// Engine.IO close, `1`
    Close,
    /// Engine.IO ping, `2`
    Ping,
    /// Engine.IO pong, `3`
    Pong,
    /// Namespace connect acknowledgement, `40`
    Connect,
    /// Namespace disconnect, `41`
    Disconnect,
    /// Event, `42["name", payload]`
    Event {
        /// Event name
        name: String,
        /// First argument, `Null` when absent
        payload: Value,
    },
    /// Namespace connect refused, `44{...}`
    ConnectError(Value),
    /// Engine.IO noop or a packet type this client does not use
    Other(String),
}

/// Decode one text frame.
///
/// # Example
/// ```
/// use foads_jobs::{Packet, parse_packet};
///
/// let packet = parse_packet(r#"42["job_update",{"job_id":"vid_1","status":"processing","progress":40}]"#).unwrap();
/// assert!(matches!(packet, Packet::Event { ref name, .. } if name == "job_update"));
/// assert_eq!(parse_packet("2").unwrap(), Packet::Ping);
/// ```
pub fn parse_packet(frame: &str) -> Result<Packet, JobError> {
    let mut chars = frame.chars();
    let packet = match chars.next() {
        Some('0') => Packet::Open(parse_json(chars.as_str())?),
        Some('1') => Packet::Close,
        Some('2') => Packet::Ping,
        Some('3') => Packet::Pong,
        Some('4') => parse_message(chars.as_str())?,
        _ => Packet::Other(frame.to_string()),
    };
    Ok(packet)
}

/// Decode the Socket.IO packet inside an Engine.IO `4` message.
fn parse_message(body: &str) -> Result<Packet, JobError> {
    let mut chars = body.chars();
    let kind = chars.next();
    let rest = skip_namespace(chars.as_str());

    match kind {
        Some('0') => Ok(Packet::Connect),
        Some('1') => Ok(Packet::Disconnect),
        Some('2') => {
            // An ack id may precede the array.
            let array = rest.trim_start_matches(|c: char| c.is_ascii_digit());
            let value = parse_json(array)?;
            let mut items = match value {
                Value::Array(items) => items.into_iter(),
                other => {
                    return Err(invalid(format!("event is not an array: {}", other)));
                }
            };
            let name = match items.next() {
                Some(Value::String(name)) => name,
                _ => return Err(invalid("event has no name")),
            };
            Ok(Packet::Event {
                name,
                payload: items.next().unwrap_or(Value::Null),
            })
        }
        Some('4') => Ok(Packet::ConnectError(
            parse_json(rest).unwrap_or(Value::Null),
        )),
        _ => Ok(Packet::Other(format!("4{}", body))),
    }
}

/// Strip a `/namespace,` prefix.
fn skip_namespace(body: &str) -> &str {
    if body.starts_with('/') {
        body.split_once(',').map(|(_, rest)| rest).unwrap_or("")
    } else {
        body
    }
}

fn parse_json(text: &str) -> Result<Value, JobError> {
    if text.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| invalid(format!("{}: {}", e, text)))
}

#[track_caller]
fn invalid(message: impl Into<String>) -> JobError {
    JobError::new(JobErrorKind::InvalidFrame(message.into()))
}

/// WebSocket URL of the Socket.IO endpoint under `base_url`.
///
/// ```
/// assert_eq!(
///     foads_jobs::socket_url("https://abcd.ngrok-free.app/"),
///     "wss://abcd.ngrok-free.app/socket.io/?EIO=4&transport=websocket"
/// );
/// ```
pub fn socket_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        base.to_string()
    };
    format!("{}/socket.io/?EIO=4&transport=websocket", base)
}

/// Push channel listening for `job_update` events.
///
/// One connection is opened per subscription and closed when the returned
/// stream is dropped. There is no reconnect; a dropped connection ends the
/// stream.
#[derive(Debug, Clone)]
pub struct SocketIoEventSource {
    url: String,
}

impl SocketIoEventSource {
    /// Source for the backend at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            url: socket_url(base_url),
        }
    }

    /// WebSocket URL this source connects to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl JobEventSource for SocketIoEventSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn subscribe(&self, job_id: &JobId) -> Result<JobEvents, JobError> {
        let (socket, _) = connect_async(self.url.as_str()).await.map_err(|e| {
            warn!(error = %e, "Push channel connection failed");
            JobError::new(JobErrorKind::ChannelConnect(e.to_string()))
        })?;
        debug!(job_id = %job_id, "Push channel connected");

        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(pump(socket, tx));
        Ok(ReceiverStream::new(rx).boxed())
    }
}

/// Forward decoded updates until either side goes away.
async fn pump(mut socket: Socket, tx: mpsc::Sender<Result<JobUpdate, JobError>>) {
    loop {
        let frame = tokio::select! {
            _ = tx.closed() => {
                debug!("Subscriber dropped, closing push channel");
                let _ = socket.close(None).await;
                return;
            }
            frame = socket.next() => frame,
        };

        let text = match frame {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Close(_))) | None => {
                debug!("Push channel closed by server");
                return;
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                warn!(error = %e, "Push channel error");
                return;
            }
        };

        let packet = match parse_packet(text.as_str()) {
            Ok(packet) => packet,
            Err(e) => {
                warn!(error = %e, "Skipping undecodable frame");
                continue;
            }
        };

        match packet {
            Packet::Open(handshake) => {
                trace!(%handshake, "Engine.IO open");
                if socket.send(Message::text("40")).await.is_err() {
                    return;
                }
            }
            Packet::Ping => {
                if socket.send(Message::text("3")).await.is_err() {
                    return;
                }
            }
            Packet::Connect => debug!("Joined default namespace"),
            Packet::Event { name, payload } if name == JOB_UPDATE_EVENT => {
                match serde_json::from_value::<JobUpdate>(payload) {
                    Ok(update) => {
                        if tx.send(Ok(update)).await.is_err() {
                            let _ = socket.close(None).await;
                            return;
                        }
                    }
                    Err(e) => warn!(error = %e, "Skipping malformed job_update"),
                }
            }
            Packet::Event { name, .. } => trace!(event = %name, "Ignoring event"),
            Packet::ConnectError(reason) => {
                let _ = tx
                    .send(Err(JobError::new(JobErrorKind::ChannelConnect(
                        reason.to_string(),
                    ))))
                    .await;
                return;
            }
            Packet::Close | Packet::Disconnect => {
                debug!("Server closed the session");
                return;
            }
            Packet::Pong | Packet::Other(_) => {}
        }
    }
}
