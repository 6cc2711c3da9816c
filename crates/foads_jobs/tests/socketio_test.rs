//! Tests for the Socket.IO push channel against a local WebSocket server.

use foads_core::{AssetKind, JobStatus};
use foads_error::FoadsErrorKind;
use foads_jobs::{JobEventSource, JobTracker, SocketIoEventSource};
use foads_storage::{AssetStore, InMemoryAssetStore};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

const OPEN: &str = r#"0{"sid":"s1","upgrades":[],"pingInterval":25000,"pingTimeout":20000}"#;

/// Run a one-shot Socket.IO server that plays `frames` after the handshake.
///
/// Returns the frames the client sent, excluding the close frame.
async fn serve(frames: Vec<String>) -> (SocketAddr, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        let mut received = Vec::new();

        ws.send(Message::text(OPEN)).await.unwrap();
        let connect = ws.next().await.unwrap().unwrap();
        received.push(connect.to_text().unwrap().to_string());
        ws.send(Message::text(r#"40{"sid":"n1"}"#)).await.unwrap();

        ws.send(Message::text("2")).await.unwrap();
        let pong = ws.next().await.unwrap().unwrap();
        received.push(pong.to_text().unwrap().to_string());

        for frame in frames {
            ws.send(Message::text(frame)).await.unwrap();
        }

        while let Some(Ok(message)) = ws.next().await {
            if message.is_close() {
                break;
            }
            received.push(message.to_text().unwrap_or_default().to_string());
        }
        received
    });

    (addr, handle)
}

fn update(json: &str) -> String {
    format!(r#"42["job_update",{}]"#, json)
}

#[tokio::test]
async fn test_push_channel_drives_tracker() {
    let (addr, server) = serve(vec![
        r#"42["generation_progress",{"progress":50,"status":"generating"}]"#.to_string(),
        update(r#"{"job_id":"vid_other","status":"completed","url":"http://x/other.mp4"}"#),
        update(r#"{"job_id":"vid_1","status":"processing","progress":40,"message":"Animando rostro..."}"#),
        update(r#"{"job_id":"vid_1","status":"completed","progress":100,"url":"http://x/vid_1.mp4"}"#),
    ])
    .await;

    let source = SocketIoEventSource::new(&format!("http://{}", addr));
    let store = Arc::new(InMemoryAssetStore::new());
    let tracker = JobTracker::new(store.clone());

    let events = source.subscribe(&"vid_1".into()).await.unwrap();
    let done = tracker.track("vid_1".into(), "promo", events).await.unwrap();

    assert_eq!(done.status, JobStatus::Completed);
    assert_eq!(done.message.as_deref(), Some("Animando rostro..."));
    assert_eq!(done.result_url.as_deref(), Some("http://x/vid_1.mp4"));

    let assets = store.get_all_assets().await.unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].kind(), &AssetKind::Video);

    let received = server.await.unwrap();
    assert_eq!(received, vec!["40".to_string(), "3".to_string()]);
}

#[tokio::test]
async fn test_server_hangup_before_terminal_is_error() {
    let (addr, server) = serve(vec![
        update(r#"{"job_id":"vid_1","status":"processing","progress":15}"#),
        "41".to_string(),
    ])
    .await;

    let source = SocketIoEventSource::new(&format!("http://{}", addr));
    let tracker = JobTracker::new(Arc::new(InMemoryAssetStore::new()));
    let events = source.subscribe(&"vid_1".into()).await.unwrap();

    let err = tracker.track("vid_1".into(), "promo", events).await.unwrap_err();
    assert!(matches!(err.kind(), FoadsErrorKind::Job(_)));
    assert_eq!(tracker.current().unwrap().progress, 15);
    server.abort();
}

#[tokio::test]
async fn test_unreachable_server_fails_to_subscribe() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = SocketIoEventSource::new(&format!("http://{}", addr));
    assert!(source.subscribe(&"vid_1".into()).await.is_err());
}
