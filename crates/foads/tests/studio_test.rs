//! Studio tests against a scripted backend and in-memory store.

use async_trait::async_trait;
use foads::{
    AssetKind, FoadsErrorKind, JobStatus, MultiSceneRequest, SceneBuilder, Studio,
    VideoRenderRequestBuilder,
};
use foads_core::{JobId, JobUpdate, NewAsset};
use foads_error::{HttpError, JobError};
use foads_gateway::{Gateway, GatewayConfig, Transport, TransportRequest, TransportResponse};
use foads_jobs::{JobEventSource, JobEvents};
use foads_storage::{AssetStore, InMemoryAssetStore};
use futures::StreamExt;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;

const RED_SHOE: &str = "data:image/png;base64,iVBORw0KGgo=";

/// Backend answering each path with a fixed response.
///
/// Updates queued with `emit_on_submit` go out on `pushes` the moment a
/// render is submitted, before the caller can subscribe.
struct Backend {
    routes: Mutex<HashMap<String, (u16, Value)>>,
    requests: Mutex<Vec<TransportRequest>>,
    on_submit: Mutex<Vec<JobUpdate>>,
    pushes: broadcast::Sender<JobUpdate>,
}

impl Backend {
    fn new() -> Arc<Self> {
        let (pushes, _) = broadcast::channel(16);
        let backend = Self {
            routes: Mutex::default(),
            requests: Mutex::default(),
            on_submit: Mutex::default(),
            pushes,
        };
        backend.route("/auth/login", 200, json!({"status": "success", "token": "t1"}));
        Arc::new(backend)
    }

    fn route(&self, path: &str, status: u16, body: Value) {
        self.routes
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body));
    }

    fn emit_on_submit(&self, updates: Vec<JobUpdate>) {
        *self.on_submit.lock().unwrap() = updates;
    }

    fn paths(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.url.trim_start_matches("http://backend.test").to_string())
            .collect()
    }
}

#[async_trait]
impl Transport for Backend {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, HttpError> {
        let path = request
            .url
            .trim_start_matches("http://backend.test")
            .to_string();
        self.requests.lock().unwrap().push(request);
        if path == "/render-video" {
            for update in self.on_submit.lock().unwrap().drain(..) {
                // Nobody is listening yet.
                let _ = self.pushes.send(update);
            }
        }
        let Some((status, body)) = self.routes.lock().unwrap().get(&path).cloned() else {
            return Err(HttpError::new("Connection refused"));
        };
        Ok(TransportResponse {
            status,
            reason: if status == 200 { "OK" } else { "Bad Request" }.to_string(),
            body: body.to_string().into_bytes(),
        })
    }
}

/// Event source replaying a fixed list of updates for any job.
struct ScriptedEvents(Vec<JobUpdate>);

#[async_trait]
impl JobEventSource for ScriptedEvents {
    async fn subscribe(&self, _job_id: &JobId) -> Result<JobEvents, JobError> {
        Ok(futures::stream::iter(self.0.clone().into_iter().map(Ok)).boxed())
    }
}

/// Event source that only sees what the backend pushes after subscription.
struct LivePushes(broadcast::Sender<JobUpdate>);

#[async_trait]
impl JobEventSource for LivePushes {
    async fn subscribe(&self, _job_id: &JobId) -> Result<JobEvents, JobError> {
        let receiver = self.0.subscribe();
        Ok(futures::stream::unfold(receiver, |mut receiver| async move {
            receiver.recv().await.ok().map(|update| (Ok(update), receiver))
        })
        .boxed())
    }
}

fn studio(backend: Arc<Backend>, updates: Vec<JobUpdate>) -> (Studio, Arc<InMemoryAssetStore>) {
    let gateway = Gateway::with_transport(GatewayConfig::new("http://backend.test"), backend);
    let store = Arc::new(InMemoryAssetStore::new());
    let studio = Studio::new(gateway, store.clone(), Arc::new(ScriptedEvents(updates)));
    (studio, store)
}

#[tokio::test]
async fn test_generated_image_is_listed_first() {
    let backend = Backend::new();
    backend.route("/generate-image", 200, json!({"status": "success", "image": RED_SHOE}));
    let (studio, store) = studio(backend.clone(), vec![]);
    store
        .add_asset(NewAsset::at(AssetKind::Image, "data:old", "older", 1_000))
        .await
        .unwrap();

    let asset = studio
        .generate_image("a red shoe", "1:1", 4, 2.0, "")
        .await
        .unwrap();

    assert_eq!(asset.content(), RED_SHOE);
    let assets = studio.assets().await.unwrap();
    assert_eq!(assets.len(), 2);
    assert_eq!(assets[0].id(), asset.id());
    assert_eq!(*assets[0].kind(), AssetKind::Image);
    assert_eq!(assets[0].prompt(), "a red shoe");
}

#[tokio::test]
async fn test_video_render_stores_one_video() {
    let backend = Backend::new();
    backend.route("/render-video", 200, json!({"status": "success", "job_id": "vid_1"}));
    let updates = vec![
        JobUpdate::processing("vid_1", 40),
        JobUpdate::completed("vid_1", "http://backend.test/files/jobs/vid_1/final_result.mp4"),
    ];
    let (studio, _store) = studio(backend, updates);

    let request = VideoRenderRequestBuilder::default()
        .script("Hola, bienvenidos")
        .avatar_id("avatar_1.png")
        .build()
        .unwrap();
    let snapshot = studio.render_video(&request).await.unwrap();

    assert_eq!(snapshot.status, JobStatus::Completed);
    assert_eq!(snapshot.progress, 100);
    let assets = studio.assets().await.unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(*assets[0].kind(), AssetKind::Video);
    assert_eq!(
        assets[0].content(),
        "http://backend.test/files/jobs/vid_1/final_result.mp4"
    );
    assert_eq!(assets[0].prompt(), "Hola, bienvenidos");
    assert_eq!(
        studio.tracker().current().map(|s| s.status),
        Some(JobStatus::Completed)
    );
}

#[tokio::test]
async fn test_failed_video_stores_nothing() {
    let backend = Backend::new();
    backend.route("/render-video", 200, json!({"status": "success", "job_id": "vid_2"}));
    let updates = vec![
        JobUpdate::processing("vid_2", 10),
        JobUpdate::failed("vid_2", "Avatar file missing"),
    ];
    let (studio, _store) = studio(backend, updates);

    let request = VideoRenderRequestBuilder::default()
        .script("Hola")
        .avatar_id("missing.png")
        .build()
        .unwrap();
    let snapshot = studio.render_video(&request).await.unwrap();

    assert_eq!(snapshot.status, JobStatus::Failed);
    assert_eq!(snapshot.error.as_deref(), Some("Avatar file missing"));
    assert!(studio.assets().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_multi_scene_prompt_joins_scripts() {
    let backend = Backend::new();
    backend.route(
        "/render-multi-scene",
        200,
        json!({"status": "success", "job_id": "multi_7"}),
    );
    let updates = vec![JobUpdate::completed("multi_7", "http://backend.test/multi_7.mp4")];
    let (studio, _store) = studio(backend, updates);

    let scene = |id: &str, script: &str| {
        SceneBuilder::default()
            .id(id)
            .avatar_id("avatar_1.png")
            .script(script)
            .build()
            .unwrap()
    };
    let request =
        MultiSceneRequest::new(vec![scene("s1", "Primera"), scene("s2", "Segunda")]).unwrap();
    studio.render_multi_scene(&request).await.unwrap();

    let assets = studio.assets().await.unwrap();
    assert_eq!(assets[0].prompt(), "Primera | Segunda");
}

#[tokio::test]
async fn test_submission_without_job_id_fails() {
    let backend = Backend::new();
    backend.route(
        "/render-video",
        200,
        json!({"status": "error", "message": "Avatar not found"}),
    );
    let (studio, _store) = studio(backend, vec![]);

    let request = VideoRenderRequestBuilder::default()
        .script("Hola")
        .avatar_id("nope.png")
        .build()
        .unwrap();
    let err = studio.submit_video(&request).await.unwrap_err();
    assert!(matches!(err.kind(), FoadsErrorKind::Job(_)));
    assert!(err.to_string().contains("Avatar not found"));
}

#[tokio::test]
async fn test_face_swap_error_surfaces_message() {
    let backend = Backend::new();
    backend.route(
        "/face-swap",
        200,
        json!({"status": "error", "message": "No face detected in source image"}),
    );
    let (studio, _store) = studio(backend, vec![]);

    let err = studio
        .face_swap("data:image/png;base64,AAAA", "data:image/png;base64,BBBB")
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "No face detected in source image");
    assert!(studio.assets().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_face_swap_result_prompt() {
    let backend = Backend::new();
    backend.route("/face-swap", 200, json!({"status": "success", "image": RED_SHOE}));
    let (studio, _store) = studio(backend, vec![]);

    let asset = studio
        .face_swap("data:image/png;base64,AAAA", "data:image/png;base64,BBBB")
        .await
        .unwrap();
    assert_eq!(asset.prompt(), foads::FACE_SWAP_PROMPT);
}

#[tokio::test]
async fn test_invalid_parameters_send_nothing() {
    let backend = Backend::new();
    let (studio, _store) = studio(backend.clone(), vec![]);

    let err = studio
        .generate_image("a red shoe", "1:1", 0, 2.0, "")
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), FoadsErrorKind::Validation(_)));

    let err = studio
        .generate_image("a red shoe", "4:3", 4, 2.0, "")
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), FoadsErrorKind::Validation(_)));

    let err = studio.generate_image("  ", "1:1", 4, 2.0, "").await.unwrap_err();
    assert!(matches!(err.kind(), FoadsErrorKind::Validation(_)));

    assert!(backend.paths().is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_stores_nothing() {
    let backend = Backend::new();
    let (studio, _store) = studio(backend, vec![]);

    let err = studio
        .generate_image("a red shoe", "16:9", 4, 2.0, "")
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Connection refused");
    assert!(studio.assets().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_magic_prompt_returns_expansion() {
    let backend = Backend::new();
    backend.route(
        "/magic-prompt",
        200,
        json!({"status": "success", "prompt": "A glossy red sneaker, studio light", "original": "red shoe"}),
    );
    let (studio, _store) = studio(backend, vec![]);

    let prompt = studio.magic_prompt("red shoe").await.unwrap();
    assert_eq!(prompt, "A glossy red sneaker, studio light");
    assert!(studio.assets().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_and_sync() {
    let backend = Backend::new();
    backend.route("/api/assets", 200, json!({"status": "success", "assets_count": 1}));
    let (studio, store) = studio(backend.clone(), vec![]);
    let first = store
        .add_asset(NewAsset::new(AssetKind::Image, "data:a", "a"))
        .await
        .unwrap();
    store
        .add_asset(NewAsset::new(AssetKind::Video, "http://v", "b"))
        .await
        .unwrap();

    studio.delete_asset(first).await.unwrap();
    studio.delete_asset(first).await.unwrap();
    assert_eq!(studio.assets().await.unwrap().len(), 1);

    assert_eq!(studio.sync_assets().await.unwrap(), 1);
    let synced = backend
        .paths()
        .into_iter()
        .filter(|p| p == "/api/assets")
        .count();
    assert_eq!(synced, 1);
}

fn live_studio(backend: Arc<Backend>) -> Studio {
    let events = Arc::new(LivePushes(backend.pushes.clone()));
    let gateway = Gateway::with_transport(GatewayConfig::new("http://backend.test"), backend);
    Studio::new(gateway, Arc::new(InMemoryAssetStore::new()), events)
}

fn quick_request() -> foads::VideoRenderRequest {
    VideoRenderRequestBuilder::default()
        .script("Oferta relámpago")
        .avatar_id("avatar_1.png")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_job_failing_before_subscription_still_ends() {
    let backend = Backend::new();
    backend.route("/render-video", 200, json!({"status": "success", "job_id": "vid_3"}));
    backend.route(
        "/api/jobs/vid_3",
        200,
        json!({"id": "vid_3", "status": "failed", "error": "GPU out of memory"}),
    );
    backend.emit_on_submit(vec![
        JobUpdate::processing("vid_3", 5),
        JobUpdate::failed("vid_3", "GPU out of memory"),
    ]);
    let studio = live_studio(backend);

    let request = quick_request();
    let render = studio.render_video(&request);
    let snapshot = tokio::time::timeout(Duration::from_secs(2), render)
        .await
        .expect("render finished")
        .unwrap();

    assert_eq!(snapshot.status, JobStatus::Failed);
    assert_eq!(snapshot.error.as_deref(), Some("GPU out of memory"));
    assert!(studio.assets().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_job_completing_before_subscription_is_stored() {
    let backend = Backend::new();
    backend.route("/render-video", 200, json!({"status": "success", "job_id": "vid_4"}));
    backend.route(
        "/api/jobs/vid_4",
        200,
        json!({"id": "vid_4", "status": "completed", "type": "video", "url": "http://backend.test/vid_4.mp4"}),
    );
    backend.emit_on_submit(vec![JobUpdate::completed(
        "vid_4",
        "http://backend.test/vid_4.mp4",
    )]);
    let studio = live_studio(backend);

    let request = quick_request();
    let render = studio.render_video(&request);
    let snapshot = tokio::time::timeout(Duration::from_secs(2), render)
        .await
        .expect("render finished")
        .unwrap();

    assert_eq!(snapshot.status, JobStatus::Completed);
    let assets = studio.assets().await.unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].content(), "http://backend.test/vid_4.mp4");
}
