//! Authenticated, fallback-aware backend client.

use crate::{GatewayConfig, Method, ReqwestTransport, Session, Transport, TransportRequest, TransportResponse};
use async_trait::async_trait;
use foads_core::{
    ApiResult, Asset, AssetKind, AssetSyncResponse, AvatarList, FaceSwapRequest, GpuStatus,
    HealthStatus, ImageRequest, JobId, JobSubmission, JobUpdate, LoginResponse,
    MagicPromptResponse, MediaResponse, MultiSceneRequest, ResponseStatus, StyleList,
    VideoRenderRequest, VoiceList, demo,
};
use foads_error::{AuthError, FoadsError, FoadsErrorKind, FoadsResult, HttpError};
use foads_storage::AssetMirror;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Client for the FoadsIA backend.
///
/// Cheap to clone; clones share the transport and the auth session.
///
/// # Example
/// ```no_run
/// use foads_gateway::{Gateway, GatewayConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), foads_error::FoadsError> {
///     let gateway = Gateway::new(GatewayConfig::default())?;
///     let avatars = gateway.avatars().await;
///     if avatars.is_demo {
///         println!("backend offline, showing demo avatars");
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Gateway {
    config: GatewayConfig,
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Gateway {
    /// Gateway over a `reqwest` transport.
    pub fn new(config: GatewayConfig) -> FoadsResult<Self> {
        let transport = ReqwestTransport::new(*config.timeout())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Gateway over a caller-supplied transport, with a fresh session.
    pub fn with_transport(config: GatewayConfig, transport: Arc<dyn Transport>) -> Self {
        debug!(base_url = %config.base_url(), "Created gateway");
        Self {
            config,
            transport,
            session: Arc::new(Session::new()),
        }
    }

    /// Replace the auth session, e.g. with one seeded from a stored token.
    pub fn with_session(mut self, session: Arc<Session>) -> Self {
        self.session = session;
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Auth session in use.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Call `endpoint` and decode the JSON response as `T`.
    ///
    /// Never fails past this boundary. Failures come back as
    /// `ApiResult { data: None, error: Some(msg) }`, or as `fallback` tagged
    /// `is_demo` when one is given. Authentication failures ignore the
    /// fallback so a credentials problem is not hidden behind demo data.
    #[instrument(skip(self, body, fallback))]
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        fallback: Option<T>,
    ) -> ApiResult<T> {
        match self
            .fetch(method, endpoint, body, true)
            .await
            .and_then(|response| decode(&response))
        {
            Ok(data) => ApiResult::success(data),
            Err(e) => recover(endpoint, e, fallback),
        }
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, fallback: Option<T>) -> ApiResult<T> {
        self.call(Method::Get, endpoint, None, fallback).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
        fallback: Option<T>,
    ) -> ApiResult<T> {
        match serde_json::to_value(body) {
            Ok(body) => self.call(Method::Post, endpoint, Some(body), fallback).await,
            Err(e) => ApiResult::failure(format!("Failed to encode request: {}", e)),
        }
    }

    /// Resolve, authenticate and send, re-authenticating once on 401.
    async fn fetch(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        authenticated: bool,
    ) -> FoadsResult<TransportResponse> {
        let url = self.config.resolve(endpoint);
        if !authenticated {
            return Ok(self.send(method, &url, body, None).await?);
        }

        let (token, generation) = self.session.get_or_login(|| self.login()).await?;
        let response = self.send(method, &url, body.clone(), Some(&token)).await?;
        if response.status != 401 {
            return Ok(response);
        }

        warn!(endpoint, "Token rejected, logging in again");
        let (token, _) = self.session.refresh(generation, || self.login()).await?;
        let retried = self.send(method, &url, body, Some(&token)).await?;
        if retried.status == 401 {
            return Err(AuthError::new(format!(
                "{} rejected a freshly issued token",
                endpoint
            ))
            .into());
        }
        Ok(retried)
    }

    /// Anonymous login; returns the issued token.
    #[instrument(skip(self))]
    async fn login(&self) -> FoadsResult<String> {
        let url = self.config.resolve("/auth/login");
        let body = json!({ "username": self.config.login_username() });
        let response = self.send(Method::Post, &url, Some(body), None).await?;
        let login: LoginResponse = decode(&response)
            .map_err(|e| AuthError::new(format!("Login failed: {}", e.user_message())))?;

        match login.token {
            Some(token) if !token.is_empty() => {
                debug!(token_type = ?login.token_type, "Anonymous login succeeded");
                Ok(token)
            }
            _ => Err(AuthError::new(
                login
                    .message
                    .unwrap_or_else(|| "Login response carried no token".to_string()),
            )
            .into()),
        }
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Result<TransportResponse, HttpError> {
        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("ngrok-skip-browser-warning".to_string(), "true".to_string()),
        ];
        if let Some(token) = token {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }
        self.transport
            .send(TransportRequest {
                method,
                url: url.to_string(),
                headers,
                body,
            })
            .await
    }

    /// `GET /` without authentication.
    pub async fn health(&self) -> ApiResult<HealthStatus> {
        match self
            .fetch(Method::Get, "/", None, false)
            .await
            .and_then(|response| decode(&response))
        {
            Ok(health) => ApiResult::success(health),
            Err(e) => recover("/", e, None),
        }
    }

    /// Whether the backend answers its health check with `online`.
    pub async fn check_connection(&self) -> bool {
        matches!(
            self.health().await.data,
            Some(HealthStatus {
                status: ResponseStatus::Online,
                ..
            })
        )
    }

    /// `POST /generate-image`.
    pub async fn generate_image(&self, request: &ImageRequest) -> ApiResult<MediaResponse> {
        self.post("/generate-image", request, None).await
    }

    /// `POST /magic-prompt`.
    pub async fn magic_prompt(&self, prompt: &str) -> ApiResult<MagicPromptResponse> {
        self.post("/magic-prompt", &json!({ "prompt": prompt }), None)
            .await
    }

    /// `POST /face-swap`.
    pub async fn face_swap(&self, request: &FaceSwapRequest) -> ApiResult<MediaResponse> {
        self.post("/face-swap", request, None).await
    }

    /// `POST /render-video`; the backend queues a job.
    pub async fn render_video(&self, request: &VideoRenderRequest) -> ApiResult<JobSubmission> {
        self.post("/render-video", request, None).await
    }

    /// `POST /render-multi-scene`; the backend queues a job.
    pub async fn render_multi_scene(
        &self,
        request: &MultiSceneRequest,
    ) -> ApiResult<JobSubmission> {
        self.post("/render-multi-scene", request, None).await
    }

    /// `GET /api/jobs/{id}`.
    pub async fn job_status(&self, job_id: &JobId) -> ApiResult<JobUpdate> {
        self.get(&format!("/api/jobs/{}", job_id), None).await
    }

    /// `GET /gpu-status`, reporting offline when unreachable.
    pub async fn gpu_status(&self) -> ApiResult<GpuStatus> {
        self.get("/gpu-status", Some(GpuStatus::offline())).await
    }

    /// `GET /avatars`, with demo avatars when unreachable.
    pub async fn avatars(&self) -> ApiResult<AvatarList> {
        self.get("/avatars", Some(demo::avatars())).await
    }

    /// `GET /voices`, with demo voices when unreachable.
    pub async fn voices(&self) -> ApiResult<VoiceList> {
        self.get("/voices", Some(demo::voices())).await
    }

    /// `GET /styles`, with the built-in style list when unreachable.
    pub async fn styles(&self) -> ApiResult<StyleList> {
        self.get("/styles", Some(demo::styles())).await
    }

    /// `POST /api/assets`: copy one local record to the backend.
    pub async fn sync_asset(&self, asset: &Asset) -> ApiResult<AssetSyncResponse> {
        self.post("/api/assets", asset, None).await
    }

    /// `POST /live-portrait`: animate a still portrait, optionally lip-synced.
    pub async fn live_portrait(&self, image: &str, audio: Option<&str>) -> ApiResult<MediaResponse> {
        self.post("/live-portrait", &json!({ "image": image, "audio": audio }), None)
            .await
    }

    /// `POST /enhance-media`: upscale an image or video.
    pub async fn enhance_media(&self, media_url: &str, kind: AssetKind) -> ApiResult<MediaResponse> {
        self.post(
            "/enhance-media",
            &json!({ "media_url": media_url, "type": kind }),
            None,
        )
        .await
    }
}

#[async_trait]
impl AssetMirror for Gateway {
    async fn mirror(&self, asset: &Asset) -> FoadsResult<()> {
        self.sync_asset(asset).await.into_result().map(|_| ())
    }
}

fn recover<T>(endpoint: &str, err: FoadsError, fallback: Option<T>) -> ApiResult<T> {
    let message = err.user_message();
    warn!(endpoint, error = %message, "API call failed");
    match fallback {
        Some(data) if !matches!(err.kind(), FoadsErrorKind::Auth(_)) => {
            info!(endpoint, "Using fallback data");
            ApiResult::demo(data)
        }
        _ => ApiResult::failure(message),
    }
}

fn decode<T: DeserializeOwned>(response: &TransportResponse) -> FoadsResult<T> {
    if !response.is_success() {
        return Err(HttpError::with_status(response.status, error_message(response)).into());
    }
    serde_json::from_slice(&response.body).map_err(|e| {
        FoadsError::from(HttpError::with_status(
            response.status,
            format!("Invalid JSON response: {}", e),
        ))
    })
}

/// The body's `message` field, else `HTTP <code>: <reason>`.
fn error_message(response: &TransportResponse) -> String {
    serde_json::from_slice::<Value>(&response.body)
        .ok()
        .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("HTTP {}: {}", response.status, response.reason))
}
