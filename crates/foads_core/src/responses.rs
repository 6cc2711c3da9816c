//! Response bodies returned by the FoadsIA backend.

use serde::{Deserialize, Serialize};

/// The backend's `status` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResponseStatus {
    /// Action succeeded
    Success,
    /// Action failed; see `message`
    Error,
    /// Service or GPU available
    Online,
    /// Service or GPU unavailable
    Offline,
    /// Anything else the backend may add later
    #[serde(other)]
    Unknown,
}

/// Body returned by media-producing endpoints (`/generate-image`,
/// `/face-swap`, `/live-portrait`, `/enhance-media`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaResponse {
    /// Success or error
    pub status: ResponseStatus,
    /// Image as a data URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Video as a URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    /// Generic result URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Error or informational message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Whether the backend served the result from its cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
}

impl MediaResponse {
    /// The produced media, or the backend's message when there is none.
    pub fn into_media(self) -> Result<String, String> {
        let media = self.image.or(self.video).or(self.url);
        match (self.status, media) {
            (ResponseStatus::Success, Some(media)) => Ok(media),
            (_, _) => Err(self
                .message
                .unwrap_or_else(|| "Processing failed".to_string())),
        }
    }
}

/// Body returned by `/magic-prompt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagicPromptResponse {
    /// Success or error
    pub status: ResponseStatus,
    /// Enhanced prompt
    #[serde(default)]
    pub prompt: Option<String>,
    /// Prompt as submitted
    #[serde(default)]
    pub original: Option<String>,
    /// Enhancement strategy used by the backend
    #[serde(default)]
    pub method: Option<String>,
    /// Error message
    #[serde(default)]
    pub message: Option<String>,
}

/// Body returned by `/render-video` and `/render-multi-scene`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSubmission {
    /// Success or error
    pub status: ResponseStatus,
    /// Identifier of the queued job
    #[serde(default)]
    pub job_id: Option<String>,
    /// Queue message or error
    #[serde(default)]
    pub message: Option<String>,
}

/// Body returned by `/gpu-status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuStatus {
    /// Online or offline
    pub status: ResponseStatus,
    /// CUDA device name
    #[serde(default)]
    pub device: Option<String>,
    /// Total VRAM in GB
    #[serde(default)]
    pub vram_total_gb: Option<f64>,
    /// Allocated VRAM in GB
    #[serde(default)]
    pub vram_allocated_gb: Option<f64>,
    /// Reserved VRAM in GB
    #[serde(default)]
    pub vram_reserved_gb: Option<f64>,
    /// Free VRAM in GB
    #[serde(default)]
    pub vram_free_gb: Option<f64>,
    /// Reserved share of total VRAM
    #[serde(default)]
    pub utilization_percent: Option<f64>,
    /// Models currently resident on the GPU
    #[serde(default)]
    pub models_loaded: Vec<String>,
    /// CUDA runtime version
    #[serde(default)]
    pub cuda_version: Option<String>,
    /// Explanation when offline
    #[serde(default)]
    pub message: Option<String>,
}

impl GpuStatus {
    /// Status reported when the GPU cannot be reached.
    pub fn offline() -> Self {
        Self {
            status: ResponseStatus::Offline,
            device: None,
            vram_total_gb: None,
            vram_allocated_gb: None,
            vram_reserved_gb: None,
            vram_free_gb: None,
            utilization_percent: None,
            models_loaded: Vec::new(),
            cuda_version: None,
            message: Some("GPU no disponible".to_string()),
        }
    }
}

/// Body returned by `GET /`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Online when the backend is running
    pub status: ResponseStatus,
    /// Banner message
    #[serde(default)]
    pub message: Option<String>,
    /// Deployment mode, e.g. `free_oss`
    #[serde(default)]
    pub mode: Option<String>,
    /// Public URL the backend believes it is served from
    #[serde(default)]
    pub base_url: Option<String>,
}

/// A presenter image usable in video renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    /// File id passed back as `avatar_id`
    pub id: String,
    /// Display name
    pub name: String,
    /// Preview image URL
    pub img: String,
}

/// Body returned by `/avatars`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarList {
    /// Success or error
    pub status: ResponseStatus,
    /// Available avatars
    #[serde(default)]
    pub avatars: Vec<Avatar>,
}

/// A text-to-speech voice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    /// Voice id passed back as `voice_id`
    pub id: String,
    /// Display name
    pub name: String,
    /// BCP 47 language tag
    pub language: String,
    /// Voice gender
    pub gender: String,
    /// Country label
    #[serde(default)]
    pub country: Option<String>,
}

/// Body returned by `/voices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceList {
    /// Success or error
    pub status: ResponseStatus,
    /// Available voices
    #[serde(default)]
    pub voices: Vec<Voice>,
}

/// Body returned by `/styles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleList {
    /// Success or error
    pub status: ResponseStatus,
    /// Style preset names
    #[serde(default)]
    pub styles: Vec<String>,
}

/// Body returned by `/auth/login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Success or error
    pub status: ResponseStatus,
    /// Bearer token
    #[serde(default)]
    pub token: Option<String>,
    /// Token scheme, `Bearer`
    #[serde(rename = "type", default)]
    pub token_type: Option<String>,
    /// Error message
    #[serde(default)]
    pub message: Option<String>,
}

/// Body returned by `POST /api/assets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSyncResponse {
    /// Success or error
    pub status: ResponseStatus,
    /// Number of assets held remotely
    #[serde(default)]
    pub assets_count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_error_message_surfaces() {
        let body = r#"{"status":"error","message":"No face detected in source image"}"#;
        let response: MediaResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            response.into_media().unwrap_err(),
            "No face detected in source image"
        );
    }

    #[test]
    fn test_unknown_status_tolerated() {
        let body = r#"{"status":"degraded"}"#;
        let health: HealthStatus = serde_json::from_str(body).unwrap();
        assert_eq!(health.status, ResponseStatus::Unknown);
    }

    #[test]
    fn test_gpu_status_parses() {
        let body = r#"{"status":"online","device":"Tesla T4","vram_total_gb":15.0,"vram_free_gb":8.5,"vram_allocated_gb":6.5}"#;
        let gpu: GpuStatus = serde_json::from_str(body).unwrap();
        assert_eq!(gpu.device.as_deref(), Some("Tesla T4"));
        assert_eq!(gpu.vram_total_gb, Some(15.0));
        assert!(gpu.models_loaded.is_empty());
    }
}
