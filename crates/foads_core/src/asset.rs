//! Generated media records.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Identifier assigned by the asset store on insert.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct AssetId(pub i64);

/// Kind of generated media.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AssetKind {
    /// Still image, usually a `data:image/png;base64,...` URI
    Image,
    /// Rendered video, usually a remote URL
    Video,
}

/// An asset record before the store has assigned it an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct NewAsset {
    #[serde(rename = "type")]
    kind: AssetKind,
    content: String,
    prompt: String,
    created_at: i64,
}

impl NewAsset {
    /// Create a record stamped with the current time.
    pub fn new(kind: AssetKind, content: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::at(kind, content, prompt, now_millis())
    }

    /// Create a record with an explicit creation time in milliseconds.
    pub fn at(
        kind: AssetKind,
        content: impl Into<String>,
        prompt: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            kind,
            content: content.into(),
            prompt: prompt.into(),
            created_at,
        }
    }

    /// Attach the id assigned by the store.
    pub fn with_id(self, id: AssetId) -> Asset {
        Asset {
            id,
            kind: self.kind,
            content: self.content,
            prompt: self.prompt,
            created_at: self.created_at,
        }
    }
}

/// A persisted record of one generated media item.
///
/// Records are immutable once stored; the only lifecycle transition after
/// creation is deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    id: AssetId,
    #[serde(rename = "type")]
    kind: AssetKind,
    content: String,
    prompt: String,
    created_at: i64,
}

impl Asset {
    /// Rebuild a record read back from storage.
    pub fn from_parts(
        id: AssetId,
        kind: AssetKind,
        content: String,
        prompt: String,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            kind,
            content,
            prompt,
            created_at,
        }
    }
}

/// Current time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
