//! Generation request bodies and their validated configuration.

use derive_builder::Builder;
use derive_getters::Getters;
use foads_error::ValidationError;
use serde::{Deserialize, Serialize};

/// Output frame of a generated image.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum AspectRatio {
    /// 1:1, feed posts
    #[default]
    #[serde(rename = "1:1")]
    #[strum(serialize = "1:1")]
    Square,
    /// 16:9, landscape video frames
    #[serde(rename = "16:9")]
    #[strum(serialize = "16:9")]
    Landscape,
    /// 9:16, reels and stories
    #[serde(rename = "9:16")]
    #[strum(serialize = "9:16")]
    Portrait,
}

impl AspectRatio {
    /// Parse a ratio string, rejecting anything outside the supported set.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        value.parse().map_err(|_| {
            ValidationError::new(
                "aspect_ratio",
                format!("'{}' is not one of 1:1, 16:9, 9:16", value),
            )
        })
    }
}

/// Sampler settings for `/generate-image`.
///
/// Built through [`ImageGenerationConfigBuilder`], whose `build` rejects out
/// of range values instead of leaving them to the backend.
///
/// # Examples
///
/// ```
/// use foads_core::{AspectRatio, ImageGenerationConfigBuilder};
///
/// let config = ImageGenerationConfigBuilder::default()
///     .aspect_ratio(AspectRatio::Portrait)
///     .steps(8u32)
///     .guidance(7.5f32)
///     .build()
///     .unwrap();
/// assert_eq!(*config.steps(), 8);
///
/// assert!(ImageGenerationConfigBuilder::default().steps(0u32).build().is_err());
/// assert!(ImageGenerationConfigBuilder::default().guidance(2.3f32).build().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into), build_fn(private, name = "build_unchecked"))]
pub struct ImageGenerationConfig {
    #[builder(default)]
    aspect_ratio: AspectRatio,
    #[builder(default = "ImageGenerationConfig::DEFAULT_STEPS")]
    steps: u32,
    /// Sent as `guidance`; current backends read `guidance_scale` and
    /// ignore this value.
    #[builder(default)]
    guidance: f32,
    #[builder(default)]
    negative_prompt: String,
    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<String>,
}

impl ImageGenerationConfig {
    /// Steps used when none are given.
    pub const DEFAULT_STEPS: u32 = 4;
    /// Fewest sampler steps accepted.
    pub const MIN_STEPS: u32 = 1;
    /// Most sampler steps accepted.
    pub const MAX_STEPS: u32 = 50;
    /// Largest guidance scale accepted.
    pub const MAX_GUIDANCE: f32 = 10.0;

    fn validate(&self) -> Result<(), ValidationError> {
        if !(Self::MIN_STEPS..=Self::MAX_STEPS).contains(&self.steps) {
            return Err(ValidationError::new(
                "steps",
                format!(
                    "must be between {} and {}, got {}",
                    Self::MIN_STEPS,
                    Self::MAX_STEPS,
                    self.steps
                ),
            ));
        }
        if !self.guidance.is_finite() || !(0.0..=Self::MAX_GUIDANCE).contains(&self.guidance) {
            return Err(ValidationError::new(
                "guidance",
                format!("must be between 0 and {}, got {}", Self::MAX_GUIDANCE, self.guidance),
            ));
        }
        if (self.guidance * 2.0).fract() != 0.0 {
            return Err(ValidationError::new(
                "guidance",
                format!("must be a multiple of 0.5, got {}", self.guidance),
            ));
        }
        if let Some(style) = &self.style
            && style.trim().is_empty()
        {
            return Err(ValidationError::new("style", "must not be blank"));
        }
        Ok(())
    }
}

impl Default for ImageGenerationConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: AspectRatio::default(),
            steps: Self::DEFAULT_STEPS,
            guidance: 0.0,
            negative_prompt: String::new(),
            style: None,
        }
    }
}

impl ImageGenerationConfigBuilder {
    /// Build and validate the configuration.
    pub fn build(&self) -> Result<ImageGenerationConfig, ValidationError> {
        let config = self
            .build_unchecked()
            .map_err(|e| ValidationError::new("config", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Body of `POST /generate-image`.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct ImageRequest {
    prompt: String,
    #[serde(flatten)]
    config: ImageGenerationConfig,
}

impl ImageRequest {
    /// Pair a prompt with a validated configuration.
    pub fn new(
        prompt: impl Into<String>,
        config: ImageGenerationConfig,
    ) -> Result<Self, ValidationError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(ValidationError::new("prompt", "must not be empty"));
        }
        Ok(Self { prompt, config })
    }
}

/// Body of `POST /face-swap`. Both images are base64 data URIs.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct FaceSwapRequest {
    source_image: String,
    target_image: String,
}

impl FaceSwapRequest {
    /// Create a face swap request, rejecting missing images.
    pub fn new(
        source_image: impl Into<String>,
        target_image: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let source_image = source_image.into();
        let target_image = target_image.into();
        if source_image.is_empty() {
            return Err(ValidationError::new("source_image", "is required"));
        }
        if target_image.is_empty() {
            return Err(ValidationError::new("target_image", "is required"));
        }
        Ok(Self {
            source_image,
            target_image,
        })
    }
}

/// Body of `POST /render-video`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct VideoRenderRequest {
    /// Text spoken by the avatar
    script: String,
    /// Avatar file id from `/avatars`
    avatar_id: String,
    /// Text-to-speech voice from `/voices`
    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    voice_id: Option<String>,
    #[builder(default)]
    generate_subtitles: bool,
}

/// One segment of a multi-scene render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    id: String,
    avatar_id: String,
    #[builder(default)]
    avatar_name: String,
    #[builder(default)]
    avatar_img: String,
    script: String,
    #[builder(default)]
    generate_subtitles: bool,
}

/// Body of `POST /render-multi-scene`.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct MultiSceneRequest {
    scenes: Vec<Scene>,
}

impl MultiSceneRequest {
    /// Create a multi-scene request; every scene needs a script.
    pub fn new(scenes: Vec<Scene>) -> Result<Self, ValidationError> {
        if scenes.is_empty() {
            return Err(ValidationError::new("scenes", "at least one scene is required"));
        }
        if let Some(scene) = scenes.iter().find(|s| s.script.trim().is_empty()) {
            return Err(ValidationError::new(
                "scenes",
                format!("scene '{}' has no script", scene.id),
            ));
        }
        Ok(Self { scenes })
    }
}
