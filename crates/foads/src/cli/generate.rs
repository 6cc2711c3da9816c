//! Image, face swap and magic prompt commands.

use super::media::{save_data_uri, to_data_uri};
use foads::{Asset, Studio};
use foads_core::{AspectRatio, ImageGenerationConfigBuilder};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Arguments of the `image` command.
#[derive(Debug)]
pub struct ImageArgs {
    pub prompt: String,
    pub aspect_ratio: String,
    pub steps: u32,
    pub guidance: f32,
    pub negative_prompt: String,
    pub style: Option<String>,
    pub magic: bool,
    pub out: Option<PathBuf>,
}

/// Handle `foads image`.
#[instrument(skip_all, fields(aspect_ratio = %args.aspect_ratio, steps = args.steps))]
pub async fn handle_image(studio: &Studio, args: ImageArgs, json: bool) -> anyhow::Result<()> {
    let prompt = if args.magic {
        let expanded = studio.magic_prompt(&args.prompt).await?;
        info!(prompt = %expanded, "Using expanded prompt");
        expanded
    } else {
        args.prompt
    };

    let mut builder = ImageGenerationConfigBuilder::default();
    builder
        .aspect_ratio(AspectRatio::parse(&args.aspect_ratio)?)
        .steps(args.steps)
        .guidance(args.guidance)
        .negative_prompt(args.negative_prompt);
    if let Some(style) = args.style {
        builder.style(style);
    }
    let config = builder.build()?;

    let asset = studio.generate_image_with(&prompt, config).await?;
    if let Some(out) = &args.out {
        save_data_uri(asset.content(), out)?;
    }
    print_asset(&asset, args.out.as_deref(), json)
}

/// Handle `foads face-swap`.
pub async fn handle_face_swap(
    studio: &Studio,
    source: &Path,
    target: &Path,
    out: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let source = to_data_uri(source)?;
    let target = to_data_uri(target)?;
    let asset = studio.face_swap(&source, &target).await?;
    if let Some(out) = out {
        save_data_uri(asset.content(), out)?;
    }
    print_asset(&asset, out, json)
}

/// Handle `foads magic-prompt`.
pub async fn handle_magic_prompt(studio: &Studio, prompt: &str) -> anyhow::Result<()> {
    println!("{}", studio.magic_prompt(prompt).await?);
    Ok(())
}

fn print_asset(asset: &Asset, saved_to: Option<&Path>, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(asset)?);
        return Ok(());
    }
    println!("Stored {} asset #{}", asset.kind(), asset.id());
    if let Some(path) = saved_to {
        println!("Saved to {}", path.display());
    }
    Ok(())
}
