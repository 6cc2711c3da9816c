//! Data URI helpers for files passed on the command line.

use anyhow::{Context, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;

/// Read an image file into a `data:<mime>;base64,...` URI.
pub fn to_data_uri(path: &Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(format!("data:{};base64,{}", mime_for(path), STANDARD.encode(bytes)))
}

/// Decode a base64 data URI and write its bytes to `path`.
pub fn save_data_uri(uri: &str, path: &Path) -> anyhow::Result<()> {
    let Some((header, payload)) = uri.split_once(',') else {
        bail!("not a data URI");
    };
    if !(header.starts_with("data:") && header.ends_with(";base64")) {
        bail!("only base64 data URIs can be saved, got '{}'", header);
    }
    let bytes = STANDARD.decode(payload).context("decoding image data")?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn mime_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("mp4") => "video/mp4",
        _ => "image/png",
    }
}
