//! Asset library commands.

use super::commands::AssetsCommand;
use foads::{AssetId, Studio};

/// Longest prompt shown in listings.
const PROMPT_WIDTH: usize = 60;

/// Handle `foads assets`.
pub async fn handle_assets(
    studio: &Studio,
    command: AssetsCommand,
    json: bool,
) -> anyhow::Result<()> {
    match command {
        AssetsCommand::List { limit } => {
            let mut assets = studio.assets().await?;
            if let Some(limit) = limit {
                assets.truncate(limit);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&assets)?);
                return Ok(());
            }
            if assets.is_empty() {
                println!("No assets yet.");
            }
            for asset in &assets {
                let created = created_label(*asset.created_at());
                println!(
                    "{:>5}  {:<5}  {}  {}",
                    asset.id(),
                    asset.kind(),
                    created,
                    truncate(asset.prompt(), PROMPT_WIDTH)
                );
            }
        }
        AssetsCommand::Delete { id } => {
            studio.delete_asset(AssetId(id)).await?;
            if !json {
                println!("Deleted asset #{}", id);
            }
        }
        AssetsCommand::Sync => {
            let count = studio.sync_assets().await?;
            if json {
                println!("{}", serde_json::json!({ "synced": count }));
            } else {
                println!("Synced {} assets", count);
            }
        }
    }
    Ok(())
}

fn created_label(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", cut)
}
