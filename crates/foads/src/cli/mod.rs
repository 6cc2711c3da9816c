//! Command-line interface.

mod assets;
mod catalog;
mod commands;
mod generate;
mod media;
mod status;
mod video;

pub use commands::{AssetsCommand, CatalogCommand, Cli, Commands, JobCommand};

use foads::{FoadsConfig, Studio};

/// Dispatch a parsed command line.
pub async fn run(cli: Cli, config: FoadsConfig) -> anyhow::Result<()> {
    let studio = Studio::from_config(&config)?;
    let json = cli.json;

    match cli.command {
        Commands::Status => status::handle_status(&studio, json).await,
        Commands::Image {
            prompt,
            aspect_ratio,
            steps,
            guidance,
            negative_prompt,
            style,
            magic,
            out,
        } => {
            generate::handle_image(
                &studio,
                generate::ImageArgs {
                    prompt,
                    aspect_ratio,
                    steps,
                    guidance,
                    negative_prompt,
                    style,
                    magic,
                    out,
                },
                json,
            )
            .await
        }
        Commands::MagicPrompt { prompt } => generate::handle_magic_prompt(&studio, &prompt).await,
        Commands::FaceSwap {
            source,
            target,
            out,
        } => generate::handle_face_swap(&studio, &source, &target, out.as_deref(), json).await,
        Commands::Video {
            script,
            avatar,
            voice,
            subtitles,
            detach,
        } => video::handle_video(&studio, script, avatar, voice, subtitles, detach, json).await,
        Commands::MultiScene { scenes, detach } => {
            video::handle_multi_scene(&studio, &scenes, detach, json).await
        }
        Commands::Job(command) => video::handle_job(&studio, &config, command, json).await,
        Commands::Assets(command) => assets::handle_assets(&studio, command, json).await,
        Commands::Catalog(command) => catalog::handle_catalog(&studio, command, json).await,
    }
}
