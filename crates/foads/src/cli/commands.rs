//! CLI structure and command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// FoadsIA ad studio: generate images and avatar videos against a FoadsIA backend.
#[derive(Parser, Debug)]
#[command(name = "foads")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: $XDG_CONFIG_HOME/foads/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overrides configuration
    #[arg(long, global = true, env = "FOADS_API_URL")]
    pub api_url: Option<String>,

    /// Directory for the local asset database
    #[arg(long, global = true, env = "FOADS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check backend and GPU status
    Status,

    /// Generate an image and add it to the library
    Image {
        /// What to draw
        prompt: String,

        /// 1:1, 16:9 or 9:16
        #[arg(short, long, default_value = "1:1")]
        aspect_ratio: String,

        /// Sampler steps (1-50)
        #[arg(long, default_value_t = 4)]
        steps: u32,

        /// Guidance scale (0-10, in 0.5 steps)
        #[arg(long, default_value_t = 0.0)]
        guidance: f32,

        /// What to avoid
        #[arg(short, long, default_value = "")]
        negative_prompt: String,

        /// Style preset, see `foads catalog styles`
        #[arg(long)]
        style: Option<String>,

        /// Expand the prompt with the magic prompt endpoint first
        #[arg(long)]
        magic: bool,

        /// Also write the image to this file
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Expand a short idea into a detailed prompt
    MagicPrompt {
        /// Idea to expand
        prompt: String,
    },

    /// Put the face from one image onto another
    FaceSwap {
        /// Image containing the face
        source: PathBuf,

        /// Image to receive the face
        target: PathBuf,

        /// Also write the result to this file
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Render a talking-avatar video
    Video {
        /// Text the avatar speaks
        script: String,

        /// Avatar id, see `foads catalog avatars`
        #[arg(short, long)]
        avatar: String,

        /// Voice id, see `foads catalog voices`
        #[arg(long)]
        voice: Option<String>,

        /// Burn in subtitles
        #[arg(long)]
        subtitles: bool,

        /// Print the job id and exit instead of waiting
        #[arg(long)]
        detach: bool,
    },

    /// Render a video from several scenes described in a JSON file
    MultiScene {
        /// JSON array of scenes
        scenes: PathBuf,

        /// Print the job id and exit instead of waiting
        #[arg(long)]
        detach: bool,
    },

    /// Follow a submitted render job
    #[command(subcommand)]
    Job(JobCommand),

    /// Manage the local asset library
    #[command(subcommand)]
    Assets(AssetsCommand),

    /// List avatars, voices and styles offered by the backend
    #[command(subcommand)]
    Catalog(CatalogCommand),
}

/// Job subcommands.
#[derive(Subcommand, Debug)]
pub enum JobCommand {
    /// Follow a job over the push channel
    Watch {
        /// Job id returned on submission
        job_id: String,

        /// Prompt recorded with the stored video
        #[arg(long, default_value = "")]
        prompt: String,
    },

    /// Follow a job by polling its status
    Poll {
        /// Job id returned on submission
        job_id: String,

        /// Prompt recorded with the stored video
        #[arg(long, default_value = "")]
        prompt: String,
    },
}

/// Asset library subcommands.
#[derive(Subcommand, Debug)]
pub enum AssetsCommand {
    /// List stored assets, newest first
    List {
        /// Show at most this many
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Delete a stored asset
    Delete {
        /// Asset id
        id: i64,
    },

    /// Copy every stored asset to the backend
    Sync,
}

/// Catalog subcommands.
#[derive(Subcommand, Debug)]
pub enum CatalogCommand {
    /// Presenter avatars
    Avatars,
    /// Text-to-speech voices
    Voices,
    /// Image style presets
    Styles,
}
