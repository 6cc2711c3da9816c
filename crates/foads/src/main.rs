//! FoadsIA command-line client.

mod cli;

use clap::Parser;
use cli::Cli;
use foads::FoadsConfig;
use foads_core::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(if cli.verbose { "foads=debug,info" } else { "warn" });

    let mut config = match &cli.config {
        Some(path) => FoadsConfig::load_from(Some(path.as_path()), None)?,
        None => FoadsConfig::load()?,
    };
    if let Some(api_url) = &cli.api_url {
        config = config.with_api_url(api_url.clone());
    }
    if let Some(data_dir) = &cli.data_dir {
        config = config.with_data_dir(data_dir.clone());
    }

    cli::run(cli, config).await
}
