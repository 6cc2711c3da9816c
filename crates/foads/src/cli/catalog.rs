//! Avatar, voice and style listings.

use super::commands::CatalogCommand;
use foads::Studio;
use serde::Serialize;

/// Handle `foads catalog`.
pub async fn handle_catalog(
    studio: &Studio,
    command: CatalogCommand,
    json: bool,
) -> anyhow::Result<()> {
    let gateway = studio.gateway();
    match command {
        CatalogCommand::Avatars => {
            let result = gateway.avatars().await;
            let is_demo = result.is_demo;
            let list = result.into_result()?;
            if json {
                return print_json(&list);
            }
            print_header("Avatars", is_demo);
            for avatar in &list.avatars {
                println!("  {:<24} {}", avatar.id, avatar.name);
            }
        }
        CatalogCommand::Voices => {
            let result = gateway.voices().await;
            let is_demo = result.is_demo;
            let list = result.into_result()?;
            if json {
                return print_json(&list);
            }
            print_header("Voices", is_demo);
            for voice in &list.voices {
                println!(
                    "  {:<28} {:<16} {} {}",
                    voice.id, voice.name, voice.language, voice.gender
                );
            }
        }
        CatalogCommand::Styles => {
            let result = gateway.styles().await;
            let is_demo = result.is_demo;
            let list = result.into_result()?;
            if json {
                return print_json(&list);
            }
            print_header("Styles", is_demo);
            for style in &list.styles {
                println!("  {}", style);
            }
        }
    }
    Ok(())
}

fn print_header(title: &str, is_demo: bool) {
    if is_demo {
        println!("{} (demo)", title);
    } else {
        println!("{}", title);
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
