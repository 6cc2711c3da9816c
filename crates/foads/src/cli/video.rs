//! Video render and job tracking commands.

use super::commands::JobCommand;
use foads::{
    FoadsConfig, JobId, JobSnapshot, JobStatus, MultiSceneRequest, Scene, Studio,
    VideoRenderRequestBuilder,
};
use foads_jobs::{JobEventSource, JobPoller, SocketIoEventSource};
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle `foads video`.
pub async fn handle_video(
    studio: &Studio,
    script: String,
    avatar: String,
    voice: Option<String>,
    subtitles: bool,
    detach: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut builder = VideoRenderRequestBuilder::default();
    builder
        .script(script)
        .avatar_id(avatar)
        .generate_subtitles(subtitles);
    if let Some(voice) = voice {
        builder.voice_id(voice);
    }
    let request = builder.build()?;

    if detach {
        let job_id = studio.submit_video(&request).await?;
        return print_job_id(&job_id, json);
    }

    let printer = spawn_progress_printer(studio, json);
    let result = studio.render_video(&request).await;
    printer.abort();
    print_snapshot(&result?, json)
}

/// Handle `foads multi-scene`.
pub async fn handle_multi_scene(
    studio: &Studio,
    scenes: &Path,
    detach: bool,
    json: bool,
) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(scenes)?;
    let scenes: Vec<Scene> = serde_json::from_str(&raw)?;
    let request = MultiSceneRequest::new(scenes)?;

    if detach {
        let job_id = studio.submit_multi_scene(&request).await?;
        return print_job_id(&job_id, json);
    }

    let printer = spawn_progress_printer(studio, json);
    let result = studio.render_multi_scene(&request).await;
    printer.abort();
    print_snapshot(&result?, json)
}

/// Handle `foads job watch|poll`.
pub async fn handle_job(
    studio: &Studio,
    config: &FoadsConfig,
    command: JobCommand,
    json: bool,
) -> anyhow::Result<()> {
    let (job_id, prompt, source): (String, String, Arc<dyn JobEventSource>) = match command {
        JobCommand::Watch { job_id, prompt } => (
            job_id,
            prompt,
            Arc::new(SocketIoEventSource::new(config.api_url())),
        ),
        JobCommand::Poll { job_id, prompt } => (
            job_id,
            prompt,
            Arc::new(JobPoller::new(
                Arc::new(studio.gateway().clone()),
                config.poll_config()?,
            )),
        ),
    };

    let printer = spawn_progress_printer(studio, json);
    let result = studio
        .track_job_via(source.as_ref(), JobId(job_id), &prompt)
        .await;
    printer.abort();
    print_snapshot(&result?, json)
}

fn spawn_progress_printer(studio: &Studio, json: bool) -> JoinHandle<()> {
    let mut snapshots = studio.tracker().subscribe();
    tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let Some(snapshot) = snapshots.borrow_and_update().clone() else {
                continue;
            };
            if json || snapshot.status.is_terminal() {
                continue;
            }
            match &snapshot.message {
                Some(message) => eprintln!("[{:>3}%] {}", snapshot.progress, message),
                None => eprintln!("[{:>3}%] {}", snapshot.progress, snapshot.status),
            }
        }
    })
}

fn print_job_id(job_id: &JobId, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::json!({ "job_id": job_id.as_str() }));
    } else {
        println!("{}", job_id);
    }
    Ok(())
}

fn print_snapshot(snapshot: &JobSnapshot, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
        return Ok(());
    }
    match snapshot.status {
        JobStatus::Completed => println!(
            "Job {} completed: {}",
            snapshot.job_id,
            snapshot.result_url.as_deref().unwrap_or_default()
        ),
        JobStatus::Failed => anyhow::bail!(
            "Job {} failed: {}",
            snapshot.job_id,
            snapshot.error.as_deref().unwrap_or_default()
        ),
        status => println!("Job {} is {}", snapshot.job_id, status),
    }
    Ok(())
}
