//! Backend status command.

use foads::Studio;
use foads_core::{GpuStatus, ResponseStatus};

/// Handle `foads status`.
pub async fn handle_status(studio: &Studio, json: bool) -> anyhow::Result<()> {
    let base_url = studio.gateway().config().base_url().clone();
    let connected = studio.gateway().check_connection().await;
    let gpu = studio.gateway().gpu_status().await;

    if json {
        let report = serde_json::json!({
            "base_url": base_url,
            "connected": connected,
            "gpu": gpu.data,
            "gpu_is_demo": gpu.is_demo,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Backend {}: {}",
        base_url,
        if connected { "online" } else { "offline" }
    );
    match gpu.data {
        Some(status) if !gpu.is_demo => print_gpu(&status),
        _ => println!("GPU: unavailable"),
    }
    Ok(())
}

fn print_gpu(gpu: &GpuStatus) {
    if gpu.status != ResponseStatus::Online {
        println!("GPU: {}", gpu.message.as_deref().unwrap_or("offline"));
        return;
    }
    println!("GPU: {}", gpu.device.as_deref().unwrap_or("unknown device"));
    if let (Some(free), Some(total)) = (gpu.vram_free_gb, gpu.vram_total_gb) {
        println!("  VRAM free: {:.1} / {:.1} GB", free, total);
    }
    if let Some(utilization) = gpu.utilization_percent {
        println!("  Utilization: {:.0}%", utilization);
    }
    if let Some(cuda) = &gpu.cuda_version {
        println!("  CUDA: {}", cuda);
    }
    if !gpu.models_loaded.is_empty() {
        println!("  Models: {}", gpu.models_loaded.join(", "));
    }
}
