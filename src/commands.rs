use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use url::Url;

use crate::downloader::{ChunkOutcome, Downloader};
use crate::manifest;
use crate::progress::ProgressTracker;
use crate::utils::format_bytes;

/// Per-chunk outcomes collected after every task has settled.
pub struct DownloadReport {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: Vec<String>,
    pub completed_bytes: u64,
    pub expected_bytes: u64,
}

impl DownloadReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Fetches the manifest and downloads every chunk concurrently into
/// `output_dir`. Returns once every chunk has reached a terminal state;
/// manifest failures are fatal and abort before any download starts.
pub async fn run_downloads(manifest_url: &Url, output_dir: PathBuf) -> Result<DownloadReport> {
    if !output_dir.exists() {
        fs::create_dir_all(&output_dir)
            .await
            .context("Failed to create the output directory")?;
    }

    let client = reqwest::Client::builder()
        .user_agent(concat!("chunkdl/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());

    let chunks = manifest::fetch_manifest(&client, manifest_url.as_str()).await?;

    let expected_bytes: u64 = chunks.iter().map(|c| c.size).sum();
    let progress = Arc::new(ProgressTracker::new(expected_bytes));

    let (total, total_unit) = format_bytes(expected_bytes as f64);
    println!("To download size: {:.2} {}", total, total_unit);

    let downloader = Arc::new(Downloader::new(output_dir, progress.clone()));

    // Every chunk gets its own task, all launched at once; the manifest
    // guarantees the target paths never collide.
    let mut handles = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let downloader = downloader.clone();
        handles.push(tokio::spawn(async move {
            let outcome = downloader.download_chunk(&chunk).await;
            (chunk.name, outcome)
        }));
    }

    let mut downloaded = 0;
    let mut skipped = 0;
    let mut failed = Vec::new();
    for handle in handles {
        let (name, outcome) = handle.await.context("A download task panicked")?;
        match outcome {
            ChunkOutcome::Downloaded => downloaded += 1,
            ChunkOutcome::Skipped => skipped += 1,
            ChunkOutcome::Exhausted => failed.push(name),
        }
    }

    Ok(DownloadReport {
        downloaded,
        skipped,
        failed,
        completed_bytes: progress.completed_bytes(),
        expected_bytes,
    })
}
