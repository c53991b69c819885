use anyhow::{bail, Context, Result};
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use crate::manifest::Chunk;
use crate::progress::ProgressTracker;
use crate::utils::format_bytes;

/// Attempt budget per chunk, covering every failure class.
pub const MAX_ATTEMPTS: u32 = 5;

const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Terminal state of one chunk task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkOutcome {
    /// Fetched from the remote and written to disk.
    Downloaded,
    /// Already present on disk with the expected byte length.
    Skipped,
    /// Every attempt failed; the target file may be absent or partial.
    Exhausted,
}

pub struct Downloader {
    client: Client,
    output_dir: PathBuf,
    progress: Arc<ProgressTracker>,
}

impl Downloader {
    pub fn new(output_dir: PathBuf, progress: Arc<ProgressTracker>) -> Self {
        // No request timeouts: a run only ends once every chunk settles.
        let client = Client::builder()
            .user_agent(concat!("chunkdl/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            output_dir,
            progress,
        }
    }

    /// Downloads one chunk to `output_dir/<relative_path>`, retrying up to
    /// `MAX_ATTEMPTS` times. Never propagates an error; the caller gets a
    /// `ChunkOutcome` instead.
    pub async fn download_chunk(&self, chunk: &Chunk) -> ChunkOutcome {
        let target = self.output_dir.join(&chunk.relative_path);

        for attempt in 1..=MAX_ATTEMPTS {
            // A file of exactly the expected length counts as done,
            // including one left behind by an earlier run.
            if let Ok(metadata) = fs::metadata(&target).await {
                if metadata.is_file() && metadata.len() == chunk.size {
                    self.progress.record_completed(chunk.size);
                    println!("Already downloaded {}", chunk.name);
                    return ChunkOutcome::Skipped;
                }
            }

            if let Some(parent) = target.parent() {
                if let Err(err) = fs::create_dir_all(parent).await {
                    println!(
                        "Creating directory failed for {}, retrying: {}",
                        chunk.name, err
                    );
                    continue;
                }
            }

            match self.fetch_once(chunk, &target).await {
                Ok(()) => {
                    let completed = self.progress.record_completed(chunk.size);
                    let (done, done_unit) = format_bytes(completed as f64);
                    let (total, total_unit) =
                        format_bytes(self.progress.expected_bytes() as f64);
                    println!(
                        "Downloaded: {}, Total downloaded: {:.2} {} out of {:.2} {}",
                        chunk.name, done, done_unit, total, total_unit
                    );
                    return ChunkOutcome::Downloaded;
                }
                Err(err) => {
                    println!(
                        "Attempt {}/{} failed for {}: {:#}",
                        attempt, MAX_ATTEMPTS, chunk.name, err
                    );
                    if attempt < MAX_ATTEMPTS {
                        tokio::time::sleep(RETRY_DELAY).await;
                    }
                }
            }
        }

        println!(
            "Giving up on {} after {} attempts",
            chunk.name, MAX_ATTEMPTS
        );
        ChunkOutcome::Exhausted
    }

    /// One fetch attempt. The file handle and the response body are both
    /// owned here, so every exit path releases them before the retry loop
    /// continues.
    async fn fetch_once(&self, chunk: &Chunk, target: &Path) -> Result<()> {
        let mut file = File::create(target)
            .await
            .context("Failed to create the target file")?;

        let response = self
            .client
            .get(&chunk.url)
            .send()
            .await
            .context("Failed to reach the server")?;

        let status = response.status();
        if status != StatusCode::OK {
            bail!("Server responded with status {}", status);
        }

        let mut stream = response.bytes_stream();
        while let Some(item) = stream.next().await {
            let bytes = item.context("Error while reading the response body")?;
            file.write_all(&bytes)
                .await
                .context("Error while writing to the target file")?;
        }

        file.flush()
            .await
            .context("Failed to flush the target file")?;

        Ok(())
    }
}
