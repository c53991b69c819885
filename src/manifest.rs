use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;

/// One downloadable chunk as described by the remote manifest.
/// Identity is `relative_path`; `name` is only used in log output.
#[derive(Deserialize, Debug, Clone)]
pub struct Chunk {
    pub name: String,
    pub size: u64,
    #[serde(rename = "path")]
    pub relative_path: String,
    pub url: String,
}

/// Fetches the manifest and decodes it wholesale. Any transport, status,
/// or decode failure aborts the run before a single chunk is downloaded.
pub async fn fetch_manifest(client: &Client, url: &str) -> Result<Vec<Chunk>> {
    let resp = client
        .get(url)
        .send()
        .await
        .context("Failed to reach the manifest server")?
        .error_for_status()
        .context("Manifest request rejected by the server")?;

    let body = resp
        .text()
        .await
        .context("Failed to read the manifest body")?;

    let chunks: Vec<Chunk> =
        serde_json::from_str(&body).context("Failed to parse the manifest")?;

    Ok(chunks)
}
