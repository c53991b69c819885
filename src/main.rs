use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use url::Url;

use chunkdl::commands;
use chunkdl::downloader::MAX_ATTEMPTS;
use chunkdl::utils::format_bytes;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Destination root directory for downloaded chunks
    #[arg(index = 1)]
    output_dir: PathBuf,

    /// URL of the JSON manifest describing the chunks to download
    #[arg(short = 'm', long = "manifest-url")]
    manifest_url: Url,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.output_dir.as_os_str().is_empty() {
        bail!("The destination directory must not be empty");
    }

    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(commands::run_downloads(&args.manifest_url, args.output_dir))?;

    let (completed, completed_unit) = format_bytes(report.completed_bytes as f64);
    let (expected, expected_unit) = format_bytes(report.expected_bytes as f64);
    println!(
        "Finished: {} downloaded, {} skipped, {:.2} {} of {:.2} {}",
        report.downloaded, report.skipped, completed, completed_unit, expected, expected_unit
    );

    if !report.is_success() {
        bail!(
            "{} chunk(s) failed after {} attempts: {}",
            report.failed.len(),
            MAX_ATTEMPTS,
            report.failed.join(", ")
        );
    }

    println!("Successfully downloaded!");
    Ok(())
}
