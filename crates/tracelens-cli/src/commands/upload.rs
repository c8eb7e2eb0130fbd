//! `tracelens upload` subcommand

use crate::discover::{self, UploadCandidate};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tracelens_client::ReleaseClient;

/// Options for the upload subcommand
#[derive(Clone, Debug)]
pub struct UploadOptions {
    /// Files or directories to search for artifacts
    pub paths: Vec<PathBuf>,
    /// Release the artifacts belong to
    pub release: String,
    /// Prefix for the path each artifact is served from
    pub url_prefix: String,
    /// Basename globs for directory scans; empty means the defaults
    pub include: Vec<String>,
}

/// Discover artifacts and upload them one at a time, gated on the CLI
/// status check. Individual failures are reported and counted; the command
/// fails if any file could not be uploaded.
pub async fn cmd_upload(client: &ReleaseClient, options: &UploadOptions) -> Result<()> {
    if let Some(notice) = client.check_status().await? {
        eprintln!("{}", notice);
    }

    let candidates = discover::collect(&options.paths, &options.url_prefix, &options.include)?;
    if candidates.is_empty() {
        bail!("Found no files to upload under the given paths");
    }

    eprintln!(
        "Uploading {} files for release {}",
        candidates.len(),
        options.release
    );

    let mut failures = 0usize;
    for candidate in &candidates {
        match upload_one(client, &options.release, candidate).await {
            Ok(()) => eprintln!("  {}", candidate.logical_path),
            Err(e) => {
                failures += 1;
                eprintln!("  {}: {}", candidate.logical_path, e);
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} files failed to upload", failures, candidates.len());
    }

    println!(
        "Uploaded {} files for release {}",
        candidates.len(),
        options.release
    );
    Ok(())
}

async fn upload_one(
    client: &ReleaseClient,
    release: &str,
    candidate: &UploadCandidate,
) -> Result<()> {
    let contents = tokio::fs::read(&candidate.path)
        .await
        .with_context(|| format!("Cannot read {}", candidate.path.display()))?;

    let response = client
        .upload_file(release, &candidate.logical_path, contents)
        .await?;

    if !response.is_success() {
        let reason = response
            .message()
            .unwrap_or_else(|| format!("HTTP {}", response.status()));
        bail!("{}", reason);
    }

    Ok(())
}
