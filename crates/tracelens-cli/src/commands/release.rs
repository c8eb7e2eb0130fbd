//! `tracelens release` subcommand

use anyhow::{bail, Result};
use tracelens_client::ReleaseClient;

/// Register a release version, gated on the CLI status check
pub async fn cmd_release(client: &ReleaseClient, version: &str) -> Result<()> {
    if let Some(notice) = client.check_status().await? {
        eprintln!("{}", notice);
    }

    let response = client.create_release(version).await?;
    if !response.is_success() {
        let reason = response
            .message()
            .unwrap_or_else(|| format!("HTTP {}", response.status()));
        bail!("Could not create release {}: {}", version, reason);
    }

    println!("Created release {}", version);
    Ok(())
}
