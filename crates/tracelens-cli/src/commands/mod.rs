//! Subcommand implementations

pub mod release;
pub mod upload;

use anyhow::{bail, Context, Result};
use tracelens_client::{Config, ObjectStorageCredentials, ProxySelection, ReleaseClient};
use tracing::warn;

/// Connection settings shared by every subcommand, resolved in `main`
#[derive(Clone, Debug)]
pub struct ConnectOpts {
    /// API key, if the flag or its environment fallback supplied one
    pub apikey: Option<String>,
    /// Base URL of the release-tracking API
    pub apihost: String,
    /// Proxy selection resolved once at startup
    pub proxy: ProxySelection,
    /// Object-storage notification token
    pub gcs_token: Option<String>,
    /// Object-storage notification bucket
    pub gcs_bucket: Option<String>,
}

/// Build the API client from resolved connection settings
pub fn build_client(opts: &ConnectOpts) -> Result<ReleaseClient> {
    let apikey = resolve_api_key(opts.apikey.as_deref())?;
    let config = Config::new(apikey)
        .with_host(opts.apihost.as_str())
        .with_proxy(opts.proxy.clone());

    let mut client = ReleaseClient::new(config).context("Cannot build the API client")?;

    match (&opts.gcs_token, &opts.gcs_bucket) {
        (Some(token), Some(bucket)) => {
            client.set_object_storage(ObjectStorageCredentials {
                token: token.clone(),
                bucket: bucket.clone(),
            });
        }
        (None, None) => {}
        _ => warn!(
            "Object-storage notifications need both --gcs-token and --gcs-bucket; ignoring"
        ),
    }

    Ok(client)
}

/// Resolve the API key: flag value (clap already folds in the environment
/// fallback) or a pointer at how to supply one
fn resolve_api_key(flag: Option<&str>) -> Result<String> {
    if let Some(key) = flag {
        let trimmed = key.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }
    bail!("Missing API key: pass --apikey or set TRACELENS_APIKEY");
}
