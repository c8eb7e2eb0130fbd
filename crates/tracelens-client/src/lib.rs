//! # Tracelens Client SDK
//!
//! An async client for the Tracelens release-tracking API: the CLI status
//! gate, release registration, and signed-URL artifact uploads.
//!
//! ## Example
//!
//! ```rust,ignore
//! use tracelens_client::{Config, ReleaseClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ReleaseClient::new(Config::new("my-org:my-app"))?;
//!
//!     // Fatal incompatibilities come back as errors; advisories as Some(_)
//!     if let Some(notice) = client.check_status().await? {
//!         eprintln!("{}", notice);
//!     }
//!
//!     client.create_release("1.2.3").await?;
//!
//!     let response = client
//!         .upload_file("1.2.3", "~/app.js", std::fs::read("dist/app.js")?)
//!         .await?;
//!     println!("Upload finished with HTTP {}", response.status());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod proxy;
mod types;

pub use client::{ReleaseClient, CHANNEL_TOKEN_HEADER, CLI_VERSION_HEADER};
pub use config::{Config, ObjectStorageCredentials, DEFAULT_API_HOST};
pub use error::{ClientError, Result};
pub use proxy::ProxySelection;
pub use types::{ApiResponse, ArtifactUploadResponse};
