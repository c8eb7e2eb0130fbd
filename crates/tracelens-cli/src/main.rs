//! Tracelens CLI - release registration and artifact upload

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracelens_cli::commands::{self, upload::UploadOptions, ConnectOpts};
use tracelens_client::ProxySelection;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "tracelens")]
#[command(about = "Track releases and upload build artifacts to Tracelens")]
#[command(version)]
struct Cli {
    /// API key in `org-slug:app-slug` form
    #[arg(short = 'k', long, env = "TRACELENS_APIKEY", global = true)]
    apikey: Option<String>,

    /// Base URL of the release-tracking API
    #[arg(
        long,
        env = "TRACELENS_APIHOST",
        default_value = tracelens_client::DEFAULT_API_HOST,
        global = true
    )]
    apihost: String,

    /// Channel token for object-storage notifications
    #[arg(long, env = "TRACELENS_GCS_TOKEN", hide = true, global = true)]
    gcs_token: Option<String>,

    /// Bucket for object-storage notifications
    #[arg(long, env = "TRACELENS_GCS_BUCKET", hide = true, global = true)]
    gcs_bucket: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register a release version with the API
    Release {
        /// Version string to register
        version: String,
    },
    /// Upload build artifacts for a release
    Upload {
        /// Files or directories to search
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Release the artifacts belong to
        #[arg(short, long)]
        release: String,

        /// Prefix for the path each artifact is served from
        #[arg(short = 'u', long, default_value = "~/")]
        url_prefix: String,

        /// Basename globs picking files out of directories (repeatable)
        #[arg(long, value_name = "GLOB")]
        include: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Parse arguments
    let cli = Cli::parse();

    // Setup logging; user-facing output goes to stdout/stderr directly
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("tracelens_cli={},tracelens_client={}", log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Resolve connection settings once; the client never reads the environment
    let connect = ConnectOpts {
        apikey: cli.apikey,
        apihost: cli.apihost,
        proxy: ProxySelection::from_env(),
        gcs_token: cli.gcs_token,
        gcs_bucket: cli.gcs_bucket,
    };

    match cli.command {
        Commands::Release { version } => {
            let client = commands::build_client(&connect)?;
            commands::release::cmd_release(&client, &version).await
        }
        Commands::Upload {
            paths,
            release,
            url_prefix,
            include,
        } => {
            let client = commands::build_client(&connect)?;
            let options = UploadOptions {
                paths,
                release,
                url_prefix,
                include,
            };
            commands::upload::cmd_upload(&client, &options).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_upload_args() {
        let cli = Cli::try_parse_from([
            "tracelens",
            "upload",
            "dist",
            "assets",
            "--release",
            "1.0.0",
            "-k",
            "org:app",
            "--include",
            "*.wasm",
        ])
        .unwrap();

        assert_eq!(cli.apikey.as_deref(), Some("org:app"));
        match cli.command {
            Commands::Upload {
                paths,
                release,
                url_prefix,
                include,
            } => {
                assert_eq!(paths, vec![PathBuf::from("dist"), PathBuf::from("assets")]);
                assert_eq!(release, "1.0.0");
                assert_eq!(url_prefix, "~/");
                assert_eq!(include, vec!["*.wasm".to_string()]);
            }
            _ => panic!("expected the upload subcommand"),
        }
    }

    #[test]
    fn test_parse_release_args() {
        let cli = Cli::try_parse_from([
            "tracelens",
            "release",
            "2.0.0",
            "--apihost",
            "http://localhost:1234",
        ])
        .unwrap();

        assert_eq!(cli.apihost, "http://localhost:1234");
        match cli.command {
            Commands::Release { version } => assert_eq!(version, "2.0.0"),
            _ => panic!("expected the release subcommand"),
        }
    }

    #[test]
    fn test_upload_requires_paths() {
        let result = Cli::try_parse_from(["tracelens", "upload", "--release", "1.0.0"]);
        assert!(result.is_err());
    }
}
