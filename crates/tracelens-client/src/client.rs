//! Main client implementation

use crate::{types::*, ClientError, Config, ObjectStorageCredentials, Result};
use bytes::Bytes;
use reqwest::{header, Client, Response, StatusCode};
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// Version header attached to every API request
pub const CLI_VERSION_HEADER: &str = "x-tracelens-cli-version";

/// Channel-token header on the object-storage notification
pub const CHANNEL_TOKEN_HEADER: &str = "x-goog-channel-token";

/// Tracelens release-tracking client
#[derive(Debug)]
pub struct ReleaseClient {
    config: Config,
    org: String,
    app: String,
    storage: Option<ObjectStorageCredentials>,
    http: Client,
}

impl ReleaseClient {
    /// Create a new client with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        let (org, app) = split_api_key(&config.api_key)?;

        let builder = match config.proxy.url() {
            Some(url) => {
                let proxy = reqwest::Proxy::all(url).map_err(|e| {
                    ClientError::Config(format!("Unusable proxy URL {}: {}", url, e))
                })?;
                Client::builder().proxy(proxy)
            }
            // no_proxy also turns off reqwest's own environment sniffing;
            // the injected selection is the only one that counts.
            None => Client::builder().no_proxy(),
        };

        let http = builder.build().map_err(ClientError::Http)?;

        Ok(Self {
            config,
            org,
            app,
            storage: None,
            http,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Organization slug taken from the API key
    pub fn org(&self) -> &str {
        &self.org
    }

    /// Application slug taken from the API key
    pub fn app(&self) -> &str {
        &self.app
    }

    /// Set the credentials for post-upload object-storage notifications.
    /// Uploads made before this call send no notification.
    pub fn set_object_storage(&mut self, credentials: ObjectStorageCredentials) {
        self.storage = Some(credentials);
    }

    // ==================== Release Operations ====================

    /// Ask the API whether this client is still good to use.
    ///
    /// `Ok(None)` is a silent pass and `Ok(Some(_))` carries an advisory
    /// message for the user. Refusals and unreadable answers come back as
    /// fatal errors (see [`ClientError::is_fatal`]).
    #[instrument(skip(self))]
    pub async fn check_status(&self) -> Result<Option<String>> {
        let url = format!("{}/cli/status/", self.config.api_host);
        debug!("Checking CLI status at {}", url);
        let response = self.authed(self.http.get(&url)).send().await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                debug!("Status body could not be read: {}", e);
                return Err(ClientError::StatusUnreadable);
            }
        };

        let data: MessageBody = match serde_json::from_slice(&body) {
            Ok(data) => data,
            Err(e) => {
                debug!("Status body is not valid JSON: {}", e);
                return Err(ClientError::StatusUnreadable);
            }
        };

        if !status.is_success() {
            let message = data
                .message
                .unwrap_or_else(|| format!("The API refused this client (HTTP {})", status));
            return Err(ClientError::Incompatible { message });
        }

        Ok(data.message)
    }

    /// Register a release version with the API.
    ///
    /// The response is returned uninterpreted; a non-success status is the
    /// caller's to handle.
    #[instrument(skip(self))]
    pub async fn create_release(&self, version: &str) -> Result<ApiResponse> {
        let response = self
            .api_post("releases", &CreateReleaseBody { version })
            .await?;
        ApiResponse::read(response).await
    }

    /// Upload one artifact for a release.
    ///
    /// Asks the API for a signed upload URL, PUTs the raw bytes there
    /// (deliberately without API auth headers), then fires the best-effort
    /// object-storage notification when credentials are set. The returned
    /// response is the signed-URL PUT's; a refused artifact request is
    /// returned as-is for the caller to inspect.
    #[instrument(skip(self, contents))]
    pub async fn upload_file(
        &self,
        release: &str,
        filepath: &str,
        contents: impl Into<Bytes>,
    ) -> Result<ApiResponse> {
        let path = format!("releases/{}/artifacts", release);
        let response = self
            .api_post(&path, &ArtifactRequestBody { filepath })
            .await?;

        if !response.status().is_success() {
            return ApiResponse::read(response).await;
        }

        let target: ArtifactUploadResponse = response.json().await?;
        let signed_url = target
            .signed_url
            .ok_or_else(|| ClientError::MissingUploadUrl {
                filepath: filepath.to_string(),
            })?;

        let contents = contents.into();
        debug!("Uploading {} bytes for {}", contents.len(), filepath);
        let put_response = self.http.put(&signed_url).body(contents).send().await?;
        let result = ApiResponse::read(put_response).await?;

        if let Some(storage) = &self.storage {
            self.notify_object_storage(storage, target.name.as_deref())
                .await;
        }

        Ok(result)
    }

    // ==================== Helper Methods ====================

    /// Best-effort ping telling the API an object landed in the bucket.
    /// Failures are logged and swallowed; they never affect the upload.
    async fn notify_object_storage(
        &self,
        storage: &ObjectStorageCredentials,
        name: Option<&str>,
    ) {
        let url = format!("{}/gcloud/", self.config.api_host);
        let body = StorageNotification {
            name,
            bucket: &storage.bucket,
        };

        let result = self
            .http
            .post(&url)
            .header(CHANNEL_TOKEN_HEADER, &storage.token)
            .json(&body)
            .send()
            .await;

        if let Err(e) = result {
            warn!("Object-storage notification failed: {}", e);
        }
    }

    async fn api_post<B: Serialize>(&self, path: &str, body: &B) -> Result<Response> {
        let url = format!(
            "{}/v1/orgs/{}/apps/{}/{}/",
            self.config.api_host, self.org, self.app, path
        );

        debug!("Sending POST request to {}", url);
        let response = self.authed(self.http.post(&url)).json(body).send().await?;
        Ok(response)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header(
                header::AUTHORIZATION,
                format!("Token {}", self.config.api_key),
            )
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json")
            .header(CLI_VERSION_HEADER, env!("CARGO_PKG_VERSION"))
    }
}

/// The first two colon-separated segments are the org and app slugs;
/// anything after a second colon is ignored.
fn split_api_key(api_key: &str) -> Result<(String, String)> {
    let mut parts = api_key.split(':');
    match (parts.next(), parts.next()) {
        (Some(org), Some(app)) if !org.is_empty() && !app.is_empty() => {
            Ok((org.to_string(), app.to_string()))
        }
        _ => Err(ClientError::InvalidApiKey),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_api_key() {
        assert_eq!(
            split_api_key("my-org:my-app").unwrap(),
            ("my-org".to_string(), "my-app".to_string())
        );
    }

    #[test]
    fn test_split_api_key_ignores_extra_segments() {
        assert_eq!(
            split_api_key("org:app:extra").unwrap(),
            ("org".to_string(), "app".to_string())
        );
    }

    #[test]
    fn test_split_api_key_rejects_malformed() {
        assert!(matches!(
            split_api_key("no-colon"),
            Err(ClientError::InvalidApiKey)
        ));
        assert!(matches!(
            split_api_key(":app"),
            Err(ClientError::InvalidApiKey)
        ));
        assert!(matches!(
            split_api_key("org:"),
            Err(ClientError::InvalidApiKey)
        ));
        assert!(matches!(split_api_key(""), Err(ClientError::InvalidApiKey)));
    }

    #[test]
    fn test_new_rejects_malformed_key() {
        let result = ReleaseClient::new(Config::new("not-a-key"));
        assert!(matches!(result, Err(ClientError::InvalidApiKey)));
    }

    #[test]
    fn test_new_exposes_key_slugs() {
        let client = ReleaseClient::new(Config::new("my-org:my-app")).unwrap();
        assert_eq!(client.org(), "my-org");
        assert_eq!(client.app(), "my-app");
    }
}
