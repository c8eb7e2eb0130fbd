//! Client configuration

use crate::proxy::ProxySelection;

/// Production API endpoint
pub const DEFAULT_API_HOST: &str = "https://api.tracelens.io";

/// Client configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// API key in `org-slug:app-slug` form
    pub api_key: String,
    /// Base URL of the release-tracking API
    pub api_host: String,
    /// Forward proxy to tunnel requests through, resolved by the caller
    pub proxy: ProxySelection,
}

impl Config {
    /// Create a new config pointed at the production API
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_host: DEFAULT_API_HOST.to_string(),
            proxy: ProxySelection::Direct,
        }
    }

    /// Point the client at a different API host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = host.into();
        self
    }

    /// Tunnel requests through the given proxy
    pub fn with_proxy(mut self, proxy: ProxySelection) -> Self {
        self.proxy = proxy;
        self
    }
}

/// Credentials for the object-storage notification fired after an upload
#[derive(Clone, Debug)]
pub struct ObjectStorageCredentials {
    /// Channel token forwarded in the notification header
    pub token: String,
    /// Bucket the notification points the API at
    pub bucket: String,
}
