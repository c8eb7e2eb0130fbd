//! Forward proxy selection

use url::Url;

/// Which proxy, if any, outbound requests tunnel through.
///
/// `HTTPS_PROXY` wins over `HTTP_PROXY`, and the scheme of the chosen URL
/// decides the flavor. Anything unparseable or non-http(s) means a direct
/// connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProxySelection {
    /// Connect directly
    Direct,
    /// Tunnel through an `http://` proxy
    Http(String),
    /// Tunnel through an `https://` proxy
    Https(String),
}

impl Default for ProxySelection {
    fn default() -> Self {
        Self::Direct
    }
}

impl ProxySelection {
    /// Resolve the proxy from `HTTPS_PROXY` / `HTTP_PROXY`.
    ///
    /// Meant to run once at startup; the client itself never reads the
    /// environment.
    pub fn from_env() -> Self {
        Self::resolve(env_value("HTTPS_PROXY"), env_value("HTTP_PROXY"))
    }

    fn resolve(https: Option<String>, http: Option<String>) -> Self {
        let raw = match https.or(http) {
            Some(raw) => raw,
            None => return Self::Direct,
        };

        match Url::parse(&raw) {
            Ok(url) if url.scheme() == "http" => Self::Http(raw),
            Ok(url) if url.scheme() == "https" => Self::Https(raw),
            _ => Self::Direct,
        }
    }

    /// The proxy URL to hand to the transport, if any
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Direct => None,
            Self::Http(url) | Self::Https(url) => Some(url),
        }
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
