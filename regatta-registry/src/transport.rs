use std::fs;
use std::path::PathBuf;

use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::{Certificate, Method};
use tracing::debug;

use crate::error::{RegistryError, Result};

/// Media type requested on every call; V2 registries answer manifest GETs
/// with this representation.
pub const MANIFEST_V2: &str = "application/vnd.docker.distribution.manifest.v2+json";

// ---------------------------------------------------------------------------
// RegistryConfig
// ---------------------------------------------------------------------------

/// Connection settings for one registry.
#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    /// Registry base URL (e.g. "https://registry.example.com:5000").
    /// Requests go to `<base_url>/v2/<path>`.
    pub base_url: String,
    /// Extra PEM CA bundle trusted for this registry.
    pub ca_file: Option<PathBuf>,
    /// Skip TLS peer verification.
    pub insecure: bool,
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// HTTP transport for the Registry API.
///
/// Executes one request at a time against the configured base URL and
/// classifies every response into success (2xx), client error (4xx), or
/// unexpected (anything else).
pub struct Transport {
    http: reqwest::Client,
    base: String,
}

impl Transport {
    /// Build a transport from `config`. Fails when the CA bundle cannot be
    /// read or is not valid PEM.
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("regatta/", env!("CARGO_PKG_VERSION")));

        if config.insecure {
            builder = builder.danger_accept_invalid_certs(true);
        }
        if let Some(ref path) = config.ca_file {
            let pem = fs::read(path)?;
            builder = builder.add_root_certificate(Certificate::from_pem(&pem)?);
        }

        Ok(Self {
            http: builder.build()?,
            base: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Issue `method` against `<base>/v2/<path>` and classify the response.
    ///
    /// - 2xx returns the raw body and the response headers.
    /// - 4xx becomes [`RegistryError::Client`] carrying code, message, and
    ///   body, so callers can branch on the code.
    /// - Everything else (5xx, unrecognized) is [`RegistryError::Unexpected`].
    pub async fn execute(&self, method: Method, path: &str) -> Result<(Vec<u8>, HeaderMap)> {
        let url = format!("{}/v2/{}", self.base, path);
        debug!(%method, %url, "registry request");

        let resp = self
            .http
            .request(method, &url)
            .header(ACCEPT, MANIFEST_V2)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            let headers = resp.headers().clone();
            let body = resp.bytes().await?.to_vec();
            return Ok((body, headers));
        }

        if status.is_client_error() {
            let message = status.canonical_reason().unwrap_or("").to_string();
            let body = resp.text().await.unwrap_or_default();
            return Err(RegistryError::Client {
                url,
                status: status.as_u16(),
                message,
                body,
            });
        }

        Err(RegistryError::Unexpected {
            url,
            status: status.as_u16(),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Decode a success body. An empty body means "no value"; malformed JSON is
/// a fatal decode error, never retried or reclassified.
pub fn decode(body: &[u8]) -> Result<Option<serde_json::Value>> {
    if body.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(body)?))
}

/// Percent-escape each `/`-separated segment of a repository name or
/// reference before it is inserted into a request path. Slashes separate
/// path segments in repository names and must survive as-is.
pub fn escape_path(name: &str) -> String {
    name.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
