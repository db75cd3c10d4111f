/// Errors produced by the registry client.
///
/// `Client` is the only structured variant: callers branch on its numeric
/// status (notably 404 during manifest fetches). Everything else is fatal
/// for the operation that hit it.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The registry answered with a 4xx status.
    #[error("{url} returned {status} {message}: {body}")]
    Client {
        url: String,
        status: u16,
        message: String,
        body: String,
    },

    /// The response had a shape the protocol does not allow.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// 5xx or any status outside the classified ranges.
    #[error("unexpected status {status} from {url}")]
    Unexpected { url: String, status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RegistryError>;
