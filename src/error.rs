use serde_json::Value;
use thiserror::Error;

use crate::Status;

/// Errors returned by SWIS client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// An endpoint built from the configuration is not a valid absolute URL.
    #[error("invalid endpoint URL '{0}'")]
    InvalidUrl(String),

    /// HTTP transport-layer request failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A payload or result could not be converted to or from JSON.
    #[error("failed to convert JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The server answered with a status other than `200 OK`.
    #[error("server returned status {status}: {body}")]
    Server { status: Status, body: Value },
}
