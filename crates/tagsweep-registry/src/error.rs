//! Error types for registry operations.

use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Failed to connect to registry.
    #[error("Failed to connect to registry at {url}: {source}")]
    ConnectionFailed {
        /// Registry URL.
        url: String,
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// The registry answered with a status the operation does not accept.
    #[error("{method} {url}: unexpected HTTP status {status}{}", format_message(.message))]
    UnexpectedStatus {
        /// HTTP method of the request.
        method: String,
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error message reported by the registry, if any.
        message: String,
    },

    /// Request failed after the connection was established.
    #[error("HTTP request failed: {message}")]
    RequestFailed {
        /// Error message.
        message: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {source}")]
    JsonError {
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Invalid URL.
    #[error("Invalid URL: {url}")]
    InvalidUrl {
        /// URL string.
        url: String,
    },

    /// String is not a valid content digest.
    #[error("Invalid digest: {digest}")]
    InvalidDigest {
        /// Offending digest string.
        digest: String,
    },

    /// Manifest carries no image config descriptor (e.g. a manifest list).
    #[error("Manifest for {repository}:{reference} has no config descriptor (media type {media_type})")]
    MissingConfig {
        /// Repository name.
        repository: String,
        /// Tag or digest the manifest was fetched by.
        reference: String,
        /// Media type reported by the manifest.
        media_type: String,
    },

    /// TLS material could not be loaded.
    #[error("TLS configuration error: {message}")]
    TlsError {
        /// Error message.
        message: String,
    },
}

fn format_message(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(" ({message})")
    }
}

impl RegistryError {
    /// Returns the HTTP status code carried by this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::ConnectionFailed {
                url: err
                    .url()
                    .map_or_else(|| "unknown".to_string(), ToString::to_string),
                source: err,
            }
        } else {
            Self::RequestFailed {
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError { source: err }
    }
}
