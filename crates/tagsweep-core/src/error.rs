//! Error types for the retention pipeline.
//!
//! Which scope an error aborts is decided by the caller: the same
//! [`Error::Registry`] is fatal during enumeration but only excludes a
//! single tag during metadata resolution.

use tagsweep_registry::RegistryError;
use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the retention pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// A registry call failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The registry holds more repositories than the enumeration capacity.
    #[error(
        "registry holds more than {capacity} repositories; increase the repository capacity (--repos-buffer) and retry"
    )]
    CapacityExceeded {
        /// Configured capacity.
        capacity: usize,
    },

    /// The image config has no creation timestamp.
    #[error("image config {digest} has no 'created' field")]
    MissingCreated {
        /// Config blob digest.
        digest: String,
    },

    /// The creation timestamp is not valid RFC 3339.
    #[error("invalid creation timestamp '{value}': {source}")]
    InvalidTimestamp {
        /// Raw timestamp.
        value: String,
        /// Parse failure.
        #[source]
        source: chrono::ParseError,
    },

    /// Configuration rejected before any registry call.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Reason the configuration is invalid.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_capacity_exceeded() {
        let err = Error::CapacityExceeded { capacity: 2 };
        assert!(err.to_string().contains("more than 2 repositories"));
        assert!(err.to_string().contains("--repos-buffer"));
    }

    #[test]
    fn test_error_display_invalid_timestamp() {
        let source = chrono::DateTime::parse_from_rfc3339("yesterday").unwrap_err();
        let err = Error::InvalidTimestamp {
            value: "yesterday".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("invalid creation timestamp 'yesterday'"));
    }

    #[test]
    fn test_error_display_registry_is_transparent() {
        let err: Error = RegistryError::InvalidUrl {
            url: "nope".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Invalid URL: nope");
    }
}
