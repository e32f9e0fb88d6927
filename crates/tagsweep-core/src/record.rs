//! Resolved tag metadata.

use chrono::{DateTime, Utc};
use tagsweep_registry::Digest;

use crate::error::{Error, Result};

/// Everything the retention policy needs to know about one tag.
///
/// Records only live for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRecord {
    /// Tag name.
    pub tag: String,

    /// Image creation time.
    pub created_at: DateTime<Utc>,

    /// Digest of the image config blob.
    pub config_digest: Digest,

    /// Digest of the manifest; deletion is addressed by this value.
    pub manifest_digest: Digest,

    /// Architecture from the image config, if present.
    pub architecture: Option<String>,
}

impl TagRecord {
    /// Creates a record.
    #[must_use]
    pub fn new(
        tag: impl Into<String>,
        created_at: DateTime<Utc>,
        config_digest: Digest,
        manifest_digest: Digest,
    ) -> Self {
        Self {
            tag: tag.into(),
            created_at,
            config_digest,
            manifest_digest,
            architecture: None,
        }
    }

    /// Sets the architecture.
    #[must_use]
    pub fn with_architecture(mut self, architecture: impl Into<String>) -> Self {
        self.architecture = Some(architecture.into());
        self
    }

    /// Returns the creation time as RFC 3339 in UTC, with only as many
    /// fractional digits as needed.
    #[must_use]
    pub fn created_display(&self) -> String {
        self.created_at
            .to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)
    }
}

/// Parses an image `created` value (RFC 3339, fractional seconds up to
/// nanoseconds, any offset) into UTC.
///
/// # Errors
///
/// Returns [`Error::InvalidTimestamp`] if the value does not parse.
///
/// # Examples
///
/// ```
/// use tagsweep_core::parse_created;
///
/// let ts = parse_created("2024-03-14T09:26:53.123456789Z")?;
/// assert_eq!(ts.timestamp_subsec_nanos(), 123_456_789);
/// # Ok::<(), tagsweep_core::Error>(())
/// ```
pub fn parse_created(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|source| Error::InvalidTimestamp {
            value: value.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_created_nanoseconds() {
        let ts = parse_created("2023-11-02T10:15:30.999999999Z").unwrap();
        assert_eq!(ts.timestamp_subsec_nanos(), 999_999_999);
    }

    #[test]
    fn test_parse_created_converts_offset_to_utc() {
        let ts = parse_created("2023-11-02T12:15:30+02:00").unwrap();
        assert_eq!(ts, parse_created("2023-11-02T10:15:30Z").unwrap());
    }

    #[test]
    fn test_parse_created_rejects_garbage() {
        assert!(matches!(
            parse_created("2023-11-02 10:15"),
            Err(Error::InvalidTimestamp { .. })
        ));
        assert!(parse_created("").is_err());
    }

    #[test]
    fn test_created_display() {
        let digest = Digest::sha256(b"config");
        let record = TagRecord::new(
            "v1",
            parse_created("2023-11-02T10:15:30.5Z").unwrap(),
            digest.clone(),
            digest,
        )
        .with_architecture("amd64");

        assert_eq!(record.created_display(), "2023-11-02T10:15:30.500Z");
        assert_eq!(record.architecture.as_deref(), Some("amd64"));
    }
}
