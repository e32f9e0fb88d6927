//! Content digests (`algorithm:encoded`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::error::RegistryError;

/// A content-addressed identifier of a manifest or blob.
///
/// Tags can never contain `:`, so a value of this type can never be a tag.
/// Manifest deletion only accepts a `Digest` for that reason.
///
/// # Examples
///
/// ```
/// use tagsweep_registry::Digest;
///
/// let digest: Digest = "sha256:6c3c624b58dbbcd3c0dd82b4c53f04194d1247c6eebdaab7c610cf7d66709b3b"
///     .parse()?;
/// assert_eq!(digest.algorithm(), "sha256");
/// # Ok::<(), tagsweep_registry::RegistryError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Digest {
    algorithm: String,
    encoded: String,
}

impl Digest {
    /// Computes the `sha256` digest of raw content.
    #[must_use]
    pub fn sha256(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self {
            algorithm: "sha256".to_string(),
            encoded: hex::encode(hasher.finalize()),
        }
    }

    /// Returns the digest algorithm (e.g., "sha256").
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Returns the encoded hash (without algorithm prefix).
    #[must_use]
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// Returns a shortened form for log output, e.g. `sha256:6c3c624b58db`.
    #[must_use]
    pub fn short(&self) -> String {
        let end = self.encoded.len().min(12);
        format!("{}:{}", self.algorithm, &self.encoded[..end])
    }
}

impl FromStr for Digest {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RegistryError::InvalidDigest {
            digest: s.to_string(),
        };

        let (algorithm, encoded) = s.split_once(':').ok_or_else(invalid)?;

        let algorithm_ok = !algorithm.is_empty()
            && algorithm
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "+._-".contains(c));
        let encoded_ok = !encoded.is_empty()
            && encoded
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "=_-".contains(c));

        if !algorithm_ok || !encoded_ok {
            return Err(invalid());
        }

        if algorithm == "sha256"
            && (encoded.len() != 64 || !encoded.chars().all(|c| c.is_ascii_hexdigit()))
        {
            return Err(invalid());
        }

        Ok(Self {
            algorithm: algorithm.to_string(),
            encoded: encoded.to_string(),
        })
    }
}

impl TryFrom<String> for Digest {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Digest> for String {
    fn from(digest: Digest) -> Self {
        digest.to_string()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "sha256:6c3c624b58dbbcd3c0dd82b4c53f04194d1247c6eebdaab7c610cf7d66709b3b";

    #[test]
    fn test_parse_sha256() {
        let digest: Digest = SAMPLE.parse().unwrap();
        assert_eq!(digest.algorithm(), "sha256");
        assert_eq!(digest.encoded().len(), 64);
        assert_eq!(digest.to_string(), SAMPLE);
        assert_eq!(digest.short(), "sha256:6c3c624b58db");
    }

    #[test]
    fn test_parse_rejects_tag() {
        assert!("latest".parse::<Digest>().is_err());
        assert!("v1.2.3".parse::<Digest>().is_err());
        assert!("".parse::<Digest>().is_err());
    }

    #[test]
    fn test_parse_rejects_short_sha256() {
        assert!("sha256:abc123".parse::<Digest>().is_err());
        assert!(":abc".parse::<Digest>().is_err());
    }

    #[test]
    fn test_parse_other_algorithm() {
        let digest: Digest = "sha512:abcdef0123".parse().unwrap();
        assert_eq!(digest.algorithm(), "sha512");
    }

    #[test]
    fn test_sha256_of_content() {
        let digest = Digest::sha256(b"");
        assert_eq!(
            digest.to_string(),
            "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_serde_as_string() {
        let digest: Digest = SAMPLE.parse().unwrap();
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{SAMPLE}\""));

        let back: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, digest);

        assert!(serde_json::from_str::<Digest>("\"latest\"").is_err());
    }
}
