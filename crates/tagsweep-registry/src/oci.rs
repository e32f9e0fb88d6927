//! Docker Registry HTTP API V2 / OCI Distribution wire types.
//!
//! Only the fields the retention pipeline reads are modelled; everything
//! else in the documents is ignored on deserialization.

use serde::{Deserialize, Serialize};

use crate::digest::Digest;

/// Media type string wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType(String);

impl MediaType {
    /// Docker image manifest, schema 2.
    pub const DOCKER_MANIFEST_V2: &'static str =
        "application/vnd.docker.distribution.manifest.v2+json";

    /// Docker manifest list (multi-platform).
    pub const DOCKER_MANIFEST_LIST: &'static str =
        "application/vnd.docker.distribution.manifest.list.v2+json";

    /// Docker container image config.
    pub const DOCKER_CONTAINER_CONFIG: &'static str =
        "application/vnd.docker.container.image.v1+json";

    /// OCI image manifest media type.
    pub const OCI_MANIFEST: &'static str = "application/vnd.oci.image.manifest.v1+json";

    /// OCI image index media type.
    pub const OCI_INDEX: &'static str = "application/vnd.oci.image.index.v1+json";

    /// OCI image config media type.
    pub const OCI_CONFIG: &'static str = "application/vnd.oci.image.config.v1+json";

    /// Creates a new media type.
    #[must_use]
    pub fn new(media_type: impl Into<String>) -> Self {
        Self(media_type.into())
    }

    /// Returns the media type string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value of the `Accept` header sent when reading manifests.
    ///
    /// The Docker v2 schema is listed first; without it a registry may
    /// answer with a legacy schema 1 manifest whose digest cannot be used
    /// for deletion.
    #[must_use]
    pub fn manifest_accept() -> String {
        format!("{}, {}", Self::DOCKER_MANIFEST_V2, Self::OCI_MANIFEST)
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MediaType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl Serialize for MediaType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for MediaType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self(s))
    }
}

/// Content descriptor.
///
/// A descriptor describes the disposition of targeted content. It includes
/// the type of the content, a content identifier (digest), and the byte-size
/// of the raw content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    /// Media type of the referenced content.
    pub media_type: MediaType,

    /// Digest of the targeted content.
    pub digest: Digest,

    /// Size in bytes of the content.
    pub size: u64,
}

/// Image manifest (Docker schema 2 or OCI).
///
/// `config` is optional because manifest lists and indexes share the
/// endpoint and carry no config descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageManifest {
    /// Schema version (always 2).
    pub schema_version: u32,

    /// Media type of this manifest. OCI manifests may omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,

    /// Image config descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Descriptor>,

    /// Layers that make up the image.
    #[serde(default)]
    pub layers: Vec<Descriptor>,
}

impl ImageManifest {
    /// Returns the manifest media type, or `"unknown"` when absent.
    #[must_use]
    pub fn media_type_str(&self) -> &str {
        self.media_type.as_ref().map_or("unknown", MediaType::as_str)
    }
}

/// A manifest together with the digest that addresses it.
#[derive(Debug, Clone)]
pub struct ManifestResponse {
    /// Digest of the manifest document itself; the value deletion needs.
    pub digest: Digest,

    /// Decoded manifest body.
    pub manifest: ImageManifest,
}

/// The subset of an image config blob used for retention.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageConfig {
    /// CPU architecture the image was built for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,

    /// Operating system the image was built for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,

    /// Creation time as an RFC 3339 string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
}

/// Response from the `/v2/<name>/tags/list` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagList {
    /// Repository name.
    pub name: String,

    /// List of tags. Registries send `null` for a repository without tags.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Response from the `/v2/_catalog` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Repository names.
    #[serde(default)]
    pub repositories: Option<Vec<String>>,
}

/// Result of a bounded catalog read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryListing {
    /// Repository names, at most `capacity` of them, in registry order.
    pub repositories: Vec<String>,

    /// Whether the registry holds more repositories than were returned.
    pub truncated: bool,
}

/// Outcome of a successful manifest deletion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStatus {
    /// The registry accepted the deletion (`202 Accepted`).
    Deleted,

    /// The manifest no longer existed (`404 Not Found`).
    AlreadyGone,
}

/// Error response from registry API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// List of errors.
    pub errors: Vec<RegistryApiError>,
}

impl ErrorResponse {
    /// Joins all error entries into one human-readable line.
    #[must_use]
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.code, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Individual error from registry API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryApiError {
    /// Error code.
    pub code: String,

    /// Human-readable message.
    #[serde(default)]
    pub message: String,

    /// Additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docker_manifest_deserialization() {
        let json = r#"{
            "schemaVersion": 2,
            "mediaType": "application/vnd.docker.distribution.manifest.v2+json",
            "config": {
                "mediaType": "application/vnd.docker.container.image.v1+json",
                "size": 7023,
                "digest": "sha256:b5b2b2c507a0944348e0303114d8d93aaaa081732b86451d9bce1f432a537bc7"
            },
            "layers": [
                {
                    "mediaType": "application/vnd.docker.image.rootfs.diff.tar.gzip",
                    "size": 32654,
                    "digest": "sha256:e692418e4cbaf90ca69d05a66403747baa33ee08806650b51fab815ad7fc331f"
                }
            ]
        }"#;

        let manifest: ImageManifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.schema_version, 2);
        assert_eq!(manifest.media_type_str(), MediaType::DOCKER_MANIFEST_V2);

        let config = manifest.config.unwrap();
        assert_eq!(config.size, 7023);
        assert_eq!(config.media_type.as_str(), MediaType::DOCKER_CONTAINER_CONFIG);
        assert_eq!(config.digest.algorithm(), "sha256");
        assert_eq!(manifest.layers.len(), 1);
    }

    #[test]
    fn test_manifest_list_has_no_config() {
        let json = r#"{
            "schemaVersion": 2,
            "mediaType": "application/vnd.docker.distribution.manifest.list.v2+json",
            "manifests": []
        }"#;

        let manifest: ImageManifest = serde_json::from_str(json).unwrap();
        assert!(manifest.config.is_none());
        assert_eq!(manifest.media_type_str(), MediaType::DOCKER_MANIFEST_LIST);
    }

    #[test]
    fn test_image_config_deserialization() {
        let json = r#"{
            "architecture": "amd64",
            "os": "linux",
            "created": "2024-03-14T09:26:53.123456789Z",
            "config": {"Env": ["PATH=/usr/bin"]},
            "rootfs": {"type": "layers", "diff_ids": []}
        }"#;

        let config: ImageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.architecture.as_deref(), Some("amd64"));
        assert_eq!(config.os.as_deref(), Some("linux"));
        assert_eq!(config.created.as_deref(), Some("2024-03-14T09:26:53.123456789Z"));
    }

    #[test]
    fn test_image_config_without_created() {
        let config: ImageConfig = serde_json::from_str(r#"{"architecture": "arm64"}"#).unwrap();
        assert!(config.created.is_none());
    }

    #[test]
    fn test_tag_list_deserialization() {
        let json = r#"{"name": "team/app", "tags": ["v1", "v2", "latest"]}"#;
        let tags: TagList = serde_json::from_str(json).unwrap();
        assert_eq!(tags.name, "team/app");
        assert_eq!(tags.tags.unwrap().len(), 3);

        let empty: TagList = serde_json::from_str(r#"{"name": "gone", "tags": null}"#).unwrap();
        assert!(empty.tags.is_none());
    }

    #[test]
    fn test_catalog_null_repositories() {
        let catalog: Catalog = serde_json::from_str(r#"{"repositories": null}"#).unwrap();
        assert!(catalog.repositories.is_none());
    }

    #[test]
    fn test_error_response_summary() {
        let json = r#"{"errors": [
            {"code": "MANIFEST_UNKNOWN", "message": "manifest unknown", "detail": {"Tag": "v9"}},
            {"code": "UNSUPPORTED", "message": "The operation is unsupported."}
        ]}"#;

        let response: ErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.summary(),
            "MANIFEST_UNKNOWN: manifest unknown; UNSUPPORTED: The operation is unsupported."
        );
    }

    #[test]
    fn test_manifest_accept_prefers_docker_v2() {
        assert!(MediaType::manifest_accept().starts_with(MediaType::DOCKER_MANIFEST_V2));
    }
}
