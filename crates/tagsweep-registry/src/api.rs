//! The registry operations the retention pipeline depends on.

use async_trait::async_trait;

use crate::digest::Digest;
use crate::error::RegistryError;
use crate::oci::{DeleteStatus, ImageConfig, ManifestResponse, RepositoryListing};

/// Read and delete operations against a Docker Registry HTTP API V2.
///
/// [`RegistryClient`](crate::RegistryClient) is the HTTP implementation.
/// The pipeline only talks to this trait, so it can be driven by an
/// in-memory registry in tests.
#[async_trait]
pub trait RegistryApi: Send + Sync {
    /// Lists at most `capacity` repositories and reports whether more exist.
    ///
    /// An empty catalog is a valid result, not an error.
    async fn list_repositories(&self, capacity: usize) -> Result<RepositoryListing, RegistryError>;

    /// Lists the tags of a repository. A repository without tags yields an
    /// empty list.
    async fn list_tags(&self, repository: &str) -> Result<Vec<String>, RegistryError>;

    /// Fetches the image manifest for a tag (or digest) along with the
    /// manifest's own digest.
    async fn fetch_manifest(
        &self,
        repository: &str,
        reference: &str,
    ) -> Result<ManifestResponse, RegistryError>;

    /// Fetches and decodes an image config blob.
    async fn fetch_image_config(
        &self,
        repository: &str,
        digest: &Digest,
    ) -> Result<ImageConfig, RegistryError>;

    /// Deletes a manifest by digest.
    async fn delete_manifest(
        &self,
        repository: &str,
        digest: &Digest,
    ) -> Result<DeleteStatus, RegistryError>;
}
