//! Per-tag metadata resolution.
//!
//! Resolving a tag takes two reads: the manifest (for the manifest digest
//! and the config digest) and the config blob (for the creation time). Any
//! failure excludes only that tag.

use futures::stream::{self, StreamExt};
use tagsweep_registry::{RegistryApi, RegistryError};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::record::{parse_created, TagRecord};

/// A tag that could not be resolved, and why.
#[derive(Debug)]
pub struct TagFailure {
    /// Tag name.
    pub tag: String,

    /// Reason the tag was excluded.
    pub error: Error,
}

/// Result of resolving all tags of one repository.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Successfully resolved records, in tag-list order.
    pub records: Vec<TagRecord>,

    /// Tags excluded from the retention decision.
    pub failures: Vec<TagFailure>,
}

/// Turns tags into [`TagRecord`]s by reading the registry.
pub struct MetadataResolver<'a> {
    registry: &'a dyn RegistryApi,
    concurrency: usize,
}

impl<'a> MetadataResolver<'a> {
    /// Creates a resolver that keeps at most `concurrency` tags in flight.
    #[must_use]
    pub fn new(registry: &'a dyn RegistryApi, concurrency: usize) -> Self {
        Self {
            registry,
            concurrency: concurrency.max(1),
        }
    }

    /// Resolves a single tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest or config cannot be fetched or
    /// decoded, if the manifest has no config descriptor, or if the image
    /// creation time is missing or malformed.
    pub async fn resolve_tag(&self, repository: &str, tag: &str) -> Result<TagRecord> {
        let response = self.registry.fetch_manifest(repository, tag).await?;

        let config_descriptor =
            response
                .manifest
                .config
                .as_ref()
                .ok_or_else(|| RegistryError::MissingConfig {
                    repository: repository.to_string(),
                    reference: tag.to_string(),
                    media_type: response.manifest.media_type_str().to_string(),
                })?;
        let config_digest = config_descriptor.digest.clone();

        let config = self
            .registry
            .fetch_image_config(repository, &config_digest)
            .await?;

        let created = config.created.as_deref().ok_or_else(|| Error::MissingCreated {
            digest: config_digest.to_string(),
        })?;
        let created_at = parse_created(created)?;

        debug!(
            repository,
            tag,
            digest = %response.digest,
            created = created,
            "Resolved tag"
        );

        let record = TagRecord::new(tag, created_at, config_digest, response.digest);
        Ok(match config.architecture {
            Some(architecture) => record.with_architecture(architecture),
            None => record,
        })
    }

    /// Resolves every tag of a repository, collecting failures instead of
    /// stopping at the first one.
    ///
    /// Records are returned in the order of `tags`, whatever the
    /// concurrency.
    pub async fn resolve_repository(&self, repository: &str, tags: &[String]) -> Resolution {
        let results: Vec<(String, Result<TagRecord>)> = stream::iter(tags)
            .map(|tag| async move { (tag.clone(), self.resolve_tag(repository, tag).await) })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut resolution = Resolution::default();
        for (tag, result) in results {
            match result {
                Ok(record) => resolution.records.push(record),
                Err(error) => {
                    warn!(repository, tag = %tag, error = %error, "Skipping tag, metadata could not be resolved");
                    resolution.failures.push(TagFailure { tag, error });
                }
            }
        }
        resolution
    }
}
