//! Digest-addressed tag deletion with dry-run suppression.

use std::fmt;

use tagsweep_registry::{DeleteStatus, RegistryApi};
use tracing::{info, warn};

use crate::record::TagRecord;

/// What happened to a tag selected for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PruneOutcome {
    /// The registry accepted the deletion.
    Deleted,

    /// The manifest was already gone; counted as success.
    AlreadyGone,

    /// Dry-run: nothing was sent.
    Skipped,

    /// The deletion failed.
    Failed(String),

    /// Not deleted: a kept tag points at the same manifest, and deleting
    /// it by digest would remove the kept tag too.
    SharedWithKept,
}

impl PruneOutcome {
    /// Returns true if the manifest is no longer in the registry.
    #[must_use]
    pub const fn is_removed(&self) -> bool {
        matches!(self, Self::Deleted | Self::AlreadyGone)
    }

    /// Returns true if the deletion failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns true if the tag was spared because its manifest is kept.
    #[must_use]
    pub const fn is_shared(&self) -> bool {
        matches!(self, Self::SharedWithKept)
    }
}

impl fmt::Display for PruneOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deleted => write!(f, "deleted"),
            Self::AlreadyGone => write!(f, "already gone"),
            Self::Skipped => write!(f, "skipped (dry-run)"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
            Self::SharedWithKept => write!(f, "kept (manifest shared with a kept tag)"),
        }
    }
}

/// Issues manifest deletions, one tag at a time.
pub struct Pruner<'a> {
    registry: &'a dyn RegistryApi,
    dry_run: bool,
}

impl<'a> Pruner<'a> {
    /// Creates a pruner. With `dry_run` set no request is ever sent.
    #[must_use]
    pub fn new(registry: &'a dyn RegistryApi, dry_run: bool) -> Self {
        Self { registry, dry_run }
    }

    /// Returns whether this pruner only reports.
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Deletes the manifest behind `record`.
    ///
    /// Failures are returned as [`PruneOutcome::Failed`] rather than an
    /// error so the caller can carry on with the next tag.
    pub async fn prune(&self, repository: &str, record: &TagRecord) -> PruneOutcome {
        let created = record.created_display();

        if self.dry_run {
            info!(
                repository,
                tag = %record.tag,
                created = %created,
                "Would delete {repository}:{}",
                record.tag
            );
            return PruneOutcome::Skipped;
        }

        info!(
            repository,
            tag = %record.tag,
            created = %created,
            digest = %record.manifest_digest,
            "Deleting {repository}:{}",
            record.tag
        );

        match self
            .registry
            .delete_manifest(repository, &record.manifest_digest)
            .await
        {
            Ok(DeleteStatus::Deleted) => {
                info!(repository, tag = %record.tag, "Deleted {repository}:{}", record.tag);
                PruneOutcome::Deleted
            }
            Ok(DeleteStatus::AlreadyGone) => {
                info!(repository, tag = %record.tag, "Manifest already removed");
                PruneOutcome::AlreadyGone
            }
            Err(e) => {
                warn!(repository, tag = %record.tag, error = %e, "Failed to delete {repository}:{}", record.tag);
                PruneOutcome::Failed(e.to_string())
            }
        }
    }
}
