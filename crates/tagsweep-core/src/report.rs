//! Run reports.

use crate::pruner::PruneOutcome;
use crate::record::TagRecord;
use crate::resolver::TagFailure;

/// How a repository was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryStatus {
    /// The tag list could not be read; the repository was skipped.
    TagListFailed(String),

    /// The repository has no more tags than the retention count; no tag
    /// metadata was read.
    WithinRetention,

    /// List-all mode: every resolved tag was reported, nothing deleted.
    Listed,

    /// A retention decision was computed and applied.
    Decided,
}

/// A tag selected for deletion and what happened to it.
#[derive(Debug, Clone)]
pub struct PrunedTag {
    /// The selected record.
    pub record: TagRecord,

    /// Deletion outcome.
    pub outcome: PruneOutcome,
}

/// Per-repository result.
#[derive(Debug)]
pub struct RepositoryReport {
    /// Repository name.
    pub repository: String,

    /// How the repository was handled.
    pub status: RepositoryStatus,

    /// Number of tags in the tag list.
    pub tag_count: usize,

    /// List-all mode: every resolved record, in tag-list order.
    pub listed: Vec<TagRecord>,

    /// Kept records, newest first.
    pub kept: Vec<TagRecord>,

    /// Records selected for deletion, oldest first.
    pub pruned: Vec<PrunedTag>,

    /// Tags excluded because their metadata could not be resolved.
    pub failures: Vec<TagFailure>,
}

impl RepositoryReport {
    /// Creates an empty report for a repository.
    #[must_use]
    pub fn new(repository: impl Into<String>, status: RepositoryStatus) -> Self {
        Self {
            repository: repository.into(),
            status,
            tag_count: 0,
            listed: Vec::new(),
            kept: Vec::new(),
            pruned: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Number of tags whose deletion failed.
    #[must_use]
    pub fn failed_deletions(&self) -> usize {
        self.pruned.iter().filter(|p| p.outcome.is_failed()).count()
    }
}

/// Whole-run result.
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Whether deletions were suppressed.
    pub dry_run: bool,

    /// Whether the run only listed tags.
    pub list_all: bool,

    /// Per-repository results, in catalog order.
    pub repositories: Vec<RepositoryReport>,
}

impl SweepReport {
    /// Number of tags selected for deletion across all repositories, not
    /// counting those spared because their manifest is shared with a kept
    /// tag.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.outcomes().filter(|o| !o.is_shared()).count()
    }

    /// Number of tags spared because a kept tag shares their manifest.
    #[must_use]
    pub fn shared_count(&self) -> usize {
        self.outcomes().filter(|o| o.is_shared()).count()
    }

    /// Number of manifests removed (deleted or already gone).
    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.outcomes().filter(|o| o.is_removed()).count()
    }

    /// Number of deletions that failed.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes().filter(|o| o.is_failed()).count()
    }

    /// Number of tags excluded because their metadata could not be resolved.
    #[must_use]
    pub fn unresolved_count(&self) -> usize {
        self.repositories.iter().map(|r| r.failures.len()).sum()
    }

    /// Number of repositories skipped because their tag list failed.
    #[must_use]
    pub fn skipped_repositories(&self) -> usize {
        self.repositories
            .iter()
            .filter(|r| matches!(r.status, RepositoryStatus::TagListFailed(_)))
            .count()
    }

    fn outcomes(&self) -> impl Iterator<Item = &PruneOutcome> {
        self.repositories
            .iter()
            .flat_map(|r| r.pruned.iter().map(|p| &p.outcome))
    }
}
