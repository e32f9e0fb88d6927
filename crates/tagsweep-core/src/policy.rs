//! Keep-newest-N retention policy.

use crate::record::TagRecord;

/// Partition of a repository's tags into those kept and those deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionDecision {
    /// Kept records, newest first.
    pub keep: Vec<TagRecord>,

    /// Records to delete, oldest first.
    pub delete: Vec<TagRecord>,
}

impl RetentionDecision {
    /// Returns true if nothing is to be deleted.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.delete.is_empty()
    }
}

/// Keeps the `keep` most recently created tags of a repository.
///
/// # Examples
///
/// ```rust
/// use tagsweep_core::RetentionPolicy;
///
/// let policy = RetentionPolicy::new(5);
/// let decision = policy.decide(Vec::new());
/// assert!(decision.is_noop());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    keep: usize,
}

impl RetentionPolicy {
    /// Creates a policy keeping `keep` tags.
    #[must_use]
    pub const fn new(keep: usize) -> Self {
        Self { keep }
    }

    /// Returns the retention count.
    #[must_use]
    pub const fn keep_count(&self) -> usize {
        self.keep
    }

    /// Splits records into keep and delete sets.
    ///
    /// Records are stable-sorted by creation time, so tags with equal
    /// timestamps stay in the order they were given. The oldest
    /// `len - keep` records are deleted; nothing is deleted when
    /// `len <= keep`.
    #[must_use]
    pub fn decide(&self, mut records: Vec<TagRecord>) -> RetentionDecision {
        records.sort_by_key(|r| r.created_at);

        let delete_count = records.len().saturating_sub(self.keep);
        let mut keep = records.split_off(delete_count);
        keep.reverse();

        RetentionDecision {
            keep,
            delete: records,
        }
    }
}
