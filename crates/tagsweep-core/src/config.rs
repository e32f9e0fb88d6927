//! Configuration for a sweep run.

use crate::error::{Error, Result};

/// Default number of tags kept per repository.
pub const DEFAULT_KEEP_COUNT: usize = 5;

/// Default repository enumeration capacity.
pub const DEFAULT_REPOSITORY_CAPACITY: usize = 9999;

/// Settings for one run of the retention pipeline.
///
/// Passed by value into [`Sweeper::new`](crate::Sweeper::new).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    /// Number of most recent tags to keep per repository.
    pub keep_count: usize,

    /// Compute deletions but do not issue them.
    pub dry_run: bool,

    /// Report every tag of every repository and never delete.
    pub list_all: bool,

    /// Maximum number of repositories the run accepts from the catalog.
    pub repository_capacity: usize,

    /// Maximum number of tags resolved concurrently within a repository.
    pub resolve_concurrency: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            keep_count: DEFAULT_KEEP_COUNT,
            dry_run: true,
            list_all: false,
            repository_capacity: DEFAULT_REPOSITORY_CAPACITY,
            resolve_concurrency: 1,
        }
    }
}

impl SweepConfig {
    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> SweepConfigBuilder {
        SweepConfigBuilder::default()
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the repository capacity or the
    /// resolve concurrency is zero.
    pub fn validate(&self) -> Result<()> {
        if self.repository_capacity == 0 {
            return Err(Error::InvalidConfig {
                reason: "repository capacity must be at least 1".to_string(),
            });
        }
        if self.resolve_concurrency == 0 {
            return Err(Error::InvalidConfig {
                reason: "resolve concurrency must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for `SweepConfig`.
#[derive(Debug, Default)]
pub struct SweepConfigBuilder {
    keep_count: Option<usize>,
    dry_run: Option<bool>,
    list_all: Option<bool>,
    repository_capacity: Option<usize>,
    resolve_concurrency: Option<usize>,
}

impl SweepConfigBuilder {
    /// Sets the number of tags to keep.
    #[must_use]
    pub const fn keep_count(mut self, count: usize) -> Self {
        self.keep_count = Some(count);
        self
    }

    /// Enables or disables dry-run.
    #[must_use]
    pub const fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = Some(enabled);
        self
    }

    /// Enables or disables list-all mode.
    #[must_use]
    pub const fn list_all(mut self, enabled: bool) -> Self {
        self.list_all = Some(enabled);
        self
    }

    /// Sets the repository enumeration capacity.
    #[must_use]
    pub const fn repository_capacity(mut self, capacity: usize) -> Self {
        self.repository_capacity = Some(capacity);
        self
    }

    /// Sets the resolve concurrency.
    #[must_use]
    pub const fn resolve_concurrency(mut self, concurrency: usize) -> Self {
        self.resolve_concurrency = Some(concurrency);
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> SweepConfig {
        let defaults = SweepConfig::default();
        SweepConfig {
            keep_count: self.keep_count.unwrap_or(defaults.keep_count),
            dry_run: self.dry_run.unwrap_or(defaults.dry_run),
            list_all: self.list_all.unwrap_or(defaults.list_all),
            repository_capacity: self
                .repository_capacity
                .unwrap_or(defaults.repository_capacity),
            resolve_concurrency: self
                .resolve_concurrency
                .unwrap_or(defaults.resolve_concurrency),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_safe() {
        let config = SweepConfig::default();
        assert!(config.dry_run);
        assert!(!config.list_all);
        assert_eq!(config.keep_count, 5);
        assert_eq!(config.repository_capacity, 9999);
        assert_eq!(config.resolve_concurrency, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = SweepConfig::builder()
            .keep_count(2)
            .dry_run(false)
            .repository_capacity(10)
            .build();

        assert_eq!(config.keep_count, 2);
        assert!(!config.dry_run);
        assert!(!config.list_all);
        assert_eq!(config.repository_capacity, 10);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = SweepConfig::builder().repository_capacity(0).build();
        assert!(matches!(config.validate(), Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = SweepConfig::builder().resolve_concurrency(0).build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_keep_zero_is_allowed() {
        let config = SweepConfig::builder().keep_count(0).build();
        assert!(config.validate().is_ok());
    }
}
