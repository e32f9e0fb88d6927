//! The retention pipeline: enumerate, resolve, decide, prune.

use std::collections::{HashMap, HashSet};

use tagsweep_registry::{Digest, RegistryApi};
use tracing::{debug, info, warn};

use crate::config::SweepConfig;
use crate::enumerator;
use crate::error::Result;
use crate::policy::RetentionPolicy;
use crate::pruner::{PruneOutcome, Pruner};
use crate::report::{PrunedTag, RepositoryReport, RepositoryStatus, SweepReport};
use crate::resolver::MetadataResolver;

/// Runs the retention pipeline against one registry.
///
/// Repositories are processed one after another and deletions are issued
/// one tag at a time; only metadata reads may overlap.
pub struct Sweeper<'a> {
    registry: &'a dyn RegistryApi,
    config: SweepConfig,
}

impl<'a> Sweeper<'a> {
    /// Creates a sweeper.
    #[must_use]
    pub fn new(registry: &'a dyn RegistryApi, config: SweepConfig) -> Self {
        Self { registry, config }
    }

    /// Returns the run configuration.
    #[must_use]
    pub const fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Runs the pipeline over every repository in the registry.
    ///
    /// # Errors
    ///
    /// Only setup failures are returned: an invalid configuration, an
    /// unreadable catalog, or more repositories than the configured
    /// capacity. In all three cases nothing has been deleted. Failures
    /// scoped to a repository, tag or deletion are recorded in the report.
    pub async fn run(&self) -> Result<SweepReport> {
        self.config.validate()?;

        info!(
            keep = self.config.keep_count,
            dry_run = self.config.dry_run,
            list_all = self.config.list_all,
            "Starting sweep"
        );

        let repositories =
            enumerator::list_repositories(self.registry, self.config.repository_capacity).await?;

        let mut report = SweepReport {
            dry_run: self.config.dry_run,
            list_all: self.config.list_all,
            repositories: Vec::with_capacity(repositories.len()),
        };

        for repository in &repositories {
            report
                .repositories
                .push(self.sweep_repository(repository).await);
        }

        if !self.config.list_all && report.selected_count() == 0 {
            info!("No images need to be deleted");
        }

        Ok(report)
    }

    /// Processes a single repository. Never fails; problems end up in the
    /// returned report.
    pub async fn sweep_repository(&self, repository: &str) -> RepositoryReport {
        let tags = match self.registry.list_tags(repository).await {
            Ok(tags) => tags,
            Err(e) => {
                warn!(repository, error = %e, "Skipping repository, tag list could not be read");
                return RepositoryReport::new(
                    repository,
                    RepositoryStatus::TagListFailed(e.to_string()),
                );
            }
        };

        if !self.config.list_all && tags.len() <= self.config.keep_count {
            debug!(
                repository,
                tags = tags.len(),
                keep = self.config.keep_count,
                "Within retention count"
            );
            let mut report = RepositoryReport::new(repository, RepositoryStatus::WithinRetention);
            report.tag_count = tags.len();
            return report;
        }

        let resolver = MetadataResolver::new(self.registry, self.config.resolve_concurrency);
        let resolution = resolver.resolve_repository(repository, &tags).await;

        if self.config.list_all {
            for record in &resolution.records {
                info!(
                    repository,
                    tag = %record.tag,
                    created = %record.created_display(),
                    "{repository}:{}",
                    record.tag
                );
            }

            let mut report = RepositoryReport::new(repository, RepositoryStatus::Listed);
            report.tag_count = tags.len();
            report.listed = resolution.records;
            report.failures = resolution.failures;
            return report;
        }

        let decision = RetentionPolicy::new(self.config.keep_count).decide(resolution.records);
        let pruner = Pruner::new(self.registry, self.config.dry_run);

        // Deleting a manifest removes every tag pointing at it.
        let kept_digests: HashSet<&Digest> =
            decision.keep.iter().map(|r| &r.manifest_digest).collect();
        let mut issued: HashMap<Digest, PruneOutcome> = HashMap::new();

        let mut pruned = Vec::with_capacity(decision.delete.len());
        for record in decision.delete {
            let outcome = if kept_digests.contains(&record.manifest_digest) {
                info!(
                    repository,
                    tag = %record.tag,
                    digest = %record.manifest_digest,
                    "Not deleting {repository}:{}, its manifest is shared with a kept tag",
                    record.tag
                );
                PruneOutcome::SharedWithKept
            } else if let Some(previous) = issued.get(&record.manifest_digest) {
                debug!(
                    repository,
                    tag = %record.tag,
                    digest = %record.manifest_digest,
                    "Manifest already handled for another tag"
                );
                previous.clone()
            } else {
                let outcome = pruner.prune(repository, &record).await;
                issued.insert(record.manifest_digest.clone(), outcome.clone());
                outcome
            };
            pruned.push(PrunedTag { record, outcome });
        }

        let mut report = RepositoryReport::new(repository, RepositoryStatus::Decided);
        report.tag_count = tags.len();
        report.kept = decision.keep;
        report.pruned = pruned;
        report.failures = resolution.failures;
        report
    }
}
