//! Prune command implementation.
//!
//! Applies the keep-newest-N retention policy to every repository of a
//! registry. Dry-run is on unless `--dry-run=false` is given.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Args};
use tracing::info;

use tagsweep_core::{
    PruneOutcome, RepositoryStatus, SweepConfig, SweepReport, Sweeper, DEFAULT_KEEP_COUNT,
    DEFAULT_REPOSITORY_CAPACITY,
};
use tagsweep_registry::{RegistryClient, RegistryConfig, TlsConfig, DEFAULT_REGISTRY_URL};

/// Arguments for the prune command.
#[derive(Args, Debug)]
pub struct PruneArgs {
    /// Registry base URL
    #[arg(long, env = "TAGSWEEP_REGISTRY_URL", default_value = DEFAULT_REGISTRY_URL)]
    pub registry_url: String,

    /// Number of most recent tags to keep per repository
    #[arg(long, env = "TAGSWEEP_TAGS_KEEP", default_value_t = DEFAULT_KEEP_COUNT)]
    pub tags_keep: usize,

    /// Maximum number of repositories; the run aborts if the registry holds more
    #[arg(long, env = "TAGSWEEP_REPOS_BUFFER", default_value_t = DEFAULT_REPOSITORY_CAPACITY)]
    pub repos_buffer: usize,

    /// Only show which tags would be deleted (use --dry-run=false to delete)
    #[arg(
        long,
        env = "TAGSWEEP_DRY_RUN",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true"
    )]
    pub dry_run: bool,

    /// Show every tag of every repository and delete nothing
    #[arg(long, env = "TAGSWEEP_LIST_ALL")]
    pub list_all: bool,

    /// Maximum concurrent metadata reads per repository
    #[arg(long, env = "TAGSWEEP_CONCURRENCY", default_value_t = 1)]
    pub concurrency: usize,

    /// Request timeout in seconds
    #[arg(long, env = "TAGSWEEP_TIMEOUT", default_value = "30")]
    pub timeout: u64,

    /// CA certificate to trust for the registry's TLS certificate
    #[arg(long, env = "TAGSWEEP_CA_CERT")]
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub insecure: bool,
}

impl PruneArgs {
    fn sweep_config(&self) -> SweepConfig {
        SweepConfig::builder()
            .keep_count(self.tags_keep)
            .dry_run(self.dry_run)
            .list_all(self.list_all)
            .repository_capacity(self.repos_buffer)
            .resolve_concurrency(self.concurrency)
            .build()
    }

    fn registry_config(&self) -> RegistryConfig {
        let mut config = RegistryConfig::new(&self.registry_url)
            .with_timeout(Duration::from_secs(self.timeout));

        if self.ca_cert.is_some() || self.insecure {
            let mut tls = TlsConfig::new();
            if let Some(ref ca_cert) = self.ca_cert {
                tls = tls.with_ca_cert(ca_cert);
            }
            if self.insecure {
                tls = tls.insecure();
            }
            config = config.with_tls(tls);
        }

        config
    }
}

/// Execute the prune command.
///
/// # Errors
///
/// Returns an error if the client cannot be created, the catalog cannot be
/// read, or the registry holds more repositories than `--repos-buffer`.
/// Per-repository, per-tag and per-deletion failures are only reported.
pub async fn execute(args: PruneArgs) -> Result<()> {
    info!(
        registry = %args.registry_url,
        keep = args.tags_keep,
        dry_run = args.dry_run,
        list_all = args.list_all,
        "Pruning registry"
    );

    let client =
        RegistryClient::new(args.registry_config()).context("Failed to create registry client")?;

    let report = Sweeper::new(&client, args.sweep_config())
        .run()
        .await
        .with_context(|| format!("Sweep of {} aborted", args.registry_url))?;

    let mut summary = String::new();
    write_summary(&mut summary, &report)?;
    print!("{summary}");
    Ok(())
}

fn write_summary(out: &mut impl fmt::Write, report: &SweepReport) -> fmt::Result {
    writeln!(out)?;
    if report.list_all {
        writeln!(out, "Tags per repository:")?;
    } else if report.dry_run {
        writeln!(out, "Retention summary (DRY RUN, nothing deleted):")?;
    } else {
        writeln!(out, "Retention summary:")?;
    }

    for repo in &report.repositories {
        match &repo.status {
            RepositoryStatus::TagListFailed(reason) => {
                writeln!(out, "  {}: skipped, {reason}", repo.repository)?;
            }
            RepositoryStatus::WithinRetention => {
                writeln!(
                    out,
                    "  {}: {} tags, within retention",
                    repo.repository, repo.tag_count
                )?;
            }
            RepositoryStatus::Listed => {
                writeln!(out, "  {}: {} tags", repo.repository, repo.tag_count)?;
                for record in &repo.listed {
                    writeln!(
                        out,
                        "    {}:{}  {}",
                        repo.repository,
                        record.tag,
                        record.created_display()
                    )?;
                }
            }
            RepositoryStatus::Decided => {
                writeln!(
                    out,
                    "  {}: {} tags, keeping {}, deleting {}",
                    repo.repository,
                    repo.tag_count,
                    repo.kept.len(),
                    repo.pruned
                        .iter()
                        .filter(|p| !p.outcome.is_shared())
                        .count()
                )?;
                for pruned in &repo.pruned {
                    let marker = match pruned.outcome {
                        PruneOutcome::Deleted | PruneOutcome::AlreadyGone => "-",
                        PruneOutcome::Skipped => "~",
                        PruneOutcome::SharedWithKept => "=",
                        PruneOutcome::Failed(_) => "!",
                    };
                    writeln!(
                        out,
                        "    {marker} {}:{}  {}  {}",
                        repo.repository,
                        pruned.record.tag,
                        pruned.record.created_display(),
                        pruned.outcome
                    )?;
                }
            }
        }

        for failure in &repo.failures {
            writeln!(
                out,
                "    ? {}:{}  unresolved: {}",
                repo.repository, failure.tag, failure.error
            )?;
        }
    }

    if !report.list_all {
        writeln!(out)?;
        if report.selected_count() == 0 {
            writeln!(out, "No images need to be deleted.")?;
        } else if report.dry_run {
            writeln!(
                out,
                "{} tags would be deleted. Re-run with --dry-run=false to delete them.",
                report.selected_count()
            )?;
        } else {
            writeln!(
                out,
                "Deleted {} of {} tags ({} failed).",
                report.removed_count(),
                report.selected_count(),
                report.failed_count()
            )?;
        }
        if report.shared_count() > 0 {
            writeln!(
                out,
                "{} tags kept because a retained tag shares their manifest.",
                report.shared_count()
            )?;
        }
    }

    if report.unresolved_count() > 0 || report.skipped_repositories() > 0 {
        writeln!(
            out,
            "{} tags unresolved, {} repositories skipped.",
            report.unresolved_count(),
            report.skipped_repositories()
        )?;
    }

    Ok(())
}
