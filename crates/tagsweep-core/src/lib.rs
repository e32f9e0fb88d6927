//! # tagsweep Core
//!
//! Tag retention for Docker/OCI registries: keep the newest N tags of every
//! repository and delete the rest.
//!
//! The pipeline, leaves first:
//!
//! - [`list_repositories`] - catalog enumeration that refuses a partial list
//! - [`MetadataResolver`] - manifest + config reads producing [`TagRecord`]s
//! - [`RetentionPolicy`] - chronological keep/delete partition
//! - [`Pruner`] - digest-addressed deletion with dry-run suppression
//! - [`Sweeper`] - drives the above for every repository
//!
//! ## Failure scopes
//!
//! | Failure | Effect |
//! |---|---|
//! | catalog unreadable, capacity exceeded, bad config | run aborts, nothing deleted |
//! | tag list unreadable | repository skipped |
//! | manifest/config unreadable, bad timestamp | tag excluded from the decision |
//! | delete rejected | tag reported as failed, next tag continues |
//!
//! ## Example
//!
//! ```rust,no_run
//! use tagsweep_core::{SweepConfig, Sweeper};
//! use tagsweep_registry::{RegistryClient, RegistryConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RegistryClient::new(RegistryConfig::new("http://127.0.0.1:5000"))?;
//! let config = SweepConfig::builder().keep_count(3).dry_run(true).build();
//!
//! let report = Sweeper::new(&client, config).run().await?;
//! println!("{} tags selected for deletion", report.selected_count());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod enumerator;
pub mod error;
pub mod policy;
pub mod pruner;
pub mod record;
pub mod report;
pub mod resolver;
pub mod sweeper;


pub use config::{SweepConfig, SweepConfigBuilder, DEFAULT_KEEP_COUNT, DEFAULT_REPOSITORY_CAPACITY};
pub use enumerator::list_repositories;
pub use error::{Error, Result};
pub use policy::{RetentionDecision, RetentionPolicy};
pub use pruner::{PruneOutcome, Pruner};
pub use record::{parse_created, TagRecord};
pub use report::{PrunedTag, RepositoryReport, RepositoryStatus, SweepReport};
pub use resolver::{MetadataResolver, Resolution, TagFailure};
pub use sweeper::Sweeper;
