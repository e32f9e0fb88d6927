//! # tagsweep Registry
//!
//! Client for the Docker Registry HTTP API V2 (also served by OCI
//! Distribution registries such as `distribution/registry`, Harbor, Zot).
//!
//! The crate covers exactly the calls a tag retention job needs:
//!
//! | Operation | Request |
//! |---|---|
//! | List repositories | `GET /v2/_catalog?n=<capacity + 1>` |
//! | List tags | `GET /v2/{repo}/tags/list` |
//! | Get manifest | `GET /v2/{repo}/manifests/{tag}` with a Docker v2 `Accept` |
//! | Get image config | `GET /v2/{repo}/blobs/{digest}` |
//! | Delete manifest | `DELETE /v2/{repo}/manifests/{digest}` |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tagsweep_registry::{RegistryApi, RegistryClient, RegistryConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RegistryClient::new(RegistryConfig::new("http://127.0.0.1:5000"))?;
//!
//!     let listing = client.list_repositories(100).await?;
//!     for repository in &listing.repositories {
//!         let tags = client.list_tags(repository).await?;
//!         println!("{repository}: {} tags", tags.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod api;
mod client;
mod config;
mod digest;
mod error;
mod oci;

pub use api::RegistryApi;
pub use client::{RegistryClient, DOCKER_CONTENT_DIGEST};
pub use config::{RegistryConfig, TlsConfig, DEFAULT_REGISTRY_URL};
pub use digest::Digest;
pub use error::RegistryError;
pub use oci::{
    Catalog, DeleteStatus, Descriptor, ErrorResponse, ImageConfig, ImageManifest,
    ManifestResponse, MediaType, RegistryApiError, RepositoryListing, TagList,
};
