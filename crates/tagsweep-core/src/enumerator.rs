//! Repository enumeration with a capacity bound.

use tagsweep_registry::RegistryApi;
use tracing::{error, info};

use crate::error::{Error, Result};

/// Lists every repository in the registry, refusing to continue with a
/// partial list.
///
/// # Errors
///
/// Returns [`Error::CapacityExceeded`] if the registry holds more than
/// `capacity` repositories, and [`Error::Registry`] if the catalog cannot be
/// read. Both abort the run before any tag is looked at.
pub async fn list_repositories(registry: &dyn RegistryApi, capacity: usize) -> Result<Vec<String>> {
    let listing = registry.list_repositories(capacity).await?;

    if listing.truncated {
        error!(
            capacity,
            "Repository count exceeds the enumeration capacity, increase it and retry"
        );
        return Err(Error::CapacityExceeded { capacity });
    }

    info!(count = listing.repositories.len(), "Enumerated repositories");
    Ok(listing.repositories)
}
