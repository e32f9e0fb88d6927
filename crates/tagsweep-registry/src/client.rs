//! Docker Registry HTTP API V2 client.
//!
//! This module provides the HTTP implementation of [`RegistryApi`]. Every
//! read requires `200 OK`; bodies of any other response are only inspected
//! for an error message and never treated as data.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT, LINK};
use reqwest::StatusCode;
use tracing::debug;

use crate::api::RegistryApi;
use crate::config::RegistryConfig;
use crate::digest::Digest;
use crate::error::RegistryError;
use crate::oci::{
    Catalog, DeleteStatus, ErrorResponse, ImageConfig, ImageManifest, ManifestResponse, MediaType,
    RepositoryListing, TagList,
};

/// Header carrying the digest of a returned manifest.
pub const DOCKER_CONTENT_DIGEST: &str = "docker-content-digest";

/// Client for a Docker/OCI registry.
#[derive(Debug)]
pub struct RegistryClient {
    config: RegistryConfig,
    http: reqwest::Client,
}

impl RegistryClient {
    /// Creates a new registry client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, TLS material cannot be
    /// loaded, or the HTTP client cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tagsweep_registry::{RegistryClient, RegistryConfig};
    ///
    /// let config = RegistryConfig::new("http://127.0.0.1:5000");
    /// let client = RegistryClient::new(config)?;
    /// # Ok::<(), tagsweep_registry::RegistryError>(())
    /// ```
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        config.validate()?;
        let http = Self::build_http_client(&config)?;

        Ok(Self { config, http })
    }

    /// Returns the registry configuration.
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v2/{path}", self.config.url)
    }

    /// Builds the error for a response whose status the caller rejected.
    async fn unexpected_status(
        method: &str,
        url: &str,
        response: reqwest::Response,
    ) -> RegistryError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.summary())
            .unwrap_or_default();

        RegistryError::UnexpectedStatus {
            method: method.to_string(),
            url: url.to_string(),
            status,
            message,
        }
    }

    /// Issues a GET and returns the body of a `200 OK` response.
    async fn get_ok(
        &self,
        url: &str,
        accept: Option<&str>,
    ) -> Result<(HeaderMap, Vec<u8>), RegistryError> {
        debug!(url, "GET");

        let mut request = self.http.get(url);
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }
        let response = request.send().await?;

        if response.status() != StatusCode::OK {
            return Err(Self::unexpected_status("GET", url, response).await);
        }

        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        Ok((headers, body))
    }

    /// Builds the HTTP client with proper configuration.
    fn build_http_client(config: &RegistryConfig) -> Result<reqwest::Client, RegistryError> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent);

        if let Some(ref tls) = config.tls {
            if tls.insecure_skip_verify {
                builder = builder.danger_accept_invalid_certs(true);
            }

            if let Some(ref ca_cert) = tls.ca_cert {
                let cert_pem = std::fs::read(ca_cert).map_err(|e| RegistryError::TlsError {
                    message: format!("cannot read CA certificate {}: {e}", ca_cert.display()),
                })?;
                let cert = reqwest::Certificate::from_pem(&cert_pem).map_err(|e| {
                    RegistryError::TlsError {
                        message: format!("invalid CA certificate: {e}"),
                    }
                })?;
                builder = builder.add_root_certificate(cert);
            }
        }

        builder.build().map_err(|e| RegistryError::ConnectionFailed {
            url: config.url.clone(),
            source: e,
        })
    }
}

#[async_trait]
impl RegistryApi for RegistryClient {
    async fn list_repositories(&self, capacity: usize) -> Result<RepositoryListing, RegistryError> {
        // One more than the caller can hold: a full page then proves truncation.
        let probe = capacity.saturating_add(1);
        let url = self.url(&format!("_catalog?n={probe}"));

        let (headers, body) = self.get_ok(&url, None).await?;

        let has_next_page = headers
            .get_all(LINK)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .any(|v| v.contains("rel=\"next\""));

        let catalog: Catalog = serde_json::from_slice(&body)?;
        let mut repositories = catalog.repositories.unwrap_or_default();
        let truncated = has_next_page || repositories.len() > capacity;
        repositories.truncate(capacity);

        debug!(count = repositories.len(), truncated, "Listed repositories");

        Ok(RepositoryListing {
            repositories,
            truncated,
        })
    }

    async fn list_tags(&self, repository: &str) -> Result<Vec<String>, RegistryError> {
        let url = self.url(&format!("{repository}/tags/list"));
        let (_, body) = self.get_ok(&url, None).await?;

        let tag_list: TagList = serde_json::from_slice(&body)?;
        Ok(tag_list.tags.unwrap_or_default())
    }

    async fn fetch_manifest(
        &self,
        repository: &str,
        reference: &str,
    ) -> Result<ManifestResponse, RegistryError> {
        let url = self.url(&format!("{repository}/manifests/{reference}"));
        let (headers, body) = self
            .get_ok(&url, Some(&MediaType::manifest_accept()))
            .await?;

        let manifest: ImageManifest = serde_json::from_slice(&body)?;

        let header_digest = headers
            .get(DOCKER_CONTENT_DIGEST)
            .and_then(|v| v.to_str().ok())
            .map(str::parse::<Digest>)
            .transpose()?;

        let digest = if let Some(digest) = header_digest {
            digest
        } else {
            // The digest of a manifest is the hash of the exact bytes served.
            let computed = Digest::sha256(&body);
            debug!(repository, reference, digest = %computed, "No Docker-Content-Digest header, computed digest from body");
            computed
        };

        Ok(ManifestResponse { digest, manifest })
    }

    async fn fetch_image_config(
        &self,
        repository: &str,
        digest: &Digest,
    ) -> Result<ImageConfig, RegistryError> {
        let url = self.url(&format!("{repository}/blobs/{digest}"));
        let (_, body) = self.get_ok(&url, None).await?;

        serde_json::from_slice(&body).map_err(Into::into)
    }

    async fn delete_manifest(
        &self,
        repository: &str,
        digest: &Digest,
    ) -> Result<DeleteStatus, RegistryError> {
        let url = self.url(&format!("{repository}/manifests/{digest}"));
        debug!(url, "DELETE");

        let response = self.http.delete(&url).send().await?;

        match response.status() {
            StatusCode::ACCEPTED => Ok(DeleteStatus::Deleted),
            StatusCode::NOT_FOUND => Ok(DeleteStatus::AlreadyGone),
            _ => Err(Self::unexpected_status("DELETE", &url, response).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TlsConfig;

    #[test]
    fn test_client_creation() {
        let config = RegistryConfig::new("https://registry.example.com");
        let client = RegistryClient::new(config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_rejects_invalid_url() {
        let config = RegistryConfig::new("registry.example.com");
        assert!(matches!(
            RegistryClient::new(config),
            Err(RegistryError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_client_missing_ca_cert() {
        let config = RegistryConfig::new("https://registry.example.com")
            .with_tls(TlsConfig::new().with_ca_cert("/nonexistent/ca.crt"));
        assert!(matches!(
            RegistryClient::new(config),
            Err(RegistryError::TlsError { .. })
        ));
    }

    #[test]
    fn test_url_building() {
        let client = RegistryClient::new(RegistryConfig::new("http://localhost:5000/")).unwrap();
        assert_eq!(
            client.url("team/app/tags/list"),
            "http://localhost:5000/v2/team/app/tags/list"
        );
    }
}
