use std::collections::HashMap;

use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{RegistryError, Result};
use crate::manifest::{Manifest, ManifestBody};
use crate::report::{RepositoryReport, TagEntry, TagStatus};
use crate::transport::{self, escape_path, RegistryConfig, Transport};

/// Upper bound for the single catalog page requested by [`RegistryClient::list_all`].
pub const DEFAULT_CATALOG_PAGE: usize = 250;

/// Response header carrying the manifest content digest.
const DOCKER_CONTENT_DIGEST: &str = "docker-content-digest";

/// Wire shape of `GET /v2/_catalog`.
#[derive(Debug, Deserialize)]
struct CatalogResponse {
    repositories: Vec<String>,
}

/// Wire shape of `GET /v2/<repo>/tags/list`. Registries answer with
/// `"tags": null` for repositories whose tags were all deleted.
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    tags: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// RegistryClient
// ---------------------------------------------------------------------------

/// Docker Registry HTTP API V2 client.
///
/// Operations run sequentially: one request is in flight at a time, and each
/// call classifies its response before returning.
pub struct RegistryClient {
    transport: Transport,
}

impl RegistryClient {
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(config)?,
        })
    }

    // -- protocol operations ------------------------------------------------

    /// Check that the base URL answers like a V2 registry: `GET /v2/` must
    /// decode to an empty JSON object. This is a precondition check, not
    /// retried; any other shape or a server error is fatal.
    pub async fn validate(&self) -> Result<()> {
        let (body, _) = self.transport.execute(Method::GET, "").await?;
        match transport::decode(&body)? {
            Some(serde_json::Value::Object(ref map)) if map.is_empty() => Ok(()),
            _ => Err(RegistryError::Protocol(
                "registry root did not return an empty object".to_string(),
            )),
        }
    }

    /// List up to `count` repository names from one catalog page. The
    /// registry may hold more; no follow-up page is requested.
    pub async fn list_repositories(&self, count: usize) -> Result<Vec<String>> {
        let path = format!("_catalog?n={}", count);
        let (body, _) = self.transport.execute(Method::GET, &path).await?;
        let catalog: CatalogResponse = serde_json::from_slice(&body)?;
        debug!(repositories = catalog.repositories.len(), "catalog page");
        Ok(catalog.repositories)
    }

    /// List the tags of `repo`. Repositories without tags yield an empty
    /// list.
    pub async fn list_tags(&self, repo: &str) -> Result<Vec<String>> {
        let path = format!("{}/tags/list", escape_path(repo));
        let (body, _) = self.transport.execute(Method::GET, &path).await?;
        let tags: TagsResponse = serde_json::from_slice(&body)?;
        Ok(tags.tags.unwrap_or_default())
    }

    /// Fetch the manifest behind `repo`/`reference`.
    ///
    /// Returns `Ok(None)` when the registry answers 404 — a missing manifest
    /// is an ordinary outcome, not a fault. Every other client or server
    /// error propagates. The manifest digest comes from the first
    /// `docker-content-digest` response header.
    pub async fn get_manifest(&self, repo: &str, reference: &str) -> Result<Option<Manifest>> {
        let path = format!(
            "{}/manifests/{}",
            escape_path(repo),
            escape_path(reference)
        );
        let (body, headers) = match self.transport.execute(Method::GET, &path).await {
            Ok(ok) => ok,
            Err(RegistryError::Client { status: 404, .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        let digest = headers
            .get(DOCKER_CONTENT_DIGEST)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                RegistryError::Protocol(format!(
                    "manifest response for {}:{} is missing the {} header",
                    repo, reference, DOCKER_CONTENT_DIGEST
                ))
            })?
            .to_string();

        let parsed: ManifestBody = serde_json::from_slice(&body)?;
        Manifest::from_body(digest, parsed).map(Some)
    }

    /// Delete the manifest addressed by `digest` from `repo`.
    pub async fn delete_manifest(&self, repo: &str, digest: &str) -> Result<()> {
        let path = format!("{}/manifests/{}", escape_path(repo), escape_path(digest));
        self.transport.execute(Method::DELETE, &path).await?;
        info!(repo, digest, "manifest deleted");
        Ok(())
    }

    /// Delete the blob addressed by `digest` from `repo`.
    pub async fn delete_blob(&self, repo: &str, digest: &str) -> Result<()> {
        let path = format!("{}/blobs/{}", escape_path(repo), escape_path(digest));
        self.transport.execute(Method::DELETE, &path).await?;
        info!(repo, digest, "blob deleted");
        Ok(())
    }

    // -- size aggregation ---------------------------------------------------

    /// Walk every tag of `repo`, recording each tag's manifest digest and
    /// summed layer size, and deduplicating layers by digest for the
    /// repository total.
    ///
    /// A tag whose manifest cannot be fetched is recorded in the report with
    /// the failure and does not abort the scan of the remaining tags.
    pub async fn list_size(&self, repo: &str) -> Result<RepositoryReport> {
        let tags = self.list_tags(repo).await?;

        let mut entries = Vec::with_capacity(tags.len());
        // Layer digest -> size across all tags. Re-inserting a digest
        // overwrites the previous value, which is what keeps a layer shared
        // between tags counted once.
        let mut unique_layers: HashMap<String, u64> = HashMap::new();

        for tag in tags {
            match self.get_manifest(repo, &tag).await {
                Ok(Some(manifest)) => {
                    for layer in &manifest.layers {
                        unique_layers.insert(layer.digest.clone(), layer.size);
                    }
                    entries.push(TagEntry {
                        status: TagStatus::Sized {
                            bytes: manifest.total_size(),
                            digest: manifest.digest,
                        },
                        tag,
                    });
                }
                Ok(None) => {
                    entries.push(TagEntry {
                        tag,
                        status: TagStatus::Failed {
                            reason: "no manifest found".to_string(),
                        },
                    });
                }
                Err(e) => {
                    warn!(repo, tag = %tag, error = %e, "tag scan failed");
                    entries.push(TagEntry {
                        status: TagStatus::Failed {
                            reason: e.to_string(),
                        },
                        tag,
                    });
                }
            }
        }

        Ok(RepositoryReport {
            repository: repo.to_string(),
            tags: entries,
            total_bytes: unique_layers.values().sum(),
        })
    }

    /// Size reports for every repository in the catalog, in listing order.
    pub async fn list_all(&self) -> Result<Vec<RepositoryReport>> {
        let repos = self.list_repositories(DEFAULT_CATALOG_PAGE).await?;
        let mut reports = Vec::with_capacity(repos.len());
        for repo in repos {
            reports.push(self.list_size(&repo).await?);
        }
        Ok(reports)
    }
}
