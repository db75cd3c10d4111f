//! regatta-registry: Docker Registry HTTP API V2 client.
//!
//! Builds request URLs against `<base>/v2/`, classifies responses into
//! success / client error / unexpected, decodes manifests with schema
//! validation, and aggregates per-repository layer sizes with layers
//! deduplicated by digest across tags.

pub mod client;
pub mod error;
pub mod manifest;
pub mod report;
pub mod transport;

pub use client::{RegistryClient, DEFAULT_CATALOG_PAGE};
pub use error::{RegistryError, Result};
pub use manifest::{Layer, Manifest};
pub use report::{human_size, RepositoryReport, TagEntry, TagStatus};
pub use transport::RegistryConfig;
