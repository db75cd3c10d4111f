use serde::Deserialize;

use crate::error::{RegistryError, Result};

/// The only manifest schema version this client understands.
pub const SUPPORTED_SCHEMA_VERSION: u32 = 2;

// ---------------------------------------------------------------------------
// Layer
// ---------------------------------------------------------------------------

/// One content-addressed blob reference inside a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Layer {
    /// Content-addressable identifier (e.g. "sha256:abcdef…").
    pub digest: String,
    /// Blob size in bytes.
    pub size: u64,
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// Wire shape of a V2 image manifest body.
#[derive(Debug, Deserialize)]
pub struct ManifestBody {
    #[serde(rename = "schemaVersion")]
    pub schema_version: u32,

    pub layers: Vec<Layer>,
}

/// A decoded, validated image manifest.
///
/// `digest` is the registry-reported content digest of the whole manifest
/// (the `docker-content-digest` response header), distinct from any layer
/// digest. Layer order matches the manifest body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub digest: String,
    pub schema_version: u32,
    pub layers: Vec<Layer>,
}

impl Manifest {
    /// Build a `Manifest` from a decoded body and its content digest.
    ///
    /// Any schema version other than 2 fails here, so an invalid manifest
    /// never exists.
    pub fn from_body(digest: String, body: ManifestBody) -> Result<Self> {
        if body.schema_version != SUPPORTED_SCHEMA_VERSION {
            return Err(RegistryError::Protocol(format!(
                "unsupported manifest schema version {}",
                body.schema_version
            )));
        }
        Ok(Self {
            digest,
            schema_version: body.schema_version,
            layers: body.layers,
        })
    }

    /// Sum of this manifest's own layer sizes. Layers shared with other
    /// manifests count here; deduplication happens per repository.
    pub fn total_size(&self) -> u64 {
        self.layers.iter().map(|l| l.size).sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
