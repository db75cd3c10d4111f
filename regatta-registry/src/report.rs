//! Per-repository size reports and byte formatting.

/// Decimal unit ladder. Values past TB stay in TB.
const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format `bytes` with one decimal place and a decimal (power-of-1000) unit.
pub fn human_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit + 1 < UNITS.len() {
        value /= 1000.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Outcome recorded for one tag during a repository scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagStatus {
    /// Manifest fetched; `bytes` sums the tag's own layers, shared layers
    /// included.
    Sized { digest: String, bytes: u64 },
    /// The tag was skipped; `reason` is "no manifest found" or the error
    /// that interrupted the fetch.
    Failed { reason: String },
}

/// One scanned tag, in original tag-listing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    pub tag: String,
    pub status: TagStatus,
}

/// Size report for one repository.
///
/// `total_bytes` counts each layer digest once across all tags, so layers
/// shared between tags do not inflate the repository total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryReport {
    pub repository: String,
    pub tags: Vec<TagEntry>,
    pub total_bytes: u64,
}

impl RepositoryReport {
    /// Render the report as printable lines: the repository name, one line
    /// per tag, then the deduplicated total.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.tags.len() + 2);
        out.push(format!("{}:", self.repository));
        for entry in &self.tags {
            match &entry.status {
                TagStatus::Sized { digest, bytes } => out.push(format!(
                    "  {} {} {}",
                    entry.tag,
                    digest,
                    human_size(*bytes)
                )),
                TagStatus::Failed { reason } => {
                    out.push(format!("  {}: {}", entry.tag, reason))
                }
            }
        }
        out.push(format!("  total: {}", human_size(self.total_bytes)));
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
