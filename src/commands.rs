//! The closed set of CLI commands and their mapping onto registry
//! operations. Dispatch is a match over [`Command`]; command names from
//! argv never reach the client as strings.

use regatta_registry::{RegistryClient, Result, DEFAULT_CATALOG_PAGE};

/// Everything the binary can be asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Probe `GET /v2/` and require an empty-object answer.
    Check,
    /// One catalog page of repository names.
    Repos { count: usize },
    /// Tags of one repository.
    Tags { repo: String },
    /// Fetch and display one manifest.
    Manifest { repo: String, reference: String },
    /// Delete a manifest by digest.
    DeleteManifest { repo: String, digest: String },
    /// Delete a blob by digest.
    DeleteBlob { repo: String, digest: String },
    /// Size report for one repository.
    Size { repo: String },
    /// Size reports for every cataloged repository.
    SizeAll,
}

impl Command {
    /// Parse a command and its flags from argv (binary name excluded).
    /// Returns a usage message on malformed input.
    pub fn parse(args: &[String]) -> std::result::Result<Self, String> {
        let name = args
            .first()
            .map(String::as_str)
            .ok_or_else(|| "missing command".to_string())?;

        match name {
            "check" => Ok(Self::Check),
            "repos" => {
                let count = match arg_value(args, "--count") {
                    Some(v) => v
                        .parse()
                        .map_err(|_| format!("invalid --count: {}", v))?,
                    None => DEFAULT_CATALOG_PAGE,
                };
                Ok(Self::Repos { count })
            }
            "tags" => Ok(Self::Tags {
                repo: required(args, "--repo")?,
            }),
            "manifest" => Ok(Self::Manifest {
                repo: required(args, "--repo")?,
                reference: required(args, "--ref")?,
            }),
            "delete-manifest" => Ok(Self::DeleteManifest {
                repo: required(args, "--repo")?,
                digest: required(args, "--digest")?,
            }),
            "delete-blob" => Ok(Self::DeleteBlob {
                repo: required(args, "--repo")?,
                digest: required(args, "--digest")?,
            }),
            "size" => Ok(Self::Size {
                repo: required(args, "--repo")?,
            }),
            "size-all" => Ok(Self::SizeAll),
            other => Err(format!("unknown command: {}", other)),
        }
    }
}

/// Run `command` against `client`, returning the lines to print.
pub async fn execute(command: &Command, client: &RegistryClient) -> Result<Vec<String>> {
    match command {
        Command::Check => {
            client.validate().await?;
            Ok(vec!["registry ok".to_string()])
        }
        Command::Repos { count } => client.list_repositories(*count).await,
        Command::Tags { repo } => client.list_tags(repo).await,
        Command::Manifest { repo, reference } => {
            match client.get_manifest(repo, reference).await? {
                Some(m) => {
                    let mut lines = vec![
                        format!("digest: {}", m.digest),
                        format!("schemaVersion: {}", m.schema_version),
                    ];
                    for layer in &m.layers {
                        lines.push(format!("layer: {} {}", layer.digest, layer.size));
                    }
                    Ok(lines)
                }
                None => Ok(vec![format!("no manifest found for {}:{}", repo, reference)]),
            }
        }
        Command::DeleteManifest { repo, digest } => {
            client.delete_manifest(repo, digest).await?;
            Ok(vec![format!("deleted manifest {}", digest)])
        }
        Command::DeleteBlob { repo, digest } => {
            client.delete_blob(repo, digest).await?;
            Ok(vec![format!("deleted blob {}", digest)])
        }
        Command::Size { repo } => Ok(client.list_size(repo).await?.lines()),
        Command::SizeAll => {
            let mut lines = Vec::new();
            for report in client.list_all().await? {
                lines.extend(report.lines());
            }
            Ok(lines)
        }
    }
}

/// Value of `<key> <value>` anywhere in `args`.
pub fn arg_value(args: &[String], key: &str) -> Option<String> {
    args.windows(2).find(|w| w[0] == key).map(|w| w[1].clone())
}

fn required(args: &[String], key: &str) -> std::result::Result<String, String> {
    arg_value(args, key).ok_or_else(|| format!("{} requires {} <value>", args[0], key))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
