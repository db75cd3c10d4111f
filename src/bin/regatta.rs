use std::path::PathBuf;

use regatta::commands::{self, arg_value, Command};
use regatta_registry::{RegistryClient, RegistryConfig};
use tracing::debug;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let default_filter = if has_flag(&args, "--verbose") {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.first().map(String::as_str) {
        None => {
            print_usage();
            std::process::exit(1);
        }
        Some("version" | "--version" | "-V") => {
            println!("regatta {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some("help" | "--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(_) => {}
    }

    let command = match Command::parse(&args) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{}", msg);
            print_usage();
            std::process::exit(1);
        }
    };

    let config = match config_from_args(&args) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{}", msg);
            print_usage();
            std::process::exit(1);
        }
    };

    debug!(registry = %config.base_url, insecure = config.insecure, "connecting");
    let client = RegistryClient::new(&config)?;
    for line in commands::execute(&command, &client).await? {
        println!("{}", line);
    }

    Ok(())
}

fn config_from_args(args: &[String]) -> Result<RegistryConfig, String> {
    let base_url = arg_value(args, "--registry")
        .or_else(|| std::env::var("REGATTA_REGISTRY").ok())
        .ok_or_else(|| "missing --registry <url> (or REGATTA_REGISTRY)".to_string())?;

    Ok(RegistryConfig {
        base_url,
        ca_file: arg_value(args, "--ca-file").map(PathBuf::from),
        insecure: has_flag(args, "--insecure"),
    })
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

fn print_usage() {
    println!(
        r#"regatta

USAGE:
  regatta check
  regatta repos [--count 250]
  regatta tags --repo <name>
  regatta manifest --repo <name> --ref <tag|digest>
  regatta delete-manifest --repo <name> --digest <digest>
  regatta delete-blob --repo <name> --digest <digest>
  regatta size --repo <name>
  regatta size-all

OPTIONS:
  --registry <url>   registry base URL (or REGATTA_REGISTRY env)
  --ca-file <path>   extra PEM CA bundle trusted for this registry
  --insecure         skip TLS peer verification
  --verbose          debug logging (same as RUST_LOG=debug)"#
    );
}
