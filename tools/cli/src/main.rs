//! KeyBridge CLI - operator tooling for vault containers.
//!
//! Seals a JSON tree document into a container, inspects container
//! metadata, and runs offline lookups without a server.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use keybridge_codec::{container, KdfParams};
use keybridge_vault::hierarchy::{FIELD_TITLE, FIELD_URL, FIELD_USERNAME};
use keybridge_vault::{find_match, Criteria, Group, Hierarchy};

#[derive(Parser)]
#[command(name = "keybridge")]
#[command(about = "KeyBridge - vault container tooling")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seal a JSON tree document into a vault container.
    Seal {
        /// JSON document holding the group tree.
        #[arg(short, long)]
        input: PathBuf,

        /// Container file to write.
        #[arg(short, long)]
        output: PathBuf,

        /// KDF strength: "interactive", "moderate", or "sensitive".
        #[arg(short, long, default_value = "interactive")]
        strength: String,
    },

    /// Show container metadata and tree shape.
    Info {
        /// Container file to inspect.
        #[arg(short, long)]
        path: PathBuf,
    },

    /// Find an entry in a container without a server.
    Find {
        /// Container file to search.
        #[arg(short, long)]
        path: PathBuf,

        /// Required account name.
        #[arg(short, long)]
        username: Option<String>,

        /// Required title.
        #[arg(short, long)]
        title: Option<String>,

        /// Required URL.
        #[arg(long)]
        url: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Seal {
            input,
            output,
            strength,
        } => cmd_seal(&input, &output, &strength),

        Commands::Info { path } => cmd_info(&path),

        Commands::Find {
            path,
            username,
            title,
            url,
        } => cmd_find(&path, username, title, url),
    }
}

/// Prompt for a password without echo.
fn prompt_password(prompt: &str) -> Result<String> {
    rpassword::prompt_password(prompt).context("Failed to read password")
}

/// Seal a JSON tree document into a container.
fn cmd_seal(input: &Path, output: &Path, strength: &str) -> Result<()> {
    let kdf = match strength {
        "interactive" => KdfParams::interactive(),
        "moderate" => KdfParams::moderate(),
        "sensitive" => KdfParams::sensitive(),
        _ => {
            anyhow::bail!("Invalid strength. Use: interactive, moderate, or sensitive");
        }
    };

    let document = std::fs::read(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let hierarchy: Hierarchy =
        serde_json::from_slice(&document).context("Invalid tree document")?;

    let password = prompt_password("Enter password: ")?;
    let confirm = prompt_password("Confirm password: ")?;

    if password != confirm {
        anyhow::bail!("Passwords do not match");
    }

    info!(entries = hierarchy.entry_count(), "Sealing container");
    let sealed = container::seal(&hierarchy, &password, kdf)?;
    std::fs::write(output, sealed)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Container sealed!");
    println!("  Output: {}", output.display());
    println!("  Groups: {}", hierarchy.group_count());
    println!("  Entries: {}", hierarchy.entry_count());

    Ok(())
}

/// Show container metadata and, after unlocking, the tree shape.
fn cmd_info(path: &Path) -> Result<()> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let (header, _) = container::read_header(&bytes)?;

    println!("Container: {}", path.display());
    println!(
        "  Version: {}.{}",
        header.version.major, header.version.minor
    );
    println!("  Created: {}", header.created_at);
    println!(
        "  KDF: Argon2id m={} KiB t={} p={}",
        header.kdf.memory_cost, header.kdf.time_cost, header.kdf.parallelism
    );

    let password = prompt_password("Enter password: ")?;
    let hierarchy = container::open(&bytes, &password)?;

    println!("  Groups: {}", hierarchy.group_count());
    println!("  Entries: {}", hierarchy.entry_count());
    print_group(hierarchy.root(), 1);

    Ok(())
}

/// Print the group tree, names and entry counts only.
fn print_group(group: &Group, depth: usize) {
    println!(
        "{}{} ({} entries)",
        "  ".repeat(depth),
        group.name(),
        group.entries().len()
    );
    for sub in group.groups() {
        print_group(sub, depth + 1);
    }
}

/// Offline lookup against a container.
fn cmd_find(
    path: &Path,
    username: Option<String>,
    title: Option<String>,
    url: Option<String>,
) -> Result<()> {
    let mut fields = HashMap::new();
    let selectors = [
        (FIELD_USERNAME, username),
        (FIELD_TITLE, title),
        (FIELD_URL, url),
    ];
    for (name, value) in selectors {
        if let Some(value) = value {
            fields.insert(name.to_string(), value);
        }
    }
    let criteria = Criteria::new(fields)
        .context("Pass at least one of --username, --title, --url")?;

    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let password = prompt_password("Enter password: ")?;
    let hierarchy = container::open(&bytes, &password)?;

    let entry = find_match(hierarchy.root(), &criteria)?;

    let mut pairs: Vec<(&str, &str)> = entry.fields().collect();
    pairs.sort();
    for (name, value) in pairs {
        println!("{}: {}", name, value);
    }

    Ok(())
}
