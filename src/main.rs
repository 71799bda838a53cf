use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tempfile::NamedTempFile;
use tracing_subscriber::EnvFilter;

use territory_rebalance::records::{load_accounts, load_routes};
use territory_rebalance::{RebalanceOptions, rebalance};

#[derive(Parser, Debug)]
#[command(name = "territory-rebalance")]
#[command(about = "Reassign customer accounts to field-service routes", long_about = None)]
struct Args {
    /// Account records (JSON array)
    #[arg(short, long)]
    accounts: PathBuf,

    /// Route roster (JSON array)
    #[arg(short, long)]
    routes: PathBuf,

    /// Engine options (TOML); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scenario output path ("-" for stdout)
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Pretty-print the scenario JSON
    #[arg(long)]
    pretty: bool,

    /// Balance territories in parallel
    #[arg(long)]
    parallel: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut options = match &args.config {
        Some(path) => RebalanceOptions::load(path)
            .with_context(|| format!("failed to load options: {}", path.display()))?,
        None => RebalanceOptions::default(),
    };
    if args.parallel {
        options.parallel_territories = true;
    }

    let accounts = load_accounts(&args.accounts)
        .with_context(|| format!("failed to read accounts: {}", args.accounts.display()))?;
    let routes = load_routes(&args.routes)
        .with_context(|| format!("failed to read route roster: {}", args.routes.display()))?;

    let scenario = rebalance(&accounts, &routes, &options).context("route roster rejected")?;
    let json = scenario.to_json(args.pretty).context("failed to encode scenario")?;

    if args.output == "-" {
        let mut stdout = io::stdout().lock();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
    } else {
        write_atomically(Path::new(&args.output), json.as_bytes())
            .with_context(|| format!("failed to write scenario: {}", args.output))?;
    }

    Ok(())
}

/// Stages the bytes in a temp file next to `dest`, then renames it over
/// `dest`. The temp file is removed if anything fails before the rename.
fn write_atomically(dest: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(dest).map_err(|err| err.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_write_replaces_destination_and_leaves_no_siblings() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("scenario.json");
        let neighbour = dir.path().join("scenario.tmp");
        fs::write(&dest, "old").unwrap();
        fs::write(&neighbour, "keep me").unwrap();

        write_atomically(&dest, b"{}").unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "{}");
        assert_eq!(fs::read_to_string(&neighbour).unwrap(), "keep me");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_failed_write_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("occupied");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("inner"), "x").unwrap();

        assert!(write_atomically(&dest, b"{}").is_err());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
