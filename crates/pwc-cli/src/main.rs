//! pwc - drives puzzles-with-chat solve sessions from a command script.
//!
//! # Configuration
//!
//! Configuration is loaded from multiple sources with priority:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`PWC_*`)
//! 3. Project config (`.pwc/config.toml` in the project directory)
//! 4. Global config (`~/.pwc/config.toml`)
//! 5. Default values (lowest priority)
//!
//! # Output
//!
//! Viewer events are printed to stdout, one JSON object per line. Logs and
//! command errors go to stderr.

mod puzzle_file;
mod runner;
mod script;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pwc_runtime::config::{ConfigLoader, ConfigResolver, PwcConfig, StoreKind};
use pwc_runtime::{SolveService, StoreBackend};
use pwc_types::{ChannelName, PuzzleKind};
use runner::JsonLines;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// pwc - chat-driven puzzle solving
#[derive(Parser, Debug)]
#[command(name = "pwc")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Project root directory (defaults to current directory)
    #[arg(short = 'C', long)]
    project: Option<PathBuf>,

    /// Persist state and settings under this directory
    #[arg(long)]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run a command script for one channel
    Run {
        /// Puzzle kind: crossword, acrostic or spellingbee
        #[arg(long)]
        kind: PuzzleKind,

        /// Channel name
        #[arg(long)]
        channel: ChannelName,

        /// Script file, or `-` for stdin
        script: PathBuf,
    },
}

/// Applies command-line overrides on top of file and env config.
struct CliConfigResolver {
    project_root: PathBuf,
    debug: bool,
    store_dir: Option<PathBuf>,
}

impl CliConfigResolver {
    fn from_args(args: &Args) -> Self {
        let project_root = args.project.clone().unwrap_or_else(|| {
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        });
        Self {
            project_root,
            debug: args.debug,
            store_dir: args.store_dir.clone(),
        }
    }

    fn resolve(&self) -> Result<PwcConfig> {
        let mut config = ConfigLoader::new()
            .with_project_root(&self.project_root)
            .load()
            .context("Config error")?;
        self.apply(&mut config);
        Ok(config)
    }
}

impl ConfigResolver for CliConfigResolver {
    fn apply(&self, config: &mut PwcConfig) {
        if self.debug {
            config.debug = true;
        }
        if let Some(ref dir) = self.store_dir {
            config.store.backend = StoreKind::File;
            config.store.dir = Some(dir.clone());
        }
    }
}

/// Filter: --debug > --verbose > RUST_LOG > config `logging.level`.
fn env_filter(args: &Args, config: &PwcConfig) -> EnvFilter {
    if args.debug || config.debug {
        EnvFilter::new("debug")
    } else if args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level))
    }
}

async fn read_script(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut script = String::new();
        tokio::io::AsyncReadExt::read_to_string(&mut tokio::io::stdin(), &mut script)
            .await
            .context("cannot read script from stdin")?;
        return Ok(script);
    }
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("cannot read script {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let resolver = CliConfigResolver::from_args(&args);
    let config = resolver.resolve()?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&args, &config))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!(path = %resolver.project_root.display(), "Project root");
    debug!(?config, "Resolved config");

    let Cmd::Run {
        kind,
        channel,
        script,
    } = &args.command;
    let script = read_script(script).await?;

    let store = StoreBackend::open(&config.store).context("cannot open store")?;
    let service = SolveService::from_config(store, &config);

    let mut sink = JsonLines::new(tokio::io::stdout());
    let mut errors = tokio::io::stderr();
    let failed = runner::run_script(&service, *kind, channel, &script, &mut sink, &mut errors).await?;
    info!(failed, "Script finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn run_arguments() {
        let args = parse(&["pwc", "-d", "run", "--kind", "spellingbee", "--channel", "streamer", "s.txt"]);
        assert!(args.debug);
        let Cmd::Run { kind, channel, script } = args.command;
        assert_eq!(kind, PuzzleKind::SpellingBee);
        assert_eq!(channel.as_str(), "streamer");
        assert_eq!(script, PathBuf::from("s.txt"));
    }

    #[test]
    fn invalid_kind_or_channel_rejected() {
        assert!(Args::try_parse_from(["pwc", "run", "--kind", "sudoku", "--channel", "a", "s"]).is_err());
        assert!(Args::try_parse_from(["pwc", "run", "--kind", "crossword", "--channel", "a b", "s"]).is_err());
    }

    #[test]
    fn store_dir_selects_file_backend() {
        let args = parse(&["pwc", "--store-dir", "/tmp/pwc", "run", "--kind", "crossword", "--channel", "a", "s"]);
        let resolver = CliConfigResolver::from_args(&args);
        let mut config = PwcConfig::default();
        resolver.apply(&mut config);
        assert_eq!(config.store.backend, StoreKind::File);
        assert_eq!(config.store.dir, Some(PathBuf::from("/tmp/pwc")));
        assert!(!config.debug);
    }
}
