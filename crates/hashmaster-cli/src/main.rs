//! hashmaster - Unified CLI for hash-cracking services
//!
//! Drives a Hashtopolis server, the Hashes.com escrow marketplace and
//! the HashMob.net community hashlists from one configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use cmd::mask;
use config::Config;

#[derive(Parser)]
#[command(name = "hashmaster")]
#[command(about = "Unified CLI for Hashtopolis, Hashes.com and HashMob.net")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./hashmaster.toml or ~/.config/hashmaster/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Manage a Hashtopolis server
    Hashtopolis(cmd::hashtopolis::HashtopolisArgs),
    /// Hashes.com jobs, founds and earnings
    HashesCom(cmd::hashes_com::HashesComArgs),
    /// HashMob.net hashlists and founds
    Hashmob(cmd::hashmob::HashmobArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let progress = Arc::new(hashmaster_core::ProgressContext::new());

    let multi = progress.is_tty().then(|| progress.multi());
    hashmaster_core::init_logging(cli.debug, multi);

    if let Err(e) = hashmaster_core::install_signal_handlers() {
        log::warn!("Could not install signal handlers: {e}");
    }

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    // Config file defaults, CLI overrides
    hashmaster_core::set_http_config(hashmaster_core::HttpConfig {
        timeout: Duration::from_secs(cli.timeout.unwrap_or(config.http.timeout)),
        connect_timeout: Duration::from_secs(config.http.connect_timeout),
    });

    match cli.command {
        Command::Hashtopolis(args) => cmd::hashtopolis::run(args, &config, &progress),
        Command::HashesCom(args) => cmd::hashes_com::run(args, &config),
        Command::Hashmob(args) => cmd::hashmob::run(args, &config),
        Command::Config => {
            let mut table = cmd::table(&["Setting", "Value"]);

            let unset = || "not set".to_string();
            table.add_row(vec![
                "Hashtopolis URL",
                &config.hashtopolis.url.clone().unwrap_or_else(unset),
            ]);
            table.add_row(vec![
                "Hashtopolis API key",
                mask(config.hashtopolis.api_key.as_deref()),
            ]);
            table.add_row(vec![
                "Hashtopolis error logs",
                &config
                    .hashtopolis
                    .error_log_dir
                    .as_ref()
                    .map_or_else(unset, |d| d.display().to_string()),
            ]);
            table.add_row(vec![
                "Hashes.com URL",
                config
                    .hashes_com
                    .url
                    .as_deref()
                    .unwrap_or(hashmaster_hashes_com::DEFAULT_URL),
            ]);
            table.add_row(vec![
                "Hashes.com API key",
                mask(config.hashes_com.api_key.as_deref()),
            ]);
            table.add_row(vec![
                "HashMob URL",
                config
                    .hashmob
                    .url
                    .as_deref()
                    .unwrap_or(hashmaster_hashmob::DEFAULT_URL),
            ]);
            table.add_row(vec!["HashMob API key", mask(config.hashmob.api_key.as_deref())]);
            table.add_row(vec!["Kraken URL", &config.kraken.url]);
            table.add_row(vec!["Timeout", &format!("{}s", config.http.timeout)]);
            table.add_row(vec![
                "Connect timeout",
                &format!("{}s", config.http.connect_timeout),
            ]);
            table.add_row(vec![
                "Import chunk size",
                &format!("{} MiB", config.import.chunk_size_mb),
            ]);

            eprintln!("\n{table}");
            Ok(())
        }
    }
}
