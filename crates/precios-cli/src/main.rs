//! precios - Unified CLI for the Precios Claros datasets
//!
//! Crawls the public price-transparency API into CSV extracts,
//! consolidates them into canonical datasets, and reconciles dated price
//! snapshots into a drift table.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use anyhow::Result;
use clap::{Parser, Subcommand};

use precios_core::shutdown_flag;

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "precios")]
#[command(about = "Unified CLI for the Precios Claros price-transparency datasets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./precios.toml or ~/.config/precios/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Crawl stores, products and prices for one shard
    Crawl(cmd::crawl::CrawlArgs),
    /// Crawl the category-scoped product catalog
    Categories(cmd::categories::CategoriesArgs),
    /// Merge dated price snapshots into a drift table
    Merge(cmd::merge::MergeArgs),
    /// Consolidate per-run crawl extracts into canonical datasets
    Consolidate(cmd::consolidate::ConsolidateArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_signal_handler();

    // Progress context (TTY auto-detect)
    let progress = Arc::new(precios_core::ProgressContext::new());

    // Logging:
    //   TTY:     quiet (warn) unless --debug  — progress bars show activity
    //   non-TTY: info unless --debug          — logs are the only progress indicator
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = if is_tty { !cli.debug } else { false };
    precios_core::init_logging(quiet, cli.debug, multi);

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Command::Crawl(args) => cmd::crawl::run(args, &config, &progress),
        Command::Categories(args) => cmd::categories::run(args, &config, &progress),
        Command::Merge(args) => cmd::merge::run(args),
        Command::Consolidate(args) => cmd::consolidate::run(args),
        Command::Config => {
            use comfy_table::{
                Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
            };

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("Setting").fg(Color::Cyan),
                    Cell::new("Value").fg(Color::Cyan),
                ]);

            table.add_row(vec![
                "Output directory",
                &config.output.default_dir.display().to_string(),
            ]);
            table.add_row(vec![
                "Workers",
                &format!("{} (max: {})", config.workers.default, config.workers.max),
            ]);
            table.add_row(vec!["API base URL", &config.api.base_url]);
            table.add_row(vec![
                "API key",
                if config.api.api_key.is_some() {
                    "configured"
                } else {
                    "built-in"
                },
            ]);
            table.add_row(vec!["Referer", &config.api.referer]);

            eprintln!("\n{table}");
            Ok(())
        }
    }
}

fn setup_signal_handler() {
    // First signal: set graceful shutdown flag
    // Second signal: force exit (default SIGINT behavior restored)
    // SAFETY: AtomicBool::swap and process::exit are async-signal-safe
    unsafe {
        signal_hook::low_level::register(signal_hook::consts::SIGTERM, || {
            if shutdown_flag().swap(true, Ordering::Relaxed) {
                std::process::exit(130);
            }
        })
        .expect("Failed to register SIGTERM handler");
        signal_hook::low_level::register(signal_hook::consts::SIGINT, || {
            if shutdown_flag().swap(true, Ordering::Relaxed) {
                std::process::exit(130);
            }
        })
        .expect("Failed to register SIGINT handler");
    }
}
