//! Crawl subcommand - walk the store listing and nested product pages

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args};

use precios_core::SharedProgress;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct CrawlArgs {
    /// Shard to crawl, as "index/count" (e.g. "3/7")
    #[arg(short, long, default_value = "1/1")]
    pub shard: String,

    /// Extract store records
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub stores: bool,

    /// Extract product records
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub products: bool,

    /// Extract price observations
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub prices: bool,

    /// Maximum stores accepted per chain/criterion key (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    pub max_per_chain: usize,

    /// Store field grouping the chain quota (e.g. "provincia")
    #[arg(long)]
    pub chain_criterion: Option<String>,

    /// Crawl these store ids directly, skipping listing pagination
    #[arg(long, value_delimiter = ',')]
    pub store_ids: Vec<String>,

    /// Number of parallel workers
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: CrawlArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let crawl_args = precios_claros::CrawlArgs {
        shard: args.shard,
        stores: args.stores,
        products: args.products,
        prices: args.prices,
        max_per_chain: args.max_per_chain,
        chain_criterion: args.chain_criterion,
        store_ids: args.store_ids,
        workers: args
            .workers
            .unwrap_or(config.workers.default)
            .min(config.workers.max),
        output_dir: args
            .output
            .unwrap_or_else(|| config.output.default_dir.clone()),
        api: config.api.settings(),
    };
    let crawl_config = precios_claros::Config::try_from(crawl_args)?;

    let summary = precios_claros::run(&crawl_config, progress)?;

    if progress.is_tty() {
        summary.print();
    } else {
        summary.log();
    }
    if summary.pages_failed > 0 {
        anyhow::bail!("{} pages failed", summary.pages_failed);
    }
    Ok(())
}
