//! Categories subcommand - crawl the category-scoped product catalog

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use precios_core::SharedProgress;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct CategoriesArgs {
    /// Number of parallel workers
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: CategoriesArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let categories_config = precios_claros::categories::CategoriesConfig {
        workers: args
            .workers
            .unwrap_or(config.workers.default)
            .min(config.workers.max),
        output_dir: args
            .output
            .unwrap_or_else(|| config.output.default_dir.clone()),
        api: config.api.settings(),
    };

    let summary = precios_claros::categories::run(&categories_config, progress)?;

    if progress.is_tty() {
        summary.print();
    } else {
        summary.log();
    }
    if summary.pages_failed > 0 {
        anyhow::bail!("{} categories failed", summary.pages_failed);
    }
    Ok(())
}
