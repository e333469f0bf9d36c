//! Consolidate subcommand - merge per-run crawl extracts

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use precios_merge::consolidate;

#[derive(Args, Debug)]
pub struct ConsolidateArgs {
    #[command(subcommand)]
    pub kind: ConsolidateKind,
}

#[derive(Subcommand, Debug)]
pub enum ConsolidateKind {
    /// Consolidate store extracts into sucursales.csv
    Stores(KindArgs),
    /// Consolidate product extracts into productos.csv
    Products(KindArgs),
    /// Consolidate price extracts into a dated precios_{from}_{to}.csv
    Prices(PricesArgs),
}

#[derive(Args, Debug)]
pub struct KindArgs {
    /// Glob pattern of input extract CSVs (quote it)
    pub pattern: String,

    /// Output csv
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct PricesArgs {
    /// Glob pattern of input extract CSVs (quote it)
    pub pattern: String,

    /// Output directory; the filename carries the observed date range
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,
}

pub fn run(args: ConsolidateArgs) -> Result<()> {
    match args.kind {
        ConsolidateKind::Stores(k) => {
            let output = k.output.unwrap_or_else(|| PathBuf::from("sucursales.csv"));
            let rows = consolidate::consolidate_stores(&k.pattern, &output)?;
            println!("{rows} stores -> {}", output.display());
        }
        ConsolidateKind::Products(k) => {
            let output = k.output.unwrap_or_else(|| PathBuf::from("productos.csv"));
            let rows = consolidate::consolidate_products(&k.pattern, &output)?;
            println!("{rows} products -> {}", output.display());
        }
        ConsolidateKind::Prices(k) => {
            let output = consolidate::consolidate_prices(&k.pattern, &k.output_dir)?;
            println!("prices -> {}", output.display());
        }
    }
    Ok(())
}
