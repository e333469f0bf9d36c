//! Merge subcommand - reconcile price snapshots into one drift table

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Directory with sucursales.csv, productos.csv and precios_*.csv
    #[arg(short, long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Output CSV for the merged table
    #[arg(short, long, default_value = "variaciones.csv")]
    pub output: PathBuf,
}

pub fn run(args: MergeArgs) -> Result<()> {
    let config = precios_merge::MergeConfig {
        data_dir: args.data_dir,
        output: args.output,
    };

    let summary = precios_merge::run(&config)?;

    println!();
    println!("=== Merge Summary ===");
    println!("Snapshots: {}", summary.snapshots);
    println!("Rows: {}", summary.rows);
    println!("Columns: {}", summary.columns);
    println!("Output: {}", config.output.display());

    Ok(())
}
