//! precios-merge: price snapshot reconciliation
//!
//! Joins dated price snapshots against the store directory and the product
//! catalog into one comparable table, then computes the price drift
//! between the earliest and latest snapshot.

mod config;
pub mod consolidate;
mod drift;
mod frame;
mod provinces;
mod snapshot;

pub use config::MergeConfig;
pub use frame::Frame;
pub use provinces::{display_name, province_name};
pub use snapshot::{StoreDirectory, StoreKey, load_snapshot, snapshot_date};

use std::path::PathBuf;

use anyhow::{Context, Result, ensure};

/// Join keys of the snapshot fold: a product, identified within one chain
/// and province. Prices of different branches under the same key are
/// considered observations of the same offer.
const FOLD_KEYS: [&str; 3] = ["producto_id", "id_prov", "provincia"];

/// Summary statistics from the merge operation.
#[derive(Debug)]
pub struct MergeSummary {
    pub snapshots: usize,
    pub rows: usize,
    pub columns: usize,
}

/// Run the merge pipeline.
pub fn run(config: &MergeConfig) -> Result<MergeSummary> {
    let stores = StoreDirectory::read_csv(&config.stores_file())
        .context("Failed to read store directory")?;
    log::info!("{} stores in directory", stores.len());

    let snapshot_paths = snapshot_files(config)?;
    ensure!(
        snapshot_paths.len() >= 2,
        "Need at least two price snapshots to compare, found {}",
        snapshot_paths.len()
    );

    log::info!("Pass 1/4: Loading {} snapshots", snapshot_paths.len());
    let mut snapshots = Vec::with_capacity(snapshot_paths.len());
    for path in &snapshot_paths {
        let frame = load_snapshot(path, &stores)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        log::info!("{}: {} rows", path.display(), frame.len());
        snapshots.push(frame);
    }

    log::info!("Pass 2/4: Folding snapshots on (producto, cadena, provincia)");
    let mut snapshots = snapshots.into_iter();
    let mut merged = snapshots.next().expect("at least two snapshots");
    for right in snapshots {
        merged = merged.inner_join(&right, &FOLD_KEYS)?;
        merged.drop_incomplete_rows();
    }
    // Rows present in every snapshot survive; a pair missing from any one
    // snapshot is silently excluded, drift needs both endpoints.
    log::info!("{} rows present in every snapshot", merged.len());

    merged.collapse_duplicate_columns();
    merged.rename_column("cadena_x", "cadena");
    merged.collapse_duplicate_columns();
    merged.drop_prefixed_columns(&["sucursal", "cadena_"]);

    log::info!("Pass 3/4: Joining product catalog");
    let catalog = Frame::read_csv(&config.products_file())
        .context("Failed to read product catalog")?;
    let mut catalog = catalog
        .select(&["id", "marca", "nombre", "categoria1", "categoria2", "categoria3"])
        .context("Product catalog lacks identity/category columns")?;
    catalog.rename_column("id", "producto_id");
    merged = merged.inner_join(&catalog, &["producto_id"])?;
    merged.drop_column("id_prov");

    log::info!("Pass 4/4: Computing price drift");
    merged.sort_columns();
    drift::add_drift(&mut merged)?;

    merged
        .write_csv(&config.output)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    let summary = MergeSummary {
        snapshots: snapshot_paths.len(),
        rows: merged.len(),
        columns: merged.columns().len(),
    };
    log::info!(
        "Merge complete: {} rows x {} columns from {} snapshots -> {}",
        summary.rows,
        summary.columns,
        summary.snapshots,
        config.output.display()
    );
    Ok(summary)
}

/// Dated snapshot files under the data directory, oldest first (the date
/// lives in the filename, so name order is chronological order).
fn snapshot_files(config: &MergeConfig) -> Result<Vec<PathBuf>> {
    let pattern = config.data_dir.join("precios_*.csv");
    let pattern = pattern.to_str().context("Non-UTF8 data dir")?;
    let mut paths: Vec<PathBuf> = glob::glob(pattern)?
        .collect::<Result<_, _>>()
        .context("Failed to list snapshots")?;
    paths.sort();
    Ok(paths)
}
