//! Consolidation of per-run crawl extracts into canonical datasets.
//!
//! Each crawl shard writes its own `sucursal-*`, `producto-*` and
//! `precio-*` CSVs. Consolidation stacks them, removes the overlap
//! between shards and reruns, and fixes a deterministic column and row
//! order so consolidated files diff cleanly between crawls.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use chrono::NaiveDateTime;

use crate::frame::Frame;

/// Canonical column order of the consolidated store directory.
const STORE_COLUMNS: [&str; 12] = [
    "id",
    "comercioId",
    "banderaId",
    "banderaDescripcion",
    "comercioRazonSocial",
    "provincia",
    "localidad",
    "direccion",
    "lat",
    "lng",
    "sucursalNombre",
    "sucursalTipo",
];

fn read_all(pattern: &str) -> Result<Vec<Frame>> {
    let mut paths: Vec<PathBuf> = glob::glob(pattern)
        .with_context(|| format!("Bad glob pattern: {pattern}"))?
        .collect::<Result<_, _>>()
        .context("Failed to list input files")?;
    paths.sort();
    ensure!(!paths.is_empty(), "No files match {pattern}");
    log::info!("consolidating {} files from {pattern}", paths.len());
    paths.iter().map(|p| Frame::read_csv(p)).collect()
}

/// Consolidate store extracts into `output`: exact duplicate rows dropped,
/// rows sorted by id, fixed column order. Returns the row count.
pub fn consolidate_stores(pattern: &str, output: &Path) -> Result<usize> {
    let mut frame = Frame::concat(&read_all(pattern)?)?;
    frame.dedup_rows_exact();
    frame.sort_rows_by(&["id"])?;
    let frame = frame.select(&STORE_COLUMNS)?;
    frame.write_csv(output)?;
    Ok(frame.len())
}

/// Consolidate product extracts: one row per product id (first seen wins),
/// sorted by id; identity columns first, any extra columns sorted after.
pub fn consolidate_products(pattern: &str, output: &Path) -> Result<usize> {
    let mut frame = Frame::concat(&read_all(pattern)?)?;
    frame.dedup_rows_by(&["id"])?;
    frame.sort_rows_by(&["id"])?;

    let leading = ["id", "marca", "nombre", "presentacion"];
    let mut rest: Vec<&str> = frame
        .columns()
        .iter()
        .map(String::as_str)
        .filter(|c| !leading.contains(c))
        .collect();
    rest.sort_unstable();
    let order: Vec<&str> = leading.into_iter().chain(rest).collect();
    let frame = frame.select(&order)?;
    frame.write_csv(output)?;
    Ok(frame.len())
}

/// Consolidate price extracts into one dated snapshot under `output_dir`,
/// named `precios_{from}_{to}.csv` from the observed timestamp range.
///
/// One observation is kept per (chain, price, product): the chain prefix of
/// `sucursal_id` (everything before its last dash) collapses same-priced
/// observations across branches of one banner. The timestamp and the
/// min/max columns are dropped from the snapshot.
pub fn consolidate_prices(pattern: &str, output_dir: &Path) -> Result<PathBuf> {
    let mut frame = Frame::concat(&read_all(pattern)?)?;
    let (from, to) = observation_range(&frame)?;

    let chains: Vec<String> = (0..frame.len())
        .map(|i| {
            let id = frame.value(i, "sucursal_id").unwrap_or_default();
            chain_prefix(id).to_string()
        })
        .collect();
    frame.add_column("cadena", chains);
    frame.dedup_rows_by(&["cadena", "precio", "producto_id"])?;
    frame.drop_column("cadena");
    frame.drop_column("fecha_relevamiento");
    frame.drop_column("precio_max");
    frame.drop_column("precio_min");
    frame.sort_rows_by(&["producto_id", "sucursal_id"])?;

    let output = output_dir.join(format!("precios_{from}_{to}.csv"));
    frame.write_csv(&output)?;
    log::info!("{} price rows -> {}", frame.len(), output.display());
    Ok(output)
}

/// `{comercioId}-{banderaId}` prefix of a store id.
fn chain_prefix(store_id: &str) -> &str {
    match store_id.rfind('-') {
        Some(idx) => &store_id[..idx],
        None => store_id,
    }
}

/// Min and max observation date over `fecha_relevamiento`, as `YYYYMMDD`.
fn observation_range(frame: &Frame) -> Result<(String, String)> {
    let mut dates: Vec<NaiveDateTime> = Vec::with_capacity(frame.len());
    for i in 0..frame.len() {
        let raw = frame
            .value(i, "fecha_relevamiento")
            .context("Price extract lacks fecha_relevamiento")?;
        let parsed = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
            .with_context(|| format!("Bad fecha_relevamiento: {raw}"))?;
        dates.push(parsed);
    }
    let from = dates.iter().min().context("No price observations")?;
    let to = dates.iter().max().context("No price observations")?;
    Ok((
        from.format("%Y%m%d").to_string(),
        to.format("%Y%m%d").to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn stores_consolidation_dedupes_and_orders() {
        let dir = TempDir::new().unwrap();
        let header = STORE_COLUMNS.join(",");
        write(
            dir.path(),
            "sucursal-1-2-a.csv",
            &format!("{header}\n9-1-2,9,1,DIA,Dia SA,AR-S,Rosario,Calle 1,0,0,Centro,Minimercado\n"),
        );
        write(
            dir.path(),
            "sucursal-2-2-a.csv",
            &format!(
                "{header}\n9-1-2,9,1,DIA,Dia SA,AR-S,Rosario,Calle 1,0,0,Centro,Minimercado\n\
                 9-1-1,9,1,DIA,Dia SA,AR-S,Rosario,Calle 2,0,0,Sur,Minimercado\n"
            ),
        );
        let out = dir.path().join("sucursales.csv");
        let pattern = dir.path().join("sucursal-*.csv");
        let rows = consolidate_stores(pattern.to_str().unwrap(), &out).unwrap();
        assert_eq!(rows, 2);
        let frame = Frame::read_csv(&out).unwrap();
        assert_eq!(frame.value(0, "id"), Some("9-1-1"));
        assert_eq!(frame.columns()[0], "id");
        assert_eq!(frame.columns()[11], "sucursalTipo");
    }

    #[test]
    fn products_keep_one_row_per_id() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "producto-1.csv",
            "id,marca,nombre,presentacion\n779,M1,Yerba,1 kg\n",
        );
        write(
            dir.path(),
            "producto-2.csv",
            "id,marca,nombre,presentacion\n779,M1-changed,Yerba,1 kg\n100,M2,Azucar,1 kg\n",
        );
        let out = dir.path().join("productos.csv");
        let pattern = dir.path().join("producto-*.csv");
        assert_eq!(consolidate_products(pattern.to_str().unwrap(), &out).unwrap(), 2);
        let frame = Frame::read_csv(&out).unwrap();
        assert_eq!(frame.value(0, "id"), Some("100"));
        // first occurrence wins across files (sorted by name)
        assert_eq!(frame.value(1, "marca"), Some("M1"));
    }

    #[test]
    fn prices_collapse_per_chain_and_name_the_date_range() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "precio-1.csv",
            "sucursal_id,producto_id,precio,precio_max,precio_min,fecha_relevamiento\n\
             9-1-1,779,100.0,110.0,95.0,2020-04-12 10:00:00.000000\n\
             9-1-2,779,100.0,110.0,95.0,2020-04-13 10:00:00.000000\n\
             10-2-5,779,100.0,110.0,95.0,2020-04-19 10:00:00.000000\n",
        );
        let pattern = dir.path().join("precio-*.csv");
        let out = consolidate_prices(pattern.to_str().unwrap(), dir.path()).unwrap();
        assert_eq!(
            out.file_name().unwrap().to_str().unwrap(),
            "precios_20200412_20200419.csv"
        );
        let frame = Frame::read_csv(&out).unwrap();
        // two branches of chain 9-1 with the same price collapse to one row;
        // the same price at chain 10-2 stays
        assert_eq!(frame.len(), 2);
        assert_eq!(
            frame.columns(),
            &["sucursal_id", "producto_id", "precio"]
        );
    }

    #[test]
    fn chain_prefix_strips_branch_number() {
        assert_eq!(chain_prefix("9-1-108"), "9-1");
        assert_eq!(chain_prefix("nodashes"), "nodashes");
    }

    #[test]
    fn empty_pattern_is_an_error() {
        let dir = TempDir::new().unwrap();
        let pattern = dir.path().join("nothing-*.csv");
        assert!(consolidate_stores(pattern.to_str().unwrap(), &dir.path().join("o.csv")).is_err());
    }
}
