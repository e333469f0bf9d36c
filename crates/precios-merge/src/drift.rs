//! Price drift between the earliest and latest snapshot.

use anyhow::{Result, ensure};

use crate::frame::Frame;

/// Append `variacion` and `variacion_relativa` columns computed between the
/// first and last `precio_*` columns (columns must already be sorted, so
/// date suffixes put them in chronological order).
///
/// When the earliest price is zero, missing or non-numeric the relative
/// variation is undefined; both cells are emitted empty rather than
/// producing an infinity or aborting the batch.
pub fn add_drift(frame: &mut Frame) -> Result<()> {
    let price_cols: Vec<String> = frame
        .columns()
        .iter()
        .filter(|c| c.starts_with("precio_"))
        .cloned()
        .collect();
    ensure!(
        !price_cols.is_empty(),
        "No price columns to compute drift over"
    );
    let first = price_cols.first().unwrap().clone();
    let last = price_cols.last().unwrap().clone();

    let mut variacion = Vec::with_capacity(frame.len());
    let mut relativa = Vec::with_capacity(frame.len());
    for i in 0..frame.len() {
        let start: Option<f64> = frame.value(i, &first).and_then(|v| v.parse().ok());
        let end: Option<f64> = frame.value(i, &last).and_then(|v| v.parse().ok());
        match (start, end) {
            (Some(start), Some(end)) if start != 0.0 => {
                let delta = end - start;
                variacion.push(format!("{delta}"));
                relativa.push(format!("{}", delta.abs() / start * 100.0));
            }
            _ => {
                variacion.push(String::new());
                relativa.push(String::new());
            }
        }
    }
    frame.add_column("variacion", variacion);
    frame.add_column("variacion_relativa", relativa);
    Ok(())
}
