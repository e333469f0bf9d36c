use std::path::PathBuf;

/// Configuration for the merge pipeline.
#[derive(Debug)]
pub struct MergeConfig {
    /// Directory holding `sucursales.csv`, `productos.csv` and the dated
    /// `precios_*.csv` snapshots
    pub data_dir: PathBuf,
    /// Output CSV path for the merged drift table
    pub output: PathBuf,
}

impl MergeConfig {
    pub fn stores_file(&self) -> PathBuf {
        self.data_dir.join("sucursales.csv")
    }

    pub fn products_file(&self) -> PathBuf {
        self.data_dir.join("productos.csv")
    }
}
