//! Store directory and dated snapshot loading.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, ensure};

use crate::frame::Frame;
use crate::provinces;

/// Normalized identity of one store, as attached to price rows.
#[derive(Clone, Debug)]
pub struct StoreKey {
    /// Province display name
    pub provincia: String,
    /// Chain banner name
    pub cadena: String,
    /// `{comercioId}-{banderaId}-{provincia name}`: prices of different
    /// stores of one chain in one province are compared under this key.
    pub id_prov: String,
}

/// Store id → normalized key, read from a consolidated store extract.
#[derive(Debug, Default)]
pub struct StoreDirectory {
    stores: HashMap<String, StoreKey>,
}

impl StoreDirectory {
    pub fn read_csv(path: &Path) -> Result<Self> {
        let frame = Frame::read_csv(path)?;
        Self::from_frame(&frame)
    }

    pub fn from_frame(frame: &Frame) -> Result<Self> {
        let mut stores = HashMap::with_capacity(frame.len());
        for i in 0..frame.len() {
            let get = |name: &str| {
                frame
                    .value(i, name)
                    .with_context(|| format!("Store directory lacks column '{name}'"))
            };
            let id = get("id")?;
            let provincia = provinces::display_name(get("provincia")?).to_string();
            stores.insert(
                id.to_string(),
                StoreKey {
                    id_prov: format!(
                        "{}-{}-{provincia}",
                        get("comercioId")?,
                        get("banderaId")?
                    ),
                    cadena: get("banderaDescripcion")?.to_string(),
                    provincia,
                },
            );
        }
        Ok(Self { stores })
    }

    pub fn get(&self, store_id: &str) -> Option<&StoreKey> {
        self.stores.get(store_id)
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

/// Date tag embedded in a snapshot filename: the final `_`-separated part
/// of the stem, so both `precios_20200412.csv` and a consolidated
/// `precios_20200412_20200419.csv` resolve to their latest date.
pub fn snapshot_date(path: &Path) -> Result<&str> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("Bad snapshot filename: {}", path.display()))?;
    let date = stem.rsplit('_').next().unwrap_or(stem);
    ensure!(
        !date.is_empty() && date != stem,
        "Snapshot filename carries no date: {}",
        path.display()
    );
    Ok(date)
}

/// Load one snapshot: rename `precio` to `precio_{date}` and attach the
/// normalized store key columns. Rows whose store id is absent from the
/// directory are dropped; they could never survive the later intersection.
pub fn load_snapshot(path: &Path, stores: &StoreDirectory) -> Result<Frame> {
    let date = snapshot_date(path)?;
    let mut frame = Frame::read_csv(path)?;
    ensure!(
        frame.col("precio").is_some() && frame.col("sucursal_id").is_some(),
        "Snapshot {} lacks precio/sucursal_id columns",
        path.display()
    );
    frame.rename_column("precio", &format!("precio_{date}"));

    let mut out = Frame::new(
        frame
            .columns()
            .iter()
            .cloned()
            .chain(["provincia", "cadena", "id_prov"].map(String::from))
            .collect(),
    );
    let mut unknown = 0usize;
    for i in 0..frame.len() {
        let store_id = frame.value(i, "sucursal_id").unwrap_or_default();
        let Some(key) = stores.get(store_id) else {
            unknown += 1;
            continue;
        };
        let mut row = frame.rows()[i].clone();
        row.push(key.provincia.clone());
        row.push(key.cadena.clone());
        row.push(key.id_prov.clone());
        out.push_row(row);
    }
    if unknown > 0 {
        log::warn!(
            "{}: {unknown} price rows reference stores missing from the directory",
            path.display()
        );
    }
    Ok(out)
}
