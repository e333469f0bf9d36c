//! Item routing and per-run deduplication.
//!
//! An explicit open/process/close stage invoked directly by the scheduler.
//! The seen-id set lives here, scoped to one run, injected rather than
//! ambient, so independent runs can coexist in one process.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use precios_core::CsvSink;

use crate::items::{Item, ItemKind};

/// Outcome of routing one item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Routed {
    Written,
    Duplicate,
}

/// Per-run row counts, reported after close.
#[derive(Debug, Default)]
pub struct RouterSummary {
    pub stores: usize,
    pub products: usize,
    pub categorized: usize,
    pub prices: usize,
    pub duplicates: usize,
}

/// Routes each extracted record to the sink matching its type, dropping
/// identifier-bearing records already seen in this run. Price observations
/// are exempt — multiple observations of one (store, product) pair across
/// time are all meaningful. Sinks open lazily on first use.
pub struct ItemRouter {
    output_dir: PathBuf,
    file_tag: String,
    seen: FxHashSet<String>,
    sinks: HashMap<ItemKind, CsvSink>,
    duplicates: usize,
}

impl ItemRouter {
    /// Open a router writing `{kind}-{file_tag}.csv` files under `output_dir`.
    pub fn open(output_dir: &Path, file_tag: &str) -> std::io::Result<Self> {
        std::fs::create_dir_all(output_dir)?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            file_tag: file_tag.to_string(),
            seen: FxHashSet::default(),
            sinks: HashMap::new(),
            duplicates: 0,
        })
    }

    /// Route one item: dedup check, then append to the per-type sink.
    pub fn process(&mut self, item: Item) -> std::io::Result<Routed> {
        if let Some(id) = item.dedup_id() {
            // This set can grow to millions of entries over a full run.
            if !self.seen.insert(id.to_string()) {
                self.duplicates += 1;
                log::debug!("duplicate {} {id} dropped", item.kind());
                return Ok(Routed::Duplicate);
            }
        }

        let kind = item.kind();
        let sink = match self.sinks.entry(kind) {
            std::collections::hash_map::Entry::Occupied(e) => e.into_mut(),
            std::collections::hash_map::Entry::Vacant(e) => {
                let filename = format!("{}-{}.csv", kind.file_prefix(), self.file_tag);
                e.insert(CsvSink::new(&self.output_dir, &filename)?)
            }
        };

        match item {
            Item::Store(r) => sink.write_record(&r)?,
            Item::Product(r) => sink.write_record(&r)?,
            Item::CategorizedProduct(r) => sink.write_record(&r)?,
            Item::Price(r) => sink.write_record(&r)?,
        }
        Ok(Routed::Written)
    }

    /// Finalize every open sink (tmp → final rename) and report counts.
    pub fn close(self) -> std::io::Result<RouterSummary> {
        let mut summary = RouterSummary {
            duplicates: self.duplicates,
            ..RouterSummary::default()
        };
        for (kind, sink) in self.sinks {
            let rows = sink.finalize()?;
            match kind {
                ItemKind::Store => summary.stores = rows,
                ItemKind::Product => summary.products = rows,
                ItemKind::CategorizedProduct => summary.categorized = rows,
                ItemKind::Price => summary.prices = rows,
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{ApiProduct, StoreRecord};
    use tempfile::TempDir;

    fn store(id: &str) -> StoreRecord {
        serde_json::from_str(&format!(
            r#"{{"id": "{id}", "comercioId": 1, "banderaId": 1}}"#
        ))
        .unwrap()
    }

    fn product(id: &str) -> ApiProduct {
        serde_json::from_str(&format!(r#"{{"id": "{id}", "precio": 10.0}}"#)).unwrap()
    }

    #[test]
    fn routes_items_to_per_type_files() {
        let dir = TempDir::new().unwrap();
        let mut router = ItemRouter::open(dir.path(), "1-1-20200101").unwrap();
        router.process(Item::Store(store("s1"))).unwrap();
        router
            .process(Item::Product(product("p1").product()))
            .unwrap();
        router
            .process(Item::Price(product("p1").price_observation("s1")))
            .unwrap();
        let summary = router.close().unwrap();
        assert_eq!(summary.stores, 1);
        assert_eq!(summary.products, 1);
        assert_eq!(summary.prices, 1);

        assert!(dir.path().join("sucursal-1-1-20200101.csv").exists());
        assert!(dir.path().join("producto-1-1-20200101.csv").exists());
        assert!(dir.path().join("precio-1-1-20200101.csv").exists());
    }

    #[test]
    fn drops_duplicate_ids_within_run() {
        let dir = TempDir::new().unwrap();
        let mut router = ItemRouter::open(dir.path(), "t").unwrap();
        assert_eq!(
            router
                .process(Item::Product(product("p1").product()))
                .unwrap(),
            Routed::Written
        );
        assert_eq!(
            router
                .process(Item::Product(product("p1").product()))
                .unwrap(),
            Routed::Duplicate
        );
        let summary = router.close().unwrap();
        assert_eq!(summary.products, 1);
        assert_eq!(summary.duplicates, 1);
    }

    #[test]
    fn dedup_spans_item_kinds_by_identifier() {
        // The seen-set is one namespace for all identifier-bearing kinds.
        let dir = TempDir::new().unwrap();
        let mut router = ItemRouter::open(dir.path(), "t").unwrap();
        router.process(Item::Store(store("x"))).unwrap();
        assert_eq!(
            router
                .process(Item::Product(product("x").product()))
                .unwrap(),
            Routed::Duplicate
        );
        router.close().unwrap();
    }

    #[test]
    fn prices_never_deduplicated() {
        let dir = TempDir::new().unwrap();
        let mut router = ItemRouter::open(dir.path(), "t").unwrap();
        let p = product("p1");
        // same (store, product) twice — both survive
        assert_eq!(
            router
                .process(Item::Price(p.price_observation("s1")))
                .unwrap(),
            Routed::Written
        );
        assert_eq!(
            router
                .process(Item::Price(p.price_observation("s1")))
                .unwrap(),
            Routed::Written
        );
        let summary = router.close().unwrap();
        assert_eq!(summary.prices, 2);
        assert_eq!(summary.duplicates, 0);
    }

    #[test]
    fn no_files_for_kinds_never_seen() {
        let dir = TempDir::new().unwrap();
        let mut router = ItemRouter::open(dir.path(), "t").unwrap();
        router.process(Item::Store(store("s1"))).unwrap();
        router.close().unwrap();
        assert!(dir.path().join("sucursal-t.csv").exists());
        assert!(!dir.path().join("producto-t.csv").exists());
        assert!(!dir.path().join("precio-t.csv").exists());
    }
}
