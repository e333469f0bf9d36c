//! Per-chain store quota.
//!
//! Caps how many stores are accepted per (chain, criterion) key, counted in
//! first-seen order. State is owned by the run that created it, so several
//! independent runs can coexist in one process.

use std::collections::HashMap;

use crate::items::StoreRecord;

/// Counts stores per (comercio, bandera, criterion value) key and rejects
/// records past the configured maximum. `max = 0` disables the limit.
#[derive(Debug)]
pub struct ChainQuotaLimiter {
    max: usize,
    criterion: Option<String>,
    counts: HashMap<String, usize>,
    rejected: usize,
}

impl ChainQuotaLimiter {
    pub fn new(max: usize, criterion: Option<String>) -> Self {
        Self {
            max,
            criterion,
            counts: HashMap::new(),
            rejected: 0,
        }
    }

    /// Whether this store is within quota. Rejection is silent to the
    /// pipeline; a diagnostic is logged at info level.
    pub fn accept(&mut self, store: &StoreRecord) -> bool {
        if self.max == 0 {
            return true;
        }
        let criterion_value = self
            .criterion
            .as_deref()
            .map_or("", |field| store.criterion_value(field));
        let key = format!(
            "{}-{}-{criterion_value}",
            store.comercio_id, store.bandera_id
        );
        let count = self.counts.entry(key).or_insert(0);
        *count += 1;
        if *count > self.max {
            self.rejected += 1;
            let scope = self
                .criterion
                .as_deref()
                .map(|field| format!(" en {field} {criterion_value}"))
                .unwrap_or_default();
            log::info!(
                "límite de {} sucursal/es alcanzado para {}{scope}; sucursal {} ignorada",
                self.max,
                store.comercio_razon_social,
                store.id
            );
            return false;
        }
        true
    }

    /// Stores rejected so far.
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}
