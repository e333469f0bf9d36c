//! Page processing — store listing pages and nested product pagination.
//!
//! Each worker claims one listing page offset at a time; for every store it
//! accepts, the same worker drains that store's nested product pages before
//! claiming the next offset. A failed page aborts only its own
//! continuation: nothing else scheduled is touched.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use indicatif::ProgressBar;

use precios_core::progress::upgrade_to_bar;
use precios_core::{FetchError, is_shutdown_requested};

use crate::api::{ApiClient, LIMIT_PRODUCTS};
use crate::config::Config;
use crate::items::Item;
use crate::pipeline::ItemRouter;
use crate::quota::ChainQuotaLimiter;

/// Run-scoped mutable state shared across workers.
pub(crate) struct RunState {
    pub router: Mutex<ItemRouter>,
    pub quota: Mutex<ChainQuotaLimiter>,
    pub pages_failed: AtomicUsize,
}

impl RunState {
    pub fn new(router: ItemRouter, quota: ChainQuotaLimiter) -> Self {
        Self {
            router: Mutex::new(router),
            quota: Mutex::new(quota),
            pages_failed: AtomicUsize::new(0),
        }
    }

    fn route(&self, item: Item) -> std::io::Result<()> {
        self.router
            .lock()
            .expect("worker thread panicked")
            .process(item)?;
        Ok(())
    }

    pub fn note_page_failure(&self, label: &str, err: &FetchError) {
        self.pages_failed.fetch_add(1, Ordering::Relaxed);
        log::error!("{label}: {err}");
        // Keep the raw body visible for diagnosis
        if let FetchError::Schema { body, .. } = err {
            log::error!("{label}: response body: {body}");
        }
    }
}

/// Process one store listing page at `offset`: quota-check each store,
/// emit it, then crawl its nested product pages if enabled.
pub(crate) fn process_listing_page(
    api: &ApiClient,
    offset: usize,
    end: usize,
    config: &Config,
    state: &RunState,
    pb: &ProgressBar,
) -> Result<(), FetchError> {
    log::info!("obteniendo sucursales {offset}/{end}");
    let page = api.stores_page(Some(offset))?;

    for store in page.records {
        if is_shutdown_requested() {
            break;
        }
        let accepted = state
            .quota
            .lock()
            .expect("worker thread panicked")
            .accept(&store);
        if !accepted {
            continue;
        }

        let store_id = store.id.clone();
        state.route(Item::Store(store))?;

        if config.products {
            // Nested failure is fatal for this store only; siblings continue.
            if let Err(e) = crawl_store_products(api, &store_id, config, state, pb) {
                state.note_page_failure(&format!("sucursal {store_id}"), &e);
            }
        }
    }
    Ok(())
}

/// Drain one store's nested product listing: first page yields the total,
/// remaining offsets follow the same fixed page size.
pub(crate) fn crawl_store_products(
    api: &ApiClient,
    store_id: &str,
    config: &Config,
    state: &RunState,
    pb: &ProgressBar,
) -> Result<(), FetchError> {
    let first = api.products_page(store_id, None)?;
    let total = first.total;
    pb.set_message(format!("sucursal {store_id}: {total} productos"));
    upgrade_to_bar(pb, total.div_ceil(LIMIT_PRODUCTS).max(1) as u64);
    emit_products(&first.records, store_id, config, state)?;
    pb.inc(1);

    let mut offset = LIMIT_PRODUCTS;
    while offset < total {
        if is_shutdown_requested() {
            break;
        }
        log::debug!("obteniendo {offset}/{total} precios para la sucursal {store_id}");
        let page = api.products_page(store_id, Some(offset))?;
        emit_products(&page.records, store_id, config, state)?;
        pb.inc(1);
        offset += LIMIT_PRODUCTS;
    }
    Ok(())
}

fn emit_products(
    records: &[crate::items::ApiProduct],
    store_id: &str,
    config: &Config,
    state: &RunState,
) -> Result<(), FetchError> {
    for product in records {
        state.route(Item::Product(product.product()))?;
        if config.prices {
            state.route(Item::Price(product.price_observation(store_id)))?;
        }
    }
    Ok(())
}
