//! Main execution logic for the crawl command

use std::time::Instant;

use anyhow::Context;

use precios_core::{
    PartitionRange, SharedProgress, WorkQueue, cleanup_tmp_files, is_shutdown_requested,
};

use crate::api::{ApiClient, LIMIT_STORES};
use crate::config::Config;
use crate::pipeline::ItemRouter;
use crate::quota::ChainQuotaLimiter;
use crate::stats::CrawlSummary;
use crate::worker::{RunState, crawl_store_products, process_listing_page};

/// Main entry point for the crawl command.
pub fn run(config: &Config, progress: &SharedProgress) -> anyhow::Result<CrawlSummary> {
    let start = Instant::now();
    std::fs::create_dir_all(&config.output_dir).context("Cannot create output directory")?;
    cleanup_tmp_files(&config.output_dir).context("Failed to clean stale tmp files")?;

    log::info!(
        "precios-claros crawl starting: shard={}, workers={}, stores={}, products={}, prices={}",
        config.shard,
        config.workers,
        config.stores,
        config.products,
        config.prices
    );

    let api = ApiClient::new(config.api.clone());
    let file_tag = format!(
        "{}-{}-{}",
        config.shard.index,
        config.shard.count,
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    );
    let router = ItemRouter::open(&config.output_dir, &file_tag)
        .context("Cannot open output pipeline")?;
    let quota = ChainQuotaLimiter::new(config.max_per_chain, config.chain_criterion.clone());
    let state = RunState::new(router, quota);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()
        .context("Failed to create thread pool")?;

    if config.store_ids.is_empty() {
        crawl_listing(config, &api, &state, &pool, progress)?;
    } else {
        crawl_explicit_stores(config, &api, &state, &pool, progress);
    }

    let quota_rejected = state.quota.lock().expect("worker thread panicked").rejected();
    let pages_failed = state
        .pages_failed
        .load(std::sync::atomic::Ordering::Relaxed);
    let router = state
        .router
        .into_inner()
        .expect("worker thread panicked");
    let summary = router.close().context("Failed to finalize output files")?;

    Ok(CrawlSummary::new(
        summary,
        quota_rejected,
        pages_failed,
        start.elapsed(),
    ))
}

/// Listing-driven crawl: first page → total → shard partition → page
/// offsets distributed to workers.
fn crawl_listing(
    config: &Config,
    api: &ApiClient,
    state: &RunState,
    pool: &rayon::ThreadPool,
    progress: &SharedProgress,
) -> anyhow::Result<()> {
    // The total is authoritative and only known after this first request;
    // no store page is enumerable before it.
    let first = api
        .stores_page(None)
        .context("Cannot fetch first listing page")?;
    let total = first.total;

    let range = PartitionRange::plan(total, config.shard);
    log::info!(
        "{total} sucursales en {} shards: {} por shard",
        config.shard.count,
        range.end - range.start
    );

    if !config.stores {
        log::info!("store extraction disabled; nothing to enumerate");
        return Ok(());
    }

    let offsets: Vec<usize> = range.page_offsets(total, LIMIT_STORES).collect();
    log::info!("{} páginas de sucursales en cola", offsets.len());
    let queue = WorkQueue::new(offsets);
    let end = range.end.min(total);

    pool.install(|| {
        rayon::scope(|s| {
            for _ in 0..config.workers {
                s.spawn(|_| {
                    while let Some(&offset) = queue.next() {
                        if is_shutdown_requested() {
                            break;
                        }
                        let pb = progress.page_bar(&format!("sucursales {offset}/{end}"));
                        if let Err(e) =
                            process_listing_page(api, offset, end, config, state, &pb)
                        {
                            state.note_page_failure(&format!("offset {offset}"), &e);
                        }
                        pb.finish_and_clear();
                    }
                });
            }
        });
    });
    Ok(())
}

/// Direct crawl of an explicit store id list, bypassing listing pagination.
fn crawl_explicit_stores(
    config: &Config,
    api: &ApiClient,
    state: &RunState,
    pool: &rayon::ThreadPool,
    progress: &SharedProgress,
) {
    log::info!("crawling {} explicit store ids", config.store_ids.len());
    let queue = WorkQueue::new(config.store_ids.clone());

    pool.install(|| {
        rayon::scope(|s| {
            for _ in 0..config.workers {
                s.spawn(|_| {
                    while let Some(store_id) = queue.next() {
                        if is_shutdown_requested() {
                            break;
                        }
                        let pb = progress.page_bar(&format!("sucursal {store_id}"));
                        if let Err(e) = crawl_store_products(api, store_id, config, state, &pb) {
                            state.note_page_failure(&format!("sucursal {store_id}"), &e);
                        }
                        pb.finish_and_clear();
                    }
                });
            }
        });
    });
}
