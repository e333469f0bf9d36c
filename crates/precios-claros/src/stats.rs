//! Run statistics

use std::time::Duration;

use precios_core::progress::fmt_num;

use crate::pipeline::RouterSummary;

/// End-of-run counters for one crawl.
#[derive(Debug, Default)]
pub struct CrawlSummary {
    pub stores: usize,
    pub products: usize,
    pub categorized: usize,
    pub prices: usize,
    pub duplicates: usize,
    pub quota_rejected: usize,
    pub pages_failed: usize,
    pub elapsed: Duration,
}

impl CrawlSummary {
    pub fn new(
        router: RouterSummary,
        quota_rejected: usize,
        pages_failed: usize,
        elapsed: Duration,
    ) -> Self {
        Self {
            stores: router.stores,
            products: router.products,
            categorized: router.categorized,
            prices: router.prices,
            duplicates: router.duplicates,
            quota_rejected,
            pages_failed,
            elapsed,
        }
    }

    /// TTY summary table.
    pub fn print(&self) {
        use comfy_table::{Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec!["Records", "Count"]);
        table.add_row(vec!["sucursales".to_string(), fmt_num(self.stores)]);
        table.add_row(vec!["productos".to_string(), fmt_num(self.products)]);
        if self.categorized > 0 {
            table.add_row(vec![
                "productos categorizados".to_string(),
                fmt_num(self.categorized),
            ]);
        }
        table.add_row(vec!["precios".to_string(), fmt_num(self.prices)]);
        table.add_row(vec!["duplicados".to_string(), fmt_num(self.duplicates)]);
        table.add_row(vec![
            "rechazadas por cupo".to_string(),
            fmt_num(self.quota_rejected),
        ]);
        table.add_row(vec![
            "páginas fallidas".to_string(),
            fmt_num(self.pages_failed),
        ]);
        table.add_row(vec![
            "tiempo".to_string(),
            format!("{:.1}s", self.elapsed.as_secs_f64()),
        ]);
        eprintln!("\n{table}");
    }

    /// Non-TTY one-line summary.
    pub fn log(&self) {
        log::info!(
            "crawl done: {} sucursales, {} productos, {} precios \
             ({} duplicados, {} por cupo, {} páginas fallidas) in {:.1}s",
            fmt_num(self.stores),
            fmt_num(self.products),
            fmt_num(self.prices),
            fmt_num(self.duplicates),
            fmt_num(self.quota_rejected),
            fmt_num(self.pages_failed),
            self.elapsed.as_secs_f64()
        );
    }
}
