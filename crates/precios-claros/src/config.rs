//! Crawl configuration

use std::path::PathBuf;

use precios_core::Shard;

use crate::api::ApiSettings;

/// CLI-facing arguments for the crawl command (plain struct, no clap derive).
#[derive(Debug)]
pub struct CrawlArgs {
    /// Shard as "i/N"
    pub shard: String,
    pub stores: bool,
    pub products: bool,
    pub prices: bool,
    /// Max stores per (chain, criterion) key; 0 disables the quota
    pub max_per_chain: usize,
    /// Grouping criterion field name for the quota (e.g. "provincia")
    pub chain_criterion: Option<String>,
    /// Explicit store ids to crawl directly, bypassing listing pagination
    pub store_ids: Vec<String>,
    pub workers: usize,
    pub output_dir: PathBuf,
    pub api: ApiSettings,
}

/// Validated runtime configuration for one crawl run.
#[derive(Debug)]
pub struct Config {
    pub shard: Shard,
    pub stores: bool,
    pub products: bool,
    pub prices: bool,
    pub max_per_chain: usize,
    pub chain_criterion: Option<String>,
    pub store_ids: Vec<String>,
    pub workers: usize,
    pub output_dir: PathBuf,
    pub api: ApiSettings,
}

impl TryFrom<CrawlArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CrawlArgs) -> Result<Self, Self::Error> {
        let shard = Shard::parse(&args.shard)?;
        anyhow::ensure!(args.workers >= 1, "workers must be >= 1");
        if args.prices && !args.products {
            anyhow::bail!("price extraction requires product extraction");
        }
        Ok(Self {
            shard,
            stores: args.stores,
            products: args.products,
            prices: args.prices,
            max_per_chain: args.max_per_chain,
            chain_criterion: args.chain_criterion,
            store_ids: args.store_ids,
            workers: args.workers,
            output_dir: args.output_dir,
            api: args.api,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CrawlArgs {
        CrawlArgs {
            shard: "1/7".to_string(),
            stores: true,
            products: true,
            prices: true,
            max_per_chain: 0,
            chain_criterion: None,
            store_ids: Vec::new(),
            workers: 4,
            output_dir: PathBuf::from("data"),
            api: ApiSettings::default(),
        }
    }

    #[test]
    fn valid_args_convert() {
        let config = Config::try_from(args()).unwrap();
        assert_eq!(config.shard, Shard { index: 1, count: 7 });
        assert_eq!(config.workers, 4);
    }

    #[test]
    fn invalid_shard_is_fatal() {
        let mut a = args();
        a.shard = "9/7".to_string();
        assert!(Config::try_from(a).is_err());
    }

    #[test]
    fn prices_require_products() {
        let mut a = args();
        a.products = false;
        assert!(Config::try_from(a).is_err());
    }

    #[test]
    fn zero_workers_rejected() {
        let mut a = args();
        a.workers = 0;
        assert!(Config::try_from(a).is_err());
    }
}
