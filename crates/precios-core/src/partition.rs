//! Shard partition arithmetic.
//!
//! A crawl run is split across N cooperating shards, each owning a
//! contiguous sub-range of the global record collection. The global total
//! is only known after the first listing page, so planning happens at
//! runtime, not configuration time.

use crate::error::FetchError;

/// One shard out of N, 1-based. Parsed from the `"i/N"` CLI form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shard {
    pub index: usize,
    pub count: usize,
}

impl Shard {
    /// Parse `"i/N"`. A bare `"i"` without a slash means the whole
    /// collection (`1/1`).
    pub fn parse(s: &str) -> Result<Self, FetchError> {
        let shard = match s.split_once('/') {
            Some((i, n)) => {
                let index = i
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| FetchError::Config(format!("invalid shard index in '{s}'")))?;
                let count = n
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| FetchError::Config(format!("invalid shard count in '{s}'")))?;
                Self { index, count }
            }
            None => Self { index: 1, count: 1 },
        };
        shard.validate()?;
        Ok(shard)
    }

    fn validate(self) -> Result<(), FetchError> {
        if self.count < 1 {
            return Err(FetchError::Config("shard count must be >= 1".into()));
        }
        if self.index < 1 || self.index > self.count {
            return Err(FetchError::Config(format!(
                "shard index {} outside 1..={}",
                self.index, self.count
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for Shard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.index, self.count)
    }
}

/// Half-open range `[start, end)` of global record ordinals owned by one shard.
///
/// Ranges over all shards of a run tile `[0, per_shard * count)`, a superset
/// of `[0, total)`; callers cap iteration at `total` when paging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartitionRange {
    pub start: usize,
    pub end: usize,
}

impl PartitionRange {
    /// Plan this shard's sub-range of a collection of `total` records.
    pub fn plan(total: usize, shard: Shard) -> Self {
        let per_shard = total.div_ceil(shard.count);
        let start = per_shard * (shard.index - 1);
        Self {
            start,
            end: start + per_shard,
        }
    }

    /// Page offsets within this range, stepping by `limit` and capped at
    /// `total` (the range end may overshoot the collection).
    pub fn page_offsets(&self, total: usize, limit: usize) -> impl Iterator<Item = usize> {
        (self.start..self.end.min(total)).step_by(limit.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_fraction() {
        assert_eq!(Shard::parse("3/7").unwrap(), Shard { index: 3, count: 7 });
    }

    #[test]
    fn parse_bare_means_whole() {
        assert_eq!(Shard::parse("1").unwrap(), Shard { index: 1, count: 1 });
    }

    #[test]
    fn parse_rejects_zero_index() {
        assert!(Shard::parse("0/7").is_err());
    }

    #[test]
    fn parse_rejects_index_above_count() {
        assert!(Shard::parse("8/7").is_err());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Shard::parse("a/b").is_err());
    }

    #[test]
    fn plan_97_over_7_shard_3() {
        let range = PartitionRange::plan(97, Shard { index: 3, count: 7 });
        // per_shard = ceil(97/7) = 14
        assert_eq!(range, PartitionRange { start: 28, end: 42 });
    }

    #[test]
    fn single_shard_covers_everything() {
        let range = PartitionRange::plan(100, Shard { index: 1, count: 1 });
        assert_eq!(range, PartitionRange { start: 0, end: 100 });
    }

    #[test]
    fn union_tiles_collection() {
        // Ranges must cover [0, total) with no gaps and no overlap
        for total in [0usize, 1, 29, 30, 97, 1000, 12345] {
            for count in 1..=9 {
                let mut cursor = 0;
                for index in 1..=count {
                    let r = PartitionRange::plan(total, Shard { index, count });
                    assert_eq!(r.start, cursor, "gap at total={total} count={count}");
                    assert!(r.end >= r.start);
                    cursor = r.end;
                }
                assert!(cursor >= total, "union short at total={total} count={count}");
            }
        }
    }

    #[test]
    fn page_offsets_capped_at_total() {
        let range = PartitionRange::plan(97, Shard { index: 7, count: 7 });
        // last shard owns [84, 98) but total is 97
        let offsets: Vec<usize> = range.page_offsets(97, 30).collect();
        assert_eq!(offsets, vec![84]);
    }

    #[test]
    fn page_offsets_step_by_limit() {
        let range = PartitionRange::plan(97, Shard { index: 1, count: 7 });
        let offsets: Vec<usize> = range.page_offsets(97, 5).collect();
        assert_eq!(offsets, vec![0, 5, 10]);
    }

    #[test]
    fn page_offsets_empty_collection() {
        let range = PartitionRange::plan(0, Shard { index: 1, count: 3 });
        assert_eq!(range.page_offsets(0, 30).count(), 0);
    }
}
