use std::thread;

use log::{info, warn};

use crate::config::HarvestConfig;
use crate::normalizer::Normalizer;
use crate::record::{dedupe, ArtworkRecord, Dataset};
use crate::sparql::{QueryExecutor, SparqlClient};
use crate::strategy::{HarvestStrategy, PaginationPlan};

/// Drives the harvesting strategies against the endpoint and assembles the
/// deduplicated dataset.
///
/// Strictly sequential: one outstanding request at a time, with a fixed sleep
/// between pages, to stay within the remote service's fair-use limits.
pub struct Harvester<E> {
    executor: E,
    normalizer: Normalizer,
    config: HarvestConfig,
}

impl Harvester<SparqlClient> {
    pub fn new(config: HarvestConfig) -> Self {
        let executor = SparqlClient::new(&config);
        Harvester {
            executor,
            normalizer: Normalizer::new(),
            config,
        }
    }
}

impl<E: QueryExecutor> Harvester<E> {
    pub fn with_executor(config: HarvestConfig, executor: E) -> Self {
        Harvester {
            executor,
            normalizer: Normalizer::new(),
            config,
        }
    }

    /// Run both strategies in sequence and deduplicate the merged output.
    /// A strategy that fails entirely is logged and skipped; partial data is
    /// better than no data here. An empty working set yields an empty but
    /// schema-valid dataset.
    pub fn harvest(&self) -> Dataset {
        let mut rows: Vec<ArtworkRecord> = Vec::new();

        info!("Phase 1: Fetching notable works of famous painters...");
        rows.extend(self.run_strategy(&HarvestStrategy::notable_works(&self.config)));
        info!("Notable works: {} paintings", rows.len());

        info!("Phase 2: Sampling paintings from museum collections...");
        rows.extend(self.run_strategy(&HarvestStrategy::collection_sample(&self.config)));
        info!("Total raw results: {}", rows.len());

        let dataset = dedupe(rows);
        info!("After deduplication: {} unique paintings", dataset.len());
        dataset
    }

    fn run_strategy(&self, strategy: &HarvestStrategy) -> Vec<ArtworkRecord> {
        match &strategy.plan {
            PaginationPlan::Scan { max_offset } => self.scan(strategy, *max_offset),
            PaginationPlan::Sample { offsets } => self.sample(strategy, offsets),
        }
    }

    /// Walk contiguous offset windows until an empty raw page, the offset
    /// cap, or a query failure. A page fully filtered away by normalization
    /// still counts as data: only a genuinely empty raw page stops the scan.
    fn scan(&self, strategy: &HarvestStrategy, max_offset: u32) -> Vec<ArtworkRecord> {
        let mut records = Vec::new();
        let mut offset = 0;
        let mut batch_num = 0;

        loop {
            batch_num += 1;
            if batch_num > 1 {
                thread::sleep(self.config.page_delay);
            }
            info!(
                "[Batch {}] Fetching {} {}-{}...",
                batch_num,
                strategy.name,
                offset + 1,
                offset + self.config.page_size
            );

            let query = (strategy.query)(offset, self.config.page_size);
            let raw = match self.executor.execute(&query) {
                Ok(rows) => rows,
                Err(e) => {
                    warn!("{} strategy stopped: {}", strategy.name, e);
                    break;
                }
            };

            if raw.is_empty() {
                info!("No more {} results.", strategy.name);
                break;
            }

            let batch: Vec<ArtworkRecord> = raw
                .iter()
                .filter_map(|row| self.normalizer.normalize(row))
                .collect();
            info!("got {} paintings", batch.len());
            records.extend(batch);

            offset += self.config.page_size;
            if offset >= max_offset {
                info!("Reached limit for {} ({} checked)", strategy.name, offset);
                break;
            }
        }

        records
    }

    /// Fetch a single page at each configured offset. Sample points are
    /// independent: a failed one is logged and the remaining points still run.
    fn sample(&self, strategy: &HarvestStrategy, offsets: &[u32]) -> Vec<ArtworkRecord> {
        let mut records = Vec::new();

        for (i, &offset) in offsets.iter().enumerate() {
            if i > 0 {
                thread::sleep(self.config.page_delay);
            }
            info!("[Sample at offset {}] Fetching...", offset);

            let query = (strategy.query)(offset, self.config.page_size);
            match self.executor.execute(&query) {
                Ok(raw) => {
                    let batch: Vec<ArtworkRecord> = raw
                        .iter()
                        .filter_map(|row| self.normalizer.normalize(row))
                        .collect();
                    info!("got {} paintings", batch.len());
                    records.extend(batch);
                }
                Err(e) => {
                    warn!("Sample at offset {} failed: {}", offset, e);
                }
            }
        }

        records
    }
}
