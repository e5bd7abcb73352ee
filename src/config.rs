use std::path::PathBuf;
use std::time::Duration;

/// Tunables for one harvest run. Constructed once and passed into the
/// harvester and cache instead of living as process-wide constants.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// SPARQL endpoint to POST queries to.
    pub endpoint: String,
    /// Identifies this client to the endpoint, per Wikidata's usage policy.
    pub user_agent: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Base cooldown used by the retry backoff (fixed sleep on HTTP 429,
    /// multiplied by the attempt number on server errors / timeouts).
    pub retry_cooldown: Duration,
    /// Total retry budget per query, across all retryable conditions.
    pub max_retries: u32,
    /// Sleep between successive pages of one strategy.
    pub page_delay: Duration,
    /// Results per batch query (SPARQL LIMIT).
    pub page_size: u32,
    /// Offset cap for the notable-works scan. Empirically chosen, not derived
    /// from any measured corpus size.
    pub notable_works_cap: u32,
    /// Offset starting points for the collection-sampling strategy, one page
    /// fetched per offset.
    pub sample_offsets: Vec<u32>,
    /// Where the dataset snapshot is written/read.
    pub cache_path: PathBuf,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        HarvestConfig {
            endpoint: "https://query.wikidata.org/sparql".to_string(),
            user_agent: "ArtworkScraper/1.0 (https://github.com/artwork-scraper; contact@example.com)"
                .to_string(),
            request_timeout: Duration::from_secs(90),
            retry_cooldown: Duration::from_secs(30),
            max_retries: 5,
            page_delay: Duration::from_secs(2),
            page_size: 200,
            notable_works_cap: 2000,
            sample_offsets: vec![0, 5000, 10000, 20000, 30000, 50000],
            cache_path: PathBuf::from("data/artworks.csv"),
        }
    }
}
