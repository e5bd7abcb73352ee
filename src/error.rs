use std::path::PathBuf;
use thiserror::Error;

/// Terminal failures of a single SPARQL query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The retry budget ran out across retryable conditions (429, 5xx,
    /// timeouts, connection errors).
    #[error("query failed after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    /// A non-retryable HTTP status (4xx other than 429). Treated as a query
    /// defect, not a transient condition.
    #[error("endpoint returned HTTP {status}")]
    Http { status: u16 },

    #[error("request error: {0}")]
    Network(#[from] reqwest::Error),

    /// The 2xx response body was not a valid results envelope.
    #[error("malformed results envelope: {0}")]
    Envelope(#[from] serde_json::Error),
}

/// Failures of the dataset snapshot cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache file not found: {}\nRun: artwork-scraper (to fetch data from Wikidata)", path.display())]
    NotFound { path: PathBuf },

    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache format error: {0}")]
    Csv(#[from] csv::Error),
}
