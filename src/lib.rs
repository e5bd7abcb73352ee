pub mod cache;
pub mod config;
pub mod error;
pub mod harvester;
pub mod logger;
pub mod normalizer;
pub mod queries;
pub mod record;
pub mod sparql;
pub mod strategy;

// Exporting types for convenience
pub use config::HarvestConfig;
pub use error::{CacheError, QueryError};
pub use harvester::Harvester;
pub use normalizer::Normalizer;
pub use record::{dedupe, ArtworkRecord, Dataset, MuseumGroup};
pub use sparql::{QueryExecutor, SparqlClient};
pub use strategy::{HarvestStrategy, PaginationPlan};
