use crate::config::HarvestConfig;
use crate::queries;

/// How a strategy walks the result space.
#[derive(Debug, Clone, PartialEq)]
pub enum PaginationPlan {
    /// Contiguous pages from offset 0 until an empty page or the offset cap.
    Scan { max_offset: u32 },
    /// One page at each scattered offset. A statistical sample across a large
    /// result space, not an exhaustive walk; a failed sample point is skipped.
    Sample { offsets: Vec<u32> },
}

/// A harvesting strategy: a query template plus a pagination plan.
pub struct HarvestStrategy {
    pub name: &'static str,
    pub query: fn(u32, u32) -> String,
    pub plan: PaginationPlan,
}

impl HarvestStrategy {
    /// Strategy 1: works linked to painters via the notable-work relation.
    pub fn notable_works(config: &HarvestConfig) -> Self {
        HarvestStrategy {
            name: "notable works",
            query: queries::notable_works,
            plan: PaginationPlan::Scan {
                max_offset: config.notable_works_cap,
            },
        }
    }

    /// Strategy 2: museum collections sampled at scattered offsets.
    pub fn collection_sample(config: &HarvestConfig) -> Self {
        HarvestStrategy {
            name: "collection sample",
            query: queries::collection_sample,
            plan: PaginationPlan::Sample {
                offsets: config.sample_offsets.clone(),
            },
        }
    }
}
