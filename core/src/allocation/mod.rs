pub mod engine;
pub mod ranking;
pub mod snapshot;

pub use engine::{AllocationEngine, AllocationRecommendation, Priority};
pub use ranking::{rank_clusters, RankedCluster, RankingQuery, RecommendedResources};
pub use snapshot::{DetectionSnapshot, Severity};
