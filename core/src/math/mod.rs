pub mod geo;
pub mod stats;

pub use geo::GeoPoint;
pub use stats::{BatchSummary, StatsHelper};
