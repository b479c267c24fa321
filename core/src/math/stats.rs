use crate::ingest::DetectionRecord;
use serde::Serialize;

/// Aggregate view over one detection batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub clusters: usize,
    pub total_people: u64,
    pub critical_clusters: usize,
    pub mean_distance_km: f64,
    pub max_distance_km: f64,
}

pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }

    pub fn summarize(records: &[DetectionRecord]) -> BatchSummary {
        let distances: Vec<f64> = records.iter().map(|r| r.distance_from_depot_km).collect();
        BatchSummary {
            clusters: records.len(),
            total_people: records.iter().map(|r| u64::from(r.people_count)).sum(),
            critical_clusters: records.iter().filter(|r| r.is_critical()).count(),
            mean_distance_km: Self::mean(&distances),
            max_distance_km: distances.iter().cloned().fold(0.0, f64::max),
        }
    }
}
