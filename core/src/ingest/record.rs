use crate::math::GeoPoint;
use serde::{Deserialize, Serialize};

/// Clusters with more people than this are treated as critical.
pub const CRITICAL_PEOPLE_THRESHOLD: u32 = 50;

/// One detected cluster of stranded people.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub cluster_id: String,
    pub people_count: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_from_depot_km: f64,
}

impl DetectionRecord {
    pub fn new(
        cluster_id: impl Into<String>,
        people_count: u32,
        latitude: f64,
        longitude: f64,
        distance_from_depot_km: f64,
    ) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            people_count,
            latitude,
            longitude,
            distance_from_depot_km,
        }
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    pub fn is_critical(&self) -> bool {
        self.people_count > CRITICAL_PEOPLE_THRESHOLD
    }
}
