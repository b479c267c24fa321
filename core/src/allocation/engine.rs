use crate::ingest::DetectionRecord;
use crate::prelude::Clock;
use serde::{Deserialize, Serialize};

/// Dispatch urgency. Variants are ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRecommendation {
    pub id: String,
    pub location: String,
    pub food_kits: u64,
    pub medical_kits: u64,
    pub rescue_boats: u64,
    pub blankets: u64,
    pub priority: Priority,
    pub reason: String,
    pub timestamp_iso: String,
}

/// Maps one detection to the supplies it needs.
///
/// Every quantity is the ceiling of a per-person share so a cluster is never
/// under-supplied: food 0.8, medical 0.3, boats 1/20 and blankets 1.2 per
/// person. The shares are applied in integer tenths so the result is exact.
pub struct AllocationEngine;

impl AllocationEngine {
    pub fn recommend(record: &DetectionRecord, clock: &dyn Clock) -> AllocationRecommendation {
        let people = u64::from(record.people_count);
        let priority = if record.is_critical() {
            Priority::Critical
        } else {
            Priority::Medium
        };

        AllocationRecommendation {
            id: record.cluster_id.clone(),
            location: format!("{:.6}, {:.6}", record.latitude, record.longitude),
            food_kits: (people * 8).div_ceil(10),
            medical_kits: (people * 3).div_ceil(10),
            rescue_boats: people.div_ceil(20),
            blankets: (people * 12).div_ceil(10),
            priority,
            reason: reason_for(record, priority),
            timestamp_iso: clock.now().to_rfc3339(),
        }
    }
}

fn reason_for(record: &DetectionRecord, priority: Priority) -> String {
    let action = match priority {
        Priority::Critical => "Immediate evacuation and medical support required.",
        Priority::High | Priority::Medium => "Dispatch standard relief supplies.",
    };
    format!(
        "{} people detected in cluster {}, {:.2} km from the depot. {}",
        record.people_count, record.cluster_id, record.distance_from_depot_km, action
    )
}
