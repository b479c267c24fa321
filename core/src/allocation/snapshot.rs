use crate::ingest::DetectionRecord;
use crate::prelude::clock_text;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Detail-panel view of the most recently located cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionSnapshot {
    pub total_people: u32,
    pub location: String,
    pub severity: Severity,
    pub vulnerable_count: u32,
    pub coordinates_text: String,
    pub timestamp_text: String,
}

impl DetectionSnapshot {
    pub fn from_record(record: &DetectionRecord, at: DateTime<Utc>) -> Self {
        // Same threshold as the allocation priority.
        let severity = if record.is_critical() {
            Severity::Critical
        } else {
            Severity::Medium
        };
        Self {
            total_people: record.people_count,
            location: format!("Cluster {}", record.cluster_id),
            severity,
            vulnerable_count: record.people_count / 4,
            coordinates_text: format!("{:.4}° N, {:.4}° E", record.latitude, record.longitude),
            timestamp_text: clock_text(at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::{AllocationEngine, Priority};
    use crate::prelude::FixedClock;
    use chrono::TimeZone;

    #[test]
    fn snapshot_fields_follow_record() {
        let at = Utc.with_ymd_and_hms(2024, 7, 14, 14, 34, 0).unwrap();
        let record = DetectionRecord::new("C3", 47, 18.5204, 73.8567, 2.0);
        let snapshot = DetectionSnapshot::from_record(&record, at);
        assert_eq!(snapshot.total_people, 47);
        assert_eq!(snapshot.vulnerable_count, 11);
        assert_eq!(snapshot.severity, Severity::Medium);
        assert_eq!(snapshot.coordinates_text, "18.5204° N, 73.8567° E");
        assert_eq!(snapshot.timestamp_text, "2:34 PM");
        assert_eq!(snapshot.location, "Cluster C3");
    }

    #[test]
    fn severity_agrees_with_priority() {
        let at = Utc.with_ymd_and_hms(2024, 7, 14, 8, 0, 0).unwrap();
        let clock = FixedClock(at);
        for people in [0, 50, 51, 400] {
            let record = DetectionRecord::new("C", people, 1.0, 1.0, 1.0);
            let critical = DetectionSnapshot::from_record(&record, at).severity == Severity::Critical;
            let priority = AllocationEngine::recommend(&record, &clock).priority;
            assert_eq!(critical, priority == Priority::Critical);
        }
    }
}
