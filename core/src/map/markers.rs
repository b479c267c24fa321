use crate::ingest::DetectionRecord;
use crate::math::GeoPoint;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub id: String,
    pub position: GeoPoint,
    pub people_count: u32,
}

impl MapMarker {
    pub fn from_record(record: &DetectionRecord) -> Self {
        Self {
            id: record.cluster_id.clone(),
            position: record.position(),
            people_count: record.people_count,
        }
    }
}

/// Map markers keyed by cluster id, one per id, iterated in first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct MarkerStore {
    markers: Vec<MapMarker>,
    index: HashMap<String, usize>,
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every marker with one per record. A later record with an
    /// already-seen id overwrites the earlier marker in place.
    pub fn bulk_load(&mut self, records: &[DetectionRecord]) {
        self.markers.clear();
        self.index.clear();
        for record in records {
            let marker = MapMarker::from_record(record);
            match self.index.get(&record.cluster_id) {
                Some(&slot) => self.markers[slot] = marker,
                None => self.push(marker),
            }
        }
    }

    /// Inserts a marker for `record` unless one already exists for its id.
    /// Existing markers are never moved or resized. Returns whether a marker was added.
    pub fn upsert(&mut self, record: &DetectionRecord) -> bool {
        if self.index.contains_key(&record.cluster_id) {
            return false;
        }
        self.push(MapMarker::from_record(record));
        true
    }

    pub fn get(&self, id: &str) -> Option<&MapMarker> {
        self.index.get(id).map(|&slot| &self.markers[slot])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MapMarker> {
        self.markers.iter()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    fn push(&mut self, marker: MapMarker) {
        self.index.insert(marker.id.clone(), self.markers.len());
        self.markers.push(marker);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_load_keeps_one_marker_per_id_last_wins() {
        let mut store = MarkerStore::new();
        store.bulk_load(&[
            DetectionRecord::new("C1", 10, 18.0, 73.0, 1.0),
            DetectionRecord::new("C2", 20, 18.1, 73.1, 1.0),
            DetectionRecord::new("C1", 30, 18.2, 73.2, 1.0),
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("C1").unwrap().people_count, 30);
        let ids: Vec<_> = store.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["C1", "C2"]);
    }

    #[test]
    fn bulk_load_replaces_previous_markers() {
        let mut store = MarkerStore::new();
        store.upsert(&DetectionRecord::new("OLD", 1, 1.0, 1.0, 1.0));
        store.bulk_load(&[DetectionRecord::new("C1", 10, 18.0, 73.0, 1.0)]);
        assert!(!store.contains("OLD"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn upsert_never_overwrites() {
        let mut store = MarkerStore::new();
        assert!(store.upsert(&DetectionRecord::new("C3", 5, 18.5, 73.8, 1.0)));
        assert!(!store.upsert(&DetectionRecord::new("C3", 99, 10.0, 10.0, 1.0)));
        let marker = store.get("C3").unwrap();
        assert_eq!(marker.people_count, 5);
        assert_eq!(marker.position, GeoPoint::new(18.5, 73.8));
        assert_eq!(store.len(), 1);
    }
}
