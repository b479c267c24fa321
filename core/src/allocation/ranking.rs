//! Server-side cluster ranking.
//!
//! Clusters passing the query filter are scored by
//! `people / max_people - distance / max_distance`, both maxima taken over the
//! filtered set, and the best [`TOP_CLUSTERS`] are returned with a flat
//! per-person supply estimate.

use crate::ingest::DetectionRecord;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_PEOPLE: u32 = 0;
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 100.0;
pub const TOP_CLUSTERS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingQuery {
    pub min_people: u32,
    pub max_distance_km: f64,
}

impl Default for RankingQuery {
    fn default() -> Self {
        Self {
            min_people: DEFAULT_MIN_PEOPLE,
            max_distance_km: DEFAULT_MAX_DISTANCE_KM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedResources {
    #[serde(rename = "Medical Kits")]
    pub medical_kits: u64,
    #[serde(rename = "Food Packets")]
    pub food_packets: u64,
    #[serde(rename = "Water Bottles")]
    pub water_bottles: u64,
    #[serde(rename = "Blankets")]
    pub blankets: u64,
    #[serde(rename = "Emergency Kits")]
    pub emergency_kits: u64,
}

impl RecommendedResources {
    pub fn for_people(people: u32) -> Self {
        let people = u64::from(people);
        Self {
            medical_kits: people / 5,
            food_packets: people,
            water_bottles: people * 3,
            blankets: people,
            emergency_kits: people / 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCluster {
    #[serde(rename = "Cluster_ID")]
    pub cluster_id: String,
    #[serde(rename = "No_of_People")]
    pub people_count: u32,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "Distance_from_Inventory_km")]
    pub distance_from_depot_km: f64,
    pub priority_score: f64,
    pub recommended_resources: RecommendedResources,
}

pub fn rank_clusters(records: &[DetectionRecord], query: &RankingQuery) -> Vec<RankedCluster> {
    let filtered: Vec<&DetectionRecord> = records
        .iter()
        .filter(|r| r.people_count >= query.min_people)
        .filter(|r| r.distance_from_depot_km <= query.max_distance_km)
        .collect();

    let max_people = filtered.iter().map(|r| r.people_count).max().unwrap_or(0);
    let max_distance = filtered
        .iter()
        .map(|r| r.distance_from_depot_km)
        .fold(0.0, f64::max);

    let mut ranked: Vec<RankedCluster> = filtered
        .into_iter()
        .map(|record| RankedCluster {
            cluster_id: record.cluster_id.clone(),
            people_count: record.people_count,
            latitude: record.latitude,
            longitude: record.longitude,
            distance_from_depot_km: record.distance_from_depot_km,
            priority_score: share(f64::from(record.people_count), f64::from(max_people))
                - share(record.distance_from_depot_km, max_distance),
            recommended_resources: RecommendedResources::for_people(record.people_count),
        })
        .collect();

    ranked.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));
    ranked.truncate(TOP_CLUSTERS);
    ranked
}

fn share(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        value / max
    } else {
        0.0
    }
}
