use crate::allocation::{AllocationRecommendation, DetectionSnapshot};
use crate::dashboard::timeline::TimelineEvent;
use crate::ingest::DetectionRecord;
use crate::inventory::InventoryItem;
use crate::map::{MapMarker, SelectionState, ViewCommand};
use crate::math::GeoPoint;
use crate::telemetry::{Diagnostic, MetricsSnapshot};
use serde::Serialize;

/// Everything the presentation layer renders, captured at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardModel {
    pub inventory: Vec<InventoryItem>,
    pub recommendation: Option<AllocationRecommendation>,
    pub snapshot: Option<DetectionSnapshot>,
    pub selection: SelectionState,
    pub active_marker_id: Option<String>,
    pub markers: Vec<MapMarker>,
    pub base_station: GeoPoint,
    pub rows: Vec<DetectionRecord>,
    pub total_rows: usize,
    pub has_more: bool,
    pub loading: bool,
    pub timeline: Vec<TimelineEvent>,
    pub view_commands: Vec<ViewCommand>,
    pub diagnostics: Vec<Diagnostic>,
    pub metrics: MetricsSnapshot,
}
