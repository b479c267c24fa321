use crate::allocation::DetectionSnapshot;
use crate::ingest::{CoordinateValidator, DetectionRecord};
use crate::map::markers::MarkerStore;
use crate::map::surface::MapSurface;
use crate::prelude::{ReliefError, ReliefResult};
use crate::telemetry::{DiagnosticKind, LogManager};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "marker_id")]
pub enum SelectionState {
    Idle,
    Focused(String),
}

/// Owns the single active cluster and keeps markers, view and detail panel in step with it.
///
/// Once any locate succeeds the controller stays `Focused`; there is no
/// transition back to `Idle`.
pub struct SelectionController {
    state: SelectionState,
    markers: MarkerStore,
    snapshot: Option<DetectionSnapshot>,
    logger: LogManager,
}

impl SelectionController {
    pub fn new(logger: LogManager) -> Self {
        Self {
            state: SelectionState::Idle,
            markers: MarkerStore::new(),
            snapshot: None,
            logger,
        }
    }

    /// Focuses `record`: ensures its marker, activates it, re-centres and
    /// reveals the map, then replaces the detail snapshot, in that order.
    ///
    /// Records outside geographic bounds are rejected and leave every piece of state untouched.
    pub fn locate(
        &mut self,
        record: &DetectionRecord,
        surface: &mut dyn MapSurface,
        at: DateTime<Utc>,
    ) -> ReliefResult<&DetectionSnapshot> {
        if !CoordinateValidator::is_valid(record.latitude, record.longitude) {
            let err = ReliefError::InvalidLocateTarget {
                cluster_id: record.cluster_id.clone(),
                latitude: record.latitude,
                longitude: record.longitude,
            };
            self.logger
                .report(DiagnosticKind::InvalidLocateTarget, &err.to_string());
            return Err(err);
        }

        self.markers.upsert(record);
        self.state = SelectionState::Focused(record.cluster_id.clone());

        let position = self
            .markers
            .get(&record.cluster_id)
            .map(|marker| marker.position)
            .unwrap_or_else(|| record.position());
        surface.fly_to(&record.cluster_id, position);
        surface.scroll_into_view();

        Ok(self
            .snapshot
            .insert(DetectionSnapshot::from_record(record, at)))
    }

    pub fn load_markers(&mut self, records: &[DetectionRecord]) {
        self.markers.bulk_load(records);
    }

    pub fn active_marker_id(&self) -> Option<&str> {
        match &self.state {
            SelectionState::Idle => None,
            SelectionState::Focused(id) => Some(id),
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn markers(&self) -> &MarkerStore {
        &self.markers
    }

    pub fn snapshot(&self) -> Option<&DetectionSnapshot> {
        self.snapshot.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::surface::{ViewCommand, ViewQueue};
    use crate::math::GeoPoint;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 14, 14, 34, 0).unwrap()
    }

    #[test]
    fn starts_idle() {
        let controller = SelectionController::new(LogManager::new());
        assert_eq!(controller.state(), &SelectionState::Idle);
        assert!(controller.active_marker_id().is_none());
        assert!(controller.snapshot().is_none());
    }

    #[test]
    fn relocating_same_cluster_is_idempotent_on_markers() {
        let mut controller = SelectionController::new(LogManager::new());
        let mut view = ViewQueue::new();
        let record = DetectionRecord::new("C3", 5, 18.5, 73.8, 0.0);

        controller.locate(&record, &mut view, at()).unwrap();
        let first = controller.markers().get("C3").cloned();
        controller.locate(&record, &mut view, at()).unwrap();

        assert_eq!(controller.markers().len(), 1);
        assert_eq!(controller.markers().get("C3").cloned(), first);
        assert_eq!(controller.active_marker_id(), Some("C3"));

        let fly_tos = view
            .pending()
            .iter()
            .filter(|c| matches!(c, ViewCommand::FlyTo { .. }))
            .count();
        assert_eq!(fly_tos, 1);
        assert_eq!(view.pending().len(), 2);
    }

    #[test]
    fn side_effects_run_in_order() {
        let mut controller = SelectionController::new(LogManager::new());
        let mut view = ViewQueue::new();
        let record = DetectionRecord::new("C1", 120, 18.52, 73.85, 5.5);
        let snapshot = controller.locate(&record, &mut view, at()).unwrap();
        assert_eq!(snapshot.total_people, 120);
        assert_eq!(
            view.pending(),
            &[
                ViewCommand::FlyTo {
                    marker_id: "C1".into(),
                    position: GeoPoint::new(18.52, 73.85),
                },
                ViewCommand::ScrollIntoView,
            ]
        );
    }

    #[test]
    fn centres_on_existing_marker_position() {
        let mut controller = SelectionController::new(LogManager::new());
        let mut view = ViewQueue::new();
        controller.load_markers(&[DetectionRecord::new("C1", 10, 10.0, 20.0, 1.0)]);
        let moved = DetectionRecord::new("C1", 10, 11.0, 21.0, 1.0);
        controller.locate(&moved, &mut view, at()).unwrap();
        assert_eq!(
            view.pending()[0],
            ViewCommand::FlyTo {
                marker_id: "C1".into(),
                position: GeoPoint::new(10.0, 20.0),
            }
        );
    }

    #[test]
    fn invalid_target_leaves_state_unchanged() {
        let logger = LogManager::new();
        let mut controller = SelectionController::new(logger.clone());
        let mut view = ViewQueue::new();
        controller
            .locate(&DetectionRecord::new("C1", 10, 18.0, 73.0, 1.0), &mut view, at())
            .unwrap();
        view.drain();

        let bad = DetectionRecord::new("C2", 10, 200.0, 73.85, 1.0);
        let err = controller.locate(&bad, &mut view, at()).unwrap_err();
        assert!(matches!(err, ReliefError::InvalidLocateTarget { .. }));
        assert_eq!(controller.active_marker_id(), Some("C1"));
        assert!(!controller.markers().contains("C2"));
        assert!(view.pending().is_empty());
        assert_eq!(controller.snapshot().unwrap().location, "Cluster C1");

        let diagnostics = logger.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("C2"));
    }

    #[test]
    fn active_marker_tracks_last_successful_locate() {
        let mut controller = SelectionController::new(LogManager::new());
        let mut view = ViewQueue::new();
        let sequence = [
            DetectionRecord::new("A", 1, 1.0, 1.0, 1.0),
            DetectionRecord::new("B", 1, 2.0, 2.0, 1.0),
            DetectionRecord::new("X", 1, f64::NAN, 2.0, 1.0),
            DetectionRecord::new("A", 1, 1.0, 1.0, 1.0),
            DetectionRecord::new("Y", 1, 1.0, 999.0, 1.0),
        ];
        let mut expected = None;
        for record in &sequence {
            if controller.locate(record, &mut view, at()).is_ok() {
                expected = Some(record.cluster_id.clone());
            }
            assert_eq!(controller.active_marker_id(), expected.as_deref());
        }
        assert_eq!(controller.markers().len(), 2);
    }
}
