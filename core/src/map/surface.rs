use crate::math::GeoPoint;
use serde::Serialize;

/// Supply depot and fixed base-station marker.
pub const DEFAULT_DEPOT: GeoPoint = GeoPoint::new(18.5204, 73.8567);

/// The map widget as seen by the selection logic.
pub trait MapSurface {
    /// Smoothly re-centres the view on `position`, keyed by the active marker.
    fn fly_to(&mut self, marker_id: &str, position: GeoPoint);
    /// Brings the map panel into view.
    fn scroll_into_view(&mut self);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ViewCommand {
    FlyTo { marker_id: String, position: GeoPoint },
    ScrollIntoView,
}

/// Surface that queues commands for the presentation layer to drain. A new
/// fly-to supersedes anything not yet delivered, so at most one locate's
/// commands are ever pending.
#[derive(Debug, Clone, Default)]
pub struct ViewQueue {
    pending: Vec<ViewCommand>,
}

impl ViewQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[ViewCommand] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<ViewCommand> {
        std::mem::take(&mut self.pending)
    }
}

impl MapSurface for ViewQueue {
    fn fly_to(&mut self, marker_id: &str, position: GeoPoint) {
        self.pending.clear();
        self.pending.push(ViewCommand::FlyTo {
            marker_id: marker_id.to_string(),
            position,
        });
    }

    fn scroll_into_view(&mut self) {
        self.pending.push(ViewCommand::ScrollIntoView);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_queue() {
        let mut queue = ViewQueue::new();
        queue.fly_to("C1", DEFAULT_DEPOT);
        queue.scroll_into_view();
        assert_eq!(queue.drain().len(), 2);
        assert!(queue.pending().is_empty());
    }

    #[test]
    fn fly_to_supersedes_undelivered_commands() {
        let mut queue = ViewQueue::new();
        for _ in 0..1000 {
            queue.fly_to("C1", DEFAULT_DEPOT);
            queue.scroll_into_view();
        }
        queue.fly_to("C2", GeoPoint::new(1.0, 2.0));
        queue.scroll_into_view();
        assert_eq!(
            queue.pending(),
            &[
                ViewCommand::FlyTo {
                    marker_id: "C2".into(),
                    position: GeoPoint::new(1.0, 2.0),
                },
                ViewCommand::ScrollIntoView,
            ]
        );
    }
}
