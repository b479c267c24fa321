use crate::prelude::clock_text;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;

const TIMELINE_CAPACITY: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEvent {
    pub id: u64,
    pub time: String,
    pub description: String,
}

/// Activity feed shown under the map, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    events: VecDeque<TimelineEvent>,
    next_id: u64,
}

impl Timeline {
    pub fn push(&mut self, at: DateTime<Utc>, description: impl Into<String>) {
        self.next_id += 1;
        self.events.push_back(TimelineEvent {
            id: self.next_id,
            time: clock_text(at),
            description: description.into(),
        });
        if self.events.len() > TIMELINE_CAPACITY {
            self.events.pop_front();
        }
    }

    pub fn events(&self) -> Vec<TimelineEvent> {
        self.events.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
