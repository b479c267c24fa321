use chrono::{DateTime, Utc};

/// Common error type for the dispatch pipeline.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ReliefError {
    #[error("malformed record for cluster {cluster_id}: invalid {field}")]
    MalformedRecord {
        cluster_id: String,
        field: &'static str,
    },
    #[error("invalid locate target {cluster_id}: ({latitude}, {longitude}) is out of range")]
    InvalidLocateTarget {
        cluster_id: String,
        latitude: f64,
        longitude: f64,
    },
    #[error("ingestion failure: {0}")]
    IngestionFailure(String),
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
    #[error("remote api failure: {0}")]
    RemoteApiFailure(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type ReliefResult<T> = Result<T, ReliefError>;

/// Wall-clock source, injected so recommendation and snapshot timestamps are testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Renders the short wall-clock form used on the detail panel and timeline ("2:34 PM").
pub fn clock_text(at: DateTime<Utc>) -> String {
    at.format("%-I:%M %p").to_string()
}
