use crate::ingest::coordinates::CoordinateValidator;
use crate::ingest::record::DetectionRecord;
use crate::prelude::{ReliefError, ReliefResult};
use crate::telemetry::{DiagnosticKind, LogManager};
use std::str::Lines;

/// Parser over a delimited detection batch.
///
/// Rows are `clusterId,peopleCount,latitude,longitude,distanceFromDepotKm`
/// after a single header row; blank rows are ignored everywhere. Parsing is
/// lazy, and every call to [`RecordParser::rows`] restarts from the top.
#[derive(Debug, Clone, Copy)]
pub struct RecordParser<'a> {
    text: &'a str,
}

impl<'a> RecordParser<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Every data row with its outcome, in file order.
    pub fn rows(&self) -> Rows<'a> {
        Rows {
            lines: self.text.lines(),
            header_seen: false,
        }
    }

    /// Accepted records only; each rejected row is reported to `logger`.
    pub fn records<'l>(&self, logger: &'l LogManager) -> Records<'a, 'l> {
        Records {
            rows: self.rows(),
            logger,
        }
    }
}

pub struct Rows<'a> {
    lines: Lines<'a>,
    header_seen: bool,
}

impl Iterator for Rows<'_> {
    type Item = ReliefResult<DetectionRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            if line.trim().is_empty() {
                continue;
            }
            if !self.header_seen {
                self.header_seen = true;
                continue;
            }
            return Some(parse_row(line));
        }
    }
}

pub struct Records<'a, 'l> {
    rows: Rows<'a>,
    logger: &'l LogManager,
}

impl Iterator for Records<'_, '_> {
    type Item = DetectionRecord;

    fn next(&mut self) -> Option<Self::Item> {
        for row in self.rows.by_ref() {
            match row {
                Ok(record) => return Some(record),
                Err(err) => self
                    .logger
                    .report(DiagnosticKind::MalformedRecord, &err.to_string()),
            }
        }
        None
    }
}

fn parse_row(line: &str) -> ReliefResult<DetectionRecord> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let field = |idx: usize| fields.get(idx).copied();
    let cluster_id = field(0).unwrap_or_default().to_string();

    let latitude = field(2).and_then(|raw| raw.parse::<f64>().ok());
    let longitude = field(3).and_then(|raw| raw.parse::<f64>().ok());
    let (latitude, longitude) = match (latitude, longitude) {
        (Some(lat), Some(lon)) => (lat, lon),
        (None, _) => return Err(malformed(cluster_id, "latitude")),
        (_, None) => return Err(malformed(cluster_id, "longitude")),
    };
    if !CoordinateValidator::is_valid(latitude, longitude) {
        return Err(malformed(cluster_id, "coordinates"));
    }

    Ok(DetectionRecord {
        people_count: parse_people(field(1)),
        distance_from_depot_km: parse_distance(field(4)),
        cluster_id,
        latitude,
        longitude,
    })
}

fn malformed(cluster_id: String, field: &'static str) -> ReliefError {
    ReliefError::MalformedRecord { cluster_id, field }
}

/// Whole counts; fractional counts truncate, anything else is zero.
fn parse_people(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return 0;
    };
    raw.parse::<u32>()
        .ok()
        .or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v.min(u32::MAX as f64) as u32)
        })
        .unwrap_or(0)
}

fn parse_distance(raw: Option<&str>) -> f64 {
    raw.and_then(|raw| raw.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}
