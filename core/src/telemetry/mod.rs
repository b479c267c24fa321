pub mod log;
pub mod metrics;

pub use log::{Diagnostic, DiagnosticKind, LogManager};
pub use metrics::{MetricsRecorder, MetricsSnapshot};
