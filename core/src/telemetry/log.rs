use log::{error, info, warn};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

const RETAINED_DIAGNOSTICS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    Info,
    MalformedRecord,
    InvalidLocateTarget,
    IngestionFailure,
    StaleIngestion,
    PersistenceFailure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Diagnostic channel: forwards to the `log` facade and keeps the most recent entries.
///
/// Clones share the same buffer, so a logger handed to a detached task reports
/// into the dashboard that spawned it.
#[derive(Clone, Default)]
pub struct LogManager {
    recent: Arc<Mutex<VecDeque<Diagnostic>>>,
}

impl LogManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
        self.retain(DiagnosticKind::Info, message);
    }

    pub fn report(&self, kind: DiagnosticKind, message: &str) {
        match kind {
            DiagnosticKind::Info => info!("{}", message),
            DiagnosticKind::MalformedRecord
            | DiagnosticKind::InvalidLocateTarget
            | DiagnosticKind::StaleIngestion => warn!("{}", message),
            DiagnosticKind::IngestionFailure | DiagnosticKind::PersistenceFailure => {
                error!("{}", message)
            }
        }
        self.retain(kind, message);
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self.recent.lock() {
            Ok(recent) => recent.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics().iter().filter(|d| d.kind == kind).count()
    }

    fn retain(&self, kind: DiagnosticKind, message: &str) {
        if let Ok(mut recent) = self.recent.lock() {
            if recent.len() == RETAINED_DIAGNOSTICS {
                recent.pop_front();
            }
            recent.push_back(Diagnostic {
                kind,
                message: message.to_string(),
            });
        }
    }
}
