use crate::inventory::item::StockChange;
use crate::inventory::store::InventoryStore;
use crate::telemetry::{DiagnosticKind, LogManager, MetricsRecorder};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Writes one stock change through `store`. Failures are logged and counted, never returned;
/// the in-memory inventory keeps the change either way.
pub fn persist_change(
    store: &dyn InventoryStore,
    change: &StockChange,
    logger: &LogManager,
    metrics: &MetricsRecorder,
) {
    let delta = change.persisted_delta();
    if delta == 0 {
        return;
    }
    match store.apply_delta(&change.item, delta) {
        Ok(0) => logger.record(&format!("no stored inventory row named {}", change.item)),
        Ok(rows) => logger.record(&format!(
            "persisted +{} {} ({} row(s))",
            delta, change.item, rows
        )),
        Err(err) => {
            metrics.record_persistence_failure();
            logger.report(
                DiagnosticKind::PersistenceFailure,
                &format!("updating inventory for {}: {}", change.item, err),
            );
        }
    }
}

/// Runs [`persist_change`] on tokio's blocking pool. Outside a runtime the write
/// happens inline and `None` is returned.
pub fn spawn_persist(
    store: Arc<dyn InventoryStore>,
    change: StockChange,
    logger: LogManager,
    metrics: Arc<MetricsRecorder>,
) -> Option<JoinHandle<()>> {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => Some(handle.spawn_blocking(move || {
            persist_change(store.as_ref(), &change, &logger, &metrics)
        })),
        Err(_) => {
            persist_change(store.as_ref(), &change, &logger, &metrics);
            None
        }
    }
}
