//! Orchestration of the dashboard's mutable state.
//!
//! [`DashboardState`] is the single owner of everything the views show. The
//! presentation layer drives it through two row actions, `on_recommend` and
//! `on_locate`, plus inventory and batch-loading entry points. Persistence and
//! ingestion are the only asynchronous edges; their failures are logged and
//! never block the caller.

pub mod model;
pub mod timeline;

pub use model::DashboardModel;
pub use timeline::{Timeline, TimelineEvent};

use crate::allocation::{AllocationEngine, AllocationRecommendation, DetectionSnapshot};
use crate::ingest::table::DEFAULT_PAGE_SIZE;
use crate::ingest::{DetectionRecord, DetectionTable, RecordParser};
use crate::inventory::{default_inventory, spawn_persist, InventoryItem, InventoryStore, StockChange};
use crate::map::{MapMarker, SelectionController, ViewQueue, DEFAULT_DEPOT};
use crate::math::GeoPoint;
use crate::prelude::{Clock, ReliefError, ReliefResult};
use crate::telemetry::{DiagnosticKind, LogManager, MetricsRecorder};
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardOptions {
    pub page_size: usize,
    /// Build every marker when a batch loads instead of on first locate.
    pub preload_markers: bool,
    pub depot: GeoPoint,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            preload_markers: false,
            depot: DEFAULT_DEPOT,
        }
    }
}

/// Sequence number handed out when a batch load starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Applied { accepted: usize, dropped: usize },
    /// A newer batch was already applied.
    Stale,
    Failed(ReliefError),
}

pub struct DashboardState {
    options: DashboardOptions,
    inventory: Vec<InventoryItem>,
    recommendation: Option<AllocationRecommendation>,
    table: DetectionTable,
    selection: SelectionController,
    view: ViewQueue,
    timeline: Timeline,
    loading: bool,
    issued: u64,
    applied: u64,
    clock: Arc<dyn Clock>,
    store: Option<Arc<dyn InventoryStore>>,
    logger: LogManager,
    metrics: Arc<MetricsRecorder>,
}

impl DashboardState {
    pub fn new(options: DashboardOptions, clock: Arc<dyn Clock>) -> Self {
        let logger = LogManager::new();
        Self {
            options,
            inventory: default_inventory(),
            recommendation: None,
            table: DetectionTable::new(options.page_size),
            selection: SelectionController::new(logger.clone()),
            view: ViewQueue::new(),
            timeline: Timeline::default(),
            loading: false,
            issued: 0,
            applied: 0,
            clock,
            store: None,
            logger,
            metrics: Arc::new(MetricsRecorder::new()),
        }
    }

    pub fn with_inventory_store(mut self, store: Arc<dyn InventoryStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replaces the live recommendation with one computed for `record`.
    pub fn on_recommend(&mut self, record: &DetectionRecord) -> &AllocationRecommendation {
        let recommendation = AllocationEngine::recommend(record, self.clock.as_ref());
        self.metrics.record_recommendation();
        self.timeline.push(
            self.clock.now(),
            format!(
                "{:?} allocation recommended for cluster {}",
                recommendation.priority, record.cluster_id
            ),
        );
        self.recommendation.insert(recommendation)
    }

    /// Focuses the map and detail panel on `record`.
    pub fn on_locate(&mut self, record: &DetectionRecord) -> ReliefResult<&DetectionSnapshot> {
        let at = self.clock.now();
        match self.selection.locate(record, &mut self.view, at) {
            Ok(snapshot) => {
                self.metrics.record_locate();
                self.timeline
                    .push(at, format!("Located cluster {}", record.cluster_id));
                Ok(snapshot)
            }
            Err(err) => {
                self.metrics.record_locate_rejected();
                Err(err)
            }
        }
    }

    /// Adds stock to the item named `item_name`, clamped at its capacity.
    /// Unknown names leave the in-memory inventory untouched.
    pub fn add_stock(&mut self, item_name: &str, quantity: u32) -> StockChange {
        let mut change = StockChange {
            item: item_name.to_string(),
            requested: quantity,
            applied: None,
            current: None,
        };
        if let Some(item) = self.inventory.iter_mut().find(|i| i.name == item_name) {
            let applied = item.add(quantity);
            if applied < quantity {
                self.logger.record(&format!(
                    "{} capped at capacity {}: added {} of {}",
                    item.name, item.capacity, applied, quantity
                ));
            }
            change.applied = Some(applied);
            change.current = Some(item.current_quantity);
        }
        if let Some(applied) = change.applied.filter(|&a| a > 0) {
            self.timeline
                .push(self.clock.now(), format!("Added {} {}", applied, item_name));
        }
        change
    }

    /// [`add_stock`](Self::add_stock) followed by a detached write to the inventory store.
    pub fn add_stock_and_persist(
        &mut self,
        item_name: &str,
        quantity: u32,
    ) -> (StockChange, Option<JoinHandle<()>>) {
        let change = self.add_stock(item_name, quantity);
        let handle = self.store.as_ref().and_then(|store| {
            spawn_persist(
                store.clone(),
                change.clone(),
                self.logger.clone(),
                self.metrics.clone(),
            )
        });
        (change, handle)
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        self.loading = true;
        LoadTicket(self.issued)
    }

    /// Applies a fetched batch unless a newer one already landed. Malformed
    /// rows are dropped and reported; a failed fetch keeps the current batch.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        fetched: ReliefResult<String>,
    ) -> LoadOutcome {
        if ticket.0 == self.issued {
            self.loading = false;
        }
        if ticket.0 <= self.applied {
            self.logger.report(
                DiagnosticKind::StaleIngestion,
                &format!(
                    "discarding batch #{}: batch #{} already applied",
                    ticket.0, self.applied
                ),
            );
            return LoadOutcome::Stale;
        }

        let text = match fetched {
            Ok(text) => text,
            Err(err) => {
                self.logger.report(
                    DiagnosticKind::IngestionFailure,
                    &format!("loading batch #{}: {}", ticket.0, err),
                );
                return LoadOutcome::Failed(err);
            }
        };

        let mut accepted = Vec::new();
        let mut dropped = 0;
        for row in RecordParser::new(&text).rows() {
            match row {
                Ok(record) => accepted.push(record),
                Err(err) => {
                    dropped += 1;
                    self.metrics.record_dropped();
                    self.logger
                        .report(DiagnosticKind::MalformedRecord, &err.to_string());
                }
            }
        }
        self.metrics.record_accepted(accepted.len());

        let count = accepted.len();
        if self.options.preload_markers {
            self.selection.load_markers(&accepted);
        }
        self.table.replace(accepted);
        self.applied = ticket.0;
        self.timeline.push(
            self.clock.now(),
            format!("Loaded {} clusters ({} dropped)", count, dropped),
        );
        LoadOutcome::Applied {
            accepted: count,
            dropped,
        }
    }

    pub fn show_more(&mut self) {
        self.table.show_more();
    }

    pub fn record(&self, cluster_id: &str) -> Option<&DetectionRecord> {
        self.table.find(cluster_id)
    }

    pub fn records(&self) -> &[DetectionRecord] {
        self.table.records()
    }

    pub fn table(&self) -> &DetectionTable {
        &self.table
    }

    pub fn inventory(&self) -> &[InventoryItem] {
        &self.inventory
    }

    pub fn recommendation(&self) -> Option<&AllocationRecommendation> {
        self.recommendation.as_ref()
    }

    pub fn snapshot(&self) -> Option<&DetectionSnapshot> {
        self.selection.snapshot()
    }

    pub fn active_marker_id(&self) -> Option<&str> {
        self.selection.active_marker_id()
    }

    pub fn markers(&self) -> impl Iterator<Item = &MapMarker> {
        self.selection.markers().iter()
    }

    pub fn marker_count(&self) -> usize {
        self.selection.markers().len()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn logger(&self) -> &LogManager {
        &self.logger
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    pub fn model(&self) -> DashboardModel {
        DashboardModel {
            inventory: self.inventory.clone(),
            recommendation: self.recommendation.clone(),
            snapshot: self.selection.snapshot().cloned(),
            selection: self.selection.state().clone(),
            active_marker_id: self.active_marker_id().map(str::to_string),
            markers: self.markers().cloned().collect(),
            base_station: self.options.depot,
            rows: self.table.visible().to_vec(),
            total_rows: self.table.len(),
            has_more: self.table.has_more(),
            loading: self.loading,
            timeline: self.timeline.events(),
            view_commands: self.view.pending().to_vec(),
            diagnostics: self.logger.diagnostics(),
            metrics: self.metrics.snapshot(),
        }
    }

    /// Like [`DashboardState::model`], but hands the pending view commands over
    /// to the caller so each one is delivered once.
    pub fn take_model(&mut self) -> DashboardModel {
        let mut model = self.model();
        model.view_commands = self.view.drain();
        model
    }
}
