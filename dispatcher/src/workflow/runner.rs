use crate::workflow::config::DispatchConfig;
use floodcore::allocation::{rank_clusters, RankedCluster, RankingQuery};
use floodcore::dashboard::LoadOutcome;
use floodcore::ingest::{fetch_detached, DetectionSource, FileSource};
use floodcore::inventory::CsvInventoryStore;
use floodcore::math::{BatchSummary, StatsHelper};
use floodcore::{Clock, DashboardState};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::task::JoinHandle;

pub type SharedState = Arc<RwLock<DashboardState>>;

pub fn read_state(state: &SharedState) -> RwLockReadGuard<'_, DashboardState> {
    state.read().unwrap_or_else(PoisonError::into_inner)
}

pub fn write_state(state: &SharedState) -> RwLockWriteGuard<'_, DashboardState> {
    state.write().unwrap_or_else(PoisonError::into_inner)
}

pub struct OfflineReport {
    pub summary: BatchSummary,
    pub ranking: Vec<RankedCluster>,
}

/// Owns the shared dashboard and drives batch loads into it.
#[derive(Clone)]
pub struct Runner {
    config: DispatchConfig,
    state: SharedState,
}

impl Runner {
    pub fn new(config: DispatchConfig, clock: Arc<dyn Clock>) -> Self {
        let mut dashboard = DashboardState::new(config.to_options(), clock);
        if let Some(path) = &config.inventory_path {
            dashboard = dashboard.with_inventory_store(Arc::new(CsvInventoryStore::new(path)));
        }
        Self {
            config,
            state: Arc::new(RwLock::new(dashboard)),
        }
    }

    pub fn state(&self) -> SharedState {
        self.state.clone()
    }

    /// Fetches the configured batch off the caller's task and applies it.
    /// The lock is never held across the fetch.
    pub async fn load(&self) -> LoadOutcome {
        let source: Arc<dyn DetectionSource> =
            Arc::new(FileSource::new(&self.config.detections_path));
        self.load_from(source).await
    }

    pub async fn load_from(&self, source: Arc<dyn DetectionSource>) -> LoadOutcome {
        let ticket = write_state(&self.state).begin_load();
        log::debug!("fetching batch #{}", ticket.sequence());
        let fetched = fetch_detached(source).await;
        write_state(&self.state).complete_load(ticket, fetched)
    }

    /// Fire-and-forget variant of [`Runner::load`]; the outcome is only logged.
    pub fn spawn_load(&self) -> JoinHandle<()> {
        let runner = self.clone();
        tokio::spawn(async move {
            match runner.load().await {
                LoadOutcome::Applied { accepted, dropped } => {
                    log::info!("loaded {} clusters, dropped {}", accepted, dropped)
                }
                LoadOutcome::Stale => log::info!("batch superseded before it landed"),
                LoadOutcome::Failed(err) => log::error!("batch load failed: {}", err),
            }
        })
    }

    pub fn offline_report(&self, query: &RankingQuery) -> OfflineReport {
        let state = read_state(&self.state);
        OfflineReport {
            summary: StatsHelper::summarize(state.records()),
            ranking: rank_clusters(state.records(), query),
        }
    }
}
