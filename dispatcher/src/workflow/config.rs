use anyhow::Context;
use floodcore::map::DEFAULT_DEPOT;
use floodcore::math::GeoPoint;
use floodcore::DashboardOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub detections_path: PathBuf,
    pub inventory_path: Option<PathBuf>,
    pub bind_address: SocketAddr,
    pub page_size: usize,
    pub preload_markers: bool,
    pub depot: GeoPoint,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            detections_path: PathBuf::from("data/drone_data.csv"),
            inventory_path: None,
            bind_address: SocketAddr::from(([127, 0, 0, 1], 5000)),
            page_size: 10,
            preload_markers: false,
            depot: DEFAULT_DEPOT,
        }
    }
}

impl DispatchConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading dispatch config {}", path_ref.display()))?;
        let config: DispatchConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing dispatch config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Command-line values win over the file.
    pub fn apply_overrides(
        &mut self,
        detections: Option<PathBuf>,
        inventory: Option<PathBuf>,
        bind: Option<SocketAddr>,
    ) {
        if let Some(path) = detections {
            self.detections_path = path;
        }
        if inventory.is_some() {
            self.inventory_path = inventory;
        }
        if let Some(addr) = bind {
            self.bind_address = addr;
        }
    }

    pub fn to_options(&self) -> DashboardOptions {
        DashboardOptions {
            page_size: self.page_size,
            preload_markers: self.preload_markers,
            depot: self.depot,
        }
    }
}
