use std::{default::Default, time::Duration};

use mirror_shared::{BroadcastConfig, ConnectionConfig};

/// Contains Config properties which will be used by the SceneSource
#[derive(Clone)]
pub struct SourceConfig {
    /// Used to configure the connections with observers
    pub connection: ConnectionConfig,
    /// Controls what the scene broadcaster sends
    pub broadcast: BroadcastConfig,
    /// How often a `Perf` report goes out to ready observers
    pub perf_report_interval: Duration,
    /// Collect diagnostic counters from startup, without waiting for an
    /// observer to ask for them
    pub force_performance_reporting: bool,
    /// Load every asset identity up front instead of one name group at a time
    pub force_load_all_assets: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            broadcast: BroadcastConfig::default(),
            perf_report_interval: Duration::from_secs(1),
            force_performance_reporting: false,
            force_load_all_assets: false,
        }
    }
}
