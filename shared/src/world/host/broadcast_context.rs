use super::sync_outbox::SyncOutbox;
use crate::{
    asset::{AssetCaches, AssetProvider},
    perf::PerfMonitor,
};

/// Session-owned services the broadcasters need during a frame.
pub struct BroadcastContext<'a> {
    pub perf: &'a mut PerfMonitor,
    pub assets: &'a mut AssetCaches,
    pub provider: &'a dyn AssetProvider,
    pub outbox: &'a mut SyncOutbox,
}
