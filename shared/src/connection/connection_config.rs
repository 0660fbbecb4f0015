use std::{default::Default, time::Duration};

/// Contains Config properties which will be used by a source or observer
/// to manage its connections
#[derive(Clone, Debug)]
pub struct ConnectionConfig {
    /// Interval at which an observer sends a heartbeat while connected, so the
    /// source can tell an idle observer apart from a dead one
    pub heartbeat_interval: Duration,
    /// A connection that has not sent anything for longer than this is
    /// reported as no longer alive
    pub disconnection_timeout_duration: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_millis(100),
            disconnection_timeout_duration: Duration::from_secs(10),
        }
    }
}
