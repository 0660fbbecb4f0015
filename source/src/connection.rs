use std::{net::SocketAddr, time::Duration};

use mirror_shared::Instant;

/// Source-side record of one observer connection.
pub struct Connection {
    pub address: SocketAddr,
    ready: bool,
    connected_at: Instant,
    last_update: Instant,
    reported_dead: bool,
}

impl Connection {
    pub fn new(address: SocketAddr, now: &Instant) -> Self {
        Self {
            address,
            ready: false,
            connected_at: *now,
            last_update: *now,
            reported_dead: false,
        }
    }

    /// Ready connections have their assets in place and take part in scene replication
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Returns true if the connection was not ready before
    pub(crate) fn mark_ready(&mut self) -> bool {
        let was_ready = self.ready;
        self.ready = true;
        !was_ready
    }

    /// Takes the connection out of replication while it negotiates assets
    /// again. Returns true if it was ready.
    pub(crate) fn mark_not_ready(&mut self) -> bool {
        std::mem::replace(&mut self.ready, false)
    }

    pub(crate) fn mark_received(&mut self, now: &Instant) {
        self.last_update = *now;
    }

    pub fn connected_for(&self, now: &Instant) -> Duration {
        self.connected_at.elapsed(now)
    }

    pub fn time_since_last_update(&self, now: &Instant) -> Duration {
        self.last_update.elapsed(now)
    }

    pub fn is_alive(&self, now: &Instant, timeout: Duration) -> bool {
        self.time_since_last_update(now) <= timeout
    }

    /// Returns true the first time the connection is found dead since it was last alive
    pub(crate) fn check_liveness(&mut self, now: &Instant, timeout: Duration) -> bool {
        if self.is_alive(now, timeout) {
            self.reported_dead = false;
            return false;
        }
        let first_report = !self.reported_dead;
        self.reported_dead = true;
        first_report
    }
}
