use std::{collections::BTreeSet, net::SocketAddr};

/// Classification of the live connections of one frame against the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionDelta {
    /// Connections live this frame that were not live last frame
    pub added: Vec<SocketAddr>,
    /// Connections live last frame that are gone this frame
    pub removed: Vec<SocketAddr>,
    /// Connections live in both frames
    pub continued: Vec<SocketAddr>,
}

impl ConnectionDelta {
    pub fn has_connections(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty() || !self.continued.is_empty()
    }

    /// Added and continued connections, in that order
    pub fn live(&self) -> impl Iterator<Item = &SocketAddr> {
        self.added.iter().chain(self.continued.iter())
    }
}

/// Remembers last frame's live set so each frame can be turned into a
/// [`ConnectionDelta`].
pub struct ConnectionDeltaTracker {
    previous: BTreeSet<SocketAddr>,
}

impl ConnectionDeltaTracker {
    pub fn new() -> Self {
        Self {
            previous: BTreeSet::new(),
        }
    }

    pub fn advance(&mut self, live: &BTreeSet<SocketAddr>) -> ConnectionDelta {
        let mut delta = ConnectionDelta::default();

        for address in live {
            if self.previous.contains(address) {
                delta.continued.push(*address);
            } else {
                delta.added.push(*address);
            }
        }
        for address in &self.previous {
            if !live.contains(address) {
                delta.removed.push(*address);
            }
        }

        self.previous = live.clone();
        delta
    }
}

impl Default for ConnectionDeltaTracker {
    fn default() -> Self {
        Self::new()
    }
}
