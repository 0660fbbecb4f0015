use std::{collections::BTreeSet, net::SocketAddr};

use crate::connection::connection_delta::ConnectionDelta;

/// Which live connections one component instance must send what to this frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointClassification {
    /// Eligible connections that have not yet received a full snapshot
    pub needing_full: Vec<SocketAddr>,
    /// Eligible connections that hold a full snapshot and only need changes
    pub needing_delta: Vec<SocketAddr>,
}

impl EndpointClassification {
    pub fn is_empty(&self) -> bool {
        self.needing_full.is_empty() && self.needing_delta.is_empty()
    }
}

/// Tracks, per component instance, which connections hold its full state.
#[derive(Default)]
pub struct EndpointClassifier {
    fully_initialized: BTreeSet<SocketAddr>,
    cached: Option<EndpointClassification>,
}

impl EndpointClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset_frame(&mut self) {
        self.cached = None;
    }

    /// Classifies the frame's connections, returning the classification and
    /// whether it came from this frame's cache.
    ///
    /// Connections rejected by `eligible` are left out; if they held the full
    /// state they lose it, and get a full snapshot once eligible again.
    pub fn classify(
        &mut self,
        delta: &ConnectionDelta,
        eligible: impl Fn(&SocketAddr) -> bool,
    ) -> (EndpointClassification, bool) {
        if let Some(cached) = &self.cached {
            return (cached.clone(), true);
        }

        for address in &delta.removed {
            self.fully_initialized.remove(address);
        }

        let mut classification = EndpointClassification::default();
        for address in &delta.added {
            self.fully_initialized.remove(address);
            if eligible(address) {
                classification.needing_full.push(*address);
            }
        }
        for address in &delta.continued {
            if !eligible(address) {
                self.fully_initialized.remove(address);
                continue;
            }
            if self.fully_initialized.contains(address) {
                classification.needing_delta.push(*address);
            } else {
                classification.needing_full.push(*address);
            }
        }

        self.cached = Some(classification.clone());
        (classification, false)
    }

    /// Applies a frame's arrivals and departures without classifying anything.
    /// Either way the connection needs a full snapshot next time it is eligible.
    pub fn forget(&mut self, delta: &ConnectionDelta) {
        for address in delta.removed.iter().chain(delta.added.iter()) {
            self.fully_initialized.remove(address);
        }
    }

    /// Records that `address` received a full snapshot
    pub fn mark_initialized(&mut self, address: SocketAddr) {
        self.fully_initialized.insert(address);
    }

    pub fn is_initialized(&self, address: &SocketAddr) -> bool {
        self.fully_initialized.contains(address)
    }
}
