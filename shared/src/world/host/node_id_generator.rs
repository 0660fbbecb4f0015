use std::collections::BTreeSet;

use log::warn;

use super::error::BroadcastError;
use crate::types::NodeId;

/// Hands out node ids in increasing order. An id is never handed out twice,
/// so a parent's id is always lower than the id of any child tracked after it.
pub struct NodeIdGenerator {
    next: u16,
    live: BTreeSet<NodeId>,
}

impl NodeIdGenerator {
    pub fn new() -> Self {
        Self {
            next: 0,
            live: BTreeSet::new(),
        }
    }

    pub fn generate(&mut self) -> Result<NodeId, BroadcastError> {
        let Ok(value) = i16::try_from(self.next) else {
            return Err(BroadcastError::NodeIdsExhausted {
                issued: usize::from(self.next),
            });
        };
        self.next += 1;
        let id = NodeId::new(value);
        self.live.insert(id);
        Ok(id)
    }

    /// Returns false if `id` was not live
    pub fn release(&mut self, id: NodeId) -> bool {
        let released = self.live.remove(&id);
        if !released {
            warn!("Node id {} released twice", id);
        }
        released
    }

    pub fn is_live(&self, id: &NodeId) -> bool {
        self.live.contains(id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl Default for NodeIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
