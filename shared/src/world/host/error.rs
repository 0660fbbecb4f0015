use thiserror::Error;

/// Errors raised while tracking scene nodes for broadcast
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    /// Every node id of the session has been handed out
    #[error("Node ids exhausted after {issued} nodes; ids are never reused within a session")]
    NodeIdsExhausted { issued: usize },

    /// The node is not, or no longer, part of the scene
    #[error("Cannot track a node that is not in the scene")]
    NodeNotInScene,
}
