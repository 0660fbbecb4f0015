use thiserror::Error;

use crate::{types::NodeId, world::component::component_kind::ComponentKind};

/// Errors raised while applying received component messages to the mirror.
/// Each one drops only the message that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteWorldError {
    /// A message referenced a node that has not been mirrored
    #[error("Cannot {operation} on node {node} - node not mirrored")]
    NodeNotFound {
        node: NodeId,
        operation: &'static str,
    },

    /// A transform named a parent that has not been mirrored
    #[error("Parent {parent} of node {node} is not mirrored")]
    ParentNotFound { node: NodeId, parent: NodeId },

    /// The first transform update of a node did not carry every field
    #[error("First transform of node {node} is not a full snapshot")]
    IncompleteSnapshot { node: NodeId },

    /// An update arrived for a component that was never created
    #[error("Cannot update {kind} on node {node} - component not created")]
    ComponentNotCreated { node: NodeId, kind: ComponentKind },
}
