//! Decoding helpers for asserting on the traffic an observer received

use mirror_shared::{
    ChangeFlags, ComponentMessage, ComponentUpdate, NodeId, ReplicatedComponent, SyncMessage,
    TransformChangeFlags, TransformState,
};

/// Every component message of `syncs`, flattened in delivery order
pub fn component_messages(syncs: &[SyncMessage]) -> Vec<ComponentMessage> {
    syncs
        .iter()
        .flat_map(|sync| sync.components.iter().cloned())
        .collect()
}

/// Flags of every transform update for `node`, in delivery order
pub fn transform_flags(messages: &[ComponentMessage], node: NodeId) -> Vec<TransformChangeFlags> {
    messages
        .iter()
        .filter_map(|message| match message {
            ComponentMessage::Updated {
                node: target,
                update: ComponentUpdate::Transform(flags, _),
            } if *target == node => Some(*flags),
            _ => None,
        })
        .collect()
}

/// Whether `flags` describe a full transform snapshot
pub fn is_full_transform(flags: TransformChangeFlags) -> bool {
    flags.contains(TransformState::default().full_flags())
}

/// Index of the first message about `node`, if any
pub fn first_message_index(messages: &[ComponentMessage], node: NodeId) -> Option<usize> {
    messages.iter().position(|message| message.node() == node)
}
