/// How often a node is inspected for components being added or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollingFrequency {
    /// Use the nearest ancestor's setting, or the configured default at the root
    #[default]
    InheritFromParent,
    /// Inspect once, then again only while changes keep being found or after
    /// the host reports a change
    UpdateOnceOnStart,
    UpdateContinuously,
}

/// Per-node tuning set by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PerformanceParameters {
    pub component_polling: PollingFrequency,
}

/// Contains Config properties which control what the scene broadcaster sends
#[derive(Clone, Debug)]
pub struct BroadcastConfig {
    /// Track every scene root while at least one connection is live. When false
    /// only nodes tracked explicitly (and their children) are mirrored.
    pub broadcast_all_nodes: bool,
    /// Polling used where a node and all its ancestors inherit
    pub default_component_polling: PollingFrequency,
    /// Frames a queued component creation is retried before it is dropped.
    /// `None` retries until the connection becomes eligible or goes away.
    pub max_creation_retries: Option<u32>,
    /// Float fields closer than this to their last sent value count as unchanged
    pub change_epsilon: f32,
    /// Mirror the property values of mesh renderer materials, not only which
    /// materials are assigned
    pub synchronize_material_properties: bool,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            broadcast_all_nodes: true,
            default_component_polling: PollingFrequency::UpdateContinuously,
            max_creation_retries: None,
            change_epsilon: 0.0,
            synchronize_material_properties: true,
        }
    }
}
