//! # Mirror Source
//! Mirrors a live scene hierarchy and its components to connected observers,
//! and serves them the asset bundle the scene needs.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use mirror_shared::{
        AssetBundle, AssetBundlePlatform, AssetBundleVersion, AssetDescriptor, AssetHandle,
        AssetKey, AssetKind, AssetProvider, BroadcastConfig, CameraPose, ComponentKind,
        ConnectionConfig, Instant, NodeId, NodeTag, PerformanceParameters, PollingFrequency,
        Pose, RectState, SceneRefType, Transport, TransportError, TransportEvent,
    };
}

mod bundle;
mod connection;
mod error;
mod events;
mod scene_source;
mod source_config;

pub use bundle::{AssetBundleProvider, DirectoryBundleProvider, MemoryBundleProvider};
pub use connection::Connection;
pub use error::SourceError;
pub use events::{CameraEvent, ConnectEvent, DisconnectEvent, ErrorEvent, Event, Events, ReadyEvent};
pub use scene_source::SceneSource;
pub use source_config::SourceConfig;
