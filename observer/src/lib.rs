//! # Mirror Observer
//! Connects to a mirror source, negotiates the asset bundle its scene needs and
//! rebuilds the mirrored hierarchy in a local scene.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use mirror_shared::{
        AssetBundle, AssetBundlePlatform, AssetBundleVersion, AssetId, AssetKind, AssetProvider,
        AssetState, AssetStateStatus, CameraPose, ComponentKind, ConnectionConfig, Instant,
        NodeId, PerfReport, SceneMutType, Transport, TransportError, TransportEvent,
    };
}

mod bundle;
mod error;
mod events;
mod observer_config;
mod scene_observer;

pub use bundle::{AssetBundleLoadError, AssetBundleLoader};
pub use error::ObserverError;
pub use events::{
    AssetStateEvent, CameraEvent, ConnectEvent, DisconnectEvent, ErrorEvent, Event, Events,
    PerfEvent,
};
pub use observer_config::ObserverConfig;
pub use scene_observer::SceneObserver;
