//! # Mirror Shared
//! Common functionality shared between the mirror-source & mirror-observer crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

#[macro_use]
extern crate cfg_if;

pub use mirror_serde::{
    ByteWrite, Serde, SerdeErr, StreamReader, StreamWriter, UnsignedVariableInteger,
};

mod asset;
mod backends;
mod connection;
mod constants;
mod messages;
mod perf;
mod types;
mod world;

pub use asset::{
    format_byte_progress, format_bytes, AssetBundle, AssetBundlePlatform, AssetBundleVersion,
    AssetCache, AssetCaches, AssetDescriptor, AssetHandle, AssetId, AssetKey, AssetKind,
    AssetProvider, AssetState, AssetStateStatus, BundleTransferError, MaterialPropertyCache,
    MaterialPropertyDescriptor, MaterialPropertyType, RENDER_QUEUE_PROPERTY,
    SHADER_KEYWORDS_PROPERTY,
};
pub use backends::{Instant, Timer};
pub use connection::{
    connection_config::ConnectionConfig,
    connection_delta::{ConnectionDelta, ConnectionDeltaTracker},
    error::TransportError,
    transport::{Transport, TransportEvent},
};
pub use constants::{ASSET_BUNDLE_CHUNK_MAX_BYTES, ASSET_BUNDLE_NAME};
pub use messages::{
    BundleDownloadStart, CameraPose, Command, CommandError, CommandTag, SyncMessage,
};
pub use perf::{PerfCounter, PerfMonitor, PerfReport};
pub use types::NodeId;
pub use world::{
    component::{
        audio_source::{AudioSourceChangeFlags, AudioSourceData},
        change_flags::ChangeFlags,
        component_kind::ComponentKind,
        component_message::{ComponentActionType, ComponentMessage, ComponentUpdate},
        material_property::{MaterialProperty, MaterialPropertyValue},
        mesh_renderer::{MeshRendererChangeFlags, MeshRendererData},
        replicated_component::ReplicatedComponent,
        transform::{RectState, TransformChangeFlags, TransformState},
    },
    host::{
        broadcast_config::{BroadcastConfig, PerformanceParameters, PollingFrequency},
        broadcast_context::BroadcastContext,
        component_broadcaster::{ComponentBroadcaster, FrameOutcome},
        endpoint_classifier::{EndpointClassification, EndpointClassifier},
        error::BroadcastError,
        node_id_generator::NodeIdGenerator,
        scene_broadcaster::SceneBroadcaster,
        sync_outbox::SyncOutbox,
    },
    remote::{error::RemoteWorldError, mirror_registry::MirrorRegistry},
    scene_type::{NodeTag, Pose, SceneMutType, SceneRefType},
};
