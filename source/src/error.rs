use std::net::SocketAddr;

use thiserror::Error;

use mirror_shared::{AssetBundlePlatform, BroadcastError, CommandError, TransportError};

/// Errors surfaced by a SceneSource through `ErrorEvent`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Could not decode command from {address}: {source}")]
    Command {
        address: SocketAddr,
        #[source]
        source: CommandError,
    },

    /// A command only a source may send arrived from an observer
    #[error("Unexpected {tag} command from {address}")]
    UnexpectedCommand {
        address: SocketAddr,
        tag: &'static str,
    },

    #[error("Received data from unknown connection {address}")]
    UnknownConnection { address: SocketAddr },

    #[error(transparent)]
    Broadcast(#[from] BroadcastError),

    #[error("Asset bundle for {platform} unavailable: {reason}")]
    BundleUnavailable {
        platform: AssetBundlePlatform,
        reason: String,
    },
}
