use std::{net::SocketAddr, time::Duration};

use thiserror::Error;

use mirror_shared::{
    AssetStateStatus, BundleTransferError, CommandError, RemoteWorldError, TransportError,
};

use crate::AssetBundleLoadError;

/// Errors surfaced by a SceneObserver through `ErrorEvent`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ObserverError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Could not decode command from source: {source}")]
    Command {
        #[source]
        source: CommandError,
    },

    /// A command only an observer may send arrived from the source
    #[error("Unexpected {tag} command from source")]
    UnexpectedCommand { tag: &'static str },

    #[error("Ignoring connection from {address}, already mirroring {source_address}")]
    UnexpectedConnection {
        address: SocketAddr,
        source_address: SocketAddr,
    },

    #[error("Not connected to a source")]
    NotConnected,

    #[error(transparent)]
    BundleTransfer(#[from] BundleTransferError),

    #[error(transparent)]
    BundleLoad(#[from] AssetBundleLoadError),

    #[error(transparent)]
    Mirror(#[from] RemoteWorldError),

    #[error("Source did not respond for {waited:?} while {status:?}")]
    HandshakeTimeout {
        status: AssetStateStatus,
        waited: Duration,
    },
}
