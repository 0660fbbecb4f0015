use thiserror::Error;

/// Protocol violations while receiving an asset bundle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BundleTransferError {
    #[error("Received {received} bytes of asset bundle data but only {total} were announced")]
    ExceedsDeclaredLength { received: usize, total: usize },

    #[error("Received {length} bytes of asset bundle data with no download in progress")]
    NoTransferInProgress { length: usize },

    #[error("Asset bundle download announced an invalid length of {length}")]
    InvalidLength { length: i32 },
}
