use thiserror::Error;

use mirror_shared::{AssetBundle, AssetBundleVersion};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetBundleLoadError {
    #[error("Asset bundle {version} could not be loaded: {reason}")]
    Rejected {
        version: AssetBundleVersion,
        reason: String,
    },
}

/// Makes a downloaded asset bundle's assets available to the observer's
/// `AssetProvider`.
pub trait AssetBundleLoader {
    fn load(&mut self, bundle: &AssetBundle) -> Result<(), AssetBundleLoadError>;

    /// Releases the currently loaded bundle, if any
    fn unload(&mut self);
}
