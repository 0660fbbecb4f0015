use super::{AssetHandle, AssetKey, AssetKind};

/// One asset as listed by an [`AssetProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct AssetDescriptor {
    pub handle: AssetHandle,
    pub name: String,
    pub key: AssetKey,
}

/// Engine-side access to the assets a scene can reference.
pub trait AssetProvider {
    /// Name of the asset behind `handle`, or None if the handle is unknown
    fn asset_name(&self, kind: AssetKind, handle: AssetHandle) -> Option<String>;

    /// Every asset of `kind` called `name`
    fn load_group(&self, kind: AssetKind, name: &str) -> Vec<AssetDescriptor>;

    /// Every asset of `kind`
    fn enumerate(&self, kind: AssetKind) -> Vec<AssetDescriptor>;

    /// Changes whenever the set of available assets changes, for example after
    /// a bundle is loaded or unloaded
    fn revision(&self) -> u64 {
        0
    }
}
