mod asset_bundle;
mod asset_cache;
mod asset_id;
mod asset_provider;
mod asset_state;
mod error;
mod material_property_cache;

pub use asset_bundle::{AssetBundle, AssetBundlePlatform, AssetBundleVersion};
pub use asset_cache::{AssetCache, AssetCaches};
pub use asset_id::{AssetHandle, AssetId, AssetKey, AssetKind};
pub use asset_provider::{AssetDescriptor, AssetProvider};
pub use asset_state::{format_byte_progress, format_bytes, AssetState, AssetStateStatus};
pub use error::BundleTransferError;
pub use material_property_cache::{
    MaterialPropertyCache, MaterialPropertyDescriptor, MaterialPropertyType, RENDER_QUEUE_PROPERTY,
    SHADER_KEYWORDS_PROPERTY,
};
