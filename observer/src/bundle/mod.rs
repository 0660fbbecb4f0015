mod bundle_download;
mod bundle_loader;

pub(crate) use bundle_download::BundleDownload;
pub use bundle_loader::{AssetBundleLoadError, AssetBundleLoader};
