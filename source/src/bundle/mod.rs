mod bundle_provider;
mod bundle_send;

pub use bundle_provider::{AssetBundleProvider, DirectoryBundleProvider, MemoryBundleProvider};
pub(crate) use bundle_send::BundleSend;
