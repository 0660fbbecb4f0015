use std::{default::Default, time::Duration};

use mirror_shared::{AssetBundlePlatform, ConnectionConfig};

/// Contains Config properties which will be used by the SceneObserver
#[derive(Clone)]
pub struct ObserverConfig {
    /// Used to configure the connection with the source
    pub connection: ConnectionConfig,
    /// Platform whose asset bundle is requested from the source
    pub platform: AssetBundlePlatform,
    /// Whether the observer ships with the scene's assets built in, so it can
    /// mirror a source that offers no bundle
    pub has_preloaded_assets: bool,
    /// How long to wait for the source to answer a bundle request or send the
    /// next chunk before giving up. `None` waits forever.
    pub handshake_timeout: Option<Duration>,
    /// Load every asset identity up front instead of one name group at a time
    pub force_load_all_assets: bool,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            platform: AssetBundlePlatform::current(),
            has_preloaded_assets: false,
            handshake_timeout: Some(Duration::from_secs(30)),
            force_load_all_assets: false,
        }
    }
}
