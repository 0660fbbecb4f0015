use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use mirror_shared::{AssetBundle, AssetBundlePlatform, AssetBundleVersion, ASSET_BUNDLE_NAME};

use crate::SourceError;

/// Supplies the asset bundle a source offers to observers on each platform.
pub trait AssetBundleProvider {
    /// Loads the bundle built for `platform`, or `None` if there isn't one
    fn bundle(&self, platform: AssetBundlePlatform) -> Result<Option<AssetBundle>, SourceError>;

    /// Version of the bundle for `platform`, without its bytes where possible
    fn version(
        &self,
        platform: AssetBundlePlatform,
    ) -> Result<Option<AssetBundleVersion>, SourceError> {
        Ok(self.bundle(platform)?.map(|bundle| bundle.version))
    }
}

/// Bundles held in memory, keyed by platform.
#[derive(Default)]
pub struct MemoryBundleProvider {
    bundles: HashMap<AssetBundlePlatform, AssetBundle>,
}

impl MemoryBundleProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, platform: AssetBundlePlatform, bundle: AssetBundle) {
        self.bundles.insert(platform, bundle);
    }

    pub fn with_bundle(mut self, platform: AssetBundlePlatform, bundle: AssetBundle) -> Self {
        self.insert(platform, bundle);
        self
    }
}

impl AssetBundleProvider for MemoryBundleProvider {
    fn bundle(&self, platform: AssetBundlePlatform) -> Result<Option<AssetBundle>, SourceError> {
        Ok(self.bundles.get(&platform).cloned())
    }
}

/// Bundles read from disk, laid out as `<root>/<platform>/scenemirror`.
///
/// Next to each bundle, `scenemirror.version` holds the version identity on
/// its first line and the display name on its second.
pub struct DirectoryBundleProvider {
    root: PathBuf,
}

impl DirectoryBundleProvider {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn bundle_path(&self, platform: AssetBundlePlatform) -> PathBuf {
        self.root.join(platform.name()).join(ASSET_BUNDLE_NAME)
    }

    pub fn version_path(&self, platform: AssetBundlePlatform) -> PathBuf {
        self.root
            .join(platform.name())
            .join(format!("{}.version", ASSET_BUNDLE_NAME))
    }
}

impl AssetBundleProvider for DirectoryBundleProvider {
    fn bundle(&self, platform: AssetBundlePlatform) -> Result<Option<AssetBundle>, SourceError> {
        let Some(version) = self.version(platform)? else {
            return Ok(None);
        };
        let Some(data) = read_optional(&self.bundle_path(platform), platform)? else {
            return Ok(None);
        };
        Ok(Some(AssetBundle::new(version, data)))
    }

    fn version(
        &self,
        platform: AssetBundlePlatform,
    ) -> Result<Option<AssetBundleVersion>, SourceError> {
        if !self.bundle_path(platform).is_file() {
            return Ok(None);
        }
        let Some(contents) = read_optional(&self.version_path(platform), platform)? else {
            return Ok(None);
        };
        let contents = String::from_utf8(contents).map_err(|_| SourceError::BundleUnavailable {
            platform,
            reason: "version file is not UTF-8".to_string(),
        })?;

        let mut lines = contents.lines().map(str::trim);
        let identity = lines.next().filter(|line| !line.is_empty()).ok_or_else(|| {
            SourceError::BundleUnavailable {
                platform,
                reason: "version file has no identity".to_string(),
            }
        })?;
        let display_name = lines.next().unwrap_or(identity);

        Ok(Some(AssetBundleVersion::new(identity, display_name)))
    }
}

fn read_optional(
    path: &Path,
    platform: AssetBundlePlatform,
) -> Result<Option<Vec<u8>>, SourceError> {
    match fs::read(path) {
        Ok(data) => Ok(Some(data)),
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
        Err(error) => Err(SourceError::BundleUnavailable {
            platform,
            reason: format!("{}: {}", path.display(), error),
        }),
    }
}
