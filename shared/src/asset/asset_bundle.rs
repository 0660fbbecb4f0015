use std::sync::Arc;

use mirror_serde::{ByteWrite, Serde, SerdeErr, StreamReader};

/// Target platform of an asset bundle. Bundles are built per platform, so an
/// observer asks for the one matching its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetBundlePlatform {
    Unknown,
    WSA,
    Android,
    #[allow(non_camel_case_types)]
    iOS,
}

impl AssetBundlePlatform {
    /// Platform this binary was built for
    pub fn current() -> Self {
        CURRENT_PLATFORM
    }

    pub fn name(&self) -> &'static str {
        match self {
            AssetBundlePlatform::Unknown => "Unknown",
            AssetBundlePlatform::WSA => "WSA",
            AssetBundlePlatform::Android => "Android",
            AssetBundlePlatform::iOS => "iOS",
        }
    }
}

impl std::fmt::Display for AssetBundlePlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serde for AssetBundlePlatform {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        let value: u8 = match self {
            AssetBundlePlatform::Unknown => 0,
            AssetBundlePlatform::WSA => 1,
            AssetBundlePlatform::Android => 2,
            AssetBundlePlatform::iOS => 3,
        };
        writer.write_byte(value);
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        match reader.read_byte()? {
            0 => Ok(AssetBundlePlatform::Unknown),
            1 => Ok(AssetBundlePlatform::WSA),
            2 => Ok(AssetBundlePlatform::Android),
            3 => Ok(AssetBundlePlatform::iOS),
            value => Err(SerdeErr::InvalidValue {
                type_name: "AssetBundlePlatform",
                value: u64::from(value),
            }),
        }
    }
}

cfg_if! {
    if #[cfg(target_os = "windows")] {
        const CURRENT_PLATFORM: AssetBundlePlatform = AssetBundlePlatform::WSA;
    } else if #[cfg(target_os = "android")] {
        const CURRENT_PLATFORM: AssetBundlePlatform = AssetBundlePlatform::Android;
    } else if #[cfg(target_os = "ios")] {
        const CURRENT_PLATFORM: AssetBundlePlatform = AssetBundlePlatform::iOS;
    } else {
        const CURRENT_PLATFORM: AssetBundlePlatform = AssetBundlePlatform::Unknown;
    }
}

/// Identifies one build of an asset bundle. Two bundles with the same identity
/// hold the same assets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetBundleVersion {
    pub identity: String,
    pub display_name: String,
}

impl AssetBundleVersion {
    pub fn new(identity: &str, display_name: &str) -> Self {
        Self {
            identity: identity.to_string(),
            display_name: display_name.to_string(),
        }
    }
}

impl std::fmt::Display for AssetBundleVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" ({})", self.display_name, self.identity)
    }
}

impl Serde for AssetBundleVersion {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.identity.ser(writer);
        self.display_name.ser(writer);
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            identity: String::de(reader)?,
            display_name: String::de(reader)?,
        })
    }
}

/// A bundle's bytes together with its version.
#[derive(Debug, Clone)]
pub struct AssetBundle {
    pub version: AssetBundleVersion,
    pub data: Arc<[u8]>,
}

impl AssetBundle {
    pub fn new(version: AssetBundleVersion, data: Vec<u8>) -> Self {
        Self {
            version,
            data: data.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
