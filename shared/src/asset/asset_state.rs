use super::AssetBundleVersion;

/// Where an observer stands in getting the assets a scene needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStateStatus {
    Unknown,
    /// Not connected to a source
    None,
    /// No bundle offered, relying on assets built into the observer
    Preloaded,
    RequestingAssetBundle,
    DownloadingAssetBundle,
    AssetBundleLoaded,
    NonePreloadedAndNoAssetBundleAvailable,
    ErrorDownloadingAssetBundle,
    ErrorLoadingAssetBundle,
}

impl AssetStateStatus {
    /// States in which the observer can apply scene updates
    pub fn is_ready(&self) -> bool {
        matches!(
            self,
            AssetStateStatus::Preloaded
                | AssetStateStatus::AssetBundleLoaded
                | AssetStateStatus::NonePreloadedAndNoAssetBundleAvailable
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            AssetStateStatus::ErrorDownloadingAssetBundle | AssetStateStatus::ErrorLoadingAssetBundle
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetState {
    pub status: AssetStateStatus,
    pub display_name: Option<String>,
    pub bytes_so_far: usize,
    pub total_bytes: usize,
    pub error_details: Option<String>,
}

impl AssetState {
    pub fn new(status: AssetStateStatus) -> Self {
        Self {
            status,
            display_name: None,
            bytes_so_far: 0,
            total_bytes: 0,
            error_details: None,
        }
    }

    pub fn for_version(status: AssetStateStatus, version: &AssetBundleVersion) -> Self {
        Self {
            display_name: Some(version.to_string()),
            ..Self::new(status)
        }
    }

    pub fn with_progress(mut self, bytes_so_far: usize, total_bytes: usize) -> Self {
        self.bytes_so_far = bytes_so_far;
        self.total_bytes = total_bytes;
        self
    }

    pub fn with_error(mut self, details: String) -> Self {
        self.error_details = Some(details);
        self
    }

    pub fn progress_text(&self) -> String {
        format_byte_progress(self.bytes_so_far, self.total_bytes)
    }
}

impl Default for AssetState {
    fn default() -> Self {
        Self::new(AssetStateStatus::Unknown)
    }
}

/// Human-readable size with 1024-based units, e.g. `"2.8 MB"`
pub fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// e.g. `"1.2 MB/2.8 MB (42%)"`
pub fn format_byte_progress(bytes_so_far: usize, total_bytes: usize) -> String {
    let percent = if total_bytes == 0 {
        0
    } else {
        (bytes_so_far as u128 * 100 / total_bytes as u128) as u64
    };
    format!(
        "{}/{} ({}%)",
        format_bytes(bytes_so_far),
        format_bytes(total_bytes),
        percent
    )
}
