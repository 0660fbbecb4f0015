/// The string that opens every message on the wire and selects its payload layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandTag {
    Sync,
    Camera,
    Perf,
    PerfDiagnosticMode,
    RequestAssetBundleInfo,
    ReportAssetBundleInfo,
    RequestAssetBundleDownload,
    ReportAssetBundleDownloadStart,
    ReportAssetBundleDownloadData,
    AssetLoadCompleted,
    Heartbeat,
}

impl CommandTag {
    pub const ALL: [CommandTag; 11] = [
        CommandTag::Sync,
        CommandTag::Camera,
        CommandTag::Perf,
        CommandTag::PerfDiagnosticMode,
        CommandTag::RequestAssetBundleInfo,
        CommandTag::ReportAssetBundleInfo,
        CommandTag::RequestAssetBundleDownload,
        CommandTag::ReportAssetBundleDownloadStart,
        CommandTag::ReportAssetBundleDownloadData,
        CommandTag::AssetLoadCompleted,
        CommandTag::Heartbeat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandTag::Sync => "SYNC",
            CommandTag::Camera => "Camera",
            CommandTag::Perf => "Perf",
            CommandTag::PerfDiagnosticMode => "PERFDIAG",
            CommandTag::RequestAssetBundleInfo => "RequestAssetBundleInfo",
            CommandTag::ReportAssetBundleInfo => "ReportAssetBundleInfo",
            CommandTag::RequestAssetBundleDownload => "RequestAssetBundleDownload",
            CommandTag::ReportAssetBundleDownloadStart => "ReportAssetBundleDownloadStart",
            CommandTag::ReportAssetBundleDownloadData => "ReportAssetBundleDownloadData",
            CommandTag::AssetLoadCompleted => "AssetLoadCompleted",
            CommandTag::Heartbeat => "\u{2665}",
        }
    }

    pub fn parse(tag: &str) -> Option<CommandTag> {
        Self::ALL.iter().copied().find(|candidate| candidate.as_str() == tag)
    }
}

impl std::fmt::Display for CommandTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
