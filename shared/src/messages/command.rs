use mirror_serde::{ByteWrite, Serde, SerdeErr, StreamReader, StreamWriter};

use super::{CameraPose, CommandError, CommandTag, SyncMessage};
use crate::{
    asset::{AssetBundlePlatform, AssetBundleVersion},
    perf::PerfReport,
};

/// Answer to a download request that has a bundle to offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleDownloadStart {
    pub version: AssetBundleVersion,
    pub total_length: usize,
}

impl BundleDownloadStart {
    /// Longest bundle the signed 32-bit length on the wire can announce
    pub const MAX_LENGTH: usize = i32::MAX as usize;

    /// Returns None if `total_length` is over [`Self::MAX_LENGTH`]
    pub fn new(version: AssetBundleVersion, total_length: usize) -> Option<Self> {
        (total_length <= Self::MAX_LENGTH).then_some(Self {
            version,
            total_length,
        })
    }
}

/// Every message exchanged between a source and an observer.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Sync(SyncMessage),
    Camera(CameraPose),
    Perf(PerfReport),
    PerfDiagnosticMode { enabled: bool },
    RequestAssetBundleInfo { platform: AssetBundlePlatform },
    ReportAssetBundleInfo { version: Option<AssetBundleVersion> },
    RequestAssetBundleDownload { platform: AssetBundlePlatform },
    ReportAssetBundleDownloadStart { start: Option<BundleDownloadStart> },
    ReportAssetBundleDownloadData { data: Vec<u8> },
    AssetLoadCompleted,
    Heartbeat,
}

impl Command {
    pub fn tag(&self) -> CommandTag {
        match self {
            Command::Sync(_) => CommandTag::Sync,
            Command::Camera(_) => CommandTag::Camera,
            Command::Perf(_) => CommandTag::Perf,
            Command::PerfDiagnosticMode { .. } => CommandTag::PerfDiagnosticMode,
            Command::RequestAssetBundleInfo { .. } => CommandTag::RequestAssetBundleInfo,
            Command::ReportAssetBundleInfo { .. } => CommandTag::ReportAssetBundleInfo,
            Command::RequestAssetBundleDownload { .. } => CommandTag::RequestAssetBundleDownload,
            Command::ReportAssetBundleDownloadStart { .. } => {
                CommandTag::ReportAssetBundleDownloadStart
            }
            Command::ReportAssetBundleDownloadData { .. } => {
                CommandTag::ReportAssetBundleDownloadData
            }
            Command::AssetLoadCompleted => CommandTag::AssetLoadCompleted,
            Command::Heartbeat => CommandTag::Heartbeat,
        }
    }

    pub fn write_tag(tag: CommandTag, writer: &mut dyn ByteWrite) {
        tag.as_str().to_string().ser(writer);
    }

    pub fn write(&self, writer: &mut dyn ByteWrite) {
        Self::write_tag(self.tag(), writer);
        match self {
            Command::Sync(sync) => sync.ser(writer),
            Command::Camera(pose) => pose.ser(writer),
            Command::Perf(report) => report.ser(writer),
            Command::PerfDiagnosticMode { enabled } => enabled.ser(writer),
            Command::RequestAssetBundleInfo { platform }
            | Command::RequestAssetBundleDownload { platform } => platform.ser(writer),
            Command::ReportAssetBundleInfo { version } => version.ser(writer),
            Command::ReportAssetBundleDownloadStart { start } => match start {
                Some(start) => {
                    true.ser(writer);
                    start.version.ser(writer);
                    // lengths past MAX_LENGTH never get a BundleDownloadStart from `new`
                    i32::try_from(start.total_length)
                        .unwrap_or(i32::MAX)
                        .ser(writer);
                }
                None => false.ser(writer),
            },
            Command::ReportAssetBundleDownloadData { data } => writer.write_bytes(data),
            Command::AssetLoadCompleted | Command::Heartbeat => {}
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = StreamWriter::new();
        self.write(&mut writer);
        writer.to_bytes()
    }

    /// Decodes one complete received payload
    pub fn read(payload: &[u8]) -> Result<Command, CommandError> {
        let mut reader = StreamReader::new(payload);
        let tag_text =
            String::de(&mut reader).map_err(|source| CommandError::UnreadableTag { source })?;
        let tag = CommandTag::parse(&tag_text).ok_or(CommandError::UnknownTag { tag: tag_text })?;
        Self::read_payload(tag, &mut reader).map_err(|source| CommandError::Malformed {
            tag: tag.as_str(),
            source,
        })
    }

    fn read_payload(tag: CommandTag, reader: &mut StreamReader) -> Result<Command, SerdeErr> {
        Ok(match tag {
            CommandTag::Sync => Command::Sync(SyncMessage::de(reader)?),
            CommandTag::Camera => Command::Camera(CameraPose::de(reader)?),
            CommandTag::Perf => Command::Perf(PerfReport::de(reader)?),
            CommandTag::PerfDiagnosticMode => Command::PerfDiagnosticMode {
                enabled: bool::de(reader)?,
            },
            CommandTag::RequestAssetBundleInfo => Command::RequestAssetBundleInfo {
                platform: AssetBundlePlatform::de(reader)?,
            },
            CommandTag::ReportAssetBundleInfo => Command::ReportAssetBundleInfo {
                version: Option::<AssetBundleVersion>::de(reader)?,
            },
            CommandTag::RequestAssetBundleDownload => Command::RequestAssetBundleDownload {
                platform: AssetBundlePlatform::de(reader)?,
            },
            CommandTag::ReportAssetBundleDownloadStart => {
                let start = if bool::de(reader)? {
                    let version = AssetBundleVersion::de(reader)?;
                    let length = i32::de(reader)?;
                    let total_length =
                        usize::try_from(length).map_err(|_| SerdeErr::InvalidValue {
                            type_name: "asset bundle length",
                            value: u64::from(length as u32),
                        })?;
                    Some(BundleDownloadStart {
                        version,
                        total_length,
                    })
                } else {
                    None
                };
                Command::ReportAssetBundleDownloadStart { start }
            }
            CommandTag::ReportAssetBundleDownloadData => Command::ReportAssetBundleDownloadData {
                data: reader.read_remaining().to_vec(),
            },
            CommandTag::AssetLoadCompleted => Command::AssetLoadCompleted,
            CommandTag::Heartbeat => Command::Heartbeat,
        })
    }
}
