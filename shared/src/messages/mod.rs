mod camera_pose;
mod command;
mod command_tag;
mod error;
mod sync_message;

pub use camera_pose::CameraPose;
pub use command::{BundleDownloadStart, Command};
pub use command_tag::CommandTag;
pub use error::CommandError;
pub use sync_message::SyncMessage;
