/// Base file name of the platform asset bundle a source offers to observers
pub const ASSET_BUNDLE_NAME: &str = "scenemirror";

/// Largest payload carried by a single bundle data message
pub const ASSET_BUNDLE_CHUNK_MAX_BYTES: usize = 256 * 1024;

