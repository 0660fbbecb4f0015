use std::{net::SocketAddr, sync::Arc};

use mirror_shared::ASSET_BUNDLE_CHUNK_MAX_BYTES;

/// An asset bundle download in flight to one observer, streamed one chunk per frame.
pub(crate) struct BundleSend {
    pub recipient: SocketAddr,
    data: Arc<[u8]>,
    cursor: usize,
}

impl BundleSend {
    pub fn new(recipient: SocketAddr, data: Arc<[u8]>) -> Self {
        Self {
            recipient,
            data,
            cursor: 0,
        }
    }

    /// Returns the next chunk and advances past it
    pub fn next_chunk(&mut self) -> Option<&[u8]> {
        if self.is_complete() {
            return None;
        }
        let start = self.cursor;
        let end = (start + ASSET_BUNDLE_CHUNK_MAX_BYTES).min(self.data.len());
        self.cursor = end;
        Some(&self.data[start..end])
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.data.len()
    }

    pub fn bytes_sent(&self) -> usize {
        self.cursor
    }
}
