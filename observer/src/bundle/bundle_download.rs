use mirror_shared::{AssetBundle, AssetBundleVersion, BundleTransferError};

/// An asset bundle being received from the source, chunk by chunk.
pub(crate) struct BundleDownload {
    version: AssetBundleVersion,
    total_length: usize,
    data: Vec<u8>,
}

impl BundleDownload {
    pub fn new(version: AssetBundleVersion, total_length: usize) -> Self {
        Self {
            version,
            total_length,
            data: Vec::with_capacity(total_length),
        }
    }

    pub fn version(&self) -> &AssetBundleVersion {
        &self.version
    }

    pub fn total_length(&self) -> usize {
        self.total_length
    }

    pub fn bytes_so_far(&self) -> usize {
        self.data.len()
    }

    pub fn is_complete(&self) -> bool {
        self.data.len() == self.total_length
    }

    pub fn append(&mut self, chunk: &[u8]) -> Result<(), BundleTransferError> {
        let received = self.data.len() + chunk.len();
        if received > self.total_length {
            return Err(BundleTransferError::ExceedsDeclaredLength {
                received,
                total: self.total_length,
            });
        }
        self.data.extend_from_slice(chunk);
        Ok(())
    }

    pub fn into_bundle(self) -> AssetBundle {
        AssetBundle::new(self.version, self.data)
    }
}
