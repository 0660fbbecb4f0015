use std::{collections::BTreeMap, net::SocketAddr};

use mirror_serde::{ByteWrite, Serde, StreamWriter};

use crate::messages::{Command, CommandTag};

/// Collects one frame of component messages per connection, to be flushed as a
/// single `SYNC` command each.
#[derive(Default)]
pub struct SyncOutbox {
    pending: BTreeMap<SocketAddr, StreamWriter>,
}

impl SyncOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the same serialized message to every recipient's payload
    pub fn send(&mut self, recipients: &[SocketAddr], bytes: &[u8]) {
        for address in recipients {
            self.pending.entry(*address).or_default().write_bytes(bytes);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.values().all(|writer| writer.is_empty())
    }

    pub fn discard(&mut self, address: &SocketAddr) {
        self.pending.remove(address);
    }

    /// Takes every non-empty payload, framed as a `SYNC` command
    pub fn drain(&mut self, timestamp: f32) -> Vec<(SocketAddr, Vec<u8>)> {
        std::mem::take(&mut self.pending)
            .into_iter()
            .filter(|(_, body)| !body.is_empty())
            .map(|(address, body)| {
                let mut writer = StreamWriter::new();
                Command::write_tag(CommandTag::Sync, &mut writer);
                timestamp.ser(&mut writer);
                writer.write_bytes(body.as_slice());
                (address, writer.to_bytes())
            })
            .collect()
    }
}
