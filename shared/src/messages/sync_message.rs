use mirror_serde::{ByteWrite, Serde, SerdeErr, StreamReader};

use crate::world::component::component_message::ComponentMessage;

/// Payload of a `SYNC` command: a timestamp, then component messages until the
/// end of the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncMessage {
    pub timestamp: f32,
    pub components: Vec<ComponentMessage>,
}

impl Serde for SyncMessage {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.timestamp.ser(writer);
        for component in &self.components {
            component.ser(writer);
        }
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        let timestamp = f32::de(reader)?;
        let mut components = Vec::new();
        while !reader.is_empty() {
            components.push(ComponentMessage::de(reader)?);
        }
        Ok(Self {
            timestamp,
            components,
        })
    }
}
