use glam::{Quat, Vec3};
use mirror_serde::{ByteWrite, Serde, SerdeErr, StreamReader};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub timestamp: f32,
    pub position: Vec3,
    pub rotation: Quat,
}

impl CameraPose {
    pub fn new(timestamp: f32, position: Vec3, rotation: Quat) -> Self {
        Self {
            timestamp,
            position,
            rotation,
        }
    }
}

impl Serde for CameraPose {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.timestamp.ser(writer);
        self.position.ser(writer);
        self.rotation.ser(writer);
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            timestamp: f32::de(reader)?,
            position: Vec3::de(reader)?,
            rotation: Quat::de(reader)?,
        })
    }
}
