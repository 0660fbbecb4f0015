use glam::{Quat, Vec2, Vec3, Vec4};

use crate::{error::SerdeErr, serde::Serde, stream_reader::StreamReader, stream_writer::ByteWrite};

impl Serde for Vec2 {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.x.ser(writer);
        self.y.ser(writer);
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        let x = f32::de(reader)?;
        let y = f32::de(reader)?;
        Ok(Vec2::new(x, y))
    }
}

impl Serde for Vec3 {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.x.ser(writer);
        self.y.ser(writer);
        self.z.ser(writer);
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        let x = f32::de(reader)?;
        let y = f32::de(reader)?;
        let z = f32::de(reader)?;
        Ok(Vec3::new(x, y, z))
    }
}

impl Serde for Vec4 {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.x.ser(writer);
        self.y.ser(writer);
        self.z.ser(writer);
        self.w.ser(writer);
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        let x = f32::de(reader)?;
        let y = f32::de(reader)?;
        let z = f32::de(reader)?;
        let w = f32::de(reader)?;
        Ok(Vec4::new(x, y, z, w))
    }
}

// x, y, z, w
impl Serde for Quat {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.x.ser(writer);
        self.y.ser(writer);
        self.z.ser(writer);
        self.w.ser(writer);
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        let x = f32::de(reader)?;
        let y = f32::de(reader)?;
        let z = f32::de(reader)?;
        let w = f32::de(reader)?;
        Ok(Quat::from_xyzw(x, y, z, w))
    }
}
