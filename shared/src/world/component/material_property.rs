use glam::Vec4;
use mirror_serde::{ByteWrite, Serde, SerdeErr, StreamReader};

use crate::asset::{AssetId, AssetKind};

/// Value of one shader property, generic over how textures are referenced.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialPropertyValue<A> {
    Color(Vec4),
    Vector(Vec4),
    Float(f32),
    Texture(Option<A>),
    RenderQueue(i32),
    ShaderKeywords(Vec<String>),
}

impl<A> MaterialPropertyValue<A> {
    pub fn map_assets<B>(
        &self,
        resolve: &mut impl FnMut(AssetKind, &A) -> Option<B>,
    ) -> MaterialPropertyValue<B> {
        match self {
            MaterialPropertyValue::Color(color) => MaterialPropertyValue::Color(*color),
            MaterialPropertyValue::Vector(vector) => MaterialPropertyValue::Vector(*vector),
            MaterialPropertyValue::Float(value) => MaterialPropertyValue::Float(*value),
            MaterialPropertyValue::Texture(texture) => MaterialPropertyValue::Texture(
                texture
                    .as_ref()
                    .and_then(|texture| resolve(AssetKind::Texture, texture)),
            ),
            MaterialPropertyValue::RenderQueue(queue) => MaterialPropertyValue::RenderQueue(*queue),
            MaterialPropertyValue::ShaderKeywords(keywords) => {
                MaterialPropertyValue::ShaderKeywords(keywords.clone())
            }
        }
    }
}

impl Serde for MaterialPropertyValue<AssetId> {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        match self {
            MaterialPropertyValue::Color(color) => {
                writer.write_byte(0);
                color.ser(writer);
            }
            MaterialPropertyValue::Vector(vector) => {
                writer.write_byte(1);
                vector.ser(writer);
            }
            MaterialPropertyValue::Float(value) => {
                writer.write_byte(2);
                value.ser(writer);
            }
            MaterialPropertyValue::Texture(texture) => {
                writer.write_byte(3);
                texture.ser(writer);
            }
            MaterialPropertyValue::RenderQueue(queue) => {
                writer.write_byte(4);
                queue.ser(writer);
            }
            MaterialPropertyValue::ShaderKeywords(keywords) => {
                writer.write_byte(5);
                (keywords.len() as i32).ser(writer);
                for keyword in keywords {
                    keyword.ser(writer);
                }
            }
        }
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        Ok(match reader.read_byte()? {
            0 => MaterialPropertyValue::Color(Vec4::de(reader)?),
            1 => MaterialPropertyValue::Vector(Vec4::de(reader)?),
            2 => MaterialPropertyValue::Float(f32::de(reader)?),
            3 => MaterialPropertyValue::Texture(Option::<AssetId>::de(reader)?),
            4 => MaterialPropertyValue::RenderQueue(i32::de(reader)?),
            5 => {
                let count = read_count(reader, "keyword count")?;
                let mut keywords = Vec::with_capacity(count);
                for _ in 0..count {
                    keywords.push(String::de(reader)?);
                }
                MaterialPropertyValue::ShaderKeywords(keywords)
            }
            value => {
                return Err(SerdeErr::InvalidValue {
                    type_name: "MaterialPropertyValue",
                    value: u64::from(value),
                })
            }
        })
    }
}

/// One mirrored property of the material in slot `slot` of a mesh renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialProperty<A> {
    pub slot: i32,
    pub name: String,
    pub value: MaterialPropertyValue<A>,
}

impl<A> MaterialProperty<A> {
    pub fn new(slot: i32, name: &str, value: MaterialPropertyValue<A>) -> Self {
        Self {
            slot,
            name: name.to_string(),
            value,
        }
    }

    pub fn same_key<B>(&self, other: &MaterialProperty<B>) -> bool {
        self.slot == other.slot && self.name == other.name
    }
}

impl Serde for MaterialProperty<AssetId> {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.slot.ser(writer);
        self.name.ser(writer);
        self.value.ser(writer);
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        let slot = i32::de(reader)?;
        let name = String::de(reader)?;
        let value = MaterialPropertyValue::de(reader)?;
        Ok(Self { slot, name, value })
    }
}

/// Reads an i32 element count, rejecting counts the rest of the stream cannot
/// hold at one byte per element
pub(crate) fn read_count(
    reader: &mut StreamReader,
    type_name: &'static str,
) -> Result<usize, SerdeErr> {
    let count = i32::de(reader)?;
    if count < 0 {
        return Err(SerdeErr::InvalidValue {
            type_name,
            value: u64::from(count as u32),
        });
    }
    let count = count as usize;
    if count > reader.remaining() {
        return Err(SerdeErr::UnexpectedEnd {
            needed: count,
            remaining: reader.remaining(),
        });
    }
    Ok(count)
}
