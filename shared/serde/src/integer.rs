use crate::{error::SerdeErr, serde::Serde, stream_reader::StreamReader, stream_writer::ByteWrite};

const MAX_BYTES: usize = 5;

/// An unsigned 32-bit integer written 7 bits at a time, least significant group
/// first, with the high bit of each byte flagging that another byte follows.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct UnsignedVariableInteger {
    value: u32,
}

impl UnsignedVariableInteger {
    pub fn new(value: u32) -> Self {
        Self { value }
    }

    pub fn get(&self) -> u32 {
        self.value
    }
}

impl Serde for UnsignedVariableInteger {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        let mut value = self.value;
        loop {
            let group = (value & 0x7F) as u8;
            value >>= 7;
            if value == 0 {
                writer.write_byte(group);
                return;
            }
            writer.write_byte(group | 0x80);
        }
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        let mut value: u32 = 0;
        for index in 0..MAX_BYTES {
            let byte = reader.read_byte()?;
            value |= u32::from(byte & 0x7F) << (7 * index);
            if byte & 0x80 == 0 {
                return Ok(Self { value });
            }
        }
        Err(SerdeErr::VariableIntegerOverflow {
            max_bytes: MAX_BYTES,
        })
    }
}
