use crate::{
    error::SerdeErr, integer::UnsignedVariableInteger, serde::Serde, stream_reader::StreamReader,
    stream_writer::ByteWrite,
};

impl Serde for String {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        let bytes = self.as_bytes();
        UnsignedVariableInteger::new(bytes.len() as u32).ser(writer);
        writer.write_bytes(bytes);
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        let length = UnsignedVariableInteger::de(reader)?.get() as usize;
        let bytes = reader.read_bytes(length)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| SerdeErr::InvalidUtf8 { length })
    }
}
