use crate::{error::SerdeErr, stream_reader::StreamReader, stream_writer::ByteWrite};

/// A type that can be written to and read back from a byte stream
pub trait Serde: Sized + Clone + PartialEq {
    /// Writes the value into the stream
    fn ser(&self, writer: &mut dyn ByteWrite);

    /// Reads a value from the stream
    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr>;
}
