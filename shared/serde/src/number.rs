use crate::{error::SerdeErr, serde::Serde, stream_reader::StreamReader, stream_writer::ByteWrite};

// Fixed-width numbers

macro_rules! impl_serde_little_endian {
    ($($number:ty),*) => {
        $(
            impl Serde for $number {
                fn ser(&self, writer: &mut dyn ByteWrite) {
                    writer.write_bytes(&self.to_le_bytes());
                }

                fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
                    Ok(<$number>::from_le_bytes(reader.read_array()?))
                }
            }
        )*
    };
}

impl_serde_little_endian!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

// Bool

impl Serde for bool {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(u8::from(*self));
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        match reader.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(SerdeErr::InvalidValue {
                type_name: "bool",
                value: u64::from(value),
            }),
        }
    }
}

// Option

impl<T: Serde> Serde for Option<T> {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        match self {
            Some(value) => {
                true.ser(writer);
                value.ser(writer);
            }
            None => false.ser(writer),
        }
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        if bool::de(reader)? {
            Ok(Some(T::de(reader)?))
        } else {
            Ok(None)
        }
    }
}
