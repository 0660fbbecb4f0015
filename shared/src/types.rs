use mirror_serde::{ByteWrite, Serde, SerdeErr, StreamReader};

/// Short integer identifying a mirrored node for the lifetime of a source session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(i16);

impl NodeId {
    /// Wire value standing in for "no node", used for the parent of a root
    pub const NULL_VALUE: i16 = -1;

    pub fn new(value: i16) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i16 {
        self.0
    }

    pub fn ser_nullable(node: &Option<NodeId>, writer: &mut dyn ByteWrite) {
        match node {
            Some(node) => node.ser(writer),
            None => Self::NULL_VALUE.ser(writer),
        }
    }

    pub fn de_nullable(reader: &mut StreamReader) -> Result<Option<NodeId>, SerdeErr> {
        let value = i16::de(reader)?;
        if value == Self::NULL_VALUE {
            return Ok(None);
        }
        Self::checked(value).map(Some)
    }

    fn checked(value: i16) -> Result<NodeId, SerdeErr> {
        if value < 0 {
            return Err(SerdeErr::InvalidValue {
                type_name: "NodeId",
                value: u64::from(value as u16),
            });
        }
        Ok(NodeId(value))
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serde for NodeId {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        Self::checked(i16::de(reader)?)
    }
}
