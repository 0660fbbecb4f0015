use mirror_serde::{ByteWrite, Serde, SerdeErr, StreamReader};

/// Tag routing a component message to the right decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    Transform,
    MeshRenderer,
    AudioSource,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 3] = [
        ComponentKind::Transform,
        ComponentKind::MeshRenderer,
        ComponentKind::AudioSource,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::Transform => "Transform",
            ComponentKind::MeshRenderer => "MeshRenderer",
            ComponentKind::AudioSource => "AudioSource",
        }
    }

    /// Position of this kind in [`ComponentKind::ALL`]
    pub fn index(&self) -> usize {
        match self {
            ComponentKind::Transform => 0,
            ComponentKind::MeshRenderer => 1,
            ComponentKind::AudioSource => 2,
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serde for ComponentKind {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(self.index() as u8);
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        let index = reader.read_byte()?;
        ComponentKind::ALL
            .get(usize::from(index))
            .copied()
            .ok_or(SerdeErr::InvalidValue {
                type_name: "ComponentKind",
                value: u64::from(index),
            })
    }
}
