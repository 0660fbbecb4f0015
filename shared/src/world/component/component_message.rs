use mirror_serde::{ByteWrite, Serde, SerdeErr, StreamReader};

use super::{
    audio_source::{AudioSourceChangeFlags, AudioSourceData},
    component_kind::ComponentKind,
    mesh_renderer::{MeshRendererChangeFlags, MeshRendererData},
    replicated_component::ReplicatedComponent,
    transform::{TransformChangeFlags, TransformState},
};
use crate::{asset::AssetId, types::NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentActionType {
    Created,
    Updated,
    Destroyed,
}

impl Serde for ComponentActionType {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        let value: u8 = match self {
            ComponentActionType::Created => 0,
            ComponentActionType::Updated => 1,
            ComponentActionType::Destroyed => 2,
        };
        writer.write_byte(value);
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        match reader.read_byte()? {
            0 => Ok(ComponentActionType::Created),
            1 => Ok(ComponentActionType::Updated),
            2 => Ok(ComponentActionType::Destroyed),
            value => Err(SerdeErr::InvalidValue {
                type_name: "ComponentActionType",
                value: u64::from(value),
            }),
        }
    }
}

/// A decoded state update, tagged by component kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentUpdate {
    Transform(TransformChangeFlags, TransformState),
    MeshRenderer(MeshRendererChangeFlags, MeshRendererData<AssetId>),
    AudioSource(AudioSourceChangeFlags, AudioSourceData<AssetId>),
}

impl ComponentUpdate {
    pub fn kind(&self) -> ComponentKind {
        match self {
            ComponentUpdate::Transform(..) => ComponentKind::Transform,
            ComponentUpdate::MeshRenderer(..) => ComponentKind::MeshRenderer,
            ComponentUpdate::AudioSource(..) => ComponentKind::AudioSource,
        }
    }

    fn write(&self, writer: &mut dyn ByteWrite) {
        match self {
            ComponentUpdate::Transform(flags, state) => state.write_update(*flags, writer),
            ComponentUpdate::MeshRenderer(flags, state) => state.write_update(*flags, writer),
            ComponentUpdate::AudioSource(flags, state) => state.write_update(*flags, writer),
        }
    }

    fn read(kind: ComponentKind, reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        Ok(match kind {
            ComponentKind::Transform => {
                let (flags, state) = TransformState::read_update(reader)?;
                ComponentUpdate::Transform(flags, state)
            }
            ComponentKind::MeshRenderer => {
                let (flags, state) = MeshRendererData::<AssetId>::read_update(reader)?;
                ComponentUpdate::MeshRenderer(flags, state)
            }
            ComponentKind::AudioSource => {
                let (flags, state) = AudioSourceData::<AssetId>::read_update(reader)?;
                ComponentUpdate::AudioSource(flags, state)
            }
        })
    }
}

/// One entry of a scene sync payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentMessage {
    Created { node: NodeId, kind: ComponentKind },
    Updated { node: NodeId, update: ComponentUpdate },
    Destroyed { node: NodeId, kind: ComponentKind },
}

impl ComponentMessage {
    pub fn node(&self) -> NodeId {
        match self {
            ComponentMessage::Created { node, .. }
            | ComponentMessage::Updated { node, .. }
            | ComponentMessage::Destroyed { node, .. } => *node,
        }
    }

    pub fn kind(&self) -> ComponentKind {
        match self {
            ComponentMessage::Created { kind, .. } | ComponentMessage::Destroyed { kind, .. } => {
                *kind
            }
            ComponentMessage::Updated { update, .. } => update.kind(),
        }
    }

    pub fn action_type(&self) -> ComponentActionType {
        match self {
            ComponentMessage::Created { .. } => ComponentActionType::Created,
            ComponentMessage::Updated { .. } => ComponentActionType::Updated,
            ComponentMessage::Destroyed { .. } => ComponentActionType::Destroyed,
        }
    }

    pub fn write_header(
        node: NodeId,
        kind: ComponentKind,
        action: ComponentActionType,
        writer: &mut dyn ByteWrite,
    ) {
        node.ser(writer);
        kind.ser(writer);
        action.ser(writer);
    }

    /// Writes an update straight from component state, without building a message
    pub fn write_update<C: ReplicatedComponent>(
        node: NodeId,
        state: &C,
        flags: C::Flags,
        writer: &mut dyn ByteWrite,
    ) {
        Self::write_header(node, C::KIND, ComponentActionType::Updated, writer);
        state.write_update(flags, writer);
    }
}

impl Serde for ComponentMessage {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        Self::write_header(self.node(), self.kind(), self.action_type(), writer);
        if let ComponentMessage::Updated { update, .. } = self {
            update.write(writer);
        }
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        let node = NodeId::de(reader)?;
        let kind = ComponentKind::de(reader)?;
        Ok(match ComponentActionType::de(reader)? {
            ComponentActionType::Created => ComponentMessage::Created { node, kind },
            ComponentActionType::Updated => ComponentMessage::Updated {
                node,
                update: ComponentUpdate::read(kind, reader)?,
            },
            ComponentActionType::Destroyed => ComponentMessage::Destroyed { node, kind },
        })
    }
}
