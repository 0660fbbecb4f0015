use glam::{Quat, Vec2, Vec3};
use mirror_serde::{ByteWrite, Serde, SerdeErr, StreamReader};

use super::{
    change_flags::{define_change_flags, quat_changed, vec2_changed, vec3_changed, ChangeFlags},
    component_kind::ComponentKind,
    replicated_component::ReplicatedComponent,
};
use crate::types::NodeId;

define_change_flags! {
    /// Fields of [`TransformState`]. Bit order is wire order.
    TransformChangeFlags {
        NAME = 0x01;
        LAYER = 0x02;
        /// Parent id and sibling index travel together
        PARENT = 0x04;
        POSITION = 0x08;
        ROTATION = 0x10;
        SCALE = 0x20;
        IS_ACTIVE = 0x40;
        RECT_TRANSFORM = 0x80;
    }
}

/// Layout rectangle carried by UI nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectState {
    pub anchor_min: Vec2,
    pub anchor_max: Vec2,
    pub anchored_position: Vec2,
    pub size_delta: Vec2,
    pub pivot: Vec2,
}

impl RectState {
    pub fn changed_from(&self, previous: &RectState, epsilon: f32) -> bool {
        vec2_changed(self.anchor_min, previous.anchor_min, epsilon)
            || vec2_changed(self.anchor_max, previous.anchor_max, epsilon)
            || vec2_changed(self.anchored_position, previous.anchored_position, epsilon)
            || vec2_changed(self.size_delta, previous.size_delta, epsilon)
            || vec2_changed(self.pivot, previous.pivot, epsilon)
    }
}

impl Default for RectState {
    fn default() -> Self {
        Self {
            anchor_min: Vec2::splat(0.5),
            anchor_max: Vec2::splat(0.5),
            anchored_position: Vec2::ZERO,
            size_delta: Vec2::new(100.0, 100.0),
            pivot: Vec2::splat(0.5),
        }
    }
}

impl Serde for RectState {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.anchor_min.ser(writer);
        self.anchor_max.ser(writer);
        self.anchored_position.ser(writer);
        self.size_delta.ser(writer);
        self.pivot.ser(writer);
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            anchor_min: Vec2::de(reader)?,
            anchor_max: Vec2::de(reader)?,
            anchored_position: Vec2::de(reader)?,
            size_delta: Vec2::de(reader)?,
            pivot: Vec2::de(reader)?,
        })
    }
}

/// Replicated state of a node's transform. Every mirrored node has exactly one,
/// and its first full snapshot is what creates the node on an observer.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformState {
    pub name: String,
    pub layer: i32,
    pub parent: Option<NodeId>,
    pub sibling_index: i32,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub is_active: bool,
    pub rect: Option<RectState>,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            name: String::new(),
            layer: 0,
            parent: None,
            sibling_index: 0,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            is_active: true,
            rect: None,
        }
    }
}

impl ReplicatedComponent for TransformState {
    type Flags = TransformChangeFlags;

    const KIND: ComponentKind = ComponentKind::Transform;

    const EXPLICIT_CREATION: bool = false;

    fn diff(&self, previous: &Self, epsilon: f32) -> TransformChangeFlags {
        let mut flags = TransformChangeFlags::default();
        if self.name != previous.name {
            flags |= TransformChangeFlags::NAME;
        }
        if self.layer != previous.layer {
            flags |= TransformChangeFlags::LAYER;
        }
        if self.parent != previous.parent || self.sibling_index != previous.sibling_index {
            flags |= TransformChangeFlags::PARENT;
        }
        if vec3_changed(self.position, previous.position, epsilon) {
            flags |= TransformChangeFlags::POSITION;
        }
        if quat_changed(self.rotation, previous.rotation, epsilon) {
            flags |= TransformChangeFlags::ROTATION;
        }
        if vec3_changed(self.scale, previous.scale, epsilon) {
            flags |= TransformChangeFlags::SCALE;
        }
        if self.is_active != previous.is_active {
            flags |= TransformChangeFlags::IS_ACTIVE;
        }
        match (&self.rect, &previous.rect) {
            (Some(current), Some(previous)) if current.changed_from(previous, epsilon) => {
                flags |= TransformChangeFlags::RECT_TRANSFORM;
            }
            (Some(_), None) => {
                flags |= TransformChangeFlags::RECT_TRANSFORM;
            }
            _ => {}
        }
        flags
    }

    fn full_flags(&self) -> TransformChangeFlags {
        let mut flags = TransformChangeFlags::NAME
            | TransformChangeFlags::LAYER
            | TransformChangeFlags::PARENT
            | TransformChangeFlags::POSITION
            | TransformChangeFlags::ROTATION
            | TransformChangeFlags::SCALE
            | TransformChangeFlags::IS_ACTIVE;
        if self.rect.is_some() {
            flags |= TransformChangeFlags::RECT_TRANSFORM;
        }
        flags
    }

    fn assign(&mut self, source: &Self, flags: TransformChangeFlags) {
        if flags.contains(TransformChangeFlags::NAME) {
            self.name.clone_from(&source.name);
        }
        if flags.contains(TransformChangeFlags::LAYER) {
            self.layer = source.layer;
        }
        if flags.contains(TransformChangeFlags::PARENT) {
            self.parent = source.parent;
            self.sibling_index = source.sibling_index;
        }
        if flags.contains(TransformChangeFlags::POSITION) {
            self.position = source.position;
        }
        if flags.contains(TransformChangeFlags::ROTATION) {
            self.rotation = source.rotation;
        }
        if flags.contains(TransformChangeFlags::SCALE) {
            self.scale = source.scale;
        }
        if flags.contains(TransformChangeFlags::IS_ACTIVE) {
            self.is_active = source.is_active;
        }
        if flags.contains(TransformChangeFlags::RECT_TRANSFORM) {
            self.rect = source.rect;
        }
    }

    fn write_fields(&self, flags: TransformChangeFlags, writer: &mut dyn ByteWrite) {
        if flags.contains(TransformChangeFlags::NAME) {
            self.name.ser(writer);
        }
        if flags.contains(TransformChangeFlags::LAYER) {
            self.layer.ser(writer);
        }
        if flags.contains(TransformChangeFlags::PARENT) {
            NodeId::ser_nullable(&self.parent, writer);
            self.sibling_index.ser(writer);
        }
        if flags.contains(TransformChangeFlags::POSITION) {
            self.position.ser(writer);
        }
        if flags.contains(TransformChangeFlags::ROTATION) {
            self.rotation.ser(writer);
        }
        if flags.contains(TransformChangeFlags::SCALE) {
            self.scale.ser(writer);
        }
        if flags.contains(TransformChangeFlags::IS_ACTIVE) {
            self.is_active.ser(writer);
        }
        if flags.contains(TransformChangeFlags::RECT_TRANSFORM) {
            self.rect.unwrap_or_default().ser(writer);
        }
    }

    fn read_fields(
        &mut self,
        flags: TransformChangeFlags,
        reader: &mut StreamReader,
    ) -> Result<(), SerdeErr> {
        if flags.contains(TransformChangeFlags::NAME) {
            self.name = String::de(reader)?;
        }
        if flags.contains(TransformChangeFlags::LAYER) {
            self.layer = i32::de(reader)?;
        }
        if flags.contains(TransformChangeFlags::PARENT) {
            self.parent = NodeId::de_nullable(reader)?;
            self.sibling_index = i32::de(reader)?;
        }
        if flags.contains(TransformChangeFlags::POSITION) {
            self.position = Vec3::de(reader)?;
        }
        if flags.contains(TransformChangeFlags::ROTATION) {
            self.rotation = Quat::de(reader)?;
        }
        if flags.contains(TransformChangeFlags::SCALE) {
            self.scale = Vec3::de(reader)?;
        }
        if flags.contains(TransformChangeFlags::IS_ACTIVE) {
            self.is_active = bool::de(reader)?;
        }
        if flags.contains(TransformChangeFlags::RECT_TRANSFORM) {
            self.rect = Some(RectState::de(reader)?);
        }
        Ok(())
    }
}
