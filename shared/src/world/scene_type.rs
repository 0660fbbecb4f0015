use glam::{Quat, Vec3};

use crate::{
    asset::{AssetHandle, MaterialPropertyDescriptor},
    world::component::{
        audio_source::AudioSourceData, component_kind::ComponentKind,
        material_property::MaterialPropertyValue, mesh_renderer::MeshRendererData,
        transform::RectState,
    },
};

/// How a node takes part in mirroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeTag {
    #[default]
    Untagged,
    /// The node and its whole subtree are never sent
    Hidden,
    /// The node is sent, but its children are not tracked automatically
    ChildrenHidden,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Read access to the scene a source mirrors
pub trait SceneRefType<E> {
    fn has_node(&self, node: &E) -> bool;
    fn root_nodes(&self) -> Vec<E>;
    fn children(&self, node: &E) -> Vec<E>;
    fn parent(&self, node: &E) -> Option<E>;
    fn sibling_index(&self, node: &E) -> i32;
    fn name(&self, node: &E) -> String;
    fn layer(&self, node: &E) -> i32;
    fn tag(&self, node: &E) -> NodeTag;
    fn active_self(&self, node: &E) -> bool;
    fn active_in_hierarchy(&self, node: &E) -> bool;
    fn local_pose(&self, node: &E) -> Pose;
    fn world_pose(&self, node: &E) -> Pose;
    fn rect(&self, node: &E) -> Option<RectState>;
    fn mesh_renderer(&self, node: &E) -> Option<MeshRendererData<AssetHandle>>;
    fn audio_source(&self, node: &E) -> Option<AudioSourceData<AssetHandle>>;

    /// Name of the shader `material` uses. Materials without one mirror no
    /// property values.
    fn material_shader(&self, _material: &AssetHandle) -> Option<String> {
        None
    }

    /// Current value of one property of `material`, or `None` if it has no such
    /// property
    fn material_property(
        &self,
        _material: &AssetHandle,
        _property: &MaterialPropertyDescriptor,
    ) -> Option<MaterialPropertyValue<AssetHandle>> {
        None
    }

    /// Whether the given component is enabled on the node
    fn component_enabled(&self, _node: &E, _kind: ComponentKind) -> bool {
        true
    }

    fn has_component(&self, node: &E, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Transform => self.has_node(node),
            ComponentKind::MeshRenderer => self.mesh_renderer(node).is_some(),
            ComponentKind::AudioSource => self.audio_source(node).is_some(),
        }
    }

    /// Pose of the camera observers should follow, if the scene has one
    fn camera_pose(&self) -> Option<(Vec3, Quat)> {
        None
    }
}

/// Write access to the scene an observer builds its mirror in
pub trait SceneMutType<E> {
    fn spawn_node(&mut self) -> E;
    fn despawn_node(&mut self, node: &E);
    fn set_name(&mut self, node: &E, name: &str);
    fn set_layer(&mut self, node: &E, layer: i32);
    /// `None` places the node at the root of the mirror
    fn set_parent(&mut self, node: &E, parent: Option<&E>, sibling_index: i32);
    fn set_position(&mut self, node: &E, position: Vec3);
    fn set_rotation(&mut self, node: &E, rotation: Quat);
    fn set_scale(&mut self, node: &E, scale: Vec3);
    fn set_active(&mut self, node: &E, active: bool);
    fn set_rect(&mut self, node: &E, rect: &RectState);
    fn insert_component(&mut self, node: &E, kind: ComponentKind);
    fn remove_component(&mut self, node: &E, kind: ComponentKind);
    fn apply_mesh_renderer(&mut self, node: &E, data: &MeshRendererData<AssetHandle>);
    fn apply_audio_source(&mut self, node: &E, data: &AudioSourceData<AssetHandle>);
}
