//! Simple scene implementation for observer-side testing
//! Applies every write and records it in an operation log.

use std::collections::{BTreeMap, BTreeSet};

use glam::{Quat, Vec3};

use mirror_shared::{
    AssetHandle, AudioSourceData, ComponentKind, MeshRendererData, RectState, SceneMutType,
};

#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct MirrorNode(pub u32);

/// Structural writes, in the order the observer made them
#[derive(Clone, Debug, PartialEq)]
pub enum SceneOp {
    Spawn(MirrorNode),
    Despawn(MirrorNode),
    SetParent(MirrorNode, Option<MirrorNode>),
    InsertComponent(MirrorNode, ComponentKind),
    RemoveComponent(MirrorNode, ComponentKind),
}

#[derive(Clone, Debug)]
pub struct MirrorNodeData {
    pub name: String,
    pub layer: i32,
    pub parent: Option<MirrorNode>,
    pub sibling_index: i32,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub active: bool,
    pub rect: Option<RectState>,
    pub components: BTreeSet<ComponentKind>,
    pub mesh_renderer: Option<MeshRendererData<AssetHandle>>,
    pub audio_source: Option<AudioSourceData<AssetHandle>>,
}

impl Default for MirrorNodeData {
    fn default() -> Self {
        Self {
            name: String::new(),
            layer: 0,
            parent: None,
            sibling_index: 0,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            active: true,
            rect: None,
            components: BTreeSet::new(),
            mesh_renderer: None,
            audio_source: None,
        }
    }
}

#[derive(Default)]
pub struct MirrorScene {
    nodes: BTreeMap<MirrorNode, MirrorNodeData>,
    next_node: u32,
    ops: Vec<SceneOp>,
}

impl MirrorScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, node: MirrorNode) -> Option<&MirrorNodeData> {
        self.nodes.get(&node)
    }

    pub fn find(&self, name: &str) -> Option<(MirrorNode, &MirrorNodeData)> {
        self.nodes
            .iter()
            .find(|(_, data)| data.name == name)
            .map(|(node, data)| (*node, data))
    }

    pub fn ops(&self) -> &[SceneOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    fn data_mut(&mut self, node: &MirrorNode) -> Option<&mut MirrorNodeData> {
        self.nodes.get_mut(node)
    }
}

impl SceneMutType<MirrorNode> for MirrorScene {
    fn spawn_node(&mut self) -> MirrorNode {
        let node = MirrorNode(self.next_node);
        self.next_node += 1;
        self.nodes.insert(node, MirrorNodeData::default());
        self.ops.push(SceneOp::Spawn(node));
        node
    }

    fn despawn_node(&mut self, node: &MirrorNode) {
        if self.nodes.remove(node).is_some() {
            self.ops.push(SceneOp::Despawn(*node));
        }
    }

    fn set_name(&mut self, node: &MirrorNode, name: &str) {
        if let Some(data) = self.data_mut(node) {
            data.name = name.to_string();
        }
    }

    fn set_layer(&mut self, node: &MirrorNode, layer: i32) {
        if let Some(data) = self.data_mut(node) {
            data.layer = layer;
        }
    }

    fn set_parent(&mut self, node: &MirrorNode, parent: Option<&MirrorNode>, sibling_index: i32) {
        if let Some(data) = self.data_mut(node) {
            data.parent = parent.copied();
            data.sibling_index = sibling_index;
        }
        self.ops.push(SceneOp::SetParent(*node, parent.copied()));
    }

    fn set_position(&mut self, node: &MirrorNode, position: Vec3) {
        if let Some(data) = self.data_mut(node) {
            data.position = position;
        }
    }

    fn set_rotation(&mut self, node: &MirrorNode, rotation: Quat) {
        if let Some(data) = self.data_mut(node) {
            data.rotation = rotation;
        }
    }

    fn set_scale(&mut self, node: &MirrorNode, scale: Vec3) {
        if let Some(data) = self.data_mut(node) {
            data.scale = scale;
        }
    }

    fn set_active(&mut self, node: &MirrorNode, active: bool) {
        if let Some(data) = self.data_mut(node) {
            data.active = active;
        }
    }

    fn set_rect(&mut self, node: &MirrorNode, rect: &RectState) {
        if let Some(data) = self.data_mut(node) {
            data.rect = Some(*rect);
        }
    }

    fn insert_component(&mut self, node: &MirrorNode, kind: ComponentKind) {
        if let Some(data) = self.data_mut(node) {
            data.components.insert(kind);
        }
        self.ops.push(SceneOp::InsertComponent(*node, kind));
    }

    fn remove_component(&mut self, node: &MirrorNode, kind: ComponentKind) {
        if let Some(data) = self.data_mut(node) {
            data.components.remove(&kind);
            match kind {
                ComponentKind::MeshRenderer => data.mesh_renderer = None,
                ComponentKind::AudioSource => data.audio_source = None,
                ComponentKind::Transform => {}
            }
        }
        self.ops.push(SceneOp::RemoveComponent(*node, kind));
    }

    fn apply_mesh_renderer(&mut self, node: &MirrorNode, data: &MeshRendererData<AssetHandle>) {
        if let Some(node) = self.data_mut(node) {
            node.mesh_renderer = Some(data.clone());
        }
    }

    fn apply_audio_source(&mut self, node: &MirrorNode, data: &AudioSourceData<AssetHandle>) {
        if let Some(node) = self.data_mut(node) {
            node.audio_source = Some(data.clone());
        }
    }
}
