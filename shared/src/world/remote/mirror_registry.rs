use std::{collections::BTreeMap, hash::Hash};

use log::{debug, warn};

use super::error::RemoteWorldError;
use crate::{
    asset::{AssetCaches, AssetId, AssetProvider},
    messages::SyncMessage,
    types::NodeId,
    world::{
        component::{
            audio_source::AudioSourceData,
            change_flags::ChangeFlags,
            component_kind::ComponentKind,
            component_message::{ComponentMessage, ComponentUpdate},
            mesh_renderer::MeshRendererData,
            replicated_component::ReplicatedComponent,
            transform::{TransformChangeFlags, TransformState},
        },
        scene_type::SceneMutType,
    },
};

struct MirroredNode<E> {
    entity: E,
    transform: TransformState,
    mesh_renderer: Option<MeshRendererData<AssetId>>,
    audio_source: Option<AudioSourceData<AssetId>>,
}

/// Observer-side table of mirrored nodes, keyed by the source's node ids.
pub struct MirrorRegistry<E: Copy + Eq + Hash> {
    nodes: BTreeMap<NodeId, MirroredNode<E>>,
}

impl<E: Copy + Eq + Hash> Default for MirrorRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Copy + Eq + Hash> MirrorRegistry<E> {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: &NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    pub fn entity(&self, node: &NodeId) -> Option<E> {
        self.nodes.get(node).map(|mirror| mirror.entity)
    }

    pub fn transform(&self, node: &NodeId) -> Option<&TransformState> {
        self.nodes.get(node).map(|mirror| &mirror.transform)
    }

    pub fn mesh_renderer(&self, node: &NodeId) -> Option<&MeshRendererData<AssetId>> {
        self.nodes.get(node)?.mesh_renderer.as_ref()
    }

    pub fn audio_source(&self, node: &NodeId) -> Option<&AudioSourceData<AssetId>> {
        self.nodes.get(node)?.audio_source.as_ref()
    }

    /// Despawns every mirrored node
    pub fn clear<W: SceneMutType<E>>(&mut self, scene: &mut W) {
        // children before parents
        for (_, mirror) in std::mem::take(&mut self.nodes).into_iter().rev() {
            scene.despawn_node(&mirror.entity);
        }
    }

    /// Applies every message of a sync payload, in order. A message that fails is
    /// logged and skipped; the rest still apply.
    pub fn apply_sync<W: SceneMutType<E>>(
        &mut self,
        scene: &mut W,
        sync: SyncMessage,
        assets: &mut AssetCaches,
        provider: &dyn AssetProvider,
    ) -> Vec<RemoteWorldError> {
        let mut errors = Vec::new();
        for message in sync.components {
            if let Err(error) = self.apply(scene, message, assets, provider) {
                warn!("Dropping component message: {}", error);
                errors.push(error);
            }
        }
        errors
    }

    pub fn apply<W: SceneMutType<E>>(
        &mut self,
        scene: &mut W,
        message: ComponentMessage,
        assets: &mut AssetCaches,
        provider: &dyn AssetProvider,
    ) -> Result<(), RemoteWorldError> {
        match message {
            ComponentMessage::Created { node, kind } => self.create_component(scene, node, kind),
            ComponentMessage::Destroyed { node, kind } => self.destroy(scene, node, kind),
            ComponentMessage::Updated { node, update } => match update {
                ComponentUpdate::Transform(flags, state) => {
                    self.update_transform(scene, node, flags, state)
                }
                ComponentUpdate::MeshRenderer(flags, state) => {
                    let mirror = self.component_target(node)?;
                    let current = mirror.mesh_renderer.as_mut().ok_or(
                        RemoteWorldError::ComponentNotCreated {
                            node,
                            kind: ComponentKind::MeshRenderer,
                        },
                    )?;
                    current.assign(&state, flags);
                    let resolved = current
                        .map_assets(|kind, id| assets.get_asset(provider, kind, id));
                    scene.apply_mesh_renderer(&mirror.entity, &resolved);
                    Ok(())
                }
                ComponentUpdate::AudioSource(flags, state) => {
                    let mirror = self.component_target(node)?;
                    let current = mirror.audio_source.as_mut().ok_or(
                        RemoteWorldError::ComponentNotCreated {
                            node,
                            kind: ComponentKind::AudioSource,
                        },
                    )?;
                    current.assign(&state, flags);
                    let resolved = current
                        .map_assets(|kind, id| assets.get_asset(provider, kind, id));
                    scene.apply_audio_source(&mirror.entity, &resolved);
                    Ok(())
                }
            },
        }
    }

    fn component_target(
        &mut self,
        node: NodeId,
    ) -> Result<&mut MirroredNode<E>, RemoteWorldError> {
        self.nodes
            .get_mut(&node)
            .ok_or(RemoteWorldError::NodeNotFound {
                node,
                operation: "update component",
            })
    }

    fn create_component<W: SceneMutType<E>>(
        &mut self,
        scene: &mut W,
        node: NodeId,
        kind: ComponentKind,
    ) -> Result<(), RemoteWorldError> {
        let mirror = self
            .nodes
            .get_mut(&node)
            .ok_or(RemoteWorldError::NodeNotFound {
                node,
                operation: "create component",
            })?;
        let inserted = match kind {
            // the first full snapshot creates the transform
            ComponentKind::Transform => false,
            ComponentKind::MeshRenderer => insert_default(&mut mirror.mesh_renderer),
            ComponentKind::AudioSource => insert_default(&mut mirror.audio_source),
        };
        if inserted {
            scene.insert_component(&mirror.entity, kind);
        }
        Ok(())
    }

    fn destroy<W: SceneMutType<E>>(
        &mut self,
        scene: &mut W,
        node: NodeId,
        kind: ComponentKind,
    ) -> Result<(), RemoteWorldError> {
        if kind == ComponentKind::Transform {
            let mirror = self
                .nodes
                .remove(&node)
                .ok_or(RemoteWorldError::NodeNotFound {
                    node,
                    operation: "destroy",
                })?;
            debug!("Despawning mirror of node {}", node);
            scene.despawn_node(&mirror.entity);
            return Ok(());
        }

        let mirror = self
            .nodes
            .get_mut(&node)
            .ok_or(RemoteWorldError::NodeNotFound {
                node,
                operation: "destroy component",
            })?;
        let removed = match kind {
            ComponentKind::MeshRenderer => mirror.mesh_renderer.take().is_some(),
            ComponentKind::AudioSource => mirror.audio_source.take().is_some(),
            ComponentKind::Transform => false,
        };
        if removed {
            scene.remove_component(&mirror.entity, kind);
        }
        Ok(())
    }

    fn update_transform<W: SceneMutType<E>>(
        &mut self,
        scene: &mut W,
        node: NodeId,
        flags: TransformChangeFlags,
        state: TransformState,
    ) -> Result<(), RemoteWorldError> {
        let parent_entity = if flags.contains(TransformChangeFlags::PARENT) {
            match state.parent {
                Some(parent) => Some(Some(self.entity(&parent).ok_or(
                    RemoteWorldError::ParentNotFound { node, parent },
                )?)),
                None => Some(None),
            }
        } else {
            None
        };

        let entity = match self.nodes.get_mut(&node) {
            Some(mirror) => {
                mirror.transform.assign(&state, flags);
                mirror.entity
            }
            None => {
                if !flags.contains(TransformState::default().full_flags()) {
                    return Err(RemoteWorldError::IncompleteSnapshot { node });
                }
                let entity = scene.spawn_node();
                debug!("Spawned mirror of node {}", node);
                self.nodes.insert(
                    node,
                    MirroredNode {
                        entity,
                        transform: state.clone(),
                        mesh_renderer: None,
                        audio_source: None,
                    },
                );
                entity
            }
        };

        if flags.contains(TransformChangeFlags::NAME) {
            scene.set_name(&entity, &state.name);
        }
        if flags.contains(TransformChangeFlags::LAYER) {
            scene.set_layer(&entity, state.layer);
        }
        if let Some(parent) = parent_entity {
            scene.set_parent(&entity, parent.as_ref(), state.sibling_index);
        }
        if flags.contains(TransformChangeFlags::POSITION) {
            scene.set_position(&entity, state.position);
        }
        if flags.contains(TransformChangeFlags::ROTATION) {
            scene.set_rotation(&entity, state.rotation);
        }
        if flags.contains(TransformChangeFlags::SCALE) {
            scene.set_scale(&entity, state.scale);
        }
        if flags.contains(TransformChangeFlags::IS_ACTIVE) {
            scene.set_active(&entity, state.is_active);
        }
        if flags.contains(TransformChangeFlags::RECT_TRANSFORM) {
            if let Some(rect) = &state.rect {
                scene.set_rect(&entity, rect);
            }
        }
        Ok(())
    }
}

fn insert_default<T: Default>(slot: &mut Option<T>) -> bool {
    if slot.is_some() {
        return false;
    }
    *slot = Some(T::default());
    true
}
