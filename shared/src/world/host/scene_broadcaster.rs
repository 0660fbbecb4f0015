use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    hash::Hash,
    net::SocketAddr,
};

use log::{debug, warn};

use super::{
    broadcast_config::{BroadcastConfig, PerformanceParameters, PollingFrequency},
    broadcast_context::BroadcastContext,
    component_broadcaster::ComponentBroadcaster,
    error::BroadcastError,
    node_id_generator::NodeIdGenerator,
};
use crate::{
    asset::{AssetHandle, AssetId, MaterialPropertyCache},
    backends::Instant,
    connection::connection_delta::ConnectionDelta,
    perf::PerfCounter,
    types::NodeId,
    world::{
        component::{
            audio_source::AudioSourceData,
            change_flags::ChangeFlags,
            component_kind::ComponentKind,
            material_property::MaterialProperty,
            mesh_renderer::{MeshRendererChangeFlags, MeshRendererData},
            replicated_component::ReplicatedComponent,
            transform::{TransformChangeFlags, TransformState},
        },
        scene_type::{NodeTag, SceneRefType},
    },
};

struct NodeRecord<E> {
    entity: E,
    parent: Option<NodeId>,
    transform: ComponentBroadcaster<TransformState>,
    mesh_renderer: Option<ComponentBroadcaster<MeshRendererData<AssetId>>>,
    audio_source: Option<ComponentBroadcaster<AudioSourceData<AssetId>>>,
    blocked: BTreeSet<SocketAddr>,
    performance: PerformanceParameters,
    components_checked: bool,
    needs_component_check: bool,
    completed_this_frame: bool,
}

impl<E> NodeRecord<E> {
    fn new(id: NodeId, entity: E, parent: Option<NodeId>) -> Self {
        Self {
            entity,
            parent,
            transform: ComponentBroadcaster::new(id),
            mesh_renderer: None,
            audio_source: None,
            blocked: BTreeSet::new(),
            performance: PerformanceParameters::default(),
            components_checked: false,
            needs_component_check: false,
            completed_this_frame: false,
        }
    }

    fn reset_frame(&mut self) {
        self.completed_this_frame = false;
        self.transform.reset_frame();
        if let Some(broadcaster) = &mut self.mesh_renderer {
            broadcaster.reset_frame();
        }
        if let Some(broadcaster) = &mut self.audio_source {
            broadcaster.reset_frame();
        }
    }
}

/// Mirrors a scene hierarchy to every ready connection.
///
/// Each frame it tears down nodes that left the scene, tracks new nodes
/// (parents before children, so ids follow depth), then completes every node in
/// id order. A node always completes its parent first and its transform before
/// its other components, so an observer never sees a child before its parent.
pub struct SceneBroadcaster<E: Copy + Eq + Hash> {
    config: BroadcastConfig,
    id_generator: NodeIdGenerator,
    entities: HashMap<E, NodeId>,
    nodes: BTreeMap<NodeId, NodeRecord<E>>,
    eligibility: HashMap<(NodeId, SocketAddr), bool>,
    material_properties: MaterialPropertyCache,
}

impl<E: Copy + Eq + Hash> SceneBroadcaster<E> {
    pub fn new(config: BroadcastConfig) -> Self {
        Self {
            config,
            id_generator: NodeIdGenerator::new(),
            entities: HashMap::new(),
            nodes: BTreeMap::new(),
            eligibility: HashMap::new(),
            material_properties: MaterialPropertyCache::new(),
        }
    }

    pub fn config(&self) -> &BroadcastConfig {
        &self.config
    }

    /// Which shader properties are mirrored for mesh renderer materials
    pub fn material_properties_mut(&mut self) -> &mut MaterialPropertyCache {
        &mut self.material_properties
    }

    pub fn node_id(&self, entity: &E) -> Option<NodeId> {
        self.entities.get(entity).copied()
    }

    pub fn entity(&self, id: &NodeId) -> Option<E> {
        self.nodes.get(id).map(|record| record.entity)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Starts mirroring `entity`, tracking its ancestors first
    pub fn track_node<S: SceneRefType<E>>(
        &mut self,
        scene: &S,
        entity: &E,
    ) -> Result<NodeId, BroadcastError> {
        if let Some(id) = self.entities.get(entity) {
            return Ok(*id);
        }
        if !scene.has_node(entity) {
            return Err(BroadcastError::NodeNotInScene);
        }
        let parent = match scene.parent(entity) {
            Some(parent) => Some(self.track_node(scene, &parent)?),
            None => None,
        };
        let id = self.id_generator.generate()?;
        debug!("Tracking node {} (parent {:?})", id, parent);
        self.entities.insert(*entity, id);
        self.nodes.insert(id, NodeRecord::new(id, *entity, parent));
        Ok(id)
    }

    pub fn block_connection(&mut self, entity: &E, address: SocketAddr) -> bool {
        match self.record_mut(entity) {
            Some(record) => record.blocked.insert(address),
            None => false,
        }
    }

    pub fn unblock_connection(&mut self, entity: &E, address: &SocketAddr) -> bool {
        match self.record_mut(entity) {
            Some(record) => record.blocked.remove(address),
            None => false,
        }
    }

    pub fn set_performance_parameters(
        &mut self,
        entity: &E,
        parameters: PerformanceParameters,
    ) -> bool {
        match self.record_mut(entity) {
            Some(record) => {
                record.performance = parameters;
                record.needs_component_check = true;
                true
            }
            None => false,
        }
    }

    /// Re-arms component discovery for a node whose polling would otherwise skip it
    pub fn notify_components_changed(&mut self, entity: &E) -> bool {
        match self.record_mut(entity) {
            Some(record) => {
                record.needs_component_check = true;
                true
            }
            None => false,
        }
    }

    fn record_mut(&mut self, entity: &E) -> Option<&mut NodeRecord<E>> {
        let id = self.entities.get(entity)?;
        self.nodes.get_mut(id)
    }

    /// Runs one frame of replication into `context.outbox`
    pub fn update<S: SceneRefType<E>>(
        &mut self,
        scene: &S,
        delta: &ConnectionDelta,
        context: &mut BroadcastContext,
    ) {
        self.eligibility.clear();
        for record in self.nodes.values_mut() {
            record.reset_frame();
        }

        self.remove_destroyed(scene, delta, context);

        if self.config.broadcast_all_nodes && delta.has_connections() {
            for root in scene.root_nodes() {
                if let Err(error) = self.track_node(scene, &root) {
                    warn!("Cannot track scene root: {}", error);
                }
            }
        }
        self.track_hierarchy(scene);

        let ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        for id in ids {
            self.complete_node(scene, id, delta, context);
        }
    }

    fn remove_destroyed<S: SceneRefType<E>>(
        &mut self,
        scene: &S,
        delta: &ConnectionDelta,
        context: &mut BroadcastContext,
    ) {
        let destroyed: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, record)| !scene.has_node(&record.entity))
            .map(|(id, _)| *id)
            .collect();

        // children carry higher ids, so they go first
        for id in destroyed.into_iter().rev() {
            let Some(record) = self.nodes.remove(&id) else {
                continue;
            };
            self.entities.remove(&record.entity);
            self.id_generator.release(id);
            let told = record.transform.send_destroyed(delta, context.outbox);
            context.perf.increment(ComponentKind::Transform, PerfCounter::Destroyed);
            debug!("Node {} left the scene, tore down {} mirrors", id, told);
        }
    }

    /// Tracks the parent and children of every tracked node until nothing new
    /// turns up, and refreshes each node's cached parent
    fn track_hierarchy<S: SceneRefType<E>>(&mut self, scene: &S) {
        let mut queue: Vec<NodeId> = self.nodes.keys().copied().collect();
        while let Some(id) = queue.pop() {
            let Some(entity) = self.entity(&id) else {
                continue;
            };
            if !scene.has_node(&entity) {
                continue;
            }

            let parent = match scene.parent(&entity) {
                Some(parent_entity) => match self.track_node(scene, &parent_entity) {
                    Ok(parent) => Some(parent),
                    Err(error) => {
                        warn!("Cannot track parent of node {}: {}", id, error);
                        continue;
                    }
                },
                None => None,
            };
            if let Some(record) = self.nodes.get_mut(&id) {
                record.parent = parent;
            }

            if scene.tag(&entity) == NodeTag::ChildrenHidden {
                continue;
            }
            for child in scene.children(&entity) {
                if self.entities.contains_key(&child) {
                    continue;
                }
                match self.track_node(scene, &child) {
                    Ok(child_id) => queue.push(child_id),
                    Err(error) => warn!("Cannot track child of node {}: {}", id, error),
                }
            }
        }
    }

    /// Whether `address` may receive `id` this frame. False if the node is
    /// hidden, the connection is blocked for it, or the same holds for an ancestor.
    fn is_eligible<S: SceneRefType<E>>(
        &mut self,
        scene: &S,
        id: NodeId,
        address: &SocketAddr,
        context: &mut BroadcastContext,
    ) -> bool {
        if let Some(eligible) = self.eligibility.get(&(id, *address)) {
            return *eligible;
        }
        let Some(record) = self.nodes.get(&id) else {
            return false;
        };
        let parent = record.parent;
        let eligible = if record.blocked.contains(address) {
            context
                .perf
                .increment(ComponentKind::Transform, PerfCounter::BlockedConnection);
            false
        } else if scene.tag(&record.entity) == NodeTag::Hidden {
            false
        } else {
            match parent {
                Some(parent) => self.is_eligible(scene, parent, address, context),
                None => true,
            }
        };
        self.eligibility.insert((id, *address), eligible);
        eligible
    }

    fn resolve_polling(&self, id: NodeId) -> PollingFrequency {
        let mut current = Some(id);
        while let Some(id) = current {
            let Some(record) = self.nodes.get(&id) else {
                break;
            };
            match record.performance.component_polling {
                PollingFrequency::InheritFromParent => current = record.parent,
                frequency => return frequency,
            }
        }
        match self.config.default_component_polling {
            PollingFrequency::InheritFromParent => PollingFrequency::UpdateContinuously,
            frequency => frequency,
        }
    }

    fn complete_node<S: SceneRefType<E>>(
        &mut self,
        scene: &S,
        id: NodeId,
        delta: &ConnectionDelta,
        context: &mut BroadcastContext,
    ) {
        let Some(record) = self.nodes.get_mut(&id) else {
            return;
        };
        if record.completed_this_frame {
            return;
        }
        record.completed_this_frame = true;
        let entity = record.entity;
        let parent = record.parent;

        if let Some(parent) = parent {
            self.complete_node(scene, parent, delta, context);
        }

        if !scene.has_node(&entity) {
            return;
        }

        let eligibility: BTreeMap<SocketAddr, bool> = delta
            .live()
            .map(|address| (*address, self.is_eligible(scene, id, address, context)))
            .collect();
        let eligible =
            |address: &SocketAddr| eligibility.get(address).copied().unwrap_or(false);

        self.complete_transform(scene, id, &entity, parent, delta, &eligible, context);
        self.discover_components(scene, id, &entity, delta, context);
        self.complete_components(scene, id, &entity, delta, &eligible, context);
    }

    #[allow(clippy::too_many_arguments)]
    fn complete_transform<S: SceneRefType<E>>(
        &mut self,
        scene: &S,
        id: NodeId,
        entity: &E,
        parent: Option<NodeId>,
        delta: &ConnectionDelta,
        eligible: &dyn Fn(&SocketAddr) -> bool,
        context: &mut BroadcastContext,
    ) {
        let started = Instant::now();

        let (pose, is_active) = if parent.is_none() {
            (scene.world_pose(entity), scene.active_in_hierarchy(entity))
        } else {
            (scene.local_pose(entity), scene.active_self(entity))
        };
        let state = TransformState {
            name: scene.name(entity),
            layer: scene.layer(entity),
            parent,
            sibling_index: scene.sibling_index(entity),
            position: pose.position,
            rotation: pose.rotation,
            scale: pose.scale,
            is_active,
            rect: scene.rect(entity),
        };
        let mask = if scene.active_in_hierarchy(entity) {
            None
        } else {
            Some(TransformChangeFlags::IS_ACTIVE)
        };

        if let Some(record) = self.nodes.get_mut(&id) {
            record.transform.on_frame_completed(
                &state,
                delta,
                eligible,
                mask,
                context.outbox,
                context.perf,
                &self.config,
            );
        }

        context
            .perf
            .record_duration(ComponentKind::Transform, started.elapsed(&Instant::now()));
    }

    fn discover_components<S: SceneRefType<E>>(
        &mut self,
        scene: &S,
        id: NodeId,
        entity: &E,
        delta: &ConnectionDelta,
        context: &mut BroadcastContext,
    ) {
        let polling = self.resolve_polling(id);
        let Some(record) = self.nodes.get_mut(&id) else {
            return;
        };
        let due = match polling {
            PollingFrequency::UpdateOnceOnStart => {
                !record.components_checked || record.needs_component_check
            }
            _ => true,
        };
        if !due {
            return;
        }

        let mut changed = false;
        changed |= sync_slot(
            &mut record.mesh_renderer,
            scene.has_component(entity, ComponentKind::MeshRenderer),
            id,
            delta,
            context,
        );
        changed |= sync_slot(
            &mut record.audio_source,
            scene.has_component(entity, ComponentKind::AudioSource),
            id,
            delta,
            context,
        );
        record.components_checked = true;
        record.needs_component_check = changed;
    }

    fn complete_components<S: SceneRefType<E>>(
        &mut self,
        scene: &S,
        id: NodeId,
        entity: &E,
        delta: &ConnectionDelta,
        eligible: &dyn Fn(&SocketAddr) -> bool,
        context: &mut BroadcastContext,
    ) {
        let Some(record) = self.nodes.get_mut(&id) else {
            return;
        };

        if let Some(broadcaster) = &mut record.mesh_renderer {
            let started = Instant::now();
            match scene.mesh_renderer(entity) {
                Some(mut data) => {
                    let shaders = if self.config.synchronize_material_properties {
                        let (properties, shaders) = read_material_properties(
                            scene,
                            &self.material_properties,
                            &data.materials,
                        );
                        data.material_properties = properties;
                        shaders
                    } else {
                        data.material_properties.clear();
                        Vec::new()
                    };
                    let state = data.map_assets(|kind, handle| {
                        context.assets.get_asset_id(context.provider, kind, *handle)
                    });
                    let changed: Vec<(i32, String)> = state
                        .changed_material_properties(broadcaster.last_sent())
                        .map(|property| (property.slot, property.name.clone()))
                        .collect();

                    let outcome = broadcaster.on_frame_completed(
                        &state,
                        delta,
                        eligible,
                        None,
                        context.outbox,
                        context.perf,
                        &self.config,
                    );
                    let flags = outcome.delta_flags.unwrap_or_default();
                    let materials_sent = !outcome.full_recipients.is_empty()
                        || flags.contains(MeshRendererChangeFlags::MATERIALS);
                    if materials_sent {
                        context.perf.add_materials_updated(state.materials.len());
                        for property in &state.material_properties {
                            count_property_update(
                                context,
                                &shaders,
                                property.slot,
                                &property.name,
                            );
                        }
                    } else if flags.contains(MeshRendererChangeFlags::MATERIAL_PROPERTIES) {
                        for (slot, name) in &changed {
                            count_property_update(context, &shaders, *slot, name);
                        }
                    }
                }
                None => broadcaster.skip_frame(delta),
            }
            context.perf.record_duration(
                ComponentKind::MeshRenderer,
                started.elapsed(&Instant::now()),
            );
        }

        if let Some(broadcaster) = &mut record.audio_source {
            let started = Instant::now();
            let enabled = scene.component_enabled(entity, ComponentKind::AudioSource);
            let data = if enabled || AudioSourceData::<AssetId>::UPDATES_WHILE_DISABLED {
                scene.audio_source(entity)
            } else {
                None
            };
            match data {
                Some(data) => {
                    let state = data.map_assets(|kind, handle| {
                        context.assets.get_asset_id(context.provider, kind, *handle)
                    });
                    broadcaster.on_frame_completed(
                        &state,
                        delta,
                        eligible,
                        None,
                        context.outbox,
                        context.perf,
                        &self.config,
                    );
                }
                None => broadcaster.skip_frame(delta),
            }
            context.perf.record_duration(
                ComponentKind::AudioSource,
                started.elapsed(&Instant::now()),
            );
        }
    }
}

/// Reads the mirrored properties of every material slot, along with the shader
/// each slot uses
fn read_material_properties<E, S: SceneRefType<E>>(
    scene: &S,
    cache: &MaterialPropertyCache,
    materials: &[Option<AssetHandle>],
) -> (Vec<MaterialProperty<AssetHandle>>, Vec<Option<String>>) {
    let mut properties = Vec::new();
    let mut shaders = Vec::with_capacity(materials.len());
    for (slot, material) in materials.iter().enumerate() {
        let shader = material
            .as_ref()
            .and_then(|material| scene.material_shader(material));
        if let (Some(material), Some(shader)) = (material, &shader) {
            for descriptor in cache.properties(shader) {
                if let Some(value) = scene.material_property(material, descriptor) {
                    properties.push(MaterialProperty {
                        slot: slot as i32,
                        name: descriptor.name.clone(),
                        value,
                    });
                }
            }
        }
        shaders.push(shader);
    }
    (properties, shaders)
}

fn count_property_update(
    context: &mut BroadcastContext,
    shaders: &[Option<String>],
    slot: i32,
    name: &str,
) {
    let shader = usize::try_from(slot)
        .ok()
        .and_then(|slot| shaders.get(slot))
        .and_then(Option::as_deref)
        .unwrap_or_default();
    context.perf.flag_material_property_updated(shader, name);
}

/// Creates or drops a component broadcaster to match the scene. Returns true if
/// the slot changed.
fn sync_slot<C: ReplicatedComponent>(
    slot: &mut Option<ComponentBroadcaster<C>>,
    present: bool,
    id: NodeId,
    delta: &ConnectionDelta,
    context: &mut BroadcastContext,
) -> bool {
    match (slot.is_some(), present) {
        (false, true) => {
            debug!("Node {} gained a {}", id, C::KIND);
            *slot = Some(ComponentBroadcaster::new(id));
            true
        }
        (true, false) => {
            if let Some(broadcaster) = slot.take() {
                broadcaster.send_destroyed(delta, context.outbox);
            }
            debug!("Node {} lost its {}", id, C::KIND);
            true
        }
        _ => false,
    }
}
