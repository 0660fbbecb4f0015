use mirror_serde::{ByteWrite, Serde, SerdeErr, StreamReader};

use super::{
    change_flags::{define_change_flags, ChangeFlags},
    component_kind::ComponentKind,
    material_property::{read_count, MaterialProperty},
    replicated_component::ReplicatedComponent,
};
use crate::asset::{AssetId, AssetKind};

define_change_flags! {
    MeshRendererChangeFlags {
        ENABLED = 0x01;
        MESH = 0x02;
        MATERIALS = 0x04;
        /// Property values of the materials. Deltas carry only the properties
        /// that changed.
        MATERIAL_PROPERTIES = 0x08;
    }
}

/// Mesh renderer state, generic over how assets are referenced: engine handles
/// on the scene side, [`AssetId`]s on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRendererData<A> {
    pub enabled: bool,
    pub mesh: Option<A>,
    pub materials: Vec<Option<A>>,
    /// Mirrored property values, keyed by material slot and property name.
    /// Filled in by the broadcaster, not read from the scene's renderer.
    pub material_properties: Vec<MaterialProperty<A>>,
}

impl<A> Default for MeshRendererData<A> {
    fn default() -> Self {
        Self {
            enabled: true,
            mesh: None,
            materials: Vec::new(),
            material_properties: Vec::new(),
        }
    }
}

impl<A> MeshRendererData<A> {
    /// Converts every asset reference with `resolve`. References that fail to
    /// resolve become empty slots.
    pub fn map_assets<B>(
        &self,
        mut resolve: impl FnMut(AssetKind, &A) -> Option<B>,
    ) -> MeshRendererData<B> {
        MeshRendererData {
            enabled: self.enabled,
            mesh: self
                .mesh
                .as_ref()
                .and_then(|mesh| resolve(AssetKind::Mesh, mesh)),
            materials: self
                .materials
                .iter()
                .map(|material| {
                    material
                        .as_ref()
                        .and_then(|material| resolve(AssetKind::Material, material))
                })
                .collect(),
            material_properties: self
                .material_properties
                .iter()
                .map(|property| MaterialProperty {
                    slot: property.slot,
                    name: property.name.clone(),
                    value: property.value.map_assets(&mut resolve),
                })
                .collect(),
        }
    }

    pub fn material_property(&self, slot: i32, name: &str) -> Option<&MaterialProperty<A>> {
        self.material_properties
            .iter()
            .find(|property| property.slot == slot && property.name == name)
    }
}

impl<A: PartialEq> MeshRendererData<A> {
    /// Properties that are new or hold a different value than in `previous`
    pub fn changed_material_properties<'a>(
        &'a self,
        previous: &'a Self,
    ) -> impl Iterator<Item = &'a MaterialProperty<A>> + 'a {
        self.material_properties.iter().filter(move |property| {
            previous
                .material_property(property.slot, &property.name)
                .map_or(true, |known| known.value != property.value)
        })
    }

    fn upsert_material_properties(&mut self, properties: &[MaterialProperty<A>])
    where
        A: Clone,
    {
        for property in properties {
            match self
                .material_properties
                .iter_mut()
                .find(|known| known.same_key(property))
            {
                Some(known) => known.value.clone_from(&property.value),
                None => self.material_properties.push(property.clone()),
            }
        }
    }
}

impl ReplicatedComponent for MeshRendererData<AssetId> {
    type Flags = MeshRendererChangeFlags;

    const KIND: ComponentKind = ComponentKind::MeshRenderer;

    fn diff(&self, previous: &Self, _epsilon: f32) -> MeshRendererChangeFlags {
        let mut flags = MeshRendererChangeFlags::default();
        if self.enabled != previous.enabled {
            flags |= MeshRendererChangeFlags::ENABLED;
        }
        if self.mesh != previous.mesh {
            flags |= MeshRendererChangeFlags::MESH;
        }
        if self.materials != previous.materials {
            // a new material list drops every property value on the other end
            flags |= MeshRendererChangeFlags::MATERIALS;
            if !self.material_properties.is_empty() {
                flags |= MeshRendererChangeFlags::MATERIAL_PROPERTIES;
            }
        } else if self.changed_material_properties(previous).next().is_some() {
            flags |= MeshRendererChangeFlags::MATERIAL_PROPERTIES;
        }
        flags
    }

    fn assign(&mut self, source: &Self, flags: MeshRendererChangeFlags) {
        if flags.contains(MeshRendererChangeFlags::ENABLED) {
            self.enabled = source.enabled;
        }
        if flags.contains(MeshRendererChangeFlags::MESH) {
            self.mesh.clone_from(&source.mesh);
        }
        if flags.contains(MeshRendererChangeFlags::MATERIALS) {
            self.materials.clone_from(&source.materials);
            self.material_properties.clear();
        }
        if flags.contains(MeshRendererChangeFlags::MATERIAL_PROPERTIES) {
            self.upsert_material_properties(&source.material_properties);
        }
    }

    fn delta_state(&self, previous: &Self, flags: MeshRendererChangeFlags) -> Option<Self> {
        if !flags.contains(MeshRendererChangeFlags::MATERIAL_PROPERTIES)
            || flags.contains(MeshRendererChangeFlags::MATERIALS)
        {
            return None;
        }
        let changed = self.changed_material_properties(previous).cloned().collect();
        Some(Self {
            enabled: self.enabled,
            mesh: self.mesh.clone(),
            materials: self.materials.clone(),
            material_properties: changed,
        })
    }

    fn write_fields(&self, flags: MeshRendererChangeFlags, writer: &mut dyn ByteWrite) {
        if flags.contains(MeshRendererChangeFlags::ENABLED) {
            self.enabled.ser(writer);
        }
        if flags.contains(MeshRendererChangeFlags::MESH) {
            self.mesh.ser(writer);
        }
        if flags.contains(MeshRendererChangeFlags::MATERIALS) {
            (self.materials.len() as i32).ser(writer);
            for material in &self.materials {
                material.ser(writer);
            }
        }
        if flags.contains(MeshRendererChangeFlags::MATERIAL_PROPERTIES) {
            (self.material_properties.len() as i32).ser(writer);
            for property in &self.material_properties {
                property.ser(writer);
            }
        }
    }

    fn read_fields(
        &mut self,
        flags: MeshRendererChangeFlags,
        reader: &mut StreamReader,
    ) -> Result<(), SerdeErr> {
        if flags.contains(MeshRendererChangeFlags::ENABLED) {
            self.enabled = bool::de(reader)?;
        }
        if flags.contains(MeshRendererChangeFlags::MESH) {
            self.mesh = Option::<AssetId>::de(reader)?;
        }
        if flags.contains(MeshRendererChangeFlags::MATERIALS) {
            // each entry is at least its presence byte
            let count = read_count(reader, "material count")?;
            let mut materials = Vec::with_capacity(count);
            for _ in 0..count {
                materials.push(Option::<AssetId>::de(reader)?);
            }
            self.materials = materials;
        }
        if flags.contains(MeshRendererChangeFlags::MATERIAL_PROPERTIES) {
            let count = read_count(reader, "material property count")?;
            let mut properties = Vec::with_capacity(count);
            for _ in 0..count {
                properties.push(MaterialProperty::de(reader)?);
            }
            self.material_properties = properties;
        }
        Ok(())
    }
}
