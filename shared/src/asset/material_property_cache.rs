use std::collections::HashMap;

use log::debug;

pub const RENDER_QUEUE_PROPERTY: &str = "renderQueue";
pub const SHADER_KEYWORDS_PROPERTY: &str = "shaderKeywords";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialPropertyType {
    Color,
    Vector,
    Float,
    Range,
    Texture,
    RenderQueue,
    ShaderKeywords,
}

/// A shader property that gets mirrored
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MaterialPropertyDescriptor {
    pub name: String,
    pub property_type: MaterialPropertyType,
}

impl MaterialPropertyDescriptor {
    pub fn new(name: &str, property_type: MaterialPropertyType) -> Self {
        Self {
            name: name.to_string(),
            property_type,
        }
    }
}

/// Which properties are mirrored for materials of each shader.
///
/// Every material gets the render queue and shader keywords. Shaders add the
/// properties registered for them, collected ahead of time by the host, plus
/// any custom per-instance properties.
pub struct MaterialPropertyCache {
    universal: [MaterialPropertyDescriptor; 2],
    by_shader: HashMap<String, Vec<MaterialPropertyDescriptor>>,
    custom_by_shader: HashMap<String, Vec<MaterialPropertyDescriptor>>,
}

impl Default for MaterialPropertyCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialPropertyCache {
    pub fn new() -> Self {
        Self {
            universal: [
                MaterialPropertyDescriptor::new(
                    RENDER_QUEUE_PROPERTY,
                    MaterialPropertyType::RenderQueue,
                ),
                MaterialPropertyDescriptor::new(
                    SHADER_KEYWORDS_PROPERTY,
                    MaterialPropertyType::ShaderKeywords,
                ),
            ],
            by_shader: HashMap::new(),
            custom_by_shader: HashMap::new(),
        }
    }

    /// Sets the properties mirrored for `shader`, replacing earlier ones.
    /// Duplicate names keep their first entry.
    pub fn register_shader(&mut self, shader: &str, properties: Vec<MaterialPropertyDescriptor>) {
        let mut unique: Vec<MaterialPropertyDescriptor> = Vec::with_capacity(properties.len());
        for property in properties {
            if !unique.iter().any(|known| known.name == property.name) {
                unique.push(property);
            }
        }
        debug!("Mirroring {} properties of shader {}", unique.len(), shader);
        self.by_shader.insert(shader.to_string(), unique);
    }

    /// Adds a property the shader sets per instance, outside what
    /// `register_shader` collected
    pub fn register_custom_property(&mut self, shader: &str, property: MaterialPropertyDescriptor) {
        let custom = self.custom_by_shader.entry(shader.to_string()).or_default();
        if !custom.iter().any(|known| known.name == property.name) {
            custom.push(property);
        }
    }

    pub fn is_shader_known(&self, shader: &str) -> bool {
        self.by_shader.contains_key(shader) || self.custom_by_shader.contains_key(shader)
    }

    /// Universal properties first, then the shader's, then its custom ones
    pub fn properties<'a>(
        &'a self,
        shader: &str,
    ) -> impl Iterator<Item = &'a MaterialPropertyDescriptor> + 'a {
        let registered = self.by_shader.get(shader).into_iter().flatten();
        let custom = self.custom_by_shader.get(shader).into_iter().flatten();
        self.universal.iter().chain(registered).chain(custom)
    }
}
