pub mod audio_source;
pub mod change_flags;
pub mod component_kind;
pub mod component_message;
pub mod material_property;
pub mod mesh_renderer;
pub mod replicated_component;
pub mod transform;
