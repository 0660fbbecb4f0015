pub mod component;
pub mod host;
pub mod remote;
pub mod scene_type;
