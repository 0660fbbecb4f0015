pub mod broadcast_config;
pub mod broadcast_context;
pub mod component_broadcaster;
pub mod endpoint_classifier;
pub mod error;
pub mod node_id_generator;
pub mod scene_broadcaster;
pub mod sync_outbox;
