pub mod error;
pub mod mirror_registry;
