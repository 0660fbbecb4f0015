pub mod connection_config;
pub mod connection_delta;
pub mod error;
pub mod transport;
