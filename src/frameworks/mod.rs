// Frameworks layer: runtime bootstrap, configuration and the physics backend.

pub mod config;
pub mod physics;
pub mod server;
