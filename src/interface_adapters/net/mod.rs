// Network adapters: the public driving socket and the read-only status route.

pub mod client;
pub mod status;

pub use client::{world_update_serializer, ws_handler};
pub use status::status_handler;
