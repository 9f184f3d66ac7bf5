// Use cases layer: application workflows for the driving server.

pub mod game;
pub mod sessions;
pub mod types;
pub mod vehicles;
pub mod world;

#[cfg(test)]
pub(crate) mod test_support;

pub use game::{Simulation, world_task};
pub use sessions::{SessionError, SessionRegistry};
pub use types::{GameEvent, GridInfo, ServerState, SimStatus, WorldInit, WorldUpdate};
pub use vehicles::{VehicleEntity, VehicleFactory};
pub use world::WorldState;
