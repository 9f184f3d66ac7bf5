// Domain layer: core simulation types and rules.

pub mod city;
pub mod ports;
pub mod spawn;
pub mod state;
pub mod systems;
pub mod tuning;

pub use ports::{PhysicsEngine, PhysicsError};
pub use state::{
    BodyState, Building, ConnectionId, Quat, SpawnPoint, Vec3, VehicleId, VehicleInput,
    VehicleSnapshot,
};
