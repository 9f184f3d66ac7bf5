// Gameplay tuning, kept apart from runtime/server configuration.

pub mod city;
pub mod vehicle;

pub use city::{CityTuning, PhysicsTuning, SpawnTuning};
pub use vehicle::{ChassisTuning, DriveTuning, WheelTuning};
