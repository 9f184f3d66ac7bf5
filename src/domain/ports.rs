use crate::domain::tuning::WheelTuning;
use crate::domain::{BodyState, Vec3, VehicleId};

// Errors surfaced by a physics engine implementation.
#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    #[error("vehicle rig rejected: {0}")]
    InvalidRig(String),
    #[error("physics engine refused to create a body: {0}")]
    Construction(String),
}

/// Where a wheel is mounted and what it does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelMount {
    /// Connection point in chassis space.
    pub connection: Vec3,
    pub steerable: bool,
    pub drive: bool,
}

/// Everything an engine needs to build one drivable car.
#[derive(Debug, Clone)]
pub struct VehicleRig {
    pub mass: f32,
    pub half_extents: Vec3,
    pub wheels: [WheelMount; 4],
    pub wheel: WheelTuning,
}

/// Per-wheel controls for the upcoming step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelControl {
    pub engine_force: f32,
    pub brake: f32,
    pub steering: f32,
}

pub type WheelControls = [WheelControl; 4];

// Port for the rigid-body solver driving the shared world.
//
// Forces and torques added between two `step` calls apply to that step only.
pub trait PhysicsEngine: Send {
    fn add_ground(&mut self);
    fn add_static_box(&mut self, center: Vec3, half_extents: Vec3);
    fn add_vehicle(&mut self, rig: &VehicleRig, position: Vec3) -> Result<VehicleId, PhysicsError>;
    /// Returns false when the vehicle was not registered.
    fn remove_vehicle(&mut self, vehicle: VehicleId) -> bool;
    fn set_wheel_controls(&mut self, vehicle: VehicleId, controls: &WheelControls);
    fn add_torque(&mut self, vehicle: VehicleId, torque: Vec3);
    /// Moves the chassis to `position` with identity orientation and zero velocity.
    fn teleport(&mut self, vehicle: VehicleId, position: Vec3);
    fn body_state(&self, vehicle: VehicleId) -> Option<BodyState>;
    fn step(&mut self, dt: f32);
}
