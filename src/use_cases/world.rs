// Shared physical world: static city colliders plus the live vehicle rigs.

use crate::domain::ports::{VehicleRig, WheelControls};
use crate::domain::{BodyState, Building, PhysicsEngine, PhysicsError, Vec3, VehicleId};
use crate::use_cases::GridInfo;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

pub struct WorldState {
    engine: Box<dyn PhysicsEngine>,
    grid: GridInfo,
    buildings: Arc<[Building]>,
    vehicles: HashSet<VehicleId>,
}

impl WorldState {
    /// Builds the static world (ground plane and building colliders) on top of `engine`.
    pub fn create_static_world(
        mut engine: Box<dyn PhysicsEngine>,
        grid: GridInfo,
        buildings: Vec<Building>,
    ) -> Self {
        engine.add_ground();
        for building in &buildings {
            engine.add_static_box(building.center(), building.half_extents());
        }
        debug!(buildings = buildings.len(), "static world created");

        Self {
            engine,
            grid,
            buildings: Arc::from(buildings),
            vehicles: HashSet::new(),
        }
    }

    pub fn grid(&self) -> GridInfo {
        self.grid
    }

    pub fn buildings(&self) -> Arc<[Building]> {
        self.buildings.clone()
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    pub fn contains_vehicle(&self, vehicle: VehicleId) -> bool {
        self.vehicles.contains(&vehicle)
    }

    pub fn add_vehicle(&mut self, rig: &VehicleRig, position: Vec3) -> Result<VehicleId, PhysicsError> {
        let vehicle = self.engine.add_vehicle(rig, position)?;
        self.vehicles.insert(vehicle);
        Ok(vehicle)
    }

    /// Idempotent: removing an unknown vehicle is a no-op.
    pub fn remove_vehicle(&mut self, vehicle: VehicleId) {
        if self.vehicles.remove(&vehicle) && !self.engine.remove_vehicle(vehicle) {
            debug!(?vehicle, "vehicle body already gone from physics engine");
        }
    }

    pub fn set_wheel_controls(&mut self, vehicle: VehicleId, controls: &WheelControls) {
        if self.vehicles.contains(&vehicle) {
            self.engine.set_wheel_controls(vehicle, controls);
        }
    }

    pub fn add_torque(&mut self, vehicle: VehicleId, torque: Vec3) {
        if self.vehicles.contains(&vehicle) {
            self.engine.add_torque(vehicle, torque);
        }
    }

    pub fn teleport(&mut self, vehicle: VehicleId, position: Vec3) {
        if self.vehicles.contains(&vehicle) {
            self.engine.teleport(vehicle, position);
        }
    }

    pub fn body_state(&self, vehicle: VehicleId) -> Option<BodyState> {
        if self.vehicles.contains(&vehicle) {
            self.engine.body_state(vehicle)
        } else {
            None
        }
    }

    /// Advances the simulation by exactly `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.engine.step(dt);
    }
}
