use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::domain::ports::{VehicleRig, WheelControls, WheelMount};
use crate::domain::tuning::WheelTuning;
use crate::domain::{BodyState, PhysicsEngine, PhysicsError, Quat, Vec3, VehicleId};

// Everything the fake engine has been asked to do.
#[derive(Debug, Default, Clone)]
pub(crate) struct PhysicsLog {
    pub ground: bool,
    pub static_boxes: Vec<(Vec3, Vec3)>,
    pub bodies: BTreeMap<VehicleId, BodyState>,
    pub removed: Vec<VehicleId>,
    pub controls: BTreeMap<VehicleId, WheelControls>,
    pub torques: Vec<(VehicleId, Vec3)>,
    pub steps: Vec<f32>,
}

// Fake physics engine that records calls; clones share the same log.
#[derive(Clone, Default)]
pub(crate) struct RecordingPhysics {
    log: Arc<Mutex<PhysicsLog>>,
    fail_construction: bool,
    next_id: Arc<Mutex<u64>>,
}

impl RecordingPhysics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing_construction(mut self) -> Self {
        self.fail_construction = true;
        self
    }

    pub(crate) fn log(&self) -> PhysicsLog {
        self.log.lock().expect("physics log poisoned").clone()
    }

    pub(crate) fn set_velocity(&self, vehicle: VehicleId, linear: Vec3, angular: Vec3) {
        let mut log = self.log.lock().expect("physics log poisoned");
        let body = log.bodies.get_mut(&vehicle).expect("vehicle should exist");
        body.linear_velocity = linear;
        body.angular_velocity = angular;
        body.rotation = Quat {
            x: 0.0,
            y: 0.0,
            z: 0.38268343,
            w: 0.9238795,
        };
    }
}

impl PhysicsEngine for RecordingPhysics {
    fn add_ground(&mut self) {
        self.log.lock().expect("physics log poisoned").ground = true;
    }

    fn add_static_box(&mut self, center: Vec3, half_extents: Vec3) {
        let mut log = self.log.lock().expect("physics log poisoned");
        log.static_boxes.push((center, half_extents));
    }

    fn add_vehicle(&mut self, _rig: &VehicleRig, position: Vec3) -> Result<VehicleId, PhysicsError> {
        if self.fail_construction {
            return Err(PhysicsError::Construction("test failure".to_string()));
        }

        let mut next_id = self.next_id.lock().expect("id counter poisoned");
        *next_id += 1;
        let vehicle = VehicleId(*next_id);

        let mut log = self.log.lock().expect("physics log poisoned");
        log.bodies.insert(
            vehicle,
            BodyState {
                position,
                rotation: Quat::IDENTITY,
                linear_velocity: Vec3::ZERO,
                angular_velocity: Vec3::ZERO,
            },
        );
        Ok(vehicle)
    }

    fn remove_vehicle(&mut self, vehicle: VehicleId) -> bool {
        let mut log = self.log.lock().expect("physics log poisoned");
        log.removed.push(vehicle);
        log.controls.remove(&vehicle);
        log.bodies.remove(&vehicle).is_some()
    }

    fn set_wheel_controls(&mut self, vehicle: VehicleId, controls: &WheelControls) {
        let mut log = self.log.lock().expect("physics log poisoned");
        log.controls.insert(vehicle, *controls);
    }

    fn add_torque(&mut self, vehicle: VehicleId, torque: Vec3) {
        let mut log = self.log.lock().expect("physics log poisoned");
        log.torques.push((vehicle, torque));
    }

    fn teleport(&mut self, vehicle: VehicleId, position: Vec3) {
        let mut log = self.log.lock().expect("physics log poisoned");
        if let Some(body) = log.bodies.get_mut(&vehicle) {
            *body = BodyState {
                position,
                rotation: Quat::IDENTITY,
                linear_velocity: Vec3::ZERO,
                angular_velocity: Vec3::ZERO,
            };
        }
    }

    fn body_state(&self, vehicle: VehicleId) -> Option<BodyState> {
        let log = self.log.lock().expect("physics log poisoned");
        log.bodies.get(&vehicle).copied()
    }

    fn step(&mut self, dt: f32) {
        let mut log = self.log.lock().expect("physics log poisoned");
        log.steps.push(dt);
    }
}

pub(crate) fn test_rig() -> VehicleRig {
    let mount = |x: f32, z: f32, front: bool| WheelMount {
        connection: Vec3::new(x, 0.0, z),
        steerable: front,
        drive: !front,
    };
    VehicleRig {
        mass: 380.0,
        half_extents: Vec3::new(1.05, 0.45, 1.95),
        wheels: [
            mount(0.95, 1.35, true),
            mount(-0.95, 1.35, true),
            mount(0.95, -1.35, false),
            mount(-0.95, -1.35, false),
        ],
        wheel: WheelTuning::default(),
    }
}
