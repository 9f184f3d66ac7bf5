// rapier3d-backed implementation of the physics engine port.

use crate::domain::ports::{VehicleRig, WheelControls};
use crate::domain::tuning::PhysicsTuning;
use crate::domain::{BodyState, PhysicsEngine, PhysicsError, Quat, Vec3, VehicleId};
use rapier3d::control::{DynamicRayCastVehicleController, WheelTuning};
use rapier3d::prelude::*;
use std::collections::HashMap;
use std::num::NonZeroUsize;

// Chassis-space wheel axes: suspension points down, the axle points to -X so
// positive engine force pushes the chassis towards +Z.
const WHEEL_DIRECTION: [Real; 3] = [0.0, -1.0, 0.0];
const WHEEL_AXLE: [Real; 3] = [-1.0, 0.0, 0.0];
const FORWARD_AXIS: usize = 2;

struct RapierVehicle {
    body: RigidBodyHandle,
    controller: DynamicRayCastVehicleController,
}

pub struct RapierEngine {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    vehicles: HashMap<VehicleId, RapierVehicle>,
    next_vehicle_id: u64,
}

impl RapierEngine {
    pub fn new(tuning: &PhysicsTuning) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.num_solver_iterations =
            NonZeroUsize::new(tuning.solver_iterations).unwrap_or(NonZeroUsize::MIN);
        integration_parameters.normalized_allowed_linear_error = tuning.solver_tolerance;

        Self {
            gravity: to_vector(tuning.gravity),
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            vehicles: HashMap::new(),
            next_vehicle_id: 1,
        }
    }

    fn validate(rig: &VehicleRig) -> Result<(), PhysicsError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(rig.mass) {
            return Err(PhysicsError::InvalidRig(format!("mass {}", rig.mass)));
        }
        let he = rig.half_extents;
        if !(positive(he.x) && positive(he.y) && positive(he.z)) {
            return Err(PhysicsError::InvalidRig(format!("half extents {he:?}")));
        }
        if !positive(rig.wheel.radius) || !rig.wheels.iter().all(|w| w.connection.is_finite()) {
            return Err(PhysicsError::InvalidRig("wheel geometry".to_string()));
        }
        Ok(())
    }
}

fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

// roll influence and the custom sliding wheel speed have no counterpart in
// rapier's raycast vehicle; the remaining tuning maps one to one.
fn wheel_tuning(rig: &VehicleRig) -> WheelTuning {
    WheelTuning {
        suspension_stiffness: rig.wheel.suspension_stiffness,
        suspension_compression: rig.wheel.damping_compression,
        suspension_damping: rig.wheel.damping_relaxation,
        friction_slip: rig.wheel.friction_slip,
        max_suspension_force: rig.wheel.max_suspension_force,
        ..WheelTuning::default()
    }
}

impl PhysicsEngine for RapierEngine {
    fn add_ground(&mut self) {
        self.colliders
            .insert(ColliderBuilder::halfspace(Vector::y_axis()).build());
    }

    fn add_static_box(&mut self, center: Vec3, half_extents: Vec3) {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(to_vector(center))
            .build();
        self.colliders.insert(collider);
    }

    fn add_vehicle(&mut self, rig: &VehicleRig, position: Vec3) -> Result<VehicleId, PhysicsError> {
        Self::validate(rig)?;
        if !position.is_finite() {
            return Err(PhysicsError::Construction(format!("spawn position {position:?}")));
        }

        let body = self.bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(to_vector(position))
                .can_sleep(false)
                .build(),
        );
        let he = rig.half_extents;
        let chassis = ColliderBuilder::cuboid(he.x, he.y, he.z).mass(rig.mass).build();
        self.colliders
            .insert_with_parent(chassis, body, &mut self.bodies);

        let tuning = wheel_tuning(rig);
        let mut controller = DynamicRayCastVehicleController::new(body);
        controller.index_forward_axis = FORWARD_AXIS;
        for mount in &rig.wheels {
            let c = mount.connection;
            controller.add_wheel(
                point![c.x, c.y, c.z],
                Vector::from(WHEEL_DIRECTION),
                Vector::from(WHEEL_AXLE),
                rig.wheel.suspension_rest_length,
                rig.wheel.radius,
                &tuning,
            );
        }

        let id = VehicleId(self.next_vehicle_id);
        self.next_vehicle_id += 1;
        self.vehicles.insert(id, RapierVehicle { body, controller });
        Ok(id)
    }

    fn remove_vehicle(&mut self, vehicle: VehicleId) -> bool {
        let Some(entry) = self.vehicles.remove(&vehicle) else {
            return false;
        };
        self.bodies
            .remove(
                entry.body,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    fn set_wheel_controls(&mut self, vehicle: VehicleId, controls: &WheelControls) {
        let Some(entry) = self.vehicles.get_mut(&vehicle) else {
            return;
        };
        for (wheel, control) in entry.controller.wheels_mut().iter_mut().zip(controls) {
            wheel.engine_force = control.engine_force;
            wheel.brake = control.brake;
            wheel.steering = control.steering;
        }
    }

    fn add_torque(&mut self, vehicle: VehicleId, torque: Vec3) {
        let Some(entry) = self.vehicles.get(&vehicle) else {
            return;
        };
        if let Some(body) = self.bodies.get_mut(entry.body) {
            body.add_torque(to_vector(torque), true);
        }
    }

    fn teleport(&mut self, vehicle: VehicleId, position: Vec3) {
        let Some(entry) = self.vehicles.get(&vehicle) else {
            return;
        };
        if let Some(body) = self.bodies.get_mut(entry.body) {
            body.set_translation(to_vector(position), true);
            body.set_rotation(Rotation::identity(), true);
            body.set_linvel(Vector::zeros(), true);
            body.set_angvel(Vector::zeros(), true);
            body.reset_forces(true);
            body.reset_torques(true);
        }
    }

    fn body_state(&self, vehicle: VehicleId) -> Option<BodyState> {
        let entry = self.vehicles.get(&vehicle)?;
        let body = self.bodies.get(entry.body)?;
        let rotation = body.rotation();
        Some(BodyState {
            position: from_vector(body.translation()),
            rotation: Quat {
                x: rotation.i,
                y: rotation.j,
                z: rotation.k,
                w: rotation.w,
            },
            linear_velocity: from_vector(body.linvel()),
            angular_velocity: from_vector(body.angvel()),
        })
    }

    fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;

        for entry in self.vehicles.values_mut() {
            entry.controller.update_vehicle(
                dt,
                &mut self.bodies,
                &self.colliders,
                &self.query_pipeline,
                QueryFilter::exclude_dynamic().exclude_rigid_body(entry.body),
            );
        }

        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );

        // User torques are per step; rapier would otherwise keep them applied.
        for entry in self.vehicles.values() {
            if let Some(body) = self.bodies.get_mut(entry.body) {
                body.reset_torques(false);
            }
        }
    }
}
