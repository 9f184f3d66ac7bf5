use crate::domain::ports::{VehicleRig, WheelMount};
use crate::domain::tuning::{ChassisTuning, WheelTuning};
use crate::domain::{PhysicsError, SpawnPoint, Vec3, VehicleId, VehicleInput};
use crate::use_cases::WorldState;

/// One player's drivable car.
#[derive(Debug, Clone)]
pub struct VehicleEntity {
    pub id: VehicleId,
    pub wheels: [WheelMount; 4],
    /// Input applied on the next tick.
    pub input: VehicleInput,
}

/// Builds cars from fixed chassis and wheel tuning.
#[derive(Debug, Clone)]
pub struct VehicleFactory {
    chassis: ChassisTuning,
    rig: VehicleRig,
}

impl VehicleFactory {
    pub fn new(chassis: ChassisTuning, wheel: WheelTuning) -> Self {
        let mount = |x: f32, z: f32, front: bool| WheelMount {
            connection: Vec3::new(x, chassis.wheel_mount_height, z),
            steerable: front,
            drive: !front,
        };
        let (track, base) = (chassis.wheel_track_half, chassis.wheel_base_half);

        // Front is +Z: front-left, front-right, rear-left, rear-right.
        let rig = VehicleRig {
            mass: chassis.mass,
            half_extents: chassis.half_extents,
            wheels: [
                mount(track, base, true),
                mount(-track, base, true),
                mount(track, -base, false),
                mount(-track, -base, false),
            ],
            wheel,
        };

        Self { chassis, rig }
    }

    pub fn rig(&self) -> &VehicleRig {
        &self.rig
    }

    /// Spawn position for a chassis at `spawn`.
    pub fn spawn_position(&self, spawn: SpawnPoint) -> Vec3 {
        Vec3::new(spawn.x, self.chassis.spawn_height, spawn.z)
    }

    /// Creates a car at rest with identity orientation and registers it with `world`.
    pub fn create_vehicle(
        &self,
        world: &mut WorldState,
        spawn: SpawnPoint,
    ) -> Result<VehicleEntity, PhysicsError> {
        let id = world.add_vehicle(&self.rig, self.spawn_position(spawn))?;
        Ok(VehicleEntity {
            id,
            wheels: self.rig.wheels,
            input: VehicleInput::default(),
        })
    }
}

impl Default for VehicleFactory {
    fn default() -> Self {
        Self::new(ChassisTuning::default(), WheelTuning::default())
    }
}
