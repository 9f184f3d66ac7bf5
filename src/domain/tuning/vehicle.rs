/// Gameplay tuning for player-controlled cars.
///
/// These values form an implicit contract with clients (spawn height, forces, steering).
use crate::domain::Vec3;

#[derive(Debug, Clone, Copy)]
pub struct ChassisTuning {
    /// Chassis mass in mass units.
    pub mass: f32,

    /// Box half-extents (x = half width, y = half height, z = half length).
    pub half_extents: Vec3,

    /// Height above the ground plane where a chassis spawns or resets.
    pub spawn_height: f32,

    /// Lateral offset of each wheel connection point from the chassis center.
    pub wheel_track_half: f32,

    /// Longitudinal offset of the front (+z) and rear (-z) axles.
    pub wheel_base_half: f32,

    /// Vertical offset of the wheel connection points in chassis space.
    pub wheel_mount_height: f32,
}

impl Default for ChassisTuning {
    fn default() -> Self {
        Self {
            mass: 380.0,
            half_extents: Vec3::new(1.05, 0.45, 1.95),
            spawn_height: 1.8,
            wheel_track_half: 0.95,
            wheel_base_half: 1.35,
            wheel_mount_height: 0.0,
        }
    }
}

/// Raycast suspension tuning shared by all four wheels.
#[derive(Debug, Clone, Copy)]
pub struct WheelTuning {
    pub radius: f32,
    pub suspension_rest_length: f32,
    pub suspension_stiffness: f32,
    pub damping_compression: f32,
    pub damping_relaxation: f32,
    pub friction_slip: f32,
    pub max_suspension_force: f32,

    // Client-facing rig constants with no rapier counterpart; the physics
    // adapter does not read them.
    pub roll_influence: f32,
    pub custom_sliding_rotational_speed: f32,
    pub use_custom_sliding_rotational_speed: bool,
}

impl Default for WheelTuning {
    fn default() -> Self {
        Self {
            radius: 0.48,
            suspension_rest_length: 0.28,
            suspension_stiffness: 45.0,
            damping_compression: 3.8,
            damping_relaxation: 4.3,
            friction_slip: 5.2,
            max_suspension_force: 100_000.0,
            roll_influence: 0.02,
            custom_sliding_rotational_speed: -30.0,
            use_custom_sliding_rotational_speed: true,
        }
    }
}

/// Input to force translation.
#[derive(Debug, Clone, Copy)]
pub struct DriveTuning {
    /// Engine force per drive wheel at full forward throttle.
    pub engine_force: f32,

    /// Engine force per drive wheel at full reverse throttle.
    pub reverse_force: f32,

    /// Steering angle at full turn, in radians.
    pub max_steer: f32,

    /// Brake force applied to every wheel while braking.
    pub brake_force: f32,

    /// Gain for the upright torque (`up x world_up * gain`); negative leans with the tilt.
    pub upright_torque_gain: f32,
}

impl Default for DriveTuning {
    fn default() -> Self {
        Self {
            engine_force: 7200.0,
            reverse_force: 3000.0,
            max_steer: 0.5,
            brake_force: 20.0,
            upright_torque_gain: -12.0,
        }
    }
}
