use crate::domain::{Quat, Vec3};

/// Torque `up x world_up * gain`, re-applied to every chassis on every tick.
///
/// Zero when upright. In a right-handed frame a positive gain turns the chassis
/// back towards upright and a negative gain leans it further into its tilt. The
/// shipped gain is -12, which is small next to the suspension and leaves rollover
/// recovery to `reset`.
pub fn upright_torque(rotation: Quat, gain: f32) -> Vec3 {
    let up = rotation.rotate(Vec3::UP);
    up.cross(Vec3::UP) * gain
}

#[cfg(test)]
mod tests {
    use super::*;

    // 30 degrees about +Z.
    fn tilted() -> Quat {
        let half = (30.0f32).to_radians() / 2.0;
        Quat {
            x: 0.0,
            y: 0.0,
            z: half.sin(),
            w: half.cos(),
        }
    }

    #[test]
    fn upright_chassis_gets_no_torque() {
        let torque = upright_torque(Quat::IDENTITY, -12.0);
        assert!(torque.length() < 1e-6);
    }

    #[test]
    fn negative_gain_leans_along_the_tilt() {
        let torque = upright_torque(tilted(), -12.0);

        assert!(torque.x.abs() < 1e-5);
        assert!(torque.y.abs() < 1e-5);
        // Same sense as the +Z tilt, magnitude |gain| * sin(30deg).
        assert!((torque.z - 6.0).abs() < 1e-4, "torque {torque:?}");
    }

    #[test]
    fn positive_gain_turns_back_towards_upright() {
        let torque = upright_torque(tilted(), 12.0);
        assert!((torque.z + 6.0).abs() < 1e-4, "torque {torque:?}");
    }
}
