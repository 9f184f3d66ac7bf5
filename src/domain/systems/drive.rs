use crate::domain::VehicleInput;
use crate::domain::ports::{WheelControl, WheelControls, WheelMount};
use crate::domain::tuning::DriveTuning;

/// Translates one tick of driver input into per-wheel controls.
///
/// Every call starts from cleared engine force and brake, so nothing carries over
/// between ticks. Positive engine force pushes the chassis along its +Z axis.
pub fn wheel_controls(
    input: VehicleInput,
    wheels: &[WheelMount; 4],
    cfg: &DriveTuning,
) -> WheelControls {
    let engine_force = if input.forward > 0.0 {
        cfg.engine_force * input.forward
    } else if input.forward < 0.0 {
        -cfg.reverse_force * input.forward.abs()
    } else {
        0.0
    };
    let steering = input.turn * cfg.max_steer;
    let brake = if input.brake { cfg.brake_force } else { 0.0 };

    let mut controls = WheelControls::default();
    for (control, mount) in controls.iter_mut().zip(wheels) {
        *control = WheelControl {
            engine_force: if mount.drive { engine_force } else { 0.0 },
            brake,
            steering: if mount.steerable { steering } else { 0.0 },
        };
    }
    controls
}
