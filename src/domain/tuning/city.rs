/// World, city layout and spawn tuning.
use crate::domain::Vec3;

#[derive(Debug, Clone, Copy)]
pub struct PhysicsTuning {
    /// Gravity vector in world units per second squared.
    pub gravity: Vec3,

    /// Velocity solver iterations per step.
    pub solver_iterations: usize,

    /// Penetration the solver tolerates before correcting, relative to object size.
    pub solver_tolerance: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.82, 0.0),
            solver_iterations: 10,
            solver_tolerance: 0.001,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CityTuning {
    /// Blocks per side of the square block grid.
    pub blocks: i32,

    /// Distance between neighbouring grid lines (roads).
    pub spacing: f32,

    /// Half-width of every road; footprints must stay clear of it.
    pub road_half: f32,

    /// Planned buildings per block (inclusive range).
    pub buildings_per_block: (u32, u32),

    pub width: (f32, f32),
    pub depth: (f32, f32),
    pub height: (f32, f32),
}

impl Default for CityTuning {
    fn default() -> Self {
        Self {
            blocks: 7,
            spacing: 36.0,
            road_half: 7.0,
            buildings_per_block: (2, 4),
            width: (10.0, 24.0),
            depth: (8.0, 24.0),
            height: (12.0, 72.0),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SpawnTuning {
    /// Intersections per side of the spawn sub-grid.
    pub sub_grid: i32,

    /// Grid spacing between spawn intersections.
    pub spacing: f32,

    /// Maximum absolute jitter added to each axis.
    pub jitter: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            sub_grid: 5,
            spacing: 36.0,
            jitter: 1.0,
        }
    }
}
