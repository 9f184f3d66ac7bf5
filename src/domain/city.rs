// Procedural city layout: a one-time producer of static building colliders.

use crate::domain::Building;
use crate::domain::tuning::CityTuning;
use rand::Rng;

/// Generates the building list for a `blocks` x `blocks` grid centered on the origin.
///
/// Roads run along both grid axes through every block center. Each block plans a
/// few buildings at random offsets; a candidate whose footprint reaches into a
/// road, or overlaps an already placed building, is skipped rather than moved.
pub fn generate_buildings<R: Rng>(tuning: &CityTuning, rng: &mut R) -> Vec<Building> {
    let half_blocks = tuning.blocks / 2;
    let half_cell = tuning.spacing / 2.0;
    let mut buildings: Vec<Building> = Vec::new();
    let mut next_id: u32 = 0;

    for bx in -half_blocks..=half_blocks {
        for bz in -half_blocks..=half_blocks {
            let cx = bx as f32 * tuning.spacing;
            let cz = bz as f32 * tuning.spacing;
            let (min_count, max_count) = tuning.buildings_per_block;
            let planned = rng.gen_range(min_count..=max_count);

            for _ in 0..planned {
                let width = rng.gen_range(tuning.width.0..=tuning.width.1);
                let depth = rng.gen_range(tuning.depth.0..=tuning.depth.1);
                let height = rng.gen_range(tuning.height.0..=tuning.height.1);
                let ox = side_offset(rng, tuning.road_half, half_cell);
                let oz = side_offset(rng, tuning.road_half, half_cell);

                if crosses_road(ox, width, tuning.road_half) || crosses_road(oz, depth, tuning.road_half)
                {
                    continue;
                }

                let candidate = Building {
                    id: next_id,
                    x: cx + ox,
                    y: height / 2.0,
                    z: cz + oz,
                    width,
                    height,
                    depth,
                };
                if buildings.iter().any(|b| b.overlaps(&candidate)) {
                    continue;
                }

                next_id += 1;
                buildings.push(candidate);
            }
        }
    }

    buildings
}

// Offset from the block center on one axis, on a random side of the road.
fn side_offset<R: Rng>(rng: &mut R, road_half: f32, half_cell: f32) -> f32 {
    let distance = rng.gen_range(road_half..=half_cell);
    if rng.gen_bool(0.5) { distance } else { -distance }
}

fn crosses_road(offset: f32, extent: f32, road_half: f32) -> bool {
    offset.abs() - extent / 2.0 < road_half
}
