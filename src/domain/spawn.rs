use crate::domain::SpawnPoint;
use crate::domain::tuning::SpawnTuning;
use rand::Rng;
use rand::rngs::StdRng;

/// Round-robin spawn selection over the central road intersections.
///
/// Ignoring jitter, `n` calls visit all `n` intersections once before any repeats,
/// so concurrent joins spread across the city instead of piling up.
#[derive(Debug)]
pub struct SpawnAllocator {
    points: Vec<SpawnPoint>,
    cursor: usize,
    jitter: f32,
    rng: StdRng,
}

impl SpawnAllocator {
    pub fn new(tuning: &SpawnTuning, rng: StdRng) -> Self {
        let half = tuning.sub_grid / 2;
        let mut points = Vec::with_capacity((tuning.sub_grid * tuning.sub_grid).max(1) as usize);
        for i in -half..=half {
            for j in -half..=half {
                points.push(SpawnPoint {
                    x: i as f32 * tuning.spacing,
                    z: j as f32 * tuning.spacing,
                });
            }
        }
        if points.is_empty() {
            points.push(SpawnPoint { x: 0.0, z: 0.0 });
        }

        Self {
            points,
            cursor: 0,
            jitter: tuning.jitter,
            rng,
        }
    }

    /// Intersections in visiting order, without jitter.
    pub fn points(&self) -> &[SpawnPoint] {
        &self.points
    }

    pub fn next(&mut self) -> SpawnPoint {
        let base = self.points[self.cursor];
        self.cursor = (self.cursor + 1) % self.points.len();

        SpawnPoint {
            x: base.x + self.sample_jitter(),
            z: base.z + self.sample_jitter(),
        }
    }

    fn sample_jitter(&mut self) -> f32 {
        if self.jitter > 0.0 {
            self.rng.gen_range(-self.jitter..=self.jitter)
        } else {
            0.0
        }
    }
}
