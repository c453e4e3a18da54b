//! Seeded noise for the simulated robot.
//!
//! Turns true beam distances into raw IR values the way a real sensor
//! would report them: Gaussian range error, occasional dropouts, and
//! nothing at all past the sensor's range.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Shortest distance an IR sensor reports; keeps raw values finite.
pub const MIN_IR_DISTANCE: f64 = 0.05;

/// IR noise source with its own seeded generator.
#[derive(Debug, Clone)]
pub struct IrNoise {
    rng: SmallRng,
    range_stddev: f64,
    dropout_rate: f64,
}

impl IrNoise {
    /// Create a noise source. Seed 0 draws from OS entropy.
    pub fn new(seed: u64, range_stddev: f64, dropout_rate: f64) -> Self {
        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed)
        };
        Self {
            rng,
            range_stddev,
            dropout_rate,
        }
    }

    /// Raw inverse-distance value for a true distance.
    ///
    /// Returns 0 when the beam drops out or nothing lies within `max_range`.
    pub fn ir_reading(&mut self, distance: f64, max_range: f64) -> f64 {
        if distance >= max_range || self.dropped() {
            return 0.0;
        }
        let measured = (distance + self.range_error()).max(MIN_IR_DISTANCE);
        1.0 / measured
    }

    /// Generator shared with the simulated motion.
    pub fn rng_mut(&mut self) -> &mut SmallRng {
        &mut self.rng
    }

    fn range_error(&mut self) -> f64 {
        if self.range_stddev <= 0.0 {
            return 0.0;
        }
        let z: f64 = self.rng.sample(StandardNormal);
        z * self.range_stddev
    }

    fn dropped(&mut self) -> bool {
        self.dropout_rate > 0.0 && self.rng.gen_range(0.0..1.0) < self.dropout_rate
    }
}
