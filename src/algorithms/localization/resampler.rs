//! Importance resampling.
//!
//! Draws a fresh population of the same size with replacement, each draw
//! picking a particle with probability proportional to its weight.

use rand::Rng;
use serde::Deserialize;

use super::particle_filter::Particle;

/// Resampling strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResamplingStrategy {
    /// Low-variance (systematic) resampling: one random offset, N evenly
    /// spaced pointers.
    #[default]
    Systematic,
    /// N independent draws.
    Multinomial,
}

/// Draws a new particle population from weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resampler {
    strategy: ResamplingStrategy,
}

impl Resampler {
    /// Create a resampler with the given strategy.
    pub fn new(strategy: ResamplingStrategy) -> Self {
        Self { strategy }
    }

    /// Get the strategy.
    pub fn strategy(&self) -> ResamplingStrategy {
        self.strategy
    }

    /// Resample `particles` according to `weights`.
    ///
    /// Returns exactly `particles.len()` particles. Weights that cannot be
    /// normalized (negative, non-finite, or summing to zero) degrade to
    /// uniform resampling.
    pub fn resample<R: Rng + ?Sized>(
        &self,
        particles: &[Particle],
        weights: &[f64],
        rng: &mut R,
    ) -> Vec<Particle> {
        let n = particles.len();
        if n == 0 {
            return Vec::new();
        }

        let cumulative = cumulative_weights(weights, n).unwrap_or_else(|| {
            log::warn!("Resampling with invalid weights, falling back to uniform");
            (1..=n).map(|i| i as f64 / n as f64).collect()
        });

        let indices = match self.strategy {
            ResamplingStrategy::Systematic => systematic_indices(&cumulative, rng),
            ResamplingStrategy::Multinomial => multinomial_indices(&cumulative, rng),
        };

        indices.into_iter().map(|idx| particles[idx]).collect()
    }
}

/// Normalized cumulative weights, or `None` when the weights are unusable.
fn cumulative_weights(weights: &[f64], n: usize) -> Option<Vec<f64>> {
    if weights.len() != n || weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return None;
    }

    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return None;
    }

    let mut sum = 0.0;
    Some(
        weights
            .iter()
            .map(|w| {
                sum += w;
                sum / total
            })
            .collect(),
    )
}

fn systematic_indices<R: Rng + ?Sized>(cumulative: &[f64], rng: &mut R) -> Vec<usize> {
    let n = cumulative.len();
    let step = 1.0 / n as f64;
    let mut r = rng.gen_range(0.0..step);
    let mut idx = 0;

    let mut indices = Vec::with_capacity(n);
    for _ in 0..n {
        while r > cumulative[idx] && idx < n - 1 {
            idx += 1;
        }
        indices.push(idx);
        r += step;
    }
    indices
}

fn multinomial_indices<R: Rng + ?Sized>(cumulative: &[f64], rng: &mut R) -> Vec<usize> {
    let last = cumulative.len() - 1;
    (0..cumulative.len())
        .map(|_| {
            let u: f64 = rng.gen_range(0.0..1.0);
            cumulative.partition_point(|&c| c <= u).min(last)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Pose;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn line_of_particles(n: usize) -> Vec<Particle> {
        (0..n)
            .map(|i| Particle::new(Pose::new(i as f64, 0.0, 0.0)))
            .collect()
    }

    fn count_at(particles: &[Particle], x: f64) -> usize {
        particles.iter().filter(|p| p.pose.x == x).count()
    }

    #[test]
    fn test_preserves_count() {
        let mut rng = SmallRng::seed_from_u64(1);
        for strategy in [ResamplingStrategy::Systematic, ResamplingStrategy::Multinomial] {
            let resampler = Resampler::new(strategy);
            for n in [1, 2, 7, 100] {
                let particles = line_of_particles(n);
                let weights: Vec<f64> = (0..n).map(|i| 0.1 + i as f64).collect();
                assert_eq!(resampler.resample(&particles, &weights, &mut rng).len(), n);
            }
        }
    }

    #[test]
    fn test_dominant_weight_wins() {
        let mut rng = SmallRng::seed_from_u64(2);
        let particles = line_of_particles(50);
        let mut weights = vec![1.0; 50];
        weights[17] = 1000.0;

        for strategy in [ResamplingStrategy::Systematic, ResamplingStrategy::Multinomial] {
            let resampled = Resampler::new(strategy).resample(&particles, &weights, &mut rng);
            // Expected share is 1000 / 1049
            assert!(count_at(&resampled, 17.0) > 40, "{:?}", strategy);
        }
    }

    #[test]
    fn test_systematic_is_proportional() {
        let mut rng = SmallRng::seed_from_u64(3);
        let particles = line_of_particles(4);
        let weights = [1.0, 1.0, 2.0, 0.0];

        let resampled = Resampler::default().resample(&particles, &weights, &mut rng);

        assert_eq!(count_at(&resampled, 0.0), 1);
        assert_eq!(count_at(&resampled, 1.0), 1);
        assert_eq!(count_at(&resampled, 2.0), 2);
        assert_eq!(count_at(&resampled, 3.0), 0);
    }

    #[test]
    fn test_zero_weight_never_drawn_multinomial() {
        let mut rng = SmallRng::seed_from_u64(4);
        let particles = line_of_particles(3);
        let weights = [0.0, 1.0, 0.0];

        for _ in 0..20 {
            let resampled =
                Resampler::new(ResamplingStrategy::Multinomial).resample(&particles, &weights, &mut rng);
            assert_eq!(count_at(&resampled, 1.0), 3);
        }
    }

    #[test]
    fn test_invalid_weights_fall_back_to_uniform() {
        let mut rng = SmallRng::seed_from_u64(5);
        let particles = line_of_particles(10);

        for weights in [vec![0.0; 10], vec![f64::NAN; 10], vec![-1.0; 10]] {
            let resampled = Resampler::default().resample(&particles, &weights, &mut rng);
            assert_eq!(resampled.len(), 10);
            // Systematic resampling with uniform weights keeps every particle once
            for i in 0..10 {
                assert_eq!(count_at(&resampled, i as f64), 1);
            }
        }
    }

    #[test]
    fn test_mismatched_weights_fall_back_to_uniform() {
        let mut rng = SmallRng::seed_from_u64(6);
        let particles = line_of_particles(5);
        let resampled = Resampler::default().resample(&particles, &[1.0, 2.0], &mut rng);
        assert_eq!(resampled.len(), 5);
    }

    #[test]
    fn test_empty_population() {
        let mut rng = SmallRng::seed_from_u64(7);
        assert!(Resampler::default().resample(&[], &[], &mut rng).is_empty());
    }
}
