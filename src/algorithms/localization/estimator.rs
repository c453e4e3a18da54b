//! Point estimates of a particle population.

use std::collections::HashMap;

use crate::core::math::mean_heading_degrees;
use crate::core::types::{Pose, PoseKey};

use super::particle_filter::Particle;

/// Distinct poses of a population plus, for every particle, the index of
/// its pose in the distinct list.
///
/// Distinct poses keep first-encounter order.
#[derive(Debug, Clone, Default)]
pub struct DistinctPoses {
    /// Each distinct pose once.
    pub poses: Vec<Pose>,
    /// `poses[index[i]]` is the pose of particle `i`.
    pub index: Vec<usize>,
    /// Number of particles sharing each distinct pose.
    pub counts: Vec<usize>,
}

impl DistinctPoses {
    /// Group particles by exact pose.
    pub fn from_particles(particles: &[Particle]) -> Self {
        let mut lookup: HashMap<PoseKey, usize> = HashMap::with_capacity(particles.len());
        let mut distinct = Self {
            poses: Vec::new(),
            index: Vec::with_capacity(particles.len()),
            counts: Vec::new(),
        };

        for particle in particles {
            let slot = *lookup.entry(particle.pose.key()).or_insert_with(|| {
                distinct.poses.push(particle.pose);
                distinct.counts.push(0);
                distinct.poses.len() - 1
            });
            distinct.counts[slot] += 1;
            distinct.index.push(slot);
        }

        distinct
    }

    /// Number of distinct poses.
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// True for an empty population.
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

/// Most frequent pose in the population.
///
/// Ties go to the pose encountered first. Returns `None` for an empty
/// population.
pub fn estimate_mode(particles: &[Particle]) -> Option<Pose> {
    let distinct = DistinctPoses::from_particles(particles);

    let mut best: Option<(Pose, usize)> = None;
    for (pose, &count) in distinct.poses.iter().zip(&distinct.counts) {
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((*pose, count)),
        }
    }
    best.map(|(pose, _)| pose)
}

/// Mean position with circular-mean heading.
///
/// Returns `None` for an empty population.
pub fn mean_pose(particles: &[Particle]) -> Option<Pose> {
    if particles.is_empty() {
        return None;
    }
    let n = particles.len() as f64;
    let x = particles.iter().map(|p| p.pose.x).sum::<f64>() / n;
    let y = particles.iter().map(|p| p.pose.y).sum::<f64>() / n;
    let theta = mean_heading_degrees(particles.iter().map(|p| p.pose.theta));
    Some(Pose::new(x, y, theta))
}
