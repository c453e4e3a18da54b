//! Localization Benchmarks
//!
//! Benchmarks for the CPU-heavy parts of a control cycle on the sample maze:
//! - Cone distance queries (exact, sampled, central ray)
//! - Particle filter predict / update / full cycle
//! - Sequential vs rayon weighting
//!
//! Run with: `cargo bench`
//! View HTML reports in: `target/criterion/`

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::sync::Arc;
use std::time::Duration;

use maze_mcl::algorithms::localization::{ConeMode, SensorModel};
use maze_mcl::algorithms::mapping::{cone_distance, sampled_cone_distance};
use maze_mcl::{GridMap, MapConfig, ParticleFilter, ParticleFilterConfig, Point2D, Pose};

// ============================================================================
// Test Fixtures
// ============================================================================

fn sample_maze() -> Arc<GridMap> {
    match MapConfig::sample().build() {
        Ok(map) => Arc::new(map),
        Err(e) => panic!("sample maze: {}", e),
    }
}

fn filter_config(num_particles: usize, cone: ConeMode, parallel: bool) -> ParticleFilterConfig {
    let mut config = ParticleFilterConfig {
        num_particles,
        seed: 42,
        ..Default::default()
    };
    config.sensor.cone = cone;
    config.sensor.parallel = parallel;
    config
}

fn new_filter(config: &ParticleFilterConfig, map: &Arc<GridMap>) -> ParticleFilter {
    match ParticleFilter::from_seed(config.clone(), map.clone()) {
        Ok(filter) => filter,
        Err(e) => panic!("filter: {}", e),
    }
}

/// Reading taken from an open cell of the sample maze.
fn benchmark_reading(filter: &ParticleFilter, map: &GridMap) -> Vec<f64> {
    filter
        .sensor_model()
        .expected_ranges(&Pose::new(11.0, 7.0, 0.0), map)
}

// ============================================================================
// Cone Distance Benchmarks
// ============================================================================

fn bench_cone_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("cone_distance");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(2));
    group.warm_up_time(Duration::from_secs(1));

    let map = sample_maze();
    let origin = Point2D::new(11.0, 7.0);

    group.bench_function("exact", |b| {
        b.iter(|| {
            cone_distance(
                black_box(origin),
                black_box(60.0),
                30.0,
                10.0,
                map.walls(),
            )
        })
    });

    group.bench_function("sampled/7", |b| {
        b.iter(|| {
            sampled_cone_distance(
                black_box(origin),
                black_box(60.0),
                30.0,
                7,
                10.0,
                map.walls(),
            )
        })
    });

    group.bench_function("sampled/61", |b| {
        b.iter(|| {
            sampled_cone_distance(
                black_box(origin),
                black_box(60.0),
                30.0,
                61,
                10.0,
                map.walls(),
            )
        })
    });

    group.finish();
}

// ============================================================================
// Particle Filter Benchmarks
// ============================================================================

fn bench_particle_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("particle_filter");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(3));
    group.warm_up_time(Duration::from_secs(1));

    let map = sample_maze();

    // Motion model prediction (500 particles)
    group.bench_function("predict/500", |b| {
        let config = filter_config(500, ConeMode::Exact, false);
        b.iter_batched(
            || new_filter(&config, &map),
            |mut filter| filter.predict(black_box(0.1), black_box(0.1)),
            criterion::BatchSize::SmallInput,
        )
    });

    // Update from a freshly seeded population, one per cone mode
    for (name, cone) in [
        ("update/exact/500", ConeMode::Exact),
        ("update/sampled/500", ConeMode::Sampled),
        ("update/central_ray/500", ConeMode::CentralRay),
    ] {
        let config = filter_config(500, cone, false);
        let reading = benchmark_reading(&new_filter(&config, &map), &map);
        group.bench_function(name, |b| {
            b.iter_batched(
                || new_filter(&config, &map),
                |mut filter| filter.update(black_box(&reading)),
                criterion::BatchSize::SmallInput,
            )
        });
    }

    // Full cycle: predict + update
    group.bench_function("full_cycle/500", |b| {
        let config = filter_config(500, ConeMode::Exact, false);
        let reading = benchmark_reading(&new_filter(&config, &map), &map);
        b.iter_batched(
            || new_filter(&config, &map),
            |mut filter| {
                filter.predict(black_box(0.1), black_box(0.1));
                filter.update(black_box(&reading))
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

// ============================================================================
// Parallel Weighting Benchmarks
// ============================================================================

fn bench_parallel_weighting(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_weighting");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(3));
    group.warm_up_time(Duration::from_secs(1));

    let map = sample_maze();

    // Noisy motion spreads the population so most particles are distinct
    for (name, parallel) in [("sequential/2000", false), ("rayon/2000", true)] {
        let config = filter_config(2000, ConeMode::Sampled, parallel);
        let reading = benchmark_reading(&new_filter(&config, &map), &map);
        group.bench_function(name, |b| {
            b.iter_batched(
                || {
                    let mut filter = new_filter(&config, &map);
                    filter.predict(0.2, 0.2);
                    filter
                },
                |mut filter| filter.update(black_box(&reading)),
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

// ============================================================================
// Main
// ============================================================================

criterion_group!(
    benches,
    bench_cone_distance,
    bench_particle_filter,
    bench_parallel_weighting,
);

criterion_main!(benches);
