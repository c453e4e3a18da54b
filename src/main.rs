//! maze-mcl demo: localize a simulated robot in the sample maze.
//!
//! Loads `maze-mcl.toml` from the working directory when present, otherwise
//! runs on defaults. The robot follows a fixed command script; after every
//! cycle the estimate is logged next to the true pose.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use maze_mcl::algorithms::localization::WriterTrace;
use maze_mcl::algorithms::mapping::{CELL_COLS, CELL_ROWS};
use maze_mcl::{MapConfig, MazeLocalizer, MclConfig, ParticleFilter, Pose, Result, SimulatedMaze};

const DEFAULT_CONFIG_PATH: &str = "maze-mcl.toml";

/// Command script: (left, right, cycles).
const SCRIPT: [(f64, f64, usize); 6] = [
    (0.1, 0.1, 20),
    (-0.1, 0.1, 8),
    (0.1, 0.1, 15),
    (0.1, -0.1, 8),
    (0.1, 0.0, 6),
    (0.0, 0.1, 6),
];

fn load_config() -> MclConfig {
    let path = Path::new(DEFAULT_CONFIG_PATH);
    if !path.exists() {
        log::info!("No {} found, using defaults", DEFAULT_CONFIG_PATH);
        return MclConfig::default();
    }
    match MclConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Failed to load {}: {}", DEFAULT_CONFIG_PATH, e);
            MclConfig::default()
        }
    }
}

fn run(mut config: MclConfig) -> Result<()> {
    if config.map.layout.is_empty() && (config.map.rows, config.map.cols) == (CELL_ROWS, CELL_COLS) {
        config.map.layout = MapConfig::sample().layout;
    }
    let map = Arc::new(config.map.build()?);
    log::info!("Maze:\n{}", map);

    let mut filter = ParticleFilter::from_seed(config.filter.clone(), map.clone())?;
    if let Some(path) = &config.trace_file {
        filter = filter.with_trace(WriterTrace::append_to(path)?);
    }
    let robot = SimulatedMaze::new(map, &config.filter, config.simulation.clone())?;
    let mut localizer = MazeLocalizer::new(filter, robot);

    let commands = SCRIPT
        .iter()
        .flat_map(|&(left, right, cycles)| std::iter::repeat_n((left, right), cycles))
        .cycle()
        .take(config.simulation.steps);

    for (cycle, (left, right)) in commands.enumerate() {
        let frame = localizer.step(left, right)?;
        let estimate = localizer.estimate();
        let truth = localizer.link().true_pose();

        log::info!(
            "[{:3}] cmd ({:+.2}, {:+.2}) estimate {} truth {} error {:.2}{}",
            cycle,
            left,
            right,
            format_pose(&estimate),
            format_pose(&truth),
            estimate.position().distance(&truth.position()),
            if frame.collision { " (bump)" } else { "" }
        );
    }

    let state = localizer.filter().state();
    log::info!(
        "Done: {} updates, {} distinct poses, neff {:.1}, {} collisions",
        state.iterations,
        state.distinct_poses,
        state.neff,
        localizer.link().collisions()
    );
    Ok(())
}

fn format_pose(pose: &Pose) -> String {
    format!("({:6.2}, {:6.2}, {:7.1})", pose.x, pose.y, pose.theta)
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    log::info!("maze-mcl starting");
    let config = load_config();

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
