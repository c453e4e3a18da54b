//! Maze representation and wall geometry.
//!
//! - [`GridMap`]: Static wall layout parsed from a marker grid
//! - [`raycast`]: Ray and cone distance queries against the walls

mod grid_map;
pub mod raycast;

pub use grid_map::{CELL_COLS, CELL_ROWS, CELL_SIZE, GridMap, Wall, WallSegment};
pub use raycast::{cone_distance, point_segment_distance, sampled_cone_distance};
