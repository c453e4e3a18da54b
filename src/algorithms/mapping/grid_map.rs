//! Maze wall grid.
//!
//! A maze of `rows x cols` square cells is described by a character grid of
//! `(2*rows - 1) x (2*cols - 1)` markers:
//!
//! ```text
//!   even row, even col  -> cell center (content ignored)
//!   odd row,  even col  -> horizontal wall between two stacked cells
//!   even row, odd col   -> vertical wall between two adjacent cells
//!   odd row,  odd col   -> corner post (content ignored)
//! ```
//!
//! Row 0 of the marker grid is the bottom of the maze. Each cell is
//! [`CELL_SIZE`] units wide, so cell `(row, col)` spans
//! `[2*col, 2*col + 2] x [2*row, 2*row + 2]` in world coordinates.

use std::fmt;

use crate::core::types::Point2D;
use crate::error::{Error, Result};

/// Cell rows of the reference maze.
pub const CELL_ROWS: usize = 7;

/// Cell columns of the reference maze.
pub const CELL_COLS: usize = 14;

/// Side length of one cell in world units.
pub const CELL_SIZE: f64 = 2.0;

/// One potential wall between two neighbouring cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallSegment {
    /// Wall above cell `(row, col)`, between rows `row` and `row + 1`.
    Horizontal { row: usize, col: usize },
    /// Wall right of cell `(row, col)`, between columns `col` and `col + 1`.
    Vertical { row: usize, col: usize },
}

impl WallSegment {
    /// Position of this segment in the marker grid.
    fn marker_index(self) -> (usize, usize) {
        match self {
            Self::Horizontal { row, col } => (2 * row + 1, 2 * col),
            Self::Vertical { row, col } => (2 * row, 2 * col + 1),
        }
    }

    /// World-space line segment covered by this wall.
    pub fn to_wall(self) -> Wall {
        match self {
            Self::Horizontal { row, col } => {
                let y = (row + 1) as f64 * CELL_SIZE;
                Wall::new(
                    Point2D::new(col as f64 * CELL_SIZE, y),
                    Point2D::new((col + 1) as f64 * CELL_SIZE, y),
                )
            }
            Self::Vertical { row, col } => {
                let x = (col + 1) as f64 * CELL_SIZE;
                Wall::new(
                    Point2D::new(x, row as f64 * CELL_SIZE),
                    Point2D::new(x, (row + 1) as f64 * CELL_SIZE),
                )
            }
        }
    }
}

/// A zero-thickness wall in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    /// First endpoint
    pub start: Point2D,
    /// Second endpoint
    pub end: Point2D,
}

impl Wall {
    /// Create a wall between two points.
    #[inline]
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    /// Vector from start to end.
    #[inline]
    pub fn direction(&self) -> Point2D {
        self.end - self.start
    }

    /// Point at parameter `t` along the wall (0 = start, 1 = end).
    #[inline]
    pub fn point_at(&self, t: f64) -> Point2D {
        self.start + self.direction() * t
    }

    /// Distance along a ray to this wall, if the ray hits it.
    ///
    /// Solves `origin + t*dir = start + s*seg` with `t >= 0` and
    /// `s` in [0, 1]. Rays parallel to the wall never hit.
    pub fn ray_intersection(&self, origin: Point2D, direction: Point2D) -> Option<f64> {
        let dir = direction.normalized();
        let seg = self.direction();

        let cross_dir_seg = dir.cross(seg);
        if cross_dir_seg.abs() < 1e-12 {
            return None;
        }

        let origin_to_start = self.start - origin;
        let t = origin_to_start.cross(seg) / cross_dir_seg;
        let s = origin_to_start.cross(dir) / cross_dir_seg;

        // Tolerance keeps rays starting on the wall from slipping through
        const EPS: f64 = 1e-9;
        if t >= -EPS && (-EPS..=1.0 + EPS).contains(&s) {
            Some(t.max(0.0))
        } else {
            None
        }
    }
}

/// Static wall layout of a maze.
#[derive(Debug, Clone)]
pub struct GridMap {
    rows: usize,
    cols: usize,
    /// Wall presence per marker, row-major over the marker grid.
    markers: Vec<bool>,
    /// Whether the arena perimeter counts as wall.
    boundary: bool,
    /// World-space segments of every present wall (perimeter included).
    walls: Vec<Wall>,
}

impl GridMap {
    /// Create a maze with no interior walls, enclosed by the arena perimeter.
    pub fn empty(rows: usize, cols: usize) -> Result<Self> {
        Self::check_dimensions(rows, cols)?;
        let markers = vec![false; (2 * rows - 1) * (2 * cols - 1)];
        Ok(Self::build(rows, cols, markers, true))
    }

    /// Parse a marker grid.
    ///
    /// `lines[0]` is the bottom marker row. Every line must hold exactly
    /// `2*cols - 1` characters and there must be `2*rows - 1` lines. At wall
    /// positions `' '` means open, `'-'` and `'|'` mean wall; any other
    /// character there is rejected.
    pub fn from_rows<S: AsRef<str>>(rows: usize, cols: usize, lines: &[S]) -> Result<Self> {
        Self::check_dimensions(rows, cols)?;
        let height = 2 * rows - 1;
        let width = 2 * cols - 1;

        if lines.len() != height {
            return Err(Error::InvalidMap(format!(
                "expected {} marker rows for a {}x{} maze, got {}",
                height,
                rows,
                cols,
                lines.len()
            )));
        }

        let mut markers = vec![false; height * width];
        for (r, line) in lines.iter().enumerate() {
            let chars: Vec<char> = line.as_ref().chars().collect();
            if chars.len() != width {
                return Err(Error::InvalidMap(format!(
                    "marker row {} has {} columns, expected {}",
                    r,
                    chars.len(),
                    width
                )));
            }

            for (c, &ch) in chars.iter().enumerate() {
                // Cell centers and corner posts carry no wall information
                if r % 2 == c % 2 {
                    continue;
                }
                markers[r * width + c] = match ch {
                    ' ' => false,
                    '-' | '|' => true,
                    other => {
                        return Err(Error::InvalidMap(format!(
                            "unexpected marker {:?} at row {}, column {}",
                            other, r, c
                        )));
                    }
                };
            }
        }

        let map = Self::build(rows, cols, markers, true);
        log::debug!(
            "Loaded {}x{} maze with {} wall segments",
            rows,
            cols,
            map.walls.len()
        );
        Ok(map)
    }

    /// Enable or disable the arena perimeter walls.
    pub fn with_boundary(self, boundary: bool) -> Self {
        Self::build(self.rows, self.cols, self.markers, boundary)
    }

    fn check_dimensions(rows: usize, cols: usize) -> Result<()> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidMap(format!(
                "maze must have at least one cell, got {}x{}",
                rows, cols
            )));
        }
        Ok(())
    }

    fn build(rows: usize, cols: usize, markers: Vec<bool>, boundary: bool) -> Self {
        let mut map = Self {
            rows,
            cols,
            markers,
            boundary,
            walls: Vec::new(),
        };
        map.walls = map.collect_walls();
        map
    }

    fn collect_walls(&self) -> Vec<Wall> {
        let mut walls: Vec<Wall> = self.segments().map(WallSegment::to_wall).collect();

        if self.boundary {
            let (w, h) = (self.width(), self.height());
            let corners = [
                Point2D::new(0.0, 0.0),
                Point2D::new(w, 0.0),
                Point2D::new(w, h),
                Point2D::new(0.0, h),
            ];
            for i in 0..4 {
                walls.push(Wall::new(corners[i], corners[(i + 1) % 4]));
            }
        }

        walls
    }

    /// Number of cell rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of cell columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// World width of the arena.
    #[inline]
    pub fn width(&self) -> f64 {
        self.cols as f64 * CELL_SIZE
    }

    /// World height of the arena.
    #[inline]
    pub fn height(&self) -> f64 {
        self.rows as f64 * CELL_SIZE
    }

    /// Whether the perimeter is treated as wall.
    #[inline]
    pub fn has_boundary(&self) -> bool {
        self.boundary
    }

    fn marker_width(&self) -> usize {
        2 * self.cols - 1
    }

    /// Whether an interior wall segment is present.
    ///
    /// Segments outside the maze, including the perimeter, report `false`.
    pub fn has_wall(&self, segment: WallSegment) -> bool {
        let in_range = match segment {
            WallSegment::Horizontal { row, col } => row + 1 < self.rows && col < self.cols,
            WallSegment::Vertical { row, col } => row < self.rows && col + 1 < self.cols,
        };
        if !in_range {
            return false;
        }
        let (r, c) = segment.marker_index();
        self.markers[r * self.marker_width() + c]
    }

    /// Iterate over every present interior wall segment.
    pub fn segments(&self) -> impl Iterator<Item = WallSegment> + '_ {
        let horizontal = (0..self.rows.saturating_sub(1)).flat_map(move |row| {
            (0..self.cols).map(move |col| WallSegment::Horizontal { row, col })
        });
        let vertical = (0..self.rows).flat_map(move |row| {
            (0..self.cols.saturating_sub(1)).map(move |col| WallSegment::Vertical { row, col })
        });
        horizontal
            .chain(vertical)
            .filter(move |segment| self.has_wall(*segment))
    }

    /// World-space walls used for ray casting.
    #[inline]
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// Geometric center of cell `(row, col)`.
    #[inline]
    pub fn cell_center(&self, row: usize, col: usize) -> Point2D {
        Point2D::new(
            col as f64 * CELL_SIZE + CELL_SIZE / 2.0,
            row as f64 * CELL_SIZE + CELL_SIZE / 2.0,
        )
    }

    /// Cell containing a world point, if inside the arena.
    pub fn cell_at(&self, point: Point2D) -> Option<(usize, usize)> {
        if point.x < 0.0 || point.y < 0.0 || point.x >= self.width() || point.y >= self.height()
        {
            return None;
        }
        Some((
            (point.y / CELL_SIZE) as usize,
            (point.x / CELL_SIZE) as usize,
        ))
    }
}

impl fmt::Display for GridMap {
    /// Render the marker grid top row first, as the maze looks from above.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.marker_width();
        for r in (0..2 * self.rows - 1).rev() {
            let line: String = (0..width)
                .map(|c| match (r % 2, c % 2) {
                    (1, 0) if self.markers[r * width + c] => '-',
                    (0, 1) if self.markers[r * width + c] => '|',
                    _ => ' ',
                })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
