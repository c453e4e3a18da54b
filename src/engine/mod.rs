//! Localization orchestration layer.
//!
//! Couples the particle filter with a robot link so every command sent and
//! every reading received flows through the filter.
//!
//! # Contents
//!
//! - [`localizer`]: [`MazeLocalizer`], the drive/sense/estimate loop

pub mod localizer;

pub use localizer::MazeLocalizer;
