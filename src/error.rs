//! Error types for maze-mcl

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// maze-mcl error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or inconsistent maze description
    #[error("Invalid map: {0}")]
    InvalidMap(String),

    /// Configuration could not be parsed or failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading carries a different number of beams than the sensor geometry
    #[error("Beam count mismatch: expected {expected}, got {actual}")]
    BeamCountMismatch {
        /// Beams configured on the filter
        expected: usize,
        /// Beams present in the reading
        actual: usize,
    },

    /// Reading holds a value that cannot be a distance
    #[error("Invalid reading: {0}")]
    InvalidReading(String),

    /// Failure reported by the robot link
    #[error("Link error: {0}")]
    Link(String),
}
