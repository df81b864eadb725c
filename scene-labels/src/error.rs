//! Error types for scene label synthesis

use crate::config::ConfigLoadError;

/// Result type alias
pub type Result<T> = std::result::Result<T, LabelError>;

/// Label synthesis error types
#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    /// Redundant per-point object metadata disagrees within one instance
    #[error("Inconsistent {field} for instance {instance_id}")]
    InputInconsistency {
        /// Instance whose member points disagree
        instance_id: u32,
        /// Name of the disagreeing field
        field: &'static str,
    },

    /// A per-point array does not match the point count
    #[error("Shape mismatch for {field}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Name of the offending array
        field: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Scene has no points
    #[error("Scene has no points")]
    EmptyScene,

    /// No subsample kept every instance within the attempt budget
    #[error("Resampling exhausted after {attempts} attempts ({missing} instance ids lost)")]
    ResamplingExhausted {
        /// Attempts made
        attempts: usize,
        /// Instance ids missing from the last attempt
        missing: usize,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be loaded
    #[error("Config load error: {0}")]
    Config(#[from] ConfigLoadError),

    /// I/O error from a label sink
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LabelError {
    /// Get a short error code for logging/metrics.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InputInconsistency { .. } => "INPUT_INCONSISTENCY",
            Self::ShapeMismatch { .. } => "SHAPE_MISMATCH",
            Self::EmptyScene => "EMPTY_SCENE",
            Self::ResamplingExhausted { .. } => "RESAMPLING_EXHAUSTED",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Config(_) => "CONFIG_LOAD",
            Self::Io(_) => "IO",
        }
    }
}
