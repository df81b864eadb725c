//! Label configuration loading errors.

/// Error while reading or parsing a label config file
#[derive(Debug, Clone)]
pub enum ConfigLoadError {
    /// File could not be read
    Io {
        /// Path that was read
        path: String,
        /// Underlying I/O message
        message: String,
    },
    /// YAML did not parse into a [`LabelConfig`](super::LabelConfig)
    Parse(String),
}

impl std::fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigLoadError::Io { path, message } => {
                write!(f, "cannot read label config {}: {}", path, message)
            }
            ConfigLoadError::Parse(msg) => write!(f, "invalid label config YAML: {}", msg),
        }
    }
}

impl std::error::Error for ConfigLoadError {}
