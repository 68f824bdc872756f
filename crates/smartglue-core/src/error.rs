//! Error type shared by every stage of a GLUE run.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlueError {
    /// Matrices or condition lists that cannot be lined up.
    #[error("dimension mismatch: {0}")]
    Dimension(String),

    /// Malformed threshold condition or unknown name.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Missing column or unparsable cell in a tabular input file.
    #[error("{path}: {message}")]
    Format { path: PathBuf, message: String },

    #[error("invalid settings in {path}: {message}")]
    Settings { path: PathBuf, message: String },

    /// The simulation model failed for one draw.
    #[error("simulation failed for draw {draw}: {message}")]
    Simulation { draw: usize, message: String },

    /// Result file protocol violation (header written twice, record before header, ...).
    #[error("result writer: {0}")]
    Writer(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl GlueError {
    pub(crate) fn format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        GlueError::Format {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GlueError>;
