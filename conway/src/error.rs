// error.rs - Error types for the simulation core

use thiserror::Error;

/// Failures reported by [`crate::World`] construction and window reads.
///
/// A call that returns an error leaves the grid untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// Width or height was zero
    #[error("Invalid world dimensions {width}x{height}: both must be positive")]
    InvalidDimension { width: usize, height: usize },

    /// Requested screen window does not fit inside the grid
    #[error(
        "Window {cols}x{rows} at ({origin_x}, {origin_y}) exceeds world bounds {width}x{height}"
    )]
    OutOfBounds {
        origin_x: usize,
        origin_y: usize,
        cols: usize,
        rows: usize,
        width: usize,
        height: usize,
    },

    /// Configuration value outside its accepted range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl WorldError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Failures while handing a frame to a [`crate::FrameSink`].
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type WorldResult<T> = Result<T, WorldError>;
