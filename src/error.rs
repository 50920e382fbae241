//! Error types for loading, configuration and score submission

/// Errors surfaced by the game core
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// Asset loading failed; the game stays in the loading phase
    #[error("Asset load error: {0}")]
    AssetLoad(String),

    /// A body was configured with a non-positive size
    #[error("Invalid geometry: {width}x{height}")]
    InvalidGeometry { width: f32, height: f32 },

    /// Tuning or settings values out of range
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Settings JSON could not be parsed or written
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Settings file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Email supplied with a score submission is malformed
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
}

/// Result type for game operations
pub type Result<T> = std::result::Result<T, GameError>;
