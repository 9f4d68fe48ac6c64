use crate::art::LowPolyArt;
use thiserror::Error;

/// Error thrown during low-poly generation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LowPolyError {
    /// Zero-area or malformed image.
    #[error("Invalid input image: {0}")]
    InvalidInput(String),

    /// Not enough usable points to build a triangulation.
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// Wrong data length.
    /// (provided, expected)
    #[error("Wrong data length: provided {0}, expected {1}")]
    WrongDataLength(usize, usize),

    /// Trying to process uninitialized generator.
    #[error("Trying to process uninitialized generator")]
    UninitializedGenerator,

    /// Trying to process generator that already produced its art.
    #[error("Generator has already completed")]
    AlreadyCompleted(Box<LowPolyArt>),
}

/// Result type for low-poly operations.
pub type Result<T> = std::result::Result<T, LowPolyError>;
